//! Load-once cache for solve logs
//!
//! Recomputing derived series (for a new date range, window size, ...) should
//! not re-read the source file. [`LogCache`] keeps each loaded [`RawLog`]
//! keyed by its canonical path and modification time; a changed file is
//! re-read on the next access, and entries can be dropped explicitly.
//!
//! The cache is an ordinary value owned by the caller, not process-wide state.

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::Arc,
    time::SystemTime,
};

use crate::load::{LoadError, RawLog};

#[derive(Debug)]
struct CacheEntry {
    modified: Option<SystemTime>,
    log: Arc<RawLog>,
}

/// Cache of parsed solve logs keyed by file identity.
#[derive(Debug, Default)]
pub struct LogCache {
    entries: HashMap<PathBuf, CacheEntry>,
}

impl LogCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached log for `path`, reading it if it is not cached or
    /// the file's modification time changed since it was read.
    pub fn get_or_load<P>(&mut self, path: P) -> Result<Arc<RawLog>, LoadError>
    where
        P: AsRef<Path>,
    {
        let key = fs::canonicalize(path.as_ref()).map_err(LoadError::Io)?;
        let modified = fs::metadata(&key).and_then(|m| m.modified()).ok();

        if let Some(entry) = self.entries.get(&key)
            && entry.modified == modified
        {
            log::debug!("solve log cache hit: {}", key.display());
            return Ok(Arc::clone(&entry.log));
        }

        log::debug!("loading solve log: {}", key.display());
        let log = Arc::new(RawLog::read_from_path(&key)?);
        self.entries.insert(
            key,
            CacheEntry {
                modified,
                log: Arc::clone(&log),
            },
        );
        Ok(log)
    }

    /// Drops the entry for `path`. Returns whether an entry was present.
    pub fn invalidate<P>(&mut self, path: P) -> bool
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let key = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        self.entries.remove(&key).is_some()
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, process};

    use super::*;

    fn temp_log(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("cubestats-cache-{}", process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_second_load_is_cached() {
        let path = temp_log("cached.csv", "date;time\n01/01/2024 10:00;0:10.00\n");
        let mut cache = LogCache::new();
        let first = cache.get_or_load(&path).unwrap();
        let second = cache.get_or_load(&path).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_invalidate_forces_reload() {
        let path = temp_log("invalidate.csv", "date;time\n01/01/2024 10:00;0:10.00\n");
        let mut cache = LogCache::new();
        let first = cache.get_or_load(&path).unwrap();
        assert!(cache.invalidate(&path));
        assert!(cache.is_empty());
        let second = cache.get_or_load(&path).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(first, second);
    }

    #[test]
    fn test_modified_file_is_reloaded() {
        let path = temp_log("modified.csv", "date;time\n01/01/2024 10:00;0:10.00\n");
        let mut cache = LogCache::new();
        let first = cache.get_or_load(&path).unwrap();
        assert_eq!(first.records.len(), 1);

        fs::write(
            &path,
            "date;time\n01/01/2024 10:00;0:10.00\n01/01/2024 10:01;0:11.00\n",
        )
        .unwrap();
        let modified = fs::metadata(&path).unwrap().modified().unwrap()
            + std::time::Duration::from_secs(10);
        fs::File::options()
            .write(true)
            .open(&path)
            .unwrap()
            .set_modified(modified)
            .unwrap();

        let second = cache.get_or_load(&path).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(second.records.len(), 2);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_clear_empties_cache() {
        let a = temp_log("clear-a.csv", "date;time\n01/01/2024 10:00;0:10.00\n");
        let b = temp_log("clear-b.csv", "date;time\n02/01/2024 10:00;0:12.00\n");
        let mut cache = LogCache::new();
        cache.get_or_load(&a).unwrap();
        cache.get_or_load(&b).unwrap();
        assert_eq!(cache.len(), 2);
        cache.clear();
        assert!(cache.is_empty());
        assert!(!cache.invalidate(&a));
    }

    #[test]
    fn test_missing_file() {
        let mut cache = LogCache::new();
        let result = cache.get_or_load("/nonexistent/cubestats/log.csv");
        assert!(matches!(result, Err(LoadError::Io(_))));
        assert!(cache.is_empty());
    }
}
