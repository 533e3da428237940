//! Reading solve logs
//!
//! Solve logs are semicolon-delimited text tables with a header row, as
//! produced by common timer exports:
//!
//! ```text
//! No.;Time;Comment;Scramble;Date
//! 1;0:12.34;;R U R' U';15/03/2024 18:02:11
//! 2;0:11.02;;F R U R';15/03/2024 18:02:45
//! ```
//!
//! Header names are trimmed and lower-cased, a leading byte-order mark is
//! ignored, and fields may be wrapped in double quotes to hold `;` or an
//! escaped `""`. Only the `date`
//! and `time` columns are interpreted; every other column is carried through
//! unchanged.

use std::{
    collections::BTreeMap,
    fs::File,
    io::{self, Read},
    path::Path,
};

/// Column holding the day-first solve timestamp.
pub const DATE_COLUMN: &str = "date";
/// Column holding the `MM:SS[.fraction]` solve time.
pub const TIME_COLUMN: &str = "time";

/// Errors that prevent a solve log from being read at all.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum LoadError {
    #[display("failed to read solve log: {_0}")]
    Io(io::Error),
    #[display("solve log has no header row")]
    MissingHeader,
    #[display("required column `{column}` not found in header")]
    MissingColumn { column: &'static str },
    #[display("line {line}: expected at most {expected} fields, found {found}")]
    RowWidth {
        line: usize,
        expected: usize,
        found: usize,
    },
}

/// One data row of a solve log, still in text form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// 1-based line number in the source text
    pub line: usize,
    pub date: String,
    /// `None` when the field is empty or absent from a short row
    pub time: Option<String>,
    /// Uninterpreted columns, keyed by normalized header name
    pub extra: BTreeMap<String, String>,
}

/// A solve log as read from disk, before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLog {
    /// Normalized header names in file order
    pub columns: Vec<String>,
    pub records: Vec<RawRecord>,
}

impl RawLog {
    /// Reads a solve log from a file.
    pub fn read_from_path<P>(path: P) -> Result<Self, LoadError>
    where
        P: AsRef<Path>,
    {
        let file = File::open(path).map_err(LoadError::Io)?;
        Self::read_from(file)
    }

    /// Reads a solve log from any reader. Invalid UTF-8 is an I/O error.
    pub fn read_from<R>(mut reader: R) -> Result<Self, LoadError>
    where
        R: Read,
    {
        let mut text = String::new();
        reader.read_to_string(&mut text).map_err(LoadError::Io)?;
        Self::parse(&text)
    }

    /// Parses solve log text.
    ///
    /// # Examples
    ///
    /// ```
    /// use cubestats_analysis::load::RawLog;
    ///
    /// let log = RawLog::parse("\u{feff} Date ;TIME;Comment\n01/02/2024 10:00;0:09.50;pb\n").unwrap();
    /// assert_eq!(log.columns, ["date", "time", "comment"]);
    /// assert_eq!(log.records[0].time.as_deref(), Some("0:09.50"));
    /// assert_eq!(log.records[0].extra["comment"], "pb");
    /// ```
    pub fn parse(text: &str) -> Result<Self, LoadError> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(idx, line)| (idx + 1, line))
            .filter(|(_, line)| !line.trim().is_empty());

        let (_, header) = lines.next().ok_or(LoadError::MissingHeader)?;
        let columns = split_fields(header)
            .into_iter()
            .map(|name| name.to_lowercase())
            .collect::<Vec<_>>();
        let date_idx = column_index(&columns, DATE_COLUMN)?;
        let time_idx = column_index(&columns, TIME_COLUMN)?;

        let mut records = vec![];
        for (line, row) in lines {
            let fields = split_fields(row);
            if fields.len() > columns.len() {
                return Err(LoadError::RowWidth {
                    line,
                    expected: columns.len(),
                    found: fields.len(),
                });
            }
            let field = |idx: usize| {
                fields
                    .get(idx)
                    .map(String::as_str)
                    .filter(|f| !f.is_empty())
            };
            let extra = columns
                .iter()
                .enumerate()
                .filter(|(idx, _)| *idx != date_idx && *idx != time_idx)
                .map(|(idx, name)| (name.clone(), field(idx).unwrap_or_default().to_owned()))
                .collect();
            records.push(RawRecord {
                line,
                date: field(date_idx).unwrap_or_default().to_owned(),
                time: field(time_idx).map(str::to_owned),
                extra,
            });
        }

        log::debug!(
            "read solve log: {} columns, {} records",
            columns.len(),
            records.len()
        );
        Ok(Self { columns, records })
    }
}

fn column_index(columns: &[String], column: &'static str) -> Result<usize, LoadError> {
    columns
        .iter()
        .position(|c| c == column)
        .ok_or(LoadError::MissingColumn { column })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldState {
    Start,
    Unquoted,
    Quoted,
    AfterQuote,
}

/// Splits one line at `;` separators outside double quotes.
///
/// Unquoted fields are trimmed. Inside quotes `;` is literal and `""` stands
/// for one `"`; whitespace around a quoted field is dropped. An unterminated
/// quote runs to the end of the line.
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = vec![];
    let mut field = String::new();
    let mut state = FieldState::Start;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        state = match (state, c) {
            (FieldState::Quoted, '"') if chars.next_if_eq(&'"').is_some() => {
                field.push('"');
                FieldState::Quoted
            }
            (FieldState::Quoted, '"') => FieldState::AfterQuote,
            (FieldState::Quoted, c) => {
                field.push(c);
                FieldState::Quoted
            }
            (_, ';') => {
                fields.push(finish_field(&mut field, state));
                FieldState::Start
            }
            (FieldState::Start, '"') => FieldState::Quoted,
            (FieldState::Start | FieldState::AfterQuote, c) if c.is_whitespace() => state,
            (_, c) => {
                field.push(c);
                FieldState::Unquoted
            }
        };
    }
    fields.push(finish_field(&mut field, state));
    fields
}

fn finish_field(field: &mut String, state: FieldState) -> String {
    let value = std::mem::take(field);
    if state == FieldState::Unquoted {
        value.trim_end().to_owned()
    } else {
        value
    }
}
