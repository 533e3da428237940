use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Write},
    path::Path,
};

use anyhow::Context;
use cubestats_analysis::config::PipelineConfig;
use serde::Serialize;

/// Write `value` as pretty JSON to `path`, or to stdout when `None`
pub fn write_json<T>(value: &T, path: Option<&Path>) -> anyhow::Result<()>
where
    T: Serialize,
{
    let destination = path.map_or_else(|| "stdout".to_owned(), |p| p.display().to_string());
    let mut writer: Box<dyn Write> = match path {
        Some(path) => Box::new(BufWriter::new(
            File::create(path)
                .with_context(|| format!("Failed to create output file: {destination}"))?,
        )),
        None => Box::new(io::stdout().lock()),
    };

    serde_json::to_writer_pretty(&mut writer, value)
        .with_context(|| format!("Failed to write JSON to {destination}"))?;
    writeln!(writer).with_context(|| format!("Failed to write to {destination}"))?;
    writer
        .flush()
        .with_context(|| format!("Failed to flush output to {destination}"))?;
    log::info!("wrote report to {destination}");
    Ok(())
}

/// Read a pipeline configuration from a JSON file
///
/// Fields missing from the file keep their default values.
pub fn read_config_file(path: &Path) -> anyhow::Result<PipelineConfig> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open config file: {}", path.display()))?;
    let config = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse config JSON file: {}", path.display()))?;
    Ok(config)
}

/// Format an optional value with a fixed precision, `-` when absent
pub fn fmt_opt(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(|| "-".to_owned(), |v| format!("{v:.precision$}"))
}

/// Format an optional ratio as a percentage, `-` when absent
pub fn fmt_pct(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_owned(), |v| format!("{:.1}%", v * 100.0))
}
