pub mod types;

pub use types::*;

use crate::error::HarError;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

/// Parse a HAR entry from path
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Entry> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(HarError::from)
        .with_context(|| format!("Failed to open file: {}", path.display()))?;
    let reader = BufReader::new(file);
    Ok(parse_reader(reader)?)
}

/// Parse a HAR entry from a reader
pub fn parse_reader<R: Read>(reader: R) -> Result<Entry, HarError> {
    serde_json::from_reader(reader).map_err(HarError::MalformedJson)
}

/// Parse a HAR entry from a string
#[cfg(test)]
pub fn parse_str(s: &str) -> Result<Entry, HarError> {
    serde_json::from_str(s).map_err(HarError::MalformedJson)
}

/// Parse a HAR entry from stdin
pub fn parse_stdin() -> Result<Entry> {
    let stdin = std::io::stdin();
    let reader = stdin.lock();
    Ok(parse_reader(reader)?)
}

/// Render an entry with sorted keys and two-space indentation.
pub fn to_sorted_json(entry: &Entry) -> Result<String> {
    // `Value` objects are BTreeMap-backed, which is what sorts the keys.
    let value = serde_json::to_value(entry).context("Failed to serialize HAR entry")?;
    serde_json::to_string_pretty(&value).context("Failed to render HAR entry")
}

/// Write an entry to stdout
pub fn write_stdout(entry: &Entry) -> Result<()> {
    let output = to_sorted_json(entry)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}", output)?;
    out.flush()?;
    Ok(())
}
