//! Tabular row decoding for source files.

use anyhow::{Context, Result};
use csv::{ReaderBuilder, Trim};
use serde::de::DeserializeOwned;

/// Decodes rows from a CSV table with a header line, or from a JSON array of
/// objects when the payload starts with `[`.
///
/// # Errors
///
/// Returns an error if any row fails to deserialize into `T`.
pub fn parse_rows<T: DeserializeOwned>(bytes: &[u8]) -> Result<Vec<T>> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);

    if bytes.trim_ascii_start().starts_with(b"[") {
        return serde_json::from_slice(bytes).context("decoding JSON rows");
    }

    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(bytes);

    reader
        .deserialize()
        .enumerate()
        .map(|(i, row)| row.with_context(|| format!("decoding CSV row {}", i + 1)))
        .collect()
}
