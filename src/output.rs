//! Output persistence for scorecards, summaries and snapshots.

use anyhow::{Context, Result};
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::{self, File};
use std::path::Path;
use tracing::debug;

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    Ok(())
}

/// Header line for `T`, taken from serializing its default value.
fn header_line<T: Serialize + Default>() -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(Vec::new());
    writer.serialize(T::default())?;
    let bytes = writer
        .into_inner()
        .map_err(|err| err.into_error())
        .context("flushing CSV header")?;
    let end = bytes.iter().position(|&b| b == b'\n').map_or(bytes.len(), |i| i + 1);
    Ok(bytes[..end].to_vec())
}

/// Writes `rows` to a fresh CSV file, replacing any existing file.
///
/// An empty slice still writes the header line.
pub fn write_csv<T: Serialize + Default>(path: impl AsRef<Path>, rows: &[T]) -> Result<()> {
    let path = path.as_ref();
    ensure_parent(path)?;

    if rows.is_empty() {
        fs::write(path, header_line::<T>()?).with_context(|| format!("writing {}", path.display()))?;
        debug!(path = %path.display(), "Wrote header-only CSV");
        return Ok(());
    }

    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(file);

    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    debug!(path = %path.display(), rows = rows.len(), "Wrote CSV");
    Ok(())
}

/// Writes `value` as pretty-printed JSON.
pub fn write_json<T: Serialize + ?Sized>(path: impl AsRef<Path>, value: &T) -> Result<()> {
    let path = path.as_ref();
    ensure_parent(path)?;

    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;

    debug!(path = %path.display(), "Wrote JSON");
    Ok(())
}
