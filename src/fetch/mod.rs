//! Source loading: HTTP(S) locations go through an [`HttpClient`], anything
//! else is read from disk. Zip payloads, such as the EPA annual AQI download,
//! are unpacked to their first CSV entry before parsing.

mod http;

pub use http::{BasicClient, HttpClient};

use anyhow::{Context, Result, bail};
use serde::de::DeserializeOwned;
use std::io::{Cursor, Read};
use tracing::{debug, info};

use crate::parser::parse_rows;

fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Raw bytes from a URL or a file path.
pub async fn load_bytes<C: HttpClient>(client: &C, location: &str) -> Result<Vec<u8>> {
    let bytes = if is_remote(location) {
        client
            .get_bytes(location)
            .await
            .with_context(|| format!("fetching {location}"))?
    } else {
        tokio::fs::read(location)
            .await
            .with_context(|| format!("reading {location}"))?
    };
    debug!(location, bytes = bytes.len(), "Loaded source");
    Ok(bytes)
}

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// Contents of the first `.csv` entry when `bytes` is a zip archive,
/// otherwise `bytes` unchanged.
fn unpack_zip(bytes: Vec<u8>) -> Result<Vec<u8>> {
    if !bytes.starts_with(ZIP_MAGIC) {
        return Ok(bytes);
    }

    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).context("opening zip archive")?;
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        if !entry.is_file() || !entry.name().to_ascii_lowercase().ends_with(".csv") {
            continue;
        }
        let name = entry.name().to_string();
        let mut contents = Vec::new();
        entry
            .read_to_end(&mut contents)
            .with_context(|| format!("extracting {name}"))?;
        debug!(entry = %name, bytes = contents.len(), "Unpacked zip entry");
        return Ok(contents);
    }
    bail!("zip archive has no CSV entry")
}

/// Loads and decodes a table of `T` rows.
pub async fn load_rows<C: HttpClient, T: DeserializeOwned>(client: &C, location: &str) -> Result<Vec<T>> {
    let bytes = unpack_zip(load_bytes(client, location).await?)
        .with_context(|| format!("unpacking {location}"))?;
    let rows: Vec<T> = parse_rows(&bytes).with_context(|| format!("parsing {location}"))?;
    info!(location, rows = rows.len(), "Parsed source rows");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::env;
    use std::fs;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    #[derive(Debug, Deserialize)]
    struct Row {
        fips: String,
    }

    #[test]
    fn test_is_remote() {
        assert!(is_remote("https://data.cdc.gov/resource/x.json"));
        assert!(is_remote("http://localhost/x.csv"));
        assert!(!is_remote("data/raw/aqi.csv"));
        assert!(!is_remote("httpdocs/aqi.csv"));
    }

    #[tokio::test]
    async fn test_load_rows_from_file() {
        let path = env::temp_dir().join("health_need_scorecard_fetch_rows.csv");
        fs::write(&path, "fips\n12031\n12089\n").unwrap();

        let rows: Vec<Row> = load_rows(&BasicClient::new(), path.to_str().unwrap()).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].fips, "12089");

        fs::remove_file(&path).unwrap();
    }

    fn zipped(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, body) in entries {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(body.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[tokio::test]
    async fn test_load_rows_from_zip() {
        let path = env::temp_dir().join("health_need_scorecard_fetch_rows.zip");
        let bytes = zipped(&[
            ("README.txt", "annual summary"),
            ("annual_aqi_by_county_2024.csv", "fips\n12031\n12089\n12019\n"),
        ]);
        fs::write(&path, bytes).unwrap();

        let rows: Vec<Row> = load_rows(&BasicClient::new(), path.to_str().unwrap()).await.unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].fips, "12031");

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_zip_without_csv_is_error() {
        let bytes = zipped(&[("README.txt", "nothing here")]);
        assert!(unpack_zip(bytes).is_err());
    }

    #[test]
    fn test_plain_bytes_pass_through() {
        let bytes = b"fips\n12031\n".to_vec();
        assert_eq!(unpack_zip(bytes.clone()).unwrap(), bytes);
    }

    #[tokio::test]
    async fn test_missing_file_is_error() {
        let result = load_bytes(&BasicClient::new(), "/nonexistent/health_need_scorecard.csv").await;
        assert!(result.is_err());
    }
}
