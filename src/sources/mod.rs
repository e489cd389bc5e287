//! Per-feed adapters.
//!
//! Each adapter takes the raw rows of one external feed plus the target key
//! space and produces a [`SourceTable`]: key (county FIPS or tract GEOID) to
//! one scalar indicator. A feed that could not be loaded, or that had no
//! usable rows, becomes a table with [`SourceStatus::Missing`] so consumers
//! can report "no data" apart from "zero".

pub mod aqi;
pub mod hpsa;
pub mod nri;
pub mod places;
pub mod respiratory;
pub mod schools;

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Aqi,
    Hpsa,
    Places,
    TractPlaces,
    Nri,
    Respiratory,
    Schools,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceKind::Aqi => "aqi",
            SourceKind::Hpsa => "hpsa",
            SourceKind::Places => "places",
            SourceKind::TractPlaces => "tract_places",
            SourceKind::Nri => "nri",
            SourceKind::Respiratory => "respiratory",
            SourceKind::Schools => "schools",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SourceStatus {
    Loaded { keys: usize },
    Missing { reason: String },
}

/// Normalized output of one feed.
#[derive(Debug, Clone, Serialize)]
pub struct SourceTable {
    pub kind: SourceKind,
    pub status: SourceStatus,
    pub values: BTreeMap<String, f64>,
}

impl SourceTable {
    /// Builds a table from normalized values. An empty map counts as a
    /// missing source.
    pub fn from_values(kind: SourceKind, values: BTreeMap<String, f64>) -> Self {
        let status = if values.is_empty() {
            SourceStatus::Missing {
                reason: "no usable rows".to_string(),
            }
        } else {
            SourceStatus::Loaded { keys: values.len() }
        };
        Self {
            kind,
            status,
            values,
        }
    }

    pub fn missing(kind: SourceKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            status: SourceStatus::Missing {
                reason: reason.into(),
            },
            values: BTreeMap::new(),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self.status, SourceStatus::Missing { .. })
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }
}

/// Parses a publisher's numeric cell. Blank, non-numeric and NaN cells are
/// `None`.
pub(crate) fn parse_number(raw: Option<&str>) -> Option<f64> {
    let value: f64 = raw?.trim().replace(',', "").parse().ok()?;
    if value.is_nan() { None } else { Some(value) }
}
