//! FEMA National Risk Index, county composite.

use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::warn;

use super::{SourceKind, SourceTable, parse_number};
use crate::config::ScoringConfig;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NriRow {
    #[serde(alias = "STCOFIPS", alias = "fips")]
    pub stcofips: String,
    #[serde(alias = "COUNTY", default)]
    pub county: Option<String>,
    #[serde(alias = "RISK_SCORE", default)]
    pub risk_score: Option<String>,
}

/// Passes each target county's risk score through unchanged (already 0-100).
/// One row per county is expected; the first row wins.
pub fn normalize_nri(rows: &[NriRow], config: &ScoringConfig) -> SourceTable {
    let mut values = BTreeMap::new();

    for row in rows {
        let fips = zero_pad_fips(&row.stcofips);
        if !fips.starts_with(&config.state.fips) || config.county_by_fips(&fips).is_none() {
            continue;
        }
        let Some(score) = parse_number(row.risk_score.as_deref()) else {
            continue;
        };
        if values.contains_key(&fips) {
            warn!(fips = %fips, "Duplicate NRI row ignored");
            continue;
        }
        values.insert(fips, score);
    }

    SourceTable::from_values(SourceKind::Nri, values)
}

// Spreadsheet exports drop the leading zero of low state codes.
fn zero_pad_fips(raw: &str) -> String {
    format!("{:0>5}", raw.trim())
}
