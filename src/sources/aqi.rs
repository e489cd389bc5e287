//! EPA AirData annual AQI by county.

use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::debug;

use super::{SourceKind, SourceTable, parse_number};
use crate::config::ScoringConfig;

/// One row of `annual_aqi_by_county_YYYY.csv`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AqiRow {
    #[serde(alias = "State")]
    pub state: String,
    #[serde(alias = "County")]
    pub county: String,
    #[serde(alias = "Year", default)]
    pub year: Option<String>,
    #[serde(alias = "Unhealthy Days", default)]
    pub unhealthy_days: Option<String>,
    #[serde(alias = "Very Unhealthy Days", default)]
    pub very_unhealthy_days: Option<String>,
    #[serde(alias = "Hazardous Days", default)]
    pub hazardous_days: Option<String>,
}

impl AqiRow {
    /// Unhealthy + Very Unhealthy + Hazardous days, blanks counted as zero.
    pub fn unhealthy_or_worse_days(&self) -> f64 {
        [
            &self.unhealthy_days,
            &self.very_unhealthy_days,
            &self.hazardous_days,
        ]
        .iter()
        .map(|cell| parse_number(cell.as_deref()).unwrap_or(0.0))
        .sum()
    }
}

/// Sums unhealthy-or-worse days per target county.
///
/// Rows are matched to counties by name within the target state. When a
/// county appears for several years the most recent year wins.
pub fn normalize_aqi(rows: &[AqiRow], config: &ScoringConfig) -> SourceTable {
    let mut best: BTreeMap<String, (i32, f64)> = BTreeMap::new();

    for row in rows {
        if !row.state.trim().eq_ignore_ascii_case(&config.state.name) {
            continue;
        }
        let Some(fips) = config.fips_for_county_name(&row.county) else {
            continue;
        };

        let year = row
            .year
            .as_deref()
            .and_then(|y| y.trim().parse::<i32>().ok())
            .unwrap_or(i32::MIN);
        let days = row.unhealthy_or_worse_days();

        match best.get(fips) {
            Some((seen, _)) if *seen > year => {}
            _ => {
                best.insert(fips.to_string(), (year, days));
            }
        }
    }

    for (fips, (year, days)) in &best {
        debug!(fips = %fips, year, days, "AQI county row");
    }

    let values = best.into_iter().map(|(k, (_, days))| (k, days)).collect();
    SourceTable::from_values(SourceKind::Aqi, values)
}
