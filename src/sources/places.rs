//! CDC PLACES chronic-disease prevalence, county or tract level.

use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};

use super::{SourceKind, SourceTable, parse_number};
use crate::scoring::utility::mean;

/// Indicators averaged into one chronic-disease burden value.
pub const CHRONIC_MEASURES: [&str; 3] = ["DIABETES", "OBESITY", "CASTHMA"];

const CRUDE_PREVALENCE: &str = "Crude prevalence";

/// One PLACES row. Socrata JSON serves every cell as a string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlacesRow {
    #[serde(alias = "LocationID", alias = "locationID")]
    pub locationid: String,
    #[serde(alias = "MeasureId", alias = "MeasureID")]
    pub measureid: String,
    #[serde(alias = "Data_Value_Type", alias = "DataValueTypeID", default)]
    pub data_value_type: String,
    #[serde(alias = "Data_Value", default)]
    pub data_value: Option<String>,
}

/// Mean crude prevalence of the chronic measures per key.
///
/// A composite burden, so the mean rather than HPSA's max. `keys` limits
/// the output to the target counties or tracts; rows whose value does not
/// parse do not count toward the mean.
pub fn normalize_places(rows: &[PlacesRow], keys: &BTreeSet<String>, kind: SourceKind) -> SourceTable {
    let mut measures: BTreeMap<String, Vec<f64>> = BTreeMap::new();

    for row in rows {
        let key = row.locationid.trim();
        if !keys.contains(key) {
            continue;
        }
        if !CHRONIC_MEASURES.contains(&row.measureid.trim()) {
            continue;
        }
        if row.data_value_type.trim() != CRUDE_PREVALENCE {
            continue;
        }
        let Some(value) = parse_number(row.data_value.as_deref()) else {
            continue;
        };

        measures.entry(key.to_string()).or_default().push(value);
    }

    let values = measures
        .into_iter()
        .map(|(key, found)| (key, mean(&found)))
        .collect();

    SourceTable::from_values(kind, values)
}
