//! Run configuration.
//!
//! Every lookup table the scorers need lives here and is handed to each
//! component when it is built. Stored as JSON on disk; any subset of fields
//! may be given and the rest fall back to the metro-area defaults:
//! ```json
//! {
//!   "nurse_seed": 7,
//!   "respiratory_scale": { "scores": { "minimal": 1.0, "high": 8.0 } }
//! }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::scoring::components::WeightSchedule;
use crate::scoring::grade::GradeScale;
use crate::scoring::nurse::{NurseCoverageTable, StaffingCosts};
use crate::sources::respiratory::RespiratoryScale;

/// One county in the target area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountyInfo {
    pub fips: String,
    pub state: String,
    pub county: String,
}

impl CountyInfo {
    pub fn new(fips: &str, state: &str, county: &str) -> Self {
        Self {
            fips: fips.to_string(),
            state: state.to_string(),
            county: county.to_string(),
        }
    }
}

/// State the feeds are filtered to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetState {
    pub name: String,
    pub abbr: String,
    pub fips: String,
}

impl Default for TargetState {
    fn default() -> Self {
        Self {
            name: "Florida".to_string(),
            abbr: "FL".to_string(),
            fips: "12".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub state: TargetState,
    pub counties: Vec<CountyInfo>,
    pub weights: WeightSchedule,
    pub respiratory_scale: RespiratoryScale,
    pub nurse_coverage: NurseCoverageTable,
    pub staffing_costs: StaffingCosts,
    pub grade_scale: GradeScale,
    /// Seed for the nurse-assignment generator. A constant, never time based.
    pub nurse_seed: u64,
    pub lookback_days: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            state: TargetState::default(),
            counties: vec![
                CountyInfo::new("12031", "Florida", "Duval"),
                CountyInfo::new("12019", "Florida", "Clay"),
                CountyInfo::new("12109", "Florida", "St. Johns"),
                CountyInfo::new("12089", "Florida", "Nassau"),
                CountyInfo::new("12003", "Florida", "Baker"),
            ],
            weights: WeightSchedule::default(),
            respiratory_scale: RespiratoryScale::default(),
            nurse_coverage: NurseCoverageTable::default(),
            staffing_costs: StaffingCosts::default(),
            grade_scale: GradeScale::default(),
            nurse_seed: 42,
            lookback_days: 7,
        }
    }
}

impl ScoringConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config '{path}'"))?;
        let config: ScoringConfig = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config '{path}'"))?;
        Ok(config)
    }

    /// Loads `path` when given, otherwise the built-in defaults.
    pub fn load_or_default(path: Option<&str>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    /// County FIPS codes in configured order.
    pub fn county_fips(&self) -> Vec<String> {
        self.counties.iter().map(|c| c.fips.clone()).collect()
    }

    /// Maps a county name (case-insensitive) to its FIPS code.
    pub fn fips_for_county_name(&self, name: &str) -> Option<&str> {
        let wanted = name.trim().to_lowercase();
        self.counties
            .iter()
            .find(|c| c.county.to_lowercase() == wanted)
            .map(|c| c.fips.as_str())
    }

    pub fn county_by_fips(&self, fips: &str) -> Option<&CountyInfo> {
        self.counties.iter().find(|c| c.fips == fips)
    }
}
