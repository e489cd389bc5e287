//! State-wide respiratory-virus activity.
//!
//! One categorical label covers the whole run and is broadcast to every
//! county. Labels map to a 0-10 score through [`RespiratoryScale`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::ScoringConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RespiratoryScale {
    /// Display label to score. Matching is trimmed and case-insensitive.
    pub scores: BTreeMap<String, f64>,
    /// Label used when the feed is missing or the label is unknown.
    pub fallback_label: String,
    pub fallback_score: f64,
}

impl Default for RespiratoryScale {
    fn default() -> Self {
        let scores = [
            ("Minimal", 2.0),
            ("Low", 3.5),
            ("Moderate", 5.5),
            ("High", 7.5),
            ("Very High", 9.0),
        ]
        .into_iter()
        .map(|(label, score)| (label.to_string(), score))
        .collect();

        Self {
            scores,
            fallback_label: "Minimal".to_string(),
            fallback_score: 2.0,
        }
    }
}

/// The resolved activity for a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RespiratoryReading {
    pub label: String,
    pub score: f64,
    /// Set when no recognized label was available and the fallback was used.
    pub missing: bool,
}

impl RespiratoryScale {
    pub fn read(&self, label: Option<&str>) -> RespiratoryReading {
        let matched = label.and_then(|raw| {
            let wanted = raw.trim();
            self.scores
                .iter()
                .find(|(known, _)| known.eq_ignore_ascii_case(wanted))
        });

        match matched {
            Some((known, score)) => RespiratoryReading {
                label: known.clone(),
                score: *score,
                missing: false,
            },
            None => self.fallback(),
        }
    }

    pub fn fallback(&self) -> RespiratoryReading {
        RespiratoryReading {
            label: self.fallback_label.clone(),
            score: self.fallback_score,
            missing: true,
        }
    }
}

/// One row of a state activity-level table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RespiratoryRow {
    #[serde(alias = "State", alias = "jurisdiction")]
    pub state: String,
    #[serde(alias = "activity_level_label", alias = "Activity Level")]
    pub activity_level: Option<String>,
}

/// Picks the target state's label (by name or abbreviation) and scores it.
pub fn normalize_respiratory(rows: &[RespiratoryRow], config: &ScoringConfig) -> RespiratoryReading {
    let label = rows
        .iter()
        .find(|r| {
            let s = r.state.trim();
            s.eq_ignore_ascii_case(&config.state.name) || s.eq_ignore_ascii_case(&config.state.abbr)
        })
        .and_then(|r| r.activity_level.as_deref());

    config.respiratory_scale.read(label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_table() {
        let scale = RespiratoryScale::default();
        assert_eq!(scale.read(Some("Minimal")).score, 2.0);
        assert_eq!(scale.read(Some("Low")).score, 3.5);
        assert_eq!(scale.read(Some("Moderate")).score, 5.5);
        assert_eq!(scale.read(Some("High")).score, 7.5);
        assert_eq!(scale.read(Some("Very High")).score, 9.0);
    }

    #[test]
    fn test_match_is_trimmed_and_case_insensitive() {
        let reading = RespiratoryScale::default().read(Some("  very high "));
        assert_eq!(reading.label, "Very High");
        assert!(!reading.missing);
    }

    #[test]
    fn test_unknown_or_missing_falls_back_to_minimal() {
        let scale = RespiratoryScale::default();
        for label in [None, Some("Extreme"), Some("")] {
            let reading = scale.read(label);
            assert_eq!(reading.label, "Minimal");
            assert_eq!(reading.score, 2.0);
            assert!(reading.missing);
        }
    }

    #[test]
    fn test_picks_target_state_row() {
        let rows = vec![
            RespiratoryRow {
                state: "Georgia".to_string(),
                activity_level: Some("Very High".to_string()),
            },
            RespiratoryRow {
                state: "FL".to_string(),
                activity_level: Some("Moderate".to_string()),
            },
        ];
        let reading = normalize_respiratory(&rows, &ScoringConfig::default());
        assert_eq!(reading.score, 5.5);
    }
}
