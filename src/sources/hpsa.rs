//! HRSA HPSA dashboard, primary-care designations.

use serde::Deserialize;
use std::collections::BTreeMap;

use super::{SourceKind, SourceTable, parse_number};
use crate::config::ScoringConfig;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HpsaRow {
    #[serde(alias = "State", alias = "Common State Name")]
    pub state: String,
    #[serde(alias = "County", alias = "Common County Name")]
    pub county: String,
    #[serde(alias = "Discipline", alias = "HPSA Discipline Class")]
    pub discipline: String,
    #[serde(alias = "HPSA Score", alias = "HPSA_Score", default)]
    pub hpsa_score: Option<String>,
}

/// Maximum primary-care shortage score per target county.
///
/// Worst-case access: the max over designations, not the mean. Scores that
/// do not parse are dropped before taking the max. Counties with only
/// unparseable scores get no entry.
pub fn normalize_hpsa(rows: &[HpsaRow], config: &ScoringConfig) -> SourceTable {
    let mut max_by_county: BTreeMap<String, f64> = BTreeMap::new();

    for row in rows {
        if !row.state.trim().eq_ignore_ascii_case(&config.state.name) {
            continue;
        }
        if !row.discipline.to_lowercase().contains("primary care") {
            continue;
        }
        let Some(fips) = config.fips_for_county_name(strip_county_suffix(&row.county)) else {
            continue;
        };
        let Some(score) = parse_number(row.hpsa_score.as_deref()) else {
            continue;
        };

        max_by_county
            .entry(fips.to_string())
            .and_modify(|m| *m = m.max(score))
            .or_insert(score);
    }

    SourceTable::from_values(SourceKind::Hpsa, max_by_county)
}

/// 1 when a county has a positive shortage score, else 0.
pub fn shortage_flag(hpsa_max: Option<f64>) -> u8 {
    u8::from(hpsa_max.unwrap_or(0.0) > 0.0)
}

// HRSA sometimes writes "Duval County".
fn strip_county_suffix(name: &str) -> &str {
    let trimmed = name.trim();
    trimmed
        .strip_suffix(" County")
        .or_else(|| trimmed.strip_suffix(" county"))
        .unwrap_or(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(county: &str, discipline: &str, score: &str) -> HpsaRow {
        HpsaRow {
            state: "Florida".to_string(),
            county: county.to_string(),
            discipline: discipline.to_string(),
            hpsa_score: Some(score.to_string()),
        }
    }

    #[test]
    fn test_hpsa_max_aggregation_is_intentional() {
        let rows = vec![
            row("Duval", "Primary Care", "12"),
            row("Duval", "Primary Care", "19"),
            row("Duval", "Primary Care", "3"),
        ];
        let table = normalize_hpsa(&rows, &ScoringConfig::default());
        assert_eq!(table.get("12031"), Some(19.0));
    }

    #[test]
    fn test_discipline_match_is_case_insensitive_substring() {
        let rows = vec![
            row("Clay", "PRIMARY CARE (Geographic)", "8"),
            row("Clay", "Dental Health", "22"),
            row("Clay", "Mental Health", "24"),
        ];
        let table = normalize_hpsa(&rows, &ScoringConfig::default());
        assert_eq!(table.get("12019"), Some(8.0));
    }

    #[test]
    fn test_non_numeric_scores_excluded() {
        let rows = vec![
            row("Baker", "Primary Care", "pending"),
            row("Baker", "Primary Care", "6"),
            row("Nassau", "Primary Care", ""),
        ];
        let table = normalize_hpsa(&rows, &ScoringConfig::default());
        assert_eq!(table.get("12003"), Some(6.0));
        assert_eq!(table.get("12089"), None);
    }

    #[test]
    fn test_county_suffix_and_state_filter() {
        let mut other_state = row("Duval", "Primary Care", "25");
        other_state.state = "Georgia".to_string();
        let rows = vec![row("St. Johns County", "Primary Care", "11"), other_state];
        let table = normalize_hpsa(&rows, &ScoringConfig::default());
        assert_eq!(table.get("12109"), Some(11.0));
        assert_eq!(table.get("12031"), None);
    }

    #[test]
    fn test_shortage_flag() {
        assert_eq!(shortage_flag(Some(14.0)), 1);
        assert_eq!(shortage_flag(Some(0.0)), 0);
        assert_eq!(shortage_flag(None), 0);
    }
}
