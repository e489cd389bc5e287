//! School directory rows (NCES CCD shape) and their geocoded tracts.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{info, warn};

use super::parse_number;
use crate::config::ScoringConfig;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchoolRow {
    #[serde(alias = "NCESSCH")]
    pub school_id: String,
    #[serde(alias = "SCH_NAME", alias = "name")]
    pub school_name: String,
    #[serde(alias = "fips", alias = "CNTY")]
    pub county_fips: String,
    #[serde(default)]
    pub county: Option<String>,
    #[serde(alias = "MEMBER", default)]
    pub enrollment: Option<String>,
    #[serde(alias = "census_tract", default)]
    pub tract: Option<String>,
}

/// A school ready for scoring. Input order is preserved end to end because
/// the nurse draw depends on it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchoolRecord {
    pub school_id: String,
    pub name: String,
    pub county_fips: String,
    pub county: String,
    pub enrollment: Option<u32>,
    /// 11-digit tract GEOID when the school was geocoded.
    pub census_tract: Option<String>,
}

/// Keeps schools in the target counties, in input order. Later rows with an
/// already-seen `school_id` are dropped.
pub fn normalize_schools(rows: &[SchoolRow], config: &ScoringConfig) -> Vec<SchoolRecord> {
    let mut seen = HashSet::new();
    let mut schools = Vec::new();
    let mut outside = 0usize;

    for row in rows {
        let fips = format!("{:0>5}", row.county_fips.trim());
        let Some(county) = config.county_by_fips(&fips) else {
            outside += 1;
            continue;
        };

        let school_id = row.school_id.trim().to_string();
        if !seen.insert(school_id.clone()) {
            warn!(school_id = %school_id, "Duplicate school row ignored");
            continue;
        }

        schools.push(SchoolRecord {
            school_id,
            name: row.school_name.trim().to_string(),
            county_fips: fips,
            county: county.county.clone(),
            enrollment: parse_enrollment(row.enrollment.as_deref()),
            census_tract: row.tract.as_deref().and_then(normalize_tract),
        });
    }

    info!(
        kept = schools.len(),
        outside_target_counties = outside,
        "School directory normalized"
    );
    schools
}

/// Non-negative integer counts only; anything else is unknown.
fn parse_enrollment(raw: Option<&str>) -> Option<u32> {
    let value = parse_number(raw)?;
    if value < 0.0 || !value.is_finite() || value > u32::MAX as f64 {
        return None;
    }
    Some(value.round() as u32)
}

fn normalize_tract(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_end_matches(".0");
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some(format!("{trimmed:0>11}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, fips: &str, enrollment: Option<&str>, tract: Option<&str>) -> SchoolRow {
        SchoolRow {
            school_id: id.to_string(),
            school_name: format!("School {id}"),
            county_fips: fips.to_string(),
            county: None,
            enrollment: enrollment.map(str::to_string),
            tract: tract.map(str::to_string),
        }
    }

    #[test]
    fn test_keeps_order_and_target_counties() {
        let rows = vec![
            row("3", "12031", Some("900"), None),
            row("1", "12095", Some("500"), None),
            row("2", "12019", Some("250"), None),
        ];
        let schools = normalize_schools(&rows, &ScoringConfig::default());
        let ids: Vec<_> = schools.iter().map(|s| s.school_id.as_str()).collect();
        assert_eq!(ids, vec!["3", "2"]);
        assert_eq!(schools[0].county, "Duval");
        assert_eq!(schools[1].county, "Clay");
    }

    #[test]
    fn test_enrollment_parsing() {
        assert_eq!(parse_enrollment(Some("1800")), Some(1800));
        assert_eq!(parse_enrollment(Some("1800.0")), Some(1800));
        assert_eq!(parse_enrollment(Some("-1")), None);
        assert_eq!(parse_enrollment(Some("")), None);
        assert_eq!(parse_enrollment(None), None);
    }

    #[test]
    fn test_tract_normalization() {
        assert_eq!(normalize_tract("12031000100"), Some("12031000100".to_string()));
        assert_eq!(normalize_tract("12031000100.0"), Some("12031000100".to_string()));
        assert_eq!(normalize_tract(""), None);
        assert_eq!(normalize_tract("none"), None);
    }

    #[test]
    fn test_duplicate_ids_dropped() {
        let rows = vec![
            row("7", "12089", Some("400"), None),
            row("7", "12089", Some("999"), None),
        ];
        let schools = normalize_schools(&rows, &ScoringConfig::default());
        assert_eq!(schools.len(), 1);
        assert_eq!(schools[0].enrollment, Some(400));
    }
}
