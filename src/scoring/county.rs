//! County-level scoring: join the normalized feeds by FIPS and apply the
//! weight schedule.

use tracing::{debug, info, warn};

use crate::config::{CountyInfo, ScoringConfig};
use crate::scoring::components::{
    Component, ComponentScores, MissingFlags, RawSignals, WeightSchedule,
};
use crate::scoring::grade::{GradeBand, GradeScale};
use crate::scoring::rank_by_need;
use crate::sources::SourceTable;
use crate::sources::hpsa::shortage_flag;
use crate::sources::respiratory::RespiratoryReading;

/// Normalized per-county feeds for one run.
#[derive(Debug, Clone)]
pub struct CountySources {
    pub aqi: SourceTable,
    pub hpsa: SourceTable,
    pub places: SourceTable,
    pub nri: SourceTable,
    pub respiratory: RespiratoryReading,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCounty {
    pub fips: String,
    pub state: String,
    pub county: String,
    pub raw: RawSignals,
    pub hpsa_primary_care_flag: u8,
    pub respiratory_label: String,
    pub components: ComponentScores,
    pub composite_score: f64,
    pub missing: MissingFlags,
    pub grade: GradeBand,
}

pub struct CountyScorer {
    weights: WeightSchedule,
    grades: GradeScale,
}

impl CountyScorer {
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            weights: config.weights,
            grades: config.grade_scale.clone(),
        }
    }

    /// Scores every target county, highest need first. Ties keep the
    /// configured county order.
    #[tracing::instrument(skip_all, fields(counties = counties.len()))]
    pub fn score_all(&self, counties: &[CountyInfo], sources: &CountySources) -> Vec<ScoredCounty> {
        for table in [&sources.aqi, &sources.hpsa, &sources.places, &sources.nri] {
            if table.is_missing() {
                warn!(source = %table.kind, "Source missing, components default to zero");
            }
        }
        if sources.respiratory.missing {
            warn!(
                label = %sources.respiratory.label,
                "Respiratory activity missing, using fallback level"
            );
        }

        let mut scored: Vec<ScoredCounty> = counties
            .iter()
            .map(|info| self.score_county(info, sources))
            .collect();

        rank_by_need(&mut scored, |c| c.composite_score);
        info!(scored = scored.len(), "County scoring complete");
        scored
    }

    fn score_county(&self, info: &CountyInfo, sources: &CountySources) -> ScoredCounty {
        let raw = RawSignals {
            unhealthy_aqi_days: sources.aqi.get(&info.fips),
            hpsa_primary_care_max: sources.hpsa.get(&info.fips),
            chronic_disease_prevalence: sources.places.get(&info.fips),
            hazard_risk_score: sources.nri.get(&info.fips),
            respiratory_score: Some(sources.respiratory.score),
        };

        let mut missing = MissingFlags::default();
        missing.set(Component::AirQuality, raw.unhealthy_aqi_days.is_none());
        missing.set(Component::PrimaryCare, raw.hpsa_primary_care_max.is_none());
        missing.set(Component::ChronicDisease, raw.chronic_disease_prevalence.is_none());
        missing.set(Component::Hazard, raw.hazard_risk_score.is_none());
        missing.set(Component::Respiratory, sources.respiratory.missing);

        if missing.any() {
            debug!(fips = %info.fips, missing = %missing.describe(), "County has substituted inputs");
        }

        self.build(info, raw, missing, &sources.respiratory.label)
    }

    /// Scores one county from already-joined signals.
    pub fn build(
        &self,
        info: &CountyInfo,
        raw: RawSignals,
        missing: MissingFlags,
        respiratory_label: &str,
    ) -> ScoredCounty {
        let components = self.weights.score(&raw);
        let composite_score = components.composite();

        ScoredCounty {
            fips: info.fips.clone(),
            state: info.state.clone(),
            county: info.county.clone(),
            raw,
            hpsa_primary_care_flag: shortage_flag(raw.hpsa_primary_care_max),
            respiratory_label: respiratory_label.to_string(),
            components,
            composite_score,
            missing,
            grade: self.grades.grade(composite_score).clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::SourceKind;
    use std::collections::BTreeMap;

    fn table(kind: SourceKind, entries: &[(&str, f64)]) -> SourceTable {
        let values: BTreeMap<String, f64> =
            entries.iter().map(|(k, v)| (k.to_string(), *v)).collect();
        SourceTable::from_values(kind, values)
    }

    fn moderate() -> RespiratoryReading {
        ScoringConfig::default().respiratory_scale.read(Some("Moderate"))
    }

    #[test]
    fn test_duval_ranks_above_nassau() {
        let config = ScoringConfig::default();
        let sources = CountySources {
            aqi: table(SourceKind::Aqi, &[("12031", 10.0), ("12089", 0.0)]),
            hpsa: table(SourceKind::Hpsa, &[("12031", 25.0), ("12089", 0.0)]),
            places: table(SourceKind::Places, &[("12031", 30.0), ("12089", 10.0)]),
            nri: table(SourceKind::Nri, &[("12031", 80.0), ("12089", 20.0)]),
            respiratory: moderate(),
        };
        let counties = vec![
            CountyInfo::new("12089", "Florida", "Nassau"),
            CountyInfo::new("12031", "Florida", "Duval"),
        ];

        let scored = CountyScorer::new(&config).score_all(&counties, &sources);

        assert_eq!(scored[0].county, "Duval");
        assert_eq!(scored[0].composite_score, 70.5);
        assert_eq!(scored[1].county, "Nassau");
        // 0 + 0 + 6 + 3 + 5.5
        assert_eq!(scored[1].composite_score, 14.5);
        assert!(scored[0].composite_score > scored[1].composite_score);
        assert_eq!(scored[0].hpsa_primary_care_flag, 1);
        assert_eq!(scored[1].hpsa_primary_care_flag, 0);
        assert_eq!(scored[0].grade.letter, "F");
    }

    #[test]
    fn test_missing_source_flags_every_county() {
        let config = ScoringConfig::default();
        let sources = CountySources {
            aqi: SourceTable::missing(SourceKind::Aqi, "fetch failed"),
            hpsa: table(SourceKind::Hpsa, &[("12031", 10.0)]),
            places: table(SourceKind::Places, &[("12031", 20.0)]),
            nri: table(SourceKind::Nri, &[("12031", 50.0)]),
            respiratory: config.respiratory_scale.read(None),
        };

        let scored = CountyScorer::new(&config).score_all(&config.counties, &sources);

        assert_eq!(scored.len(), 5);
        for county in &scored {
            assert!(county.missing.air_quality);
            assert!(county.missing.respiratory);
            assert_eq!(county.components.air_quality, 0.0);
            assert_eq!(county.components.respiratory, 2.0);
        }
        let duval = scored.iter().find(|c| c.fips == "12031").unwrap();
        assert!(!duval.missing.primary_care);
        let clay = scored.iter().find(|c| c.fips == "12019").unwrap();
        assert!(clay.missing.primary_care);
        assert_eq!(clay.missing.describe(), "air_quality;primary_care;chronic_disease;hazard;respiratory");
    }

    #[test]
    fn test_ties_keep_input_order() {
        let config = ScoringConfig::default();
        let sources = CountySources {
            aqi: SourceTable::missing(SourceKind::Aqi, "none"),
            hpsa: SourceTable::missing(SourceKind::Hpsa, "none"),
            places: SourceTable::missing(SourceKind::Places, "none"),
            nri: SourceTable::missing(SourceKind::Nri, "none"),
            respiratory: moderate(),
        };

        let scored = CountyScorer::new(&config).score_all(&config.counties, &sources);

        let order: Vec<_> = scored.iter().map(|c| c.fips.as_str()).collect();
        assert_eq!(order, vec!["12031", "12019", "12109", "12089", "12003"]);
    }

    #[test]
    fn test_composite_is_sum_of_components() {
        let config = ScoringConfig::default();
        let scorer = CountyScorer::new(&config);
        let raw = RawSignals {
            unhealthy_aqi_days: Some(7.0),
            hpsa_primary_care_max: Some(13.0),
            chronic_disease_prevalence: Some(27.3),
            hazard_risk_score: Some(61.2),
            respiratory_score: Some(3.5),
        };
        let county = scorer.build(&config.counties[0], raw, MissingFlags::default(), "Low");
        assert!((county.composite_score - county.components.total()).abs() <= 0.05);
    }
}
