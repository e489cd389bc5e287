//! School-level scoring.
//!
//! Air quality, primary care, hazard and respiratory come from the school's
//! county and are identical for every school in it. Chronic disease comes
//! from the school's own census tract; a school without tract data scores
//! 0 there and is flagged, it does not borrow the county average.

use serde::Serialize;
use std::collections::HashMap;
use tracing::{info, warn};

use crate::config::ScoringConfig;
use crate::scoring::components::{
    Component, ComponentScores, MissingFlags, RawSignals, WeightSchedule,
};
use crate::scoring::county::ScoredCounty;
use crate::scoring::rank_by_need;
use crate::scoring::utility::median;
use crate::sources::SourceTable;
use crate::sources::respiratory::RespiratoryScale;
use crate::sources::schools::SchoolRecord;

/// Where a school's chronic-disease value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChronicSource {
    Tract,
    /// The school was never geocoded to a tract.
    NoTract,
    /// Geocoded, but PLACES has no value for the tract.
    TractUnmatched,
}

impl ChronicSource {
    pub fn as_str(self) -> &'static str {
        match self {
            ChronicSource::Tract => "tract",
            ChronicSource::NoTract => "no_tract",
            ChronicSource::TractUnmatched => "tract_unmatched",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredSchool {
    pub school: SchoolRecord,
    pub raw: RawSignals,
    pub chronic_source: ChronicSource,
    pub components: ComponentScores,
    pub composite_score: f64,
    pub missing: MissingFlags,
    /// Chronic prevalence and HPSA both above the table's medians.
    pub dual_burden: bool,
}

pub struct SchoolScorer {
    weights: WeightSchedule,
    respiratory: RespiratoryScale,
}

impl SchoolScorer {
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            weights: config.weights,
            respiratory: config.respiratory_scale.clone(),
        }
    }

    /// Scores every school, highest need first; ties keep directory order.
    #[tracing::instrument(skip_all, fields(schools = schools.len()))]
    pub fn score_all(
        &self,
        schools: &[SchoolRecord],
        counties: &[ScoredCounty],
        tracts: &SourceTable,
    ) -> Vec<ScoredSchool> {
        let by_fips: HashMap<&str, &ScoredCounty> =
            counties.iter().map(|c| (c.fips.as_str(), c)).collect();

        let mut scored: Vec<ScoredSchool> = schools
            .iter()
            .map(|school| self.score_school(school, by_fips.get(school.county_fips.as_str()).copied(), tracts))
            .collect();

        mark_dual_burden(&mut scored);
        rank_by_need(&mut scored, |s| s.composite_score);

        let with_tract = scored
            .iter()
            .filter(|s| s.chronic_source == ChronicSource::Tract)
            .count();
        info!(
            scored = scored.len(),
            with_tract_data = with_tract,
            "School scoring complete"
        );
        scored
    }

    pub fn score_school(
        &self,
        school: &SchoolRecord,
        county: Option<&ScoredCounty>,
        tracts: &SourceTable,
    ) -> ScoredSchool {
        let mut missing = MissingFlags::default();

        let mut raw = match county {
            Some(c) => {
                for component in [
                    Component::AirQuality,
                    Component::PrimaryCare,
                    Component::Hazard,
                    Component::Respiratory,
                ] {
                    missing.set(component, c.missing.is_set(component));
                }
                RawSignals {
                    chronic_disease_prevalence: None,
                    ..c.raw
                }
            }
            None => {
                warn!(
                    school_id = %school.school_id,
                    county_fips = %school.county_fips,
                    "No county row for school, county components default"
                );
                for component in [
                    Component::AirQuality,
                    Component::PrimaryCare,
                    Component::Hazard,
                    Component::Respiratory,
                ] {
                    missing.set(component, true);
                }
                RawSignals {
                    respiratory_score: Some(self.respiratory.fallback().score),
                    ..RawSignals::default()
                }
            }
        };

        let (prevalence, chronic_source) = match &school.census_tract {
            None => (None, ChronicSource::NoTract),
            Some(tract) => match tracts.get(tract) {
                Some(value) => (Some(value), ChronicSource::Tract),
                None => (None, ChronicSource::TractUnmatched),
            },
        };
        raw.chronic_disease_prevalence = prevalence;
        missing.set(Component::ChronicDisease, prevalence.is_none());

        let components = self.weights.score(&raw);

        ScoredSchool {
            school: school.clone(),
            raw,
            chronic_source,
            components,
            composite_score: components.composite(),
            missing,
            dual_burden: false,
        }
    }
}

fn mark_dual_burden(schools: &mut [ScoredSchool]) {
    let chronic_median = median(schools.iter().map(|s| s.raw.chronic_disease_prevalence));
    let hpsa_median = median(schools.iter().map(|s| s.raw.hpsa_primary_care_max));

    let (Some(chronic_median), Some(hpsa_median)) = (chronic_median, hpsa_median) else {
        return;
    };

    for school in schools.iter_mut() {
        let high_chronic = school
            .raw
            .chronic_disease_prevalence
            .is_some_and(|v| v > chronic_median);
        let high_shortage = school
            .raw
            .hpsa_primary_care_max
            .is_some_and(|v| v > hpsa_median);
        school.dual_burden = high_chronic && high_shortage;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CountyInfo;
    use crate::scoring::county::CountyScorer;
    use crate::sources::SourceKind;
    use std::collections::BTreeMap;

    fn county(config: &ScoringConfig, fips: &str, raw: RawSignals) -> ScoredCounty {
        let info = config.county_by_fips(fips).cloned().unwrap_or_else(|| CountyInfo::new(fips, "Florida", "?"));
        CountyScorer::new(config).build(&info, raw, MissingFlags::default(), "Moderate")
    }

    fn school(id: &str, fips: &str, tract: Option<&str>) -> SchoolRecord {
        SchoolRecord {
            school_id: id.to_string(),
            name: format!("School {id}"),
            county_fips: fips.to_string(),
            county: "Duval".to_string(),
            enrollment: Some(500),
            census_tract: tract.map(str::to_string),
        }
    }

    fn tracts(entries: &[(&str, f64)]) -> SourceTable {
        let values: BTreeMap<String, f64> =
            entries.iter().map(|(k, v)| (k.to_string(), *v)).collect();
        SourceTable::from_values(SourceKind::TractPlaces, values)
    }

    fn duval_raw() -> RawSignals {
        RawSignals {
            unhealthy_aqi_days: Some(10.0),
            hpsa_primary_care_max: Some(25.0),
            chronic_disease_prevalence: Some(30.0),
            hazard_risk_score: Some(80.0),
            respiratory_score: Some(5.5),
        }
    }

    #[test]
    fn test_inherits_county_components() {
        let config = ScoringConfig::default();
        let counties = vec![county(&config, "12031", duval_raw())];
        let schools = vec![
            school("a", "12031", Some("12031000100")),
            school("b", "12031", None),
        ];
        let scored = SchoolScorer::new(&config).score_all(
            &schools,
            &counties,
            &tracts(&[("12031000100", 40.0)]),
        );

        let a = scored.iter().find(|s| s.school.school_id == "a").unwrap();
        let b = scored.iter().find(|s| s.school.school_id == "b").unwrap();
        for c in [
            Component::AirQuality,
            Component::PrimaryCare,
            Component::Hazard,
            Component::Respiratory,
        ] {
            assert_eq!(a.components.get(c), b.components.get(c));
            assert_eq!(a.components.get(c), counties[0].components.get(c));
        }
        // 5 + 30 + 24 + 12 + 5.5
        assert_eq!(a.composite_score, 76.5);
        assert_eq!(a.chronic_source, ChronicSource::Tract);
    }

    #[test]
    fn test_no_tract_scores_zero_not_county_average() {
        let config = ScoringConfig::default();
        let counties = vec![county(&config, "12031", duval_raw())];
        let scored = SchoolScorer::new(&config).score_all(
            &[school("b", "12031", None)],
            &counties,
            &tracts(&[]),
        );

        let b = &scored[0];
        assert_eq!(b.components.chronic_disease, 0.0);
        assert_eq!(b.raw.chronic_disease_prevalence, None);
        assert!(b.missing.chronic_disease);
        assert_eq!(b.chronic_source, ChronicSource::NoTract);
        assert_eq!(b.composite_score, 52.5);
    }

    #[test]
    fn test_unmatched_tract_is_flagged() {
        let config = ScoringConfig::default();
        let counties = vec![county(&config, "12031", duval_raw())];
        let scored = SchoolScorer::new(&config).score_all(
            &[school("c", "12031", Some("12031999999"))],
            &counties,
            &tracts(&[("12031000100", 40.0)]),
        );
        assert_eq!(scored[0].chronic_source, ChronicSource::TractUnmatched);
        assert!(scored[0].missing.chronic_disease);
    }

    #[test]
    fn test_unknown_county_defaults_and_flags() {
        let config = ScoringConfig::default();
        let scored = SchoolScorer::new(&config).score_all(
            &[school("x", "12999", Some("12999000100"))],
            &[],
            &tracts(&[("12999000100", 25.0)]),
        );
        let x = &scored[0];
        assert!(x.missing.air_quality && x.missing.primary_care && x.missing.hazard && x.missing.respiratory);
        assert!(!x.missing.chronic_disease);
        assert_eq!(x.components.respiratory, 2.0);
        assert_eq!(x.composite_score, 17.0);
    }

    #[test]
    fn test_dual_burden_above_both_medians() {
        let config = ScoringConfig::default();
        let mut low = duval_raw();
        low.hpsa_primary_care_max = Some(5.0);
        let counties = vec![county(&config, "12031", duval_raw()), county(&config, "12019", low)];
        let schools = vec![
            school("hi", "12031", Some("t1")),
            school("mid", "12031", Some("t2")),
            school("lo", "12019", Some("t3")),
        ];
        let tract_table = SourceTable::from_values(
            SourceKind::TractPlaces,
            [("t1", 40.0), ("t2", 20.0), ("t3", 45.0)]
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect(),
        );
        let scored = SchoolScorer::new(&config).score_all(&schools, &counties, &tract_table);
        let flagged: Vec<_> = scored
            .iter()
            .filter(|s| s.dual_burden)
            .map(|s| s.school.school_id.as_str())
            .collect();
        // chronic median 40, hpsa median 25: nothing is strictly above both
        assert!(flagged.is_empty());

        let schools = vec![school("hi", "12031", Some("t3")), school("lo", "12019", Some("t2"))];
        let scored = SchoolScorer::new(&config).score_all(&schools, &counties, &tract_table);
        let hi = scored.iter().find(|s| s.school.school_id == "hi").unwrap();
        assert!(hi.dual_burden);
    }
}
