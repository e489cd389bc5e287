//! Flat rows written to the scorecard CSVs and history snapshots.

use serde::{Deserialize, Serialize};

use crate::scoring::county::ScoredCounty;
use crate::scoring::nurse::{NurseStatus, StaffedSchool};

/// One row of `scorecard.csv`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CountyScoreRow {
    pub(crate) fips: String,
    pub(crate) state: String,
    pub(crate) county: String,

    pub(crate) unhealthy_aqi_days: Option<f64>,
    pub(crate) hpsa_primary_care_max: Option<f64>,
    pub(crate) hpsa_primary_care_flag: u8,
    pub(crate) chronic_disease_prevalence: Option<f64>,
    pub(crate) hazard_risk_score: Option<f64>,
    pub(crate) respiratory_activity_level: String,
    pub(crate) respiratory_score: Option<f64>,

    pub(crate) score_air_quality: f64,
    pub(crate) score_primary_care: f64,
    pub(crate) score_chronic_disease: f64,
    pub(crate) score_hazard: f64,
    pub(crate) score_respiratory: f64,

    pub(crate) composite_score: f64,
    pub(crate) letter_grade: String,
    pub(crate) grade_label: String,
    pub(crate) missing_components: String,
}

impl From<&ScoredCounty> for CountyScoreRow {
    fn from(c: &ScoredCounty) -> Self {
        Self {
            fips: c.fips.clone(),
            state: c.state.clone(),
            county: c.county.clone(),
            unhealthy_aqi_days: c.raw.unhealthy_aqi_days,
            hpsa_primary_care_max: c.raw.hpsa_primary_care_max,
            hpsa_primary_care_flag: c.hpsa_primary_care_flag,
            chronic_disease_prevalence: c.raw.chronic_disease_prevalence,
            hazard_risk_score: c.raw.hazard_risk_score,
            respiratory_activity_level: c.respiratory_label.clone(),
            respiratory_score: c.raw.respiratory_score,
            score_air_quality: c.components.air_quality,
            score_primary_care: c.components.primary_care,
            score_chronic_disease: c.components.chronic_disease,
            score_hazard: c.components.hazard,
            score_respiratory: c.components.respiratory,
            composite_score: c.composite_score,
            letter_grade: c.grade.letter.clone(),
            grade_label: c.grade.label.clone(),
            missing_components: c.missing.describe(),
        }
    }
}

/// One row of `school_scorecard.csv`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SchoolScoreRow {
    pub(crate) school_id: String,
    pub(crate) school_name: String,
    pub(crate) county_fips: String,
    pub(crate) county: String,
    pub(crate) enrollment: Option<u32>,
    pub(crate) census_tract: Option<String>,
    pub(crate) chronic_disease_prevalence: Option<f64>,
    pub(crate) chronic_source: &'static str,

    pub(crate) score_air_quality: f64,
    pub(crate) score_primary_care: f64,
    pub(crate) score_chronic_disease: f64,
    pub(crate) score_hazard: f64,
    pub(crate) score_respiratory: f64,
    pub(crate) composite_score: f64,

    pub(crate) nurse_status: NurseStatus,
    pub(crate) nurse_fte: f64,
    pub(crate) nurse_penalty: u8,
    pub(crate) unmet_need_score: f64,
    pub(crate) letter_grade: String,
    pub(crate) grade_label: String,
    pub(crate) grade_severity: &'static str,
    pub(crate) need_tier: &'static str,
    pub(crate) dual_burden: bool,
    pub(crate) recommendation: String,
    pub(crate) missing_components: String,
}

impl From<&StaffedSchool> for SchoolScoreRow {
    fn from(s: &StaffedSchool) -> Self {
        let scored = &s.scored;
        Self {
            school_id: scored.school.school_id.clone(),
            school_name: scored.school.name.clone(),
            county_fips: scored.school.county_fips.clone(),
            county: scored.school.county.clone(),
            enrollment: scored.school.enrollment,
            census_tract: scored.school.census_tract.clone(),
            chronic_disease_prevalence: scored.raw.chronic_disease_prevalence,
            chronic_source: scored.chronic_source.as_str(),
            score_air_quality: scored.components.air_quality,
            score_primary_care: scored.components.primary_care,
            score_chronic_disease: scored.components.chronic_disease,
            score_hazard: scored.components.hazard,
            score_respiratory: scored.components.respiratory,
            composite_score: scored.composite_score,
            nurse_status: s.nurse.status,
            nurse_fte: s.nurse.fte,
            nurse_penalty: s.nurse.penalty,
            unmet_need_score: s.nurse.unmet_need_score,
            letter_grade: s.grade.letter.clone(),
            grade_label: s.grade.label.clone(),
            grade_severity: s.grade.severity.as_str(),
            need_tier: s.need_tier.as_str(),
            dual_burden: scored.dual_burden,
            recommendation: s.recommendation.clone(),
            missing_components: scored.missing.describe(),
        }
    }
}

/// One row of a dated history snapshot. Counties use FIPS as `entity_id`,
/// schools their school id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRow {
    pub entity_id: String,
    pub name: String,
    pub county: String,
    pub score_air_quality: f64,
    pub score_primary_care: f64,
    pub score_chronic_disease: f64,
    pub score_hazard: f64,
    pub score_respiratory: f64,
    pub composite_score: Option<f64>,
}

impl From<&ScoredCounty> for SnapshotRow {
    fn from(c: &ScoredCounty) -> Self {
        Self {
            entity_id: c.fips.clone(),
            name: c.county.clone(),
            county: c.county.clone(),
            score_air_quality: c.components.air_quality,
            score_primary_care: c.components.primary_care,
            score_chronic_disease: c.components.chronic_disease,
            score_hazard: c.components.hazard,
            score_respiratory: c.components.respiratory,
            composite_score: Some(c.composite_score),
        }
    }
}

impl From<&StaffedSchool> for SnapshotRow {
    fn from(s: &StaffedSchool) -> Self {
        let scored = &s.scored;
        Self {
            entity_id: scored.school.school_id.clone(),
            name: scored.school.name.clone(),
            county: scored.school.county.clone(),
            score_air_quality: scored.components.air_quality,
            score_primary_care: scored.components.primary_care,
            score_chronic_disease: scored.components.chronic_disease,
            score_hazard: scored.components.hazard,
            score_respiratory: scored.components.respiratory,
            composite_score: Some(scored.composite_score),
        }
    }
}
