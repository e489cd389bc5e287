//! Simulated school-nurse coverage.
//!
//! Each school gets exactly one draw from an explicitly seeded generator.
//! The draw order is the order of the slice handed to [`NurseStaffingModel::assign`],
//! so the same rows in the same order with the same seed always give the
//! same assignments. Reordering the rows reshuffles every assignment after
//! the first moved row; the pipeline records an order fingerprint so that
//! case can be spotted between runs.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, info};

use crate::scoring::grade::{GradeBand, GradeScale};
use crate::scoring::school::ScoredSchool;
use crate::scoring::utility::round_to;

/// Composite at or above which a school counts as high need in summaries.
pub const HIGH_NEED_SCORE: f64 = 45.0;

/// County share of schools with full-time, part-time and no nurse.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NurseBaseline {
    pub p_full: f64,
    pub p_part: f64,
    pub p_none: f64,
}

impl NurseBaseline {
    pub const fn new(p_full: f64, p_part: f64, p_none: f64) -> Self {
        Self {
            p_full,
            p_part,
            p_none,
        }
    }
}

/// Used only when the coverage table itself is empty.
const UNDER_RESOURCED_DEFAULT: NurseBaseline = NurseBaseline::new(0.35, 0.40, 0.25);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NurseCoverageTable {
    /// Keyed by county name.
    pub counties: BTreeMap<String, NurseBaseline>,
}

impl Default for NurseCoverageTable {
    fn default() -> Self {
        let counties = [
            ("Duval", NurseBaseline::new(0.35, 0.40, 0.25)),
            ("Clay", NurseBaseline::new(0.50, 0.35, 0.15)),
            ("St. Johns", NurseBaseline::new(0.70, 0.25, 0.05)),
            ("Nassau", NurseBaseline::new(0.80, 0.20, 0.00)),
            ("Baker", NurseBaseline::new(0.40, 0.40, 0.20)),
        ]
        .into_iter()
        .map(|(name, baseline)| (name.to_string(), baseline))
        .collect();
        Self { counties }
    }
}

impl NurseCoverageTable {
    /// The county's baseline; unknown counties get the most under-resourced one.
    pub fn baseline_for(&self, county: &str) -> NurseBaseline {
        self.counties
            .get(county)
            .or_else(|| {
                self.counties
                    .iter()
                    .find(|(name, _)| name.eq_ignore_ascii_case(county.trim()))
                    .map(|(_, b)| b)
            })
            .copied()
            .unwrap_or_else(|| self.most_under_resourced())
    }

    /// Highest chance of no nurse, then lowest chance of a full-time one.
    pub fn most_under_resourced(&self) -> NurseBaseline {
        self.counties
            .values()
            .copied()
            .max_by(|a, b| {
                a.p_none
                    .total_cmp(&b.p_none)
                    .then_with(|| b.p_full.total_cmp(&a.p_full))
            })
            .unwrap_or(UNDER_RESOURCED_DEFAULT)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaffingCosts {
    pub full_time: f64,
    pub part_time_upgrade: f64,
}

impl Default for StaffingCosts {
    fn default() -> Self {
        Self {
            full_time: 80_000.0,
            part_time_upgrade: 40_000.0,
        }
    }
}

impl StaffingCosts {
    pub fn cost_to_fill(&self, no_nurse: usize, part_time: usize) -> f64 {
        no_nurse as f64 * self.full_time + part_time as f64 * self.part_time_upgrade
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NurseStatus {
    #[serde(rename = "Full-time")]
    FullTime,
    #[serde(rename = "Part-time")]
    PartTime,
    #[default]
    #[serde(rename = "None")]
    None,
}

impl NurseStatus {
    pub fn fte(self) -> f64 {
        match self {
            NurseStatus::FullTime => 1.0,
            NurseStatus::PartTime => 0.5,
            NurseStatus::None => 0.0,
        }
    }

    pub fn penalty(self) -> u8 {
        match self {
            NurseStatus::FullTime => 0,
            NurseStatus::PartTime => 5,
            NurseStatus::None => 10,
        }
    }
}

impl fmt::Display for NurseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NurseStatus::FullTime => "Full-time",
            NurseStatus::PartTime => "Part-time",
            NurseStatus::None => "None",
        })
    }
}

/// Normalized probabilities for one school.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverageOdds {
    pub p_full: f64,
    pub p_part: f64,
    pub p_none: f64,
}

impl CoverageOdds {
    /// Full-time below `p_full`, part-time below `p_full + p_part`, else none.
    pub fn status_for(&self, draw: f64) -> NurseStatus {
        if draw < self.p_full {
            NurseStatus::FullTime
        } else if draw < self.p_full + self.p_part {
            NurseStatus::PartTime
        } else {
            NurseStatus::None
        }
    }
}

/// What the model needs to know about a school.
#[derive(Debug, Clone, Copy)]
pub struct StaffingInput<'a> {
    pub school_id: &'a str,
    pub county: &'a str,
    pub composite_score: f64,
    pub enrollment: Option<u32>,
}

impl<'a> From<&'a ScoredSchool> for StaffingInput<'a> {
    fn from(s: &'a ScoredSchool) -> Self {
        Self {
            school_id: &s.school.school_id,
            county: &s.school.county,
            composite_score: s.composite_score,
            enrollment: s.school.enrollment,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NurseAssignment {
    pub school_id: String,
    pub status: NurseStatus,
    pub fte: f64,
    pub penalty: u8,
    pub unmet_need_score: f64,
}

pub struct NurseStaffingModel {
    table: NurseCoverageTable,
}

impl NurseStaffingModel {
    pub fn new(table: NurseCoverageTable) -> Self {
        Self { table }
    }

    /// County baseline, adjusted for need then enrollment, renormalized.
    pub fn odds(&self, input: &StaffingInput<'_>) -> CoverageOdds {
        let baseline = self.table.baseline_for(input.county);
        let mut p_full = baseline.p_full;
        let p_part = baseline.p_part;
        let mut p_none = baseline.p_none;

        let score = input.composite_score;
        let (full_need, none_need) = if score > 45.0 {
            (0.6, 1.5)
        } else if score > 30.0 {
            (0.9, 1.2)
        } else {
            (1.2, 0.5)
        };
        p_full *= full_need;
        p_none *= none_need;

        if let Some(enrollment) = input.enrollment {
            if enrollment > 800 {
                p_full *= 1.3;
                p_none *= 0.5;
            } else if enrollment < 300 {
                p_full *= 0.7;
                p_none *= 1.3;
            }
        }

        let total = p_full + p_part + p_none;
        if !(total > 0.0) {
            return CoverageOdds {
                p_full: 0.0,
                p_part: 0.0,
                p_none: 1.0,
            };
        }

        CoverageOdds {
            p_full: p_full / total,
            p_part: p_part / total,
            p_none: p_none / total,
        }
    }

    /// One uniform `[0, 1)` draw per input, in slice order.
    pub fn assign<R: Rng + ?Sized>(
        &self,
        inputs: &[StaffingInput<'_>],
        rng: &mut R,
    ) -> Vec<NurseAssignment> {
        inputs
            .iter()
            .map(|input| {
                let odds = self.odds(input);
                let draw: f64 = rng.random();
                let status = odds.status_for(draw);
                debug!(school_id = input.school_id, draw, status = %status, "Nurse draw");

                NurseAssignment {
                    school_id: input.school_id.to_string(),
                    status,
                    fte: status.fte(),
                    penalty: status.penalty(),
                    unmet_need_score: round_to(input.composite_score + f64::from(status.penalty()), 1),
                }
            })
            .collect()
    }

    /// Builds a fresh ChaCha8 generator from `seed` for this call only.
    pub fn assign_seeded(&self, inputs: &[StaffingInput<'_>], seed: u64) -> Vec<NurseAssignment> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let assignments = self.assign(inputs, &mut rng);
        info!(seed, schools = assignments.len(), "Nurse assignments drawn");
        assignments
    }
}

/// Need tier on the unmet-need score, used for dashboard filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NeedTier {
    High,
    Medium,
    Low,
}

impl NeedTier {
    pub fn from_score(score: f64) -> Self {
        if score >= 45.0 {
            NeedTier::High
        } else if score >= 30.0 {
            NeedTier::Medium
        } else {
            NeedTier::Low
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NeedTier::High => "high",
            NeedTier::Medium => "medium",
            NeedTier::Low => "low",
        }
    }
}

/// A scored school with its nurse draw and display grade.
#[derive(Debug, Clone, PartialEq)]
pub struct StaffedSchool {
    pub scored: ScoredSchool,
    pub nurse: NurseAssignment,
    /// Graded on the unmet-need score, which includes staffing.
    pub grade: GradeBand,
    pub need_tier: NeedTier,
    pub recommendation: String,
}

/// Pairs schools with their assignments (same order) and grades them.
pub fn annotate(
    schools: Vec<ScoredSchool>,
    assignments: Vec<NurseAssignment>,
    grades: &GradeScale,
    costs: &StaffingCosts,
) -> Vec<StaffedSchool> {
    schools
        .into_iter()
        .zip(assignments)
        .map(|(scored, nurse)| {
            let grade = grades.grade(nurse.unmet_need_score).clone();
            let need_tier = NeedTier::from_score(nurse.unmet_need_score);
            let recommendation = recommendation(nurse.status, &scored, costs);
            StaffedSchool {
                scored,
                nurse,
                grade,
                need_tier,
                recommendation,
            }
        })
        .collect()
}

fn recommendation(status: NurseStatus, school: &ScoredSchool, costs: &StaffingCosts) -> String {
    let score = school.composite_score;
    let full = dollars(costs.full_time);
    let upgrade = dollars(costs.part_time_upgrade);

    match status {
        NurseStatus::None if score >= 45.0 => {
            let chronic = school.raw.chronic_disease_prevalence.unwrap_or(0.0);
            let hpsa = school.raw.hpsa_primary_care_max.unwrap_or(0.0);
            format!(
                "URGENT: Place full-time nurse ({full}/year). High chronic disease ({chronic:.1}%) + doctor shortage ({hpsa:.0}) + no nurse."
            )
        }
        NurseStatus::None if score >= 30.0 => format!(
            "Priority: Place full-time nurse ({full}/year). Moderate health needs require daily monitoring currently unavailable."
        ),
        NurseStatus::None => format!(
            "Action: Place part-time nurse ({upgrade}/year). Even low-need schools benefit from on-site health support."
        ),
        NurseStatus::PartTime if score >= 45.0 => format!(
            "Upgrade: Expand to full-time nurse (+{upgrade}/year). High needs exceed part-time capacity."
        ),
        NurseStatus::PartTime => format!(
            "Consider: Upgrade to full-time nurse (+{upgrade}/year) or maintain current part-time coverage."
        ),
        NurseStatus::FullTime => {
            "Maintain: Full-time nurse coverage in place. Continue current wellness programs.".to_string()
        }
    }
}

fn dollars(amount: f64) -> String {
    let thousands = (amount / 1000.0).round() as i64;
    format!("${thousands}K")
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CountyNurseSummary {
    pub county: String,
    pub total_schools: usize,
    pub fulltime_nurses: usize,
    pub parttime_nurses: usize,
    pub no_nurse: usize,
    pub pct_with_nurse: f64,
    pub nurses_per_1000_students: f64,
    pub high_need_no_nurse: usize,
    pub estimated_cost_to_fill: f64,
}

/// Per-county coverage, counties in order of first appearance.
pub fn county_nurse_summary(schools: &[StaffedSchool], costs: &StaffingCosts) -> Vec<CountyNurseSummary> {
    let mut order: Vec<&str> = Vec::new();
    for s in schools {
        if !order.contains(&s.scored.school.county.as_str()) {
            order.push(&s.scored.school.county);
        }
    }

    order
        .into_iter()
        .map(|county| {
            let in_county: Vec<&StaffedSchool> = schools
                .iter()
                .filter(|s| s.scored.school.county == county)
                .collect();
            let count = |status: NurseStatus| in_county.iter().filter(|s| s.nurse.status == status).count();

            let total = in_county.len();
            let full = count(NurseStatus::FullTime);
            let part = count(NurseStatus::PartTime);
            let none = count(NurseStatus::None);

            let enrollment: f64 = in_county
                .iter()
                .filter_map(|s| s.scored.school.enrollment)
                .map(f64::from)
                .sum();
            let fte: f64 = in_county.iter().map(|s| s.nurse.fte).sum();
            let per_1000 = if enrollment > 0.0 {
                fte / enrollment * 1000.0
            } else {
                0.0
            };

            let high_need_no_nurse = in_county
                .iter()
                .filter(|s| s.scored.composite_score >= HIGH_NEED_SCORE && s.nurse.status == NurseStatus::None)
                .count();

            CountyNurseSummary {
                county: county.to_string(),
                total_schools: total,
                fulltime_nurses: full,
                parttime_nurses: part,
                no_nurse: none,
                pct_with_nurse: round_to((full + part) as f64 / total as f64 * 100.0, 1),
                nurses_per_1000_students: round_to(per_1000, 2),
                high_need_no_nurse,
                estimated_cost_to_fill: costs.cost_to_fill(none, part),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NurseInsights {
    pub total_schools: usize,
    pub schools_no_nurse: usize,
    pub schools_parttime: usize,
    pub pct_no_nurse: f64,
    pub high_need_no_nurse: usize,
    pub dual_burden_no_nurse: usize,
    pub cost_to_fill_gaps: f64,
    pub priority_placements: usize,
}

pub fn nurse_insights(schools: &[StaffedSchool], costs: &StaffingCosts) -> NurseInsights {
    let total = schools.len();
    let no_nurse: Vec<&StaffedSchool> = schools
        .iter()
        .filter(|s| s.nurse.status == NurseStatus::None)
        .collect();
    let part = schools
        .iter()
        .filter(|s| s.nurse.status == NurseStatus::PartTime)
        .count();
    let high_need_no_nurse = no_nurse
        .iter()
        .filter(|s| s.scored.composite_score >= HIGH_NEED_SCORE)
        .count();
    let dual_burden_no_nurse = no_nurse.iter().filter(|s| s.scored.dual_burden).count();

    NurseInsights {
        total_schools: total,
        schools_no_nurse: no_nurse.len(),
        schools_parttime: part,
        pct_no_nurse: if total == 0 {
            0.0
        } else {
            round_to(no_nurse.len() as f64 / total as f64 * 100.0, 1)
        },
        high_need_no_nurse,
        dual_burden_no_nurse,
        cost_to_fill_gaps: costs.cost_to_fill(no_nurse.len(), part),
        priority_placements: high_need_no_nurse,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::components::{ComponentScores, MissingFlags, RawSignals};
    use crate::scoring::school::ChronicSource;
    use crate::sources::schools::SchoolRecord;
    use rand::RngCore;

    struct ZeroRng;

    impl RngCore for ZeroRng {
        fn next_u32(&mut self) -> u32 {
            0
        }

        fn next_u64(&mut self) -> u64 {
            0
        }

        fn fill_bytes(&mut self, dst: &mut [u8]) {
            dst.fill(0);
        }
    }

    fn input<'a>(county: &'a str, score: f64, enrollment: Option<u32>) -> StaffingInput<'a> {
        StaffingInput {
            school_id: "s1",
            county,
            composite_score: score,
            enrollment,
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_duval_high_need_large_school_is_reproducible() {
        let model = NurseStaffingModel::new(NurseCoverageTable::default());
        let inputs = [input("Duval", 50.0, Some(1000))];

        let first = model.assign_seeded(&inputs, 42);
        let second = model.assign_seeded(&inputs, 42);

        assert_eq!(first, second);
        assert_eq!(first.len(), 1);
        let a = &first[0];
        assert_eq!(a.fte, a.status.fte());
        assert_eq!(a.penalty, a.status.penalty());
        assert!(close(a.unmet_need_score, 50.0 + f64::from(a.penalty)));
    }

    #[test]
    fn test_many_rows_reproducible_across_runs() {
        let model = NurseStaffingModel::new(NurseCoverageTable::default());
        let counties = ["Duval", "Clay", "St. Johns", "Nassau", "Baker", "Elsewhere"];
        let inputs: Vec<StaffingInput> = (0..60)
            .map(|i| input(counties[i % counties.len()], (i as f64 * 1.7) % 70.0, Some((i as u32 * 37) % 1200)))
            .collect();

        assert_eq!(model.assign_seeded(&inputs, 42), model.assign_seeded(&inputs, 42));
    }

    #[test]
    fn test_odds_follow_adjustments() {
        let model = NurseStaffingModel::new(NurseCoverageTable::default());
        // Duval, high need, large: full .35*.6*1.3=.273, part .40, none .25*1.5*.5=.1875
        let odds = model.odds(&input("Duval", 50.0, Some(1000)));
        let total = 0.273 + 0.40 + 0.1875;
        assert!(close(odds.p_full, 0.273 / total));
        assert!(close(odds.p_part, 0.40 / total));
        assert!(close(odds.p_none, 0.1875 / total));
        assert!(close(odds.p_full + odds.p_part + odds.p_none, 1.0));
    }

    #[test]
    fn test_need_tier_boundaries_are_exclusive() {
        let model = NurseStaffingModel::new(NurseCoverageTable::default());
        // 45 falls in the (30, 45] tier, 30 in the low tier.
        let at_45 = model.odds(&input("Clay", 45.0, Some(500)));
        let total = 0.50 * 0.9 + 0.35 + 0.15 * 1.2;
        assert!(close(at_45.p_full, 0.45 / total));
        let at_30 = model.odds(&input("Clay", 30.0, Some(500)));
        let total = 0.50 * 1.2 + 0.35 + 0.15 * 0.5;
        assert!(close(at_30.p_full, 0.60 / total));
    }

    #[test]
    fn test_missing_enrollment_skips_size_step() {
        let model = NurseStaffingModel::new(NurseCoverageTable::default());
        let unknown = model.odds(&input("Baker", 20.0, None));
        let mid = model.odds(&input("Baker", 20.0, Some(500)));
        assert_eq!(unknown, mid);
        let small = model.odds(&input("Baker", 20.0, Some(299)));
        assert!(small.p_full < mid.p_full);
    }

    #[test]
    fn test_unknown_county_uses_most_under_resourced() {
        let table = NurseCoverageTable::default();
        assert_eq!(table.baseline_for("Orange"), table.baseline_for("Duval"));
        assert_eq!(table.baseline_for("st. johns"), table.baseline_for("St. Johns"));
    }

    #[test]
    fn test_empty_table_falls_back() {
        let table = NurseCoverageTable {
            counties: BTreeMap::new(),
        };
        assert_eq!(table.baseline_for("Duval"), UNDER_RESOURCED_DEFAULT);
    }

    #[test]
    fn test_zero_probabilities_mean_no_nurse() {
        let mut counties = BTreeMap::new();
        counties.insert("Void".to_string(), NurseBaseline::new(0.0, 0.0, 0.0));
        let model = NurseStaffingModel::new(NurseCoverageTable { counties });
        let odds = model.odds(&input("Void", 10.0, None));
        assert_eq!(odds.status_for(0.0), NurseStatus::None);
    }

    #[test]
    fn test_draw_thresholds() {
        let odds = CoverageOdds {
            p_full: 0.3,
            p_part: 0.5,
            p_none: 0.2,
        };
        assert_eq!(odds.status_for(0.0), NurseStatus::FullTime);
        assert_eq!(odds.status_for(0.3), NurseStatus::PartTime);
        assert_eq!(odds.status_for(0.79), NurseStatus::PartTime);
        assert_eq!(odds.status_for(0.8), NurseStatus::None);
    }

    #[test]
    fn test_draws_follow_slice_order() {
        // A zero generator always draws 0.0, so every school with any
        // full-time chance gets a full-time nurse.
        let model = NurseStaffingModel::new(NurseCoverageTable::default());
        let mut rng = ZeroRng;
        let out = model.assign(&[input("Nassau", 10.0, Some(900))], &mut rng);
        assert_eq!(out[0].status, NurseStatus::FullTime);
        assert_eq!(out[0].penalty, 0);
    }

    fn staffed(id: &str, county: &str, score: f64, status: NurseStatus, enrollment: Option<u32>) -> StaffedSchool {
        let scored = ScoredSchool {
            school: SchoolRecord {
                school_id: id.to_string(),
                name: id.to_string(),
                county_fips: "12031".to_string(),
                county: county.to_string(),
                enrollment,
                census_tract: None,
            },
            raw: RawSignals::default(),
            chronic_source: ChronicSource::NoTract,
            components: ComponentScores::default(),
            composite_score: score,
            missing: MissingFlags::default(),
            dual_burden: false,
        };
        let nurse = NurseAssignment {
            school_id: id.to_string(),
            status,
            fte: status.fte(),
            penalty: status.penalty(),
            unmet_need_score: score + f64::from(status.penalty()),
        };
        annotate(vec![scored], vec![nurse], &GradeScale::default(), &StaffingCosts::default())
            .remove(0)
    }

    #[test]
    fn test_county_summary() {
        let schools = vec![
            staffed("a", "Duval", 50.0, NurseStatus::None, Some(1000)),
            staffed("b", "Duval", 20.0, NurseStatus::FullTime, Some(500)),
            staffed("c", "Clay", 40.0, NurseStatus::PartTime, None),
            staffed("d", "Duval", 35.0, NurseStatus::PartTime, Some(500)),
        ];
        let summary = county_nurse_summary(&schools, &StaffingCosts::default());

        assert_eq!(summary.len(), 2);
        let duval = &summary[0];
        assert_eq!(duval.county, "Duval");
        assert_eq!(duval.total_schools, 3);
        assert_eq!((duval.fulltime_nurses, duval.parttime_nurses, duval.no_nurse), (1, 1, 1));
        assert_eq!(duval.pct_with_nurse, 66.7);
        // 1.5 FTE over 2000 students
        assert_eq!(duval.nurses_per_1000_students, 0.75);
        assert_eq!(duval.high_need_no_nurse, 1);
        assert_eq!(duval.estimated_cost_to_fill, 120_000.0);

        let clay = &summary[1];
        assert_eq!(clay.nurses_per_1000_students, 0.0);
    }

    #[test]
    fn test_insights() {
        let schools = vec![
            staffed("a", "Duval", 50.0, NurseStatus::None, None),
            staffed("b", "Duval", 20.0, NurseStatus::None, None),
            staffed("c", "Clay", 40.0, NurseStatus::PartTime, None),
            staffed("d", "Clay", 10.0, NurseStatus::FullTime, None),
        ];
        let insights = nurse_insights(&schools, &StaffingCosts::default());
        assert_eq!(insights.total_schools, 4);
        assert_eq!(insights.schools_no_nurse, 2);
        assert_eq!(insights.pct_no_nurse, 50.0);
        assert_eq!(insights.high_need_no_nurse, 1);
        assert_eq!(insights.priority_placements, 1);
        assert_eq!(insights.cost_to_fill_gaps, 200_000.0);
    }

    #[test]
    fn test_grade_uses_unmet_need() {
        let s = staffed("a", "Duval", 40.0, NurseStatus::None, None);
        assert_eq!(s.nurse.unmet_need_score, 50.0);
        assert_eq!(s.grade.letter, "D");
        assert_eq!(s.need_tier, NeedTier::High);
        assert!(s.recommendation.starts_with("Priority"));
    }

    #[test]
    fn test_insights_empty_table() {
        let insights = nurse_insights(&[], &StaffingCosts::default());
        assert_eq!(insights.pct_no_nurse, 0.0);
    }
}
