//! Need scoring, grading and nurse-staffing simulation.
//!
//! Counties and schools share one weight schedule ([`components`]). Schools
//! inherit four of the five signals from their county and use their own
//! census tract for chronic disease. Nurse coverage is drawn per school
//! after scoring and folds into an unmet-need score.

pub mod components;
pub mod county;
pub mod grade;
pub mod nurse;
pub mod school;
pub mod types;
pub mod utility;

/// Sorts highest need first. The sort is stable, so equal scores keep
/// their input order.
pub fn rank_by_need<T>(rows: &mut [T], score: impl Fn(&T) -> f64) {
    rows.sort_by(|a, b| score(b).total_cmp(&score(a)));
}
