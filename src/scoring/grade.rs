use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Success,
    Warning,
    Danger,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Danger => "danger",
        }
    }
}

/// One band of the scale; it covers `[min, next band's min)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeBand {
    pub min: f64,
    pub letter: String,
    pub label: String,
    pub severity: Severity,
}

impl GradeBand {
    fn new(min: f64, letter: &str, label: &str, severity: Severity) -> Self {
        Self {
            min,
            letter: letter.to_string(),
            label: label.to_string(),
            severity,
        }
    }
}

/// Converts a need score into a letter grade. Lower is better.
///
/// | Range     | Grade | Label        |
/// |-----------|-------|--------------|
/// | < 25      | A     | Excellent    |
/// | [25, 35)  | B     | Good         |
/// | [35, 45)  | C     | Fair         |
/// | [45, 55)  | D     | Needs Action |
/// | >= 55     | F     | Critical     |
///
/// Scores below the first band's `min` land in the first band; anything
/// that is not below a later band's `min` (including NaN) lands in the last.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<GradeBand>", into = "Vec<GradeBand>")]
pub struct GradeScale {
    bands: Vec<GradeBand>,
}

impl Default for GradeScale {
    fn default() -> Self {
        Self::new(vec![
            GradeBand::new(0.0, "A", "Excellent", Severity::Success),
            GradeBand::new(25.0, "B", "Good", Severity::Success),
            GradeBand::new(35.0, "C", "Fair", Severity::Warning),
            GradeBand::new(45.0, "D", "Needs Action", Severity::Danger),
            GradeBand::new(55.0, "F", "Critical", Severity::Danger),
        ])
    }
}

impl From<Vec<GradeBand>> for GradeScale {
    fn from(bands: Vec<GradeBand>) -> Self {
        Self::new(bands)
    }
}

impl From<GradeScale> for Vec<GradeBand> {
    fn from(scale: GradeScale) -> Self {
        scale.bands
    }
}

impl GradeScale {
    /// Bands are sorted by `min`. An empty list falls back to the default
    /// scale so `grade` always has an answer.
    pub fn new(mut bands: Vec<GradeBand>) -> Self {
        if bands.is_empty() {
            return Self::default();
        }
        bands.sort_by(|a, b| a.min.total_cmp(&b.min));
        Self { bands }
    }

    pub fn bands(&self) -> &[GradeBand] {
        &self.bands
    }

    pub fn grade(&self, score: f64) -> &GradeBand {
        for pair in self.bands.windows(2) {
            if score < pair[1].min {
                return &pair[0];
            }
        }
        // new() never leaves the list empty
        &self.bands[self.bands.len() - 1]
    }
}
