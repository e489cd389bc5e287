//! The five-component need formula shared by counties and schools.
//!
//! | Component       | Raw input                    | Cap    | Points |
//! |-----------------|------------------------------|--------|--------|
//! | Air quality     | unhealthy-or-worse AQI days  | 30     | 15     |
//! | Primary care    | HPSA primary-care max        | 25     | 30     |
//! | Chronic disease | PLACES mean prevalence (%)   | 50     | 30     |
//! | Hazard          | NRI risk score               | 100    | 15     |
//! | Respiratory     | mapped activity score        | 10     | 10     |
//!
//! A missing raw value scores as 0 before clipping; it is never dropped
//! from the sum. Only the composite is rounded.

use serde::{Deserialize, Serialize};

use crate::scoring::utility::round_to;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Component {
    AirQuality,
    PrimaryCare,
    ChronicDisease,
    Hazard,
    Respiratory,
}

impl Component {
    pub const ALL: [Component; 5] = [
        Component::AirQuality,
        Component::PrimaryCare,
        Component::ChronicDisease,
        Component::Hazard,
        Component::Respiratory,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Component::AirQuality => "air_quality",
            Component::PrimaryCare => "primary_care",
            Component::ChronicDisease => "chronic_disease",
            Component::Hazard => "hazard",
            Component::Respiratory => "respiratory",
        }
    }
}

/// Clip the raw value to `[0, cap]`, then scale to `[0, max_points]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComponentRule {
    pub cap: f64,
    pub max_points: f64,
}

impl ComponentRule {
    pub const fn new(cap: f64, max_points: f64) -> Self {
        Self { cap, max_points }
    }

    pub fn score(&self, raw: Option<f64>) -> f64 {
        if self.cap <= 0.0 {
            return 0.0;
        }
        let value = raw.filter(|v| !v.is_nan()).unwrap_or(0.0);
        value.clamp(0.0, self.cap) / self.cap * self.max_points
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightSchedule {
    pub air_quality: ComponentRule,
    pub primary_care: ComponentRule,
    pub chronic_disease: ComponentRule,
    pub hazard: ComponentRule,
    pub respiratory: ComponentRule,
}

impl Default for WeightSchedule {
    fn default() -> Self {
        Self {
            air_quality: ComponentRule::new(30.0, 15.0),
            primary_care: ComponentRule::new(25.0, 30.0),
            chronic_disease: ComponentRule::new(50.0, 30.0),
            hazard: ComponentRule::new(100.0, 15.0),
            respiratory: ComponentRule::new(10.0, 10.0),
        }
    }
}

impl WeightSchedule {
    pub fn rule(&self, component: Component) -> ComponentRule {
        match component {
            Component::AirQuality => self.air_quality,
            Component::PrimaryCare => self.primary_care,
            Component::ChronicDisease => self.chronic_disease,
            Component::Hazard => self.hazard,
            Component::Respiratory => self.respiratory,
        }
    }

    pub fn total_points(&self) -> f64 {
        Component::ALL.iter().map(|c| self.rule(*c).max_points).sum()
    }

    pub fn score(&self, raw: &RawSignals) -> ComponentScores {
        ComponentScores {
            air_quality: self.air_quality.score(raw.unhealthy_aqi_days),
            primary_care: self.primary_care.score(raw.hpsa_primary_care_max),
            chronic_disease: self.chronic_disease.score(raw.chronic_disease_prevalence),
            hazard: self.hazard.score(raw.hazard_risk_score),
            respiratory: self.respiratory.score(raw.respiratory_score),
        }
    }
}

/// Unscored inputs for one entity. `None` means no data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RawSignals {
    pub unhealthy_aqi_days: Option<f64>,
    pub hpsa_primary_care_max: Option<f64>,
    pub chronic_disease_prevalence: Option<f64>,
    pub hazard_risk_score: Option<f64>,
    pub respiratory_score: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ComponentScores {
    pub air_quality: f64,
    pub primary_care: f64,
    pub chronic_disease: f64,
    pub hazard: f64,
    pub respiratory: f64,
}

impl ComponentScores {
    pub fn get(&self, component: Component) -> f64 {
        match component {
            Component::AirQuality => self.air_quality,
            Component::PrimaryCare => self.primary_care,
            Component::ChronicDisease => self.chronic_disease,
            Component::Hazard => self.hazard,
            Component::Respiratory => self.respiratory,
        }
    }

    /// Unrounded sum of the five components.
    pub fn total(&self) -> f64 {
        Component::ALL.iter().map(|c| self.get(*c)).sum()
    }

    /// The canonical composite: the sum rounded once to 1 decimal.
    pub fn composite(&self) -> f64 {
        round_to(self.total(), 1)
    }
}

/// Which components were scored from a substituted zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MissingFlags {
    pub air_quality: bool,
    pub primary_care: bool,
    pub chronic_disease: bool,
    pub hazard: bool,
    pub respiratory: bool,
}

impl MissingFlags {
    pub fn set(&mut self, component: Component, missing: bool) {
        let slot = match component {
            Component::AirQuality => &mut self.air_quality,
            Component::PrimaryCare => &mut self.primary_care,
            Component::ChronicDisease => &mut self.chronic_disease,
            Component::Hazard => &mut self.hazard,
            Component::Respiratory => &mut self.respiratory,
        };
        *slot = missing;
    }

    pub fn is_set(&self, component: Component) -> bool {
        match component {
            Component::AirQuality => self.air_quality,
            Component::PrimaryCare => self.primary_care,
            Component::ChronicDisease => self.chronic_disease,
            Component::Hazard => self.hazard,
            Component::Respiratory => self.respiratory,
        }
    }

    pub fn any(&self) -> bool {
        Component::ALL.iter().any(|c| self.is_set(*c))
    }

    /// `;`-joined component names, empty when nothing is missing.
    pub fn describe(&self) -> String {
        Component::ALL
            .iter()
            .filter(|c| self.is_set(**c))
            .map(|c| c.name())
            .collect::<Vec<_>>()
            .join(";")
    }
}
