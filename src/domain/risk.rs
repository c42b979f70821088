///! Scenario risk scoring
///! Linear weighted sum of the five numeric sliders, bucketed into four levels.
use crate::domain::models::{RiskLevel, ScenarioParameters};

const RAINFALL_MAX: f64 = 100.0;
const RIVER_LEVEL_MAX: f64 = 10.0;
const PERCENT_MAX: f64 = 100.0;

const RAINFALL_WEIGHT: f64 = 0.30;
const RIVER_LEVEL_WEIGHT: f64 = 0.25;
const SOIL_SATURATION_WEIGHT: f64 = 0.20;
const URBANIZATION_WEIGHT: f64 = 0.15;
const DRAINAGE_WEIGHT: f64 = 0.10;

// Upper bounds (exclusive) of the low/moderate/high buckets
const LOW_BELOW: f64 = 0.30;
const MODERATE_BELOW: f64 = 0.60;
const HIGH_BELOW: f64 = 0.80;

pub const DURATION_MIN_HOURS: u32 = 1;
pub const DURATION_MAX_HOURS: u32 = 24;

pub struct RiskScorer;

impl RiskScorer {
    /// Weighted score in [0, 1]. Inputs are clamped to their slider ranges first.
    pub fn score(params: &ScenarioParameters) -> f64 {
        let p = clamp_parameters(params);

        let rainfall = p.rainfall / RAINFALL_MAX;
        let river_level = p.river_level / RIVER_LEVEL_MAX;
        let soil_saturation = p.soil_saturation / PERCENT_MAX;
        let urbanization = p.urbanization / PERCENT_MAX;
        // Drainage is inverted: more capacity, less risk
        let drainage_deficit = (PERCENT_MAX - p.drainage_capacity) / PERCENT_MAX;

        RAINFALL_WEIGHT * rainfall
            + RIVER_LEVEL_WEIGHT * river_level
            + SOIL_SATURATION_WEIGHT * soil_saturation
            + URBANIZATION_WEIGHT * urbanization
            + DRAINAGE_WEIGHT * drainage_deficit
    }

    pub fn level_for_score(score: f64) -> RiskLevel {
        if score < LOW_BELOW {
            RiskLevel::Low
        } else if score < MODERATE_BELOW {
            RiskLevel::Moderate
        } else if score < HIGH_BELOW {
            RiskLevel::High
        } else {
            RiskLevel::Critical
        }
    }

    pub fn risk_level(params: &ScenarioParameters) -> RiskLevel {
        Self::level_for_score(Self::score(params))
    }
}

fn clamp_unit(value: f64, max: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, max)
}

/// Pulls every numeric parameter back into its documented range.
pub fn clamp_parameters(params: &ScenarioParameters) -> ScenarioParameters {
    ScenarioParameters {
        rainfall: clamp_unit(params.rainfall, RAINFALL_MAX),
        river_level: clamp_unit(params.river_level, RIVER_LEVEL_MAX),
        soil_saturation: clamp_unit(params.soil_saturation, PERCENT_MAX),
        urbanization: clamp_unit(params.urbanization, PERCENT_MAX),
        drainage_capacity: clamp_unit(params.drainage_capacity, PERCENT_MAX),
        duration: params.duration.clamp(DURATION_MIN_HOURS, DURATION_MAX_HOURS),
        ..*params
    }
}
