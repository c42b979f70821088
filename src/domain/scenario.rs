use crate::domain::models::{
    FloodScenario, GeoLocation, Intensity, ScenarioParameters, TimeOfYear,
};
use crate::domain::risk::{clamp_parameters, RiskScorer};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const CUSTOM_SCENARIO_NAME: &str = "Custom Scenario";

#[derive(Debug, Clone, Serialize)]
pub struct Preset {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: ScenarioParameters,
}

#[derive(Debug, Clone, Serialize)]
pub struct Catchment {
    pub value: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub risk: &'static str,
}

pub fn presets() -> Vec<Preset> {
    vec![
        Preset {
            name: "Buller River Floods 2021",
            description: "Rainfall and storm surge causing flooding in Buller River catchment",
            parameters: ScenarioParameters {
                rainfall: 50.0,
                river_level: 1.0,
                soil_saturation: 40.0,
                urbanization: 90.0,
                drainage_capacity: 60.0,
                time_of_year: TimeOfYear::Wet,
                duration: 3,
                intensity: Intensity::High,
            },
        },
        Preset {
            name: "Buller River Floods 2022",
            description: "Rainfall and storm surge causing flooding in Buller River catchment",
            parameters: ScenarioParameters {
                rainfall: 15.0,
                river_level: 5.0,
                soil_saturation: 80.0,
                urbanization: 30.0,
                drainage_capacity: 80.0,
                time_of_year: TimeOfYear::Wet,
                duration: 12,
                intensity: Intensity::Moderate,
            },
        },
    ]
}

pub fn find_preset(name: &str) -> Option<Preset> {
    let wanted = name.trim();
    presets().into_iter().find(|p| p.name == wanted)
}

pub static CATCHMENTS: &[Catchment] = &[Catchment {
    value: "buller-river",
    name: "Buller River Catchment",
    description: "Main river system - high flood risk during heavy rainfall",
    risk: "High",
}];

pub fn is_known_catchment(value: &str) -> bool {
    CATCHMENTS.iter().any(|c| c.value == value)
}

pub fn default_scenario() -> FloodScenario {
    let parameters = ScenarioParameters {
        rainfall: 25.0,
        river_level: 2.0,
        soil_saturation: 60.0,
        urbanization: 80.0,
        drainage_capacity: 70.0,
        time_of_year: TimeOfYear::Wet,
        duration: 6,
        intensity: Intensity::Moderate,
    };
    FloodScenario {
        id: None,
        name: CUSTOM_SCENARIO_NAME.to_string(),
        location: GeoLocation {
            lat: -41.7506,
            lng: 171.6070,
            name: "Westport, New Zealand".to_string(),
        },
        catchment: "buller-river".to_string(),
        risk_level: RiskScorer::risk_level(&parameters),
        parameters,
    }
}

/// A single slider or dropdown change. Absent fields are left alone.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ParameterUpdate {
    pub rainfall: Option<f64>,
    pub river_level: Option<f64>,
    pub soil_saturation: Option<f64>,
    pub urbanization: Option<f64>,
    pub drainage_capacity: Option<f64>,
    pub time_of_year: Option<TimeOfYear>,
    pub duration: Option<u32>,
    pub intensity: Option<Intensity>,
}

impl ParameterUpdate {
    pub fn is_empty(&self) -> bool {
        self.rainfall.is_none()
            && self.river_level.is_none()
            && self.soil_saturation.is_none()
            && self.urbanization.is_none()
            && self.drainage_capacity.is_none()
            && self.time_of_year.is_none()
            && self.duration.is_none()
            && self.intensity.is_none()
    }

    fn apply_to(&self, params: &mut ScenarioParameters) {
        if let Some(v) = self.rainfall {
            params.rainfall = v;
        }
        if let Some(v) = self.river_level {
            params.river_level = v;
        }
        if let Some(v) = self.soil_saturation {
            params.soil_saturation = v;
        }
        if let Some(v) = self.urbanization {
            params.urbanization = v;
        }
        if let Some(v) = self.drainage_capacity {
            params.drainage_capacity = v;
        }
        if let Some(v) = self.time_of_year {
            params.time_of_year = v;
        }
        if let Some(v) = self.duration {
            params.duration = v;
        }
        if let Some(v) = self.intensity {
            params.intensity = v;
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ScenarioError {
    #[error("unknown preset: {0}")]
    UnknownPreset(String),
    #[error("unknown catchment: {0}")]
    UnknownCatchment(String),
    #[error("scenario name is required")]
    EmptyName,
}

/// Draft scenario plus the preset it was started from, if any.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioBuilder {
    draft: FloodScenario,
    selected_preset: Option<String>,
    is_modified: bool,
}

impl Default for ScenarioBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ScenarioBuilder {
    pub fn new() -> Self {
        Self {
            draft: default_scenario(),
            selected_preset: None,
            is_modified: false,
        }
    }

    pub fn draft(&self) -> &FloodScenario {
        &self.draft
    }

    pub fn selected_preset(&self) -> Option<&str> {
        self.selected_preset.as_deref()
    }

    pub fn is_modified(&self) -> bool {
        self.is_modified
    }

    pub fn apply_preset(&mut self, name: &str) -> Result<(), ScenarioError> {
        let preset = find_preset(name).ok_or_else(|| ScenarioError::UnknownPreset(name.to_string()))?;
        self.draft.name = preset.name.to_string();
        self.draft.parameters = preset.parameters;
        self.selected_preset = Some(preset.name.to_string());
        self.is_modified = false;
        self.recompute_risk();
        Ok(())
    }

    /// Applies a parameter edit. Editing a preset marks it as a custom variation.
    pub fn update_parameters(&mut self, update: &ParameterUpdate) {
        if update.is_empty() {
            return;
        }
        update.apply_to(&mut self.draft.parameters);
        self.draft.parameters = clamp_parameters(&self.draft.parameters);
        if self.selected_preset.is_some() {
            self.is_modified = true;
        }
        self.recompute_risk();
    }

    pub fn set_catchment(&mut self, value: &str) -> Result<(), ScenarioError> {
        let value = value.trim();
        if !is_known_catchment(value) {
            return Err(ScenarioError::UnknownCatchment(value.to_string()));
        }
        self.draft.catchment = value.to_string();
        Ok(())
    }

    pub fn rename(&mut self, name: &str) -> Result<(), ScenarioError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ScenarioError::EmptyName);
        }
        self.draft.name = name.to_string();
        Ok(())
    }

    /// Drops the preset association. Parameters stay as they are.
    pub fn reset_to_custom(&mut self) {
        self.selected_preset = None;
        self.is_modified = false;
        self.draft.name = CUSTOM_SCENARIO_NAME.to_string();
    }

    /// Human-readable status line for the preset banner.
    pub fn status_label(&self) -> Option<String> {
        self.selected_preset.as_ref().map(|name| {
            if self.is_modified {
                format!("Modified \"{}\" - Your custom variation", name)
            } else {
                format!("Using preset: \"{}\"", name)
            }
        })
    }

    pub fn score(&self) -> f64 {
        RiskScorer::score(&self.draft.parameters)
    }

    /// Freezes the draft into a scenario with a fresh time-ordered id.
    pub fn finalize(&self, now: DateTime<Utc>) -> FloodScenario {
        // v7 ids cannot encode instants before the Unix epoch
        let id = match u64::try_from(now.timestamp()) {
            Ok(secs) => Uuid::new_v7(uuid::Timestamp::from_unix(
                uuid::NoContext,
                secs,
                now.timestamp_subsec_nanos(),
            )),
            Err(_) => Uuid::now_v7(),
        };
        let mut scenario = self.draft.clone();
        scenario.id = Some(id);
        scenario.risk_level = RiskScorer::risk_level(&scenario.parameters);
        scenario
    }

    fn recompute_risk(&mut self) {
        self.draft.risk_level = RiskScorer::risk_level(&self.draft.parameters);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::RiskLevel;

    #[test]
    fn test_default_draft() {
        let builder = ScenarioBuilder::new();
        assert_eq!(builder.draft().name, CUSTOM_SCENARIO_NAME);
        assert_eq!(builder.draft().catchment, "buller-river");
        assert_eq!(builder.draft().risk_level, RiskLevel::Moderate);
        assert!(builder.selected_preset().is_none());
        assert!(!builder.is_modified());
        assert!(builder.status_label().is_none());
    }

    #[test]
    fn test_apply_preset_copies_parameters() {
        let mut builder = ScenarioBuilder::new();
        builder.apply_preset("Buller River Floods 2021").unwrap();

        let draft = builder.draft();
        assert_eq!(draft.name, "Buller River Floods 2021");
        assert_eq!(draft.parameters.rainfall, 50.0);
        assert_eq!(draft.parameters.duration, 3);
        assert_eq!(draft.parameters.intensity, Intensity::High);
        assert_eq!(draft.risk_level, RiskLevel::Moderate);
        assert_eq!(builder.selected_preset(), Some("Buller River Floods 2021"));
        assert!(!builder.is_modified());
        assert_eq!(
            builder.status_label().unwrap(),
            "Using preset: \"Buller River Floods 2021\""
        );
    }

    #[test]
    fn test_unknown_preset_leaves_draft_alone() {
        let mut builder = ScenarioBuilder::new();
        let before = builder.draft().clone();
        let err = builder.apply_preset("Atlantis 3000").unwrap_err();
        assert_eq!(err, ScenarioError::UnknownPreset("Atlantis 3000".to_string()));
        assert_eq!(builder.draft(), &before);
    }

    #[test]
    fn test_edit_after_preset_marks_modified() {
        let mut builder = ScenarioBuilder::new();
        builder.apply_preset("Buller River Floods 2022").unwrap();
        builder.update_parameters(&ParameterUpdate {
            rainfall: Some(100.0),
            river_level: Some(10.0),
            ..Default::default()
        });

        assert!(builder.is_modified());
        assert_eq!(builder.selected_preset(), Some("Buller River Floods 2022"));
        // 0.30 + 0.25 + 0.16 + 0.045 + 0.02 = 0.775
        assert_eq!(builder.draft().risk_level, RiskLevel::High);
        assert!(builder.status_label().unwrap().starts_with("Modified"));

        // Re-applying clears the flag
        builder.apply_preset("Buller River Floods 2022").unwrap();
        assert!(!builder.is_modified());
    }

    #[test]
    fn test_edit_without_preset_is_not_modified() {
        let mut builder = ScenarioBuilder::new();
        builder.update_parameters(&ParameterUpdate {
            drainage_capacity: Some(0.0),
            ..Default::default()
        });
        assert!(!builder.is_modified());
        assert_eq!(builder.draft().parameters.drainage_capacity, 0.0);
    }

    #[test]
    fn test_empty_update_does_not_mark_modified() {
        let mut builder = ScenarioBuilder::new();
        builder.apply_preset("Buller River Floods 2021").unwrap();
        builder.update_parameters(&ParameterUpdate::default());
        assert!(!builder.is_modified());
    }

    #[test]
    fn test_edits_are_clamped() {
        let mut builder = ScenarioBuilder::new();
        builder.update_parameters(&ParameterUpdate {
            rainfall: Some(400.0),
            duration: Some(0),
            ..Default::default()
        });
        assert_eq!(builder.draft().parameters.rainfall, 100.0);
        assert_eq!(builder.draft().parameters.duration, 1);
    }

    #[test]
    fn test_reset_to_custom_is_idempotent() {
        let mut builder = ScenarioBuilder::new();
        builder.apply_preset("Buller River Floods 2021").unwrap();
        builder.update_parameters(&ParameterUpdate {
            soil_saturation: Some(99.0),
            ..Default::default()
        });

        builder.reset_to_custom();
        let once = builder.draft().clone();
        builder.reset_to_custom();

        assert_eq!(builder.draft(), &once);
        assert_eq!(once.name, CUSTOM_SCENARIO_NAME);
        assert_eq!(once.parameters.soil_saturation, 99.0);
        assert_eq!(once.parameters.rainfall, 50.0);
        assert!(builder.selected_preset().is_none());
        assert!(!builder.is_modified());
    }

    #[test]
    fn test_catchment_must_be_known() {
        let mut builder = ScenarioBuilder::new();
        assert!(builder.set_catchment("buller-river").is_ok());
        assert_eq!(
            builder.set_catchment("grey-river"),
            Err(ScenarioError::UnknownCatchment("grey-river".to_string()))
        );
    }

    #[test]
    fn test_finalize_assigns_id_and_risk() {
        let mut builder = ScenarioBuilder::new();
        builder.apply_preset("Buller River Floods 2021").unwrap();
        let now = Utc::now();
        let first = builder.finalize(now);
        let second = builder.finalize(now + chrono::Duration::milliseconds(5));

        assert!(first.id.is_some());
        assert_ne!(first.id, second.id);
        assert_eq!(first.risk_level, RiskScorer::risk_level(&first.parameters));
        assert_eq!(first.parameters, builder.draft().parameters);
    }

    #[test]
    fn test_finalize_before_epoch_still_gets_v7_id() {
        let builder = ScenarioBuilder::new();
        let before_epoch = DateTime::<Utc>::from_timestamp(-86_400, 0).unwrap();
        let scenario = builder.finalize(before_epoch);

        let id = scenario.id.unwrap();
        assert_eq!(id.get_version_num(), 7);
        let (secs, _) = id.get_timestamp().unwrap().to_unix();
        assert!(secs > 0);
    }
}
