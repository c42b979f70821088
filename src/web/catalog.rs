use crate::domain::models::{FloodExperience, TechProficiency, UserCategory};
use crate::domain::scenario::{presets, Catchment, Preset, CATCHMENTS};
use crate::domain::session::{ActionDefinition, EMERGENCY_ACTIONS};
use crate::state::SharedState;
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

pub fn router(state: SharedState) -> Router {
    Router::new().route("/", get(catalog)).with_state(state)
}

#[derive(Serialize)]
struct OptionEntry {
    value: &'static str,
    label: &'static str,
    description: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CatalogResponse {
    user_categories: Vec<OptionEntry>,
    flood_experience: Vec<OptionEntry>,
    tech_proficiency: Vec<OptionEntry>,
    presets: Vec<Preset>,
    catchments: &'static [Catchment],
    actions: &'static [ActionDefinition],
    forecast_app_url: String,
}

async fn catalog(State(state): State<SharedState>) -> Json<CatalogResponse> {
    Json(CatalogResponse {
        user_categories: UserCategory::ALL
            .iter()
            .map(|c| OptionEntry {
                value: c.as_str(),
                label: c.label(),
                description: c.description(),
            })
            .collect(),
        flood_experience: FloodExperience::ALL
            .iter()
            .map(|e| OptionEntry {
                value: e.as_str(),
                label: e.label(),
                description: e.description(),
            })
            .collect(),
        tech_proficiency: TechProficiency::ALL
            .iter()
            .map(|t| OptionEntry {
                value: t.as_str(),
                label: t.label(),
                description: t.description(),
            })
            .collect(),
        presets: presets(),
        catchments: CATCHMENTS,
        actions: &EMERGENCY_ACTIONS,
        forecast_app_url: state.config.forecast_app_url.clone(),
    })
}
