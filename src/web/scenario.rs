use crate::domain::models::FloodScenario;
use crate::domain::scenario::{ParameterUpdate, ScenarioBuilder};
use crate::domain::session::SessionRunner;
use crate::state::{slot_drafts, SharedState};
use crate::store::{self, StoreKey};
use crate::web::error::WebError;
use crate::web::require_profile;
use crate::web::slot::Slot;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(current))
        .route("/preset", post(apply_preset))
        .route("/parameters", patch(update_parameters))
        .route("/catchment", post(set_catchment))
        .route("/name", post(rename))
        .route("/reset", post(reset))
        .route("/submit", post(submit))
        .with_state(state)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BuilderView {
    draft: FloodScenario,
    selected_preset: Option<String>,
    is_modified: bool,
    status: Option<String>,
    score: f64,
    risk_description: &'static str,
}

impl BuilderView {
    fn of(builder: &ScenarioBuilder) -> Self {
        Self {
            draft: builder.draft().clone(),
            selected_preset: builder.selected_preset().map(str::to_string),
            is_modified: builder.is_modified(),
            status: builder.status_label(),
            score: builder.score(),
            risk_description: builder.draft().risk_level.description(),
        }
    }
}

#[derive(Deserialize)]
struct PresetPayload {
    name: String,
}

#[derive(Deserialize)]
struct CatchmentPayload {
    catchment: String,
}

#[derive(Deserialize)]
struct NamePayload {
    name: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitResponse {
    scenario: FloodScenario,
    next: &'static str,
}

/// Runs `edit` against the slot's builder once the profile precondition holds.
async fn with_builder<F>(state: &SharedState, slot: Uuid, edit: F) -> Result<Json<BuilderView>, WebError>
where
    F: FnOnce(&mut ScenarioBuilder) -> Result<(), WebError>,
{
    require_profile(state, slot).await?;
    let mut drafts = state.drafts.write().await;
    let builder = &mut slot_drafts(&mut drafts, slot).builder;
    edit(builder)?;
    Ok(Json(BuilderView::of(builder)))
}

async fn current(
    Slot(slot): Slot,
    State(state): State<SharedState>,
) -> Result<Json<BuilderView>, WebError> {
    with_builder(&state, slot, |_| Ok(())).await
}

async fn apply_preset(
    Slot(slot): Slot,
    State(state): State<SharedState>,
    Json(payload): Json<PresetPayload>,
) -> Result<Json<BuilderView>, WebError> {
    with_builder(&state, slot, |builder| {
        builder.apply_preset(&payload.name)?;
        tracing::debug!("Slot {} applied preset {}", slot, payload.name);
        Ok(())
    })
    .await
}

async fn update_parameters(
    Slot(slot): Slot,
    State(state): State<SharedState>,
    Json(update): Json<ParameterUpdate>,
) -> Result<Json<BuilderView>, WebError> {
    with_builder(&state, slot, |builder| {
        builder.update_parameters(&update);
        Ok(())
    })
    .await
}

async fn set_catchment(
    Slot(slot): Slot,
    State(state): State<SharedState>,
    Json(payload): Json<CatchmentPayload>,
) -> Result<Json<BuilderView>, WebError> {
    with_builder(&state, slot, |builder| Ok(builder.set_catchment(&payload.catchment)?)).await
}

async fn rename(
    Slot(slot): Slot,
    State(state): State<SharedState>,
    Json(payload): Json<NamePayload>,
) -> Result<Json<BuilderView>, WebError> {
    with_builder(&state, slot, |builder| Ok(builder.rename(&payload.name)?)).await
}

async fn reset(
    Slot(slot): Slot,
    State(state): State<SharedState>,
) -> Result<Json<BuilderView>, WebError> {
    with_builder(&state, slot, |builder| {
        builder.reset_to_custom();
        Ok(())
    })
    .await
}

async fn submit(
    Slot(slot): Slot,
    State(state): State<SharedState>,
) -> Result<(StatusCode, Json<SubmitResponse>), WebError> {
    require_profile(&state, slot).await?;

    let scenario = {
        let mut drafts = state.drafts.write().await;
        slot_drafts(&mut drafts, slot).builder.finalize(Utc::now())
    };

    // On failure the builder draft is untouched, so the client can simply retry
    store::save(state.store.as_ref(), slot, StoreKey::FloodScenario, &scenario).await?;

    {
        // Starting over with a new scenario replaces any unfinished run
        let mut drafts = state.drafts.write().await;
        let entry = slot_drafts(&mut drafts, slot);
        entry.runner = SessionRunner::new();
        entry.unsaved_session = None;
    }

    tracing::info!(
        "Scenario {:?} submitted for slot {} (risk {})",
        scenario.id,
        slot,
        scenario.risk_level.as_str()
    );

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            scenario,
            next: super::SESSION_PATH,
        }),
    ))
}
