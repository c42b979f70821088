use crate::domain::models::{FloodScenario, GameAction, GameSession};
use crate::domain::session::{ActionDefinition, SessionPhase, SessionRunner, EMERGENCY_ACTIONS};
use crate::state::{slot_drafts, SharedState};
use crate::store::{self, StoreKey};
use crate::web::error::WebError;
use crate::web::slot::Slot;
use crate::web::{require_profile, require_scenario};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(current))
        .route("/start", post(start))
        .route("/actions", post(record_action))
        .route("/end", post(end))
        .route("/back", post(back))
        .with_state(state)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionView {
    phase: SessionPhase,
    scenario: Option<FloodScenario>,
    briefing: Option<String>,
    forecast_url: String,
    available_actions: &'static [ActionDefinition],
    actions: Vec<GameAction>,
    action_count: usize,
    start_time: Option<DateTime<Utc>>,
    end_time: Option<DateTime<Utc>>,
    elapsed_seconds: i64,
}

impl SessionView {
    fn of(runner: &SessionRunner, forecast_url: &str) -> Self {
        Self {
            phase: runner.phase(),
            scenario: runner.scenario().cloned(),
            briefing: runner.scenario().map(briefing_text),
            forecast_url: forecast_url.to_string(),
            available_actions: &EMERGENCY_ACTIONS,
            actions: runner.actions().to_vec(),
            action_count: runner.actions().len(),
            start_time: runner.start_time(),
            end_time: runner.end_time(),
            elapsed_seconds: runner.elapsed_seconds(Utc::now()),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActionPayload {
    action_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ActionResponse {
    recorded: bool,
    action: Option<GameAction>,
    action_count: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EndResponse {
    session: GameSession,
    next: &'static str,
    feedback_form_url: String,
}

fn briefing_text(scenario: &FloodScenario) -> String {
    let p = &scenario.parameters;
    format!(
        "{} near {}: {} mm/h of rain for {} h, river {} m above normal, soil {}% saturated. Assessed risk: {}. {}",
        scenario.name,
        scenario.location.name,
        p.rainfall,
        p.duration,
        p.river_level,
        p.soil_saturation,
        scenario.risk_level.as_str(),
        scenario.risk_level.description()
    )
}

/// Loads the predecessors and briefs the runner if it has not started yet.
async fn brief(state: &SharedState, slot: Uuid) -> Result<(), WebError> {
    let profile = require_profile(state, slot).await?;
    let scenario = require_scenario(state, slot).await?;

    let mut drafts = state.drafts.write().await;
    let runner = &mut slot_drafts(&mut drafts, slot).runner;
    if matches!(runner.phase(), SessionPhase::NotStarted | SessionPhase::Briefing) {
        runner.brief(profile, scenario)?;
    }
    Ok(())
}

async fn current(
    Slot(slot): Slot,
    State(state): State<SharedState>,
) -> Result<Json<SessionView>, WebError> {
    brief(&state, slot).await?;
    let mut drafts = state.drafts.write().await;
    let runner = &slot_drafts(&mut drafts, slot).runner;
    Ok(Json(SessionView::of(runner, &state.config.forecast_app_url)))
}

async fn start(
    Slot(slot): Slot,
    State(state): State<SharedState>,
) -> Result<Json<SessionView>, WebError> {
    brief(&state, slot).await?;
    let mut drafts = state.drafts.write().await;
    let entry = slot_drafts(&mut drafts, slot);
    let mut started = entry.runner.clone();
    started.start(Utc::now())?;

    // Feedback may only attach to the run that just ended, so drop the previous one
    state.store.clear(slot, StoreKey::GameSession).await?;
    state.store.clear(slot, StoreKey::FeedbackData).await?;
    entry.runner = started;
    entry.unsaved_session = None;

    tracing::info!("Session started for slot {}", slot);
    Ok(Json(SessionView::of(&entry.runner, &state.config.forecast_app_url)))
}

async fn record_action(
    Slot(slot): Slot,
    State(state): State<SharedState>,
    Json(payload): Json<ActionPayload>,
) -> Result<Json<ActionResponse>, WebError> {
    let mut drafts = state.drafts.write().await;
    let runner = &mut slot_drafts(&mut drafts, slot).runner;
    let action = runner.record_action(&payload.action_id, Utc::now())?.cloned();

    Ok(Json(ActionResponse {
        recorded: action.is_some(),
        action,
        action_count: runner.actions().len(),
    }))
}

async fn end(
    Slot(slot): Slot,
    State(state): State<SharedState>,
) -> Result<Json<EndResponse>, WebError> {
    let session = {
        let mut drafts = state.drafts.write().await;
        let entry = slot_drafts(&mut drafts, slot);
        match entry.unsaved_session.take() {
            // Previous end succeeded in memory but the store write failed
            Some(pending) if entry.runner.phase() == SessionPhase::Ended => pending,
            _ => entry.runner.end(Utc::now())?,
        }
    };

    if let Err(e) = store::save(state.store.as_ref(), slot, StoreKey::GameSession, &session).await {
        let mut drafts = state.drafts.write().await;
        slot_drafts(&mut drafts, slot).unsaved_session = Some(session);
        return Err(e.into());
    }

    tracing::info!(
        "Session {} ended for slot {}: {} actions over {}s",
        session.id,
        slot,
        session.actions.len(),
        session.duration_seconds().unwrap_or(0)
    );

    Ok(Json(EndResponse {
        session,
        next: super::FEEDBACK_PATH,
        feedback_form_url: state.config.feedback_form_url.clone(),
    }))
}

/// One step back to the scenario builder; refused mid-run.
async fn back(
    Slot(slot): Slot,
    State(state): State<SharedState>,
) -> Result<impl IntoResponse, WebError> {
    let mut drafts = state.drafts.write().await;
    let entry = slot_drafts(&mut drafts, slot);
    if entry.runner.phase() == SessionPhase::Active {
        return Err(WebError::status(StatusCode::CONFLICT, "session_active"));
    }
    entry.runner = SessionRunner::new();
    entry.unsaved_session = None;
    Ok(Redirect::to(super::SCENARIO_PATH))
}
