use crate::domain::forms::FeedbackForm;
use crate::domain::models::{FeedbackRecord, GameSession};
use crate::domain::scenario::ScenarioBuilder;
use crate::domain::session::SessionRunner;
use crate::state::{slot_drafts, SharedState};
use crate::store::{self, StoreKey};
use crate::web::error::WebError;
use crate::web::require_finished_session;
use crate::web::slot::Slot;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(current).post(submit))
        .route("/play-again", post(play_again))
        .with_state(state)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FeedbackView {
    session: GameSession,
    feedback: Option<FeedbackRecord>,
    external_form_url: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitResponse {
    record: FeedbackRecord,
    external_form_url: String,
}

async fn current(
    Slot(slot): Slot,
    State(state): State<SharedState>,
) -> Result<Json<FeedbackView>, WebError> {
    let session = require_finished_session(&state, slot).await?;
    let feedback = store::load(state.store.as_ref(), slot, StoreKey::FeedbackData).await?;
    Ok(Json(FeedbackView {
        session,
        feedback,
        external_form_url: state.config.feedback_form_url.clone(),
    }))
}

async fn submit(
    Slot(slot): Slot,
    State(state): State<SharedState>,
    Json(form): Json<FeedbackForm>,
) -> Result<(StatusCode, Json<SubmitResponse>), WebError> {
    let session = require_finished_session(&state, slot).await?;

    if !state.feedback_limiter.check(slot).await {
        tracing::warn!("Rate limit exceeded for feedback from slot {}", slot);
        return Err(WebError::status(StatusCode::TOO_MANY_REQUESTS, "rate_limited"));
    }

    let record = form.into_record(session, Utc::now())?;
    store::save(state.store.as_ref(), slot, StoreKey::FeedbackData, &record).await?;

    tracing::info!(
        "Feedback stored for session {} (overall rating {})",
        record.game_session.id,
        record.feedback.overall_rating
    );

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            record,
            external_form_url: state.config.feedback_form_url.clone(),
        }),
    ))
}

/// Keeps the profile and returns to the scenario builder with fresh drafts.
async fn play_again(
    Slot(slot): Slot,
    State(state): State<SharedState>,
) -> Result<impl IntoResponse, WebError> {
    state.store.clear(slot, StoreKey::FloodScenario).await?;
    state.store.clear(slot, StoreKey::GameSession).await?;

    let mut drafts = state.drafts.write().await;
    let entry = slot_drafts(&mut drafts, slot);
    entry.builder = ScenarioBuilder::new();
    entry.runner = SessionRunner::new();
    entry.unsaved_session = None;

    tracing::info!("Slot {} playing again", slot);
    Ok(Redirect::to(super::SCENARIO_PATH))
}
