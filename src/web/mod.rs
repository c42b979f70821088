pub mod catalog;
pub mod error;
pub mod feedback;
pub mod profile;
pub mod scenario;
pub mod session;
pub mod slot;

use crate::domain::models::{FloodScenario, GameSession, UserProfile};
use crate::state::SharedState;
use crate::store::{self, StoreKey};
use crate::web::error::WebError;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect},
    routing::{get, post},
    Router,
};
use uuid::Uuid;

pub const PROFILE_PATH: &str = "/api/profile";
pub const SCENARIO_PATH: &str = "/api/scenario";
pub const SESSION_PATH: &str = "/api/session";
pub const FEEDBACK_PATH: &str = "/api/feedback";

async fn health() -> &'static str {
    "OK"
}

pub fn routes(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/start-over", post(start_over))
        .with_state(state.clone())
        .nest("/api/slot", slot::router(state.clone()))
        .nest("/api/catalog", catalog::router(state.clone()))
        .nest(PROFILE_PATH, profile::router(state.clone()))
        .nest(SCENARIO_PATH, scenario::router(state.clone()))
        .nest(SESSION_PATH, session::router(state.clone()))
        .nest(FEEDBACK_PATH, feedback::router(state))
}

pub(crate) async fn require_profile(state: &SharedState, slot: Uuid) -> Result<UserProfile, WebError> {
    store::load(state.store.as_ref(), slot, StoreKey::UserProfile)
        .await?
        .ok_or(WebError::Precondition(PROFILE_PATH))
}

pub(crate) async fn require_scenario(state: &SharedState, slot: Uuid) -> Result<FloodScenario, WebError> {
    store::load(state.store.as_ref(), slot, StoreKey::FloodScenario)
        .await?
        .ok_or(WebError::Precondition(SCENARIO_PATH))
}

pub(crate) async fn require_finished_session(
    state: &SharedState,
    slot: Uuid,
) -> Result<GameSession, WebError> {
    let session: Option<GameSession> =
        store::load(state.store.as_ref(), slot, StoreKey::GameSession).await?;
    match session {
        Some(s) if s.is_finished() => Ok(s),
        _ => Err(WebError::Precondition(SESSION_PATH)),
    }
}

/// Wipes every stored record and draft for the slot.
async fn start_over(
    slot::Slot(slot): slot::Slot,
    State(state): State<SharedState>,
) -> Result<impl IntoResponse, WebError> {
    state.store.clear_all(slot).await?;
    state.drafts.write().await.remove(&slot);

    tracing::info!("Slot {} started over", slot);
    Ok(Redirect::to(PROFILE_PATH))
}
