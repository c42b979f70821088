use crate::domain::forms::ProfileForm;
use crate::domain::models::UserProfile;
use crate::domain::session::SessionRunner;
use crate::state::{slot_drafts, SharedState};
use crate::store::{self, StoreKey};
use crate::web::error::WebError;
use crate::web::slot::Slot;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(current).post(submit))
        .with_state(state)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProfileResponse {
    profile: Option<UserProfile>,
    next: &'static str,
}

async fn current(
    Slot(slot): Slot,
    State(state): State<SharedState>,
) -> Result<Json<ProfileResponse>, WebError> {
    let profile = store::load(state.store.as_ref(), slot, StoreKey::UserProfile).await?;
    Ok(Json(ProfileResponse {
        profile,
        next: super::SCENARIO_PATH,
    }))
}

async fn submit(
    Slot(slot): Slot,
    State(state): State<SharedState>,
    Json(form): Json<ProfileForm>,
) -> Result<(StatusCode, Json<ProfileResponse>), WebError> {
    let profile = form.into_profile(Utc::now())?;
    store::save(state.store.as_ref(), slot, StoreKey::UserProfile, &profile).await?;

    // A new profile invalidates any session briefed for the old one
    {
        let mut drafts = state.drafts.write().await;
        slot_drafts(&mut drafts, slot).runner = SessionRunner::new();
    }

    tracing::info!(
        "Profile {} created for slot {} ({})",
        profile.id,
        slot,
        profile.user_category.as_str()
    );

    Ok((
        StatusCode::CREATED,
        Json(ProfileResponse {
            profile: Some(profile),
            next: super::SCENARIO_PATH,
        }),
    ))
}
