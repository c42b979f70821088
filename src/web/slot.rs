use crate::state::SharedState;
use crate::web::error::WebError;
use axum::{
    async_trait,
    extract::{FromRequestParts, State},
    http::{header, request::Parts, HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde::Serialize;
use uuid::Uuid;

pub const SLOT_COOKIE: &str = "flood_slot";
pub const SLOT_HEADER: &str = "x-slot-id";

pub fn router(state: SharedState) -> Router {
    Router::new().route("/", post(issue)).with_state(state)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SlotResponse {
    slot_id: Uuid,
    next: &'static str,
}

async fn issue(State(state): State<SharedState>) -> Result<impl IntoResponse, WebError> {
    let slot_id = Uuid::new_v4();
    let secure_flag = if state.config.secure_cookies { "; Secure" } else { "" };

    let cookie = format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/{}",
        SLOT_COOKIE, slot_id, secure_flag
    )
    .parse::<HeaderValue>()
    .map_err(|_| WebError::status(StatusCode::INTERNAL_SERVER_ERROR, "cookie_failed"))?;

    let mut headers = HeaderMap::new();
    headers.insert(header::SET_COOKIE, cookie);

    tracing::info!("Issued slot {}", slot_id);
    Ok((
        StatusCode::CREATED,
        headers,
        Json(SlotResponse {
            slot_id,
            next: super::PROFILE_PATH,
        }),
    ))
}

pub fn extract_slot(headers: &HeaderMap) -> Option<Uuid> {
    if let Some(raw) = headers.get(SLOT_HEADER).and_then(|v| v.to_str().ok()) {
        if let Ok(id) = Uuid::parse_str(raw.trim()) {
            return Some(id);
        }
    }
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies
        .split(';')
        .filter_map(|pair| pair.trim().strip_prefix(SLOT_COOKIE)?.strip_prefix('='))
        .find_map(|value| Uuid::parse_str(value.trim()).ok())
}

/// The visitor's store partition, taken from the `X-Slot-Id` header or the slot cookie.
pub struct Slot(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for Slot
where
    S: Send + Sync,
{
    type Rejection = WebError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        extract_slot(&parts.headers)
            .map(Slot)
            .ok_or_else(|| WebError::status(StatusCode::BAD_REQUEST, "missing_slot"))
    }
}
