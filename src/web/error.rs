use crate::domain::forms::ValidationError;
use crate::domain::scenario::ScenarioError;
use crate::domain::session::SessionError;
use crate::store::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;

const STORE_NOTICE: &str =
    "Your answers could not be saved right now. Nothing on this step was lost; please try again.";

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<&'static str>,
}

#[derive(Debug)]
pub enum WebError {
    /// A predecessor record is missing; send the client to the step that produces it
    Precondition(&'static str),
    Status {
        status: StatusCode,
        code: &'static str,
        message: Option<String>,
        field: Option<&'static str>,
    },
    Store(StoreError),
}

impl WebError {
    pub fn status(status: StatusCode, code: &'static str) -> Self {
        WebError::Status {
            status,
            code,
            message: None,
            field: None,
        }
    }
}

impl From<SessionError> for WebError {
    fn from(err: SessionError) -> Self {
        WebError::Status {
            status: StatusCode::CONFLICT,
            code: "invalid_transition",
            message: Some(err.to_string()),
            field: None,
        }
    }
}

impl From<ScenarioError> for WebError {
    fn from(err: ScenarioError) -> Self {
        let (code, field) = match &err {
            ScenarioError::UnknownPreset(_) => ("unknown_preset", Some("name")),
            ScenarioError::UnknownCatchment(_) => ("unknown_catchment", Some("catchment")),
            ScenarioError::EmptyName => ("missing_field", Some("name")),
        };
        WebError::Status {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            code,
            message: Some(err.to_string()),
            field,
        }
    }
}

impl From<ValidationError> for WebError {
    fn from(err: ValidationError) -> Self {
        let (status, code) = match &err {
            ValidationError::Missing(_) => (StatusCode::UNPROCESSABLE_ENTITY, "missing_field"),
            ValidationError::OutOfRange { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "out_of_range"),
            ValidationError::TooLong(_) => (StatusCode::PAYLOAD_TOO_LARGE, "too_long"),
            ValidationError::SessionNotFinished => return WebError::Precondition(super::SESSION_PATH),
        };
        WebError::Status {
            status,
            code,
            message: Some(err.to_string()),
            field: err.field(),
        }
    }
}

impl From<StoreError> for WebError {
    fn from(err: StoreError) -> Self {
        WebError::Store(err)
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        match self {
            WebError::Precondition(path) => {
                tracing::debug!("Precondition not met, redirecting to {}", path);
                Redirect::to(path).into_response()
            }
            WebError::Status {
                status,
                code,
                message,
                field,
            } => (
                status,
                Json(ErrorResponse {
                    error: code.to_string(),
                    message,
                    field,
                }),
            )
                .into_response(),
            WebError::Store(StoreError::Full) => {
                tracing::error!("Store write failed: store is full");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(ErrorResponse {
                        error: "store_unavailable".to_string(),
                        message: Some(STORE_NOTICE.to_string()),
                        field: None,
                    }),
                )
                    .into_response()
            }
            WebError::Store(err) => {
                tracing::error!("Store failure: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: "store_error".to_string(),
                        message: None,
                        field: None,
                    }),
                )
                    .into_response()
            }
        }
    }
}
