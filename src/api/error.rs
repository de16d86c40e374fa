//! Errors raised while serving a request and their HTTP rendering.

use crate::planning::services::{ErrorKind, PlanningServiceError};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub(super) enum ApiError {
    #[error(transparent)]
    Service(#[from] PlanningServiceError),

    /// Ids that do not parse cannot name a stored entity.
    #[error("{entity} {raw} not found")]
    MalformedId { entity: &'static str, raw: String },

    #[error("invalid request body: {0}")]
    InvalidBody(String),

    #[error("invalid query string: {0}")]
    InvalidQuery(String),

    #[error("no route for {method} {path}")]
    NoRoute { method: String, path: String },
}

impl ApiError {
    pub(super) const fn kind(&self) -> ErrorKind {
        match self {
            Self::Service(err) => err.kind(),
            Self::MalformedId { .. } | Self::NoRoute { .. } => ErrorKind::NotFound,
            Self::InvalidBody(_) | Self::InvalidQuery(_) => ErrorKind::Validation,
        }
    }

    /// Conflicts share `400` with validation failures.
    pub(super) const fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::Validation | ErrorKind::Conflict => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if self.kind() == ErrorKind::Internal {
            tracing::error!(error = %self, "request failed");
            "internal server error".to_owned()
        } else {
            self.to_string()
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
