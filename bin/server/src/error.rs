//! API error type and HTTP status mapping.
//!
//! Authority denials carry a [`DenialKind`] that maps one-to-one onto an
//! HTTP status. Storage faults never leak details to the client; they are
//! logged and surfaced as 500.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;
use waypost_authority::{AuthorityError, DenialKind};
use waypost_trips::TripValidationError;

/// Error type for API handlers.
#[derive(Debug)]
pub enum ApiError {
    /// An authority decision denied the request.
    Denied(AuthorityError),
    /// A referenced resource does not exist.
    NotFound { resource: &'static str },
    /// Request payload failed domain validation.
    Validation(TripValidationError),
    /// A concurrent write beat this one to a uniqueness constraint.
    Conflict { details: String },
    /// Database error. Details are logged, not returned.
    Database(sqlx::Error),
}

impl ApiError {
    /// HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Denied(err) => match err.kind() {
                DenialKind::NotFound => StatusCode::NOT_FOUND,
                DenialKind::Forbidden => StatusCode::FORBIDDEN,
                DenialKind::Conflict => StatusCode::CONFLICT,
                DenialKind::InvalidState => StatusCode::UNPROCESSABLE_ENTITY,
            },
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Denied(err) => write!(f, "{}", err),
            Self::NotFound { resource } => write!(f, "{} not found", resource),
            Self::Validation(err) => write!(f, "{}", err),
            Self::Conflict { details } => write!(f, "{}", details),
            Self::Database(err) => write!(f, "database error: {}", err),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthorityError> for ApiError {
    fn from(err: AuthorityError) -> Self {
        Self::Denied(err)
    }
}

impl From<TripValidationError> for ApiError {
    fn from(err: TripValidationError) -> Self {
        Self::Validation(err)
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::Database(err) => {
                tracing::error!(error = %err, "database error");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waypost_core::TripId;

    #[test]
    fn denial_kinds_map_to_statuses() {
        let forbidden = ApiError::Denied(AuthorityError::NotTripMember {
            trip_id: TripId::new(),
        });
        assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

        let invalid = ApiError::Denied(AuthorityError::SelfFriendship);
        assert_eq!(invalid.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn not_found_maps_to_404() {
        let err = ApiError::NotFound { resource: "trip" };
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "trip not found");
    }

    #[test]
    fn validation_maps_to_422() {
        let err = ApiError::Validation(TripValidationError::EmptyTripName);
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
