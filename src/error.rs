use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::response::Envelope;

/// Failures surfaced at the HTTP boundary. Every variant renders as a
/// `success:false` envelope; none leaks raw storage errors to the client.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid login or password")]
    AuthenticationFailed,

    #[error("You are not logged in")]
    AuthorizationRequired,

    #[error("{0}")]
    NotFound(&'static str),

    #[error("User already exists")]
    AlreadyExists,

    #[error("{0}")]
    BadRequest(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Database connection error")]
    StorageUnavailable(#[source] sqlx::Error),

    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::AuthenticationFailed | ApiError::AuthorizationRequired => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::AlreadyExists | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::StorageUnavailable(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate => ApiError::AlreadyExists,
            StoreError::InvalidInput => ApiError::BadRequest("Invalid input data".into()),
            StoreError::Unavailable(e) => ApiError::StorageUnavailable(e),
        }
    }
}

impl From<axum::extract::rejection::JsonRejection> for ApiError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<axum::extract::rejection::QueryRejection> for ApiError {
    fn from(rejection: axum::extract::rejection::QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::StorageUnavailable(e) => error!(error = %e, "storage unavailable"),
            ApiError::Internal(e) => error!(error = %e, "internal error"),
            _ => {}
        }
        (status, Json(Envelope::failure(self.to_string()))).into_response()
    }
}

/// Errors raised by the data store seam.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unique constraint violated")]
    Duplicate,

    /// The database refused the values themselves (SQLSTATE class 22).
    #[error("invalid input data")]
    InvalidInput,

    #[error("storage unavailable: {0}")]
    Unavailable(#[source] sqlx::Error),
}

impl StoreError {
    /// Classifies a driver error: unique-key violations become `Duplicate`,
    /// data exceptions become `InvalidInput`, the rest `Unavailable`.
    pub fn classify(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Duplicate,
            sqlx::Error::Database(db)
                if db.code().is_some_and(|code| code.starts_with("22")) =>
            {
                StoreError::InvalidInput
            }
            _ => StoreError::Unavailable(e),
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        Self::classify(e)
    }
}
