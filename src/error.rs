use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

const PG_UNIQUE_VIOLATION: &str = "23505";
const PG_STRING_DATA_RIGHT_TRUNCATION: &str = "22001";

/// Names given to the `ann` constraints by `migrations/0001_create_ann.sql`.
const ANN_PRIMARY_KEY: &str = "ann_pkey";
const ANN_OWNER_INDEX: &str = "ix_ann_owner";

/// Which uniqueness rule a write broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueConstraint {
    Id,
    Owner,
    Unknown,
}

impl UniqueConstraint {
    fn from_name(name: Option<&str>) -> Self {
        match name {
            Some(ANN_PRIMARY_KEY) => UniqueConstraint::Id,
            Some(ANN_OWNER_INDEX) => UniqueConstraint::Owner,
            _ => UniqueConstraint::Unknown,
        }
    }
}

/// Failures raised by a storage session.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unique constraint violated ({constraint:?})")]
    UniqueViolation { constraint: UniqueConstraint },
    #[error("value too long for column")]
    ValueTooLong,
    #[error(transparent)]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        let (code, constraint) = match &err {
            sqlx::Error::Database(db_err) => (
                db_err.code().map(|c| c.into_owned()),
                db_err.constraint().map(str::to_owned),
            ),
            _ => (None, None),
        };
        match code.as_deref() {
            Some(PG_UNIQUE_VIOLATION) => StoreError::UniqueViolation {
                constraint: UniqueConstraint::from_name(constraint.as_deref()),
            },
            Some(PG_STRING_DATA_RIGHT_TRUNCATION) => StoreError::ValueTooLong,
            _ => StoreError::Database(err),
        }
    }
}

/// Error returned by HTTP handlers; always rendered as `{"error": "<message>"}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation { .. } => ApiError::Conflict("Announcement already exists".into()),
            StoreError::ValueTooLong => ApiError::BadRequest("value too long".into()),
            StoreError::Database(e) => {
                tracing::error!("database error: {}", e);
                ApiError::Internal("Database error".into())
            }
        }
    }
}
