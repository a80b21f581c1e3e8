// src/error.rs
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

use crate::validation::ValidationError;

/// Uniform body shape shared by every endpoint, success or failure.
#[derive(Debug, Serialize)]
pub struct Envelope {
    pub error: bool,
    pub data: Option<Value>,
    pub message: String,
}

impl Envelope {
    pub fn success(data: Option<Value>, message: impl Into<String>) -> Json<Envelope> {
        Json(Envelope {
            error: false,
            data,
            message: message.into(),
        })
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed or out-of-range input, including request bodies that fail
    /// strict decoding.
    #[error("{0}")]
    Validation(String),

    /// Candidate collides with an already-accepted sibling entity.
    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error("internal server error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        AppError::Conflict(msg.into())
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        if err.is_conflict() {
            AppError::Conflict(err.to_string())
        } else {
            AppError::Validation(err.to_string())
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail, message) = match self {
            AppError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone(), msg),
            AppError::Conflict(msg) => (StatusCode::BAD_REQUEST, msg.clone(), msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone(), msg),
            AppError::Internal(err) => {
                tracing::error!("internal error: {err:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("{err:#}"),
                    "Internal Server Error".into(),
                )
            }
        };

        let body = Json(Envelope {
            error: true,
            data: Some(json!({ "detail": detail })),
            message,
        });
        (status, body).into_response()
    }
}
