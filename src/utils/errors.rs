use axum::{
    extract::rejection::FormRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;
use validator::ValidationErrors;

pub const ERR_PHONE_COLLISION_MSG: &str = "interviewer phone may not equal candidate phone";

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub details: Option<HashMap<String, Vec<String>>>,
    pub timestamp: DateTime<Utc>,
}

/// Rejection of an interview form. The display string is the message shown
/// to the end user.
#[derive(Debug, Error)]
pub enum FormError {
    #[error("{}", ERR_PHONE_COLLISION_MSG)]
    PhoneCollision,

    #[error("{message}")]
    Invalid {
        field: &'static str,
        message: String,
        errors: ValidationErrors,
    },
}

#[derive(Debug)]
pub enum AppError {
    ValidationError(String, HashMap<String, Vec<String>>),
    NotFound(String),
    Unauthorized(String),
    BadRequest(String),
    InternalServerError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message, details) = match self {
            AppError::ValidationError(message, errors) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                message,
                Some(errors),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg, None),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg, None),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg, None),
            AppError::InternalServerError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_SERVER_ERROR",
                msg,
                None,
            ),
        };

        let error_response = ErrorResponse {
            error: error_type.to_string(),
            message,
            details,
            timestamp: Utc::now(),
        };

        (status, Json(error_response)).into_response()
    }
}

fn field_messages(errors: &ValidationErrors) -> HashMap<String, Vec<String>> {
    let mut error_map = HashMap::new();

    for (field, field_errors) in errors.field_errors() {
        let messages: Vec<String> = field_errors
            .iter()
            .map(|error| {
                error
                    .message
                    .as_ref()
                    .map(|msg| msg.to_string())
                    .unwrap_or_else(|| format!("Invalid value for field '{}'", field))
            })
            .collect();
        error_map.insert(field.to_string(), messages);
    }

    error_map
}

impl From<FormError> for AppError {
    fn from(error: FormError) -> Self {
        match error {
            FormError::PhoneCollision => AppError::BadRequest(ERR_PHONE_COLLISION_MSG.to_string()),
            FormError::Invalid {
                message, errors, ..
            } => AppError::ValidationError(message, field_messages(&errors)),
        }
    }
}

impl From<FormRejection> for AppError {
    fn from(rejection: FormRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Interview not found".to_string()),
            other => {
                tracing::error!("Database error: {}", other);
                AppError::InternalServerError("Database error occurred".to_string())
            }
        }
    }
}
