use std::collections::BTreeMap;

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::app::ServiceError;

#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
    fields: BTreeMap<String, Vec<String>>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    fields: BTreeMap<String, Vec<String>>,
}

impl AppError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// 400 naming the offending input field.
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        let mut error = Self::new(StatusCode::BAD_REQUEST, message.clone());
        error.fields.insert(field.to_string(), vec![message]);
        error
    }

    /// 400 carrying every rejected field at once.
    pub fn validation(fields: BTreeMap<String, Vec<String>>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: "invalid input".to_string(),
            fields,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Maps a service outcome to a response. Internal failures are logged
    /// under `context` and reported without detail.
    pub fn from_service(err: ServiceError, context: &str) -> Self {
        match err {
            ServiceError::NotFound(message) => Self::not_found(message),
            ServiceError::Forbidden(message) => Self::forbidden(message),
            ServiceError::Validation { message, fields } => Self {
                status: StatusCode::BAD_REQUEST,
                message,
                fields,
            },
            ServiceError::Conflict(message) => {
                tracing::warn!(%message, "{}", context);
                Self::conflict(message)
            }
            ServiceError::Internal(err) => {
                tracing::error!(error = ?err, "{}", context);
                Self::internal(context)
            }
        }
    }
}

const REQUIRED_FIELD: &str = "This field is required.";

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(err) => json_data_error(&err.body_text()),
            JsonRejection::JsonSyntaxError(_) => {
                Self::invalid_field("non_field_errors", "malformed JSON body")
            }
            other => Self::new(other.status(), other.body_text()),
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(_: PathRejection) -> Self {
        Self::not_found("not found")
    }
}

/// Turns a serde deserialization message into a per-field 400.
fn json_data_error(text: &str) -> AppError {
    let detail = text.split_once(": ").map_or(text, |(_, rest)| rest);
    let detail = match detail.rfind(" at line ") {
        Some(idx) => &detail[..idx],
        None => detail,
    };

    let mut fields = BTreeMap::new();
    if let Some(name) = missing_field(detail) {
        fields.insert(name.to_string(), vec![REQUIRED_FIELD.to_string()]);
    } else if let Some((path, reason)) = detail.split_once(": ").filter(|(path, _)| {
        !path.is_empty()
            && path
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '[' | ']'))
    }) {
        fields.insert(path.to_string(), vec![reason.to_string()]);
    } else {
        fields.insert("non_field_errors".to_string(), vec![detail.to_string()]);
    }
    AppError::validation(fields)
}

fn missing_field(detail: &str) -> Option<&str> {
    let rest = detail.split("missing field `").nth(1)?;
    rest.split('`').next()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: self.message,
            fields: self.fields,
        });
        (self.status, body).into_response()
    }
}
