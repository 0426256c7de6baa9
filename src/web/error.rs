//! API error handling for the Filebay web API.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::collections::HashMap;

/// API error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Bad request (400).
    BadRequest,
    /// Not found (404).
    NotFound,
    /// Payload too large (413).
    PayloadTooLarge,
    /// Range not satisfiable (416).
    RangeNotSatisfiable,
    /// Validation error (422) - for field-level validation errors.
    ValidationError,
    /// Internal server error (500).
    InternalError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::BadRequest => StatusCode::BAD_REQUEST,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ErrorCode::RangeNotSatisfiable => StatusCode::RANGE_NOT_SATISFIABLE,
            ErrorCode::ValidationError => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Extra information attached to an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ErrorDetails {
    /// Underlying cause, for server errors.
    Message(String),
    /// Field-level validation messages.
    Fields(HashMap<String, Vec<String>>),
}

/// API error response body.
///
/// Rendered as `{"success": false, "error": "...", "code": "...", "details": ...}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Always `false`.
    pub success: bool,
    /// Human-readable message.
    pub error: String,
    /// Error code.
    pub code: ErrorCode,
    /// Optional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<ErrorDetails>,
}

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    code: ErrorCode,
    message: String,
    details: Option<ErrorDetails>,
    /// File size for `Content-Range: bytes */size` on 416 responses.
    unsatisfied_size: Option<u64>,
}

impl ApiError {
    /// Create a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            unsatisfied_size: None,
        }
    }

    /// Attach details to this error.
    pub fn with_details(mut self, details: ErrorDetails) -> Self {
        self.details = Some(details);
        self
    }

    /// Create a bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadRequest, message)
    }

    /// Create a not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Create a payload too large error.
    pub fn payload_too_large(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PayloadTooLarge, message)
    }

    /// Create a range not satisfiable error for a file of `size` bytes.
    pub fn range_not_satisfiable(size: u64) -> Self {
        Self {
            unsatisfied_size: Some(size),
            ..Self::new(ErrorCode::RangeNotSatisfiable, "Requested range not satisfiable")
        }
    }

    /// Create an internal server error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Create a validation error with field-level details.
    pub fn validation(details: HashMap<String, Vec<String>>) -> Self {
        Self::new(ErrorCode::ValidationError, "Validation failed")
            .with_details(ErrorDetails::Fields(details))
    }

    /// Create a validation error from validator::ValidationErrors.
    pub fn from_validation_errors(errors: validator::ValidationErrors) -> Self {
        let mut details: HashMap<String, Vec<String>> = HashMap::new();

        for (field, field_errors) in errors.field_errors() {
            let messages: Vec<String> = field_errors
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value for {}", field))
                })
                .collect();
            details.insert(field.to_string(), messages);
        }

        Self::validation(details)
    }

    /// Error code of this error.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Message of this error.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.code.status_code();
        let body = ErrorBody {
            success: false,
            error: self.message,
            code: self.code,
            details: self.details,
        };

        let mut response = (status, Json(body)).into_response();
        if let Some(size) = self.unsatisfied_size {
            if let Ok(value) = HeaderValue::from_str(&format!("bytes */{size}")) {
                response.headers_mut().insert(header::CONTENT_RANGE, value);
            }
        }
        response
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<crate::FilebayError> for ApiError {
    fn from(err: crate::FilebayError) -> Self {
        match &err {
            crate::FilebayError::NotFound(_) => ApiError::not_found("File not found"),
            crate::FilebayError::Validation(msg) => ApiError::bad_request(msg.clone()),
            crate::FilebayError::InvalidPath(_) => ApiError::bad_request("Invalid path"),
            _ => {
                tracing::error!("Internal error: {}", err);
                ApiError::internal("Internal server error")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FilebayError;

    #[test]
    fn test_error_code_status() {
        assert_eq!(ErrorCode::BadRequest.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorCode::PayloadTooLarge.status_code(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            ErrorCode::RangeNotSatisfiable.status_code(),
            StatusCode::RANGE_NOT_SATISFIABLE
        );
        assert_eq!(
            ErrorCode::ValidationError.status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ErrorCode::InternalError.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_api_error_constructors() {
        assert_eq!(ApiError::bad_request("bad").code, ErrorCode::BadRequest);
        assert_eq!(ApiError::not_found("missing").code, ErrorCode::NotFound);
        assert_eq!(
            ApiError::payload_too_large("big").code,
            ErrorCode::PayloadTooLarge
        );
        assert_eq!(ApiError::internal("error").code, ErrorCode::InternalError);

        let err = ApiError::range_not_satisfiable(10);
        assert_eq!(err.code, ErrorCode::RangeNotSatisfiable);
        assert_eq!(err.unsatisfied_size, Some(10));
    }

    #[test]
    fn test_body_shape() {
        let body = ErrorBody {
            success: false,
            error: "Failed to list files".to_string(),
            code: ErrorCode::InternalError,
            details: Some(ErrorDetails::Message("disk on fire".to_string())),
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Failed to list files");
        assert_eq!(json["code"], "INTERNAL_ERROR");
        assert_eq!(json["details"], "disk on fire");
    }

    #[test]
    fn test_body_without_details() {
        let body = ErrorBody {
            success: false,
            error: "File not found".to_string(),
            code: ErrorCode::NotFound,
            details: None,
        };

        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("details").is_none());
    }

    #[test]
    fn test_validation_error() {
        let mut details = HashMap::new();
        details.insert("email".to_string(), vec!["Invalid email".to_string()]);

        let err = ApiError::validation(details);
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "Validation failed");
        assert!(matches!(err.details, Some(ErrorDetails::Fields(ref f)) if f.contains_key("email")));
    }

    #[test]
    fn test_range_response_header() {
        let response = ApiError::range_not_satisfiable(1234).into_response();

        assert_eq!(response.status(), StatusCode::RANGE_NOT_SATISFIABLE);
        assert_eq!(
            response.headers().get(header::CONTENT_RANGE).unwrap(),
            "bytes */1234"
        );
    }

    #[test]
    fn test_from_filebay_error() {
        let err: ApiError = FilebayError::NotFound("File: a".to_string()).into();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err: ApiError = FilebayError::InvalidPath("..".to_string()).into();
        assert_eq!(err.code, ErrorCode::BadRequest);
        assert_eq!(err.message, "Invalid path");

        let err: ApiError = FilebayError::Validation("No path provided".to_string()).into();
        assert_eq!(err.code, ErrorCode::BadRequest);

        let io = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let err: ApiError = FilebayError::Io(io).into();
        assert_eq!(err.code, ErrorCode::InternalError);
    }
}
