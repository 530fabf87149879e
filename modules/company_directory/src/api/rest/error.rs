//! HTTP error mapping to the response envelope

use super::dto::ApiResponse;
use crate::contract::{DirectoryError, TabKind};
use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

/// Error response: `{success: false, error, message}` with a status code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    /// Short, human-readable summary of the error kind
    pub error: String,
    /// Explanation specific to this occurrence
    pub message: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            error: error.into(),
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Bad Request").with_message(message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiResponse::<()> {
            success: false,
            data: None,
            message: self.message,
            error: Some(self.error),
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<DirectoryError> for ApiError {
    fn from(error: DirectoryError) -> Self {
        map_domain_error(error)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::new(rejection.status(), "Invalid Request Body").with_message(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

/// Map domain errors to HTTP status and envelope
pub fn map_domain_error(error: DirectoryError) -> ApiError {
    match error {
        DirectoryError::NotFound { resource, id } => {
            ApiError::new(StatusCode::NOT_FOUND, "Not Found")
                .with_message(format!("{} '{}' was not found", resource, id))
        }

        DirectoryError::Conflict { reason } => {
            ApiError::new(StatusCode::CONFLICT, "Conflict").with_message(reason)
        }

        DirectoryError::Validation { message } => {
            ApiError::new(StatusCode::BAD_REQUEST, "Validation Error").with_message(message)
        }

        DirectoryError::UnknownTab { name } => {
            let known: Vec<&str> = TabKind::ALL.iter().map(|t| t.as_str()).collect();
            ApiError::new(StatusCode::NOT_FOUND, "Unknown Tab").with_message(format!(
                "Tab '{}' does not exist; expected one of {}",
                name,
                known.join(", ")
            ))
        }

        DirectoryError::SchemaValidation { errors } => {
            ApiError::new(StatusCode::BAD_REQUEST, "Schema Validation Failed")
                .with_message(format!("Validation errors: {}", errors.join(", ")))
        }

        DirectoryError::Internal => {
            ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
                .with_message("An unexpected error occurred")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (DirectoryError::not_found("company_page", "x"), StatusCode::NOT_FOUND),
            (DirectoryError::conflict("taken"), StatusCode::CONFLICT),
            (DirectoryError::validation("bad"), StatusCode::BAD_REQUEST),
            (
                DirectoryError::UnknownTab {
                    name: "reviews".into(),
                },
                StatusCode::NOT_FOUND,
            ),
            (
                DirectoryError::SchemaValidation { errors: vec![] },
                StatusCode::BAD_REQUEST,
            ),
            (DirectoryError::Internal, StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, status) in cases {
            assert_eq!(map_domain_error(error).status, status);
        }
    }

    #[test]
    fn test_internal_error_hides_details() {
        let error = map_domain_error(DirectoryError::Internal);
        assert_eq!(error.message.as_deref(), Some("An unexpected error occurred"));
    }
}
