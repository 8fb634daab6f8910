use std::fmt;

use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const PROBLEM_CONTENT_TYPE: &str = "application/problem+json";

/// Problem response body returned for every failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProblemDetails {
    pub status: u16,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Debug)]
pub enum AppError {
    ValidationFailed {
        violations: Vec<String>,
    },
    NotFound {
        message: String,
    },
    BadRequest {
        message: String,
        details: Option<String>,
    },
    InternalServerError {
        message: String,
    },
}

impl AppError {
    pub fn validation_failed(violations: Vec<String>) -> Self {
        Self::ValidationFailed { violations }
    }

    pub fn not_found(message: &str) -> Self {
        Self::NotFound {
            message: message.to_string(),
        }
    }

    pub fn bad_request(message: &str) -> Self {
        Self::BadRequest {
            message: message.to_string(),
            details: None,
        }
    }

    pub fn bad_request_with_details(message: &str, details: &str) -> Self {
        Self::BadRequest {
            message: message.to_string(),
            details: Some(details.to_string()),
        }
    }

    pub fn internal_server_error(message: &str) -> Self {
        Self::InternalServerError {
            message: message.to_string(),
        }
    }

    pub fn from_error<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::internal_server_error(&format!(
            "An unexpected error occurred: {err}"
        ))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ValidationFailed { .. } | Self::BadRequest { .. } => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::InternalServerError { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::ValidationFailed { .. } => "Validation Failed",
            Self::NotFound { .. } => "Not Found",
            Self::BadRequest { .. } => "Bad Request",
            Self::InternalServerError { .. } => "Internal Server Error",
        }
    }

    /// Only validation and malformed-input failures expose a detail;
    /// not-found and internal errors never do.
    pub fn detail(&self) -> Option<String> {
        match self {
            Self::ValidationFailed { violations } => Some(violations.join("; ")),
            Self::BadRequest { details, .. } => details.clone(),
            Self::NotFound { .. } | Self::InternalServerError { .. } => None,
        }
    }

    pub fn to_problem_details(&self) -> ProblemDetails {
        ProblemDetails {
            status: self.status_code().as_u16(),
            title: self.title().to_string(),
            detail: self.detail(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValidationFailed { violations } => {
                write!(f, "Validation failed: {}", violations.join("; "))
            }
            Self::NotFound { message } => write!(f, "{message}"),
            Self::BadRequest { message, .. } => write!(f, "{message}"),
            Self::InternalServerError { message } => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            Self::InternalServerError { message } => {
                tracing::error!(error = %message, "Request failed");
            }
            Self::NotFound { message } => {
                tracing::warn!(error = %message, "Resource not found");
            }
            _ => tracing::debug!(error = %self, "Request rejected"),
        }

        let status = self.status_code();
        let body = self.to_problem_details();
        (
            status,
            [(header::CONTENT_TYPE, PROBLEM_CONTENT_TYPE)],
            Json(body),
        )
            .into_response()
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for AppError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        Self::internal_server_error(&format!(
            "An unexpected error occurred: {err}"
        ))
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal_server_error(&format!(
            "An unexpected error occurred: {err}"
        ))
    }
}

pub type AppResult<T> = Result<T, AppError>;
