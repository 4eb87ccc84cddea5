// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Wire shape of every error returned by the relay
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub kind: String,
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    ValidationError {
        message: String,
        details: Option<String>,
    },
    ProcessingError {
        message: String,
        details: Option<String>,
    },
    NotImplemented(String),
    ServiceUnavailable {
        message: String,
        details: Option<String>,
        suggestions: Vec<String>,
    },
    InternalError(String),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::ValidationError {
            message: message.into(),
            details: None,
        }
    }

    /// Every provider was tried and none produced an image
    pub fn providers_exhausted() -> Self {
        ApiError::ServiceUnavailable {
            message: "Image generation temporarily unavailable".to_string(),
            details: Some(
                "Please try again in a moment. You can also try a simpler prompt.".to_string(),
            ),
            suggestions: vec![
                "Try prompts like: 'a cat', 'sunset', 'mountain landscape'".to_string(),
                "Try again in a moment".to_string(),
            ],
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::ValidationError { .. } => "validation_error",
            ApiError::ProcessingError { .. } => "processing_error",
            ApiError::NotImplemented(_) => "not_implemented",
            ApiError::ServiceUnavailable { .. } => "service_unavailable",
            ApiError::InternalError(_) => "internal_error",
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        let (error, details, suggestions) = match self {
            ApiError::ValidationError { message, details }
            | ApiError::ProcessingError { message, details } => {
                (message.clone(), details.clone(), None)
            }
            ApiError::NotImplemented(msg) => (msg.clone(), None, None),
            ApiError::ServiceUnavailable {
                message,
                details,
                suggestions,
            } => (message.clone(), details.clone(), Some(suggestions.clone())),
            // Internal detail is logged, never returned
            ApiError::InternalError(_) => (
                "Service temporarily unavailable".to_string(),
                Some("Please try again in a moment".to_string()),
                Some(vec![
                    "Try a simpler prompt".to_string(),
                    "Check your internet connection".to_string(),
                    "Refresh the page and try again".to_string(),
                ]),
            ),
        };

        ErrorResponse {
            kind: self.kind().to_string(),
            error,
            details,
            suggestions,
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::ValidationError { .. } | ApiError::ProcessingError { .. } => 400,
            ApiError::NotImplemented(_) => 501,
            ApiError::ServiceUnavailable { .. } => 503,
            ApiError::InternalError(_) => 500,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::ValidationError { message, .. } => write!(f, "Validation error: {}", message),
            ApiError::ProcessingError { message, .. } => write!(f, "Processing error: {}", message),
            ApiError::NotImplemented(msg) => write!(f, "Not implemented: {}", msg),
            ApiError::ServiceUnavailable { message, .. } => {
                write!(f, "Service unavailable: {}", message)
            }
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_response())).into_response()
    }
}
