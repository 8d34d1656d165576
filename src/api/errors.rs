// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::search::SearchError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<u64>,
}

#[derive(Debug, Clone)]
pub enum ApiError {
    InvalidRequest(String),
    NotFound(String),
    RateLimitExceeded { retry_after: u64 },
    ServiceUnavailable(String),
    Timeout(String),
    InternalError(String),
}

impl ApiError {
    pub fn to_response(&self) -> ErrorResponse {
        let (error_type, message, retry_after) = match self {
            ApiError::InvalidRequest(msg) => ("invalid_request", msg.clone(), None),
            ApiError::NotFound(msg) => ("not_found", msg.clone(), None),
            ApiError::RateLimitExceeded { retry_after } => (
                "rate_limit_exceeded",
                "Rate limit exceeded".to_string(),
                Some(*retry_after),
            ),
            ApiError::ServiceUnavailable(msg) => ("service_unavailable", msg.clone(), None),
            ApiError::Timeout(msg) => ("timeout", msg.clone(), None),
            ApiError::InternalError(msg) => ("internal_error", msg.clone(), None),
        };

        ErrorResponse {
            error_type: error_type.to_string(),
            message,
            retry_after,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::RateLimitExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<SearchError> for ApiError {
    fn from(err: SearchError) -> Self {
        match &err {
            SearchError::InvalidQuery { .. } => ApiError::InvalidRequest(err.to_string()),
            SearchError::RateLimited { retry_after_secs } => ApiError::RateLimitExceeded {
                retry_after: *retry_after_secs,
            },
            SearchError::SearchDisabled => ApiError::ServiceUnavailable(err.to_string()),
            SearchError::Timeout { .. } => ApiError::Timeout(err.to_string()),
            SearchError::NoResults | SearchError::ProviderFailure { .. } => {
                ApiError::InternalError(err.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.to_response())).into_response()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::RateLimitExceeded { retry_after } => write!(
                f,
                "Rate limit exceeded, retry after {} seconds",
                retry_after
            ),
            ApiError::ServiceUnavailable(msg) => write!(f, "Service unavailable: {}", msg),
            ApiError::Timeout(msg) => write!(f, "Timeout: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}
