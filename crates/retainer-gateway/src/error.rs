//! Error types and status mapping

use crate::policy::AuthError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use http_body_util::LengthLimitError;
use retainer_store::StoreError;
use thiserror::Error;

/// Header carrying the error code on failed responses
pub const ERROR_CODE_HEADER: &str = "x-error-code";

/// Gateway error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    AuthenticationError,
    Unauthenticated,
    AuthorizationError,
    Unauthorized,
    RecordNotFound,
    RouteNotFound,
    StoreError,
    BadRequest,
    PayloadTooLarge,
}

impl ErrorCode {
    /// Get the error code string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AuthenticationError => "AuthenticationError",
            Self::Unauthenticated => "Unauthenticated",
            Self::AuthorizationError => "AuthorizationError",
            Self::Unauthorized => "Unauthorized",
            Self::RecordNotFound => "RecordNotFound",
            Self::RouteNotFound => "RouteNotFound",
            Self::StoreError => "StoreError",
            Self::BadRequest => "BadRequest",
            Self::PayloadTooLarge => "PayloadTooLarge",
        }
    }

    /// Get the HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::AuthenticationError | Self::AuthorizationError | Self::StoreError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::Unauthorized => StatusCode::FORBIDDEN,
            Self::RecordNotFound | Self::RouteNotFound => StatusCode::NOT_FOUND,
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }
}

/// Every way a request can fail to reach a successful response
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("authentication failed: {0}")]
    Authentication(#[source] AuthError),

    #[error("authentication denied")]
    Unauthenticated,

    #[error("authorization failed: {0}")]
    Authorization(#[source] AuthError),

    #[error("not authorized")]
    Unauthorized,

    #[error("no retained record for topic {0}")]
    RecordNotFound(String),

    #[error("route not found")]
    RouteNotFound,

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("could not read request body: {0}")]
    Body(#[source] axum::Error),
}

impl GatewayError {
    /// Get the error code
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::Authentication(_) => ErrorCode::AuthenticationError,
            Self::Unauthenticated => ErrorCode::Unauthenticated,
            Self::Authorization(_) => ErrorCode::AuthorizationError,
            Self::Unauthorized => ErrorCode::Unauthorized,
            Self::RecordNotFound(_) => ErrorCode::RecordNotFound,
            Self::RouteNotFound => ErrorCode::RouteNotFound,
            Self::Store(_) => ErrorCode::StoreError,
            Self::Body(e) if is_length_limit(e) => ErrorCode::PayloadTooLarge,
            Self::Body(_) => ErrorCode::BadRequest,
        }
    }
}

/// Whether buffering stopped at the configured body limit
fn is_length_limit(error: &axum::Error) -> bool {
    std::error::Error::source(error).is_some_and(|source| source.is::<LengthLimitError>())
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let code = self.error_code();

        // The status alone carries the outcome; bodies stay empty.
        (code.status_code(), [(ERROR_CODE_HEADER, code.as_str())], ()).into_response()
    }
}
