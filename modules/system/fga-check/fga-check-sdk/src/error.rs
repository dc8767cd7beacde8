//! Error types for the FGA check module.

use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

/// Structured diagnostics attached to an authorization-service API error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FgaApiErrorDetails {
    pub status_code: u16,
    pub method: Option<String>,
    pub request_url: Option<String>,
    pub api_error_code: Option<String>,
    pub audience: Option<String>,
    pub grant_type: Option<String>,
    pub client_id: Option<String>,
    pub request_id: Option<String>,
    /// Raw response body.
    pub response_data: Option<String>,
}

/// Classification of an API error by HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FgaApiErrorKind {
    Validation,
    Authentication,
    NotFound,
    RateLimitExceeded,
    Internal,
    Other,
}

/// A structured error returned by the authorization service.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct FgaApiError {
    message: String,
    details: Box<FgaApiErrorDetails>,
}

impl FgaApiError {
    #[must_use]
    pub fn new(message: impl Into<String>, details: FgaApiErrorDetails) -> Self {
        Self {
            message: message.into(),
            details: Box::new(details),
        }
    }

    #[must_use]
    pub fn details(&self) -> &FgaApiErrorDetails {
        &self.details
    }

    #[must_use]
    pub fn status_code(&self) -> u16 {
        self.details.status_code
    }

    #[must_use]
    pub fn kind(&self) -> FgaApiErrorKind {
        match self.details.status_code {
            400 | 422 => FgaApiErrorKind::Validation,
            401 | 403 => FgaApiErrorKind::Authentication,
            404 => FgaApiErrorKind::NotFound,
            429 => FgaApiErrorKind::RateLimitExceeded,
            500..=599 => FgaApiErrorKind::Internal,
            _ => FgaApiErrorKind::Other,
        }
    }
}

/// The wait for a check response was interrupted.
#[derive(Debug, Clone, Copy, Default, Error)]
#[error("interrupted while waiting for the check response")]
pub struct Interrupted;

/// Errors reported by an [`FgaClient`](crate::FgaClient).
#[derive(Debug, Error)]
pub enum FgaClientError {
    /// The client rejected the request or configuration before sending anything.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The service answered with a structured error.
    #[error("authorization service returned an error")]
    Api(#[from] FgaApiError),

    /// The request could not be delivered or the response could not be read.
    #[error("transport failure")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    #[error("check interrupted")]
    Interrupted(#[from] Interrupted),
}

/// Domain error for a failed FGA operation.
///
/// Produced by [`FgaErrorHandler`](crate::FgaErrorHandler). Keeps the formatted
/// message, the original cause (see [`StdError::source`]) and, when the root
/// cause is an [`FgaApiError`], its structured diagnostics.
pub struct FgaError {
    message: String,
    cause: Box<dyn StdError + Send + Sync + 'static>,
    api_error: Option<Box<FgaApiErrorDetails>>,
}

impl FgaError {
    pub(crate) fn new(
        message: String,
        cause: Box<dyn StdError + Send + Sync + 'static>,
        api_error: Option<FgaApiErrorDetails>,
    ) -> Self {
        Self {
            message,
            cause,
            api_error: api_error.map(Box::new),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Structured diagnostics, present only when the root cause was an API error.
    #[must_use]
    pub fn api_error(&self) -> Option<&FgaApiErrorDetails> {
        self.api_error.as_deref()
    }

    /// The original, unmodified cause.
    #[must_use]
    pub fn cause(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self.cause.as_ref()
    }

    /// The innermost error of the cause chain.
    #[must_use]
    pub fn root_cause(&self) -> &(dyn StdError + 'static) {
        crate::error_handler::root_cause(self.cause.as_ref())
    }
}

impl fmt::Display for FgaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl fmt::Debug for FgaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("FgaError");
        s.field("message", &self.message)
            .field("cause", &format_args!("{}", self.cause));
        if let Some(api) = &self.api_error {
            s.field("status_code", &api.status_code)
                .field("method", &api.method)
                .field("request_url", &api.request_url)
                .field("api_error_code", &api.api_error_code)
                .field("audience", &api.audience)
                .field("grant_type", &api.grant_type)
                .field("client_id", &api.client_id)
                .field("request_id", &api.request_id)
                .field("response_data", &api.response_data);
        }
        s.finish()
    }
}

impl StdError for FgaError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(self.cause.as_ref())
    }
}

/// Errors returned by [`FgaChecker`](crate::FgaChecker).
#[derive(Debug, Error)]
pub enum CheckError {
    /// No user id was given and the ambient context has no authenticated subject.
    #[error("No user provided, and no authentication could be found in the security context")]
    SubjectMissing,

    /// The check could not be performed.
    #[error(transparent)]
    Fga(#[from] FgaError),
}
