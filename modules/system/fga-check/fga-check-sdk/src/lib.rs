#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! FGA Check SDK
//!
//! This crate provides the public API for the `fga_check` module:
//!
//! - [`FgaClient`], [`FgaClientFactory`] - seam to the authorization-service client
//! - [`CheckRequest`], [`CheckResponse`] - check models
//! - [`ClientConfiguration`], [`Credentials`] - validated client configuration
//! - [`FgaChecker`] - performs checks, falling back to the ambient subject
//! - [`FgaErrorHandler`], [`FgaError`] - failure normalization
//!
//! ## Usage
//!
//! ```ignore
//! use fga_check_sdk::{CheckError, FgaChecker};
//!
//! // Create the checker once, during init, then give each request its own
//! let root = FgaChecker::new(client);
//! let checker = root.child().with_subject_provider(Arc::new(ctx));
//!
//! // Explicit user
//! let allowed = checker.check("document", "readme", "viewer", "user", Some("alice")).await?;
//!
//! // Ambient user
//! match checker.check_current("document", "readme", "viewer", "user").await {
//!     Ok(allowed) => { /* decision */ }
//!     Err(CheckError::SubjectMissing) => { /* unauthenticated */ }
//!     Err(CheckError::Fga(e)) => tracing::error!(error = ?e, "check failed"),
//! }
//! ```

pub mod api;
pub mod checker;
pub mod client_config;
pub mod error;
pub mod error_handler;
pub mod identity;
pub mod models;

// Re-export main types at crate root
pub use api::{FgaClient, FgaClientFactory};
pub use checker::FgaChecker;
pub use client_config::{
    ClientConfiguration, ClientConfigurationBuilder, ClientCredentials, Credentials,
    CredentialsMethod, HttpVersion, TelemetryAttribute, TelemetryConfiguration, TelemetryMetric,
    UnknownCredentialsMethod,
};
pub use error::{
    CheckError, FgaApiError, FgaApiErrorDetails, FgaApiErrorKind, FgaClientError, FgaError,
    Interrupted,
};
pub use error_handler::FgaErrorHandler;
pub use identity::{NoSubject, SubjectProvider};
pub use models::{CheckRequest, CheckResponse};
