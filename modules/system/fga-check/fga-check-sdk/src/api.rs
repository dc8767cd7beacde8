//! Public API traits for the authorization-service client.

use std::sync::Arc;

use async_trait::async_trait;

use crate::client_config::ClientConfiguration;
use crate::error::FgaClientError;
use crate::models::{CheckRequest, CheckResponse};

/// Client of the relationship-based authorization service.
///
/// Transport, wire protocol, authentication and retry/backoff are owned by the
/// implementation. The checker only relies on the `check` operation:
///
/// ```ignore
/// let response = client.check(CheckRequest::new("document", "readme", "viewer", "user", "alice")).await?;
/// ```
#[async_trait]
pub trait FgaClient: Send + Sync {
    /// Submit a relationship check.
    ///
    /// # Errors
    ///
    /// - `InvalidParameter` if the client rejects the request before sending it
    /// - `Api` for structured errors returned by the service
    /// - `Transport` for connection/IO failures
    /// - `Interrupted` if the client's own wait was interrupted
    async fn check(&self, request: CheckRequest) -> Result<CheckResponse, FgaClientError>;
}

/// Constructs a [`FgaClient`] from a validated [`ClientConfiguration`].
pub trait FgaClientFactory: Send + Sync {
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the configuration is rejected by the client.
    fn create(
        &self,
        configuration: &ClientConfiguration,
    ) -> Result<Arc<dyn FgaClient>, FgaClientError>;
}
