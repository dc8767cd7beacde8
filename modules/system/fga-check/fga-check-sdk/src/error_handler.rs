//! Normalization of check failures into [`FgaError`].
//!
//! The handler:
//! - re-signals interruption on the caller's cancellation token,
//! - walks the cause chain to its root (stopping on cycles),
//! - copies structured diagnostics when the root cause is an [`FgaApiError`].

use std::error::Error as StdError;
use std::fmt;

use tokio_util::sync::CancellationToken;

use crate::error::{FgaApiError, FgaError, Interrupted};

/// Upper bound on the number of causes visited while looking for the root.
const DEFAULT_MAX_CAUSE_DEPTH: usize = 64;

/// Turns any failure from the check path into an [`FgaError`].
#[derive(Debug, Clone, Copy)]
pub struct FgaErrorHandler {
    max_cause_depth: usize,
}

impl Default for FgaErrorHandler {
    fn default() -> Self {
        Self {
            max_cause_depth: DEFAULT_MAX_CAUSE_DEPTH,
        }
    }
}

impl FgaErrorHandler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_max_cause_depth(mut self, depth: usize) -> Self {
        self.max_cause_depth = depth.max(1);
        self
    }

    /// Build an [`FgaError`] from `cause` with the formatted `message`.
    ///
    /// If any error of the cause chain is [`Interrupted`], `interrupt` is cancelled
    /// before the result is built so enclosing code observes the cancellation.
    /// Never fails.
    ///
    /// ```ignore
    /// let err = handler.handle(e, &token, format_args!("Error reading store {store_id}"));
    /// ```
    pub fn handle<E>(
        &self,
        cause: E,
        interrupt: &CancellationToken,
        message: fmt::Arguments<'_>,
    ) -> FgaError
    where
        E: Into<Box<dyn StdError + Send + Sync + 'static>>,
    {
        let cause = cause.into();
        let chain = self.cause_chain(cause.as_ref());

        if chain.iter().any(|e| e.is::<Interrupted>()) {
            interrupt.cancel();
        }

        let api_error = chain
            .last()
            .and_then(|root| root.downcast_ref::<FgaApiError>())
            .map(|api| api.details().clone());

        if let Some(api) = &api_error {
            tracing::debug!(
                status_code = api.status_code,
                api_error_code = ?api.api_error_code,
                request_id = ?api.request_id,
                "FGA API error recognized as root cause"
            );
        }

        FgaError::new(message.to_string(), cause, api_error)
    }

    /// The cause chain starting at `error`, ending at the root cause.
    ///
    /// Stops when an error has no source, when a source was already visited
    /// (including an error that is its own source), or at the depth limit.
    ///
    /// Identity is the full `dyn` pointer: a newtype enum variant shares its
    /// address with its payload, so the address alone does not tell them apart.
    fn cause_chain<'a>(
        &self,
        error: &'a (dyn StdError + 'static),
    ) -> Vec<&'a (dyn StdError + 'static)> {
        let mut chain = vec![error];
        let mut current = error;

        while chain.len() < self.max_cause_depth {
            let Some(next) = current.source() else {
                break;
            };
            if chain.iter().any(|seen| std::ptr::eq(*seen, next)) {
                break;
            }
            chain.push(next);
            current = next;
        }

        chain
    }
}

pub(crate) fn root_cause<'a>(
    error: &'a (dyn StdError + 'static),
) -> &'a (dyn StdError + 'static) {
    FgaErrorHandler::default()
        .cause_chain(error)
        .last()
        .copied()
        .unwrap_or(error)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::error::{FgaApiErrorDetails, FgaClientError};

    #[derive(Debug, thiserror::Error)]
    #[error("wrapper: {inner}")]
    struct Wrapper {
        #[source]
        inner: FgaClientError,
    }

    /// An error that reports itself as its own source.
    #[derive(Debug)]
    struct SelfCaused;

    impl fmt::Display for SelfCaused {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("self caused")
        }
    }

    impl StdError for SelfCaused {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            Some(self)
        }
    }

    /// `Ping` and `Pong` report each other as source.
    #[derive(Debug)]
    struct Ping(u8);

    #[derive(Debug)]
    struct Pong(u8);

    static PING: Ping = Ping(1);
    static PONG: Pong = Pong(2);

    impl fmt::Display for Ping {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "ping {}", self.0)
        }
    }

    impl fmt::Display for Pong {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "pong {}", self.0)
        }
    }

    impl StdError for Ping {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            Some(&PONG)
        }
    }

    impl StdError for Pong {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            Some(&PING)
        }
    }

    fn not_found() -> FgaApiError {
        FgaApiError::new(
            "Check endpoint not found.",
            FgaApiErrorDetails {
                status_code: 404,
                method: Some("POST".to_owned()),
                request_url: Some("https://openfga.dev/".to_owned()),
                api_error_code: Some("123".to_owned()),
                audience: Some("audience".to_owned()),
                grant_type: Some("authorization_code".to_owned()),
                client_id: Some("integration-test".to_owned()),
                request_id: Some("b4a8a2c1-9f4e-4c55-8d0e-3f6f4f2f0c11".to_owned()),
                response_data: Some(r#"{"apiErrorCode":"123"}"#.to_owned()),
            },
        )
    }

    #[test]
    fn plain_error_keeps_cause_without_api_context() {
        let token = CancellationToken::new();
        let err = FgaErrorHandler::new().handle(
            "This is the root cause.",
            &token,
            format_args!("OpenFGA test exception"),
        );

        assert_eq!(err.message(), "OpenFGA test exception");
        assert!(err.cause().to_string().contains("This is the root cause."));
        assert!(err.api_error().is_none());
        assert!(!token.is_cancelled());
    }

    #[test]
    fn api_error_root_cause_is_copied() {
        let token = CancellationToken::new();
        let cause = Wrapper {
            inner: FgaClientError::from(not_found()),
        };

        let err = FgaErrorHandler::new().handle(
            cause,
            &token,
            format_args!("OpenFGA check exception for {}", "document:readme"),
        );

        assert_eq!(err.message(), "OpenFGA check exception for document:readme");
        assert!(err.root_cause().to_string().contains("Check endpoint not found."));

        let api = err.api_error().expect("structured context");
        assert_eq!(api.status_code, 404);
        assert_eq!(api.api_error_code.as_deref(), Some("123"));
        assert_eq!(api.audience.as_deref(), Some("audience"));
        assert_eq!(api.method.as_deref(), Some("POST"));
        assert_eq!(
            api.request_id.as_deref(),
            Some("b4a8a2c1-9f4e-4c55-8d0e-3f6f4f2f0c11")
        );
        assert_eq!(api.client_id.as_deref(), Some("integration-test"));
        assert_eq!(api.grant_type.as_deref(), Some("authorization_code"));
        assert!(!format!("{err:?}").is_empty());
    }

    #[test]
    fn outer_cause_is_kept_alongside_root() {
        let token = CancellationToken::new();
        let err = FgaErrorHandler::new().handle(
            FgaClientError::from(not_found()),
            &token,
            format_args!("Error performing FGA check"),
        );

        assert!(err.cause().is::<FgaClientError>());
        assert!(err.root_cause().is::<FgaApiError>());
    }

    #[test]
    fn self_referencing_cause_terminates() {
        let token = CancellationToken::new();
        let err = FgaErrorHandler::new().handle(SelfCaused, &token, format_args!("loop"));

        assert_eq!(err.root_cause().to_string(), "self caused");
        assert!(err.api_error().is_none());
    }

    #[test]
    fn two_node_cycle_terminates_before_depth_limit() {
        let chain_len = FgaErrorHandler::new().cause_chain(&PING).len();
        assert_eq!(chain_len, 2);

        let token = CancellationToken::new();
        let err = FgaErrorHandler::new().handle(Ping(0), &token, format_args!("loop"));

        // owned Ping -> PONG -> PING, then PONG again
        assert_eq!(err.root_cause().to_string(), "ping 1");
        assert!(err.api_error().is_none());
    }

    #[test]
    fn newtype_variant_is_not_mistaken_for_its_payload() {
        let api = FgaClientError::from(not_found());
        let interrupted = FgaClientError::from(Interrupted);

        let handler = FgaErrorHandler::new();
        let api_chain = handler.cause_chain(&api);
        let interrupted_chain = handler.cause_chain(&interrupted);

        assert_eq!(api_chain.len(), 2);
        assert!(api_chain[1].is::<FgaApiError>());
        assert_eq!(interrupted_chain.len(), 2);
        assert!(interrupted_chain[1].is::<Interrupted>());
    }

    #[test]
    fn interruption_is_re_signaled() {
        let token = CancellationToken::new();
        let err = FgaErrorHandler::new().handle(
            FgaClientError::from(Interrupted),
            &token,
            format_args!("Error performing FGA check"),
        );

        assert!(token.is_cancelled());
        assert!(err.root_cause().is::<Interrupted>());
    }

    #[test]
    fn depth_limit_bounds_traversal() {
        let token = CancellationToken::new();
        let err = FgaErrorHandler::new().with_max_cause_depth(1).handle(
            FgaClientError::from(not_found()),
            &token,
            format_args!("shallow"),
        );

        // Only the top-level error is inspected, so no structured context is found.
        assert!(err.api_error().is_none());
    }
}
