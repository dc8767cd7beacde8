//! Relationship-check invoker.
//!
//! [`FgaChecker`] turns `(object type, object id, relation, user type, user id)`
//! into a boolean decision. When the user id is omitted the subject is taken
//! from the injected [`SubjectProvider`]. Every failure of the call is routed
//! through [`FgaErrorHandler`] so callers get either a decision or an
//! [`FgaError`], never a silent "denied".

use std::fmt;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::api::FgaClient;
use crate::error::{CheckError, FgaClientError, FgaError, Interrupted};
use crate::error_handler::FgaErrorHandler;
use crate::identity::{NoSubject, SubjectProvider};
use crate::models::CheckRequest;

/// Performs relationship checks against an [`FgaClient`].
///
/// Constructed once during init; cloneable and cheap to pass around. Clones
/// share the client, the subject provider and the cancellation token, so an
/// interruption seen through one clone is seen by all of them. Hand each
/// caller its own checker with [`FgaChecker::child`].
///
/// # Example
///
/// ```ignore
/// let checker = FgaChecker::new(client)
///     .with_subject_provider(Arc::new(ctx.clone()))
///     .with_cancellation(shutdown.child_token());
///
/// if checker.check("document", &doc_id, "viewer", "user", None).await? {
///     // ...
/// }
/// ```
#[derive(Clone)]
pub struct FgaChecker {
    client: Arc<dyn FgaClient>,
    subjects: Arc<dyn SubjectProvider>,
    interrupt: CancellationToken,
    errors: FgaErrorHandler,
}

impl FgaChecker {
    /// Create a checker without an ambient subject.
    pub fn new(client: Arc<dyn FgaClient>) -> Self {
        Self {
            client,
            subjects: Arc::new(NoSubject),
            interrupt: CancellationToken::new(),
            errors: FgaErrorHandler::default(),
        }
    }

    /// Source of the subject used when a check omits the user id.
    #[must_use]
    pub fn with_subject_provider(mut self, subjects: Arc<dyn SubjectProvider>) -> Self {
        self.subjects = subjects;
        self
    }

    /// Token observed while waiting for a response, and cancelled again when
    /// a failure was caused by an interruption.
    #[must_use]
    pub fn with_cancellation(mut self, interrupt: CancellationToken) -> Self {
        self.interrupt = interrupt;
        self
    }

    #[must_use]
    pub fn with_error_handler(mut self, errors: FgaErrorHandler) -> Self {
        self.errors = errors;
        self
    }

    /// Checker for a single caller.
    ///
    /// Shares the client, the subject provider and the error handler. Its token
    /// is a child of this checker's token: cancelling this checker reaches the
    /// child, while an interruption re-signaled by the child stays local to it.
    #[must_use]
    pub fn child(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            subjects: Arc::clone(&self.subjects),
            interrupt: self.interrupt.child_token(),
            errors: self.errors,
        }
    }

    #[must_use]
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.interrupt
    }

    /// Check whether `user_type:user_id` has `relation` to `object_type:object_id`.
    ///
    /// With `user_id == None` the subject comes from the configured
    /// [`SubjectProvider`].
    ///
    /// # Errors
    ///
    /// - [`CheckError::SubjectMissing`] if no user id was given and there is no
    ///   ambient subject; nothing is sent in that case
    /// - [`CheckError::Fga`] for any failure of the call itself
    #[tracing::instrument(
        skip_all,
        fields(object_type = %object_type, object_id = %object_id, relation = %relation)
    )]
    pub async fn check(
        &self,
        object_type: &str,
        object_id: &str,
        relation: &str,
        user_type: &str,
        user_id: Option<&str>,
    ) -> Result<bool, CheckError> {
        let user_id = match user_id {
            Some(id) => id.to_owned(),
            None => self
                .subjects
                .current_subject_id()
                .ok_or(CheckError::SubjectMissing)?,
        };

        let request = CheckRequest::new(object_type, object_id, relation, user_type, &user_id);
        Ok(self.submit(request).await?)
    }

    /// Check on behalf of the ambient subject.
    ///
    /// # Errors
    ///
    /// Same as [`FgaChecker::check`].
    pub async fn check_current(
        &self,
        object_type: &str,
        object_id: &str,
        relation: &str,
        user_type: &str,
    ) -> Result<bool, CheckError> {
        self.check(object_type, object_id, relation, user_type, None)
            .await
    }

    /// Submit a prepared request and wait for the decision.
    ///
    /// The wait is abandoned as soon as the cancellation token fires.
    ///
    /// # Errors
    ///
    /// Returns an [`FgaError`] with message `Error performing FGA check` for
    /// transport, API, parameter and interruption failures.
    pub async fn submit(&self, request: CheckRequest) -> Result<bool, FgaError> {
        debug!(
            user = %request.user,
            relation = %request.relation,
            object = %request.object,
            "submitting FGA check"
        );

        let outcome = tokio::select! {
            biased;
            () = self.interrupt.cancelled() => Err(FgaClientError::from(Interrupted)),
            res = self.client.check(request) => res,
        };

        match outcome {
            Ok(response) => {
                let allowed = response.is_allowed();
                debug!(allowed, "FGA check completed");
                Ok(allowed)
            }
            Err(e) => {
                let err = self.errors.handle(
                    e,
                    &self.interrupt,
                    format_args!("Error performing FGA check"),
                );
                warn!(
                    error = %err,
                    root_cause = %err.root_cause(),
                    status_code = err.api_error().map(|api| api.status_code),
                    "FGA check failed"
                );
                Err(err)
            }
        }
    }
}

impl fmt::Debug for FgaChecker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FgaChecker")
            .field("interrupted", &self.interrupt.is_cancelled())
            .field("errors", &self.errors)
            .finish_non_exhaustive()
    }
}
