//! Ambient identity accessor used when a check omits the user id.

use std::sync::Arc;

use fga_security::SecurityContext;

/// Supplies the identifier of the subject performing the current request.
pub trait SubjectProvider: Send + Sync {
    /// `None` when there is no authenticated subject.
    fn current_subject_id(&self) -> Option<String>;
}

/// A provider that never has a subject.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSubject;

impl SubjectProvider for NoSubject {
    fn current_subject_id(&self) -> Option<String> {
        None
    }
}

impl SubjectProvider for SecurityContext {
    fn current_subject_id(&self) -> Option<String> {
        self.subject_id().map(ToOwned::to_owned)
    }
}

impl<T: SubjectProvider> SubjectProvider for Option<T> {
    fn current_subject_id(&self) -> Option<String> {
        self.as_ref().and_then(SubjectProvider::current_subject_id)
    }
}

impl<T: SubjectProvider + ?Sized> SubjectProvider for Arc<T> {
    fn current_subject_id(&self) -> Option<String> {
        (**self).current_subject_id()
    }
}
