use secrecy::SecretString;

/// `SecurityContext` carries the security-related information of a request.
///
/// Built by the request-handling layer once the caller is authenticated and passed
/// to the FGA checker, which falls back to [`SecurityContext::subject_id`] when a
/// check is performed without an explicit user id.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct SecurityContext {
    /// Authenticated subject name (e.g. the user name or client id).
    /// `None` for anonymous requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    subject_id: Option<String>,
    /// Subject type classification (e.g., "user", "service").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    subject_type: Option<String>,
    /// Token capability restrictions asserted by the authentication layer.
    #[serde(default)]
    token_scopes: Vec<String>,
    /// Original bearer token. Never serialized/persisted.
    /// Wrapped in `SecretString` so `Debug` redacts the value automatically.
    #[serde(skip)]
    bearer_token: Option<SecretString>,
}

impl SecurityContext {
    /// Create a new `SecurityContext` builder
    #[must_use]
    pub fn builder() -> SecurityContextBuilder {
        SecurityContextBuilder::default()
    }

    /// Create an anonymous `SecurityContext` with no subject
    #[must_use]
    pub fn anonymous() -> Self {
        SecurityContextBuilder::default().build()
    }

    /// Get the authenticated subject name, if any.
    #[must_use]
    pub fn subject_id(&self) -> Option<&str> {
        self.subject_id.as_deref()
    }

    /// Get the subject type classification (e.g., "user", "service").
    #[must_use]
    pub fn subject_type(&self) -> Option<&str> {
        self.subject_type.as_deref()
    }

    /// Whether an authenticated subject is present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.subject_id.is_some()
    }

    #[must_use]
    pub fn token_scopes(&self) -> &[String] {
        &self.token_scopes
    }

    #[must_use]
    pub fn bearer_token(&self) -> Option<&SecretString> {
        self.bearer_token.as_ref()
    }
}

#[derive(Default)]
pub struct SecurityContextBuilder {
    subject_id: Option<String>,
    subject_type: Option<String>,
    token_scopes: Vec<String>,
    bearer_token: Option<SecretString>,
}

impl SecurityContextBuilder {
    /// Set the subject name. Blank names are treated as "no subject".
    #[must_use]
    pub fn subject_id(mut self, subject_id: impl Into<String>) -> Self {
        let subject_id = subject_id.into();
        self.subject_id = (!subject_id.trim().is_empty()).then_some(subject_id);
        self
    }

    #[must_use]
    pub fn subject_type(mut self, subject_type: &str) -> Self {
        self.subject_type = Some(subject_type.to_owned());
        self
    }

    #[must_use]
    pub fn token_scopes(mut self, scopes: Vec<String>) -> Self {
        self.token_scopes = scopes;
        self
    }

    #[must_use]
    pub fn bearer_token(mut self, token: impl Into<SecretString>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    #[must_use]
    pub fn build(self) -> SecurityContext {
        SecurityContext {
            subject_id: self.subject_id,
            subject_type: self.subject_type,
            token_scopes: self.token_scopes,
            bearer_token: self.bearer_token,
        }
    }
}
