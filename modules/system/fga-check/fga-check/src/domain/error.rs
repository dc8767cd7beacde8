//! Domain errors for the FGA check module.

use fga_check_sdk::FgaClientError;

/// A violated configuration rule. Fatal at start-up.
#[derive(thiserror::Error, Debug)]
pub enum ConfigurationError {
    #[error("credentials method must not be null")]
    MissingCredentialsMethod,

    #[error("credentials method must be either 'NONE', 'API_TOKEN', or 'CLIENT_CREDENTIALS'")]
    UnknownCredentialsMethod { method: String },

    #[error("'API_TOKEN' credentials method specified, but no token specified")]
    MissingApiToken,

    #[error(
        "'CLIENT_CREDENTIALS' configuration must contain 'client-id', 'client-secret', and 'api-token-issuer'"
    )]
    IncompleteClientCredentials,

    /// `field` is one of `readTimeout`, `connectTimeout`, `minimumRetryDelay`.
    #[error("{field} must be positive")]
    NegativeDuration { field: &'static str },

    #[error("maxRetries must be positive or zero")]
    NegativeMaxRetries,

    #[error("minimumRetryDelay must be set if maxRetries is set")]
    MissingMinimumRetryDelay,

    #[error("failed to load FGA settings: {0}")]
    Load(Box<figment::Error>),
}

impl From<figment::Error> for ConfigurationError {
    fn from(e: figment::Error) -> Self {
        Self::Load(Box::new(e))
    }
}

/// Errors raised while assembling the module at start-up.
#[derive(thiserror::Error, Debug)]
pub enum InitError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("Failed to create OpenFgaClient")]
    ClientCreation(#[source] FgaClientError),
}
