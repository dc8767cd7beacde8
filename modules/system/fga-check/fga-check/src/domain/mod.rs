//! Domain layer for the FGA check module.

pub mod builder;
pub mod credentials;
pub mod error;
pub mod validation;

pub use builder::build_client_configuration;
pub use credentials::resolve_credentials;
pub use error::{ConfigurationError, InitError};
pub use validation::{ValidatedCredentials, ValidatedSettings, validate};
