//! FGA Check Module
//!
//! This module turns operator settings into a validated client configuration,
//! builds the authorization-service client through an injected factory and
//! exposes the relationship checker from `fga_check_sdk`.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod domain;
pub mod module;

pub use config::{CredentialsConfigSettings, CredentialsSettings, FgaSettings, SignedDuration};
pub use domain::{ConfigurationError, InitError};
pub use module::FgaCheckModule;
