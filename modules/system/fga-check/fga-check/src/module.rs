//! FGA check module.

use std::sync::Arc;

use fga_check_sdk::{ClientConfiguration, FgaChecker, FgaClient, FgaClientFactory};
use tracing::info;

use crate::config::FgaSettings;
use crate::domain::{InitError, build_client_configuration, validate};

/// FGA check module.
///
/// This module:
/// 1. Validates the raw settings
/// 2. Builds the client configuration (only when an API URL is configured)
/// 3. Creates the authorization-service client through the supplied factory
/// 4. Hands out [`FgaChecker`]s bound to that client, one per caller
pub struct FgaCheckModule {
    configuration: ClientConfiguration,
    client: Arc<dyn FgaClient>,
    checker: FgaChecker,
}

impl FgaCheckModule {
    pub const MODULE_NAME: &'static str = "fga-check";

    /// Initialize the module.
    ///
    /// Returns `Ok(None)` when no API URL is configured.
    ///
    /// # Errors
    ///
    /// - [`ConfigurationError`](crate::domain::ConfigurationError) if a setting breaks a rule
    /// - [`InitError::ClientCreation`] if the factory rejects the configuration
    #[tracing::instrument(skip_all, fields(api_url))]
    pub fn init(
        settings: &FgaSettings,
        factory: &dyn FgaClientFactory,
    ) -> anyhow::Result<Option<Self>> {
        info!("Initializing {} module", Self::MODULE_NAME);

        let validated = validate(settings).map_err(InitError::from)?;
        let Some(configuration) = build_client_configuration(validated) else {
            info!("No API URL configured, {} module is disabled", Self::MODULE_NAME);
            return Ok(None);
        };
        tracing::Span::current().record("api_url", configuration.api_url());

        let client = factory
            .create(&configuration)
            .map_err(InitError::ClientCreation)?;
        let checker = FgaChecker::new(client.clone());

        info!(
            api_url = %configuration.api_url(),
            store_id = configuration.store_id().unwrap_or_default(),
            credentials = %configuration.credentials().method(),
            "{} module initialized successfully",
            Self::MODULE_NAME
        );

        Ok(Some(Self {
            configuration,
            client,
            checker,
        }))
    }

    #[must_use]
    pub fn configuration(&self) -> &ClientConfiguration {
        &self.configuration
    }

    #[must_use]
    pub fn client(&self) -> Arc<dyn FgaClient> {
        self.client.clone()
    }

    /// A fresh checker without an ambient subject. Attach one per request with
    /// [`FgaChecker::with_subject_provider`].
    ///
    /// Each call returns a checker with its own interruption signal, so an
    /// interrupted check does not affect checkers handed to other callers.
    /// [`FgaCheckModule::shutdown`] interrupts all of them.
    #[must_use]
    pub fn checker(&self) -> FgaChecker {
        self.checker.child()
    }

    /// Interrupt pending and future checks of every checker from this module.
    pub fn shutdown(&self) {
        info!("Shutting down {} module", Self::MODULE_NAME);
        self.checker.cancellation_token().cancel();
    }

    #[must_use]
    pub fn is_shut_down(&self) -> bool {
        self.checker.cancellation_token().is_cancelled()
    }
}

impl std::fmt::Debug for FgaCheckModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FgaCheckModule")
            .field("configuration", &self.configuration)
            .field("checker", &self.checker)
            .finish_non_exhaustive()
    }
}
