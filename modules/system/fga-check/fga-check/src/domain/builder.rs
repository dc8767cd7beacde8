//! Assembly of the [`ClientConfiguration`].

use fga_check_sdk::ClientConfiguration;

use crate::domain::credentials::resolve_credentials;
use crate::domain::validation::{RetrySettings, ValidatedSettings, has_text};

/// Compose validated settings into the client configuration.
///
/// Returns `None` when no API URL is configured. Blank strings and absent
/// values are left unset so the client falls back to its own defaults.
#[must_use]
pub fn build_client_configuration(settings: ValidatedSettings) -> Option<ClientConfiguration> {
    let ValidatedSettings {
        api_url,
        store_id,
        authorization_model_id,
        user_agent,
        read_timeout,
        connect_timeout,
        retry,
        http_version,
        default_headers,
        telemetry,
        credentials,
    } = settings;

    let api_url = text(api_url)?;
    let mut builder = ClientConfiguration::builder(api_url)
        .credentials(resolve_credentials(credentials.as_ref()));

    if let Some(store_id) = text(store_id) {
        builder = builder.store_id(store_id);
    }
    if let Some(model_id) = text(authorization_model_id) {
        builder = builder.authorization_model_id(model_id);
    }
    if let Some(user_agent) = text(user_agent) {
        builder = builder.user_agent(user_agent);
    }
    if let Some(timeout) = read_timeout {
        builder = builder.read_timeout(timeout);
    }
    if let Some(timeout) = connect_timeout {
        builder = builder.connect_timeout(timeout);
    }
    if let Some(RetrySettings {
        max_retries,
        minimum_retry_delay,
    }) = retry
    {
        builder = match max_retries {
            Some(max) => builder.retries(max, minimum_retry_delay),
            None => builder.minimum_retry_delay(minimum_retry_delay),
        };
    }
    if let Some(version) = http_version {
        builder = builder.http_version(version);
    }
    if let Some(headers) = default_headers {
        builder = builder.default_headers(headers);
    }
    if let Some(telemetry) = telemetry {
        builder = builder.telemetry(telemetry);
    }

    Some(builder.build())
}

fn text(value: Option<String>) -> Option<String> {
    value.filter(|v| has_text(Some(v.as_str())))
}
