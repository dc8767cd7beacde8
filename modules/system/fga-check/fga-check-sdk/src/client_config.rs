//! Validated, immutable configuration consumed by [`FgaClientFactory`](crate::FgaClientFactory).

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// HTTP protocol version used for the connection to the authorization service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpVersion {
    #[serde(rename = "HTTP_1_1")]
    Http1_1,
    #[serde(rename = "HTTP_2")]
    Http2,
}

/// Telemetry metrics emitted by the authorization-service client.
///
/// See <https://openfga.dev/docs/getting-started/configure-telemetry>.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TelemetryMetric {
    /// Counter of access token requests.
    CredentialsRequest,
    /// Histogram of the time the server spent evaluating the request (ms).
    QueryDuration,
    /// Histogram of the full request round-trip time (ms).
    RequestDuration,
}

impl TelemetryMetric {
    #[must_use]
    pub fn metric_name(self) -> &'static str {
        match self {
            Self::CredentialsRequest => "fga-client.credentials.request",
            Self::QueryDuration => "fga-client.query.duration",
            Self::RequestDuration => "fga-client.request.duration",
        }
    }
}

/// Attributes that can be attached to telemetry metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TelemetryAttribute {
    FgaClientRequestClientId,
    FgaClientRequestMethod,
    FgaClientRequestModelId,
    FgaClientRequestStoreId,
    FgaClientResponseModelId,
    HttpHost,
    HttpRequestMethod,
    HttpRequestResendCount,
    HttpResponseStatusCode,
    UrlFull,
    UrlScheme,
    UserAgent,
}

impl TelemetryAttribute {
    #[must_use]
    pub fn attribute_name(self) -> &'static str {
        match self {
            Self::FgaClientRequestClientId => "fga-client.request.client_id",
            Self::FgaClientRequestMethod => "fga-client.request.method",
            Self::FgaClientRequestModelId => "fga-client.request.model_id",
            Self::FgaClientRequestStoreId => "fga-client.request.store_id",
            Self::FgaClientResponseModelId => "fga-client.response.model_id",
            Self::HttpHost => "http.host",
            Self::HttpRequestMethod => "http.request.method",
            Self::HttpRequestResendCount => "http.request.resend_count",
            Self::HttpResponseStatusCode => "http.response.status_code",
            Self::UrlFull => "url.full",
            Self::UrlScheme => "url.scheme",
            Self::UserAgent => "user_agent.original",
        }
    }
}

/// Enabled metrics and, per metric, the attributes to record.
/// A `None` attribute value enables the attribute without an override.
pub type TelemetryConfiguration =
    HashMap<TelemetryMetric, HashMap<TelemetryAttribute, Option<String>>>;

/// Authentication strategy of the authorization-service client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialsMethod {
    /// No authentication.
    None,
    /// A static API token (an OAuth2 access token) sent with every request.
    ApiToken,
    /// OAuth2 client credentials exchanged for an access token.
    ClientCredentials,
}

impl CredentialsMethod {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::ApiToken => "API_TOKEN",
            Self::ClientCredentials => "CLIENT_CREDENTIALS",
        }
    }
}

impl fmt::Display for CredentialsMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a credentials method name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown credentials method '{0}'")]
pub struct UnknownCredentialsMethod(pub String);

impl FromStr for CredentialsMethod {
    type Err = UnknownCredentialsMethod;

    /// Method names are matched exactly (`NONE`, `API_TOKEN`, `CLIENT_CREDENTIALS`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NONE" => Ok(Self::None),
            "API_TOKEN" => Ok(Self::ApiToken),
            "CLIENT_CREDENTIALS" => Ok(Self::ClientCredentials),
            other => Err(UnknownCredentialsMethod(other.to_owned())),
        }
    }
}

/// OAuth2 client-credentials settings.
#[derive(Debug, Clone)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: SecretString,
    /// Token issuer used to obtain access tokens.
    pub api_token_issuer: String,
    pub api_audience: Option<String>,
    /// Space-separated list of scopes.
    pub scopes: Option<String>,
}

impl ClientCredentials {
    /// Individual scopes of the space-separated scope list.
    pub fn scopes(&self) -> impl Iterator<Item = &str> {
        self.scopes.as_deref().unwrap_or_default().split_whitespace()
    }
}

/// Credentials of the authorization-service client. Exactly one method is active.
#[derive(Debug, Clone, Default)]
pub enum Credentials {
    #[default]
    None,
    ApiToken { token: SecretString },
    ClientCredentials(ClientCredentials),
}

impl Credentials {
    #[must_use]
    pub fn method(&self) -> CredentialsMethod {
        match self {
            Self::None => CredentialsMethod::None,
            Self::ApiToken { .. } => CredentialsMethod::ApiToken,
            Self::ClientCredentials(_) => CredentialsMethod::ClientCredentials,
        }
    }
}

/// Immutable configuration of the authorization-service client.
///
/// Optional fields that were not configured stay `None` so the client applies
/// its own defaults. Built once at start-up through [`ClientConfiguration::builder`].
#[derive(Debug, Clone)]
pub struct ClientConfiguration {
    api_url: String,
    store_id: Option<String>,
    authorization_model_id: Option<String>,
    user_agent: Option<String>,
    credentials: Credentials,
    read_timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    max_retries: Option<u32>,
    minimum_retry_delay: Option<Duration>,
    http_version: Option<HttpVersion>,
    default_headers: Option<HashMap<String, String>>,
    telemetry: Option<TelemetryConfiguration>,
}

impl ClientConfiguration {
    #[must_use]
    pub fn builder(api_url: impl Into<String>) -> ClientConfigurationBuilder {
        ClientConfigurationBuilder {
            config: Self {
                api_url: api_url.into(),
                store_id: None,
                authorization_model_id: None,
                user_agent: None,
                credentials: Credentials::None,
                read_timeout: None,
                connect_timeout: None,
                max_retries: None,
                minimum_retry_delay: None,
                http_version: None,
                default_headers: None,
                telemetry: None,
            },
        }
    }

    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    #[must_use]
    pub fn store_id(&self) -> Option<&str> {
        self.store_id.as_deref()
    }

    #[must_use]
    pub fn authorization_model_id(&self) -> Option<&str> {
        self.authorization_model_id.as_deref()
    }

    #[must_use]
    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    #[must_use]
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    #[must_use]
    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout
    }

    #[must_use]
    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout
    }

    #[must_use]
    pub fn max_retries(&self) -> Option<u32> {
        self.max_retries
    }

    /// Always `Some` when [`Self::max_retries`] is `Some`.
    #[must_use]
    pub fn minimum_retry_delay(&self) -> Option<Duration> {
        self.minimum_retry_delay
    }

    #[must_use]
    pub fn http_version(&self) -> Option<HttpVersion> {
        self.http_version
    }

    #[must_use]
    pub fn default_headers(&self) -> Option<&HashMap<String, String>> {
        self.default_headers.as_ref()
    }

    #[must_use]
    pub fn telemetry(&self) -> Option<&TelemetryConfiguration> {
        self.telemetry.as_ref()
    }
}

pub struct ClientConfigurationBuilder {
    config: ClientConfiguration,
}

impl ClientConfigurationBuilder {
    #[must_use]
    pub fn store_id(mut self, store_id: impl Into<String>) -> Self {
        self.config.store_id = Some(store_id.into());
        self
    }

    #[must_use]
    pub fn authorization_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.config.authorization_model_id = Some(model_id.into());
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = Some(user_agent.into());
        self
    }

    #[must_use]
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.config.credentials = credentials;
        self
    }

    #[must_use]
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.config.read_timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = Some(timeout);
        self
    }

    /// Retry count and the delay it depends on are set together.
    #[must_use]
    pub fn retries(mut self, max_retries: u32, minimum_delay: Duration) -> Self {
        self.config.max_retries = Some(max_retries);
        self.config.minimum_retry_delay = Some(minimum_delay);
        self
    }

    #[must_use]
    pub fn minimum_retry_delay(mut self, delay: Duration) -> Self {
        self.config.minimum_retry_delay = Some(delay);
        self
    }

    #[must_use]
    pub fn http_version(mut self, version: HttpVersion) -> Self {
        self.config.http_version = Some(version);
        self
    }

    #[must_use]
    pub fn default_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.config.default_headers = Some(headers);
        self
    }

    #[must_use]
    pub fn telemetry(mut self, telemetry: TelemetryConfiguration) -> Self {
        self.config.telemetry = Some(telemetry);
        self
    }

    #[must_use]
    pub fn build(self) -> ClientConfiguration {
        self.config
    }
}
