//! Settings validation.
//!
//! Rules are evaluated in a fixed order and the first violation is reported:
//! 1. credentials block (method, then method-specific fields)
//! 2. `readTimeout`, `connectTimeout`, `minimumRetryDelay` are not negative
//! 3. `maxRetries` is not negative and comes with a `minimumRetryDelay`

use std::collections::HashMap;
use std::time::Duration;

use fga_check_sdk::{CredentialsMethod, HttpVersion, TelemetryConfiguration};
use secrecy::{ExposeSecret, SecretString};

use crate::config::{CredentialsSettings, FgaSettings, SignedDuration};
use crate::domain::error::ConfigurationError;

/// Settings that passed [`validate`].
///
/// Only [`validate`] builds this type: durations and the retry count are not
/// negative, a retry count always comes with its delay, and a credentials
/// block holds every field its method requires.
#[derive(Debug, Clone)]
pub struct ValidatedSettings {
    pub(super) api_url: Option<String>,
    pub(super) store_id: Option<String>,
    pub(super) authorization_model_id: Option<String>,
    pub(super) user_agent: Option<String>,
    pub(super) read_timeout: Option<Duration>,
    pub(super) connect_timeout: Option<Duration>,
    pub(super) retry: Option<RetrySettings>,
    pub(super) http_version: Option<HttpVersion>,
    pub(super) default_headers: Option<HashMap<String, String>>,
    pub(super) telemetry: Option<TelemetryConfiguration>,
    pub(super) credentials: Option<ValidatedCredentials>,
}

impl ValidatedSettings {
    /// Method of the credentials block, if one was configured.
    #[must_use]
    pub fn credentials_method(&self) -> Option<CredentialsMethod> {
        self.credentials.as_ref().map(ValidatedCredentials::method)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct RetrySettings {
    pub(super) max_retries: Option<u32>,
    pub(super) minimum_retry_delay: Duration,
}

/// A credentials block reduced to the fields of its method.
#[derive(Debug, Clone)]
pub struct ValidatedCredentials(pub(super) CredentialsBlock);

#[derive(Debug, Clone)]
pub(super) enum CredentialsBlock {
    None,
    ApiToken {
        token: SecretString,
    },
    ClientCredentials {
        client_id: String,
        client_secret: SecretString,
        api_token_issuer: String,
        api_audience: Option<String>,
        scopes: Option<String>,
    },
}

impl ValidatedCredentials {
    #[must_use]
    pub fn method(&self) -> CredentialsMethod {
        match self.0 {
            CredentialsBlock::None => CredentialsMethod::None,
            CredentialsBlock::ApiToken { .. } => CredentialsMethod::ApiToken,
            CredentialsBlock::ClientCredentials { .. } => CredentialsMethod::ClientCredentials,
        }
    }
}

/// Check `settings` against the configuration rules.
///
/// # Errors
///
/// Returns the first [`ConfigurationError`] encountered.
pub fn validate(settings: &FgaSettings) -> Result<ValidatedSettings, ConfigurationError> {
    let credentials = settings
        .credentials
        .as_ref()
        .map(validate_credentials)
        .transpose()?;

    let read_timeout = non_negative(settings.read_timeout, "readTimeout")?;
    let connect_timeout = non_negative(settings.connect_timeout, "connectTimeout")?;
    let minimum_retry_delay = non_negative(settings.minimum_retry_delay, "minimumRetryDelay")?;

    let max_retries = settings
        .max_retries
        .map(|n| u32::try_from(n).map_err(|_| ConfigurationError::NegativeMaxRetries))
        .transpose()?;
    let retry = match (max_retries, minimum_retry_delay) {
        (Some(_), None) => return Err(ConfigurationError::MissingMinimumRetryDelay),
        (max_retries, Some(minimum_retry_delay)) => Some(RetrySettings {
            max_retries,
            minimum_retry_delay,
        }),
        (None, None) => None,
    };

    Ok(ValidatedSettings {
        api_url: settings.api_url.clone(),
        store_id: settings.store_id.clone(),
        authorization_model_id: settings.authorization_model_id.clone(),
        user_agent: settings.user_agent.clone(),
        read_timeout,
        connect_timeout,
        retry,
        http_version: settings.http_version,
        default_headers: settings.default_headers.clone(),
        telemetry: settings.telemetry_configuration.clone(),
        credentials,
    })
}

fn validate_credentials(
    credentials: &CredentialsSettings,
) -> Result<ValidatedCredentials, ConfigurationError> {
    let method = credentials
        .method
        .as_deref()
        .ok_or(ConfigurationError::MissingCredentialsMethod)?;
    let method: CredentialsMethod =
        method
            .parse()
            .map_err(|_| ConfigurationError::UnknownCredentialsMethod {
                method: method.to_owned(),
            })?;
    let config = credentials.config.clone().unwrap_or_default();

    let block = match method {
        CredentialsMethod::None => CredentialsBlock::None,
        CredentialsMethod::ApiToken => CredentialsBlock::ApiToken {
            token: config
                .api_token
                .filter(secret_has_text)
                .ok_or(ConfigurationError::MissingApiToken)?,
        },
        CredentialsMethod::ClientCredentials => {
            let (Some(api_token_issuer), Some(client_id), Some(client_secret)) = (
                config.api_token_issuer.filter(|v| has_text(Some(v.as_str()))),
                config.client_id.filter(|v| has_text(Some(v.as_str()))),
                config.client_secret.filter(secret_has_text),
            ) else {
                return Err(ConfigurationError::IncompleteClientCredentials);
            };
            CredentialsBlock::ClientCredentials {
                client_id,
                client_secret,
                api_token_issuer,
                api_audience: config.api_audience,
                scopes: config.scopes,
            }
        }
    };

    Ok(ValidatedCredentials(block))
}

fn non_negative(
    value: Option<SignedDuration>,
    field: &'static str,
) -> Result<Option<Duration>, ConfigurationError> {
    value
        .map(|d| {
            d.non_negative()
                .ok_or(ConfigurationError::NegativeDuration { field })
        })
        .transpose()
}

/// Present and containing at least one non-whitespace character.
pub(crate) fn has_text(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

fn secret_has_text(value: &SecretString) -> bool {
    has_text(Some(value.expose_secret()))
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::config::CredentialsConfigSettings;

    fn with_credentials(method: Option<&str>, config: CredentialsConfigSettings) -> FgaSettings {
        FgaSettings {
            credentials: Some(CredentialsSettings {
                method: method.map(ToOwned::to_owned),
                config: Some(config),
            }),
            ..Default::default()
        }
    }

    fn client_credentials() -> CredentialsConfigSettings {
        CredentialsConfigSettings {
            client_id: Some("client".to_owned()),
            client_secret: Some("secret".to_owned().into()),
            api_token_issuer: Some("issuer".to_owned()),
            ..Default::default()
        }
    }

    fn message(settings: &FgaSettings) -> String {
        validate(settings).unwrap_err().to_string()
    }

    #[test]
    fn empty_settings_are_valid() {
        let validated = validate(&FgaSettings::default()).unwrap();

        assert!(validated.credentials.is_none());
        assert!(validated.retry.is_none());
    }

    #[test]
    fn credentials_block_requires_method() {
        let settings = with_credentials(None, CredentialsConfigSettings::default());

        assert_eq!(message(&settings), "credentials method must not be null");
    }

    #[test]
    fn method_names_are_case_sensitive() {
        let settings = with_credentials(Some("api_token"), CredentialsConfigSettings::default());

        assert!(matches!(
            validate(&settings),
            Err(ConfigurationError::UnknownCredentialsMethod { .. })
        ));
        assert_eq!(
            message(&settings),
            "credentials method must be either 'NONE', 'API_TOKEN', or 'CLIENT_CREDENTIALS'"
        );
    }

    #[test]
    fn api_token_must_have_text() {
        for token in [None, Some(""), Some("   ")] {
            let settings = with_credentials(
                Some("API_TOKEN"),
                CredentialsConfigSettings {
                    api_token: token.map(|t| t.to_owned().into()),
                    ..Default::default()
                },
            );

            assert_eq!(
                message(&settings),
                "'API_TOKEN' credentials method specified, but no token specified"
            );
        }
    }

    #[test]
    fn api_token_without_config_block_is_rejected() {
        let settings = FgaSettings {
            credentials: Some(CredentialsSettings {
                method: Some("API_TOKEN".to_owned()),
                config: None,
            }),
            ..Default::default()
        };

        assert!(matches!(
            validate(&settings),
            Err(ConfigurationError::MissingApiToken)
        ));
    }

    #[test]
    fn client_credentials_require_id_secret_and_issuer() {
        let missing_id = CredentialsConfigSettings {
            client_id: None,
            ..client_credentials()
        };
        let missing_secret = CredentialsConfigSettings {
            client_secret: Some(" ".to_owned().into()),
            ..client_credentials()
        };
        let missing_issuer = CredentialsConfigSettings {
            api_token_issuer: Some(String::new()),
            ..client_credentials()
        };

        for config in [missing_id, missing_secret, missing_issuer] {
            let settings = with_credentials(Some("CLIENT_CREDENTIALS"), config);
            assert_eq!(
                message(&settings),
                "'CLIENT_CREDENTIALS' configuration must contain 'client-id', 'client-secret', and 'api-token-issuer'"
            );
        }
    }

    #[test]
    fn complete_client_credentials_are_accepted() {
        let settings = with_credentials(Some("CLIENT_CREDENTIALS"), client_credentials());

        let validated = validate(&settings).unwrap();
        assert_eq!(
            validated.credentials_method(),
            Some(CredentialsMethod::ClientCredentials)
        );
        let Some(ValidatedCredentials(CredentialsBlock::ClientCredentials { client_id, .. })) =
            validated.credentials
        else {
            panic!("expected client credentials");
        };
        assert_eq!(client_id, "client");
    }

    #[test]
    fn negative_durations_name_the_field() {
        let negative = Some(SignedDuration::negative(Duration::from_secs(1)));

        let read = FgaSettings {
            read_timeout: negative,
            ..Default::default()
        };
        let connect = FgaSettings {
            connect_timeout: negative,
            ..Default::default()
        };
        let delay = FgaSettings {
            minimum_retry_delay: negative,
            ..Default::default()
        };

        assert_eq!(message(&read), "readTimeout must be positive");
        assert_eq!(message(&connect), "connectTimeout must be positive");
        assert_eq!(message(&delay), "minimumRetryDelay must be positive");
    }

    #[test]
    fn zero_duration_is_accepted() {
        let settings = FgaSettings {
            read_timeout: Some(Duration::ZERO.into()),
            ..Default::default()
        };

        assert_eq!(validate(&settings).unwrap().read_timeout, Some(Duration::ZERO));
    }

    #[test]
    fn max_retries_must_not_be_negative() {
        let settings = FgaSettings {
            max_retries: Some(-1),
            minimum_retry_delay: Some(Duration::from_millis(100).into()),
            ..Default::default()
        };

        assert_eq!(message(&settings), "maxRetries must be positive or zero");
    }

    #[test]
    fn max_retries_requires_minimum_retry_delay() {
        for retries in [0, 3] {
            let settings = FgaSettings {
                max_retries: Some(retries),
                ..Default::default()
            };

            assert_eq!(
                message(&settings),
                "minimumRetryDelay must be set if maxRetries is set"
            );
        }
    }

    #[test]
    fn retry_policy_is_accepted_with_delay() {
        let settings = FgaSettings {
            max_retries: Some(3),
            minimum_retry_delay: Some(Duration::from_millis(100).into()),
            ..Default::default()
        };

        let validated = validate(&settings).unwrap();
        assert_eq!(
            validated.retry,
            Some(RetrySettings {
                max_retries: Some(3),
                minimum_retry_delay: Duration::from_millis(100),
            })
        );
    }

    #[test]
    fn minimum_retry_delay_alone_is_a_retry_setting() {
        let settings = FgaSettings {
            minimum_retry_delay: Some(Duration::from_millis(50).into()),
            ..Default::default()
        };

        let validated = validate(&settings).unwrap();
        assert_eq!(
            validated.retry,
            Some(RetrySettings {
                max_retries: None,
                minimum_retry_delay: Duration::from_millis(50),
            })
        );
    }

    #[test]
    fn api_token_is_carried_and_stray_fields_dropped() {
        let settings = with_credentials(
            Some("API_TOKEN"),
            CredentialsConfigSettings {
                api_token: Some("s3cret".to_owned().into()),
                ..client_credentials()
            },
        );

        let validated = validate(&settings).unwrap();
        let Some(ValidatedCredentials(CredentialsBlock::ApiToken { token })) = validated.credentials
        else {
            panic!("expected API token credentials");
        };
        assert_eq!(token.expose_secret(), "s3cret");
    }

    #[test]
    fn credential_rules_are_checked_before_durations() {
        let settings = FgaSettings {
            read_timeout: Some(SignedDuration::negative(Duration::from_secs(1))),
            ..with_credentials(Some("API_TOKEN"), CredentialsConfigSettings::default())
        };

        assert!(matches!(
            validate(&settings),
            Err(ConfigurationError::MissingApiToken)
        ));
    }

    #[test]
    fn has_text_ignores_whitespace() {
        assert!(has_text(Some(" a ")));
        assert!(!has_text(Some(" \t")));
        assert!(!has_text(None));
    }
}
