//! Raw settings of the FGA check module.
//!
//! Everything here is loosely typed on purpose: negative durations, negative
//! retry counts and unknown credential methods are representable so that
//! [`validate`](crate::domain::validate) can report them precisely.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::time::Duration;

use fga_check_sdk::{HttpVersion, TelemetryConfiguration};
use figment::Figment;
use figment::providers::{Env, Format, Yaml};
use secrecy::SecretString;
use serde::Deserialize;

use crate::domain::ConfigurationError;

/// Section of the YAML file holding the settings.
pub const CONFIG_SECTION: &str = "openfga";

/// Prefix of environment variables overriding the file.
pub const ENV_PREFIX: &str = "FGA_CHECK_";

/// Settings as supplied by the operator.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct FgaSettings {
    /// Base URL of the authorization service. Without it no client is built.
    pub api_url: Option<String>,
    pub store_id: Option<String>,
    pub authorization_model_id: Option<String>,
    pub user_agent: Option<String>,
    pub read_timeout: Option<SignedDuration>,
    pub connect_timeout: Option<SignedDuration>,
    pub max_retries: Option<i32>,
    pub minimum_retry_delay: Option<SignedDuration>,
    pub http_version: Option<HttpVersion>,
    pub default_headers: Option<HashMap<String, String>>,
    pub telemetry_configuration: Option<TelemetryConfiguration>,
    pub credentials: Option<CredentialsSettings>,
}

/// `credentials` block.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CredentialsSettings {
    /// `NONE`, `API_TOKEN` or `CLIENT_CREDENTIALS`.
    pub method: Option<String>,
    pub config: Option<CredentialsConfigSettings>,
}

/// `credentials.config` block.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct CredentialsConfigSettings {
    pub api_token: Option<SecretString>,
    pub client_id: Option<String>,
    pub client_secret: Option<SecretString>,
    pub api_token_issuer: Option<String>,
    pub api_audience: Option<String>,
    /// Space-separated list of scopes.
    pub scopes: Option<String>,
}

impl FgaSettings {
    /// Load settings from the `openfga` section of `path` (if any), overridden
    /// by `FGA_CHECK_*` environment variables.
    ///
    /// In variable names `__` separates nesting levels and `_` stands for `-`:
    /// `FGA_CHECK_CREDENTIALS__CONFIG__API_TOKEN` sets `credentials.config.api-token`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::Load`] if a source cannot be read or does
    /// not match the expected shape.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigurationError> {
        Self::figment(path).extract().map_err(ConfigurationError::from)
    }

    /// The provider stack used by [`FgaSettings::load`].
    #[must_use]
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::new();
        if let Some(path) = path {
            figment = figment.merge(Figment::from(Yaml::file(path)).focus(CONFIG_SECTION));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).map(|key| {
            key.as_str()
                .to_ascii_lowercase()
                .replace("__", ".")
                .replace('_', "-")
                .into()
        }))
    }
}

/// A duration that may be negative.
///
/// Deserialized from an integer number of seconds or from a string holding an
/// optional `-` followed by whole seconds, a [`humantime`] duration
/// (`"10s"`, `"1m 30s"`, `"250ms"`) or an ISO-8601 duration (`"PT10S"`,
/// `"P1DT2H"`, `"PT0.25S"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawDuration")]
pub struct SignedDuration {
    negative: bool,
    magnitude: Duration,
}

impl SignedDuration {
    #[must_use]
    pub fn positive(magnitude: Duration) -> Self {
        Self {
            negative: false,
            magnitude,
        }
    }

    #[must_use]
    pub fn negative(magnitude: Duration) -> Self {
        Self {
            negative: !magnitude.is_zero(),
            magnitude,
        }
    }

    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// The duration, or `None` if it is negative.
    #[must_use]
    pub fn non_negative(&self) -> Option<Duration> {
        (!self.negative).then_some(self.magnitude)
    }
}

impl From<Duration> for SignedDuration {
    fn from(value: Duration) -> Self {
        Self::positive(value)
    }
}

impl fmt::Display for SignedDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            f.write_str("-")?;
        }
        write!(f, "{}", humantime::format_duration(self.magnitude))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDuration {
    Seconds(i64),
    Text(String),
}

impl TryFrom<RawDuration> for SignedDuration {
    type Error = String;

    fn try_from(raw: RawDuration) -> Result<Self, Self::Error> {
        match raw {
            RawDuration::Seconds(secs) => {
                let magnitude = Duration::from_secs(secs.unsigned_abs());
                Ok(if secs < 0 {
                    Self::negative(magnitude)
                } else {
                    Self::positive(magnitude)
                })
            }
            RawDuration::Text(text) => text.parse(),
        }
    }
}

impl std::str::FromStr for SignedDuration {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (negative, body) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest.trim_start()),
            None => (false, trimmed),
        };

        let magnitude = if body.starts_with(['P', 'p']) {
            parse_iso8601(body).ok_or_else(|| format!("invalid ISO-8601 duration '{s}'"))?
        } else {
            match body.parse::<u64>() {
                Ok(secs) => Duration::from_secs(secs),
                Err(_) => humantime::parse_duration(body)
                    .map_err(|e| format!("invalid duration '{s}': {e}"))?,
            }
        };

        Ok(if negative {
            Self::negative(magnitude)
        } else {
            Self::positive(magnitude)
        })
    }
}

/// `PnDTnHnMn.nS`, case-insensitive. Components are unsigned; a negative
/// duration carries a single leading `-` handled by the caller.
fn parse_iso8601(text: &str) -> Option<Duration> {
    let text = text.to_ascii_uppercase();
    let body = text.strip_prefix('P')?;
    let (days, time) = match body.split_once('T') {
        Some((_, "")) => return None,
        Some((days, time)) => (days, time),
        None => (body, ""),
    };
    if days.is_empty() && time.is_empty() {
        return None;
    }

    let mut secs: u64 = 0;
    let mut nanos: u32 = 0;
    if !days.is_empty() {
        let n: u64 = days.strip_suffix('D')?.parse().ok()?;
        secs = n.checked_mul(86_400)?;
    }

    let mut rest = time;
    for (unit, scale) in [('H', 3_600_u64), ('M', 60)] {
        if let Some((n, tail)) = rest.split_once(unit) {
            let n: u64 = n.parse().ok()?;
            secs = secs.checked_add(n.checked_mul(scale)?)?;
            rest = tail;
        }
    }
    if !rest.is_empty() {
        let value = rest.strip_suffix('S')?;
        let (whole, fraction) = value.split_once(['.', ',']).unwrap_or((value, ""));
        secs = secs.checked_add(whole.parse().ok()?)?;
        if !fraction.is_empty() {
            if fraction.len() > 9 || !fraction.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            nanos = format!("{fraction:0<9}").parse().ok()?;
        }
    }

    Some(Duration::new(secs, nanos))
}
