//! FGA check settings validator.
//!
//! Loads the `openfga` section of a YAML file (overridden by `FGA_CHECK_*`
//! environment variables), validates it and prints the client configuration
//! that would be handed to the authorization-service client. Secrets are
//! never printed.
//!
//! ```bash
//! fga-check --config config/fga.yaml
//! FGA_CHECK_API_URL=http://localhost:8080 fga-check --json
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use fga_check::FgaSettings;
use fga_check::domain::{build_client_configuration, validate};
use fga_check_sdk::{ClientConfiguration, Credentials};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Validate FGA check settings
#[derive(Parser, Debug)]
#[command(name = "fga-check")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to a YAML file with an `openfga` section
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,

    /// Log filter used when `RUST_LOG` is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// Redacted view of a [`ClientConfiguration`].
#[derive(Debug, Serialize)]
struct ConfigurationSummary<'a> {
    api_url: &'a str,
    store_id: Option<&'a str>,
    authorization_model_id: Option<&'a str>,
    user_agent: Option<&'a str>,
    credentials_method: &'static str,
    client_id: Option<&'a str>,
    api_token_issuer: Option<&'a str>,
    read_timeout: Option<String>,
    connect_timeout: Option<String>,
    max_retries: Option<u32>,
    minimum_retry_delay: Option<String>,
    default_headers: Vec<&'a str>,
    telemetry_metrics: Vec<&'static str>,
}

impl<'a> ConfigurationSummary<'a> {
    fn new(config: &'a ClientConfiguration) -> Self {
        let (client_id, api_token_issuer) = match config.credentials() {
            Credentials::ClientCredentials(cc) => {
                (Some(cc.client_id.as_str()), Some(cc.api_token_issuer.as_str()))
            }
            Credentials::None | Credentials::ApiToken { .. } => (None, None),
        };
        let mut default_headers: Vec<&str> = config
            .default_headers()
            .map(|h| h.keys().map(String::as_str).collect())
            .unwrap_or_default();
        default_headers.sort_unstable();
        let mut telemetry_metrics: Vec<&'static str> = config
            .telemetry()
            .map(|t| t.keys().map(|m| m.metric_name()).collect())
            .unwrap_or_default();
        telemetry_metrics.sort_unstable();

        Self {
            api_url: config.api_url(),
            store_id: config.store_id(),
            authorization_model_id: config.authorization_model_id(),
            user_agent: config.user_agent(),
            credentials_method: config.credentials().method().as_str(),
            client_id,
            api_token_issuer,
            read_timeout: config.read_timeout().map(format_duration),
            connect_timeout: config.connect_timeout().map(format_duration),
            max_retries: config.max_retries(),
            minimum_retry_delay: config.minimum_retry_delay().map(format_duration),
            default_headers,
            telemetry_metrics,
        }
    }
}

fn format_duration(d: std::time::Duration) -> String {
    humantime::format_duration(d).to_string()
}

fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    if let Some(path) = &args.config
        && !path.is_file()
    {
        anyhow::bail!("config file {} does not exist", path.display());
    }

    let settings = FgaSettings::load(args.config.as_deref()).context("loading FGA settings")?;
    let validated = validate(&settings).context("invalid FGA settings")?;

    let Some(configuration) = build_client_configuration(validated) else {
        info!("no api-url configured, no FGA client would be created");
        return Ok(());
    };

    let summary = ConfigurationSummary::new(&configuration);
    info!(
        api_url = summary.api_url,
        credentials = summary.credentials_method,
        "FGA settings are valid"
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }

    Ok(())
}

fn print_summary(summary: &ConfigurationSummary<'_>) {
    fn line(name: &str, value: Option<&str>) {
        println!("{name:<24}{}", value.unwrap_or("-"));
    }

    line("api-url", Some(summary.api_url));
    line("store-id", summary.store_id);
    line("authorization-model-id", summary.authorization_model_id);
    line("user-agent", summary.user_agent);
    line("credentials.method", Some(summary.credentials_method));
    line("client-id", summary.client_id);
    line("api-token-issuer", summary.api_token_issuer);
    line("read-timeout", summary.read_timeout.as_deref());
    line("connect-timeout", summary.connect_timeout.as_deref());
    line(
        "max-retries",
        summary.max_retries.map(|n| n.to_string()).as_deref(),
    );
    line("minimum-retry-delay", summary.minimum_retry_delay.as_deref());
    line(
        "default-headers",
        Some(summary.default_headers.join(", ").as_str()).filter(|s| !s.is_empty()),
    );
    line(
        "telemetry",
        Some(summary.telemetry_metrics.join(", ").as_str()).filter(|s| !s.is_empty()),
    );
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn summary_hides_secrets() {
        figment::Jail::expect_with(|jail| {
            jail.clear_env();
            let mut file = tempfile::NamedTempFile::new().unwrap();
            writeln!(
                file,
                "openfga:\n  api-url: http://localhost:8080\n  credentials:\n    method: CLIENT_CREDENTIALS\n    config:\n      client-id: client\n      client-secret: top-secret\n      api-token-issuer: issuer"
            )
            .unwrap();

            let settings = FgaSettings::load(Some(file.path())).unwrap();
            let config = build_client_configuration(validate(&settings).unwrap()).unwrap();
            let json = serde_json::to_string(&ConfigurationSummary::new(&config)).unwrap();

            assert!(json.contains("\"credentials_method\":\"CLIENT_CREDENTIALS\""));
            assert!(json.contains("\"client_id\":\"client\""));
            assert!(!json.contains("top-secret"));
            Ok(())
        });
    }

    #[test]
    fn args_accept_config_path() {
        let args = Args::parse_from(["fga-check", "--config", "fga.yaml", "--json"]);

        assert_eq!(args.config, Some(PathBuf::from("fga.yaml")));
        assert!(args.json);
        assert_eq!(args.log_level, "info");
    }
}
