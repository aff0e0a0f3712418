use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Args;
use client::LoanDeskClient;
use directories::BaseDirs;
use shared::config::ClientConfig;
use tracing_subscriber::EnvFilter;
use url::Url;

/// Server/config flags shared by every networked subcommand.
#[derive(Args, Debug)]
pub struct ServerArgs {
    /// LoanDesk server base URL (wins over config file and environment)
    #[arg(long)]
    pub server: Option<Url>,

    /// Path to the configuration file (yaml or json)
    #[arg(long, short)]
    pub config: Option<PathBuf>,
}

/// Resolve the client configuration: explicit `--config` path, otherwise the
/// default config file when it exists, plus `LOANDESK_*` environment and the
/// `--server` override.
pub fn resolve_config(args: &ServerArgs) -> Result<ClientConfig> {
    let path = args.config.clone().or_else(default_config_path);
    ClientConfig::load_config(path, args.server.clone())
        .map_err(|err| anyhow!("failed to load configuration: {err}"))
}

fn default_config_path() -> Option<PathBuf> {
    BaseDirs::new()
        .map(|dirs| dirs.config_dir().join("loandesk").join("config.yaml"))
        .filter(|path| path.exists())
}

/// Initialize tracing once per process. `RUST_LOG` wins over the configured
/// log level.
pub fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Build the API client from a resolved configuration.
pub fn build_client(config: &ClientConfig) -> Result<LoanDeskClient> {
    LoanDeskClient::from_config(config).context("failed to build HTTP client")
}
