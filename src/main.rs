//! Real-time messaging client.
//!
//! # Architecture Overview
//!
//! ```text
//!   token ──▶ session (HTTP GET) ──▶ endpoint URL ──▶ net (dial)
//!                                                        │
//!                                             ┌──────────┴──────────┐
//!                                             ▼                     ▼
//!                                       read half              write half
//!                                   inbound reader task   lifecycle coordinator
//!                                   (log each envelope)   (interrupt → close frame
//!                                             │            → wait ≤ timeout)
//!                                             └── completion ──▶ ┘
//! ```

use clap::Parser;
use std::path::PathBuf;

use rtm_client::config::loader::load_or_default;
use rtm_client::config::validation::validate_config;
use rtm_client::config::{ConfigError, RtmConfig};
use rtm_client::lifecycle::{self, signals, Shutdown};
use rtm_client::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "rtm-client")]
#[command(about = "Open a real-time messaging session and log its events", long_about = None)]
struct Cli {
    /// API token exchanged for the connection URL
    #[arg(short, long)]
    token: Option<String>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Session-start endpoint, overrides the config file
    #[arg(long)]
    start_url: Option<String>,
}

impl Cli {
    fn load_config(&self) -> Result<RtmConfig, ConfigError> {
        let mut config = load_or_default(self.config.as_deref())?;
        if let Some(token) = &self.token {
            config.session.token = token.clone();
        }
        if let Some(start_url) = &self.start_url {
            config.session.start_url = start_url.clone();
        }
        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let loaded = cli.load_config();

    let level = loaded
        .as_ref()
        .map(|config| config.observability.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());
    logging::init(&level);

    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load configuration");
            std::process::exit(1);
        }
    };

    tracing::info!(
        start_url = %config.session.start_url,
        close_timeout_ms = config.shutdown.close_timeout_ms,
        "rtm-client v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        }
    }

    let shutdown = Shutdown::new();
    let interrupt = shutdown.subscribe();
    if let Err(e) = signals::install_interrupt_handler(&shutdown) {
        tracing::error!(error = %e, "Failed to register interrupt handler");
        std::process::exit(1);
    }

    if let Err(e) = lifecycle::run(&config, interrupt).await {
        tracing::error!(error = %e, "Fatal error");
        std::process::exit(1);
    }

    tracing::info!("Shutdown complete");
}
