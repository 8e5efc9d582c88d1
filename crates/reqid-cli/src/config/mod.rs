//! CLI configuration management.
//!
//! ```text
//! Cli
//! ├── server: ServerConfig           # Host, port, shutdown
//! ├── request_id: RequestIdSettings  # Trusted/emitted headers, generator
//! └── request_log: RequestLogTarget  # Where request log lines go
//! ```
//!
//! All configuration can be provided via CLI arguments or environment variables.
//! Use `--help` to see all available options.
//!
//! # Example
//!
//! ```bash
//! reqid --port 8080 --request-id-header X-Request-Id --request-id-generator uuid-v7
//!
//! # Or via environment variables
//! PORT=8080 REQUEST_ID_HEADER=X-Request-Id REQUEST_LOG=tracing reqid
//! ```

mod request_log;
mod server;

use std::process;

use anyhow::Context;
use clap::Parser;
use reqid::middleware::{RequestIdConfig, RequestIdSettings};
pub use request_log::RequestLogTarget;
use serde::{Deserialize, Serialize};
pub use server::ServerConfig;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_SERVER_STARTUP};

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser, Serialize, Deserialize)]
#[command(name = "reqid")]
#[command(about = "Demo server that tags every request with an identifier")]
#[command(version)]
pub struct Cli {
    /// Server network and lifecycle configuration.
    #[clap(flatten)]
    pub server: ServerConfig,

    /// Request identifier headers and generator.
    #[clap(flatten)]
    pub request_id: RequestIdSettings,

    /// Destination of request-scoped log lines.
    #[arg(long, env = "REQUEST_LOG", value_enum, default_value_t = RequestLogTarget::Stdout)]
    #[serde(default)]
    pub request_log: RequestLogTarget,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    /// Loads environment variables from .env file if the dotenv feature is enabled.
    ///
    /// Runs before clap parses arguments so that `env` defaults see the values.
    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    /// No-op when dotenv feature is disabled.
    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Initializes tracing with environment-based filtering.
    pub fn init_tracing() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    /// Validates all configuration values and builds the middleware config.
    pub fn validate(&self) -> anyhow::Result<RequestIdConfig> {
        self.server
            .validate()
            .context("invalid server configuration")?;

        RequestIdConfig::try_from(self.request_id.clone())
            .context("invalid request identifier configuration")
    }

    /// Logs configuration at startup.
    pub fn log(&self) {
        tracing::debug!(
            target: TRACING_TARGET_SERVER_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "Build information"
        );

        self.server.log();

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            request_header = %self.request_id.request_header,
            response_header = %self.request_id.response_header,
            generator = %self.request_id.generator,
            request_log = %self.request_log,
            "Request identifier configuration"
        );
    }

    /// Returns a list of enabled compile-time features.
    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}
