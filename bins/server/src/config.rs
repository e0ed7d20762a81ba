use clap::{Args, Parser, Subcommand};
use serde::Deserialize;

pub use storage_memory::MemoryStorageConfig;

use crate::error::ServerError;

#[derive(Parser)]
#[command(name = "lastseen-server", about = "Last known device status service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server.
    Serve(ServeArgs),
}

#[derive(Args, Clone, Debug)]
pub struct ServeArgs {
    /// Path to TOML configuration file.
    #[arg(long, default_value = "config.toml", env = "LASTSEEN_CONFIG")]
    pub config: String,
}

// ---- TOML Config ----

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_api_port")]
    pub api_port: u16,
    /// Records fetched per lookup.
    #[serde(default = "default_get_limit")]
    pub get_limit: usize,
    /// Prometheus listener; none when unset.
    #[serde(default)]
    pub metrics_port: Option<u16>,
    #[serde(default)]
    pub storage: MemoryStorageConfig,
}

fn default_api_port() -> u16 {
    9300
}
fn default_get_limit() -> usize {
    5
}

impl ServerConfig {
    pub fn load(path: &str) -> Result<Self, ServerError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ServerError::Config { context: "read", detail: format!("'{path}': {e}") })?;
        Self::parse(&content)
            .map_err(|e| match e {
                ServerError::Config { context, detail } => {
                    ServerError::Config { context, detail: format!("'{path}': {detail}") }
                }
                other => other,
            })
    }

    pub fn parse(toml_str: &str) -> Result<Self, ServerError> {
        let config: Self = toml::from_str(toml_str)
            .map_err(|e| ServerError::Config { context: "parse", detail: e.to_string() })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ServerError> {
        if self.get_limit == 0 {
            return Err(ServerError::Config {
                context: "validate",
                detail: "get_limit must be greater than 0".into(),
            });
        }
        if self.storage.max_records == 0 {
            return Err(ServerError::Config {
                context: "validate",
                detail: "storage.max_records must be greater than 0".into(),
            });
        }
        Ok(())
    }
}
