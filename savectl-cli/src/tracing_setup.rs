//! Tracing setup for the savectl CLI
//!
//! Usage:
//!   savectl --debug ...              # Debug logging to stderr
//!   RUST_LOG=savectl_core=debug ...  # Fine-grained log control
//!
//! Filter precedence: RUST_LOG, then --debug, then `log_level` from
//! ~/.savectl/config.toml, then `info`.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Tracing configuration options
#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    /// Enable debug logging (ignored when RUST_LOG is set)
    pub debug: bool,
    /// Filter from the config file
    pub level: Option<String>,
}

impl TracingConfig {
    fn fallback_filter(&self) -> EnvFilter {
        if self.debug {
            return EnvFilter::new("debug");
        }
        match self.level.as_deref() {
            Some(level) => EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info")),
            None => EnvFilter::new("info"),
        }
    }
}

/// Initialize console tracing on stderr so stdout stays pipeable.
pub fn init_tracing(config: &TracingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| config.fallback_filter());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.debug)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}
