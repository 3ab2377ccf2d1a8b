//! Logging bootstrap.
//!
//! The library only emits `tracing` events. Applications call
//! [`init_logging`] once at startup to print them.

use tracing_subscriber::EnvFilter;

use crate::config::GeneralConfig;
use crate::error::{Result, WordwiseError};

/// Environment variable that overrides `GeneralConfig::log_level`.
pub const LOG_ENV_VAR: &str = "WORDWISE_LOG";

/// Install a global `tracing` subscriber.
///
/// The filter comes from `WORDWISE_LOG` if set and valid, otherwise from
/// `config.log_level`. With `json_logs` each event is one JSON line.
///
/// # Errors
/// Returns [`WordwiseError::Config`] if the level is not a valid filter
/// directive or a global subscriber is already installed.
pub fn init_logging(config: &GeneralConfig) -> Result<()> {
    let filter = match EnvFilter::try_from_env(LOG_ENV_VAR) {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_level).map_err(|e| {
            WordwiseError::Config(format!("invalid log level {:?}: {e}", config.log_level))
        })?,
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let installed = if config.json_logs {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| WordwiseError::Config(format!("failed to install logger: {e}")))
}
