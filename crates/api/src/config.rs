//! Process configuration read from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use classroom_observability::LogFormat;
use thiserror::Error;

pub const BIND_ADDR_VAR: &str = "CLASSROOM_BIND_ADDR";
pub const LOG_FORMAT_VAR: &str = "CLASSROOM_LOG_FORMAT";
pub const SEED_FILE_VAR: &str = "CLASSROOM_SEED_FILE";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}: invalid socket address {value:?}")]
    InvalidBindAddr { var: &'static str, value: String },

    #[error("{var}: unknown log format {value:?} (expected json or pretty)")]
    InvalidLogFormat { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub log_format: LogFormat,
    /// JSON catalog seed loaded at startup; the catalog starts empty without it.
    pub seed_file: Option<PathBuf>,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build the config from an arbitrary variable source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let bind_addr = parse_bind_addr(get(BIND_ADDR_VAR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()))?;

        let log_format = match get(LOG_FORMAT_VAR) {
            Some(value) => LogFormat::parse(&value).ok_or(ConfigError::InvalidLogFormat {
                var: LOG_FORMAT_VAR,
                value,
            })?,
            None => LogFormat::default(),
        };

        let seed_file = get(SEED_FILE_VAR).map(PathBuf::from);

        Ok(Self {
            bind_addr,
            log_format,
            seed_file,
        })
    }
}

fn parse_bind_addr(value: String) -> Result<SocketAddr, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidBindAddr {
        var: BIND_ADDR_VAR,
        value,
    })
}
