//! Service configuration
//!
//! Read from the process environment after loading an optional `.env` file.

use agency_core::{AgencyError, Result};
use agent_store::StoreConfig;
use std::net::SocketAddr;
use std::str::FromStr;

pub const BIND_ADDR_VAR: &str = "AGENCY_BIND_ADDR";
pub const DATABASE_URL_VAR: &str = "AGENCY_DATABASE_URL";
pub const MAX_CONNECTIONS_VAR: &str = "AGENCY_DB_MAX_CONNECTIONS";
pub const STORE_VAR: &str = "AGENCY_STORE";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Which [`AgentStore`](agency_core::AgentStore) the service runs against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    #[default]
    Sqlite,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = AgencyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(Self::Sqlite),
            "memory" => Ok(Self::Memory),
            other => Err(AgencyError::config(format!(
                "{STORE_VAR} must be 'sqlite' or 'memory', got '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub bind_addr: SocketAddr,
    pub backend: StoreBackend,
    pub database: StoreConfig,
}

impl ServiceConfig {
    /// Loads `.env` (if present) and reads the `AGENCY_*` variables
    pub fn from_env() -> Result<Self> {
        // A missing .env file is fine; the process environment still applies.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = StoreConfig::default();

        let bind_addr = lookup(BIND_ADDR_VAR)
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| AgencyError::config(format!("{BIND_ADDR_VAR}: {e}")))?;

        let backend = match lookup(STORE_VAR) {
            Some(value) => value.parse()?,
            None => StoreBackend::default(),
        };

        let url = lookup(DATABASE_URL_VAR).unwrap_or(defaults.url);

        let max_connections = match lookup(MAX_CONNECTIONS_VAR) {
            Some(value) => match value.trim().parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(AgencyError::config(format!(
                        "{MAX_CONNECTIONS_VAR} must be a positive integer, got '{value}'"
                    )))
                }
            },
            None => defaults.max_connections,
        };

        Ok(Self {
            bind_addr,
            backend,
            database: StoreConfig {
                url,
                max_connections,
            },
        })
    }
}
