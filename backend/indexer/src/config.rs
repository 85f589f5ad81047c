//! Application configuration loaded from environment variables.

use crate::errors::{IndexerError, Result};

#[derive(Debug, Clone)]
pub struct Config {
    /// Soroban RPC endpoint (e.g. https://soroban-testnet.stellar.org)
    pub rpc_url: String,
    /// The SosRS factory contract address (Strkey format)
    pub factory_contract_id: String,
    /// Path to the SQLite database file
    pub database_url: String,
    /// Port for the REST API server
    pub api_port: u16,
    /// How often (in seconds) to poll the RPC for new events
    pub poll_interval_secs: u64,
    /// Maximum number of events to fetch per RPC request
    pub events_per_page: u32,
    /// Ledger to start from if no cursor is saved
    pub start_ledger: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| {
            lookup(key).ok_or_else(|| IndexerError::Config(format!("Missing env var: {key}")))
        };

        Ok(Config {
            rpc_url: var("RPC_URL")
                .unwrap_or_else(|_| "https://soroban-testnet.stellar.org".to_string()),
            factory_contract_id: var("FACTORY_CONTRACT_ID").map_err(|_| {
                IndexerError::Config(
                    "FACTORY_CONTRACT_ID environment variable is required".to_string(),
                )
            })?,
            database_url: var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:./sosrs_events.db".to_string()),
            api_port: parse_or(var("API_PORT"), "3001", "API_PORT")?,
            poll_interval_secs: parse_or(var("POLL_INTERVAL_SECS"), "5", "POLL_INTERVAL_SECS")?,
            events_per_page: parse_or(var("EVENTS_PER_PAGE"), "100", "EVENTS_PER_PAGE")?,
            start_ledger: parse_or(var("START_LEDGER"), "0", "START_LEDGER")?,
        })
    }
}

fn parse_or<T: std::str::FromStr>(value: Result<String>, default: &str, key: &str) -> Result<T> {
    value
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .map_err(|_| IndexerError::Config(format!("Invalid {key}")))
}
