//! Environment-driven configuration.

use lp_il_data::providers::CoinGeckoConfig;
use lp_il_data::providers::coingecko::DEFAULT_BASE_URL;
use lp_il_domain::Chain;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A variable is set but cannot be parsed.
    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// Address the HTTP server binds to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Everything the server needs to build its per-chain analyzers.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub rpc_urls: HashMap<Chain, String>,
    pub coingecko: CoinGeckoConfig,
    /// Timeout of each RPC and price request.
    pub http_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            rpc_urls: Chain::ALL
                .into_iter()
                .map(|chain| (chain, chain.default_rpc_url().to_string()))
                .collect(),
            coingecko: CoinGeckoConfig::default(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl AppConfig {
    /// Reads the process environment.
    ///
    /// # Errors
    /// Returns an error when `PORT` or `HTTP_TIMEOUT_SECS` is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from any variable source.
    ///
    /// # Errors
    /// Returns an error when `PORT` or `HTTP_TIMEOUT_SECS` is malformed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let port = match get("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                name: "PORT",
                value: raw,
            })?,
            None => DEFAULT_PORT,
        };
        let timeout_secs: u64 = match get("HTTP_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        name: "HTTP_TIMEOUT_SECS",
                        value: raw,
                    });
                }
            },
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };
        let http_timeout = Duration::from_secs(timeout_secs);

        let rpc_urls = Chain::ALL
            .into_iter()
            .map(|chain| {
                let url = get(chain.rpc_env_var())
                    .unwrap_or_else(|| chain.default_rpc_url().to_string());
                (chain, url)
            })
            .collect();

        Ok(Self {
            server: ServerConfig {
                host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
                port,
            },
            rpc_urls,
            coingecko: CoinGeckoConfig {
                base_url: get("COINGECKO_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                api_key: get("COINGECKO_API_KEY"),
                timeout: http_timeout,
            },
            http_timeout,
        })
    }
}
