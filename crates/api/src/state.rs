use crate::config::AppConfig;
use lp_il_analysis::PoolAnalyzer;
use lp_il_data::PriceError;
use lp_il_data::providers::CoinGeckoOracle;
use lp_il_domain::Chain;
use lp_il_protocols::error::CallError;
use lp_il_protocols::rpc::EvmRpcClient;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Failure to build a chain's collaborators at startup.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("rpc client for {chain}: {source}")]
    Rpc {
        chain: Chain,
        #[source]
        source: CallError,
    },
    #[error("price client for {chain}: {source}")]
    Price {
        chain: Chain,
        #[source]
        source: PriceError,
    },
}

/// Application state shared across handlers: one analyzer per chain.
#[derive(Clone)]
pub struct AppState {
    analyzers: Arc<HashMap<Chain, Arc<PoolAnalyzer>>>,
}

impl AppState {
    /// Wires an RPC client and price oracle for every configured chain.
    ///
    /// # Errors
    /// Fails if an HTTP client cannot be created.
    pub fn from_config(config: &AppConfig) -> Result<Self, StateError> {
        let mut analyzers = HashMap::new();
        for (&chain, url) in &config.rpc_urls {
            let contract = EvmRpcClient::new(url.clone(), config.http_timeout)
                .map_err(|source| StateError::Rpc { chain, source })?;
            let oracle = CoinGeckoOracle::new(config.coingecko.clone(), chain)
                .map_err(|source| StateError::Price { chain, source })?;
            analyzers.insert(
                chain,
                Arc::new(PoolAnalyzer::new(chain, Arc::new(contract), Arc::new(oracle))),
            );
        }
        Ok(Self::with_analyzers(analyzers))
    }

    /// State over prebuilt analyzers.
    #[must_use]
    pub fn with_analyzers(analyzers: HashMap<Chain, Arc<PoolAnalyzer>>) -> Self {
        Self {
            analyzers: Arc::new(analyzers),
        }
    }

    #[must_use]
    pub fn analyzer(&self, chain: Chain) -> Option<Arc<PoolAnalyzer>> {
        self.analyzers.get(&chain).cloned()
    }

    /// Chain ids with an analyzer, ascending.
    #[must_use]
    pub fn supported_chains(&self) -> Vec<u64> {
        let mut ids: Vec<u64> = self.analyzers.keys().map(Chain::id).collect();
        ids.sort_unstable();
        ids
    }
}
