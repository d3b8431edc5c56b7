//! Request and response bodies.

use lp_il_analysis::AnalyzeOptions;
use lp_il_domain::PoolType;
use lp_il_domain::metrics::IlScenario;
use serde::{Deserialize, Serialize};

fn default_window_hours() -> u32 {
    24
}

fn default_chain() -> u64 {
    1
}

/// Body of `POST /lp/estimate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimateRequest {
    pub pool_address: String,
    /// Token weights such as `[80, 20]`; 50/50 when omitted.
    #[serde(default)]
    pub token_weights: Option<Vec<f64>>,
    #[serde(default = "default_window_hours")]
    pub window_hours: u32,
    /// EIP-155 chain id.
    #[serde(default = "default_chain")]
    pub chain: u64,
    /// Overrides on-chain pool type detection.
    #[serde(default)]
    pub pool_type: Option<PoolType>,
}

impl EstimateRequest {
    #[must_use]
    pub fn options(&self) -> AnalyzeOptions {
        AnalyzeOptions {
            weights: self.token_weights.clone(),
            pool_type: self.pool_type,
        }
    }
}

/// Body of `POST /lp/position`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionRequest {
    #[serde(flatten)]
    pub pool: EstimateRequest,
    pub position_size_usd: f64,
}

/// Query of `GET /lp/scenarios`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScenariosQuery {
    /// Comma-separated weights, e.g. `80,20`.
    pub weights: Option<String>,
}

impl ScenariosQuery {
    /// Parsed weights, 50/50 when absent.
    ///
    /// # Errors
    /// Returns the offending item when a weight is not a number.
    pub fn weights(&self) -> Result<Vec<f64>, String> {
        match &self.weights {
            None => Ok(vec![50.0, 50.0]),
            Some(raw) => raw
                .split(',')
                .map(|item| {
                    item.trim()
                        .parse::<f64>()
                        .map_err(|_| format!("invalid weight: {item}"))
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenariosResponse {
    pub weights: Vec<f64>,
    pub scenarios: Vec<IlScenario>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub supported_chains: Vec<u64>,
}
