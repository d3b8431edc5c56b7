use lp_il_data::PriceError;
use lp_il_domain::{IlInputError, SnapshotError, WeightError};
use lp_il_protocols::error::CallError;
use thiserror::Error;

/// Failure of a pool analysis. Every variant is fatal for the request;
/// recoverable gaps are absorbed into the snapshot's data quality instead.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The pool address is not a 20-byte hex address.
    #[error("invalid pool address: {0}")]
    InvalidAddress(String),

    /// A zero-hour window cannot be priced.
    #[error("window_hours must be at least 1")]
    EmptyWindow,

    /// Caller-supplied weights were rejected.
    #[error("invalid weights: {0}")]
    Weights(#[from] WeightError),

    /// The node failed while probing the pool interface.
    #[error("pool type detection failed: {0}")]
    Classification(#[source] CallError),

    /// `token0()` / `token1()` could not be read.
    #[error("cannot read pool tokens: {0}")]
    Tokens(#[source] CallError),

    /// The oracle has no current price for a token.
    #[error("no current price for {symbol} ({address})")]
    PriceUnavailable { symbol: String, address: String },

    /// The current price request itself failed.
    #[error("current price lookup failed for {symbol}: {source}")]
    PriceLookup {
        symbol: String,
        #[source]
        source: PriceError,
    },

    /// Pool reserves or balances could not be read.
    #[error("cannot read pool reserves: {0}")]
    Reserves(#[source] CallError),

    /// Gathered inputs did not form a valid snapshot.
    #[error("invalid snapshot: {0}")]
    Snapshot(#[from] SnapshotError),

    /// The IL engine rejected the snapshot's prices or weights.
    #[error("impermanent loss input rejected: {0}")]
    ImpermanentLoss(#[from] IlInputError),
}

impl AnalysisError {
    /// True when the failure is about the request rather than upstream data.
    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            AnalysisError::InvalidAddress(_) | AnalysisError::EmptyWindow | AnalysisError::Weights(_)
        )
    }

    /// True when an upstream service (node or price feed) could not be used.
    #[must_use]
    pub fn is_upstream(&self) -> bool {
        match self {
            AnalysisError::Classification(_) | AnalysisError::PriceLookup { .. } => true,
            AnalysisError::Tokens(e) | AnalysisError::Reserves(e) => !e.is_interface_mismatch(),
            _ => false,
        }
    }
}
