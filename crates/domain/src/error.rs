//! Domain errors.
//!
//! These cover invalid input only. Degenerate math (zero TVL, non-positive
//! price ratios) is not an error: the engines return zeroed results carrying
//! an explicit marker instead.

use thiserror::Error;

/// Invalid pool weight vector.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WeightError {
    /// Fewer than two weights supplied.
    #[error("at least two weights are required, got {0}")]
    TooFewAssets(usize),
    /// A weight is negative, NaN or infinite.
    #[error("weight at index {index} is invalid: {value}")]
    InvalidWeight {
        /// Position of the offending weight.
        index: usize,
        /// The offending value.
        value: f64,
    },
    /// Weights sum to zero.
    #[error("weights must sum to a positive value")]
    NonPositiveSum,
}

/// Invalid input to the impermanent-loss engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IlInputError {
    /// Price ratio count differs from weight count.
    #[error("{ratios} price ratios supplied for {weights} weights")]
    LengthMismatch {
        /// Number of price ratios.
        ratios: usize,
        /// Number of weights.
        weights: usize,
    },
    /// Weight vector rejected.
    #[error(transparent)]
    Weights(#[from] WeightError),
}

/// Inputs that cannot form a snapshot.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SnapshotError {
    /// A current price is missing its positive value.
    #[error("current price for {symbol} must be positive, got {price}")]
    InvalidCurrentPrice {
        /// Token symbol.
        symbol: String,
        /// Rejected price.
        price: f64,
    },
    /// Weight vector length does not match the pool's token count.
    #[error("pool has {expected} tokens but {got} weights were supplied")]
    WeightCount {
        /// Token count of the pool.
        expected: usize,
        /// Weights supplied.
        got: usize,
    },
}
