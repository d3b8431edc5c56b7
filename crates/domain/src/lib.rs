//! Core domain types and formula engines for the LP estimator.
//!
//! This crate has no I/O. It provides:
//! - The closed pool-type and chain enumerations
//! - Token, reserve and price-map records
//! - The canonical, immutable `PoolSnapshot`
//! - The impermanent-loss engine (balanced, weighted and multi-asset)
//! - The fee APR engine (APR, position earnings, velocity, tiers, breakeven)

/// Closed enumerations shared across crates.
pub mod enums;
/// Domain error types.
pub mod error;
/// Fee tier constants and conversions.
pub mod fees;
/// IL and fee APR engines plus their result records.
pub mod metrics;
/// Pool records and the canonical snapshot.
pub mod pool;
/// Token metadata and raw amount normalization.
pub mod token;
/// Validated value objects.
pub mod value_objects;

pub use enums::{Chain, DataQuality, ParseChainError, ParsePoolTypeError, PoolType, VolumeSource};
pub use error::{IlInputError, SnapshotError, WeightError};
pub use fees::FeeTier;
pub use pool::{PoolReserves, PoolSnapshot, PoolTokens, SnapshotInputs, VolumeEstimate};
pub use token::TokenInfo;
pub use value_objects::{PoolWeights, PriceMap};
