//! On-chain reads for the LP estimator: pool classification, token
//! metadata, reserves and fee tiers over EVM JSON-RPC (alloy).

pub mod classifier;
pub mod contracts;
pub mod error;
pub mod fee_tier;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod prelude;
pub mod reader;
pub mod rpc;

use async_trait::async_trait;
use error::CallError;
use lp_il_domain::PoolReserves;
use primitive_types::U256;

/// The view calls the estimator makes against pools and their tokens.
///
/// Implementations must report a reverted or empty call as an interface
/// mismatch (see [`CallError::is_interface_mismatch`]) and keep node or
/// network failures distinct from it.
#[async_trait]
pub trait PoolContract: Send + Sync {
    async fn token0(&self, pool: &str) -> Result<String, CallError>;
    async fn token1(&self, pool: &str) -> Result<String, CallError>;
    /// `getReserves()` of constant-product pairs.
    async fn get_reserves(&self, pool: &str) -> Result<PoolReserves, CallError>;
    /// Active liquidity of concentrated-liquidity pools.
    async fn liquidity(&self, pool: &str) -> Result<u128, CallError>;
    /// Pool fee in hundredths of a basis point.
    async fn fee(&self, pool: &str) -> Result<u32, CallError>;
    async fn symbol(&self, token: &str) -> Result<String, CallError>;
    async fn decimals(&self, token: &str) -> Result<u8, CallError>;
    async fn balance_of(&self, token: &str, owner: &str) -> Result<U256, CallError>;
}
