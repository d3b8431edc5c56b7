//! Market data for the LP estimator.

pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod providers;

use async_trait::async_trait;
pub use error::PriceError;

/// USD prices of tokens on one chain.
#[async_trait]
pub trait PriceOracle: Send + Sync {
    /// Current USD price of `token`; `Ok(None)` when the token is not listed.
    async fn get_token_price(&self, token: &str) -> Result<Option<f64>, PriceError>;

    /// USD price of `token` about `hours_ago` hours before now.
    async fn get_historical_price(
        &self,
        token: &str,
        hours_ago: u32,
    ) -> Result<Option<f64>, PriceError>;
}
