//! Canned [`PriceOracle`] for tests.

use crate::PriceOracle;
use crate::error::PriceError;
use async_trait::async_trait;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct StaticPriceOracle {
    current: HashMap<String, f64>,
    historical: HashMap<String, f64>,
    offline: bool,
}

impl StaticPriceOracle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets both prices of `token`; `historical` may be omitted to leave it
    /// unlisted in the past.
    #[must_use]
    pub fn with_price(mut self, token: &str, current: f64, historical: Option<f64>) -> Self {
        self.current.insert(token.to_lowercase(), current);
        if let Some(price) = historical {
            self.historical.insert(token.to_lowercase(), price);
        }
        self
    }

    /// Every request fails with a network error.
    #[must_use]
    pub fn offline(mut self) -> Self {
        self.offline = true;
        self
    }

    fn check(&self) -> Result<(), PriceError> {
        if self.offline {
            return Err(PriceError::Network("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl PriceOracle for StaticPriceOracle {
    async fn get_token_price(&self, token: &str) -> Result<Option<f64>, PriceError> {
        self.check()?;
        Ok(self.current.get(&token.to_lowercase()).copied())
    }

    async fn get_historical_price(
        &self,
        token: &str,
        _hours_ago: u32,
    ) -> Result<Option<f64>, PriceError> {
        self.check()?;
        Ok(self.historical.get(&token.to_lowercase()).copied())
    }
}
