//! CoinGecko token prices by contract address.

use crate::PriceOracle;
use crate::error::PriceError;
use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use lp_il_domain::Chain;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";

/// Connection settings for the CoinGecko API.
#[derive(Debug, Clone)]
pub struct CoinGeckoConfig {
    pub base_url: String,
    /// Sent as `x-cg-demo-api-key` when present.
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl Default for CoinGeckoConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(10),
        }
    }
}

/// `/simple/token_price` body: address -> currency -> price.
type SimpleTokenPrice = HashMap<String, HashMap<String, f64>>;

#[derive(Debug, Deserialize)]
struct MarketChart {
    #[serde(default)]
    prices: Vec<[f64; 2]>,
}

/// Price oracle for the tokens of one chain.
pub struct CoinGeckoOracle {
    client: Client,
    config: CoinGeckoConfig,
    platform: &'static str,
}

impl CoinGeckoOracle {
    /// # Errors
    /// Returns [`PriceError::Network`] if the HTTP client cannot be built.
    pub fn new(config: CoinGeckoConfig, chain: Chain) -> Result<Self, PriceError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PriceError::Network(e.to_string()))?;
        Ok(Self {
            client,
            config,
            platform: chain.coingecko_platform(),
        })
    }

    fn simple_price_url(&self) -> String {
        format!(
            "{}/simple/token_price/{}",
            self.config.base_url.trim_end_matches('/'),
            self.platform
        )
    }

    fn market_chart_url(&self, token: &str) -> String {
        format!(
            "{}/coins/{}/contract/{}/market_chart/",
            self.config.base_url.trim_end_matches('/'),
            self.platform,
            token.to_lowercase()
        )
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<Option<T>, PriceError> {
        let mut request = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .query(query);
        if let Some(key) = &self.config.api_key {
            request = request.header("x-cg-demo-api-key", key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| PriceError::Network(e.to_string()))?;
        match response.status() {
            StatusCode::TOO_MANY_REQUESTS => return Err(PriceError::RateLimited),
            // Unlisted contracts answer 404.
            StatusCode::NOT_FOUND => return Ok(None),
            status if !status.is_success() => return Err(PriceError::Status(status.as_u16())),
            _ => {}
        }
        response
            .json::<T>()
            .await
            .map(Some)
            .map_err(|e| PriceError::Parse(e.to_string()))
    }
}

/// Length of the chart to request: whole days, at least one.
fn chart_days(hours_ago: u32) -> f64 {
    (f64::from(hours_ago) / 24.0).max(1.0)
}

/// Price of the sample whose timestamp (ms) is nearest to `target`.
fn closest_price(prices: &[[f64; 2]], target: DateTime<Utc>) -> Option<f64> {
    let target_ms = target.timestamp_millis() as f64;
    prices
        .iter()
        .filter(|[ts, price]| ts.is_finite() && price.is_finite())
        .min_by(|a, b| (a[0] - target_ms).abs().total_cmp(&(b[0] - target_ms).abs()))
        .map(|[_, price]| *price)
}

fn usd_price(body: &SimpleTokenPrice, token: &str) -> Option<f64> {
    body.get(&token.to_lowercase())
        .and_then(|currencies| currencies.get("usd"))
        .copied()
}

#[async_trait]
impl PriceOracle for CoinGeckoOracle {
    async fn get_token_price(&self, token: &str) -> Result<Option<f64>, PriceError> {
        let query = [
            ("contract_addresses", token.to_lowercase()),
            ("vs_currencies", "usd".to_string()),
        ];
        let body: Option<SimpleTokenPrice> = self.get_json(&self.simple_price_url(), &query).await?;
        let price = body.as_ref().and_then(|b| usd_price(b, token));
        debug!(token, platform = self.platform, ?price, "current price");
        Ok(price)
    }

    async fn get_historical_price(
        &self,
        token: &str,
        hours_ago: u32,
    ) -> Result<Option<f64>, PriceError> {
        let query = [
            ("vs_currency", "usd".to_string()),
            ("days", chart_days(hours_ago).to_string()),
        ];
        let chart: Option<MarketChart> = self.get_json(&self.market_chart_url(token), &query).await?;
        let target = Utc::now() - ChronoDuration::hours(i64::from(hours_ago));
        let price = chart.and_then(|c| closest_price(&c.prices, target));
        debug!(token, hours_ago, ?price, "historical price");
        Ok(price)
    }
}
