//! Pool analysis pipeline.
//!
//! Turns a pool address into a [`PoolSnapshot`] by combining on-chain reads
//! with the price oracle, then feeds the snapshot to the IL and fee engines.

use crate::error::AnalysisError;
use crate::report::{EstimateReport, PositionReport};
use crate::volume::{TvlMultipleVolume, VolumeModel};
use chrono::{DateTime, Utc};
use lp_il_data::{PriceError, PriceOracle};
use lp_il_domain::metrics::fees::{estimate_apr, estimate_position_earnings};
use lp_il_domain::metrics::impermanent_loss::compute_il;
use lp_il_domain::{
    Chain, PoolSnapshot, PoolTokens, PoolType, PoolWeights, SnapshotError, SnapshotInputs,
    TokenInfo,
};
use lp_il_protocols::PoolContract;
use lp_il_protocols::contracts::validate_address;
use lp_il_protocols::classifier::PoolTypeClassifier;
use lp_il_protocols::error::CallError;
use lp_il_protocols::fee_tier::FeeTierResolver;
use lp_il_protocols::reader::PoolReader;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{Instrument, error, info, info_span, warn};
use uuid::Uuid;

/// Caller hints for one analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeOptions {
    /// Token weights; validated and normalized to 100. Defaults to 50/50.
    #[serde(default)]
    pub weights: Option<Vec<f64>>,
    /// Skips on-chain detection. Needed for weighted and stable pools,
    /// which the probes do not recognise.
    #[serde(default)]
    pub pool_type: Option<PoolType>,
}

/// Quick facts about a pool, without historical prices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolSummary {
    pub pool_type: PoolType,
    pub token0: String,
    pub token1: String,
    pub tvl_usd: f64,
    pub fee_tier_percent: f64,
}

/// One row of [`PoolComparison`]; exactly one of `summary` and `error` is set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparedPool {
    pub pool_address: String,
    #[serde(flatten)]
    pub summary: Option<PoolSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoolComparison {
    pub pools: Vec<ComparedPool>,
    pub window_hours: u32,
    pub timestamp: DateTime<Utc>,
}

/// Analyzes pools on one chain.
pub struct PoolAnalyzer {
    chain: Chain,
    classifier: PoolTypeClassifier,
    reader: PoolReader,
    fee_tiers: FeeTierResolver,
    oracle: Arc<dyn PriceOracle>,
    volume_model: Box<dyn VolumeModel>,
}

impl PoolAnalyzer {
    pub fn new(chain: Chain, contract: Arc<dyn PoolContract>, oracle: Arc<dyn PriceOracle>) -> Self {
        Self {
            chain,
            classifier: PoolTypeClassifier::new(Arc::clone(&contract)),
            reader: PoolReader::new(Arc::clone(&contract)),
            fee_tiers: FeeTierResolver::new(contract),
            oracle,
            volume_model: Box::new(TvlMultipleVolume::default()),
        }
    }

    /// Replaces the default TVL-multiple volume estimate.
    #[must_use]
    pub fn with_volume_model(mut self, model: impl VolumeModel + 'static) -> Self {
        self.volume_model = Box::new(model);
        self
    }

    pub fn chain(&self) -> Chain {
        self.chain
    }

    /// Gathers everything needed to score `pool_address` over the last
    /// `window_hours`.
    ///
    /// Missing historical prices, token metadata or fee reads are replaced
    /// by defaults and mark the snapshot `limited`.
    ///
    /// # Errors
    /// Fails when the pool tokens, either current price or the reserves
    /// cannot be obtained, or when the node fails during type detection.
    pub async fn analyze_pool(
        &self,
        pool_address: &str,
        window_hours: u32,
        options: &AnalyzeOptions,
    ) -> Result<PoolSnapshot, AnalysisError> {
        let span = info_span!(
            "analyze_pool",
            request_id = %Uuid::new_v4(),
            pool = %pool_address,
            chain = %self.chain,
            window_hours
        );
        async {
            let result = self.build_snapshot(pool_address, window_hours, options).await;
            if let Err(e) = &result {
                error!(error = %e, "pool analysis failed");
            }
            result
        }
        .instrument(span)
        .await
    }

    /// Analyzes the pool and scores it.
    ///
    /// # Errors
    /// See [`Self::analyze_pool`].
    pub async fn estimate(
        &self,
        pool_address: &str,
        window_hours: u32,
        options: &AnalyzeOptions,
    ) -> Result<EstimateReport, AnalysisError> {
        let snapshot = self.analyze_pool(pool_address, window_hours, options).await?;
        let il = compute_il(snapshot.price_changes(), snapshot.weights().as_slice())?;
        let fees = estimate_apr(
            snapshot.volume_window(),
            snapshot.tvl_avg(),
            snapshot.fee_tier(),
            snapshot.window_hours(),
        );
        Ok(EstimateReport::new(self.chain, &snapshot, il, fees))
    }

    /// Fee earnings a position of `position_size_usd` would have made.
    ///
    /// # Errors
    /// See [`Self::analyze_pool`].
    pub async fn position(
        &self,
        pool_address: &str,
        window_hours: u32,
        position_size_usd: f64,
        options: &AnalyzeOptions,
    ) -> Result<PositionReport, AnalysisError> {
        let snapshot = self.analyze_pool(pool_address, window_hours, options).await?;
        let il = compute_il(snapshot.price_changes(), snapshot.weights().as_slice())?;
        let earnings = estimate_position_earnings(
            position_size_usd,
            snapshot.volume_window(),
            snapshot.tvl_avg(),
            snapshot.fee_tier(),
            snapshot.window_hours(),
        );
        Ok(PositionReport::new(self.chain, &snapshot, &il, earnings))
    }

    /// Pool type, tokens, TVL and fee without touching price history.
    ///
    /// # Errors
    /// Same fatal cases as [`Self::analyze_pool`].
    pub async fn summary(&self, pool_address: &str) -> Result<PoolSummary, AnalysisError> {
        let pool = parse_pool_address(pool_address)?;
        let (pool_type, tokens) = self.resolve_pool(&pool, None).await?;

        let (price0, price1, reserves, fee) = tokio::join!(
            self.oracle.get_token_price(&tokens.token0.address),
            self.oracle.get_token_price(&tokens.token1.address),
            self.reader.get_pool_reserves(&pool, &tokens, pool_type),
            self.fee_tiers.resolve(&pool, pool_type),
        );
        let price0 = require_price(&tokens.token0, price0)?;
        let price1 = require_price(&tokens.token1, price1)?;
        let reserves = reserves.map_err(AnalysisError::Reserves)?;

        Ok(PoolSummary {
            pool_type,
            tvl_usd: reserves.tvl_usd(&tokens, price0, price1),
            fee_tier_percent: fee.fee_tier.percent(),
            token0: tokens.token0.symbol,
            token1: tokens.token1.symbol,
        })
    }

    /// Summaries of several pools. A failing pool becomes an error row
    /// instead of failing the whole comparison.
    pub async fn compare_pools(&self, pools: &[String], window_hours: u32) -> PoolComparison {
        let mut rows = Vec::with_capacity(pools.len());
        for pool in pools {
            let row = match self.summary(pool).await {
                Ok(summary) => ComparedPool {
                    pool_address: pool.clone(),
                    summary: Some(summary),
                    error: None,
                },
                Err(e) => {
                    warn!(pool = %pool, error = %e, "pool excluded from comparison");
                    ComparedPool {
                        pool_address: pool.clone(),
                        summary: None,
                        error: Some(e.to_string()),
                    }
                }
            };
            rows.push(row);
        }
        PoolComparison {
            pools: rows,
            window_hours,
            timestamp: Utc::now(),
        }
    }

    /// True when the address is well formed and exposes two tokens.
    pub async fn validate_pool_address(&self, pool_address: &str) -> bool {
        match validate_address(pool_address) {
            Ok(pool) => self.reader.get_pool_tokens(&pool).await.is_ok(),
            Err(_) => false,
        }
    }

    /// The hinted type, or the classifier's answer.
    ///
    /// # Errors
    /// Propagates node failures from the classifier.
    pub async fn detect_pool_type(
        &self,
        pool: &str,
        hint: Option<PoolType>,
    ) -> Result<PoolType, CallError> {
        match hint {
            Some(pool_type) => Ok(pool_type),
            None => self.classifier.classify(pool).await,
        }
    }

    async fn resolve_pool(
        &self,
        pool: &str,
        hint: Option<PoolType>,
    ) -> Result<(PoolType, PoolTokens), AnalysisError> {
        let (pool_type, tokens) = tokio::join!(
            self.detect_pool_type(pool, hint),
            self.reader.get_pool_tokens(pool)
        );
        let pool_type = pool_type.map_err(AnalysisError::Classification)?;
        let tokens = tokens.map_err(AnalysisError::Tokens)?;
        info!(
            %pool_type,
            token0 = %tokens.token0.symbol,
            token1 = %tokens.token1.symbol,
            "pool resolved"
        );
        Ok((pool_type, tokens))
    }

    async fn build_snapshot(
        &self,
        pool_address: &str,
        window_hours: u32,
        options: &AnalyzeOptions,
    ) -> Result<PoolSnapshot, AnalysisError> {
        if window_hours == 0 {
            return Err(AnalysisError::EmptyWindow);
        }
        let pool = parse_pool_address(pool_address)?;
        let weights = resolve_weights(options.weights.as_deref())?;
        let (pool_type, tokens) = self.resolve_pool(&pool, options.pool_type).await?;

        let (token0, token1) = (&tokens.token0, &tokens.token1);
        let (current0, current1, historical0, historical1, reserves, fee) = tokio::join!(
            self.oracle.get_token_price(&token0.address),
            self.oracle.get_token_price(&token1.address),
            self.oracle.get_historical_price(&token0.address, window_hours),
            self.oracle.get_historical_price(&token1.address, window_hours),
            self.reader.get_pool_reserves(&pool, &tokens, pool_type),
            self.fee_tiers.resolve(&pool, pool_type),
        );

        let current_prices = [
            require_price(token0, current0)?,
            require_price(token1, current1)?,
        ];
        let historical_prices = [
            historical_price(token0, historical0),
            historical_price(token1, historical1),
        ];
        let reserves = reserves.map_err(AnalysisError::Reserves)?;
        let tvl_usd = reserves.tvl_usd(&tokens, current_prices[0], current_prices[1]);
        let volume = self.volume_model.estimate(tvl_usd, window_hours);

        let snapshot = PoolSnapshot::assemble(SnapshotInputs {
            pool_address: pool,
            pool_type,
            tokens,
            current_prices,
            historical_prices,
            reserves,
            tvl_usd,
            volume,
            fee_tier: fee.fraction(),
            fee_tier_defaulted: fee.defaulted,
            window_hours,
            weights,
        })?;

        info!(
            tvl_usd,
            volume_usd = snapshot.volume_window(),
            fee_tier = snapshot.fee_tier(),
            data_quality = %snapshot.data_quality(),
            "pool analyzed"
        );
        Ok(snapshot)
    }
}

fn parse_pool_address(pool_address: &str) -> Result<String, AnalysisError> {
    validate_address(pool_address).map_err(|_| AnalysisError::InvalidAddress(pool_address.to_string()))
}

/// Two-asset weights from the caller, or 50/50.
fn resolve_weights(raw: Option<&[f64]>) -> Result<PoolWeights, AnalysisError> {
    let weights = match raw {
        Some(raw) => PoolWeights::new(raw)?,
        None => PoolWeights::balanced(),
    };
    if weights.len() != 2 {
        return Err(SnapshotError::WeightCount {
            expected: 2,
            got: weights.len(),
        }
        .into());
    }
    Ok(weights)
}

fn require_price(
    token: &TokenInfo,
    result: Result<Option<f64>, PriceError>,
) -> Result<f64, AnalysisError> {
    match result {
        Ok(Some(price)) if price.is_finite() && price > 0.0 => Ok(price),
        Ok(_) => Err(AnalysisError::PriceUnavailable {
            symbol: token.symbol.clone(),
            address: token.address.clone(),
        }),
        Err(source) => Err(AnalysisError::PriceLookup {
            symbol: token.symbol.clone(),
            source,
        }),
    }
}

/// A usable historical price, or `None` with a warning.
fn historical_price(token: &TokenInfo, result: Result<Option<f64>, PriceError>) -> Option<f64> {
    match result {
        Ok(Some(price)) if price.is_finite() && price > 0.0 => Some(price),
        Ok(_) => {
            warn!(token = %token.symbol, "historical price unavailable, using current price");
            None
        }
        Err(e) => {
            warn!(token = %token.symbol, error = %e, "historical price lookup failed, using current price");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lp_il_data::mock::StaticPriceOracle;
    use lp_il_domain::DataQuality;
    use lp_il_protocols::mock::MockPoolContract;
    use primitive_types::U256;

    const PAIR: &str = "0x00000000000000000000000000000000000000a2";
    const CL_POOL: &str = "0x00000000000000000000000000000000000000a3";
    const WEIGHTED: &str = "0x00000000000000000000000000000000000000b1";
    const WETH: &str = "0x00000000000000000000000000000000000000e1";
    const USDC: &str = "0x00000000000000000000000000000000000000e2";

    fn contract() -> MockPoolContract {
        MockPoolContract::new()
            .with_v2_pool(
                PAIR,
                WETH,
                USDC,
                U256::from(10u128.pow(21)),           // 1,000 WETH
                U256::from(2_000_000_000_000u64),     // 2,000,000 USDC
            )
            .with_v3_pool(CL_POOL, WETH, USDC, 500)
            .with_balance(WETH, CL_POOL, U256::from(10u128.pow(20)))
            .with_balance(USDC, CL_POOL, U256::from(200_000_000_000u64))
            .with_opaque_pool(WEIGHTED, WETH, USDC)
            .with_balance(WETH, WEIGHTED, U256::from(4 * 10u128.pow(20)))
            .with_balance(USDC, WEIGHTED, U256::from(200_000_000_000u64))
            .with_token(WETH, "WETH", 18)
            .with_token(USDC, "USDC", 6)
    }

    fn oracle() -> StaticPriceOracle {
        StaticPriceOracle::new()
            .with_price(WETH, 2_000.0, Some(1_000.0))
            .with_price(USDC, 1.0, Some(1.0))
    }

    fn analyzer(contract: MockPoolContract, oracle: StaticPriceOracle) -> PoolAnalyzer {
        PoolAnalyzer::new(Chain::Ethereum, Arc::new(contract), Arc::new(oracle))
    }

    #[tokio::test]
    async fn test_analyzes_constant_product_pair() {
        let snapshot = analyzer(contract(), oracle())
            .analyze_pool(PAIR, 24, &AnalyzeOptions::default())
            .await
            .unwrap();

        assert_eq!(snapshot.pool_type(), PoolType::UniswapV2);
        assert!((snapshot.tvl_usd() - 4_000_000.0).abs() < 1e-6);
        assert!((snapshot.volume_window() - 4_000_000.0).abs() < 1e-6);
        assert!((snapshot.fee_tier() - 0.003).abs() < 1e-15);
        assert_eq!(snapshot.price_changes().get("WETH"), Some(2.0));
        assert_eq!(snapshot.price_changes().get("USDC"), Some(1.0));
        assert_eq!(snapshot.data_quality(), DataQuality::Estimated);
        assert_eq!(snapshot.weights().as_slice(), &[50.0, 50.0]);
    }

    #[tokio::test]
    async fn test_mixed_case_address_is_accepted() {
        let upper = format!("0x{}", PAIR[2..].to_ascii_uppercase());
        let snapshot = analyzer(contract(), oracle())
            .analyze_pool(&upper, 24, &AnalyzeOptions::default())
            .await
            .unwrap();
        assert_eq!(snapshot.pool_address(), PAIR);
    }

    #[tokio::test]
    async fn test_missing_history_degrades_to_limited() {
        let oracle = StaticPriceOracle::new()
            .with_price(WETH, 2_000.0, None)
            .with_price(USDC, 1.0, Some(1.0));
        let snapshot = analyzer(contract(), oracle)
            .analyze_pool(PAIR, 24, &AnalyzeOptions::default())
            .await
            .unwrap();

        assert_eq!(snapshot.price_changes().get("WETH"), Some(1.0));
        assert_eq!(snapshot.initial_prices().get("WETH"), Some(2_000.0));
        assert_eq!(snapshot.data_quality(), DataQuality::Limited);
    }

    #[tokio::test]
    async fn test_missing_current_price_is_fatal() {
        let oracle = StaticPriceOracle::new().with_price(WETH, 2_000.0, Some(1_000.0));
        let err = analyzer(contract(), oracle)
            .analyze_pool(PAIR, 24, &AnalyzeOptions::default())
            .await
            .unwrap_err();
        assert!(
            matches!(err, AnalysisError::PriceUnavailable { ref symbol, .. } if symbol == "USDC")
        );
    }

    #[tokio::test]
    async fn test_price_feed_outage_is_fatal() {
        let err = analyzer(contract(), oracle().offline())
            .analyze_pool(PAIR, 24, &AnalyzeOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::PriceLookup { .. }));
        assert!(err.is_upstream());
    }

    #[tokio::test]
    async fn test_node_outage_fails_classification() {
        let err = analyzer(contract().offline(), oracle())
            .analyze_pool(PAIR, 24, &AnalyzeOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::Classification(CallError::Transport(_))));
    }

    #[tokio::test]
    async fn test_non_pool_address_fails_on_tokens() {
        let err = analyzer(contract(), oracle())
            .analyze_pool(
                "0x00000000000000000000000000000000000000ff",
                24,
                &AnalyzeOptions::default(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::Tokens(_)));
        assert!(!err.is_upstream());
    }

    #[tokio::test]
    async fn test_concentrated_pool_reads_fee_and_balances() {
        let snapshot = analyzer(contract(), oracle())
            .analyze_pool(CL_POOL, 24, &AnalyzeOptions::default())
            .await
            .unwrap();

        assert_eq!(snapshot.pool_type(), PoolType::UniswapV3);
        assert!((snapshot.fee_tier() - 0.0005).abs() < 1e-15);
        // 100 WETH * 2000 + 200,000 USDC
        assert!((snapshot.tvl_usd() - 400_000.0).abs() < 1e-6);
        assert_eq!(snapshot.reserves_timestamp(), None);
    }

    #[tokio::test]
    async fn test_failed_fee_read_limits_quality() {
        let snapshot = analyzer(contract().without_fee(CL_POOL), oracle())
            .analyze_pool(CL_POOL, 24, &AnalyzeOptions::default())
            .await
            .unwrap();
        assert!((snapshot.fee_tier() - 0.003).abs() < 1e-15);
        assert_eq!(snapshot.data_quality(), DataQuality::Limited);
    }

    #[tokio::test]
    async fn test_weighted_pool_with_hint() {
        let options = AnalyzeOptions {
            weights: Some(vec![8.0, 2.0]),
            pool_type: Some(PoolType::Balancer),
        };
        let snapshot = analyzer(contract(), oracle())
            .analyze_pool(WEIGHTED, 168, &options)
            .await
            .unwrap();

        assert_eq!(snapshot.pool_type(), PoolType::Balancer);
        assert_eq!(snapshot.weights().as_slice(), &[80.0, 20.0]);
        // 400 WETH * 2000 + 200,000 USDC
        assert!((snapshot.tvl_usd() - 1_000_000.0).abs() < 1e-6);
        assert!((snapshot.volume_window() - 7_000_000.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_unhinted_opaque_pool_is_unknown() {
        let snapshot = analyzer(contract(), oracle())
            .analyze_pool(WEIGHTED, 24, &AnalyzeOptions::default())
            .await
            .unwrap();
        assert_eq!(snapshot.pool_type(), PoolType::Unknown);
        assert!((snapshot.fee_tier() - 0.003).abs() < 1e-15);
    }

    #[tokio::test]
    async fn test_rejects_bad_requests_before_io() {
        let analyzer = analyzer(contract().offline(), oracle().offline());
        let defaults = AnalyzeOptions::default();

        let err = analyzer.analyze_pool("0x1234", 24, &defaults).await.unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidAddress(_)));
        assert!(err.is_invalid_input());

        let err = analyzer.analyze_pool(PAIR, 0, &defaults).await.unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyWindow));

        let three = AnalyzeOptions {
            weights: Some(vec![1.0, 1.0, 1.0]),
            pool_type: None,
        };
        let err = analyzer.analyze_pool(PAIR, 24, &three).await.unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::Snapshot(SnapshotError::WeightCount { got: 3, .. })
        ));

        let negative = AnalyzeOptions {
            weights: Some(vec![-1.0, 2.0]),
            pool_type: None,
        };
        let err = analyzer.analyze_pool(PAIR, 24, &negative).await.unwrap_err();
        assert!(matches!(err, AnalysisError::Weights(_)));
    }

    #[tokio::test]
    async fn test_estimate_scores_snapshot() {
        let report = analyzer(contract(), oracle())
            .estimate(PAIR, 24, &AnalyzeOptions::default())
            .await
            .unwrap();

        assert!((report.il_percent - (-5.719_095_841_793_653)).abs() < 1e-9);
        // Volume equals TVL per day at 0.3%: 0.3% * 365.
        assert!((report.fee_apr_est - 109.5).abs() < 1e-9);
        assert!(report.fees.annualized);
        assert_eq!(report.pool_info.token0, "WETH");
        assert!(
            report
                .notes
                .iter()
                .any(|n| n == crate::report::NOTE_NET_POSITIVE)
        );

        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("IL_percent").is_some());
        assert_eq!(json["pool_info"]["type"], "uniswap-v2");
        assert_eq!(json["volume_source"]["kind"], "tvl-heuristic");
    }

    #[tokio::test]
    async fn test_position_report() {
        let report = analyzer(contract(), oracle())
            .position(PAIR, 24, 40_000.0, &AnalyzeOptions::default())
            .await
            .unwrap();
        assert!((report.earnings.pool_share_percent - 1.0).abs() < 1e-9);
        assert!((report.earnings.apr_percent - 109.5).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_summary_and_comparison() {
        let analyzer = analyzer(contract(), oracle());
        let summary = analyzer.summary(PAIR).await.unwrap();
        assert_eq!(summary.pool_type, PoolType::UniswapV2);
        assert!((summary.fee_tier_percent - 0.3).abs() < 1e-12);
        assert!((summary.tvl_usd - 4_000_000.0).abs() < 1e-6);

        let pools = vec![PAIR.to_string(), "0xnope".to_string()];
        let comparison = analyzer.compare_pools(&pools, 24).await;
        assert_eq!(comparison.pools.len(), 2);
        assert!(comparison.pools[0].summary.is_some());
        assert!(comparison.pools[1].error.is_some());

        let json = serde_json::to_value(&comparison).unwrap();
        assert_eq!(json["pools"][0]["token0"], "WETH");
        assert!(json["pools"][1].get("token0").is_none());
    }

    #[tokio::test]
    async fn test_validate_pool_address() {
        let analyzer = analyzer(contract(), oracle());
        assert!(analyzer.validate_pool_address(PAIR).await);
        assert!(!analyzer.validate_pool_address(USDC).await);
        assert!(!analyzer.validate_pool_address("pool").await);
    }
}
