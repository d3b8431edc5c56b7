use crate::PoolContract;
use crate::error::CallError;
use lp_il_domain::token::{DEFAULT_DECIMALS, UNKNOWN_SYMBOL};
use lp_il_domain::{PoolReserves, PoolTokens, PoolType, TokenInfo};
use std::sync::Arc;
use tracing::warn;

/// Reads pool membership, token metadata and reserves.
pub struct PoolReader {
    contract: Arc<dyn PoolContract>,
}

impl PoolReader {
    pub fn new(contract: Arc<dyn PoolContract>) -> Self {
        Self { contract }
    }

    /// Returns both tokens of `pool` with their metadata.
    ///
    /// Token addresses are mandatory. A symbol or decimals read that fails
    /// is replaced by `UNKNOWN` / 18 and the result is marked as defaulted.
    ///
    /// # Errors
    /// Fails when either `token0()` or `token1()` cannot be read.
    pub async fn get_pool_tokens(&self, pool: &str) -> Result<PoolTokens, CallError> {
        let (address0, address1) =
            tokio::try_join!(self.contract.token0(pool), self.contract.token1(pool))?;

        let ((token0, defaulted0), (token1, defaulted1)) =
            tokio::join!(self.token_info(&address0), self.token_info(&address1));

        Ok(PoolTokens {
            token0,
            token1,
            metadata_defaulted: defaulted0 || defaulted1,
        })
    }

    async fn token_info(&self, address: &str) -> (TokenInfo, bool) {
        let (symbol, decimals) = tokio::join!(
            self.contract.symbol(address),
            self.contract.decimals(address)
        );

        let mut defaulted = false;
        let symbol = match symbol {
            Ok(s) if !s.trim().is_empty() => s,
            Ok(_) => {
                defaulted = true;
                UNKNOWN_SYMBOL.to_string()
            }
            Err(error) => {
                warn!(token = address, %error, "symbol read failed");
                defaulted = true;
                UNKNOWN_SYMBOL.to_string()
            }
        };
        let decimals = decimals.unwrap_or_else(|error| {
            warn!(token = address, %error, "decimals read failed");
            defaulted = true;
            DEFAULT_DECIMALS
        });

        (TokenInfo::new(address, symbol, decimals), defaulted)
    }

    /// Raw reserves of `pool`.
    ///
    /// Constant-product pairs report their own reserves. Other families are
    /// valued from the token balances the pool address holds.
    ///
    /// # Errors
    /// Propagates the failed call.
    pub async fn get_pool_reserves(
        &self,
        pool: &str,
        tokens: &PoolTokens,
        pool_type: PoolType,
    ) -> Result<PoolReserves, CallError> {
        if pool_type.is_constant_product() {
            return self.contract.get_reserves(pool).await;
        }
        let (reserve0, reserve1) = tokio::try_join!(
            self.contract.balance_of(&tokens.token0.address, pool),
            self.contract.balance_of(&tokens.token1.address, pool)
        )?;
        Ok(PoolReserves {
            reserve0,
            reserve1,
            timestamp: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockPoolContract;
    use primitive_types::U256;

    const POOL: &str = "0x0000000000000000000000000000000000000002";
    const V3: &str = "0x0000000000000000000000000000000000000003";
    const WETH: &str = "0x00000000000000000000000000000000000000a0";
    const USDC: &str = "0x00000000000000000000000000000000000000a1";

    fn contract() -> MockPoolContract {
        MockPoolContract::new()
            .with_v2_pool(POOL, WETH, USDC, U256::from(10), U256::from(20))
            .with_v3_pool(V3, WETH, USDC, 3_000)
            .with_balance(WETH, V3, U256::from(7))
            .with_balance(USDC, V3, U256::from(9))
            .with_token(WETH, "WETH", 18)
            .with_token(USDC, "USDC", 6)
    }

    #[tokio::test]
    async fn test_reads_tokens() {
        let reader = PoolReader::new(Arc::new(contract()));
        let tokens = reader.get_pool_tokens(POOL).await.unwrap();
        assert_eq!(tokens.token0, TokenInfo::new(WETH, "WETH", 18));
        assert_eq!(tokens.token1, TokenInfo::new(USDC, "USDC", 6));
        assert!(!tokens.metadata_defaulted);
    }

    #[tokio::test]
    async fn test_missing_metadata_is_defaulted() {
        let contract = MockPoolContract::new()
            .with_v2_pool(POOL, WETH, USDC, U256::from(10), U256::from(20))
            .with_token(WETH, "WETH", 18);
        let reader = PoolReader::new(Arc::new(contract));
        let tokens = reader.get_pool_tokens(POOL).await.unwrap();
        assert_eq!(tokens.token1, TokenInfo::with_defaults(USDC));
        assert!(tokens.metadata_defaulted);
    }

    #[tokio::test]
    async fn test_missing_token_address_fails() {
        let reader = PoolReader::new(Arc::new(contract()));
        let other = "0x00000000000000000000000000000000000000ff";
        assert!(reader.get_pool_tokens(other).await.is_err());
    }

    #[tokio::test]
    async fn test_reserves_by_family() {
        let reader = PoolReader::new(Arc::new(contract()));

        let tokens = reader.get_pool_tokens(POOL).await.unwrap();
        let pair = reader
            .get_pool_reserves(POOL, &tokens, PoolType::UniswapV2)
            .await
            .unwrap();
        assert_eq!(pair.reserve0, U256::from(10));
        assert!(pair.timestamp.is_some());

        let tokens = reader.get_pool_tokens(V3).await.unwrap();
        let held = reader
            .get_pool_reserves(V3, &tokens, PoolType::UniswapV3)
            .await
            .unwrap();
        assert_eq!(held.reserve0, U256::from(7));
        assert_eq!(held.reserve1, U256::from(9));
        assert_eq!(held.timestamp, None);
    }
}
