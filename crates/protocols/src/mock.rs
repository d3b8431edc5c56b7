//! In-memory [`PoolContract`] for tests.
//!
//! Unregistered pools and tokens revert, so they look like contracts without
//! the requested interface. [`MockPoolContract::offline`] turns every call
//! into a transport error instead.

use crate::PoolContract;
use crate::error::CallError;
use async_trait::async_trait;
use lp_il_domain::PoolReserves;
use primitive_types::U256;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
struct MockPool {
    token0: String,
    token1: String,
    reserves: Option<PoolReserves>,
    liquidity: Option<u128>,
    fee: Option<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct MockPoolContract {
    pools: HashMap<String, MockPool>,
    tokens: HashMap<String, (String, u8)>,
    balances: HashMap<(String, String), U256>,
    offline: bool,
}

fn reverted(what: &str) -> CallError {
    CallError::Reverted(format!("execution reverted: {what}"))
}

impl MockPoolContract {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A constant-product pair.
    #[must_use]
    pub fn with_v2_pool(
        mut self,
        pool: &str,
        token0: &str,
        token1: &str,
        reserve0: U256,
        reserve1: U256,
    ) -> Self {
        self.pools.insert(
            pool.to_string(),
            MockPool {
                token0: token0.to_string(),
                token1: token1.to_string(),
                reserves: Some(PoolReserves {
                    reserve0,
                    reserve1,
                    timestamp: Some(1_700_000_000),
                }),
                ..MockPool::default()
            },
        );
        self
    }

    /// A concentrated-liquidity pool with the given fee.
    #[must_use]
    pub fn with_v3_pool(mut self, pool: &str, token0: &str, token1: &str, fee: u32) -> Self {
        self.pools.insert(
            pool.to_string(),
            MockPool {
                token0: token0.to_string(),
                token1: token1.to_string(),
                liquidity: Some(1_000_000),
                fee: Some(fee),
                ..MockPool::default()
            },
        );
        self
    }

    /// A pool that exposes tokens but none of the probed interfaces.
    #[must_use]
    pub fn with_opaque_pool(mut self, pool: &str, token0: &str, token1: &str) -> Self {
        self.pools.insert(
            pool.to_string(),
            MockPool {
                token0: token0.to_string(),
                token1: token1.to_string(),
                ..MockPool::default()
            },
        );
        self
    }

    /// Makes `fee()` of an existing pool revert.
    #[must_use]
    pub fn without_fee(mut self, pool: &str) -> Self {
        if let Some(entry) = self.pools.get_mut(pool) {
            entry.fee = None;
        }
        self
    }

    #[must_use]
    pub fn with_token(mut self, token: &str, symbol: &str, decimals: u8) -> Self {
        self.tokens
            .insert(token.to_string(), (symbol.to_string(), decimals));
        self
    }

    #[must_use]
    pub fn with_balance(mut self, token: &str, owner: &str, amount: U256) -> Self {
        self.balances
            .insert((token.to_string(), owner.to_string()), amount);
        self
    }

    /// Every call fails as if the node were unreachable.
    #[must_use]
    pub fn offline(mut self) -> Self {
        self.offline = true;
        self
    }

    fn pool(&self, pool: &str) -> Result<&MockPool, CallError> {
        if self.offline {
            return Err(CallError::Transport("connection refused".to_string()));
        }
        self.pools.get(pool).ok_or_else(|| reverted(pool))
    }

    fn token(&self, token: &str) -> Result<&(String, u8), CallError> {
        if self.offline {
            return Err(CallError::Transport("connection refused".to_string()));
        }
        self.tokens.get(token).ok_or_else(|| reverted(token))
    }
}

#[async_trait]
impl PoolContract for MockPoolContract {
    async fn token0(&self, pool: &str) -> Result<String, CallError> {
        Ok(self.pool(pool)?.token0.clone())
    }

    async fn token1(&self, pool: &str) -> Result<String, CallError> {
        Ok(self.pool(pool)?.token1.clone())
    }

    async fn get_reserves(&self, pool: &str) -> Result<PoolReserves, CallError> {
        self.pool(pool)?.reserves.ok_or_else(|| reverted("getReserves"))
    }

    async fn liquidity(&self, pool: &str) -> Result<u128, CallError> {
        self.pool(pool)?.liquidity.ok_or_else(|| reverted("liquidity"))
    }

    async fn fee(&self, pool: &str) -> Result<u32, CallError> {
        self.pool(pool)?.fee.ok_or_else(|| reverted("fee"))
    }

    async fn symbol(&self, token: &str) -> Result<String, CallError> {
        Ok(self.token(token)?.0.clone())
    }

    async fn decimals(&self, token: &str) -> Result<u8, CallError> {
        Ok(self.token(token)?.1)
    }

    async fn balance_of(&self, token: &str, owner: &str) -> Result<U256, CallError> {
        if self.offline {
            return Err(CallError::Transport("connection refused".to_string()));
        }
        Ok(self
            .balances
            .get(&(token.to_string(), owner.to_string()))
            .copied()
            .unwrap_or_default())
    }
}
