//! `PoolContract` over an alloy HTTP provider.

use crate::PoolContract;
use crate::contracts::{
    IERC20, IERC20Bytes32, IUniswapV2Pair, IUniswapV3Pool, format_address, parse_address,
    symbol_from_bytes32,
};
use crate::error::CallError;
use alloy::contract::Error as ContractError;
use alloy::primitives::U256 as AlloyU256;
use alloy::providers::RootProvider;
use alloy::rpc::client::RpcClient;
use alloy::transports::http::{Http, reqwest};
use async_trait::async_trait;
use lp_il_domain::PoolReserves;
use primitive_types::U256;
use std::time::Duration;
use tracing::trace;

/// JSON-RPC error code geth uses for reverted execution.
const EXECUTION_REVERTED: i64 = 3;

/// Reads contracts on one EVM chain through a JSON-RPC endpoint.
pub struct EvmRpcClient {
    provider: RootProvider,
    url: String,
}

impl EvmRpcClient {
    /// Creates a client for `url` with a per-request timeout.
    ///
    /// # Errors
    /// Returns [`CallError::Transport`] if the URL is malformed or the HTTP
    /// client cannot be built.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, CallError> {
        let url = url.into();
        let endpoint: reqwest::Url = url
            .parse()
            .map_err(|e| CallError::Transport(format!("invalid rpc url {url}: {e}")))?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CallError::Transport(e.to_string()))?;

        let client = RpcClient::new(Http::with_client(http, endpoint), false);
        Ok(Self {
            provider: RootProvider::new(client),
            url,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Splits alloy call failures into interface mismatches and fatal errors.
fn map_call_error(error: ContractError) -> CallError {
    match error {
        ContractError::ZeroData(..) => CallError::EmptyReturn,
        ContractError::AbiError(e) => CallError::Decode(e.to_string()),
        ContractError::TransportError(e) => match e.as_error_resp() {
            Some(payload) => classify_rpc_error(payload.code, &payload.message),
            None => CallError::Transport(e.to_string()),
        },
        other => CallError::Transport(other.to_string()),
    }
}

fn classify_rpc_error(code: i64, message: &str) -> CallError {
    if code == EXECUTION_REVERTED || message.to_ascii_lowercase().contains("revert") {
        CallError::Reverted(message.to_string())
    } else {
        CallError::Rpc {
            code,
            message: message.to_string(),
        }
    }
}

fn to_u256(value: AlloyU256) -> U256 {
    U256::from_big_endian(&value.to_be_bytes::<32>())
}

#[async_trait]
impl PoolContract for EvmRpcClient {
    async fn token0(&self, pool: &str) -> Result<String, CallError> {
        let pair = IUniswapV2Pair::new(parse_address(pool)?, &self.provider);
        trace!(pool, "token0");
        let token = pair.token0().call().await.map_err(map_call_error)?;
        Ok(format_address(token))
    }

    async fn token1(&self, pool: &str) -> Result<String, CallError> {
        let pair = IUniswapV2Pair::new(parse_address(pool)?, &self.provider);
        trace!(pool, "token1");
        let token = pair.token1().call().await.map_err(map_call_error)?;
        Ok(format_address(token))
    }

    async fn get_reserves(&self, pool: &str) -> Result<PoolReserves, CallError> {
        let pair = IUniswapV2Pair::new(parse_address(pool)?, &self.provider);
        trace!(pool, "getReserves");
        let reserves = pair.getReserves().call().await.map_err(map_call_error)?;
        Ok(PoolReserves {
            reserve0: U256::from(reserves.reserve0.to::<u128>()),
            reserve1: U256::from(reserves.reserve1.to::<u128>()),
            timestamp: Some(reserves.blockTimestampLast),
        })
    }

    async fn liquidity(&self, pool: &str) -> Result<u128, CallError> {
        let pool_contract = IUniswapV3Pool::new(parse_address(pool)?, &self.provider);
        trace!(pool, "liquidity");
        pool_contract.liquidity().call().await.map_err(map_call_error)
    }

    async fn fee(&self, pool: &str) -> Result<u32, CallError> {
        let pool_contract = IUniswapV3Pool::new(parse_address(pool)?, &self.provider);
        trace!(pool, "fee");
        let fee = pool_contract.fee().call().await.map_err(map_call_error)?;
        Ok(fee.to::<u32>())
    }

    async fn symbol(&self, token: &str) -> Result<String, CallError> {
        let address = parse_address(token)?;
        trace!(token, "symbol");
        match IERC20::new(address, &self.provider)
            .symbol()
            .call()
            .await
            .map_err(map_call_error)
        {
            Err(CallError::Decode(_)) => {
                let raw = IERC20Bytes32::new(address, &self.provider)
                    .symbol()
                    .call()
                    .await
                    .map_err(map_call_error)?;
                symbol_from_bytes32(raw)
            }
            result => result,
        }
    }

    async fn decimals(&self, token: &str) -> Result<u8, CallError> {
        let erc20 = IERC20::new(parse_address(token)?, &self.provider);
        trace!(token, "decimals");
        erc20.decimals().call().await.map_err(map_call_error)
    }

    async fn balance_of(&self, token: &str, owner: &str) -> Result<U256, CallError> {
        let erc20 = IERC20::new(parse_address(token)?, &self.provider);
        let owner = parse_address(owner)?;
        trace!(token, "balanceOf");
        let balance = erc20.balanceOf(owner).call().await.map_err(map_call_error)?;
        Ok(to_u256(balance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::transports::TransportErrorKind;

    #[test]
    fn test_revert_is_a_mismatch() {
        let err = classify_rpc_error(-32000, "execution reverted");
        assert!(matches!(err, CallError::Reverted(_)));

        let err = classify_rpc_error(3, "custom error");
        assert!(err.is_interface_mismatch());
    }

    #[test]
    fn test_node_errors_are_not_mismatches() {
        let err = classify_rpc_error(-32005, "limit exceeded");
        assert_eq!(
            err,
            CallError::Rpc {
                code: -32005,
                message: "limit exceeded".to_string()
            }
        );
        assert!(!err.is_interface_mismatch());
    }

    #[test]
    fn test_transport_failure_is_fatal() {
        let err = map_call_error(ContractError::TransportError(
            TransportErrorKind::custom_str("connection refused"),
        ));
        assert!(matches!(err, CallError::Transport(_)));
        assert!(!err.is_interface_mismatch());
    }

    #[test]
    fn test_u256_conversion() {
        let value = AlloyU256::from(10u128.pow(21));
        assert_eq!(to_u256(value), U256::from(10u128.pow(21)));
        assert_eq!(to_u256(AlloyU256::MAX), U256::MAX);
    }

    #[test]
    fn test_rejects_malformed_url() {
        let err = EvmRpcClient::new("not a url", Duration::from_secs(1))
            .err()
            .unwrap();
        assert!(matches!(err, CallError::Transport(_)));
    }

    #[tokio::test]
    async fn test_invalid_pool_address_is_rejected_before_sending() {
        let client = EvmRpcClient::new("http://127.0.0.1:1", Duration::from_millis(50)).unwrap();
        let err = client.token0("not-an-address").await.unwrap_err();
        assert!(matches!(err, CallError::InvalidAddress(_)));
    }
}
