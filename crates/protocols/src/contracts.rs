//! Solidity interfaces of the pools and tokens the reader calls.

use crate::error::CallError;
use alloy::primitives::{Address, FixedBytes};
use alloy::sol;
use std::str::FromStr;

sol! {
    #[sol(rpc)]
    interface IUniswapV2Pair {
        function getReserves() external view returns (
            uint112 reserve0,
            uint112 reserve1,
            uint32 blockTimestampLast
        );

        function token0() external view returns (address);
        function token1() external view returns (address);
    }
}

sol! {
    #[sol(rpc)]
    interface IUniswapV3Pool {
        function liquidity() external view returns (uint128);
        function fee() external view returns (uint24);
    }
}

sol! {
    #[sol(rpc)]
    interface IERC20 {
        function symbol() external view returns (string);
        function decimals() external view returns (uint8);
        function balanceOf(address owner) external view returns (uint256);
    }
}

// Pre-standard tokens such as MKR return `bytes32` from `symbol()`.
sol! {
    #[sol(rpc)]
    interface IERC20Bytes32 {
        function symbol() external view returns (bytes32);
    }
}

/// Parses a `0x`-prefixed 20-byte hex address.
///
/// # Errors
/// Returns [`CallError::InvalidAddress`] for anything else.
pub fn parse_address(address: &str) -> Result<Address, CallError> {
    let invalid = || CallError::InvalidAddress(address.to_string());
    if !(address.starts_with("0x") || address.starts_with("0X")) || address.len() != 42 {
        return Err(invalid());
    }
    Address::from_str(&address[2..]).map_err(|_| invalid())
}

/// Lowercase `0x` form of an address.
#[must_use]
pub fn format_address(address: Address) -> String {
    format!("0x{}", hex::encode(address))
}

/// Checks an address and returns it lowercased.
///
/// # Errors
/// Returns [`CallError::InvalidAddress`] when `address` is not an address.
pub fn validate_address(address: &str) -> Result<String, CallError> {
    parse_address(address).map(format_address)
}

/// Text of a `bytes32` symbol, NUL padding removed.
///
/// # Errors
/// Returns [`CallError::Decode`] when the bytes are not UTF-8.
pub fn symbol_from_bytes32(raw: FixedBytes<32>) -> Result<String, CallError> {
    let text = std::str::from_utf8(raw.as_slice()).map_err(|e| CallError::Decode(e.to_string()))?;
    Ok(text.trim_end_matches('\0').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::sol_types::SolCall;

    #[test]
    fn test_selectors() {
        assert_eq!(IUniswapV2Pair::getReservesCall::SELECTOR, [0x09, 0x02, 0xf1, 0xac]);
        assert_eq!(IUniswapV2Pair::token0Call::SELECTOR, [0x0d, 0xfe, 0x16, 0x81]);
        assert_eq!(IUniswapV2Pair::token1Call::SELECTOR, [0xd2, 0x12, 0x20, 0xa7]);
        assert_eq!(IUniswapV3Pool::liquidityCall::SELECTOR, [0x1a, 0x68, 0x65, 0x02]);
        assert_eq!(IUniswapV3Pool::feeCall::SELECTOR, [0xdd, 0xca, 0x3f, 0x43]);
        assert_eq!(IERC20::symbolCall::SELECTOR, [0x95, 0xd8, 0x9b, 0x41]);
        assert_eq!(IERC20::decimalsCall::SELECTOR, [0x31, 0x3c, 0xe5, 0x67]);
        assert_eq!(IERC20::balanceOfCall::SELECTOR, [0x70, 0xa0, 0x82, 0x31]);
        assert_eq!(IERC20Bytes32::symbolCall::SELECTOR, IERC20::symbolCall::SELECTOR);
    }

    #[test]
    fn test_validate_address() {
        let addr = "0xB4e16d0168e52d35CaCD2c6185b44281Ec28C9Dc";
        assert_eq!(
            validate_address(addr).unwrap(),
            "0xb4e16d0168e52d35cacd2c6185b44281ec28c9dc"
        );
        assert!(validate_address("b4e16d0168e52d35cacd2c6185b44281ec28c9dc").is_err());
        assert!(validate_address("0x1234").is_err());
        assert!(validate_address("0xzze16d0168e52d35cacd2c6185b44281ec28c9dc").is_err());
    }

    #[test]
    fn test_bytes32_symbol() {
        let mut raw = [0u8; 32];
        raw[..3].copy_from_slice(b"MKR");
        assert_eq!(symbol_from_bytes32(FixedBytes::from(raw)).unwrap(), "MKR");

        raw[0] = 0xff;
        assert!(matches!(
            symbol_from_bytes32(FixedBytes::from(raw)),
            Err(CallError::Decode(_))
        ));
    }
}
