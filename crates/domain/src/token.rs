use primitive_types::U256;
use serde::{Deserialize, Serialize};

/// Symbol substituted when token metadata cannot be read.
pub const UNKNOWN_SYMBOL: &str = "UNKNOWN";
/// Decimals substituted when token metadata cannot be read.
pub const DEFAULT_DECIMALS: u8 = 18;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenInfo {
    pub address: String,
    pub symbol: String,
    pub decimals: u8,
}

impl TokenInfo {
    pub fn new(address: impl Into<String>, symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            address: address.into(),
            symbol: symbol.into(),
            decimals,
        }
    }

    /// Token whose metadata lookup failed.
    pub fn with_defaults(address: impl Into<String>) -> Self {
        Self::new(address, UNKNOWN_SYMBOL, DEFAULT_DECIMALS)
    }

    /// Converts a raw on-chain amount into whole tokens.
    #[must_use]
    pub fn normalize(&self, raw: U256) -> f64 {
        normalize_amount(raw, self.decimals)
    }
}

/// `raw / 10^decimals` as a float.
#[must_use]
pub fn normalize_amount(raw: U256, decimals: u8) -> f64 {
    u256_to_f64(raw) / 10f64.powi(i32::from(decimals))
}

fn u256_to_f64(value: U256) -> f64 {
    // Limbs are little-endian u64 words.
    value
        .0
        .iter()
        .rev()
        .fold(0.0, |acc, limb| acc * 18_446_744_073_709_551_616.0 + *limb as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_amount() {
        let one_eth = U256::from(1_000_000_000_000_000_000u128);
        assert!((normalize_amount(one_eth, 18) - 1.0).abs() < 1e-12);

        let usdc = U256::from(2_500_000_000u64);
        assert!((normalize_amount(usdc, 6) - 2_500.0).abs() < 1e-9);
    }

    #[test]
    fn test_normalize_large_amount() {
        // Above u128::MAX.
        let raw = U256::from(u128::MAX) * U256::from(10u64);
        let expected = u128::MAX as f64 * 10.0 / 1e18;
        let got = normalize_amount(raw, 18);
        assert!((got - expected).abs() / expected < 1e-12);
    }

    #[test]
    fn test_defaults() {
        let token = TokenInfo::with_defaults("0xabc");
        assert_eq!(token.symbol, UNKNOWN_SYMBOL);
        assert_eq!(token.decimals, 18);
    }
}
