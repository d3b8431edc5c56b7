use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// AMM family a pool belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PoolType {
    /// Constant-product pair (`getReserves`).
    #[serde(rename = "uniswap-v2")]
    UniswapV2,
    /// Concentrated-liquidity pool (`liquidity`, `fee`).
    #[serde(rename = "uniswap-v3")]
    UniswapV3,
    /// Constant-product clone fork.
    #[serde(rename = "sushiswap")]
    SushiSwap,
    /// Weighted pool.
    #[serde(rename = "balancer")]
    Balancer,
    /// Stable-swap pool.
    #[serde(rename = "curve")]
    Curve,
    /// No probe confirmed a known interface.
    #[default]
    #[serde(rename = "unknown")]
    Unknown,
}

impl PoolType {
    /// All variants in declaration order.
    pub const ALL: [PoolType; 6] = [
        Self::UniswapV2,
        Self::UniswapV3,
        Self::SushiSwap,
        Self::Balancer,
        Self::Curve,
        Self::Unknown,
    ];

    /// Wire label of the pool type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UniswapV2 => "uniswap-v2",
            Self::UniswapV3 => "uniswap-v3",
            Self::SushiSwap => "sushiswap",
            Self::Balancer => "balancer",
            Self::Curve => "curve",
            Self::Unknown => "unknown",
        }
    }

    /// Whether reserves can be read with `getReserves()`.
    #[must_use]
    pub fn is_constant_product(&self) -> bool {
        matches!(self, Self::UniswapV2 | Self::SushiSwap)
    }
}

impl fmt::Display for PoolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a pool type label is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown pool type: {0}")]
pub struct ParsePoolTypeError(pub String);

impl FromStr for PoolType {
    type Err = ParsePoolTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "uniswap-v2" | "uniswapv2" | "v2" => Ok(Self::UniswapV2),
            "uniswap-v3" | "uniswapv3" | "v3" => Ok(Self::UniswapV3),
            "sushiswap" | "sushi" => Ok(Self::SushiSwap),
            "balancer" => Ok(Self::Balancer),
            "curve" => Ok(Self::Curve),
            "unknown" => Ok(Self::Unknown),
            other => Err(ParsePoolTypeError(other.to_string())),
        }
    }
}

/// Whether the historical inputs of a snapshot were measured or substituted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataQuality {
    /// All inputs fetched; volume is still a heuristic estimate.
    Estimated,
    /// At least one input was replaced by a documented default.
    Limited,
}

impl fmt::Display for DataQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Estimated => f.write_str("estimated"),
            Self::Limited => f.write_str("limited"),
        }
    }
}

/// Where a volume figure came from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "kind")]
pub enum VolumeSource {
    /// `tvl * multiplier * window / 24h`; an estimate, never measured volume.
    TvlHeuristic {
        /// Daily turnover assumed as a multiple of TVL.
        multiplier: f64,
    },
}

/// EVM chains with a price-feed platform mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    Ethereum,
    Polygon,
    Arbitrum,
    Optimism,
    Base,
    Bsc,
    Avalanche,
}

impl Chain {
    /// Every supported chain.
    pub const ALL: [Chain; 7] = [
        Self::Ethereum,
        Self::Polygon,
        Self::Arbitrum,
        Self::Optimism,
        Self::Base,
        Self::Bsc,
        Self::Avalanche,
    ];

    /// EIP-155 chain id.
    #[must_use]
    pub fn id(&self) -> u64 {
        match self {
            Self::Ethereum => 1,
            Self::Polygon => 137,
            Self::Arbitrum => 42161,
            Self::Optimism => 10,
            Self::Base => 8453,
            Self::Bsc => 56,
            Self::Avalanche => 43114,
        }
    }

    /// Looks a chain up by id.
    #[must_use]
    pub fn from_id(id: u64) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.id() == id)
    }

    /// Lowercase chain name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ethereum => "ethereum",
            Self::Polygon => "polygon",
            Self::Arbitrum => "arbitrum",
            Self::Optimism => "optimism",
            Self::Base => "base",
            Self::Bsc => "bsc",
            Self::Avalanche => "avalanche",
        }
    }

    /// CoinGecko asset platform identifier.
    #[must_use]
    pub fn coingecko_platform(&self) -> &'static str {
        match self {
            Self::Ethereum => "ethereum",
            Self::Polygon => "polygon-pos",
            Self::Arbitrum => "arbitrum-one",
            Self::Optimism => "optimistic-ethereum",
            Self::Base => "base",
            Self::Bsc => "binance-smart-chain",
            Self::Avalanche => "avalanche",
        }
    }

    /// Environment variable overriding the RPC endpoint.
    #[must_use]
    pub fn rpc_env_var(&self) -> &'static str {
        match self {
            Self::Ethereum => "ETHEREUM_RPC_URL",
            Self::Polygon => "POLYGON_RPC_URL",
            Self::Arbitrum => "ARBITRUM_RPC_URL",
            Self::Optimism => "OPTIMISM_RPC_URL",
            Self::Base => "BASE_RPC_URL",
            Self::Bsc => "BSC_RPC_URL",
            Self::Avalanche => "AVALANCHE_RPC_URL",
        }
    }

    /// Public RPC endpoint used when no override is set.
    #[must_use]
    pub fn default_rpc_url(&self) -> &'static str {
        match self {
            Self::Ethereum => "https://eth.llamarpc.com",
            Self::Polygon => "https://polygon.llamarpc.com",
            Self::Arbitrum => "https://arbitrum.llamarpc.com",
            Self::Optimism => "https://optimism.llamarpc.com",
            Self::Base => "https://base.llamarpc.com",
            Self::Bsc => "https://bsc.llamarpc.com",
            Self::Avalanche => "https://avalanche.llamarpc.com",
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a chain name or id is not supported.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported chain: {0}")]
pub struct ParseChainError(pub String);

impl FromStr for Chain {
    type Err = ParseChainError;

    /// Accepts a chain name (`ethereum`, `mainnet`, `arbitrum`) or a numeric id.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        if let Ok(id) = s.parse::<u64>() {
            return Self::from_id(id).ok_or(ParseChainError(s));
        }
        match s.as_str() {
            "mainnet" | "eth" => Ok(Self::Ethereum),
            "matic" => Ok(Self::Polygon),
            "bnb" => Ok(Self::Bsc),
            "avax" => Ok(Self::Avalanche),
            name => Self::ALL
                .into_iter()
                .find(|c| c.as_str() == name)
                .ok_or_else(|| ParseChainError(s.clone())),
        }
    }
}
