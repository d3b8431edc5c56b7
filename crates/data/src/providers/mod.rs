pub mod coingecko;

pub use coingecko::{CoinGeckoConfig, CoinGeckoOracle};
