pub mod price_map;
pub mod weights;

pub use price_map::PriceMap;
pub use weights::PoolWeights;
