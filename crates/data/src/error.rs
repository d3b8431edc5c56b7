use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceError {
    /// The request did not complete.
    #[error("price request failed: {0}")]
    Network(String),

    /// The provider throttled us.
    #[error("price provider rate limit reached")]
    RateLimited,

    /// Non-success HTTP status.
    #[error("price provider returned HTTP {0}")]
    Status(u16),

    /// The body was not the expected JSON.
    #[error("cannot parse price response: {0}")]
    Parse(String),
}
