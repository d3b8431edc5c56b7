use thiserror::Error;

/// Failure of a single contract read.
///
/// The variants split into two groups. `Reverted`, `EmptyReturn` and
/// `Decode` mean the contract does not implement the requested interface;
/// `Rpc`, `Transport` and `InvalidAddress` mean the read itself could not be
/// performed and nothing is known about the contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallError {
    /// The call executed and reverted.
    #[error("call reverted: {0}")]
    Reverted(String),

    /// The call succeeded but returned no bytes (no code at the address, or
    /// a fallback that returns nothing).
    #[error("call returned no data")]
    EmptyReturn,

    /// Return data did not have the expected ABI shape.
    #[error("cannot decode return data: {0}")]
    Decode(String),

    /// The node answered with a JSON-RPC error unrelated to execution.
    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// The node could not be reached or answered with garbage.
    #[error("transport error: {0}")]
    Transport(String),

    /// Not a 20-byte hex address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

impl CallError {
    /// True when the error proves the contract lacks the probed interface.
    #[must_use]
    pub fn is_interface_mismatch(&self) -> bool {
        matches!(
            self,
            CallError::Reverted(_) | CallError::EmptyReturn | CallError::Decode(_)
        )
    }
}
