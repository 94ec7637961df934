use thiserror::Error;

/// Failures raised while turning a [`TransactionInput`](crate::TransactionInput)
/// into call data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("invalid ABI: {0}")]
    AbiParse(String),

    #[error("function `{0}` not found in ABI")]
    FunctionNotFound(String),

    #[error("missing value for parameter `{name}` of `{function}`")]
    MissingArgument { function: String, name: String },

    #[error("encoding failed: {0}")]
    Encoding(String),

    #[error("collectible transfers need the Safe address as sender")]
    MissingSafeAddress,

    #[error("unsupported transaction type: {0}")]
    UnsupportedTransactionType(String),
}

impl EncodeError {
    pub(crate) fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }
}

/// Failures raised while unpacking a `multiSend` payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("not a multiSend call: {0}")]
    InvalidCall(String),

    #[error("truncated record at offset {offset}: need {needed} bytes, {available} left")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("unknown operation code {code} at offset {offset}")]
    UnknownOperation { code: u8, offset: usize },

    #[error("data length at offset {offset} does not fit in memory")]
    LengthOverflow { offset: usize },
}
