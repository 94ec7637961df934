use alloy::primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::EncodeError;
use crate::utils::parse::{parse_address, parse_hex_bytes, parse_uint};

/// How the Safe executes a call: a plain `CALL` or a `DELEGATECALL`.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Operation {
    #[default]
    Call = 0,
    DelegateCall = 1,
}

impl Operation {
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Operation {
    type Error = u8;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Operation::Call),
            1 => Ok(Operation::DelegateCall),
            other => Err(other),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Call => write!(f, "call"),
            Operation::DelegateCall => write!(f, "delegatecall"),
        }
    }
}

/// A single call as the Safe executes it.
///
/// Serialized with `value` as a decimal string and `data` as `0x` hex, the
/// same shape the Safe transaction service uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawMetaTransaction", into = "RawMetaTransaction")]
pub struct MetaTransaction {
    pub operation: Operation,
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
}

impl MetaTransaction {
    pub fn call(to: Address, value: U256, data: Bytes) -> Self {
        Self {
            operation: Operation::Call,
            to,
            value,
            data,
        }
    }

    /// `0x`-prefixed hex of `data`.
    pub fn data_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.data))
    }
}

#[derive(Serialize, Deserialize)]
struct RawMetaTransaction {
    #[serde(default)]
    operation: u8,
    to: String,
    value: String,
    data: String,
}

impl TryFrom<RawMetaTransaction> for MetaTransaction {
    type Error = EncodeError;

    fn try_from(raw: RawMetaTransaction) -> Result<Self, Self::Error> {
        let operation = Operation::try_from(raw.operation)
            .map_err(|code| EncodeError::encoding(format!("unknown operation code {code}")))?;

        Ok(Self {
            operation,
            to: parse_address(&raw.to)?,
            value: parse_uint(&raw.value)?,
            data: parse_hex_bytes(&raw.data)?,
        })
    }
}

impl From<MetaTransaction> for RawMetaTransaction {
    fn from(tx: MetaTransaction) -> Self {
        Self {
            operation: tx.operation.code(),
            to: tx.to.to_checksum(None),
            value: tx.value.to_string(),
            data: tx.data_hex(),
        }
    }
}
