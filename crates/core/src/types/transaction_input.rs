use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::EncodeError;

/// A user supplied ABI argument before it is coerced to its Solidity type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValueType {
    String(String),
    Bool(bool),
    Array(Vec<ValueType>),
    Map(BTreeMap<String, ValueType>),
}

impl ValueType {
    pub fn kind(&self) -> &'static str {
        match self {
            ValueType::String(_) => "string",
            ValueType::Bool(_) => "bool",
            ValueType::Array(_) => "array",
            ValueType::Map(_) => "map",
        }
    }
}

impl From<&str> for ValueType {
    fn from(s: &str) -> Self {
        ValueType::String(s.to_string())
    }
}

impl From<String> for ValueType {
    fn from(s: String) -> Self {
        ValueType::String(s)
    }
}

impl From<bool> for ValueType {
    fn from(b: bool) -> Self {
        ValueType::Bool(b)
    }
}

impl<T: Into<ValueType>> From<Vec<T>> for ValueType {
    fn from(items: Vec<T>) -> Self {
        ValueType::Array(items.into_iter().map(Into::into).collect())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TransactionType {
    TransferFunds,
    TransferCollectible,
    CallContract,
    Raw,
}

impl TransactionType {
    pub const ALL: [TransactionType; 4] = [
        TransactionType::TransferFunds,
        TransactionType::TransferCollectible,
        TransactionType::CallContract,
        TransactionType::Raw,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::TransferFunds => "transferFunds",
            TransactionType::TransferCollectible => "transferCollectible",
            TransactionType::CallContract => "callContract",
            TransactionType::Raw => "raw",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = EncodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TransactionType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| EncodeError::UnsupportedTransactionType(s.to_string()))
    }
}

/// One row of a batch as edited by the user.
///
/// `id` only correlates the row across edits and reordering; it is never
/// part of the encoded call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum TransactionInput {
    TransferFunds {
        id: String,
        /// ERC-20 contract, `None` for the native coin.
        token: Option<String>,
        to: String,
        /// Base units, decimal.
        amount: String,
    },
    TransferCollectible {
        id: String,
        /// ERC-721 contract.
        address: String,
        token_id: String,
        to: String,
    },
    CallContract {
        id: String,
        to: String,
        value: String,
        abi: String,
        function_signature: String,
        #[serde(default)]
        input_values: BTreeMap<String, ValueType>,
    },
    Raw {
        id: String,
        to: String,
        value: String,
        #[serde(default)]
        data: String,
    },
}

impl TransactionInput {
    pub fn id(&self) -> &str {
        match self {
            TransactionInput::TransferFunds { id, .. }
            | TransactionInput::TransferCollectible { id, .. }
            | TransactionInput::CallContract { id, .. }
            | TransactionInput::Raw { id, .. } => id,
        }
    }

    pub fn kind(&self) -> TransactionType {
        match self {
            TransactionInput::TransferFunds { .. } => TransactionType::TransferFunds,
            TransactionInput::TransferCollectible { .. } => TransactionType::TransferCollectible,
            TransactionInput::CallContract { .. } => TransactionType::CallContract,
            TransactionInput::Raw { .. } => TransactionType::Raw,
        }
    }
}

/// Builds an empty row of the given kind, ready to be filled in.
pub fn create_transaction(kind: TransactionType, id: impl Into<String>) -> TransactionInput {
    let id = id.into();
    match kind {
        TransactionType::TransferFunds => TransactionInput::TransferFunds {
            id,
            token: None,
            to: String::new(),
            amount: String::new(),
        },
        TransactionType::TransferCollectible => TransactionInput::TransferCollectible {
            id,
            address: String::new(),
            token_id: String::new(),
            to: String::new(),
        },
        TransactionType::CallContract => TransactionInput::CallContract {
            id,
            to: String::new(),
            value: String::new(),
            abi: String::new(),
            function_signature: String::new(),
            input_values: BTreeMap::new(),
        },
        TransactionType::Raw => TransactionInput::Raw {
            id,
            to: String::new(),
            value: String::new(),
            data: String::new(),
        },
    }
}

pub fn new_transaction_id() -> String {
    Uuid::new_v4().to_string()
}
