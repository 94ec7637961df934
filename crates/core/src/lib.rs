//! Encodes a batch of Safe transactions into a single `multiSend` call.
//!
//! Rows of a batch are described by [`TransactionInput`]. Each row is turned
//! into a [`MetaTransaction`] with [`encode_single`], and the resulting list
//! is packed into one delegate call with [`encode_multi`].

pub mod bindings;
pub mod encoding;
pub mod errors;
pub mod types;
pub mod utils;

pub use encoding::abi::{
    check_callable, encode_call, encode_function_call, find_function, parse_abi,
    writable_functions,
};
pub use encoding::decode::{decode_multi, decode_packed};
pub use encoding::multi::{
    DEFAULT_MULTI_SEND_ADDRESS, encode_multi, encode_packed, encode_packed_batch,
};
pub use encoding::single::{encode_all, encode_single};
pub use errors::{DecodeError, EncodeError};
pub use types::config_wrapper::ConfigWrapper;
pub use types::meta_transaction::{MetaTransaction, Operation};
pub use types::transaction_input::{
    TransactionInput, TransactionType, ValueType, create_transaction, new_transaction_id,
};

pub use alloy::json_abi::{Function, JsonAbi, StateMutability};
pub use alloy::primitives::{Address, Bytes, U256};
