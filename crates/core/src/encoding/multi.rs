use alloy::primitives::{Address, Bytes, U256, address};
use alloy::sol_types::SolCall;
use log::debug;

use crate::bindings::multisend::MultiSend;
use crate::types::meta_transaction::{MetaTransaction, Operation};

/// MultiSend v1.1.1 deployment, used when no address is configured.
pub const DEFAULT_MULTI_SEND_ADDRESS: Address =
    address!("0x8D29bE29923b68abfDD21e541b9374737B49cdAD");

/// Fixed part of a packed record: operation, to, value, data length.
pub const PACKED_HEADER_LEN: usize = 1 + 20 + 32 + 32;

/// Packs one transaction the way `multiSend` reads it:
/// - `operation` as `uint8` (1 byte)
/// - `to` as `address` (20 bytes)
/// - `value` as `uint256` (32 bytes)
/// - length of `data` as `uint256` (32 bytes)
/// - `data` as is
pub fn encode_packed(tx: &MetaTransaction) -> Vec<u8> {
    let mut encoded = Vec::with_capacity(PACKED_HEADER_LEN + tx.data.len());
    write_packed(&mut encoded, tx);
    encoded
}

fn write_packed(buf: &mut Vec<u8>, tx: &MetaTransaction) {
    buf.push(tx.operation.code());
    buf.extend_from_slice(tx.to.as_slice());
    buf.extend_from_slice(&tx.value.to_be_bytes::<32>());
    let data_len = U256::from(tx.data.len());
    buf.extend_from_slice(&data_len.to_be_bytes::<32>());
    buf.extend_from_slice(&tx.data);
}

/// Concatenates the packed records in order.
pub fn encode_packed_batch(txs: &[MetaTransaction]) -> Bytes {
    let total: usize = txs.iter().map(|tx| PACKED_HEADER_LEN + tx.data.len()).sum();
    let mut encoded = Vec::with_capacity(total);
    for tx in txs {
        write_packed(&mut encoded, tx);
    }
    Bytes::from(encoded)
}

/// Wraps a batch into a single `multiSend(bytes)` delegate call.
///
/// Records keep their input order, which is the on-chain execution order.
/// An empty batch still encodes, as `multiSend(0x)`; rejecting it is up to
/// the caller.
pub fn encode_multi(txs: &[MetaTransaction], multisend: Option<Address>) -> MetaTransaction {
    let packed = encode_packed_batch(txs);
    debug!("Packed {} transaction(s) into {} bytes", txs.len(), packed.len());

    let data = MultiSend::multiSendCall::new((packed,)).abi_encode();

    MetaTransaction {
        operation: Operation::DelegateCall,
        to: multisend.unwrap_or(DEFAULT_MULTI_SEND_ADDRESS),
        value: U256::ZERO,
        data: Bytes::from(data),
    }
}
