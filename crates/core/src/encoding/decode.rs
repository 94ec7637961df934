use alloy::primitives::{Address, Bytes, U256};
use alloy::sol_types::SolCall;

use crate::bindings::multisend::MultiSend;
use crate::encoding::multi::PACKED_HEADER_LEN;
use crate::errors::DecodeError;
use crate::types::meta_transaction::{MetaTransaction, Operation};

/// Decodes `multiSend(bytes)` call data back into its transactions.
pub fn decode_multi(call_data: &[u8]) -> Result<Vec<MetaTransaction>, DecodeError> {
    let call = MultiSend::multiSendCall::abi_decode(call_data, true)
        .map_err(|e| DecodeError::InvalidCall(e.to_string()))?;
    decode_packed(&call.transactions)
}

/// Splits a packed batch into its records.
pub fn decode_packed(packed: &[u8]) -> Result<Vec<MetaTransaction>, DecodeError> {
    let mut txs = Vec::new();
    let mut offset = 0;

    while offset < packed.len() {
        let rest = &packed[offset..];
        if rest.len() < PACKED_HEADER_LEN {
            return Err(DecodeError::Truncated {
                offset,
                needed: PACKED_HEADER_LEN,
                available: rest.len(),
            });
        }

        let operation = Operation::try_from(rest[0])
            .map_err(|code| DecodeError::UnknownOperation { code, offset })?;
        let to = Address::from_slice(&rest[1..21]);
        let value = U256::from_be_slice(&rest[21..53]);
        let data_len: usize = U256::from_be_slice(&rest[53..85])
            .try_into()
            .map_err(|_| DecodeError::LengthOverflow { offset })?;

        let body = &rest[PACKED_HEADER_LEN..];
        if body.len() < data_len {
            return Err(DecodeError::Truncated {
                offset: offset + PACKED_HEADER_LEN,
                needed: data_len,
                available: body.len(),
            });
        }

        txs.push(MetaTransaction {
            operation,
            to,
            value,
            data: Bytes::copy_from_slice(&body[..data_len]),
        });
        offset += PACKED_HEADER_LEN + data_len;
    }

    Ok(txs)
}
