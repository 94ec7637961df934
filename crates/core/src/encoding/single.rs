use alloy::primitives::{Address, Bytes, U256};
use alloy::sol_types::SolCall;
use log::debug;

use crate::bindings::erc20::ERC20;
use crate::bindings::erc721::ERC721;
use crate::encoding::abi::{check_callable, encode_call, find_function, parse_abi};
use crate::errors::EncodeError;
use crate::types::meta_transaction::MetaTransaction;
use crate::types::transaction_input::TransactionInput;
use crate::utils::parse::{parse_address, parse_hex_bytes, parse_uint, parse_value};

/// Encodes one batch row into the call the Safe will make.
///
/// `safe_address` is the sender of collectible transfers; the other kinds do
/// not need it. The result is always a plain call.
pub fn encode_single(
    tx: &TransactionInput,
    safe_address: Option<Address>,
) -> Result<MetaTransaction, EncodeError> {
    debug!("Encoding {} transaction {}", tx.kind(), tx.id());

    match tx {
        TransactionInput::TransferFunds {
            token: None,
            to,
            amount,
            ..
        } => Ok(MetaTransaction::call(
            parse_address(to)?,
            parse_uint(amount)?,
            Bytes::new(),
        )),

        TransactionInput::TransferFunds {
            token: Some(token),
            to,
            amount,
            ..
        } => {
            let data =
                ERC20::transferCall::new((parse_address(to)?, parse_uint(amount)?)).abi_encode();
            Ok(MetaTransaction::call(
                parse_address(token)?,
                U256::ZERO,
                Bytes::from(data),
            ))
        }

        TransactionInput::TransferCollectible {
            address,
            token_id,
            to,
            ..
        } => {
            let from = safe_address.ok_or(EncodeError::MissingSafeAddress)?;
            let data =
                ERC721::safeTransferFromCall::new((from, parse_address(to)?, parse_uint(token_id)?))
                    .abi_encode();
            Ok(MetaTransaction::call(
                parse_address(address)?,
                U256::ZERO,
                Bytes::from(data),
            ))
        }

        TransactionInput::CallContract {
            to,
            value,
            abi,
            function_signature,
            input_values,
            ..
        } => {
            let to = parse_address(to)?;
            let value = parse_value(value)?;
            let abi = parse_abi(abi)?;
            let function = find_function(&abi, function_signature)?;
            check_callable(function, value)?;
            let data = encode_call(function, input_values)?;
            Ok(MetaTransaction::call(to, value, data))
        }

        TransactionInput::Raw { to, value, data, .. } => Ok(MetaTransaction::call(
            parse_address(to)?,
            parse_value(value)?,
            parse_hex_bytes(data)?,
        )),
    }
}

/// Encodes every row, stopping at the first failure.
pub fn encode_all(
    txs: &[TransactionInput],
    safe_address: Option<Address>,
) -> Result<Vec<MetaTransaction>, EncodeError> {
    txs.iter().map(|tx| encode_single(tx, safe_address)).collect()
}
