pub mod config_wrapper;
pub mod meta_transaction;
pub mod transaction_input;
