pub mod erc20;
pub mod erc721;
pub mod multisend;
