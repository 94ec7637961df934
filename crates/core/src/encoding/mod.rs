pub mod abi;
pub mod decode;
pub mod multi;
pub mod single;
