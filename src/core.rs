pub mod avax;
pub mod client;
pub mod evm;
pub mod trace;
pub mod types;
