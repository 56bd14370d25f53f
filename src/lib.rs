//! Maps C-chain transaction artifacts to Rosetta operations.
//!
//! Ordinary transactions go through [`Mapper::map_transaction`], atomic
//! (cross-chain) transactions carried in a block's extra data through
//! [`Mapper::map_cross_chain_transactions`].
pub mod config;
pub mod constants;
pub mod core;
pub mod error;
pub mod mapping;

pub use config::MapperConfig;
pub use error::MapperError;
pub use mapping::Mapper;
