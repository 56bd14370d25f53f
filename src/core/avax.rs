//! Avalanche primary network types used by atomic (cross-chain) transactions.
//!
//! Covers identifier rendering, bech32 chain addresses and the binary codec
//! atomic transactions are carried in within block extra data.
pub mod atomic;
pub mod bech32;
pub mod codec;
pub mod ids;
