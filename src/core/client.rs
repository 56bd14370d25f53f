//! Contract metadata lookups.
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::Mutex;

use alloy_primitives::Address;
use lru::LruCache;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

/// Symbol reported for contracts not exposing ERC20 metadata.
pub const UNKNOWN_ERC20_SYMBOL: &str = "ERC20_UNKNOWN";
pub const UNKNOWN_ERC20_DECIMALS: i32 = 0;
/// Symbol reported for contracts not exposing ERC721 metadata.
pub const UNKNOWN_ERC721_SYMBOL: &str = "ERC721_UNKNOWN";
pub const UNKNOWN_ERC721_DECIMALS: i32 = 0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    #[error("Node is unreachable ({0})")]
    NodeUnreachable(String),
    #[error("Contract call failed for {address}: {reason}")]
    CallFailed { address: Address, reason: String },
    #[error("Request timed out")]
    Timeout,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractInfo {
    pub symbol: String,
    pub decimals: i32,
}

impl ContractInfo {
    pub fn new(symbol: &str, decimals: i32) -> Self {
        Self {
            symbol: symbol.to_owned(),
            decimals,
        }
    }

    pub fn unknown(is_erc20: bool) -> Self {
        match is_erc20 {
            true => Self::new(UNKNOWN_ERC20_SYMBOL, UNKNOWN_ERC20_DECIMALS),
            false => Self::new(UNKNOWN_ERC721_SYMBOL, UNKNOWN_ERC721_DECIMALS),
        }
    }

    /// True for the placeholder returned when metadata could not be resolved.
    pub fn is_unknown(&self) -> bool {
        self.symbol == UNKNOWN_ERC20_SYMBOL || self.symbol == UNKNOWN_ERC721_SYMBOL
    }
}

/// Source of token contract metadata.
///
/// Implementations may block. Errors are propagated as is by the mapper.
pub trait ContractInfoSource {
    fn contract_info(&self, address: Address, is_erc20: bool) -> Result<ContractInfo, ClientError>;
}

impl<T: ContractInfoSource + ?Sized> ContractInfoSource for &T {
    fn contract_info(&self, address: Address, is_erc20: bool) -> Result<ContractInfo, ClientError> {
        (**self).contract_info(address, is_erc20)
    }
}

impl<T: ContractInfoSource + ?Sized> ContractInfoSource for Arc<T> {
    fn contract_info(&self, address: Address, is_erc20: bool) -> Result<ContractInfo, ClientError> {
        (**self).contract_info(address, is_erc20)
    }
}

/// Serves metadata from a fixed map, unknown contracts get the placeholder.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StaticContractInfo {
    contracts: HashMap<Address, ContractInfo>,
}

impl StaticContractInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(mut self, address: Address, symbol: &str, decimals: i32) -> Self {
        self.contracts
            .insert(address, ContractInfo::new(symbol, decimals));
        self
    }
}

impl ContractInfoSource for StaticContractInfo {
    fn contract_info(&self, address: Address, is_erc20: bool) -> Result<ContractInfo, ClientError> {
        Ok(self
            .contracts
            .get(&address)
            .cloned()
            .unwrap_or_else(|| ContractInfo::unknown(is_erc20)))
    }
}

/// Caches successful lookups of a wrapped source.
#[derive(Debug)]
pub struct CachedContractInfo<C> {
    inner: C,
    lru: Mutex<LruCache<(Address, bool), ContractInfo>>,
}

impl<C: ContractInfoSource> CachedContractInfo<C> {
    pub fn new(inner: C, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner,
            lru: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Drops all cached entries.
    pub fn clear(&self) {
        self.cache().clear();
    }

    fn cache(&self) -> std::sync::MutexGuard<'_, LruCache<(Address, bool), ContractInfo>> {
        // Entries are plain values, a poisoned lock leaves them consistent.
        self.lru.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl<C: ContractInfoSource> ContractInfoSource for CachedContractInfo<C> {
    fn contract_info(&self, address: Address, is_erc20: bool) -> Result<ContractInfo, ClientError> {
        let key = (address, is_erc20);
        if let Some(info) = self.cache().get(&key) {
            return Ok(info.clone());
        }
        // Lock is not held during the lookup
        let info = self.inner.contract_info(address, is_erc20)?;
        tracing::debug!("caching contract info for {address}");
        self.cache().put(key, info.clone());
        Ok(info)
    }
}
