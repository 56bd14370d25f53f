use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::constants::networks;
use crate::core::avax::ids::Id;
use crate::error::MapperError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkIdentifier {
    pub blockchain: String,
    pub network: String,
}

impl NetworkIdentifier {
    pub fn new(blockchain: &str, network: &str) -> Self {
        Self {
            blockchain: blockchain.to_owned(),
            network: network.to_owned(),
        }
    }

    /// Human readable address prefix of the network.
    pub fn hrp(&self) -> Result<&'static str, MapperError> {
        match self.network.as_str() {
            networks::MAINNET => Ok(networks::MAINNET_HRP),
            networks::FUJI => Ok(networks::FUJI_HRP),
            other => Err(MapperError::UnsupportedNetwork(other.to_owned())),
        }
    }
}

/// Alias of a primary network chain, as used in bech32 chain addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChainAlias {
    X,
    P,
    C,
}

impl fmt::Display for ChainAlias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::X => "X",
            Self::P => "P",
            Self::C => "C",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MapperConfig {
    pub network: NetworkIdentifier,
    /// Process token transfers of any contract, not just allow-listed ones.
    #[serde(default)]
    pub analytics_mode: bool,
    /// Token contracts processed in standard mode (case insensitive).
    #[serde(default)]
    pub standard_mode_allow_list: Vec<String>,
    /// Keep transfers of tokens the metadata source could not identify.
    #[serde(default)]
    pub include_unknown_tokens: bool,
    /// Block timestamp from which atomic transactions are batched in extra data.
    pub ap5_activation: u64,
    pub avax_asset_id: Id,
    #[serde(default)]
    pub chain_aliases: HashMap<Id, ChainAlias>,
}

impl MapperConfig {
    pub fn new(network: NetworkIdentifier, avax_asset_id: Id, ap5_activation: u64) -> Self {
        Self {
            network,
            analytics_mode: false,
            standard_mode_allow_list: vec![],
            include_unknown_tokens: false,
            ap5_activation,
            avax_asset_id,
            chain_aliases: HashMap::new(),
        }
    }

    pub fn analytics_mode(mut self, enabled: bool) -> Self {
        self.analytics_mode = enabled;
        self
    }

    pub fn allow(mut self, contract: &str) -> Self {
        self.standard_mode_allow_list.push(contract.to_owned());
        self
    }

    pub fn include_unknown_tokens(mut self, include: bool) -> Self {
        self.include_unknown_tokens = include;
        self
    }

    pub fn alias(mut self, chain_id: Id, alias: ChainAlias) -> Self {
        self.chain_aliases.insert(chain_id, alias);
        self
    }
}
