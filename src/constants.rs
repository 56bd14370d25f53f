use alloy_primitives::b256;
use alloy_primitives::B256;

/// Topic of `Transfer(address,address,uint256)`, shared by ERC20 and ERC721.
pub const TRANSFER_TOPIC: B256 =
    b256!("ddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef");

/// Signature, from and to.
pub const TOPICS_IN_ERC20_TRANSFER: usize = 3;

/// Signature, from, to and token id.
pub const TOPICS_IN_ERC721_TRANSFER: usize = 4;

/// nAVAX (atomic, 9 decimals) to wei (18 decimals).
pub const X2C_RATE: u64 = 1_000_000_000;

pub mod currencies {
    pub const AVAX_SYMBOL: &str = "AVAX";
    pub const AVAX_DECIMALS: i32 = 18;
    pub const ATOMIC_AVAX_DECIMALS: i32 = 9;
}

pub mod networks {
    pub const MAINNET: &str = "Mainnet";
    pub const FUJI: &str = "Fuji";

    pub const MAINNET_HRP: &str = "avax";
    pub const FUJI_HRP: &str = "fuji";
}

/// Keys used in operation, currency and transaction metadata.
pub mod metadata {
    pub const ERROR: &str = "error";
    pub const CONTRACT_ADDRESS: &str = "contractAddress";
    pub const INDEX_TRANSFERRED: &str = "indexTransferred";

    pub const TX: &str = "tx";
    pub const TX_IDS: &str = "tx_ids";
    pub const BLOCKCHAIN_ID: &str = "blockchain_id";
    pub const NETWORK_ID: &str = "network_id";
    pub const SOURCE_CHAIN: &str = "source_chain";
    pub const DESTINATION_CHAIN: &str = "destination_chain";
    pub const META: &str = "meta";
    pub const ASSET_ID: &str = "asset_id";

    pub const TX_FEE: &str = "tx_fee";
    pub const EXPORTED_OUTPUTS: &str = "exported_outputs";

    pub const GAS: &str = "gas";
    pub const GAS_USED: &str = "gas_used";
    pub const GAS_PRICE: &str = "gas_price";
    pub const RECEIPT: &str = "receipt";
    pub const TRACE: &str = "trace";
    pub const TYPE: &str = "type";
}
