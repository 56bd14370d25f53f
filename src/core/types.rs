//! Rosetta data model produced by the mapper.
use serde::Deserialize;
use serde::Serialize;

pub type Metadata = serde_json::Map<String, serde_json::Value>;
pub type OperationIndex = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationIdentifier {
    pub index: OperationIndex,
}

impl OperationIdentifier {
    pub fn new(index: OperationIndex) -> Self {
        Self { index }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationType {
    Fee,
    Call,
    #[serde(rename = "CALLCODE")]
    CallCode,
    #[serde(rename = "DELEGATECALL")]
    DelegateCall,
    #[serde(rename = "STATICCALL")]
    StaticCall,
    Create,
    Create2,
    #[serde(rename = "SELFDESTRUCT")]
    SelfDestruct,
    Destruct,
    Import,
    Export,
    #[serde(rename = "ERC20_TRANSFER")]
    Erc20Transfer,
    #[serde(rename = "ERC20_MINT")]
    Erc20Mint,
    #[serde(rename = "ERC20_BURN")]
    Erc20Burn,
    #[serde(rename = "ERC721_SENDER")]
    Erc721Sender,
    #[serde(rename = "ERC721_RECEIVE")]
    Erc721Receive,
    #[serde(rename = "ERC721_MINT")]
    Erc721Mint,
    #[serde(rename = "ERC721_BURN")]
    Erc721Burn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationStatus {
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountIdentifier {
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Currency {
    pub symbol: String,
    pub decimals: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl Currency {
    pub fn new(symbol: &str, decimals: i32) -> Self {
        Self {
            symbol: symbol.to_owned(),
            decimals,
            metadata: None,
        }
    }
}

/// A signed amount, `value` being a base 10 integer string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Amount {
    pub value: String,
    pub currency: Currency,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinIdentifier {
    pub identifier: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoinAction {
    CoinCreated,
    CoinSpent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinChange {
    pub coin_identifier: CoinIdentifier,
    pub coin_action: CoinAction,
}

impl CoinChange {
    pub fn created(identifier: String) -> Self {
        Self {
            coin_identifier: CoinIdentifier { identifier },
            coin_action: CoinAction::CoinCreated,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub operation_identifier: OperationIdentifier,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_operations: Vec<OperationIdentifier>,
    #[serde(rename = "type")]
    pub op_type: OperationType,
    pub status: OperationStatus,
    pub account: AccountIdentifier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Amount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coin_change: Option<CoinChange>,
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
}

impl Operation {
    /// A successful operation without amount, links nor metadata.
    pub fn new(
        index: OperationIndex,
        op_type: OperationType,
        account: AccountIdentifier,
    ) -> Self {
        Self {
            operation_identifier: OperationIdentifier::new(index),
            related_operations: vec![],
            op_type,
            status: OperationStatus::Success,
            account,
            amount: None,
            coin_change: None,
            metadata: Metadata::new(),
        }
    }

    pub fn index(&self) -> OperationIndex {
        self.operation_identifier.index
    }

    pub fn related_to(mut self, index: OperationIndex) -> Self {
        self.related_operations.push(OperationIdentifier::new(index));
        self
    }

    pub fn status(mut self, status: OperationStatus) -> Self {
        self.status = status;
        self
    }

    pub fn amount(mut self, amount: Option<Amount>) -> Self {
        self.amount = amount;
        self
    }

    pub fn coin_change(mut self, coin_change: CoinChange) -> Self {
        self.coin_change = Some(coin_change);
        self
    }

    pub fn metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionIdentifier {
    pub hash: String,
}

impl TransactionIdentifier {
    pub fn new(hash: &str) -> Self {
        Self {
            hash: hash.to_owned(),
        }
    }
}

/// A mapped transaction, ordinary or atomic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub transaction_identifier: TransactionIdentifier,
    pub operations: Vec<Operation>,
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
}
