//! Atomic transactions moving AVAX between the C-chain and other chains.
use alloy_primitives::Address;

use super::codec;
use super::ids::Id;
use super::ids::ShortId;
use super::ids::UtxoId;

/// UTXO consumed by an import, secp256k1 transfer input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferableInput {
    pub utxo_id: UtxoId,
    pub asset_id: Id,
    pub amount: u64,
    pub sig_indices: Vec<u32>,
}

/// UTXO produced by an export, secp256k1 transfer output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferableOutput {
    pub asset_id: Id,
    pub amount: u64,
    pub locktime: u64,
    pub threshold: u32,
    pub addrs: Vec<ShortId>,
}

/// C-chain balance credited by an import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvmOutput {
    pub address: Address,
    pub amount: u64,
    pub asset_id: Id,
}

/// C-chain balance debited by an export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvmInput {
    pub address: Address,
    pub amount: u64,
    pub asset_id: Id,
    pub nonce: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedImportTx {
    pub network_id: u32,
    pub blockchain_id: Id,
    pub source_chain: Id,
    pub imported_inputs: Vec<TransferableInput>,
    pub outs: Vec<EvmOutput>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedExportTx {
    pub network_id: u32,
    pub blockchain_id: Id,
    pub destination_chain: Id,
    pub ins: Vec<EvmInput>,
    pub exported_outputs: Vec<TransferableOutput>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnsignedAtomicTx {
    Import(UnsignedImportTx),
    Export(UnsignedExportTx),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub signatures: Vec<[u8; 65]>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtomicTx {
    pub unsigned: UnsignedAtomicTx,
    pub credentials: Vec<Credential>,
}

impl AtomicTx {
    pub fn new(unsigned: UnsignedAtomicTx) -> Self {
        Self {
            unsigned,
            credentials: vec![],
        }
    }

    /// Canonical id, hash of the signed transaction bytes.
    pub fn id(&self) -> Id {
        Id::of(&codec::encode_tx(self))
    }

    /// Serialized unsigned transaction, the payload credentials sign.
    pub fn unsigned_bytes(&self) -> Vec<u8> {
        codec::encode_unsigned_tx(&self.unsigned)
    }
}

#[cfg(feature = "test-utilities")]
pub mod testing {
    use super::*;

    impl UnsignedImportTx {
        pub fn dummy() -> Self {
            Self {
                network_id: 1,
                blockchain_id: Id([0xcc; 32]),
                source_chain: Id([0x58; 32]),
                imported_inputs: vec![],
                outs: vec![],
            }
        }

        pub fn add_input(mut self, tx_id: Id, output_index: u32, asset_id: Id, amount: u64) -> Self {
            self.imported_inputs.push(TransferableInput {
                utxo_id: UtxoId::new(tx_id, output_index),
                asset_id,
                amount,
                sig_indices: vec![0],
            });
            self
        }

        pub fn add_output(mut self, address: Address, asset_id: Id, amount: u64) -> Self {
            self.outs.push(EvmOutput {
                address,
                amount,
                asset_id,
            });
            self
        }
    }

    impl UnsignedExportTx {
        pub fn dummy() -> Self {
            Self {
                network_id: 1,
                blockchain_id: Id([0xcc; 32]),
                destination_chain: Id([0x58; 32]),
                ins: vec![],
                exported_outputs: vec![],
            }
        }

        pub fn destination_chain(mut self, chain_id: Id) -> Self {
            self.destination_chain = chain_id;
            self
        }

        pub fn add_input(mut self, address: Address, asset_id: Id, amount: u64) -> Self {
            let nonce = self.ins.len() as u64;
            self.ins.push(EvmInput {
                address,
                amount,
                asset_id,
                nonce,
            });
            self
        }

        pub fn add_output(mut self, asset_id: Id, amount: u64, addrs: Vec<ShortId>) -> Self {
            self.exported_outputs.push(TransferableOutput {
                asset_id,
                amount,
                locktime: 0,
                threshold: 1,
                addrs,
            });
            self
        }
    }

    impl AtomicTx {
        pub fn signed(mut self) -> Self {
            self.credentials.push(Credential {
                signatures: vec![[0x5a; 65]],
            });
            self
        }
    }
}
