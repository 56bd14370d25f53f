//! Linear codec of atomic transactions.
//!
//! Integers are big-endian, slices are prefixed with a `u32` length and
//! interface values with a `u32` type id. Every serialized document starts
//! with the `u16` codec version.
use alloy_primitives::Address;
use thiserror::Error;

use super::atomic::AtomicTx;
use super::atomic::Credential;
use super::atomic::EvmInput;
use super::atomic::EvmOutput;
use super::atomic::TransferableInput;
use super::atomic::TransferableOutput;
use super::atomic::UnsignedAtomicTx;
use super::atomic::UnsignedExportTx;
use super::atomic::UnsignedImportTx;
use super::ids::Id;
use super::ids::ShortId;
use super::ids::UtxoId;

pub const CODEC_VERSION: u16 = 0;

/// Registered type ids, ids 2 to 4 are skipped registrations.
pub mod type_ids {
    pub const IMPORT_TX: u32 = 0;
    pub const EXPORT_TX: u32 = 1;
    pub const SECP256K1_TRANSFER_INPUT: u32 = 5;
    pub const SECP256K1_MINT_OUTPUT: u32 = 6;
    pub const SECP256K1_TRANSFER_OUTPUT: u32 = 7;
    pub const SECP256K1_CREDENTIAL: u32 = 9;
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Unexpected end of input: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEof { needed: usize, remaining: usize },
    #[error("Unsupported codec version {0}")]
    UnsupportedVersion(u16),
    #[error("Unsupported atomic transaction type id {0}")]
    UnsupportedTxType(u32),
    #[error("Unexpected type id {got}, expected {expected}")]
    UnexpectedTypeId { expected: u32, got: u32 },
    #[error("Slice length {0} exceeds input size")]
    LengthTooLarge(u32),
    #[error("{0} trailing bytes after decoding")]
    TrailingBytes(usize),
}

pub struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], CodecError> {
        if n > self.remaining() {
            return Err(CodecError::UnexpectedEof {
                needed: n,
                remaining: self.remaining(),
            });
        }
        let slice = &self.bytes[self.offset..self.offset + n];
        self.offset += n;
        Ok(slice)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        let mut array = [0u8; N];
        array.copy_from_slice(self.take(N)?);
        Ok(array)
    }

    pub fn u16(&mut self) -> Result<u16, CodecError> {
        Ok(u16::from_be_bytes(self.array()?))
    }

    pub fn u32(&mut self) -> Result<u32, CodecError> {
        Ok(u32::from_be_bytes(self.array()?))
    }

    pub fn u64(&mut self) -> Result<u64, CodecError> {
        Ok(u64::from_be_bytes(self.array()?))
    }

    /// Reads a slice length, rejecting lengths the remaining input cannot hold.
    fn slice_len(&mut self, min_item_size: usize) -> Result<usize, CodecError> {
        let len = self.u32()?;
        if (len as usize).saturating_mul(min_item_size) > self.remaining() {
            return Err(CodecError::LengthTooLarge(len));
        }
        Ok(len as usize)
    }

    fn vec<T: Codec>(&mut self) -> Result<Vec<T>, CodecError> {
        let len = self.slice_len(T::MIN_SIZE)?;
        (0..len).map(|_| T::decode(self)).collect()
    }

    fn type_id(&mut self, expected: u32) -> Result<(), CodecError> {
        let got = self.u32()?;
        if got != expected {
            return Err(CodecError::UnexpectedTypeId { expected, got });
        }
        Ok(())
    }

    fn version(&mut self) -> Result<(), CodecError> {
        let version = self.u16()?;
        if version != CODEC_VERSION {
            return Err(CodecError::UnsupportedVersion(version));
        }
        Ok(())
    }

    fn finish(&self) -> Result<(), CodecError> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(CodecError::TrailingBytes(n)),
        }
    }
}

#[derive(Default)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn u16(&mut self, v: u16) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    pub fn u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    pub fn u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    pub fn bytes(&mut self, v: &[u8]) {
        self.buf.extend_from_slice(v);
    }

    fn vec<T: Codec>(&mut self, items: &[T]) {
        self.u32(items.len() as u32);
        for item in items {
            item.encode(self);
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// Binary representation of a codec type.
pub trait Codec: Sized {
    /// Smallest encoded size, used to bound slice lengths.
    const MIN_SIZE: usize;

    fn encode(&self, w: &mut Writer);

    fn decode(r: &mut Reader) -> Result<Self, CodecError>;
}

impl Codec for u32 {
    const MIN_SIZE: usize = 4;

    fn encode(&self, w: &mut Writer) {
        w.u32(*self);
    }

    fn decode(r: &mut Reader) -> Result<Self, CodecError> {
        r.u32()
    }
}

impl Codec for Id {
    const MIN_SIZE: usize = 32;

    fn encode(&self, w: &mut Writer) {
        w.bytes(self.as_bytes());
    }

    fn decode(r: &mut Reader) -> Result<Self, CodecError> {
        Ok(Id(r.array()?))
    }
}

impl Codec for ShortId {
    const MIN_SIZE: usize = 20;

    fn encode(&self, w: &mut Writer) {
        w.bytes(self.as_bytes());
    }

    fn decode(r: &mut Reader) -> Result<Self, CodecError> {
        Ok(ShortId(r.array()?))
    }
}

impl Codec for Address {
    const MIN_SIZE: usize = 20;

    fn encode(&self, w: &mut Writer) {
        w.bytes(self.as_slice());
    }

    fn decode(r: &mut Reader) -> Result<Self, CodecError> {
        Ok(Address::from(r.array::<20>()?))
    }
}

impl Codec for [u8; 65] {
    const MIN_SIZE: usize = 65;

    fn encode(&self, w: &mut Writer) {
        w.bytes(self);
    }

    fn decode(r: &mut Reader) -> Result<Self, CodecError> {
        r.array()
    }
}

impl Codec for TransferableInput {
    // utxo id + asset id + type id + amount + sig indices length
    const MIN_SIZE: usize = 36 + 32 + 4 + 8 + 4;

    fn encode(&self, w: &mut Writer) {
        self.utxo_id.tx_id.encode(w);
        w.u32(self.utxo_id.output_index);
        self.asset_id.encode(w);
        w.u32(type_ids::SECP256K1_TRANSFER_INPUT);
        w.u64(self.amount);
        w.vec(&self.sig_indices);
    }

    fn decode(r: &mut Reader) -> Result<Self, CodecError> {
        let tx_id = Id::decode(r)?;
        let output_index = r.u32()?;
        let asset_id = Id::decode(r)?;
        r.type_id(type_ids::SECP256K1_TRANSFER_INPUT)?;
        Ok(Self {
            utxo_id: UtxoId::new(tx_id, output_index),
            asset_id,
            amount: r.u64()?,
            sig_indices: r.vec()?,
        })
    }
}

impl Codec for TransferableOutput {
    // asset id + type id + amount + locktime + threshold + addrs length
    const MIN_SIZE: usize = 32 + 4 + 8 + 8 + 4 + 4;

    fn encode(&self, w: &mut Writer) {
        self.asset_id.encode(w);
        w.u32(type_ids::SECP256K1_TRANSFER_OUTPUT);
        w.u64(self.amount);
        w.u64(self.locktime);
        w.u32(self.threshold);
        w.vec(&self.addrs);
    }

    fn decode(r: &mut Reader) -> Result<Self, CodecError> {
        let asset_id = Id::decode(r)?;
        r.type_id(type_ids::SECP256K1_TRANSFER_OUTPUT)?;
        Ok(Self {
            asset_id,
            amount: r.u64()?,
            locktime: r.u64()?,
            threshold: r.u32()?,
            addrs: r.vec()?,
        })
    }
}

impl Codec for EvmOutput {
    const MIN_SIZE: usize = 20 + 8 + 32;

    fn encode(&self, w: &mut Writer) {
        self.address.encode(w);
        w.u64(self.amount);
        self.asset_id.encode(w);
    }

    fn decode(r: &mut Reader) -> Result<Self, CodecError> {
        Ok(Self {
            address: Address::decode(r)?,
            amount: r.u64()?,
            asset_id: Id::decode(r)?,
        })
    }
}

impl Codec for EvmInput {
    const MIN_SIZE: usize = 20 + 8 + 32 + 8;

    fn encode(&self, w: &mut Writer) {
        self.address.encode(w);
        w.u64(self.amount);
        self.asset_id.encode(w);
        w.u64(self.nonce);
    }

    fn decode(r: &mut Reader) -> Result<Self, CodecError> {
        Ok(Self {
            address: Address::decode(r)?,
            amount: r.u64()?,
            asset_id: Id::decode(r)?,
            nonce: r.u64()?,
        })
    }
}

impl Codec for Credential {
    const MIN_SIZE: usize = 4 + 4;

    fn encode(&self, w: &mut Writer) {
        w.u32(type_ids::SECP256K1_CREDENTIAL);
        w.vec(&self.signatures);
    }

    fn decode(r: &mut Reader) -> Result<Self, CodecError> {
        r.type_id(type_ids::SECP256K1_CREDENTIAL)?;
        Ok(Self {
            signatures: r.vec()?,
        })
    }
}

impl Codec for UnsignedAtomicTx {
    // type id + network id + two chain ids + two slice lengths
    const MIN_SIZE: usize = 4 + 4 + 32 + 32 + 4 + 4;

    fn encode(&self, w: &mut Writer) {
        match self {
            Self::Import(tx) => {
                w.u32(type_ids::IMPORT_TX);
                w.u32(tx.network_id);
                tx.blockchain_id.encode(w);
                tx.source_chain.encode(w);
                w.vec(&tx.imported_inputs);
                w.vec(&tx.outs);
            }
            Self::Export(tx) => {
                w.u32(type_ids::EXPORT_TX);
                w.u32(tx.network_id);
                tx.blockchain_id.encode(w);
                tx.destination_chain.encode(w);
                w.vec(&tx.ins);
                w.vec(&tx.exported_outputs);
            }
        }
    }

    fn decode(r: &mut Reader) -> Result<Self, CodecError> {
        match r.u32()? {
            type_ids::IMPORT_TX => Ok(Self::Import(UnsignedImportTx {
                network_id: r.u32()?,
                blockchain_id: Id::decode(r)?,
                source_chain: Id::decode(r)?,
                imported_inputs: r.vec()?,
                outs: r.vec()?,
            })),
            type_ids::EXPORT_TX => Ok(Self::Export(UnsignedExportTx {
                network_id: r.u32()?,
                blockchain_id: Id::decode(r)?,
                destination_chain: Id::decode(r)?,
                ins: r.vec()?,
                exported_outputs: r.vec()?,
            })),
            other => Err(CodecError::UnsupportedTxType(other)),
        }
    }
}

impl Codec for AtomicTx {
    const MIN_SIZE: usize = UnsignedAtomicTx::MIN_SIZE + 4;

    fn encode(&self, w: &mut Writer) {
        self.unsigned.encode(w);
        w.vec(&self.credentials);
    }

    fn decode(r: &mut Reader) -> Result<Self, CodecError> {
        Ok(Self {
            unsigned: UnsignedAtomicTx::decode(r)?,
            credentials: r.vec()?,
        })
    }
}

fn versioned<F: FnOnce(&mut Writer)>(f: F) -> Vec<u8> {
    let mut w = Writer::new();
    w.u16(CODEC_VERSION);
    f(&mut w);
    w.into_bytes()
}

/// Signed transaction bytes.
pub fn encode_tx(tx: &AtomicTx) -> Vec<u8> {
    versioned(|w| tx.encode(w))
}

pub fn encode_unsigned_tx(tx: &UnsignedAtomicTx) -> Vec<u8> {
    versioned(|w| tx.encode(w))
}

/// Batch of signed transactions, as carried in extra data once AP5 is active.
pub fn encode_batch(txs: &[AtomicTx]) -> Vec<u8> {
    versioned(|w| w.vec(txs))
}

pub fn decode_tx(bytes: &[u8]) -> Result<AtomicTx, CodecError> {
    let mut r = Reader::new(bytes);
    r.version()?;
    let tx = AtomicTx::decode(&mut r)?;
    r.finish()?;
    Ok(tx)
}

pub fn decode_batch(bytes: &[u8]) -> Result<Vec<AtomicTx>, CodecError> {
    let mut r = Reader::new(bytes);
    r.version()?;
    let txs = r.vec()?;
    r.finish()?;
    Ok(txs)
}

/// Decodes the atomic transactions of a block's extra data.
///
/// Before AP5 extra data holds a single transaction, afterwards a batch.
pub fn extract_atomic_txs(bytes: &[u8], batch: bool) -> Result<Vec<AtomicTx>, CodecError> {
    if bytes.is_empty() {
        return Ok(vec![]);
    }
    match batch {
        true => decode_batch(bytes),
        false => Ok(vec![decode_tx(bytes)?]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn avax() -> Id {
        Id([0x21; 32])
    }

    fn import_tx() -> AtomicTx {
        AtomicTx::new(UnsignedAtomicTx::Import(
            UnsignedImportTx::dummy()
                .add_input(Id([1; 32]), 0, avax(), 1_000)
                .add_input(Id([2; 32]), 3, avax(), 500)
                .add_output(Address::repeat_byte(0xaa), avax(), 1_400),
        ))
        .signed()
    }

    fn export_tx() -> AtomicTx {
        AtomicTx::new(UnsignedAtomicTx::Export(
            UnsignedExportTx::dummy()
                .add_input(Address::repeat_byte(0xaa), avax(), 2_000)
                .add_output(avax(), 1_900, vec![ShortId([9; 20])]),
        ))
        .signed()
    }

    #[test]
    fn test_import_layout() {
        let bytes = encode_unsigned_tx(&import_tx().unsigned);
        // version, type id, network id
        assert_eq!(&bytes[..10], &[0, 0, 0, 0, 0, 0, 0, 0, 0, 1]);
        // blockchain id follows
        assert_eq!(&bytes[10..42], &[0xcc; 32]);
        // version + type + network + 2 ids + inputs + outputs
        let inputs = 4 + 2 * (36 + 32 + 4 + 8 + 4 + 4);
        let outputs = 4 + (20 + 8 + 32);
        assert_eq!(bytes.len(), 2 + 4 + 4 + 64 + inputs + outputs);
    }

    #[test]
    fn test_decode_signed_txs() {
        for tx in [import_tx(), export_tx()] {
            let bytes = encode_tx(&tx);
            let decoded = decode_tx(&bytes).unwrap();
            assert_eq!(decoded, tx);
            assert_eq!(decoded.id(), Id::of(&bytes));
        }
    }

    #[test]
    fn test_extract_single_and_batch() {
        let single = encode_tx(&import_tx());
        assert_eq!(extract_atomic_txs(&single, false).unwrap(), vec![import_tx()]);
        // Single tx bytes are not a valid batch
        assert!(extract_atomic_txs(&single, true).is_err());

        let batch = encode_batch(&[import_tx(), export_tx()]);
        let txs = extract_atomic_txs(&batch, true).unwrap();
        assert_eq!(txs, vec![import_tx(), export_tx()]);
        assert_eq!(txs[1].id(), export_tx().id());

        assert_eq!(extract_atomic_txs(&[], true).unwrap(), vec![]);
    }

    #[test]
    fn test_unsupported_tx_type() {
        let mut bytes = encode_tx(&import_tx());
        // Overwrite type id
        bytes[2..6].copy_from_slice(&3u32.to_be_bytes());
        assert_eq!(decode_tx(&bytes), Err(CodecError::UnsupportedTxType(3)));
    }

    #[test]
    fn test_rejects_malformed_input() {
        let mut bytes = encode_tx(&export_tx());
        bytes.push(0);
        assert_eq!(decode_tx(&bytes), Err(CodecError::TrailingBytes(1)));

        let bytes = encode_tx(&export_tx());
        assert!(matches!(
            decode_tx(&bytes[..bytes.len() - 1]),
            Err(CodecError::UnexpectedEof { .. })
        ));

        let mut bytes = encode_tx(&export_tx());
        bytes[0] = 1;
        assert_eq!(decode_tx(&bytes), Err(CodecError::UnsupportedVersion(256)));
    }

    #[test]
    fn test_rejects_oversized_lengths() {
        let mut w = Writer::new();
        w.u16(CODEC_VERSION);
        w.u32(u32::MAX);
        assert_eq!(
            decode_batch(&w.into_bytes()),
            Err(CodecError::LengthTooLarge(u32::MAX))
        );
    }

    #[test]
    fn test_rejects_mint_outputs() {
        let mut bytes = encode_tx(&export_tx());
        // version + type + network + 2 ids + 1 input + outputs length + asset id
        let offset = 2 + 4 + 4 + 64 + 4 + (20 + 8 + 32 + 8) + 4 + 32;
        bytes[offset..offset + 4].copy_from_slice(&type_ids::SECP256K1_MINT_OUTPUT.to_be_bytes());
        assert_eq!(
            decode_tx(&bytes),
            Err(CodecError::UnexpectedTypeId {
                expected: type_ids::SECP256K1_TRANSFER_OUTPUT,
                got: type_ids::SECP256K1_MINT_OUTPUT
            })
        );
    }
}
