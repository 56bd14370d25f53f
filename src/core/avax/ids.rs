use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use sha2::Digest;
use sha2::Sha256;
use thiserror::Error;

const CHECKSUM_LEN: usize = 4;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    #[error("Invalid base58 string: {0}")]
    Base58(String),
    #[error("Checksum mismatch")]
    Checksum,
    #[error("Expected {expected} bytes, got {got}")]
    Length { expected: usize, got: usize },
}

pub fn sha256(bytes: &[u8]) -> [u8; 32] {
    Sha256::digest(bytes).into()
}

/// Base58 of `bytes` followed by the last 4 bytes of their sha256.
pub fn cb58_encode(bytes: &[u8]) -> String {
    let hash = sha256(bytes);
    let mut checked = Vec::with_capacity(bytes.len() + CHECKSUM_LEN);
    checked.extend_from_slice(bytes);
    checked.extend_from_slice(&hash[32 - CHECKSUM_LEN..]);
    bs58::encode(checked).into_string()
}

pub fn cb58_decode(s: &str) -> Result<Vec<u8>, IdError> {
    let raw = bs58::decode(s)
        .into_vec()
        .map_err(|e| IdError::Base58(e.to_string()))?;
    if raw.len() < CHECKSUM_LEN {
        return Err(IdError::Checksum);
    }
    let (bytes, checksum) = raw.split_at(raw.len() - CHECKSUM_LEN);
    if sha256(bytes)[32 - CHECKSUM_LEN..] != *checksum {
        return Err(IdError::Checksum);
    }
    Ok(bytes.to_vec())
}

/// 32 byte identifier (transactions, chains, assets).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Id(pub [u8; 32]);

impl Id {
    pub const EMPTY: Id = Id([0u8; 32]);

    /// Id of some serialized content.
    pub fn of(bytes: &[u8]) -> Self {
        Self(sha256(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

/// 20 byte identifier (addresses).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ShortId(pub [u8; 20]);

impl ShortId {
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

macro_rules! cb58_id {
    ($t:ident, $len:expr) => {
        impl fmt::Display for $t {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&cb58_encode(&self.0))
            }
        }

        impl fmt::Debug for $t {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($t), self)
            }
        }

        impl FromStr for $t {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let bytes = cb58_decode(s)?;
                let array: [u8; $len] =
                    bytes.as_slice().try_into().map_err(|_| IdError::Length {
                        expected: $len,
                        got: bytes.len(),
                    })?;
                Ok(Self(array))
            }
        }

        impl Serialize for $t {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $t {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

cb58_id!(Id, 32);
cb58_id!(ShortId, 20);

/// Reference to a transaction output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UtxoId {
    pub tx_id: Id,
    pub output_index: u32,
}

impl UtxoId {
    pub fn new(tx_id: Id, output_index: u32) -> Self {
        Self {
            tx_id,
            output_index,
        }
    }
}

impl fmt::Display for UtxoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.tx_id, self.output_index)
    }
}

#[cfg(feature = "test-utilities")]
pub mod testutils {
    use super::Id;
    use super::ShortId;

    pub fn random_id() -> Id {
        Id(rand::random())
    }

    pub fn random_short_id() -> ShortId {
        ShortId(rand::random())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_id() {
        assert_eq!(Id::EMPTY.to_string(), "11111111111111111111111111111111LpoYY");
        assert_eq!(
            "11111111111111111111111111111111LpoYY".parse::<Id>().unwrap(),
            Id::EMPTY
        );
    }

    #[test]
    fn test_parse_rejects_bad_checksum() {
        let mut s = Id([7u8; 32]).to_string();
        let last = s.pop().unwrap();
        s.push(if last == 'a' { 'b' } else { 'a' });
        assert!(s.parse::<Id>().is_err());
    }

    #[test]
    fn test_parse_rejects_wrong_length() {
        let short = ShortId([3u8; 20]).to_string();
        assert_eq!(
            short.parse::<Id>(),
            Err(IdError::Length {
                expected: 32,
                got: 20
            })
        );
        assert_eq!(short.parse::<ShortId>().unwrap(), ShortId([3u8; 20]));
    }

    #[test]
    fn test_utxo_id() {
        let utxo = UtxoId::new(Id::EMPTY, 3);
        assert_eq!(utxo.to_string(), "11111111111111111111111111111111LpoYY:3");
    }
}
