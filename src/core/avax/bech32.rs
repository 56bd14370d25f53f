//! BIP-173 bech32 encoding of chain addresses (`X-avax1...`).
use thiserror::Error;

const CHARSET: &[u8] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";
const GENERATOR: [u32; 5] = [0x3b6a57b2, 0x26508e6d, 0x1ea119fa, 0x3d4233dd, 0x2a1462b3];
const MAX_LEN: usize = 90;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Bech32Error {
    #[error("Invalid human readable part: {0:?}")]
    InvalidHrp(String),
    #[error("Bit conversion error")]
    Conversion,
    #[error("Address too long ({0} characters)")]
    TooLong(usize),
}

fn polymod(values: &[u8]) -> u32 {
    let mut chk: u32 = 1;
    for &v in values {
        let top = chk >> 25;
        chk = ((chk & 0x1ffffff) << 5) ^ (v as u32);
        for (i, gen) in GENERATOR.iter().enumerate() {
            if (top >> i) & 1 == 1 {
                chk ^= gen;
            }
        }
    }
    chk
}

fn hrp_expand(hrp: &str) -> Vec<u8> {
    let mut ret = Vec::with_capacity(hrp.len() * 2 + 1);
    ret.extend(hrp.bytes().map(|c| c >> 5));
    ret.push(0);
    ret.extend(hrp.bytes().map(|c| c & 31));
    ret
}

fn create_checksum(hrp: &str, data: &[u8]) -> [u8; 6] {
    let mut values = hrp_expand(hrp);
    values.extend_from_slice(data);
    values.extend_from_slice(&[0u8; 6]);
    let polymod = polymod(&values) ^ 1;
    let mut ret = [0u8; 6];
    for (i, r) in ret.iter_mut().enumerate() {
        *r = ((polymod >> (5 * (5 - i))) & 31) as u8;
    }
    ret
}

/// Regroups bits, e.g. 8-bit bytes into 5-bit words.
fn convert_bits(data: &[u8], from_bits: u32, to_bits: u32, pad: bool) -> Result<Vec<u8>, Bech32Error> {
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    let mut ret = Vec::with_capacity(data.len() * from_bits as usize / to_bits as usize + 1);
    let maxv = (1u32 << to_bits) - 1;
    for &value in data {
        let value = value as u32;
        if value >> from_bits != 0 {
            return Err(Bech32Error::Conversion);
        }
        acc = (acc << from_bits) | value;
        bits += from_bits;
        while bits >= to_bits {
            bits -= to_bits;
            ret.push(((acc >> bits) & maxv) as u8);
        }
    }
    if pad {
        if bits > 0 {
            ret.push(((acc << (to_bits - bits)) & maxv) as u8);
        }
    } else if bits >= from_bits || ((acc << (to_bits - bits)) & maxv) != 0 {
        return Err(Bech32Error::Conversion);
    }
    Ok(ret)
}

/// Encodes 5-bit `words` under `hrp`.
fn encode_words(hrp: &str, words: &[u8]) -> Result<String, Bech32Error> {
    if hrp.is_empty() || !hrp.bytes().all(|c| (33..=126).contains(&c)) {
        return Err(Bech32Error::InvalidHrp(hrp.to_owned()));
    }
    let hrp = hrp.to_lowercase();
    let len = hrp.len() + 1 + words.len() + 6;
    if len > MAX_LEN {
        return Err(Bech32Error::TooLong(len));
    }
    let checksum = create_checksum(&hrp, words);
    let mut result = String::with_capacity(len);
    result.push_str(&hrp);
    result.push('1');
    for &d in words.iter().chain(checksum.iter()) {
        result.push(CHARSET[d as usize] as char);
    }
    Ok(result)
}

/// Bech32 encoding of raw `bytes`.
pub fn encode(hrp: &str, bytes: &[u8]) -> Result<String, Bech32Error> {
    let words = convert_bits(bytes, 8, 5, true)?;
    encode_words(hrp, &words)
}

/// Chain address such as `X-avax1...`.
pub fn format_address(chain_alias: &str, hrp: &str, bytes: &[u8]) -> Result<String, Bech32Error> {
    Ok(format!("{}-{}", chain_alias, encode(hrp, bytes)?))
}
