//! Account and amount records.
use alloy_primitives::Address;
use alloy_primitives::I256;
use alloy_primitives::U256;
use serde_json::Value;

use crate::constants::currencies;
use crate::constants::metadata;
use crate::constants::X2C_RATE;
use crate::core::client::ContractInfo;
use crate::core::types::AccountIdentifier;
use crate::core::types::Amount;
use crate::core::types::Currency;
use crate::core::types::Metadata;
use crate::error::MapperError;

/// Account identified by the checksummed `address`.
pub fn account(address: &Address) -> AccountIdentifier {
    AccountIdentifier {
        address: address.to_checksum(None),
    }
}

/// Decimal string of a magnitude and sign. Zero is never negative.
pub fn signed_value(magnitude: U256, negative: bool) -> String {
    if negative && !magnitude.is_zero() {
        format!("-{magnitude}")
    } else {
        magnitude.to_string()
    }
}

pub fn avax_currency() -> Currency {
    Currency::new(currencies::AVAX_SYMBOL, currencies::AVAX_DECIMALS)
}

/// AVAX as denominated on the other primary network chains.
pub fn atomic_avax_currency() -> Currency {
    Currency::new(currencies::AVAX_SYMBOL, currencies::ATOMIC_AVAX_DECIMALS)
}

pub fn avax_amount(magnitude: U256, negative: bool) -> Amount {
    Amount {
        value: signed_value(magnitude, negative),
        currency: avax_currency(),
    }
}

/// AVAX amount, or nothing for zero values.
pub fn nonzero_avax_amount(magnitude: U256, negative: bool) -> Option<Amount> {
    match magnitude.is_zero() {
        true => None,
        false => Some(avax_amount(magnitude, negative)),
    }
}

pub fn atomic_avax_amount(value: i128) -> Amount {
    Amount {
        value: value.to_string(),
        currency: atomic_avax_currency(),
    }
}

/// Converts an atomic (9 decimals) amount to wei.
pub fn atomic_to_wei(amount: u64) -> U256 {
    U256::from(amount) * U256::from(X2C_RATE)
}

pub fn to_signed(value: U256) -> Result<I256, MapperError> {
    I256::try_from(value).map_err(|_| MapperError::AmountOverflow(value.to_string()))
}

/// Currency of a token contract.
pub fn token_currency(info: &ContractInfo, contract: &Address) -> Currency {
    let mut meta = Metadata::new();
    meta.insert(
        metadata::CONTRACT_ADDRESS.to_owned(),
        Value::String(contract.to_checksum(None)),
    );
    Currency {
        symbol: info.symbol.clone(),
        decimals: info.decimals,
        metadata: Some(meta),
    }
}

/// Value of an ERC20 transfer, held in big-endian log data.
///
/// Only the trailing 32-byte word is read, longer data is cropped.
pub fn erc20_value(data: &[u8]) -> U256 {
    let start = data.len().saturating_sub(32);
    U256::from_be_slice(&data[start..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_signed_value() {
        assert_eq!(signed_value(U256::from(525000), true), "-525000");
        assert_eq!(signed_value(U256::from(525000), false), "525000");
        assert_eq!(signed_value(U256::ZERO, true), "0");
    }

    #[test]
    fn test_nonzero_amount() {
        assert_eq!(nonzero_avax_amount(U256::ZERO, false), None);
        let amount = nonzero_avax_amount(U256::from(7), true).unwrap();
        assert_eq!(amount.value, "-7");
        assert_eq!(amount.currency, Currency::new("AVAX", 18));
    }

    #[test]
    fn test_atomic_to_wei() {
        assert_eq!(
            atomic_to_wei(1_500).to_string(),
            String::from("1500000000000")
        );
        assert_eq!(atomic_avax_amount(-3).value, "-3");
        assert_eq!(atomic_avax_amount(-3).currency.decimals, 9);
    }

    #[test]
    fn test_to_signed() {
        assert_eq!(to_signed(U256::from(5)).unwrap(), I256::from_raw(U256::from(5)));
        assert!(matches!(
            to_signed(U256::MAX),
            Err(MapperError::AmountOverflow(_))
        ));
    }

    #[test]
    fn test_erc20_value() {
        let mut data = [0u8; 32];
        data[31] = 0x64;
        assert_eq!(erc20_value(&data), U256::from(100));
        assert_eq!(erc20_value(&[]), U256::ZERO);
        assert_eq!(erc20_value(&[0x01, 0x00]), U256::from(256));
        // Words ahead of the last one are dropped
        let mut long = vec![0x11u8; 32];
        long.extend_from_slice(&data);
        assert_eq!(erc20_value(&long), U256::from(100));
        assert_eq!(erc20_value(&[0xffu8; 33]), U256::MAX);
    }

    #[test]
    fn test_token_currency() {
        let contract = Address::repeat_byte(0xab);
        let currency = token_currency(&ContractInfo::new("USDC", 6), &contract);
        assert_eq!(currency.symbol, "USDC");
        assert_eq!(currency.decimals, 6);
        assert_eq!(
            currency.metadata.unwrap()[metadata::CONTRACT_ADDRESS],
            Value::String(contract.to_checksum(None))
        );
    }

    #[test]
    fn test_account_is_checksummed() {
        let address: Address = "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed"
            .parse()
            .unwrap();
        assert_eq!(
            account(&address).address,
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"
        );
    }
}
