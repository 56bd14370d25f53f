use alloy_primitives::Address;
use alloy_primitives::U256;

use super::amounts::account;
use super::amounts::avax_amount;
use super::index::OperationCounter;
use crate::core::types::Operation;
use crate::core::types::OperationType;
use crate::error::MapperError;

/// Sender pays `gas_used * gas_price` to the block's coinbase.
pub(super) fn fee_operations(
    sender: &Address,
    coinbase: &Address,
    gas_used: u64,
    gas_price: U256,
    counter: &mut OperationCounter,
) -> Result<Vec<Operation>, MapperError> {
    let fee = gas_price
        .checked_mul(U256::from(gas_used))
        .ok_or_else(|| MapperError::AmountOverflow(format!("{gas_used} gas at {gas_price}")))?;
    let debit = Operation::new(counter.claim(), OperationType::Fee, account(sender))
        .amount(Some(avax_amount(fee, true)));
    let credit = Operation::new(counter.claim(), OperationType::Fee, account(coinbase))
        .related_to(debit.index())
        .amount(Some(avax_amount(fee, false)));
    Ok(vec![debit, credit])
}
