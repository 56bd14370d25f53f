//! Value movements of internal calls.
//!
//! Calls are folded in execution order into debit/credit operation pairs.
//! Accounts destroyed during the transaction are tracked in a ledger: any
//! value they receive after destruction is burnt, which shows up as a
//! trailing `DESTRUCT` operation per account.
use std::collections::HashMap;

use alloy_primitives::Address;
use alloy_primitives::I256;
use alloy_primitives::U256;
use itertools::Itertools;
use serde_json::Value;

use super::amounts::account;
use super::amounts::avax_amount;
use super::amounts::nonzero_avax_amount;
use super::amounts::to_signed;
use super::index::OperationCounter;
use crate::constants::metadata;
use crate::core::trace::CallType;
use crate::core::trace::FlatCall;
use crate::core::types::Metadata;
use crate::core::types::Operation;
use crate::core::types::OperationStatus;
use crate::core::types::OperationType;
use crate::error::MapperError;

/// Balances of accounts self-destructed within a transaction.
#[derive(Debug, Default)]
pub struct DestroyedAccounts {
    balances: HashMap<Address, I256>,
}

impl DestroyedAccounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.balances.contains_key(address)
    }

    pub fn balance(&self, address: &Address) -> Option<I256> {
        self.balances.get(address).copied()
    }

    /// Marks `address` as destroyed, resetting its balance.
    pub fn destroy(&mut self, address: Address) {
        self.balances.insert(address, I256::ZERO);
    }

    /// Account got recreated and is no longer destroyed.
    pub fn resurrect(&mut self, address: &Address) {
        self.balances.remove(address);
    }

    /// Subtracts `value` from a destroyed account. No-op for live accounts.
    pub fn debit(&mut self, address: &Address, value: I256) -> Result<(), MapperError> {
        if let Some(balance) = self.balances.get_mut(address) {
            let current = *balance;
            *balance = current
                .checked_sub(value)
                .ok_or_else(|| MapperError::AmountOverflow(format!("{current} - {value}")))?;
        }
        Ok(())
    }

    /// Adds `value` to a destroyed account. No-op for live accounts.
    pub fn credit(&mut self, address: &Address, value: I256) -> Result<(), MapperError> {
        if let Some(balance) = self.balances.get_mut(address) {
            let current = *balance;
            *balance = current
                .checked_add(value)
                .ok_or_else(|| MapperError::AmountOverflow(format!("{current} + {value}")))?;
        }
        Ok(())
    }

    /// Non-zero balances left to burn, in ascending address order.
    pub fn liquidations(self) -> Result<Vec<(Address, U256)>, MapperError> {
        self.balances
            .into_iter()
            .sorted_by_key(|(address, _)| *address)
            .filter(|(_, balance)| !balance.is_zero())
            .map(|(address, balance)| match balance.is_negative() {
                true => Err(MapperError::NegativeDestroyedBalance { address, balance }),
                false => Ok((address, balance.into_raw())),
            })
            .collect()
    }
}

/// Generates operations for a flattened call trace.
///
/// Operations are indexed from `counter` onwards, liquidation of destroyed
/// accounts coming last.
pub fn trace_operations(
    calls: &[FlatCall],
    counter: &mut OperationCounter,
) -> Result<Vec<Operation>, MapperError> {
    let mut ops = vec![];
    let mut destroyed = DestroyedAccounts::new();
    for call in calls {
        let (status, meta) = match &call.error {
            Some(reason) => {
                let mut meta = Metadata::new();
                meta.insert(metadata::ERROR.to_owned(), Value::String(reason.clone()));
                (OperationStatus::Failure, meta)
            }
            None => (OperationStatus::Success, Metadata::new()),
        };
        let op_type = OperationType::from(call.call_type);
        let moves_value = !call.is_reverted() && !call.value.is_zero();
        let value = to_signed(call.value)?;

        // Zero-value calls do not move anything
        let emits = !(call.value.is_zero() && call.call_type.is_call());

        let mut debit_index = None;
        if emits {
            let debit = Operation::new(counter.claim(), op_type, account(&call.from))
                .status(status)
                .amount(nonzero_avax_amount(call.value, true))
                .metadata(meta.clone());
            debit_index = Some(debit.index());
            ops.push(debit);
        }
        if moves_value {
            destroyed.debit(&call.from, value)?;
        }

        if call.call_type == CallType::SelfDestruct {
            destroyed.destroy(call.from);
            if call.to == Some(call.from) {
                continue;
            }
        }

        let Some(to) = call.to else {
            continue;
        };

        if call.call_type.is_create() {
            destroyed.resurrect(&to);
        }

        if let Some(debit_index) = debit_index {
            let credit = Operation::new(counter.claim(), op_type, account(&to))
                .related_to(debit_index)
                .status(status)
                .amount(nonzero_avax_amount(call.value, false))
                .metadata(meta);
            ops.push(credit);
        }
        if moves_value {
            destroyed.credit(&to, value)?;
        }
    }

    for (address, balance) in destroyed.liquidations()? {
        tracing::debug!("liquidating {balance} wei of destroyed account {address}");
        ops.push(
            Operation::new(counter.claim(), OperationType::Destruct, account(&address))
                .amount(Some(avax_amount(balance, true))),
        );
    }
    Ok(ops)
}
