// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

//! Journaled asset custody.
//!
//! The ledger is the only mutable state routes touch: token balances,
//! per-asset supply and per-contract storage slots. While a checkpoint is
//! open every write records the previous value so a call can be rolled
//! back as a unit. Writes outside any checkpoint are final and unjournaled.

use crate::domain::constants::NATIVE_ASSET;
use crate::domain::error::ConvertError;
use alloy::primitives::{Address, U256};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq, Eq)]
enum JournalEntry {
    Balance {
        asset: Address,
        holder: Address,
        prev: Option<U256>,
    },
    Supply {
        asset: Address,
        prev: Option<U256>,
    },
    Slot {
        contract: Address,
        slot: u64,
        prev: Option<U256>,
    },
}

/// Opaque journal position returned by [`Ledger::checkpoint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct Checkpoint(usize);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    balances: HashMap<(Address, Address), U256>,
    supply: HashMap<Address, U256>,
    slots: HashMap<(Address, u64), U256>,
    native_rejecters: HashSet<Address>,
    journal: Vec<JournalEntry>,
    open: usize,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance_of(&self, asset: Address, holder: Address) -> U256 {
        self.balances
            .get(&(asset, holder))
            .copied()
            .unwrap_or(U256::ZERO)
    }

    pub fn total_supply(&self, asset: Address) -> U256 {
        self.supply.get(&asset).copied().unwrap_or(U256::ZERO)
    }

    pub fn sload(&self, contract: Address, slot: u64) -> U256 {
        self.slots
            .get(&(contract, slot))
            .copied()
            .unwrap_or(U256::ZERO)
    }

    pub fn sstore(&mut self, contract: Address, slot: u64, value: U256) {
        let prev = self.slots.insert((contract, slot), value);
        self.record(JournalEntry::Slot {
            contract,
            slot,
            prev,
        });
    }

    /// Marks `holder` as a contract that refuses plain native transfers.
    pub fn reject_native(&mut self, holder: Address) {
        self.native_rejecters.insert(holder);
    }

    pub fn transfer(
        &mut self,
        asset: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), ConvertError> {
        if asset == NATIVE_ASSET && self.native_rejecters.contains(&to) {
            return Err(ConvertError::FundTransferFailed { asset, to });
        }
        if amount.is_zero() || from == to {
            return self.ensure_balance(asset, from, amount);
        }
        let available = self.balance_of(asset, from);
        let remaining = available
            .checked_sub(amount)
            .ok_or(ConvertError::InsufficientBalance {
                asset,
                holder: from,
                required: amount,
                available,
            })?;
        let credited = self
            .balance_of(asset, to)
            .checked_add(amount)
            .ok_or(ConvertError::ArithmeticOverflow("ledger transfer"))?;
        self.set_balance(asset, from, remaining);
        self.set_balance(asset, to, credited);
        Ok(())
    }

    /// Moves the holder's entire balance of `asset`; returns the amount.
    pub fn sweep(&mut self, asset: Address, from: Address, to: Address) -> Result<U256, ConvertError> {
        let amount = self.balance_of(asset, from);
        if !amount.is_zero() {
            self.transfer(asset, from, to, amount)?;
        }
        Ok(amount)
    }

    pub fn mint(&mut self, asset: Address, to: Address, amount: U256) -> Result<(), ConvertError> {
        let supply = self
            .total_supply(asset)
            .checked_add(amount)
            .ok_or(ConvertError::ArithmeticOverflow("ledger mint"))?;
        let credited = self
            .balance_of(asset, to)
            .checked_add(amount)
            .ok_or(ConvertError::ArithmeticOverflow("ledger mint"))?;
        self.set_supply(asset, supply);
        self.set_balance(asset, to, credited);
        Ok(())
    }

    pub fn burn(&mut self, asset: Address, from: Address, amount: U256) -> Result<(), ConvertError> {
        let available = self.balance_of(asset, from);
        let remaining = available
            .checked_sub(amount)
            .ok_or(ConvertError::InsufficientBalance {
                asset,
                holder: from,
                required: amount,
                available,
            })?;
        let supply = self.total_supply(asset).saturating_sub(amount);
        self.set_balance(asset, from, remaining);
        self.set_supply(asset, supply);
        Ok(())
    }

    pub fn checkpoint(&mut self) -> Checkpoint {
        self.open += 1;
        Checkpoint(self.journal.len())
    }

    /// Undoes every write made since `checkpoint` and closes it.
    pub fn revert_to(&mut self, checkpoint: Checkpoint) {
        while self.journal.len() > checkpoint.0 {
            let Some(entry) = self.journal.pop() else {
                break;
            };
            match entry {
                JournalEntry::Balance {
                    asset,
                    holder,
                    prev,
                } => restore(&mut self.balances, (asset, holder), prev),
                JournalEntry::Supply { asset, prev } => restore(&mut self.supply, asset, prev),
                JournalEntry::Slot {
                    contract,
                    slot,
                    prev,
                } => restore(&mut self.slots, (contract, slot), prev),
            }
        }
        self.close();
    }

    /// Keeps the writes made since `checkpoint` and closes it. An enclosing
    /// checkpoint can still undo them.
    pub fn commit(&mut self, _checkpoint: Checkpoint) {
        self.close();
    }

    /// Number of undo records currently held.
    pub fn journal_len(&self) -> usize {
        self.journal.len()
    }

    /// Runs `f` as one unit: on error every write it made is undone.
    pub fn atomic<T>(
        &mut self,
        f: impl FnOnce(&mut Ledger) -> Result<T, ConvertError>,
    ) -> Result<T, ConvertError> {
        let checkpoint = self.checkpoint();
        match f(self) {
            Ok(value) => {
                self.commit(checkpoint);
                Ok(value)
            }
            Err(err) => {
                self.revert_to(checkpoint);
                Err(err)
            }
        }
    }

    fn ensure_balance(&self, asset: Address, holder: Address, amount: U256) -> Result<(), ConvertError> {
        let available = self.balance_of(asset, holder);
        if available < amount {
            return Err(ConvertError::InsufficientBalance {
                asset,
                holder,
                required: amount,
                available,
            });
        }
        Ok(())
    }

    fn set_balance(&mut self, asset: Address, holder: Address, value: U256) {
        let prev = self.balances.insert((asset, holder), value);
        self.record(JournalEntry::Balance {
            asset,
            holder,
            prev,
        });
    }

    fn set_supply(&mut self, asset: Address, value: U256) {
        let prev = self.supply.insert(asset, value);
        self.record(JournalEntry::Supply { asset, prev });
    }

    fn record(&mut self, entry: JournalEntry) {
        if self.open > 0 {
            self.journal.push(entry);
        }
    }

    /// Once the outermost checkpoint closes nothing can roll back, so the
    /// journal is dropped.
    fn close(&mut self) {
        self.open = self.open.saturating_sub(1);
        if self.open == 0 {
            self.journal.clear();
        }
    }
}

fn restore<K: std::hash::Hash + Eq, V>(map: &mut HashMap<K, V>, key: K, prev: Option<V>) {
    match prev {
        Some(value) => {
            map.insert(key, value);
        }
        None => {
            map.remove(&key);
        }
    }
}
