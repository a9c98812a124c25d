// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::domain::constants::NATIVE_ASSET;
use crate::domain::error::ConvertError;
use crate::infrastructure::ledger::Ledger;
use alloy::primitives::{Address, U256};

/// WETH9-style wrapper: both legs credit the caller, never a third party.
pub trait WrappedNative: Send + Sync {
    fn address(&self) -> Address;
    fn deposit(&self, ledger: &mut Ledger, sender: Address, amount: U256) -> Result<(), ConvertError>;
    fn withdraw(&self, ledger: &mut Ledger, sender: Address, amount: U256) -> Result<(), ConvertError>;
}

#[derive(Debug, Clone)]
pub struct SimWrappedNative {
    address: Address,
}

impl SimWrappedNative {
    pub fn new(address: Address) -> Self {
        Self { address }
    }
}

impl WrappedNative for SimWrappedNative {
    fn address(&self) -> Address {
        self.address
    }

    fn deposit(&self, ledger: &mut Ledger, sender: Address, amount: U256) -> Result<(), ConvertError> {
        ledger.transfer(NATIVE_ASSET, sender, self.address, amount)?;
        ledger.mint(self.address, sender, amount)
    }

    fn withdraw(&self, ledger: &mut Ledger, sender: Address, amount: U256) -> Result<(), ConvertError> {
        ledger.burn(self.address, sender, amount)?;
        ledger.transfer(NATIVE_ASSET, self.address, sender, amount)
    }
}
