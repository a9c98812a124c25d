// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::domain::error::ConvertError;
use crate::infrastructure::ledger::Ledger;
use crate::infrastructure::venues::staking::StakingVenue;
use alloy::primitives::{Address, U256};

/// Tokenized vault. The share token is the vault address.
pub trait Erc4626Vault: Send + Sync {
    fn address(&self) -> Address;
    fn asset(&self) -> Address;
    fn total_assets(&self, ledger: &Ledger) -> U256;
    fn preview_deposit(&self, ledger: &Ledger, assets: U256) -> Result<U256, ConvertError>;
    fn deposit(
        &self,
        ledger: &mut Ledger,
        sender: Address,
        assets: U256,
        receiver: Address,
    ) -> Result<U256, ConvertError>;
    fn preview_redeem(&self, ledger: &Ledger, shares: U256) -> Result<U256, ConvertError>;
    fn redeem(
        &self,
        ledger: &mut Ledger,
        owner: Address,
        shares: U256,
        receiver: Address,
    ) -> Result<U256, ConvertError>;
}

/// Vault whose share price is `total_assets / total_supply`, rounding
/// down in the vault's favour on both legs.
#[derive(Debug, Clone)]
pub struct SimShareVault {
    address: Address,
    asset: Address,
}

impl SimShareVault {
    pub fn new(address: Address, asset: Address) -> Self {
        Self { address, asset }
    }

    /// Credits yield to the vault without minting shares.
    pub fn accrue(&self, ledger: &mut Ledger, amount: U256) -> Result<(), ConvertError> {
        ledger.mint(self.asset, self.address, amount)
    }

    fn convert(amount: U256, numerator: U256, denominator: U256) -> Result<U256, ConvertError> {
        amount
            .checked_mul(numerator)
            .map(|v| v / denominator)
            .ok_or(ConvertError::ArithmeticOverflow("vault share conversion"))
    }
}

impl Erc4626Vault for SimShareVault {
    fn address(&self) -> Address {
        self.address
    }

    fn asset(&self) -> Address {
        self.asset
    }

    fn total_assets(&self, ledger: &Ledger) -> U256 {
        ledger.balance_of(self.asset, self.address)
    }

    fn preview_deposit(&self, ledger: &Ledger, assets: U256) -> Result<U256, ConvertError> {
        let supply = ledger.total_supply(self.address);
        let total = self.total_assets(ledger);
        let shares = if supply.is_zero() || total.is_zero() {
            assets
        } else {
            Self::convert(assets, supply, total)?
        };
        if shares.is_zero() {
            return Err(ConvertError::venue(self.address, "ZERO_SHARES"));
        }
        Ok(shares)
    }

    fn deposit(
        &self,
        ledger: &mut Ledger,
        sender: Address,
        assets: U256,
        receiver: Address,
    ) -> Result<U256, ConvertError> {
        let shares = self.preview_deposit(ledger, assets)?;
        ledger.transfer(self.asset, sender, self.address, assets)?;
        ledger.mint(self.address, receiver, shares)?;
        Ok(shares)
    }

    fn preview_redeem(&self, ledger: &Ledger, shares: U256) -> Result<U256, ConvertError> {
        let supply = ledger.total_supply(self.address);
        if shares.is_zero() || shares > supply {
            return Err(ConvertError::venue(self.address, "ZERO_ASSETS"));
        }
        let assets = Self::convert(shares, self.total_assets(ledger), supply)?;
        if assets.is_zero() {
            return Err(ConvertError::venue(self.address, "ZERO_ASSETS"));
        }
        Ok(assets)
    }

    fn redeem(
        &self,
        ledger: &mut Ledger,
        owner: Address,
        shares: U256,
        receiver: Address,
    ) -> Result<U256, ConvertError> {
        let assets = self.preview_redeem(ledger, shares)?;
        ledger.burn(self.address, owner, shares)?;
        ledger.transfer(self.asset, self.address, receiver, assets)?;
        Ok(assets)
    }
}

/// Share vaults double as wrap venues (wstETH, sfrxETH).
impl StakingVenue for SimShareVault {
    fn address(&self) -> Address {
        self.address
    }

    fn underlying(&self) -> Address {
        self.asset
    }

    fn derivative(&self) -> Address {
        self.address
    }

    fn supports_unstake(&self) -> bool {
        true
    }

    fn preview_stake(&self, ledger: &Ledger, amount: U256) -> Result<U256, ConvertError> {
        self.preview_deposit(ledger, amount)
    }

    fn stake(
        &self,
        ledger: &mut Ledger,
        sender: Address,
        amount: U256,
        recipient: Address,
    ) -> Result<U256, ConvertError> {
        self.deposit(ledger, sender, amount, recipient)
    }

    fn preview_unstake(&self, ledger: &Ledger, amount: U256) -> Result<U256, ConvertError> {
        self.preview_redeem(ledger, amount)
    }

    fn unstake(
        &self,
        ledger: &mut Ledger,
        sender: Address,
        amount: U256,
        recipient: Address,
    ) -> Result<U256, ConvertError> {
        self.redeem(ledger, sender, amount, recipient)
    }
}
