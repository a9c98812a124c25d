// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::domain::constants::wad;
use crate::domain::error::ConvertError;
use crate::infrastructure::ledger::Ledger;
use alloy::primitives::{Address, U256};

/// Stake/wrap venue turning an underlying asset into a derivative, and
/// optionally back.
pub trait StakingVenue: Send + Sync {
    fn address(&self) -> Address;
    fn underlying(&self) -> Address;
    fn derivative(&self) -> Address;
    /// `false` for minters that only go one way (queue-based withdrawals).
    fn supports_unstake(&self) -> bool;
    fn preview_stake(&self, ledger: &Ledger, amount: U256) -> Result<U256, ConvertError>;
    fn stake(
        &self,
        ledger: &mut Ledger,
        sender: Address,
        amount: U256,
        recipient: Address,
    ) -> Result<U256, ConvertError>;
    fn preview_unstake(&self, ledger: &Ledger, amount: U256) -> Result<U256, ConvertError>;
    fn unstake(
        &self,
        ledger: &mut Ledger,
        sender: Address,
        amount: U256,
        recipient: Address,
    ) -> Result<U256, ConvertError>;
}

/// Minter with a fixed exchange rate (derivative per underlying, WAD).
/// Deposits are held at the minter address.
#[derive(Debug, Clone)]
pub struct SimPeggedMinter {
    address: Address,
    underlying: Address,
    derivative: Address,
    rate: U256,
    redeemable: bool,
}

impl SimPeggedMinter {
    pub fn new(address: Address, underlying: Address, derivative: Address) -> Self {
        Self {
            address,
            underlying,
            derivative,
            rate: wad(),
            redeemable: false,
        }
    }

    pub fn with_rate(mut self, rate: U256) -> Self {
        self.rate = rate;
        self
    }

    pub fn redeemable(mut self) -> Self {
        self.redeemable = true;
        self
    }

    fn reject(&self, reason: &str) -> ConvertError {
        ConvertError::venue(self.address, reason)
    }
}

impl StakingVenue for SimPeggedMinter {
    fn address(&self) -> Address {
        self.address
    }

    fn underlying(&self) -> Address {
        self.underlying
    }

    fn derivative(&self) -> Address {
        self.derivative
    }

    fn supports_unstake(&self) -> bool {
        self.redeemable
    }

    fn preview_stake(&self, _ledger: &Ledger, amount: U256) -> Result<U256, ConvertError> {
        if amount.is_zero() {
            return Err(self.reject("ZERO_DEPOSIT"));
        }
        amount
            .checked_mul(self.rate)
            .map(|v| v / wad())
            .ok_or(ConvertError::ArithmeticOverflow("stake preview"))
    }

    fn stake(
        &self,
        ledger: &mut Ledger,
        sender: Address,
        amount: U256,
        recipient: Address,
    ) -> Result<U256, ConvertError> {
        let minted = self.preview_stake(ledger, amount)?;
        ledger.transfer(self.underlying, sender, self.address, amount)?;
        ledger.mint(self.derivative, recipient, minted)?;
        Ok(minted)
    }

    fn preview_unstake(&self, ledger: &Ledger, amount: U256) -> Result<U256, ConvertError> {
        if !self.redeemable {
            return Err(self.reject("withdrawals are queue-based"));
        }
        if amount.is_zero() || self.rate.is_zero() {
            return Err(self.reject("ZERO_WITHDRAW"));
        }
        let out = amount
            .checked_mul(wad())
            .map(|v| v / self.rate)
            .ok_or(ConvertError::ArithmeticOverflow("unstake preview"))?;
        if out > ledger.balance_of(self.underlying, self.address) {
            return Err(self.reject("insufficient deposit pool balance"));
        }
        Ok(out)
    }

    fn unstake(
        &self,
        ledger: &mut Ledger,
        sender: Address,
        amount: U256,
        recipient: Address,
    ) -> Result<U256, ConvertError> {
        let out = self.preview_unstake(ledger, amount)?;
        ledger.burn(self.derivative, sender, amount)?;
        ledger.transfer(self.underlying, self.address, recipient, out)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::constants::NATIVE_ASSET;

    fn addr(byte: u8) -> Address {
        Address::repeat_byte(byte)
    }

    #[test]
    fn one_way_minter_refuses_unstake() {
        let mut ledger = Ledger::new();
        let lido = SimPeggedMinter::new(addr(0x60), NATIVE_ASSET, addr(0x60));
        ledger.mint(NATIVE_ASSET, addr(7), U256::from(100u64)).unwrap();
        let minted = lido
            .stake(&mut ledger, addr(7), U256::from(100u64), addr(7))
            .unwrap();
        assert_eq!(minted, U256::from(100u64));
        assert!(!lido.supports_unstake());
        assert!(lido.preview_unstake(&ledger, minted).is_err());
    }

    #[test]
    fn redeemable_minter_applies_rate_both_ways() {
        let mut ledger = Ledger::new();
        // 0.9 derivative per underlying.
        let reth = SimPeggedMinter::new(addr(0x61), NATIVE_ASSET, addr(0x62))
            .with_rate(U256::from(900_000_000_000_000_000u128))
            .redeemable();
        ledger.mint(NATIVE_ASSET, addr(7), U256::from(1_000u64)).unwrap();
        let minted = reth
            .stake(&mut ledger, addr(7), U256::from(1_000u64), addr(7))
            .unwrap();
        assert_eq!(minted, U256::from(900u64));
        let back = reth.unstake(&mut ledger, addr(7), minted, addr(7)).unwrap();
        assert_eq!(back, U256::from(1_000u64));
        assert_eq!(ledger.total_supply(addr(0x62)), U256::ZERO);
    }
}
