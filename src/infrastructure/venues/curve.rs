// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::domain::constants::CURVE_FEE_DENOMINATOR;
use crate::domain::error::ConvertError;
use crate::infrastructure::ledger::Ledger;
use crate::infrastructure::venues::stableswap::{get_d, get_y, get_y_d};
use alloy::primitives::{Address, U256};

/// Index-addressed Curve pool: swaps between coins, single-sided
/// deposits and single-coin withdrawals.
pub trait CurvePool: Send + Sync {
    fn address(&self) -> Address;
    fn coins(&self) -> &[Address];
    fn lp_token(&self) -> Address;
    fn get_dy(&self, ledger: &Ledger, i: usize, j: usize, dx: U256) -> Result<U256, ConvertError>;
    #[allow(clippy::too_many_arguments)]
    fn exchange(
        &self,
        ledger: &mut Ledger,
        sender: Address,
        i: usize,
        j: usize,
        dx: U256,
        min_dy: U256,
        receiver: Address,
    ) -> Result<U256, ConvertError>;
    fn calc_token_amount(&self, ledger: &Ledger, amounts: &[U256]) -> Result<U256, ConvertError>;
    fn add_liquidity(
        &self,
        ledger: &mut Ledger,
        sender: Address,
        amounts: &[U256],
        min_mint_amount: U256,
        receiver: Address,
    ) -> Result<U256, ConvertError>;
    fn calc_withdraw_one_coin(
        &self,
        ledger: &Ledger,
        burn_amount: U256,
        i: usize,
    ) -> Result<U256, ConvertError>;
    #[allow(clippy::too_many_arguments)]
    fn remove_liquidity_one_coin(
        &self,
        ledger: &mut Ledger,
        sender: Address,
        burn_amount: U256,
        i: usize,
        min_received: U256,
        receiver: Address,
    ) -> Result<U256, ConvertError>;
}

/// StableSwap pool whose coin balances live in the ledger at the pool
/// address. The LP token is a separate asset minted by the pool.
#[derive(Debug, Clone)]
pub struct SimStableSwapPool {
    address: Address,
    coins: Vec<Address>,
    lp_token: Address,
    amp: u64,
    /// 1e10-scaled.
    fee: u64,
}

impl SimStableSwapPool {
    pub fn new(address: Address, coins: Vec<Address>, lp_token: Address, amp: u64, fee: u64) -> Self {
        Self {
            address,
            coins,
            lp_token,
            amp,
            fee,
        }
    }

    /// Deposits `amounts` minted from thin air and credits LP to `provider`.
    pub fn seed(&self, ledger: &mut Ledger, amounts: &[U256], provider: Address) -> Result<U256, ConvertError> {
        for (coin, amount) in self.coins.iter().zip(amounts) {
            ledger.mint(*coin, provider, *amount)?;
        }
        self.add_liquidity(ledger, provider, amounts, U256::ZERO, provider)
    }

    fn balances(&self, ledger: &Ledger) -> Vec<U256> {
        self.coins
            .iter()
            .map(|coin| ledger.balance_of(*coin, self.address))
            .collect()
    }

    fn reject(&self, reason: &str) -> ConvertError {
        ConvertError::venue(self.address, reason)
    }

    fn check_index(&self, i: usize) -> Result<(), ConvertError> {
        if i >= self.coins.len() {
            return Err(self.reject("coin index out of range"));
        }
        Ok(())
    }

    fn take_fee(&self, amount: U256) -> U256 {
        amount - amount * U256::from(self.fee) / U256::from(CURVE_FEE_DENOMINATOR)
    }
}

impl CurvePool for SimStableSwapPool {
    fn address(&self) -> Address {
        self.address
    }

    fn coins(&self) -> &[Address] {
        &self.coins
    }

    fn lp_token(&self) -> Address {
        self.lp_token
    }

    fn get_dy(&self, ledger: &Ledger, i: usize, j: usize, dx: U256) -> Result<U256, ConvertError> {
        self.check_index(i)?;
        self.check_index(j)?;
        if i == j {
            return Err(self.reject("same coin"));
        }
        let xp = self.balances(ledger);
        let y = get_y(i, j, xp[i] + dx, &xp, self.amp)?;
        let dy = xp[j]
            .checked_sub(y)
            .and_then(|v| v.checked_sub(U256::from(1u8)))
            .ok_or_else(|| self.reject("exchange underflow"))?;
        Ok(self.take_fee(dy))
    }

    fn exchange(
        &self,
        ledger: &mut Ledger,
        sender: Address,
        i: usize,
        j: usize,
        dx: U256,
        min_dy: U256,
        receiver: Address,
    ) -> Result<U256, ConvertError> {
        let dy = self.get_dy(ledger, i, j, dx)?;
        if dy < min_dy {
            return Err(self.reject("Exchange resulted in fewer coins than expected"));
        }
        ledger.transfer(self.coins[i], sender, self.address, dx)?;
        ledger.transfer(self.coins[j], self.address, receiver, dy)?;
        Ok(dy)
    }

    fn calc_token_amount(&self, ledger: &Ledger, amounts: &[U256]) -> Result<U256, ConvertError> {
        if amounts.len() != self.coins.len() {
            return Err(self.reject("amounts length mismatch"));
        }
        let old = self.balances(ledger);
        let new: Vec<U256> = old.iter().zip(amounts).map(|(b, a)| *b + *a).collect();
        let d1 = get_d(&new, self.amp)?;
        let supply = ledger.total_supply(self.lp_token);
        if supply.is_zero() {
            return Ok(d1);
        }
        let d0 = get_d(&old, self.amp)?;
        if d1 <= d0 {
            return Err(self.reject("D1 must be greater than D0"));
        }
        Ok(supply * (d1 - d0) / d0)
    }

    fn add_liquidity(
        &self,
        ledger: &mut Ledger,
        sender: Address,
        amounts: &[U256],
        min_mint_amount: U256,
        receiver: Address,
    ) -> Result<U256, ConvertError> {
        let minted = self.calc_token_amount(ledger, amounts)?;
        if minted < min_mint_amount {
            return Err(self.reject("Slippage screwed you"));
        }
        for (coin, amount) in self.coins.iter().zip(amounts) {
            if !amount.is_zero() {
                ledger.transfer(*coin, sender, self.address, *amount)?;
            }
        }
        ledger.mint(self.lp_token, receiver, minted)?;
        Ok(minted)
    }

    fn calc_withdraw_one_coin(
        &self,
        ledger: &Ledger,
        burn_amount: U256,
        i: usize,
    ) -> Result<U256, ConvertError> {
        self.check_index(i)?;
        let supply = ledger.total_supply(self.lp_token);
        if burn_amount.is_zero() || burn_amount > supply {
            return Err(self.reject("invalid burn amount"));
        }
        let xp = self.balances(ledger);
        let d0 = get_d(&xp, self.amp)?;
        let d1 = d0 - burn_amount * d0 / supply;
        let new_y = get_y_d(i, &xp, d1, self.amp)?;
        let dy = xp[i]
            .checked_sub(new_y)
            .and_then(|v| v.checked_sub(U256::from(1u8)))
            .ok_or_else(|| self.reject("withdraw underflow"))?;
        Ok(self.take_fee(dy))
    }

    fn remove_liquidity_one_coin(
        &self,
        ledger: &mut Ledger,
        sender: Address,
        burn_amount: U256,
        i: usize,
        min_received: U256,
        receiver: Address,
    ) -> Result<U256, ConvertError> {
        let dy = self.calc_withdraw_one_coin(ledger, burn_amount, i)?;
        if dy < min_received {
            return Err(self.reject("Not enough coins removed"));
        }
        ledger.burn(self.lp_token, sender, burn_amount)?;
        ledger.transfer(self.coins[i], self.address, receiver, dy)?;
        Ok(dy)
    }
}
