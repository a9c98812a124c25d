// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::domain::constants::UNISWAP_V3_FEE_DENOMINATOR;
use crate::domain::error::ConvertError;
use crate::infrastructure::ledger::Ledger;
use alloy::primitives::{Address, U256};

/// Concentrated-liquidity pool. Settlement follows the callback model:
/// the pool sends the output first and pulls the input from `payer`.
pub trait UniswapV3Pool: Send + Sync {
    fn address(&self) -> Address;
    fn token0(&self) -> Address;
    fn token1(&self) -> Address;
    /// Fee in hundredths of a basis point.
    fn fee(&self) -> u32;
    fn quote_exact_input(
        &self,
        ledger: &Ledger,
        zero_for_one: bool,
        amount_in: U256,
    ) -> Result<U256, ConvertError>;
    fn swap(
        &self,
        ledger: &mut Ledger,
        payer: Address,
        recipient: Address,
        zero_for_one: bool,
        amount_in: U256,
    ) -> Result<U256, ConvertError>;
}

/// Single-range position: trades follow `x * y = k` on virtual reserves
/// (real balance plus a fixed offset derived from the range bounds), and
/// can never pay out more than the real balance.
#[derive(Debug, Clone)]
pub struct SimV3Pool {
    address: Address,
    token0: Address,
    token1: Address,
    fee: u32,
    offset0: U256,
    offset1: U256,
}

impl SimV3Pool {
    pub fn new(address: Address, token_a: Address, token_b: Address, fee: u32) -> Self {
        let (token0, token1) = if token_a < token_b {
            (token_a, token_b)
        } else {
            (token_b, token_a)
        };
        Self {
            address,
            token0,
            token1,
            fee,
            offset0: U256::ZERO,
            offset1: U256::ZERO,
        }
    }

    /// Virtual liquidity added on top of real balances.
    pub fn with_virtual_offsets(mut self, offset0: U256, offset1: U256) -> Self {
        self.offset0 = offset0;
        self.offset1 = offset1;
        self
    }

    pub fn seed(&self, ledger: &mut Ledger, amount0: U256, amount1: U256) -> Result<(), ConvertError> {
        ledger.mint(self.token0, self.address, amount0)?;
        ledger.mint(self.token1, self.address, amount1)
    }

    fn compute_out(&self, ledger: &Ledger, zero_for_one: bool, amount_in: U256) -> Result<U256, ConvertError> {
        if amount_in.is_zero() {
            return Err(ConvertError::venue(self.address, "AS"));
        }
        let real0 = ledger.balance_of(self.token0, self.address);
        let real1 = ledger.balance_of(self.token1, self.address);
        let (reserve_in, reserve_out, real_out) = if zero_for_one {
            (real0 + self.offset0, real1 + self.offset1, real1)
        } else {
            (real1 + self.offset1, real0 + self.offset0, real0)
        };
        let fee_scale = U256::from(UNISWAP_V3_FEE_DENOMINATOR);
        let net_in = amount_in
            .checked_mul(fee_scale - U256::from(self.fee))
            .ok_or(ConvertError::ArithmeticOverflow("v3 fee"))?
            / fee_scale;
        let amount_out = net_in
            .checked_mul(reserve_out)
            .ok_or(ConvertError::ArithmeticOverflow("v3 amount out"))?
            / (reserve_in + net_in);
        if amount_out >= real_out {
            return Err(ConvertError::venue(self.address, "range liquidity exhausted"));
        }
        Ok(amount_out)
    }
}

impl UniswapV3Pool for SimV3Pool {
    fn address(&self) -> Address {
        self.address
    }

    fn token0(&self) -> Address {
        self.token0
    }

    fn token1(&self) -> Address {
        self.token1
    }

    fn fee(&self) -> u32 {
        self.fee
    }

    fn quote_exact_input(
        &self,
        ledger: &Ledger,
        zero_for_one: bool,
        amount_in: U256,
    ) -> Result<U256, ConvertError> {
        self.compute_out(ledger, zero_for_one, amount_in)
    }

    fn swap(
        &self,
        ledger: &mut Ledger,
        payer: Address,
        recipient: Address,
        zero_for_one: bool,
        amount_in: U256,
    ) -> Result<U256, ConvertError> {
        let amount_out = self.compute_out(ledger, zero_for_one, amount_in)?;
        let (token_in, token_out) = if zero_for_one {
            (self.token0, self.token1)
        } else {
            (self.token1, self.token0)
        };
        ledger.transfer(token_out, self.address, recipient, amount_out)?;
        ledger.transfer(token_in, payer, self.address, amount_in)?;
        Ok(amount_out)
    }
}
