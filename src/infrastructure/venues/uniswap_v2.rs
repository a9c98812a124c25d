// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::domain::constants::{UNISWAP_V2_FEE_DENOMINATOR, UNISWAP_V2_FEE_NUMERATOR};
use crate::domain::error::ConvertError;
use crate::infrastructure::ledger::Ledger;
use alloy::primitives::{Address, U256};

const RESERVE0_SLOT: u64 = 0;
const RESERVE1_SLOT: u64 = 1;

/// Constant-product pair with optimistic transfers: the caller pays the
/// pair first, then asks for the output amounts.
pub trait UniswapV2Pair: Send + Sync {
    fn address(&self) -> Address;
    fn token0(&self) -> Address;
    fn token1(&self) -> Address;
    fn get_reserves(&self, ledger: &Ledger) -> (U256, U256);
    fn swap(
        &self,
        ledger: &mut Ledger,
        amount0_out: U256,
        amount1_out: U256,
        to: Address,
    ) -> Result<(), ConvertError>;
}

/// `getAmountOut` of the V2 library (0.3% fee).
pub fn get_amount_out(
    amount_in: U256,
    reserve_in: U256,
    reserve_out: U256,
) -> Result<U256, ConvertError> {
    if reserve_in.is_zero() || reserve_out.is_zero() {
        return Err(ConvertError::ArithmeticOverflow("v2 empty reserves"));
    }
    let amount_in_with_fee = amount_in
        .checked_mul(U256::from(UNISWAP_V2_FEE_NUMERATOR))
        .ok_or(ConvertError::ArithmeticOverflow("v2 amount out"))?;
    let numerator = amount_in_with_fee
        .checked_mul(reserve_out)
        .ok_or(ConvertError::ArithmeticOverflow("v2 amount out"))?;
    let denominator = reserve_in
        .checked_mul(U256::from(UNISWAP_V2_FEE_DENOMINATOR))
        .and_then(|r| r.checked_add(amount_in_with_fee))
        .ok_or(ConvertError::ArithmeticOverflow("v2 amount out"))?;
    Ok(numerator / denominator)
}

/// In-process pair keeping its reserves in ledger storage slots.
#[derive(Debug, Clone)]
pub struct SimV2Pair {
    address: Address,
    token0: Address,
    token1: Address,
}

impl SimV2Pair {
    pub fn new(address: Address, token_a: Address, token_b: Address) -> Self {
        let (token0, token1) = if token_a < token_b {
            (token_a, token_b)
        } else {
            (token_b, token_a)
        };
        Self {
            address,
            token0,
            token1,
        }
    }

    /// Mints liquidity straight into the pair and syncs reserves.
    pub fn seed(&self, ledger: &mut Ledger, reserve0: U256, reserve1: U256) -> Result<(), ConvertError> {
        ledger.mint(self.token0, self.address, reserve0)?;
        ledger.mint(self.token1, self.address, reserve1)?;
        self.sync(ledger);
        Ok(())
    }

    fn sync(&self, ledger: &mut Ledger) {
        let balance0 = ledger.balance_of(self.token0, self.address);
        let balance1 = ledger.balance_of(self.token1, self.address);
        ledger.sstore(self.address, RESERVE0_SLOT, balance0);
        ledger.sstore(self.address, RESERVE1_SLOT, balance1);
    }

    fn reject(&self, reason: &str) -> ConvertError {
        ConvertError::venue(self.address, reason)
    }
}

impl UniswapV2Pair for SimV2Pair {
    fn address(&self) -> Address {
        self.address
    }

    fn token0(&self) -> Address {
        self.token0
    }

    fn token1(&self) -> Address {
        self.token1
    }

    fn get_reserves(&self, ledger: &Ledger) -> (U256, U256) {
        (
            ledger.sload(self.address, RESERVE0_SLOT),
            ledger.sload(self.address, RESERVE1_SLOT),
        )
    }

    fn swap(
        &self,
        ledger: &mut Ledger,
        amount0_out: U256,
        amount1_out: U256,
        to: Address,
    ) -> Result<(), ConvertError> {
        if amount0_out.is_zero() && amount1_out.is_zero() {
            return Err(self.reject("INSUFFICIENT_OUTPUT_AMOUNT"));
        }
        let (reserve0, reserve1) = self.get_reserves(ledger);
        if amount0_out >= reserve0 || amount1_out >= reserve1 {
            return Err(self.reject("INSUFFICIENT_LIQUIDITY"));
        }
        if to == self.token0 || to == self.token1 {
            return Err(self.reject("INVALID_TO"));
        }
        if !amount0_out.is_zero() {
            ledger.transfer(self.token0, self.address, to, amount0_out)?;
        }
        if !amount1_out.is_zero() {
            ledger.transfer(self.token1, self.address, to, amount1_out)?;
        }

        let balance0 = ledger.balance_of(self.token0, self.address);
        let balance1 = ledger.balance_of(self.token1, self.address);
        let amount0_in = balance0.saturating_sub(reserve0 - amount0_out);
        let amount1_in = balance1.saturating_sub(reserve1 - amount1_out);
        if amount0_in.is_zero() && amount1_in.is_zero() {
            return Err(self.reject("INSUFFICIENT_INPUT_AMOUNT"));
        }

        let scale = U256::from(UNISWAP_V2_FEE_DENOMINATOR);
        let fee = U256::from(UNISWAP_V2_FEE_DENOMINATOR - UNISWAP_V2_FEE_NUMERATOR);
        let adjusted0 = balance0 * scale - amount0_in * fee;
        let adjusted1 = balance1 * scale - amount1_in * fee;
        let lhs = adjusted0
            .checked_mul(adjusted1)
            .ok_or(ConvertError::ArithmeticOverflow("v2 k check"))?;
        let rhs = reserve0
            .checked_mul(reserve1)
            .and_then(|k| k.checked_mul(scale * scale))
            .ok_or(ConvertError::ArithmeticOverflow("v2 k check"))?;
        if lhs < rhs {
            return Err(self.reject("K"));
        }
        self.sync(ledger);
        tracing::trace!(
            target: "venue",
            pair = %format!("{:#x}", self.address),
            amount0_in = %amount0_in,
            amount1_in = %amount1_in,
            "v2 swap settled"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(byte: u8) -> Address {
        Address::repeat_byte(byte)
    }

    #[test]
    fn amount_out_matches_reference_formula() {
        let out = get_amount_out(
            U256::from(1_000u64),
            U256::from(1_000_000u64),
            U256::from(2_000_000u64),
        )
        .unwrap();
        // 997_000 * 2_000_000 / (1_000_000_000 + 997_000)
        assert_eq!(out, U256::from(1_992u64));
    }

    #[test]
    fn swap_without_payment_fails_k_check() {
        let mut ledger = Ledger::new();
        let pair = SimV2Pair::new(addr(0x10), addr(2), addr(1));
        assert_eq!(pair.token0(), addr(1));
        pair.seed(&mut ledger, U256::from(1_000_000u64), U256::from(1_000_000u64))
            .unwrap();
        let err = pair
            .swap(&mut ledger, U256::ZERO, U256::from(10u64), addr(9))
            .unwrap_err();
        assert!(matches!(err, ConvertError::Venue { .. }));
    }

    #[test]
    fn paid_swap_updates_reserves() {
        let mut ledger = Ledger::new();
        let pair = SimV2Pair::new(addr(0x10), addr(1), addr(2));
        pair.seed(&mut ledger, U256::from(1_000_000u64), U256::from(2_000_000u64))
            .unwrap();
        ledger.mint(addr(1), addr(9), U256::from(1_000u64)).unwrap();
        ledger
            .transfer(addr(1), addr(9), pair.address(), U256::from(1_000u64))
            .unwrap();
        pair.swap(&mut ledger, U256::ZERO, U256::from(1_992u64), addr(9))
            .unwrap();
        assert_eq!(
            pair.get_reserves(&ledger),
            (U256::from(1_001_000u64), U256::from(1_998_008u64))
        );
        assert_eq!(ledger.balance_of(addr(2), addr(9)), U256::from(1_992u64));
    }
}
