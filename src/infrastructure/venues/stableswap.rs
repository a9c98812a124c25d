// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

//! StableSwap invariant solvers shared by the Curve and Balancer-stable
//! simulations. Balances are assumed to share one precision.

use crate::domain::error::ConvertError;
use alloy::primitives::U256;

const MAX_ITERATIONS: usize = 255;

fn overflow() -> ConvertError {
    ConvertError::ArithmeticOverflow("stableswap")
}

fn mul(a: U256, b: U256) -> Result<U256, ConvertError> {
    a.checked_mul(b).ok_or_else(overflow)
}

fn div(a: U256, b: U256) -> Result<U256, ConvertError> {
    a.checked_div(b).ok_or_else(overflow)
}

fn converged(a: U256, b: U256) -> bool {
    let diff = if a > b { a - b } else { b - a };
    diff <= U256::from(1u8)
}

/// Invariant `D` for balances `xp` and amplification `amp`.
pub fn get_d(xp: &[U256], amp: u64) -> Result<U256, ConvertError> {
    let n = U256::from(xp.len());
    let sum = xp.iter().try_fold(U256::ZERO, |acc, x| acc.checked_add(*x).ok_or_else(overflow))?;
    if sum.is_zero() {
        return Ok(U256::ZERO);
    }
    if xp.iter().any(|x| x.is_zero()) {
        return Err(ConvertError::ArithmeticOverflow("stableswap zero balance"));
    }
    let ann = mul(U256::from(amp), n)?;
    let mut d = sum;
    for _ in 0..MAX_ITERATIONS {
        let mut d_p = d;
        for x in xp {
            d_p = div(mul(d_p, d)?, mul(*x, n)?)?;
        }
        let prev = d;
        let numerator = mul(mul(ann, sum)? + mul(d_p, n)?, d)?;
        let denominator = mul(ann - U256::from(1u8), d)? + mul(n + U256::from(1u8), d_p)?;
        d = div(numerator, denominator)?;
        if converged(d, prev) {
            return Ok(d);
        }
    }
    Err(ConvertError::ArithmeticOverflow("stableswap D did not converge"))
}

/// Balance of coin `j` that keeps `D` fixed once coin `i` holds `x`.
pub fn get_y(i: usize, j: usize, x: U256, xp: &[U256], amp: u64) -> Result<U256, ConvertError> {
    if i == j || i >= xp.len() || j >= xp.len() {
        return Err(ConvertError::ArithmeticOverflow("stableswap index"));
    }
    let d = get_d(xp, amp)?;
    let mut others = Vec::with_capacity(xp.len() - 1);
    for (k, balance) in xp.iter().enumerate() {
        if k == j {
            continue;
        }
        others.push(if k == i { x } else { *balance });
    }
    solve_y(&others, xp.len(), d, amp)
}

/// Balance of coin `i` that yields invariant `d` with the other balances fixed.
pub fn get_y_d(i: usize, xp: &[U256], d: U256, amp: u64) -> Result<U256, ConvertError> {
    if i >= xp.len() {
        return Err(ConvertError::ArithmeticOverflow("stableswap index"));
    }
    let others: Vec<U256> = xp
        .iter()
        .enumerate()
        .filter(|(k, _)| *k != i)
        .map(|(_, x)| *x)
        .collect();
    solve_y(&others, xp.len(), d, amp)
}

fn solve_y(others: &[U256], n_coins: usize, d: U256, amp: u64) -> Result<U256, ConvertError> {
    let n = U256::from(n_coins);
    let ann = mul(U256::from(amp), n)?;
    let mut c = d;
    let mut sum = U256::ZERO;
    for x in others {
        if x.is_zero() {
            return Err(ConvertError::ArithmeticOverflow("stableswap zero balance"));
        }
        sum += *x;
        c = div(mul(c, d)?, mul(*x, n)?)?;
    }
    c = div(mul(c, d)?, mul(ann, n)?)?;
    let b = sum + div(d, ann)?;
    let mut y = d;
    for _ in 0..MAX_ITERATIONS {
        let prev = y;
        let numerator = mul(y, y)? + c;
        let denominator = (mul(U256::from(2u8), y)? + b)
            .checked_sub(d)
            .ok_or_else(overflow)?;
        y = div(numerator, denominator)?;
        if converged(y, prev) {
            return Ok(y);
        }
    }
    Err(ConvertError::ArithmeticOverflow("stableswap y did not converge"))
}
