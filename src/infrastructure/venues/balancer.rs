// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::domain::constants::{WAD, wad};
use crate::domain::error::ConvertError;
use crate::infrastructure::ledger::Ledger;
use crate::infrastructure::venues::stableswap::{get_d, get_y, get_y_d};
use alloy::primitives::{Address, B256, U256};
use std::collections::HashMap;

/// Balancer-style vault: every pool is addressed through one vault and
/// identified by a pool id. Pool tokens (BPT) are the pool address itself.
pub trait BalancerVault: Send + Sync {
    fn address(&self) -> Address;
    fn pool_id(&self, pool: Address) -> Option<B256>;
    fn pool_tokens(&self, pool_id: B256) -> Option<Vec<Address>>;
    fn query_swap(
        &self,
        ledger: &Ledger,
        pool_id: B256,
        asset_in: Address,
        asset_out: Address,
        amount_in: U256,
    ) -> Result<U256, ConvertError>;
    #[allow(clippy::too_many_arguments)]
    fn swap(
        &self,
        ledger: &mut Ledger,
        pool_id: B256,
        asset_in: Address,
        asset_out: Address,
        amount_in: U256,
        sender: Address,
        recipient: Address,
    ) -> Result<U256, ConvertError>;
    fn query_join(
        &self,
        ledger: &Ledger,
        pool_id: B256,
        asset_in: Address,
        amount_in: U256,
    ) -> Result<U256, ConvertError>;
    fn join_pool(
        &self,
        ledger: &mut Ledger,
        pool_id: B256,
        asset_in: Address,
        amount_in: U256,
        sender: Address,
        recipient: Address,
    ) -> Result<U256, ConvertError>;
    fn query_exit(
        &self,
        ledger: &Ledger,
        pool_id: B256,
        bpt_in: U256,
        asset_out: Address,
    ) -> Result<U256, ConvertError>;
    fn exit_pool(
        &self,
        ledger: &mut Ledger,
        pool_id: B256,
        bpt_in: U256,
        asset_out: Address,
        sender: Address,
        recipient: Address,
    ) -> Result<U256, ConvertError>;
}

#[derive(Debug, Clone)]
pub enum PoolCurve {
    /// Normalized weights, one per token, summing to 1.
    Weighted(Vec<f64>),
    Stable { amp: u64 },
}

#[derive(Debug, Clone)]
pub struct SimPool {
    pub address: Address,
    pub tokens: Vec<Address>,
    pub curve: PoolCurve,
    /// WAD-scaled swap fee.
    pub swap_fee: U256,
}

/// Derives the vault's pool id: the pool address left-aligned, the
/// specialization in byte 21 and a registration nonce in the tail.
pub fn derive_pool_id(pool: Address, specialization: u8, nonce: u16) -> B256 {
    let mut id = [0u8; 32];
    id[..20].copy_from_slice(pool.as_slice());
    id[21] = specialization;
    id[30..].copy_from_slice(&nonce.to_be_bytes());
    B256::from(id)
}

#[derive(Debug, Clone, Default)]
pub struct SimBalancerVault {
    address: Address,
    pools: HashMap<B256, SimPool>,
    ids: HashMap<Address, B256>,
}

impl SimBalancerVault {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            ..Default::default()
        }
    }

    pub fn register_pool(&mut self, pool: SimPool) -> B256 {
        let specialization = match pool.curve {
            PoolCurve::Weighted(_) => 1,
            PoolCurve::Stable { .. } => 2,
        };
        let id = derive_pool_id(pool.address, specialization, self.pools.len() as u16);
        self.ids.insert(pool.address, id);
        self.pools.insert(id, pool);
        id
    }

    /// Mints `amounts` into the pool and the initial BPT to `provider`.
    pub fn seed(
        &self,
        ledger: &mut Ledger,
        pool_id: B256,
        amounts: &[U256],
        provider: Address,
    ) -> Result<U256, ConvertError> {
        let pool = self.pool(pool_id)?;
        for (token, amount) in pool.tokens.iter().zip(amounts) {
            ledger.mint(*token, pool.address, *amount)?;
        }
        let initial = match &pool.curve {
            PoolCurve::Weighted(_) => amounts.iter().fold(U256::ZERO, |acc, a| acc + *a),
            PoolCurve::Stable { amp } => get_d(amounts, *amp)?,
        };
        ledger.mint(pool.address, provider, initial)?;
        Ok(initial)
    }

    fn pool(&self, pool_id: B256) -> Result<&SimPool, ConvertError> {
        self.pools
            .get(&pool_id)
            .ok_or_else(|| ConvertError::venue(self.address, "BAL#500 invalid pool id"))
    }

    fn index_of(&self, pool: &SimPool, asset: Address) -> Result<usize, ConvertError> {
        pool.tokens
            .iter()
            .position(|t| *t == asset)
            .ok_or_else(|| ConvertError::venue(self.address, "BAL#521 token not registered"))
    }

    fn balances(pool: &SimPool, ledger: &Ledger) -> Vec<U256> {
        pool.tokens
            .iter()
            .map(|t| ledger.balance_of(*t, pool.address))
            .collect()
    }

    fn after_fee(pool: &SimPool, amount: U256) -> U256 {
        amount - amount * pool.swap_fee / wad()
    }

    fn swap_out(
        &self,
        ledger: &Ledger,
        pool: &SimPool,
        asset_in: Address,
        asset_out: Address,
        amount_in: U256,
    ) -> Result<U256, ConvertError> {
        let i = self.index_of(pool, asset_in)?;
        let j = self.index_of(pool, asset_out)?;
        if i == j || amount_in.is_zero() {
            return Err(ConvertError::venue(self.address, "BAL#510 invalid swap"));
        }
        let xp = Self::balances(pool, ledger);
        let net_in = Self::after_fee(pool, amount_in);
        let out = match &pool.curve {
            PoolCurve::Weighted(weights) => {
                let base = to_f64(xp[i])? / to_f64(xp[i] + net_in)?;
                let keep = base.powf(weights[i] / weights[j]);
                mul_fraction(xp[j], 1.0 - keep)?
            }
            PoolCurve::Stable { amp } => {
                let y = get_y(i, j, xp[i] + net_in, &xp, *amp)?;
                xp[j].saturating_sub(y).saturating_sub(U256::from(1u8))
            }
        };
        if out.is_zero() || out >= xp[j] {
            return Err(ConvertError::venue(self.address, "BAL#001 out of bounds"));
        }
        Ok(out)
    }

    fn join_out(
        &self,
        ledger: &Ledger,
        pool: &SimPool,
        asset_in: Address,
        amount_in: U256,
    ) -> Result<U256, ConvertError> {
        let i = self.index_of(pool, asset_in)?;
        let supply = ledger.total_supply(pool.address);
        if supply.is_zero() || amount_in.is_zero() {
            return Err(ConvertError::venue(self.address, "BAL#004 zero invariant"));
        }
        let xp = Self::balances(pool, ledger);
        let minted = match &pool.curve {
            PoolCurve::Weighted(weights) => {
                // The non-proportional part of a single-token join pays the swap fee.
                let taxable = mul_fraction(amount_in, 1.0 - weights[i])?;
                let net_in = amount_in - (taxable - Self::after_fee(pool, taxable));
                let growth = (1.0 + to_f64(net_in)? / to_f64(xp[i])?).powf(weights[i]) - 1.0;
                mul_fraction(supply, growth)?
            }
            PoolCurve::Stable { amp } => {
                let mut grown = xp.clone();
                grown[i] += Self::after_fee(pool, amount_in);
                let d0 = get_d(&xp, *amp)?;
                let d1 = get_d(&grown, *amp)?;
                supply * (d1 - d0) / d0
            }
        };
        if minted.is_zero() {
            return Err(ConvertError::venue(self.address, "BAL#208 bpt out min amount"));
        }
        Ok(minted)
    }

    fn exit_out(
        &self,
        ledger: &Ledger,
        pool: &SimPool,
        bpt_in: U256,
        asset_out: Address,
    ) -> Result<U256, ConvertError> {
        let j = self.index_of(pool, asset_out)?;
        let supply = ledger.total_supply(pool.address);
        if bpt_in.is_zero() || bpt_in >= supply {
            return Err(ConvertError::venue(self.address, "BAL#207 bpt in max amount"));
        }
        let xp = Self::balances(pool, ledger);
        let gross = match &pool.curve {
            PoolCurve::Weighted(weights) => {
                let share_left = 1.0 - to_f64(bpt_in)? / to_f64(supply)?;
                mul_fraction(xp[j], 1.0 - share_left.powf(1.0 / weights[j]))?
            }
            PoolCurve::Stable { amp } => {
                let d0 = get_d(&xp, *amp)?;
                let d1 = d0 - bpt_in * d0 / supply;
                let y = get_y_d(j, &xp, d1, *amp)?;
                xp[j].saturating_sub(y)
            }
        };
        let out = Self::after_fee(pool, gross);
        if out.is_zero() {
            return Err(ConvertError::venue(self.address, "BAL#505 exit below minimum"));
        }
        Ok(out)
    }
}

fn to_f64(value: U256) -> Result<f64, ConvertError> {
    let value: u128 = value
        .try_into()
        .map_err(|_| ConvertError::ArithmeticOverflow("weighted math"))?;
    Ok(value as f64)
}

/// `amount * fraction`, rounded down, with `fraction` clamped to `[0, 1]`.
fn mul_fraction(amount: U256, fraction: f64) -> Result<U256, ConvertError> {
    if !fraction.is_finite() {
        return Err(ConvertError::ArithmeticOverflow("weighted math"));
    }
    let scaled = (fraction.clamp(0.0, 1.0) * WAD as f64) as u128;
    amount
        .checked_mul(U256::from(scaled))
        .map(|v| v / wad())
        .ok_or(ConvertError::ArithmeticOverflow("weighted math"))
}

impl BalancerVault for SimBalancerVault {
    fn address(&self) -> Address {
        self.address
    }

    fn pool_id(&self, pool: Address) -> Option<B256> {
        self.ids.get(&pool).copied()
    }

    fn pool_tokens(&self, pool_id: B256) -> Option<Vec<Address>> {
        self.pools.get(&pool_id).map(|p| p.tokens.clone())
    }

    fn query_swap(
        &self,
        ledger: &Ledger,
        pool_id: B256,
        asset_in: Address,
        asset_out: Address,
        amount_in: U256,
    ) -> Result<U256, ConvertError> {
        let pool = self.pool(pool_id)?;
        self.swap_out(ledger, pool, asset_in, asset_out, amount_in)
    }

    fn swap(
        &self,
        ledger: &mut Ledger,
        pool_id: B256,
        asset_in: Address,
        asset_out: Address,
        amount_in: U256,
        sender: Address,
        recipient: Address,
    ) -> Result<U256, ConvertError> {
        let pool = self.pool(pool_id)?;
        let out = self.swap_out(ledger, pool, asset_in, asset_out, amount_in)?;
        ledger.transfer(asset_in, sender, pool.address, amount_in)?;
        ledger.transfer(asset_out, pool.address, recipient, out)?;
        Ok(out)
    }

    fn query_join(
        &self,
        ledger: &Ledger,
        pool_id: B256,
        asset_in: Address,
        amount_in: U256,
    ) -> Result<U256, ConvertError> {
        let pool = self.pool(pool_id)?;
        self.join_out(ledger, pool, asset_in, amount_in)
    }

    fn join_pool(
        &self,
        ledger: &mut Ledger,
        pool_id: B256,
        asset_in: Address,
        amount_in: U256,
        sender: Address,
        recipient: Address,
    ) -> Result<U256, ConvertError> {
        let pool = self.pool(pool_id)?;
        let minted = self.join_out(ledger, pool, asset_in, amount_in)?;
        ledger.transfer(asset_in, sender, pool.address, amount_in)?;
        ledger.mint(pool.address, recipient, minted)?;
        Ok(minted)
    }

    fn query_exit(
        &self,
        ledger: &Ledger,
        pool_id: B256,
        bpt_in: U256,
        asset_out: Address,
    ) -> Result<U256, ConvertError> {
        let pool = self.pool(pool_id)?;
        self.exit_out(ledger, pool, bpt_in, asset_out)
    }

    fn exit_pool(
        &self,
        ledger: &mut Ledger,
        pool_id: B256,
        bpt_in: U256,
        asset_out: Address,
        sender: Address,
        recipient: Address,
    ) -> Result<U256, ConvertError> {
        let pool = self.pool(pool_id)?;
        let out = self.exit_out(ledger, pool, bpt_in, asset_out)?;
        ledger.burn(pool.address, sender, bpt_in)?;
        ledger.transfer(asset_out, pool.address, recipient, out)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(byte: u8) -> Address {
        Address::repeat_byte(byte)
    }

    fn vault_with_pools(ledger: &mut Ledger) -> (SimBalancerVault, B256, B256) {
        let mut vault = SimBalancerVault::new(addr(0xba));
        let weighted = vault.register_pool(SimPool {
            address: addr(0x50),
            tokens: vec![addr(1), addr(2)],
            curve: PoolCurve::Weighted(vec![0.8, 0.2]),
            swap_fee: U256::from(3_000_000_000_000_000u64),
        });
        let stable = vault.register_pool(SimPool {
            address: addr(0x51),
            tokens: vec![addr(2), addr(3)],
            curve: PoolCurve::Stable { amp: 200 },
            swap_fee: U256::from(100_000_000_000_000u64),
        });
        let depth = U256::from(1_000_000_000u64);
        vault
            .seed(ledger, weighted, &[depth * U256::from(4u8), depth], addr(0x99))
            .unwrap();
        vault.seed(ledger, stable, &[depth, depth], addr(0x99)).unwrap();
        (vault, weighted, stable)
    }

    #[test]
    fn pool_id_embeds_pool_address() {
        let id = derive_pool_id(addr(0x50), 1, 7);
        assert_eq!(&id[..20], addr(0x50).as_slice());
        assert_eq!(id[21], 1);
        assert_eq!(id[31], 7);
    }

    #[test]
    fn weighted_swap_prices_near_spot() {
        let mut ledger = Ledger::new();
        let (vault, weighted, _) = vault_with_pools(&mut ledger);
        // Spot price: (4e9 / 0.8) / (1e9 / 0.2) = 1, less a 0.3% fee.
        let out = vault
            .query_swap(&ledger, weighted, addr(1), addr(2), U256::from(10_000u64))
            .unwrap();
        assert!(out > U256::from(9_900u64) && out < U256::from(9_970u64));
    }

    #[test]
    fn stable_join_then_exit_round_trips_within_fees() {
        let mut ledger = Ledger::new();
        let (vault, _, stable) = vault_with_pools(&mut ledger);
        let amount = U256::from(1_000_000u64);
        ledger.mint(addr(3), addr(7), amount).unwrap();
        let quoted = vault.query_join(&ledger, stable, addr(3), amount).unwrap();
        let bpt = vault
            .join_pool(&mut ledger, stable, addr(3), amount, addr(7), addr(7))
            .unwrap();
        assert_eq!(bpt, quoted);
        let back = vault
            .exit_pool(&mut ledger, stable, bpt, addr(3), addr(7), addr(7))
            .unwrap();
        assert!(back < amount);
        assert!(back > amount * U256::from(99u8) / U256::from(100u8));
        assert_eq!(ledger.balance_of(addr(0x51), addr(7)), U256::ZERO);
    }

    #[test]
    fn unknown_token_is_rejected_by_the_vault() {
        let mut ledger = Ledger::new();
        let (vault, weighted, _) = vault_with_pools(&mut ledger);
        assert!(matches!(
            vault.query_swap(&ledger, weighted, addr(3), addr(2), U256::from(1u64)),
            Err(ConvertError::Venue { .. })
        ));
    }
}
