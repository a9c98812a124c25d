// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::domain::error::ConvertError;
use crate::domain::hint::{Action, ConversionHint, VenueType};
use crate::infrastructure::ledger::Ledger;
use crate::infrastructure::venues::balancer::BalancerVault;
use crate::services::converter::adapter::{
    ALL_ACTIONS, AssetPair, Capability, VenueAdapter, indexed_pair,
};
use alloy::primitives::{Address, B256, U256};
use std::collections::HashMap;
use std::sync::Arc;

pub const CAPABILITIES: &[Capability] = &[
    Capability::new(VenueType::BalancerWeighted, ALL_ACTIONS),
    Capability::new(VenueType::BalancerStable, ALL_ACTIONS),
];

/// Pools behind one Balancer vault. The hint's venue is the pool
/// address, which doubles as its BPT.
pub struct BalancerAdapter {
    address: Address,
    vault: Arc<dyn BalancerVault>,
    pools: HashMap<Address, VenueType>,
}

struct Resolved {
    pool_id: B256,
    pair: AssetPair,
}

impl BalancerAdapter {
    pub fn new(address: Address, vault: Arc<dyn BalancerVault>) -> Self {
        Self {
            address,
            vault,
            pools: HashMap::new(),
        }
    }

    pub fn with_pool(mut self, venue_type: VenueType, pool: Address) -> Self {
        self.pools.insert(pool, venue_type);
        self
    }

    fn lookup(&self, hint: &ConversionHint) -> Result<Resolved, ConvertError> {
        let unsupported = || ConvertError::UnsupportedPool(hint.venue);
        if self.pools.get(&hint.venue) != Some(&hint.venue_type) {
            return Err(unsupported());
        }
        let pool_id = self.vault.pool_id(hint.venue).ok_or_else(unsupported)?;
        let tokens = self.vault.pool_tokens(pool_id).ok_or_else(unsupported)?;
        let pair = indexed_pair(&tokens, hint.venue, hint)?;
        Ok(Resolved { pool_id, pair })
    }
}

impl VenueAdapter for BalancerAdapter {
    fn name(&self) -> &'static str {
        "balancer"
    }

    fn address(&self) -> Address {
        self.address
    }

    fn capabilities(&self) -> &'static [Capability] {
        CAPABILITIES
    }

    fn validate(&self, hint: &ConversionHint) -> Result<(), ConvertError> {
        self.lookup(hint).map(|_| ())
    }

    fn resolve_pair(&self, hint: &ConversionHint) -> AssetPair {
        self.lookup(hint)
            .map(|resolved| resolved.pair)
            .unwrap_or(AssetPair::UNKNOWN)
    }

    fn estimate(
        &self,
        ledger: &Ledger,
        hint: &ConversionHint,
        amount_in: U256,
    ) -> Result<U256, ConvertError> {
        self.supports(hint)?;
        let Resolved { pool_id, pair } = self.lookup(hint)?;
        match hint.action {
            Action::Swap => self
                .vault
                .query_swap(ledger, pool_id, pair.input, pair.output, amount_in),
            Action::AddLiquidity => self.vault.query_join(ledger, pool_id, pair.input, amount_in),
            Action::RemoveLiquidity => self.vault.query_exit(ledger, pool_id, amount_in, pair.output),
        }
    }

    fn execute(
        &self,
        ledger: &mut Ledger,
        hint: &ConversionHint,
        amount_in: U256,
        recipient: Address,
    ) -> Result<U256, ConvertError> {
        self.supports(hint)?;
        let Resolved { pool_id, pair } = self.lookup(hint)?;
        match hint.action {
            Action::Swap => self.vault.swap(
                ledger,
                pool_id,
                pair.input,
                pair.output,
                amount_in,
                self.address,
                recipient,
            ),
            Action::AddLiquidity => {
                self.vault
                    .join_pool(ledger, pool_id, pair.input, amount_in, self.address, recipient)
            }
            Action::RemoveLiquidity => {
                self.vault
                    .exit_pool(ledger, pool_id, amount_in, pair.output, self.address, recipient)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::venues::balancer::{PoolCurve, SimBalancerVault, SimPool};

    fn addr(byte: u8) -> Address {
        Address::repeat_byte(byte)
    }

    const WEIGHTED: u8 = 0x50;

    fn setup() -> (Ledger, BalancerAdapter) {
        let mut ledger = Ledger::new();
        let mut vault = SimBalancerVault::new(addr(0xba));
        let id = vault.register_pool(SimPool {
            address: addr(WEIGHTED),
            tokens: vec![addr(1), addr(2)],
            curve: PoolCurve::Weighted(vec![0.5, 0.5]),
            swap_fee: U256::from(1_000_000_000_000_000u64),
        });
        let depth = U256::from(1_000_000_000u64);
        vault.seed(&mut ledger, id, &[depth, depth], addr(0x99)).unwrap();
        let adapter = BalancerAdapter::new(addr(0xa5), Arc::new(vault))
            .with_pool(VenueType::BalancerWeighted, addr(WEIGHTED));
        (ledger, adapter)
    }

    #[test]
    fn swap_and_join_match_estimates() {
        let (mut ledger, adapter) = setup();
        let swap = ConversionHint::swap(addr(WEIGHTED), VenueType::BalancerWeighted, 0, 1)
            .with_token_count(2);
        ledger.mint(addr(1), adapter.address(), U256::from(50_000u64)).unwrap();
        let quoted = adapter.estimate(&ledger, &swap, U256::from(50_000u64)).unwrap();
        let out = adapter
            .execute(&mut ledger, &swap, U256::from(50_000u64), addr(9))
            .unwrap();
        assert_eq!(out, quoted);
        assert_eq!(ledger.balance_of(addr(2), addr(9)), out);

        let join = ConversionHint::new(addr(WEIGHTED), VenueType::BalancerWeighted, Action::AddLiquidity)
            .with_indices(1, 0)
            .with_token_count(2);
        assert_eq!(adapter.resolve_pair(&join), AssetPair::new(addr(2), addr(WEIGHTED)));
        ledger.transfer(addr(2), addr(9), adapter.address(), out).unwrap();
        let quoted = adapter.estimate(&ledger, &join, out).unwrap();
        let bpt = adapter.execute(&mut ledger, &join, out, addr(9)).unwrap();
        assert_eq!(bpt, quoted);
        assert_eq!(ledger.balance_of(addr(WEIGHTED), addr(9)), bpt);
    }

    #[test]
    fn stable_hint_on_weighted_pool_is_rejected() {
        let (ledger, adapter) = setup();
        let hint = ConversionHint::swap(addr(WEIGHTED), VenueType::BalancerStable, 0, 1)
            .with_token_count(2);
        assert_eq!(
            adapter.estimate(&ledger, &hint, U256::from(1u64)),
            Err(ConvertError::UnsupportedPool(addr(WEIGHTED)))
        );
    }
}
