// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::domain::error::ConvertError;
use crate::domain::hint::{Action, ConversionHint, VenueType};
use crate::infrastructure::ledger::Ledger;
use crate::infrastructure::venues::curve::CurvePool;
use crate::services::converter::adapter::{
    ALL_ACTIONS, AssetPair, Capability, VenueAdapter, indexed_pair,
};
use alloy::primitives::{Address, U256};
use std::collections::HashMap;
use std::sync::Arc;

pub const CAPABILITIES: &[Capability] = &[
    Capability::new(VenueType::CurvePlain, ALL_ACTIONS),
    Capability::new(VenueType::CurveStableNg, ALL_ACTIONS),
    Capability::new(VenueType::CurveCrypto, ALL_ACTIONS),
];

struct RegisteredPool {
    venue_type: VenueType,
    pool: Arc<dyn CurvePool>,
}

/// Curve pools of every flavour. A pool is registered under exactly one
/// venue type; hints naming it under another type are rejected.
pub struct CurveAdapter {
    address: Address,
    pools: HashMap<Address, RegisteredPool>,
}

impl CurveAdapter {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            pools: HashMap::new(),
        }
    }

    pub fn with_pool(mut self, venue_type: VenueType, pool: Arc<dyn CurvePool>) -> Self {
        self.pools
            .insert(pool.address(), RegisteredPool { venue_type, pool });
        self
    }

    fn lookup(&self, hint: &ConversionHint) -> Result<(&Arc<dyn CurvePool>, AssetPair), ConvertError> {
        let entry = self
            .pools
            .get(&hint.venue)
            .filter(|entry| entry.venue_type == hint.venue_type)
            .ok_or(ConvertError::UnsupportedPool(hint.venue))?;
        let pair = indexed_pair(entry.pool.coins(), entry.pool.lp_token(), hint)?;
        Ok((&entry.pool, pair))
    }

    fn deposit_amounts(pool: &dyn CurvePool, index: u8, amount: U256) -> Vec<U256> {
        let mut amounts = vec![U256::ZERO; pool.coins().len()];
        amounts[index as usize] = amount;
        amounts
    }
}

impl VenueAdapter for CurveAdapter {
    fn name(&self) -> &'static str {
        "curve"
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
            .map(|(_, pair)| pair)
            .unwrap_or(AssetPair::UNKNOWN)
    }

    fn estimate(
        &self,
        ledger: &Ledger,
        hint: &ConversionHint,
        amount_in: U256,
    ) -> Result<U256, ConvertError> {
        self.supports(hint)?;
        let (pool, _) = self.lookup(hint)?;
        let (i, j) = (hint.input_index as usize, hint.output_index as usize);
        match hint.action {
            Action::Swap => pool.get_dy(ledger, i, j, amount_in),
            Action::AddLiquidity => {
                let amounts = Self::deposit_amounts(pool.as_ref(), hint.input_index, amount_in);
                pool.calc_token_amount(ledger, &amounts)
            }
            Action::RemoveLiquidity => pool.calc_withdraw_one_coin(ledger, amount_in, j),
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
        let (pool, _) = self.lookup(hint)?;
        let (i, j) = (hint.input_index as usize, hint.output_index as usize);
        match hint.action {
            Action::Swap => pool.exchange(ledger, self.address, i, j, amount_in, U256::ZERO, recipient),
            Action::AddLiquidity => {
                let amounts = Self::deposit_amounts(pool.as_ref(), hint.input_index, amount_in);
                pool.add_liquidity(ledger, self.address, &amounts, U256::ZERO, recipient)
            }
            Action::RemoveLiquidity => {
                pool.remove_liquidity_one_coin(ledger, self.address, amount_in, j, U256::ZERO, recipient)
            }
        }
    }
}
