// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::domain::constants::UNISWAP_V3_FEE_TIERS;
use crate::domain::error::ConvertError;
use crate::domain::hint::{ConversionHint, VenueType, extra};
use crate::infrastructure::ledger::Ledger;
use crate::infrastructure::venues::uniswap_v3::UniswapV3Pool;
use crate::services::converter::adapter::{AssetPair, Capability, SWAP_ONLY, VenueAdapter};
use alloy::primitives::{Address, U256};
use std::collections::HashMap;
use std::sync::Arc;

pub const CAPABILITIES: &[Capability] = &[Capability::new(VenueType::UniswapV3, SWAP_ONLY)];

/// Concentrated-liquidity pools. A non-zero fee tier in `extra` must be
/// an enabled tier and match the pool's fee.
pub struct UniswapV3Adapter {
    address: Address,
    pools: HashMap<Address, Arc<dyn UniswapV3Pool>>,
}

impl UniswapV3Adapter {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            pools: HashMap::new(),
        }
    }

    pub fn with_pool(mut self, pool: Arc<dyn UniswapV3Pool>) -> Self {
        self.pools.insert(pool.address(), pool);
        self
    }

    fn lookup(&self, hint: &ConversionHint) -> Result<(&Arc<dyn UniswapV3Pool>, bool), ConvertError> {
        let pool = self
            .pools
            .get(&hint.venue)
            .ok_or(ConvertError::UnsupportedPool(hint.venue))?;
        let fee_tier = extra::fee_tier(hint.extra);
        if fee_tier != 0 && (!UNISWAP_V3_FEE_TIERS.contains(&fee_tier) || fee_tier != pool.fee()) {
            return Err(ConvertError::UnsupportedPool(hint.venue));
        }
        match (hint.input_index, hint.output_index) {
            (0, 1) => Ok((pool, true)),
            (1, 0) => Ok((pool, false)),
            _ => Err(ConvertError::UnsupportedPool(hint.venue)),
        }
    }
}

impl VenueAdapter for UniswapV3Adapter {
    fn name(&self) -> &'static str {
        "uniswap-v3"
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
        match self.lookup(hint) {
            Ok((pool, true)) => AssetPair::new(pool.token0(), pool.token1()),
            Ok((pool, false)) => AssetPair::new(pool.token1(), pool.token0()),
            Err(_) => AssetPair::UNKNOWN,
        }
    }

    fn estimate(
        &self,
        ledger: &Ledger,
        hint: &ConversionHint,
        amount_in: U256,
    ) -> Result<U256, ConvertError> {
        self.supports(hint)?;
        let (pool, zero_for_one) = self.lookup(hint)?;
        pool.quote_exact_input(ledger, zero_for_one, amount_in)
    }

    fn execute(
        &self,
        ledger: &mut Ledger,
        hint: &ConversionHint,
        amount_in: U256,
        recipient: Address,
    ) -> Result<U256, ConvertError> {
        self.supports(hint)?;
        let (pool, zero_for_one) = self.lookup(hint)?;
        pool.swap(ledger, self.address, recipient, zero_for_one, amount_in)
    }
}
