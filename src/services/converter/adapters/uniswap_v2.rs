// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::domain::error::ConvertError;
use crate::domain::hint::{ConversionHint, VenueType};
use crate::infrastructure::ledger::Ledger;
use crate::infrastructure::venues::uniswap_v2::{UniswapV2Pair, get_amount_out};
use crate::services::converter::adapter::{AssetPair, Capability, SWAP_ONLY, VenueAdapter};
use alloy::primitives::{Address, U256};
use std::collections::HashMap;
use std::sync::Arc;

pub const CAPABILITIES: &[Capability] = &[Capability::new(VenueType::UniswapV2, SWAP_ONLY)];

/// Constant-product pairs. Indices 0/1 select token0/token1.
pub struct UniswapV2Adapter {
    address: Address,
    pairs: HashMap<Address, Arc<dyn UniswapV2Pair>>,
}

impl UniswapV2Adapter {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            pairs: HashMap::new(),
        }
    }

    pub fn with_pair(mut self, pair: Arc<dyn UniswapV2Pair>) -> Self {
        self.pairs.insert(pair.address(), pair);
        self
    }

    /// Pair plus direction (`true` when selling token0).
    fn lookup(&self, hint: &ConversionHint) -> Result<(&Arc<dyn UniswapV2Pair>, bool), ConvertError> {
        let pair = self
            .pairs
            .get(&hint.venue)
            .ok_or(ConvertError::UnsupportedPool(hint.venue))?;
        match (hint.input_index, hint.output_index) {
            (0, 1) => Ok((pair, true)),
            (1, 0) => Ok((pair, false)),
            _ => Err(ConvertError::UnsupportedPool(hint.venue)),
        }
    }

    fn quote(&self, ledger: &Ledger, hint: &ConversionHint, amount_in: U256) -> Result<U256, ConvertError> {
        let (pair, zero_for_one) = self.lookup(hint)?;
        let (reserve0, reserve1) = pair.get_reserves(ledger);
        if zero_for_one {
            get_amount_out(amount_in, reserve0, reserve1)
        } else {
            get_amount_out(amount_in, reserve1, reserve0)
        }
    }
}

impl VenueAdapter for UniswapV2Adapter {
    fn name(&self) -> &'static str {
        "uniswap-v2"
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
            Ok((pair, true)) => AssetPair::new(pair.token0(), pair.token1()),
            Ok((pair, false)) => AssetPair::new(pair.token1(), pair.token0()),
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
        self.quote(ledger, hint, amount_in)
    }

    fn execute(
        &self,
        ledger: &mut Ledger,
        hint: &ConversionHint,
        amount_in: U256,
        recipient: Address,
    ) -> Result<U256, ConvertError> {
        self.supports(hint)?;
        let amount_out = self.quote(ledger, hint, amount_in)?;
        let (pair, zero_for_one) = self.lookup(hint)?;
        let token_in = if zero_for_one { pair.token0() } else { pair.token1() };
        ledger.transfer(token_in, self.address, pair.address(), amount_in)?;
        if zero_for_one {
            pair.swap(ledger, U256::ZERO, amount_out, recipient)?;
        } else {
            pair.swap(ledger, amount_out, U256::ZERO, recipient)?;
        }
        Ok(amount_out)
    }
}
