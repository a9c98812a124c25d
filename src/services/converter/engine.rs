// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::domain::constants::DEFAULT_ENGINE_ADDRESS;
use crate::domain::error::ConvertError;
use crate::domain::hint::ConversionHint;
use crate::domain::route::ConversionRoute;
use crate::domain::split::{RatioBasis, SplitInstruction, SplitLayout};
use crate::infrastructure::ledger::Ledger;
use crate::services::converter::executor::PathExecutor;
use crate::services::converter::fan_out::FanOutRouter;
use crate::services::converter::multi_hop::MultiHopRouter;
use crate::services::converter::registry::ConverterRegistry;
use alloy::primitives::{Address, U256};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Custody address holding funds between hops.
    pub address: Address,
    pub split_layout: SplitLayout,
    pub ratio_basis: RatioBasis,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ENGINE_ADDRESS,
            split_layout: SplitLayout::default(),
            ratio_basis: RatioBasis::default(),
        }
    }
}

/// Caller surface of the converter. Every mutating call pulls the input
/// from `payer` and runs as one atomic unit against the ledger.
pub struct ConversionEngine {
    config: EngineConfig,
    registry: Arc<ConverterRegistry>,
    fan_out: FanOutRouter,
    multi_hop: MultiHopRouter,
    executor: PathExecutor,
}

impl ConversionEngine {
    pub fn new(config: EngineConfig, registry: Arc<ConverterRegistry>) -> Self {
        let executor = PathExecutor::new(config.address, Arc::clone(&registry));
        let multi_hop = MultiHopRouter::new(executor.clone());
        let fan_out = FanOutRouter::new(multi_hop.clone(), config.ratio_basis);
        Self {
            config,
            registry,
            fan_out,
            multi_hop,
            executor,
        }
    }

    pub fn address(&self) -> Address {
        self.config.address
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<ConverterRegistry> {
        &self.registry
    }

    pub fn decode_split(&self, word: U256) -> Result<SplitInstruction, ConvertError> {
        SplitInstruction::decode(word, self.config.split_layout)
    }

    pub fn query(
        &self,
        ledger: &Ledger,
        hint: &ConversionHint,
        amount_in: U256,
    ) -> Result<U256, ConvertError> {
        self.executor.query(ledger, hint, amount_in)
    }

    pub fn execute(
        &self,
        ledger: &mut Ledger,
        payer: Address,
        hint: &ConversionHint,
        amount_in: U256,
        recipient: Address,
    ) -> Result<U256, ConvertError> {
        let input = self.executor.resolve_pair(hint)?.input;
        ledger.atomic(|ledger| {
            self.pull(ledger, input, payer, amount_in)?;
            self.executor.execute(ledger, hint, amount_in, recipient)
        })
    }

    pub fn run_route(
        &self,
        ledger: &mut Ledger,
        payer: Address,
        route: &ConversionRoute,
        amount_in: U256,
        min_amount_out: U256,
        recipient: Address,
    ) -> Result<U256, ConvertError> {
        let input = self.executor.resolve_pair(route.first())?.input;
        let amount_out = ledger.atomic(|ledger| {
            self.pull(ledger, input, payer, amount_in)?;
            self.multi_hop
                .run(ledger, route, amount_in, min_amount_out, recipient)
        })?;
        tracing::info!(
            target: "converter",
            hops = route.len(),
            amount_in = %amount_in,
            amount_out = %amount_out,
            "route settled"
        );
        Ok(amount_out)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn run_split_route(
        &self,
        ledger: &mut Ledger,
        payer: Address,
        amount_in: U256,
        split: &SplitInstruction,
        branches: &[ConversionRoute],
        min_amount_out: U256,
        recipient: Address,
    ) -> Result<U256, ConvertError> {
        self.fan_out.validate(split, branches)?;
        let input = self.executor.resolve_pair(branches[0].first())?.input;
        let amount_out = ledger.atomic(|ledger| {
            self.pull(ledger, input, payer, amount_in)?;
            self.fan_out
                .run(ledger, amount_in, split, branches, min_amount_out, recipient)
        })?;
        tracing::info!(
            target: "converter",
            branches = branches.len(),
            amount_in = %amount_in,
            amount_out = %amount_out,
            "split route settled"
        );
        Ok(amount_out)
    }

    pub fn query_route(
        &self,
        ledger: &Ledger,
        route: &ConversionRoute,
        amount_in: U256,
    ) -> Result<U256, ConvertError> {
        self.multi_hop.query(ledger, route, amount_in)
    }

    pub fn query_split_route(
        &self,
        ledger: &Ledger,
        amount_in: U256,
        split: &SplitInstruction,
        branches: &[ConversionRoute],
    ) -> Result<U256, ConvertError> {
        self.fan_out.query(ledger, amount_in, split, branches)
    }

    fn pull(
        &self,
        ledger: &mut Ledger,
        asset: Address,
        payer: Address,
        amount: U256,
    ) -> Result<(), ConvertError> {
        ledger.transfer(asset, payer, self.config.address, amount)
    }
}
