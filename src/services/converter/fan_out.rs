// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::domain::error::ConvertError;
use crate::domain::route::ConversionRoute;
use crate::domain::split::{RatioBasis, SplitInstruction};
use crate::infrastructure::ledger::Ledger;
use crate::services::converter::multi_hop::MultiHopRouter;
use alloy::primitives::{Address, U256};

/// Splits one input across parallel routes that converge on one asset.
#[derive(Clone)]
pub struct FanOutRouter {
    multi_hop: MultiHopRouter,
    basis: RatioBasis,
}

impl FanOutRouter {
    pub fn new(multi_hop: MultiHopRouter, basis: RatioBasis) -> Self {
        Self { multi_hop, basis }
    }

    pub fn basis(&self) -> RatioBasis {
        self.basis
    }

    /// Branch count must match the split, and every branch whose assets
    /// resolve must start from the same input and end in the same output.
    pub fn validate(
        &self,
        split: &SplitInstruction,
        branches: &[ConversionRoute],
    ) -> Result<(), ConvertError> {
        if branches.len() != split.route_count() {
            return Err(ConvertError::InvalidSplit(format!(
                "{} branch routes for a {}-way split",
                branches.len(),
                split.route_count()
            )));
        }
        let executor = self.multi_hop.executor();
        let inputs = branches
            .iter()
            .filter_map(|route| executor.resolve_pair(route.first()).ok())
            .map(|pair| pair.input);
        ensure_single("input", inputs)?;
        let outputs = branches
            .iter()
            .filter_map(|route| executor.resolve_pair(route.last()).ok())
            .map(|pair| pair.output);
        ensure_single("output", outputs)
    }

    /// Consumes `total_in` already held by the engine. Branch outputs are
    /// summed and checked against `min_amount_out` once all have settled.
    pub fn run(
        &self,
        ledger: &mut Ledger,
        total_in: U256,
        split: &SplitInstruction,
        branches: &[ConversionRoute],
        min_amount_out: U256,
        recipient: Address,
    ) -> Result<U256, ConvertError> {
        self.validate(split, branches)?;
        let amounts = split.partition(total_in, self.basis)?;
        ledger.atomic(|ledger| {
            let mut total_out = U256::ZERO;
            for (index, (route, amount)) in branches.iter().zip(&amounts).enumerate() {
                if amount.is_zero() {
                    tracing::debug!(target: "router", branch = index, "skipping empty branch");
                    continue;
                }
                let out = self
                    .multi_hop
                    .run(ledger, route, *amount, U256::ZERO, recipient)?;
                tracing::debug!(
                    target: "router",
                    branch = index,
                    amount_in = %amount,
                    amount_out = %out,
                    "branch settled"
                );
                total_out = total_out
                    .checked_add(out)
                    .ok_or(ConvertError::ArithmeticOverflow("fan-out total"))?;
            }
            if total_out < min_amount_out {
                return Err(ConvertError::InsufficientOutput {
                    min: min_amount_out,
                    actual: total_out,
                });
            }
            Ok(total_out)
        })
    }

    /// Sum of chained branch estimates for the same partition `run` uses.
    pub fn query(
        &self,
        ledger: &Ledger,
        total_in: U256,
        split: &SplitInstruction,
        branches: &[ConversionRoute],
    ) -> Result<U256, ConvertError> {
        self.validate(split, branches)?;
        let amounts = split.partition(total_in, self.basis)?;
        branches
            .iter()
            .zip(amounts)
            .try_fold(U256::ZERO, |total, (route, amount)| {
                Ok::<_, ConvertError>(total + self.multi_hop.query(ledger, route, amount)?)
            })
    }
}

fn ensure_single(side: &str, mut assets: impl Iterator<Item = Address>) -> Result<(), ConvertError> {
    let Some(first) = assets.next() else {
        return Ok(());
    };
    match assets.find(|asset| *asset != first) {
        Some(other) => Err(ConvertError::InvalidSplit(format!(
            "branches disagree on {side} asset: {first:#x} vs {other:#x}"
        ))),
        None => Ok(()),
    }
}
