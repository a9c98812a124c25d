// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::domain::error::ConvertError;
use crate::domain::route::ConversionRoute;
use crate::infrastructure::ledger::Ledger;
use crate::services::converter::executor::PathExecutor;
use alloy::primitives::{Address, U256};

/// Runs a route hop by hop. Intermediate outputs land back in engine
/// custody; only the final hop pays `recipient`.
#[derive(Clone)]
pub struct MultiHopRouter {
    executor: PathExecutor,
}

impl MultiHopRouter {
    pub fn new(executor: PathExecutor) -> Self {
        Self { executor }
    }

    pub fn executor(&self) -> &PathExecutor {
        &self.executor
    }

    /// Consumes `amount_in` already held by the engine. Any hop failure or
    /// a final output below `min_amount_out` undoes the whole route.
    pub fn run(
        &self,
        ledger: &mut Ledger,
        route: &ConversionRoute,
        amount_in: U256,
        min_amount_out: U256,
        recipient: Address,
    ) -> Result<U256, ConvertError> {
        ledger.atomic(|ledger| {
            let amount_out = self.run_hops(ledger, route, amount_in, recipient)?;
            if amount_out < min_amount_out {
                tracing::warn!(
                    target: "router",
                    min = %min_amount_out,
                    actual = %amount_out,
                    "route output below minimum"
                );
                return Err(ConvertError::InsufficientOutput {
                    min: min_amount_out,
                    actual: amount_out,
                });
            }
            Ok(amount_out)
        })
    }

    fn run_hops(
        &self,
        ledger: &mut Ledger,
        route: &ConversionRoute,
        amount_in: U256,
        recipient: Address,
    ) -> Result<U256, ConvertError> {
        let engine = self.executor.engine();
        let last = route.len() - 1;
        let mut amount = amount_in;
        for (index, hop) in route.hops().iter().enumerate() {
            let to = if index == last { recipient } else { engine };
            amount = self
                .executor
                .execute(ledger, hop, amount, to)
                .inspect_err(|err| {
                    tracing::debug!(target: "router", hop = index, error = %err, "route aborted");
                })?;
            tracing::trace!(target: "router", hop = index, amount = %amount, "hop complete");
        }
        Ok(amount)
    }

    /// Chains estimates hop by hop against the current state. A hop that
    /// estimates to zero ends the chain with zero.
    pub fn query(
        &self,
        ledger: &Ledger,
        route: &ConversionRoute,
        amount_in: U256,
    ) -> Result<U256, ConvertError> {
        let mut amount = amount_in;
        for hop in route.hops() {
            if amount.is_zero() {
                break;
            }
            amount = self.executor.query(ledger, hop, amount)?;
        }
        Ok(amount)
    }
}
