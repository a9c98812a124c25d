// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::domain::error::ConvertError;
use crate::domain::hint::ConversionHint;
use crate::infrastructure::ledger::Ledger;
use crate::services::converter::adapter::{AssetPair, VenueAdapter};
use crate::services::converter::registry::ConverterRegistry;
use alloy::primitives::{Address, U256};
use std::sync::Arc;

/// Single-hop dispatch from engine custody through the registry.
#[derive(Clone)]
pub struct PathExecutor {
    engine: Address,
    registry: Arc<ConverterRegistry>,
}

impl PathExecutor {
    pub fn new(engine: Address, registry: Arc<ConverterRegistry>) -> Self {
        Self { engine, registry }
    }

    pub fn engine(&self) -> Address {
        self.engine
    }

    pub fn registry(&self) -> &Arc<ConverterRegistry> {
        &self.registry
    }

    /// Read-only estimate. An adapter that does not handle the hint's venue
    /// type or action yields `0` so discovery code can probe every
    /// combination; a missing registration or an unknown protocol or pool
    /// still fails.
    pub fn query(
        &self,
        ledger: &Ledger,
        hint: &ConversionHint,
        amount_in: U256,
    ) -> Result<U256, ConvertError> {
        let adapter = self.registry.resolve(hint.venue_type)?;
        match adapter.estimate(ledger, hint, amount_in) {
            Ok(amount_out) => Ok(amount_out),
            Err(err @ (ConvertError::UnsupportedVenueType(_) | ConvertError::UnsupportedAction { .. })) => {
                tracing::debug!(
                    target: "converter",
                    venue = %format!("{:#x}", hint.venue),
                    venue_type = %hint.venue_type,
                    error = %err,
                    "query probe unsupported"
                );
                Ok(U256::ZERO)
            }
            Err(err) => Err(err),
        }
    }

    /// Input and output assets of a hop, or the error the hop would fail with.
    pub fn resolve_pair(&self, hint: &ConversionHint) -> Result<AssetPair, ConvertError> {
        let adapter = self.registry.resolve(hint.venue_type)?;
        adapter.supports(hint)?;
        let pair = adapter.resolve_pair(hint);
        if !pair.is_known() {
            return Err(ConvertError::UnsupportedPool(hint.venue));
        }
        Ok(pair)
    }

    /// Moves `amount_in` from engine custody into the adapter and runs the
    /// hop. Not atomic on its own: callers wrap it in [`Ledger::atomic`].
    pub fn execute(
        &self,
        ledger: &mut Ledger,
        hint: &ConversionHint,
        amount_in: U256,
        recipient: Address,
    ) -> Result<U256, ConvertError> {
        let adapter = self.registry.resolve(hint.venue_type)?;
        adapter.supports(hint)?;
        let pair = adapter.resolve_pair(hint);
        if !pair.is_known() {
            return Err(ConvertError::UnsupportedPool(hint.venue));
        }
        let holder = adapter.address();
        let input_baseline = ledger.balance_of(pair.input, holder);
        let output_before = ledger.balance_of(pair.output, recipient);

        ledger.transfer(pair.input, self.engine, holder, amount_in)?;
        let amount_out = adapter.execute(ledger, hint, amount_in, recipient)?;

        check_settlement(ledger, adapter.as_ref(), pair, input_baseline, output_before, amount_out, recipient)?;
        tracing::debug!(
            target: "converter",
            adapter = adapter.name(),
            venue = %format!("{:#x}", hint.venue),
            action = ?hint.action,
            amount_in = %amount_in,
            amount_out = %amount_out,
            "hop settled"
        );
        Ok(amount_out)
    }
}

fn check_settlement(
    ledger: &Ledger,
    adapter: &dyn VenueAdapter,
    pair: AssetPair,
    input_baseline: U256,
    output_before: U256,
    amount_out: U256,
    recipient: Address,
) -> Result<(), ConvertError> {
    let holder = adapter.address();
    let input_now = ledger.balance_of(pair.input, holder);
    if input_now > input_baseline {
        return Err(ConvertError::ResidualBalance {
            holder,
            asset: pair.input,
            amount: input_now - input_baseline,
        });
    }
    let received = ledger
        .balance_of(pair.output, recipient)
        .saturating_sub(output_before);
    if received != amount_out {
        return Err(ConvertError::venue(
            holder,
            format!(
                "{} reported {} but recipient received {}",
                adapter.name(),
                amount_out,
                received
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::hint::{Action, VenueType};
    use crate::services::converter::adapter::{Capability, SWAP_ONLY};
    use crate::services::converter::adapters::UniswapV2Adapter;
    use crate::infrastructure::venues::uniswap_v2::SimV2Pair;

    fn addr(byte: u8) -> Address {
        Address::repeat_byte(byte)
    }

    const ADMIN: u8 = 0xad;
    const ENGINE: u8 = 0xe0;

    /// Takes the input and keeps half of it.
    struct Leaky;

    impl VenueAdapter for Leaky {
        fn name(&self) -> &'static str {
            "leaky"
        }

        fn address(&self) -> Address {
            addr(0xbb)
        }

        fn capabilities(&self) -> &'static [Capability] {
            const CAPS: &[Capability] = &[Capability::new(VenueType::CurveCrypto, SWAP_ONLY)];
            CAPS
        }

        fn resolve_pair(&self, _: &ConversionHint) -> AssetPair {
            AssetPair::new(addr(1), addr(2))
        }

        fn estimate(&self, _: &Ledger, _: &ConversionHint, amount_in: U256) -> Result<U256, ConvertError> {
            Ok(amount_in)
        }

        fn execute(
            &self,
            ledger: &mut Ledger,
            _: &ConversionHint,
            amount_in: U256,
            recipient: Address,
        ) -> Result<U256, ConvertError> {
            let half = amount_in / U256::from(2u8);
            ledger.burn(addr(1), self.address(), half)?;
            ledger.mint(addr(2), recipient, half)?;
            Ok(half)
        }
    }

    fn executor() -> (Ledger, PathExecutor) {
        let mut ledger = Ledger::new();
        let pair = SimV2Pair::new(addr(0x10), addr(1), addr(2));
        pair.seed(&mut ledger, U256::from(1_000_000u64), U256::from(1_000_000u64))
            .unwrap();
        let registry = Arc::new(ConverterRegistry::new(addr(0xc2), addr(ADMIN)));
        registry
            .register(
                addr(ADMIN),
                VenueType::UniswapV2,
                Arc::new(UniswapV2Adapter::new(addr(0xa2)).with_pair(Arc::new(pair))),
            )
            .unwrap();
        registry
            .register(addr(ADMIN), VenueType::CurveCrypto, Arc::new(Leaky))
            .unwrap();
        (ledger, PathExecutor::new(addr(ENGINE), registry))
    }

    #[test]
    fn query_zeroes_unsupported_actions_but_execute_fails() {
        let (mut ledger, executor) = executor();
        let hint = ConversionHint::new(addr(0x10), VenueType::UniswapV2, Action::AddLiquidity);
        assert_eq!(executor.query(&ledger, &hint, U256::from(100u64)), Ok(U256::ZERO));

        ledger.mint(addr(1), addr(ENGINE), U256::from(100u64)).unwrap();
        assert!(matches!(
            executor.execute(&mut ledger, &hint, U256::from(100u64), addr(9)),
            Err(ConvertError::UnsupportedAction { .. })
        ));
        assert_eq!(ledger.balance_of(addr(1), addr(ENGINE)), U256::from(100u64));
    }

    #[test]
    fn query_propagates_missing_registration_and_unknown_pool() {
        let (ledger, executor) = executor();
        let unregistered = ConversionHint::new(addr(0x10), VenueType::LiquidStaking, Action::AddLiquidity);
        assert_eq!(
            executor.query(&ledger, &unregistered, U256::from(1u64)),
            Err(ConvertError::NoAdapterRegistered(VenueType::LiquidStaking))
        );
        let unknown = ConversionHint::swap(addr(0x11), VenueType::UniswapV2, 0, 1);
        assert_eq!(
            executor.query(&ledger, &unknown, U256::from(1u64)),
            Err(ConvertError::UnsupportedPool(addr(0x11)))
        );
    }

    #[test]
    fn execute_matches_query_and_leaves_nothing_behind() {
        let (mut ledger, executor) = executor();
        let hint = ConversionHint::swap(addr(0x10), VenueType::UniswapV2, 0, 1);
        ledger.mint(addr(1), addr(ENGINE), U256::from(1_000u64)).unwrap();
        let quoted = executor.query(&ledger, &hint, U256::from(1_000u64)).unwrap();
        let out = executor
            .execute(&mut ledger, &hint, U256::from(1_000u64), addr(9))
            .unwrap();
        assert_eq!(out, quoted);
        assert_eq!(ledger.balance_of(addr(1), addr(ENGINE)), U256::ZERO);
        assert_eq!(ledger.balance_of(addr(1), addr(0xa2)), U256::ZERO);
    }

    #[test]
    fn residual_input_in_adapter_is_detected() {
        let (mut ledger, executor) = executor();
        let hint = ConversionHint::swap(addr(0x20), VenueType::CurveCrypto, 0, 1);
        ledger.mint(addr(1), addr(ENGINE), U256::from(10u64)).unwrap();
        assert_eq!(
            executor.execute(&mut ledger, &hint, U256::from(10u64), addr(9)),
            Err(ConvertError::ResidualBalance {
                holder: addr(0xbb),
                asset: addr(1),
                amount: U256::from(5u64)
            })
        );
    }
}
