// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::domain::error::ConvertError;
use crate::domain::hint::{Action, ConversionHint, VenueType};
use crate::infrastructure::ledger::Ledger;
use alloy::primitives::{Address, U256};
use serde::Serialize;

/// One supported venue type and the actions allowed on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Capability {
    pub venue_type: VenueType,
    pub actions: &'static [Action],
}

impl Capability {
    pub const fn new(venue_type: VenueType, actions: &'static [Action]) -> Self {
        Self {
            venue_type,
            actions,
        }
    }
}

pub const ALL_ACTIONS: &[Action] = &[Action::Swap, Action::AddLiquidity, Action::RemoveLiquidity];
pub const SWAP_ONLY: &[Action] = &[Action::Swap];
pub const WRAP_UNWRAP: &[Action] = &[Action::AddLiquidity, Action::RemoveLiquidity];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct AssetPair {
    pub input: Address,
    pub output: Address,
}

impl AssetPair {
    /// Returned by `resolve_pair` when the hint names nothing the adapter knows.
    pub const UNKNOWN: AssetPair = AssetPair {
        input: Address::ZERO,
        output: Address::ZERO,
    };

    pub fn new(input: Address, output: Address) -> Self {
        Self { input, output }
    }

    pub fn is_known(&self) -> bool {
        *self != Self::UNKNOWN
    }
}

/// Venue-family conversion logic.
///
/// `execute` is entered with `amount_in` of the input asset already held
/// at [`VenueAdapter::address`]; it must consume all of it and deliver the
/// output to `recipient`. `estimate` reads the same state and must return
/// exactly what `execute` would produce.
pub trait VenueAdapter: Send + Sync {
    fn name(&self) -> &'static str;

    /// Custody address the executor funds before each hop.
    fn address(&self) -> Address;

    fn capabilities(&self) -> &'static [Capability];

    fn declares(&self, venue_type: VenueType) -> bool {
        self.capabilities()
            .iter()
            .any(|cap| cap.venue_type == venue_type)
    }

    /// Checks a hint in fixed order: venue type, action, then whatever
    /// [`VenueAdapter::validate`] adds (protocol selector, concrete venue).
    fn supports(&self, hint: &ConversionHint) -> Result<(), ConvertError> {
        let capability = self
            .capabilities()
            .iter()
            .find(|cap| cap.venue_type == hint.venue_type)
            .ok_or(ConvertError::UnsupportedVenueType(hint.venue_type.tag()))?;
        if !capability.actions.contains(&hint.action) {
            return Err(ConvertError::UnsupportedAction {
                venue_type: hint.venue_type,
                action: hint.action,
            });
        }
        self.validate(hint)
    }

    /// Adapter-specific checks run after the capability table passes.
    fn validate(&self, _hint: &ConversionHint) -> Result<(), ConvertError> {
        Ok(())
    }

    fn resolve_pair(&self, hint: &ConversionHint) -> AssetPair;

    fn estimate(
        &self,
        ledger: &Ledger,
        hint: &ConversionHint,
        amount_in: U256,
    ) -> Result<U256, ConvertError>;

    fn execute(
        &self,
        ledger: &mut Ledger,
        hint: &ConversionHint,
        amount_in: U256,
        recipient: Address,
    ) -> Result<U256, ConvertError>;
}

/// Reads an index-addressed slot, rejecting hints whose declared token
/// count or indices do not match the venue.
pub(crate) fn indexed_asset(
    assets: &[Address],
    hint: &ConversionHint,
    index: u8,
) -> Result<Address, ConvertError> {
    if hint.token_count as usize != assets.len() {
        return Err(ConvertError::UnsupportedPool(hint.venue));
    }
    assets
        .get(index as usize)
        .copied()
        .ok_or(ConvertError::UnsupportedPool(hint.venue))
}

/// Pair for index-addressed venues with a pool share token.
pub(crate) fn indexed_pair(
    assets: &[Address],
    share: Address,
    hint: &ConversionHint,
) -> Result<AssetPair, ConvertError> {
    match hint.action {
        Action::Swap => {
            if hint.input_index == hint.output_index {
                return Err(ConvertError::UnsupportedPool(hint.venue));
            }
            Ok(AssetPair::new(
                indexed_asset(assets, hint, hint.input_index)?,
                indexed_asset(assets, hint, hint.output_index)?,
            ))
        }
        Action::AddLiquidity => Ok(AssetPair::new(
            indexed_asset(assets, hint, hint.input_index)?,
            share,
        )),
        Action::RemoveLiquidity => Ok(AssetPair::new(
            share,
            indexed_asset(assets, hint, hint.output_index)?,
        )),
    }
}
