// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::domain::error::ConvertError;
use crate::domain::hint::{Action, ConversionHint, VenueType, extra};
use crate::infrastructure::ledger::Ledger;
use crate::infrastructure::venues::staking::StakingVenue;
use crate::services::converter::adapter::{AssetPair, Capability, VenueAdapter, WRAP_UNWRAP};
use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

pub const CAPABILITIES: &[Capability] = &[Capability::new(VenueType::LiquidStaking, WRAP_UNWRAP)];

/// Staking protocol selector carried in the low byte of `extra`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum StakingProtocol {
    Lido = 0,
    WstEth = 1,
    FrxEthMinter = 2,
    SfrxEth = 3,
    REth = 4,
}

impl TryFrom<u8> for StakingProtocol {
    type Error = ConvertError;

    fn try_from(selector: u8) -> Result<Self, Self::Error> {
        match selector {
            0 => Ok(StakingProtocol::Lido),
            1 => Ok(StakingProtocol::WstEth),
            2 => Ok(StakingProtocol::FrxEthMinter),
            3 => Ok(StakingProtocol::SfrxEth),
            4 => Ok(StakingProtocol::REth),
            other => Err(ConvertError::UnsupportedProtocol(other)),
        }
    }
}

/// Several staking protocols behind one venue type. `AddLiquidity`
/// stakes or wraps; `RemoveLiquidity` unstakes where the protocol allows.
pub struct LiquidStakingAdapter {
    address: Address,
    protocols: HashMap<StakingProtocol, Arc<dyn StakingVenue>>,
}

impl LiquidStakingAdapter {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            protocols: HashMap::new(),
        }
    }

    pub fn with_protocol(mut self, protocol: StakingProtocol, venue: Arc<dyn StakingVenue>) -> Self {
        self.protocols.insert(protocol, venue);
        self
    }

    fn lookup(&self, hint: &ConversionHint) -> Result<&Arc<dyn StakingVenue>, ConvertError> {
        let protocol = StakingProtocol::try_from(extra::protocol(hint.extra))?;
        let venue = self
            .protocols
            .get(&protocol)
            .ok_or(ConvertError::UnsupportedPool(hint.venue))?;
        if hint.action == Action::RemoveLiquidity && !venue.supports_unstake() {
            return Err(ConvertError::UnsupportedAction {
                venue_type: hint.venue_type,
                action: hint.action,
            });
        }
        if venue.address() != hint.venue {
            return Err(ConvertError::UnsupportedPool(hint.venue));
        }
        Ok(venue)
    }
}

impl VenueAdapter for LiquidStakingAdapter {
    fn name(&self) -> &'static str {
        "liquid-staking"
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
        match (hint.action, self.lookup(hint)) {
            (Action::AddLiquidity, Ok(venue)) => AssetPair::new(venue.underlying(), venue.derivative()),
            (Action::RemoveLiquidity, Ok(venue)) => AssetPair::new(venue.derivative(), venue.underlying()),
            _ => AssetPair::UNKNOWN,
        }
    }

    fn estimate(
        &self,
        ledger: &Ledger,
        hint: &ConversionHint,
        amount_in: U256,
    ) -> Result<U256, ConvertError> {
        self.supports(hint)?;
        let venue = self.lookup(hint)?;
        if hint.action == Action::AddLiquidity {
            venue.preview_stake(ledger, amount_in)
        } else {
            venue.preview_unstake(ledger, amount_in)
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
        let venue = self.lookup(hint)?;
        if hint.action == Action::AddLiquidity {
            venue.stake(ledger, self.address, amount_in, recipient)
        } else {
            venue.unstake(ledger, self.address, amount_in, recipient)
        }
    }
}
