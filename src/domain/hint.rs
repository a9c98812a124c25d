// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

//! Single conversion step ("hint") and its 256-bit wire encoding.
//!
//! ```text
//! | 77 bits | 2 bits | 3 bits      | 3 bits       | 3 bits      | 160 bits | 8 bits     |
//! | extra   | action | token_count | output_index | input_index | venue    | venue_type |
//! ```

use crate::domain::codec::BitField;
use crate::domain::error::ConvertError;
use alloy::primitives::{Address, U160, U256};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const VENUE_TYPE_FIELD: BitField = BitField::new("venue_type", 0, 8);
pub const VENUE_FIELD: BitField = BitField::new("venue", 8, 160);
pub const INPUT_INDEX_FIELD: BitField = BitField::new("input_index", 168, 3);
pub const OUTPUT_INDEX_FIELD: BitField = BitField::new("output_index", 171, 3);
pub const TOKEN_COUNT_FIELD: BitField = BitField::new("token_count", 174, 3);
pub const ACTION_FIELD: BitField = BitField::new("action", 177, 2);
pub const EXTRA_FIELD: BitField = BitField::new("extra", 179, 77);

pub const HINT_LAYOUT: [BitField; 7] = [
    VENUE_TYPE_FIELD,
    VENUE_FIELD,
    INPUT_INDEX_FIELD,
    OUTPUT_INDEX_FIELD,
    TOKEN_COUNT_FIELD,
    ACTION_FIELD,
    EXTRA_FIELD,
];

/// Venue family tag. Selects the adapter that executes a hop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum VenueType {
    UniswapV2 = 0,
    UniswapV3 = 1,
    BalancerWeighted = 2,
    BalancerStable = 3,
    CurvePlain = 4,
    CurveStableNg = 5,
    CurveCrypto = 6,
    LiquidStaking = 7,
    NativeWrap = 8,
    VaultShare = 9,
}

impl VenueType {
    pub const ALL: [VenueType; 10] = [
        VenueType::UniswapV2,
        VenueType::UniswapV3,
        VenueType::BalancerWeighted,
        VenueType::BalancerStable,
        VenueType::CurvePlain,
        VenueType::CurveStableNg,
        VenueType::CurveCrypto,
        VenueType::LiquidStaking,
        VenueType::NativeWrap,
        VenueType::VaultShare,
    ];

    pub fn tag(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for VenueType {
    type Error = ConvertError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        VenueType::ALL
            .get(tag as usize)
            .copied()
            .ok_or(ConvertError::UnsupportedVenueType(tag))
    }
}

impl fmt::Display for VenueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Accepts a numeric tag or the snake_case name (`curve_plain`).
impl FromStr for VenueType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(tag) = s.parse::<u8>() {
            return VenueType::try_from(tag).map_err(|e| e.to_string());
        }
        serde_json::from_value(serde_json::Value::String(s.to_ascii_lowercase()))
            .map_err(|_| format!("unknown venue type: {s}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Action {
    Swap = 0,
    AddLiquidity = 1,
    RemoveLiquidity = 2,
}

impl Action {
    pub const ALL: [Action; 3] = [Action::Swap, Action::AddLiquidity, Action::RemoveLiquidity];

    pub fn tag(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Action {
    type Error = ConvertError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        Action::ALL
            .get(tag as usize)
            .copied()
            .ok_or(ConvertError::InvalidActionTag(tag))
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(tag) = s.parse::<u8>() {
            return Action::try_from(tag).map_err(|e| e.to_string());
        }
        match s.to_ascii_lowercase().as_str() {
            "swap" => Ok(Action::Swap),
            "add" | "add_liquidity" => Ok(Action::AddLiquidity),
            "remove" | "remove_liquidity" => Ok(Action::RemoveLiquidity),
            _ => Err(format!("unknown action: {s}")),
        }
    }
}

/// One decoded conversion step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversionHint {
    pub venue: Address,
    pub venue_type: VenueType,
    pub token_count: u8,
    pub input_index: u8,
    pub output_index: u8,
    pub action: Action,
    /// Venue-specific parameter block; only the low 77 bits are encodable.
    pub extra: u128,
}

impl ConversionHint {
    pub fn new(venue: Address, venue_type: VenueType, action: Action) -> Self {
        Self {
            venue,
            venue_type,
            token_count: 0,
            input_index: 0,
            output_index: 0,
            action,
            extra: 0,
        }
    }

    pub fn swap(venue: Address, venue_type: VenueType, input_index: u8, output_index: u8) -> Self {
        Self::new(venue, venue_type, Action::Swap).with_indices(input_index, output_index)
    }

    pub fn with_indices(mut self, input_index: u8, output_index: u8) -> Self {
        self.input_index = input_index;
        self.output_index = output_index;
        self
    }

    pub fn with_token_count(mut self, token_count: u8) -> Self {
        self.token_count = token_count;
        self
    }

    pub fn with_extra(mut self, extra: u128) -> Self {
        self.extra = extra;
        self
    }

    /// Packs the hint into its wire word, rejecting any field that does
    /// not fit its slot.
    pub fn encode(&self) -> Result<U256, ConvertError> {
        let mut word = U256::ZERO;
        word = VENUE_TYPE_FIELD.write_u64(word, self.venue_type.tag() as u64)?;
        word = VENUE_FIELD.write(word, U256::from(U160::from_be_slice(self.venue.as_slice())))?;
        word = INPUT_INDEX_FIELD.write_u64(word, self.input_index as u64)?;
        word = OUTPUT_INDEX_FIELD.write_u64(word, self.output_index as u64)?;
        word = TOKEN_COUNT_FIELD.write_u64(word, self.token_count as u64)?;
        word = ACTION_FIELD.write_u64(word, self.action.tag() as u64)?;
        word = EXTRA_FIELD.write(word, U256::from(self.extra))?;
        Ok(word)
    }

    /// Unpacks a wire word. Fails only for tags outside the closed
    /// venue-type and action sets.
    pub fn decode(word: U256) -> Result<Self, ConvertError> {
        let venue_type = VenueType::try_from(VENUE_TYPE_FIELD.read_u64(word) as u8)?;
        let action = Action::try_from(ACTION_FIELD.read_u64(word) as u8)?;
        let venue_bits: U160 = VENUE_FIELD.read(word).to();
        let extra = EXTRA_FIELD.read(word).to::<u128>();
        Ok(Self {
            venue: Address::from_slice(&venue_bits.to_be_bytes::<20>()),
            venue_type,
            token_count: TOKEN_COUNT_FIELD.read_u64(word) as u8,
            input_index: INPUT_INDEX_FIELD.read_u64(word) as u8,
            output_index: OUTPUT_INDEX_FIELD.read_u64(word) as u8,
            action,
            extra,
        })
    }
}

/// Accessors for the `extra` block conventions of individual families.
pub mod extra {
    /// Uniswap V3 fee tier, hundredths of a basis point (bits 0..24).
    pub const FEE_TIER_MASK: u128 = (1 << 24) - 1;
    /// Liquid-staking protocol selector (bits 0..8).
    pub const PROTOCOL_MASK: u128 = (1 << 8) - 1;

    pub fn fee_tier(extra: u128) -> u32 {
        (extra & FEE_TIER_MASK) as u32
    }

    pub fn with_fee_tier(fee: u32) -> u128 {
        fee as u128 & FEE_TIER_MASK
    }

    pub fn protocol(extra: u128) -> u8 {
        (extra & PROTOCOL_MASK) as u8
    }

    pub fn with_protocol(protocol: u8) -> u128 {
        protocol as u128
    }
}
