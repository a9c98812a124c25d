// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

//! Fan-out split instructions.
//!
//! A split carries a route count and one fixed-point ratio per branch,
//! expressed in parts per `2^ratio_bits`. The final branch always takes
//! whatever is left, so integer rounding never strands dust.

use crate::domain::codec::BitField;
use crate::domain::error::ConvertError;
use alloy::primitives::U256;
use serde::{Deserialize, Serialize};

pub const ROUTE_COUNT_FIELD: BitField = BitField::new("route_count", 0, 8);
pub const DEFAULT_RATIO_BITS: u8 = 20;
pub const MAX_RATIO_BITS: u8 = 32;

/// Which balance a branch ratio is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatioBasis {
    /// `branch = remaining * ratio / 2^bits`, then `remaining -= branch`.
    #[default]
    Remaining,
    /// `branch = total * ratio / 2^bits`, capped by what is left.
    Total,
}

/// Width of each ratio slot in the split word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitLayout {
    ratio_bits: u8,
}

impl Default for SplitLayout {
    fn default() -> Self {
        Self {
            ratio_bits: DEFAULT_RATIO_BITS,
        }
    }
}

impl SplitLayout {
    pub fn new(ratio_bits: u8) -> Result<Self, ConvertError> {
        if ratio_bits == 0 || ratio_bits > MAX_RATIO_BITS {
            return Err(ConvertError::InvalidSplit(format!(
                "ratio width {ratio_bits} outside 1..={MAX_RATIO_BITS}"
            )));
        }
        Ok(Self { ratio_bits })
    }

    pub fn ratio_bits(&self) -> u8 {
        self.ratio_bits
    }

    /// Fixed-point denominator, `2^ratio_bits`.
    pub fn denominator(&self) -> u64 {
        1u64 << self.ratio_bits
    }

    /// "All remaining balance".
    pub fn sentinel(&self) -> u32 {
        (self.denominator() - 1) as u32
    }

    pub fn max_routes(&self) -> usize {
        ((256 - ROUTE_COUNT_FIELD.bits) / self.ratio_bits as u32) as usize
    }

    fn ratio_field(&self, index: usize) -> BitField {
        let bits = self.ratio_bits as u32;
        BitField::new("ratio", ROUTE_COUNT_FIELD.end() + index as u32 * bits, bits)
    }
}

/// Route count plus the ratios of the first `N - 1` branches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitInstruction {
    ratios: Vec<u32>,
    layout: SplitLayout,
}

impl SplitInstruction {
    pub fn new(ratios: Vec<u32>, layout: SplitLayout) -> Result<Self, ConvertError> {
        let route_count = ratios.len() + 1;
        if route_count > layout.max_routes() || route_count > u8::MAX as usize {
            return Err(ConvertError::InvalidSplit(format!(
                "{route_count} routes exceed the capacity of {} for {}-bit ratios",
                layout.max_routes(),
                layout.ratio_bits()
            )));
        }
        if let Some(bad) = ratios.iter().find(|r| **r > layout.sentinel()) {
            return Err(ConvertError::InvalidSplit(format!(
                "ratio {bad} exceeds {}-bit width",
                layout.ratio_bits()
            )));
        }
        Ok(Self { ratios, layout })
    }

    /// A single branch receiving the entire input.
    pub fn single(layout: SplitLayout) -> Self {
        Self {
            ratios: Vec::new(),
            layout,
        }
    }

    pub fn route_count(&self) -> usize {
        self.ratios.len() + 1
    }

    pub fn ratios(&self) -> &[u32] {
        &self.ratios
    }

    pub fn layout(&self) -> SplitLayout {
        self.layout
    }

    pub fn encode(&self) -> Result<U256, ConvertError> {
        let mut word = ROUTE_COUNT_FIELD.write_u64(U256::ZERO, self.route_count() as u64)?;
        for (i, ratio) in self.ratios.iter().enumerate() {
            word = self.layout.ratio_field(i).write_u64(word, *ratio as u64)?;
        }
        let last = self.layout.ratio_field(self.ratios.len());
        last.write_u64(word, self.layout.sentinel() as u64)
    }

    /// Decodes a split word. The final slot is read but ignored: the last
    /// branch always receives the remainder.
    pub fn decode(word: U256, layout: SplitLayout) -> Result<Self, ConvertError> {
        let route_count = ROUTE_COUNT_FIELD.read_u64(word) as usize;
        if route_count == 0 {
            return Err(ConvertError::InvalidSplit("route count is zero".into()));
        }
        if route_count > layout.max_routes() {
            return Err(ConvertError::InvalidSplit(format!(
                "{route_count} routes exceed the capacity of {}",
                layout.max_routes()
            )));
        }
        let ratios = (0..route_count - 1)
            .map(|i| layout.ratio_field(i).read_u64(word) as u32)
            .collect();
        Self::new(ratios, layout)
    }

    /// Splits `total` into per-branch amounts. The result always has
    /// `route_count()` entries summing exactly to `total`.
    pub fn partition(&self, total: U256, basis: RatioBasis) -> Result<Vec<U256>, ConvertError> {
        let denominator = U256::from(self.layout.denominator());
        let sentinel = self.layout.sentinel();
        let mut remaining = total;
        let mut amounts = Vec::with_capacity(self.route_count());

        for ratio in &self.ratios {
            let amount = if *ratio == sentinel {
                remaining
            } else {
                let base = match basis {
                    RatioBasis::Remaining => remaining,
                    RatioBasis::Total => total,
                };
                let share = base
                    .checked_mul(U256::from(*ratio))
                    .ok_or(ConvertError::ArithmeticOverflow("split partition"))?
                    / denominator;
                if share > remaining {
                    return Err(ConvertError::InvalidSplit(
                        "ratios exceed the total input".into(),
                    ));
                }
                share
            };
            remaining -= amount;
            amounts.push(amount);
        }
        amounts.push(remaining);
        Ok(amounts)
    }
}
