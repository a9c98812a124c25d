// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

//! Bit-level packing of fixed-width fields into a 256-bit word.
//!
//! All shifting and masking for instruction words happens here. Writers
//! reject values wider than their slot; readers mask and never fail.

use crate::domain::error::ConvertError;
use alloy::primitives::U256;

/// A named slice `[offset, offset + bits)` of a 256-bit word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitField {
    pub name: &'static str,
    pub offset: u32,
    pub bits: u32,
}

impl BitField {
    pub const fn new(name: &'static str, offset: u32, bits: u32) -> Self {
        Self { name, offset, bits }
    }

    pub const fn end(&self) -> u32 {
        self.offset + self.bits
    }

    pub fn mask(&self) -> U256 {
        if self.bits >= 256 {
            U256::MAX
        } else {
            (U256::from(1u8) << self.bits as usize) - U256::from(1u8)
        }
    }

    /// Largest value the field can carry.
    pub fn max_value(&self) -> U256 {
        self.mask()
    }

    pub fn read(&self, word: U256) -> U256 {
        (word >> self.offset as usize) & self.mask()
    }

    pub fn read_u64(&self, word: U256) -> u64 {
        // Fields narrower than 64 bits always fit.
        self.read(word).as_limbs()[0]
    }

    /// Writes `value` into the field, clearing whatever was there.
    pub fn write(&self, word: U256, value: U256) -> Result<U256, ConvertError> {
        if value > self.mask() {
            return Err(ConvertError::FieldOverflow {
                field: self.name,
                bits: self.bits,
            });
        }
        let cleared = word & !(self.mask() << self.offset as usize);
        Ok(cleared | (value << self.offset as usize))
    }

    pub fn write_u64(&self, word: U256, value: u64) -> Result<U256, ConvertError> {
        self.write(word, U256::from(value))
    }
}

/// Checks that `fields` tile `[0, 256)` without gaps or overlaps.
pub fn is_contiguous_layout(fields: &[BitField]) -> bool {
    let mut cursor = 0u32;
    for field in fields {
        if field.offset != cursor || field.bits == 0 {
            return false;
        }
        cursor = field.end();
    }
    cursor == 256
}
