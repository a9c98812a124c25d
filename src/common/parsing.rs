// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@mitander.dev>

use alloy::primitives::{Address, U256};
use std::str::FromStr;

pub fn strip_0x(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

fn has_hex_prefix(s: &str) -> bool {
    s.starts_with("0x") || s.starts_with("0X")
}

pub fn parse_address_hex(s: &str) -> Option<Address> {
    let raw = strip_0x(s.trim());
    if raw.len() != 40 {
        return None;
    }
    Address::from_str(raw).ok()
}

pub fn parse_u256_hex(s: &str) -> Option<U256> {
    let raw = strip_0x(s.trim());
    if raw.is_empty() || raw.len() > 64 {
        return None;
    }
    let padded = format!("{:0>64}", raw);
    let bytes = hex::decode(padded).ok()?;
    Some(U256::from_be_slice(&bytes))
}

/// Accepts `0x`-prefixed hex or plain decimal, with `_` separators.
pub fn parse_u256(s: &str) -> Option<U256> {
    let trimmed = s.trim();
    if has_hex_prefix(trimmed) {
        return parse_u256_hex(trimmed);
    }
    let digits: String = trimmed.chars().filter(|c| *c != '_').collect();
    if digits.is_empty() {
        return None;
    }
    U256::from_str_radix(&digits, 10).ok()
}

/// Comma- or space-separated ratio list, e.g. `"200000, 300000"`.
pub fn parse_ratio_list(s: &str) -> Option<Vec<u32>> {
    s.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(|part| part.replace('_', "").parse::<u32>().ok())
        .collect()
}
