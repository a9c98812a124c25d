// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use alloy::primitives::{Address, U256, address};

// =============================================================================
// ASSETS
// =============================================================================

/// Sentinel address standing for the chain's native asset.
pub const NATIVE_ASSET: Address = address!("eeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee");

pub const WETH_MAINNET: Address = address!("c02aaa39b223fe8d0a0e5c4f27ead9083c756cc2");
pub const STETH_MAINNET: Address = address!("ae7ab96520de3a18e5e111b5eaab095312d7fe84");
pub const WSTETH_MAINNET: Address = address!("7f39c581f595b53c5cb19bd0b3f8da6c935e2ca0");
pub const FRXETH_MAINNET: Address = address!("5e8422345238f34275888049021821e8e08caa1f");
pub const SFRXETH_MAINNET: Address = address!("ac3e018457b222d93114458476f3e3416abbe38f");

// =============================================================================
// ENGINE IDENTITIES
// =============================================================================

pub const DEFAULT_ENGINE_ADDRESS: Address = address!("00000000000000000000000000000000000c0de1");
pub const DEFAULT_REGISTRY_ADDRESS: Address =
    address!("00000000000000000000000000000000000c0de2");

// =============================================================================
// VENUE MATH
// =============================================================================

/// Uniswap V2 swap fee, in thousandths.
pub const UNISWAP_V2_FEE_NUMERATOR: u64 = 997;
pub const UNISWAP_V2_FEE_DENOMINATOR: u64 = 1_000;

/// Uniswap V3 fee tiers are expressed in hundredths of a basis point. A hint
/// may only name one of the factory's enabled tiers.
pub const UNISWAP_V3_FEE_DENOMINATOR: u64 = 1_000_000;
pub const UNISWAP_V3_FEE_TIERS: [u32; 4] = [100, 500, 3_000, 10_000];

/// Curve fees are 1e10-scaled.
pub const CURVE_FEE_DENOMINATOR: u64 = 10_000_000_000;

pub const WAD: u128 = 1_000_000_000_000_000_000;

pub fn wad() -> U256 {
    U256::from(WAD)
}
