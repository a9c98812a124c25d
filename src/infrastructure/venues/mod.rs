// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

pub mod balancer;
pub mod curve;
pub mod erc4626;
pub mod stableswap;
pub mod staking;
pub mod uniswap_v2;
pub mod uniswap_v3;
pub mod wrapped_native;
