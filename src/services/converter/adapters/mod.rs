// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

pub mod balancer;
pub mod curve;
pub mod liquid_staking;
pub mod native_wrap;
pub mod uniswap_v2;
pub mod uniswap_v3;
pub mod vault_share;

pub use balancer::BalancerAdapter;
pub use curve::CurveAdapter;
pub use liquid_staking::{LiquidStakingAdapter, StakingProtocol};
pub use native_wrap::NativeWrapAdapter;
pub use uniswap_v2::UniswapV2Adapter;
pub use uniswap_v3::UniswapV3Adapter;
pub use vault_share::VaultShareAdapter;
