// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>
#![allow(dead_code)]

use alloy::primitives::{Address, U256, address};
use oxidity_converter::domain::constants::{
    DEFAULT_REGISTRY_ADDRESS, NATIVE_ASSET, SFRXETH_MAINNET, FRXETH_MAINNET, WETH_MAINNET,
};
use oxidity_converter::domain::hint::extra;
use oxidity_converter::infrastructure::venues::balancer::{PoolCurve, SimBalancerVault, SimPool};
use oxidity_converter::infrastructure::venues::curve::SimStableSwapPool;
use oxidity_converter::infrastructure::venues::erc4626::SimShareVault;
use oxidity_converter::infrastructure::venues::uniswap_v2::SimV2Pair;
use oxidity_converter::infrastructure::venues::uniswap_v3::SimV3Pool;
use oxidity_converter::infrastructure::venues::wrapped_native::SimWrappedNative;
use oxidity_converter::services::converter::adapters::{
    BalancerAdapter, CurveAdapter, NativeWrapAdapter, UniswapV2Adapter, UniswapV3Adapter,
    VaultShareAdapter,
};
use oxidity_converter::{
    Action, ConversionEngine, ConversionHint, ConversionRoute, ConverterRegistry, EngineConfig,
    Ledger, RatioBasis, VenueType,
};
use std::sync::Arc;

pub const TOKEN_X: Address = address!("0101010101010101010101010101010101010101");
pub const TOKEN_Y: Address = address!("0202020202020202020202020202020202020202");
pub const TOKEN_Z: Address = address!("0303030303030303030303030303030303030303");
pub const TOKEN_W: Address = address!("0404040404040404040404040404040404040404");

pub const V2_PAIR_XZ: Address = address!("1010101010101010101010101010101010101010");
pub const V3_POOL_YZ: Address = address!("3030303030303030303030303030303030303030");
pub const CURVE_POOL: Address = address!("4040404040404040404040404040404040404040");
pub const CURVE_LP: Address = address!("4141414141414141414141414141414141414141");
pub const BALANCER_POOL_XZ: Address = address!("5050505050505050505050505050505050505050");
pub const BALANCER_VAULT: Address = address!("b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0");

pub const ADAPTER_V2: Address = address!("a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0");
pub const ADAPTER_V3: Address = address!("a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1");
pub const ADAPTER_BALANCER: Address = address!("a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2");
pub const ADAPTER_CURVE: Address = address!("a3a3a3a3a3a3a3a3a3a3a3a3a3a3a3a3a3a3a3a3");
pub const ADAPTER_STAKING: Address = address!("a4a4a4a4a4a4a4a4a4a4a4a4a4a4a4a4a4a4a4a4");
pub const ADAPTER_WRAP: Address = address!("a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5");
pub const ADAPTER_VAULT: Address = address!("a6a6a6a6a6a6a6a6a6a6a6a6a6a6a6a6a6a6a6a6");

pub const ADMIN: Address = address!("adadadadadadadadadadadadadadadadadadadad");
pub const PAYER: Address = address!("cacacacacacacacacacacacacacacacacacacaca");
pub const RECIPIENT: Address = address!("dededededededededededededededededededede");
pub const LIQUIDITY_PROVIDER: Address = address!("9999999999999999999999999999999999999999");

pub const V3_FEE: u32 = 3_000;

pub fn units(n: u64) -> U256 {
    U256::from(n)
}

pub fn depth() -> U256 {
    U256::from(1_000_000_000_000u64)
}

/// Seeded venues and an engine with every family registered except
/// liquid staking (venue type 7).
pub struct World {
    pub ledger: Ledger,
    pub registry: Arc<ConverterRegistry>,
    pub engine: ConversionEngine,
}

impl World {
    pub fn new() -> Self {
        Self::with_basis(RatioBasis::default())
    }

    pub fn with_basis(basis: RatioBasis) -> Self {
        let mut ledger = Ledger::new();
        let registry = Arc::new(ConverterRegistry::new(DEFAULT_REGISTRY_ADDRESS, ADMIN));

        let pair = SimV2Pair::new(V2_PAIR_XZ, TOKEN_X, TOKEN_Z);
        pair.seed(&mut ledger, depth(), depth()).unwrap();
        let v2 = UniswapV2Adapter::new(ADAPTER_V2).with_pair(Arc::new(pair));

        let pool = SimV3Pool::new(V3_POOL_YZ, TOKEN_Y, TOKEN_Z, V3_FEE);
        pool.seed(&mut ledger, depth(), depth()).unwrap();
        let v3 = UniswapV3Adapter::new(ADAPTER_V3).with_pool(Arc::new(pool));

        let curve_pool = SimStableSwapPool::new(
            CURVE_POOL,
            vec![TOKEN_X, TOKEN_Y, TOKEN_W],
            CURVE_LP,
            200,
            4_000_000,
        );
        curve_pool
            .seed(&mut ledger, &[depth(), depth(), depth()], LIQUIDITY_PROVIDER)
            .unwrap();
        let curve = CurveAdapter::new(ADAPTER_CURVE).with_pool(VenueType::CurvePlain, Arc::new(curve_pool));

        let mut vault = SimBalancerVault::new(BALANCER_VAULT);
        let pool_id = vault.register_pool(SimPool {
            address: BALANCER_POOL_XZ,
            tokens: vec![TOKEN_X, TOKEN_Z],
            curve: PoolCurve::Weighted(vec![0.5, 0.5]),
            swap_fee: U256::from(3_000_000_000_000_000u64),
        });
        vault
            .seed(&mut ledger, pool_id, &[depth(), depth()], LIQUIDITY_PROVIDER)
            .unwrap();
        let balancer = BalancerAdapter::new(ADAPTER_BALANCER, Arc::new(vault))
            .with_pool(VenueType::BalancerWeighted, BALANCER_POOL_XZ);

        let wrap = NativeWrapAdapter::new(ADAPTER_WRAP).with_wrapper(Arc::new(SimWrappedNative::new(WETH_MAINNET)));
        let vault_share = VaultShareAdapter::new(ADAPTER_VAULT)
            .with_vault(Arc::new(SimShareVault::new(SFRXETH_MAINNET, FRXETH_MAINNET)));

        registry.register(ADMIN, VenueType::UniswapV2, Arc::new(v2)).unwrap();
        registry.register(ADMIN, VenueType::UniswapV3, Arc::new(v3)).unwrap();
        registry.register(ADMIN, VenueType::CurvePlain, Arc::new(curve)).unwrap();
        registry
            .register(ADMIN, VenueType::BalancerWeighted, Arc::new(balancer))
            .unwrap();
        registry.register(ADMIN, VenueType::NativeWrap, Arc::new(wrap)).unwrap();
        registry
            .register(ADMIN, VenueType::VaultShare, Arc::new(vault_share))
            .unwrap();

        let config = EngineConfig {
            ratio_basis: basis,
            ..EngineConfig::default()
        };
        let engine = ConversionEngine::new(config, Arc::clone(&registry));
        Self {
            ledger,
            registry,
            engine,
        }
    }

    /// Gives the payer `amount` of `asset` to route.
    pub fn fund_payer(&mut self, asset: Address, amount: U256) {
        self.ledger.mint(asset, PAYER, amount).unwrap();
    }

    pub fn balance(&self, asset: Address, holder: Address) -> U256 {
        self.ledger.balance_of(asset, holder)
    }
}

pub fn curve_swap_x_to_y() -> ConversionHint {
    ConversionHint::swap(CURVE_POOL, VenueType::CurvePlain, 0, 1).with_token_count(3)
}

pub fn v3_swap_y_to_z() -> ConversionHint {
    ConversionHint::swap(V3_POOL_YZ, VenueType::UniswapV3, 0, 1).with_extra(extra::with_fee_tier(V3_FEE))
}

pub fn v2_swap_x_to_z() -> ConversionHint {
    ConversionHint::swap(V2_PAIR_XZ, VenueType::UniswapV2, 0, 1)
}

pub fn balancer_swap_x_to_z() -> ConversionHint {
    ConversionHint::swap(BALANCER_POOL_XZ, VenueType::BalancerWeighted, 0, 1).with_token_count(2)
}

/// X -> Y on Curve, then Y -> Z on Uniswap V3.
pub fn curve_then_v3() -> ConversionRoute {
    ConversionRoute::new(vec![curve_swap_x_to_y(), v3_swap_y_to_z()]).unwrap()
}

pub fn wrap_native() -> ConversionHint {
    ConversionHint::new(WETH_MAINNET, VenueType::NativeWrap, Action::AddLiquidity)
}

pub fn unwrap_native() -> ConversionHint {
    ConversionHint::new(WETH_MAINNET, VenueType::NativeWrap, Action::RemoveLiquidity)
}

pub const NATIVE: Address = NATIVE_ASSET;
