// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

mod common;

use alloy::primitives::{Address, U256};
use common::*;
use oxidity_converter::domain::hint::extra;
use oxidity_converter::{
    ConversionHint, ConversionRoute, ConvertError, RatioBasis, SplitInstruction, SplitLayout,
    VenueType,
};

#[test]
fn curve_then_v3_route_matches_chained_quote() {
    let mut world = World::new();
    let amount = units(1_000);
    world.fund_payer(TOKEN_X, amount);
    let route = curve_then_v3();

    let quoted = world.engine.query_route(&world.ledger, &route, amount).unwrap();
    let first_leg = world
        .engine
        .query(&world.ledger, &curve_swap_x_to_y(), amount)
        .unwrap();
    let second_leg = world
        .engine
        .query(&world.ledger, &v3_swap_y_to_z(), first_leg)
        .unwrap();
    assert_eq!(quoted, second_leg);

    let out = world
        .engine
        .run_route(&mut world.ledger, PAYER, &route, amount, U256::ZERO, RECIPIENT)
        .unwrap();
    assert_eq!(out, quoted);
    assert!(out > units(990) && out < amount);
    assert_eq!(world.balance(TOKEN_Z, RECIPIENT), out);
    assert_eq!(world.balance(TOKEN_X, PAYER), U256::ZERO);
}

#[test]
fn unregistered_venue_type_fails_for_query_and_execute() {
    let mut world = World::new();
    world.fund_payer(NATIVE, units(10));
    let hint = ConversionHint::new(
        Address::repeat_byte(0x70),
        VenueType::LiquidStaking,
        oxidity_converter::Action::AddLiquidity,
    );
    assert_eq!(
        world.engine.query(&world.ledger, &hint, units(10)),
        Err(ConvertError::NoAdapterRegistered(VenueType::LiquidStaking))
    );
    let before = world.ledger.clone();
    assert_eq!(
        world
            .engine
            .execute(&mut world.ledger, PAYER, &hint, units(10), RECIPIENT),
        Err(ConvertError::NoAdapterRegistered(VenueType::LiquidStaking))
    );
    assert_eq!(world.ledger, before);
}

fn three_way_branches() -> Vec<ConversionRoute> {
    vec![
        ConversionRoute::single(v2_swap_x_to_z()),
        ConversionRoute::single(balancer_swap_x_to_z()),
        curve_then_v3(),
    ]
}

fn three_way_split() -> SplitInstruction {
    SplitInstruction::new(vec![200_000, 300_000], SplitLayout::default()).unwrap()
}

fn assert_fan_out_branches(basis: RatioBasis, expected: [u64; 3]) {
    let mut world = World::with_basis(basis);
    let total = units(1_000_000);
    world.fund_payer(TOKEN_X, total);
    let split = three_way_split();
    let branches = three_way_branches();

    let quoted = world
        .engine
        .query_split_route(&world.ledger, total, &split, &branches)
        .unwrap();
    let v2_before = world.balance(TOKEN_X, V2_PAIR_XZ);
    let balancer_before = world.balance(TOKEN_X, BALANCER_POOL_XZ);
    let curve_before = world.balance(TOKEN_X, CURVE_POOL);

    let word = split.encode().unwrap();
    let decoded = world.engine.decode_split(word).unwrap();
    let out = world
        .engine
        .run_split_route(&mut world.ledger, PAYER, total, &decoded, &branches, U256::ZERO, RECIPIENT)
        .unwrap();

    assert_eq!(out, quoted);
    assert_eq!(world.balance(TOKEN_Z, RECIPIENT), out);
    assert_eq!(world.balance(TOKEN_X, V2_PAIR_XZ) - v2_before, units(expected[0]));
    assert_eq!(
        world.balance(TOKEN_X, BALANCER_POOL_XZ) - balancer_before,
        units(expected[1])
    );
    assert_eq!(world.balance(TOKEN_X, CURVE_POOL) - curve_before, units(expected[2]));
    assert_eq!(expected.iter().sum::<u64>(), 1_000_000);

    let engine = world.engine.address();
    for asset in [TOKEN_X, TOKEN_Y, TOKEN_Z] {
        assert_eq!(world.balance(asset, engine), U256::ZERO);
        for adapter in [ADAPTER_V2, ADAPTER_BALANCER, ADAPTER_CURVE, ADAPTER_V3] {
            assert_eq!(world.balance(asset, adapter), U256::ZERO, "{adapter}");
        }
    }
}

#[test]
fn fan_out_against_total_reproduces_reference_amounts() {
    assert_fan_out_branches(RatioBasis::Total, [190_734, 286_102, 523_164]);
}

#[test]
fn fan_out_against_remaining_applies_ratios_sequentially() {
    assert_fan_out_branches(RatioBasis::Remaining, [190_734, 231_532, 577_734]);
}

#[test]
fn min_out_one_above_achievable_reverts_everything() {
    let mut world = World::new();
    let amount = units(50_000);
    world.fund_payer(TOKEN_X, amount);
    let route = curve_then_v3();
    let achievable = world.engine.query_route(&world.ledger, &route, amount).unwrap();
    let before = world.ledger.clone();

    let result = world.engine.run_route(
        &mut world.ledger,
        PAYER,
        &route,
        amount,
        achievable + units(1),
        RECIPIENT,
    );
    assert_eq!(
        result,
        Err(ConvertError::InsufficientOutput {
            min: achievable + units(1),
            actual: achievable,
        })
    );
    assert_eq!(world.ledger, before);

    let out = world
        .engine
        .run_route(&mut world.ledger, PAYER, &route, amount, achievable, RECIPIENT)
        .unwrap();
    assert_eq!(out, achievable);
}

#[test]
fn split_min_out_is_checked_on_the_aggregate() {
    let mut world = World::new();
    let total = units(1_000_000);
    world.fund_payer(TOKEN_X, total);
    let split = three_way_split();
    let branches = three_way_branches();
    let quoted = world
        .engine
        .query_split_route(&world.ledger, total, &split, &branches)
        .unwrap();
    let before = world.ledger.clone();

    assert!(matches!(
        world.engine.run_split_route(
            &mut world.ledger,
            PAYER,
            total,
            &split,
            &branches,
            quoted + units(1),
            RECIPIENT
        ),
        Err(ConvertError::InsufficientOutput { .. })
    ));
    assert_eq!(world.ledger, before);
}

#[test]
fn failing_later_hop_undoes_earlier_hops() {
    let mut world = World::new();
    let amount = units(10_000);
    world.fund_payer(TOKEN_X, amount);
    let wrong_tier = ConversionHint::swap(V3_POOL_YZ, VenueType::UniswapV3, 0, 1)
        .with_extra(extra::with_fee_tier(500));
    let route = ConversionRoute::new(vec![curve_swap_x_to_y(), wrong_tier]).unwrap();
    let before = world.ledger.clone();

    assert_eq!(
        world
            .engine
            .run_route(&mut world.ledger, PAYER, &route, amount, U256::ZERO, RECIPIENT),
        Err(ConvertError::UnsupportedPool(V3_POOL_YZ))
    );
    assert_eq!(world.ledger, before);
}

#[test]
fn engine_and_adapters_hold_nothing_after_a_route() {
    let mut world = World::new();
    let amount = units(25_000);
    world.fund_payer(TOKEN_X, amount);
    world
        .engine
        .run_route(&mut world.ledger, PAYER, &curve_then_v3(), amount, U256::ZERO, RECIPIENT)
        .unwrap();

    let engine = world.engine.address();
    for asset in [TOKEN_X, TOKEN_Y, TOKEN_Z] {
        assert_eq!(world.balance(asset, engine), U256::ZERO);
        for adapter in [ADAPTER_CURVE, ADAPTER_V3] {
            assert_eq!(world.balance(asset, adapter), U256::ZERO);
        }
    }
}

#[test]
fn wrap_then_unwrap_round_trips_native() {
    let mut world = World::new();
    let amount = units(3_000);
    world.fund_payer(NATIVE, amount);
    let route = ConversionRoute::new(vec![wrap_native(), unwrap_native()]).unwrap();
    let out = world
        .engine
        .run_route(&mut world.ledger, PAYER, &route, amount, amount, RECIPIENT)
        .unwrap();
    assert_eq!(out, amount);
    assert_eq!(world.balance(NATIVE, RECIPIENT), amount);
}

#[test]
fn unwrap_to_a_rejecting_recipient_rolls_back() {
    let mut world = World::new();
    let amount = units(3_000);
    world.fund_payer(NATIVE, amount);
    let route = ConversionRoute::new(vec![wrap_native(), unwrap_native()]).unwrap();
    world.ledger.reject_native(RECIPIENT);
    let before = world.ledger.clone();

    assert!(matches!(
        world
            .engine
            .run_route(&mut world.ledger, PAYER, &route, amount, U256::ZERO, RECIPIENT),
        Err(ConvertError::FundTransferFailed { .. })
    ));
    assert_eq!(world.ledger, before);
}
