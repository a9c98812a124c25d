// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@mitander.dev>

use alloy::primitives::{Address, U256};
use clap::{Parser, Subcommand};
use oxidity_converter::app::config::Settings;
use oxidity_converter::app::logging::setup_logging;
use oxidity_converter::common::parsing::{parse_address_hex, parse_ratio_list, parse_u256};
use oxidity_converter::domain::constants::DEFAULT_REGISTRY_ADDRESS;
use oxidity_converter::domain::error::AppError;
use oxidity_converter::services::converter::adapter::Capability;
use oxidity_converter::services::converter::adapters::{
    balancer, curve, liquid_staking, native_wrap, uniswap_v2, uniswap_v3, vault_share,
};
use oxidity_converter::{
    Action, ConversionEngine, ConversionHint, ConverterRegistry, EngineConfig, RatioBasis,
    SplitInstruction, SplitLayout, VenueType,
};
use std::sync::Arc;
use serde_json::json;

#[derive(Parser, Debug)]
#[command(author, version, about = "oxidity conversion engine tooling")]
struct Cli {
    /// Path to config file (default: config.{toml,yaml,...})
    #[arg(long)]
    config: Option<String>,

    /// Emit logs as JSON (overrides config/env)
    #[arg(long)]
    json_logs: Option<bool>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode a 256-bit hint word
    Decode {
        #[arg(value_parser = word_arg)]
        word: U256,
    },
    /// Pack a hint into its 256-bit word
    Encode {
        #[arg(long, value_parser = address_arg)]
        venue: Address,
        /// Numeric tag or name, e.g. `4` or `curve_plain`
        #[arg(long)]
        venue_type: VenueType,
        #[arg(long, default_value = "swap")]
        action: Action,
        #[arg(long, default_value_t = 0)]
        input_index: u8,
        #[arg(long, default_value_t = 1)]
        output_index: u8,
        #[arg(long, default_value_t = 0)]
        token_count: u8,
        #[arg(long, default_value_t = 0)]
        extra: u128,
    },
    /// Encode ratios (or decode a split word) and partition an amount
    Split {
        #[arg(long, value_parser = word_arg)]
        amount: U256,
        /// Comma-separated ratios for every branch but the last
        #[arg(long, conflicts_with = "word")]
        ratios: Option<String>,
        /// Existing split word to decode
        #[arg(long, value_parser = word_arg)]
        word: Option<U256>,
        /// `remaining` or `total` (defaults to the configured basis)
        #[arg(long, value_parser = basis_arg)]
        basis: Option<RatioBasis>,
        /// Ratio slot width (defaults to the configured width)
        #[arg(long)]
        ratio_bits: Option<u8>,
    },
    /// Print the (venue type, action) table of every built-in adapter
    Capabilities,
}

fn word_arg(s: &str) -> Result<U256, String> {
    parse_u256(s).ok_or_else(|| format!("invalid 256-bit value: {s}"))
}

fn address_arg(s: &str) -> Result<Address, String> {
    parse_address_hex(s).ok_or_else(|| format!("invalid address: {s}"))
}

fn basis_arg(s: &str) -> Result<RatioBasis, String> {
    match s.to_ascii_lowercase().as_str() {
        "remaining" => Ok(RatioBasis::Remaining),
        "total" => Ok(RatioBasis::Total),
        _ => Err(format!("unknown ratio basis: {s}")),
    }
}

fn print_json(value: &serde_json::Value) -> Result<(), AppError> {
    let rendered = serde_json::to_string_pretty(value).map_err(anyhow::Error::from)?;
    println!("{rendered}");
    Ok(())
}

/// The tooling runs without an admin identity, so a missing config only
/// matters when the caller named one explicitly.
fn load_settings(path: Option<&str>) -> Result<Option<Settings>, AppError> {
    match Settings::load_with_path(path) {
        Ok(settings) => Ok(Some(settings)),
        Err(err) if path.is_some() => Err(err),
        Err(_) => Ok(None),
    }
}

/// Engine wired to the configured identities. Without a config the
/// built-in defaults apply and the registry has no admin.
fn build_engine(settings: Option<&Settings>) -> Result<ConversionEngine, AppError> {
    let (config, registry) = match settings {
        Some(s) => (
            s.engine_config()?,
            ConverterRegistry::new(s.registry_address, s.admin_address),
        ),
        None => (
            EngineConfig::default(),
            ConverterRegistry::new(DEFAULT_REGISTRY_ADDRESS, Address::ZERO),
        ),
    };
    Ok(ConversionEngine::new(config, Arc::new(registry)))
}

fn capability_rows() -> Vec<(&'static str, &'static [Capability])> {
    vec![
        ("uniswap-v2", uniswap_v2::CAPABILITIES),
        ("uniswap-v3", uniswap_v3::CAPABILITIES),
        ("balancer", balancer::CAPABILITIES),
        ("curve", curve::CAPABILITIES),
        ("liquid-staking", liquid_staking::CAPABILITIES),
        ("native-wrap", native_wrap::CAPABILITIES),
        ("vault-share", vault_share::CAPABILITIES),
    ]
}

fn main() -> Result<(), AppError> {
    let cli = Cli::parse();
    let settings = load_settings(cli.config.as_deref())?;

    let log_level = settings
        .as_ref()
        .map(|s| s.log_filter().to_string())
        .unwrap_or_else(|| "info".to_string());
    let json_logs = cli
        .json_logs
        .or(settings.as_ref().map(|s| s.json_logs))
        .unwrap_or(false);
    setup_logging(&log_level, json_logs);

    match cli.command {
        Command::Decode { word } => {
            let hint = ConversionHint::decode(word)?;
            tracing::debug!(target: "converter", venue = %format!("{:#x}", hint.venue), "hint decoded");
            print_json(&json!(hint))
        }
        Command::Encode {
            venue,
            venue_type,
            action,
            input_index,
            output_index,
            token_count,
            extra,
        } => {
            let word = ConversionHint::new(venue, venue_type, action)
                .with_indices(input_index, output_index)
                .with_token_count(token_count)
                .with_extra(extra)
                .encode()?;
            println!("{word:#x}");
            Ok(())
        }
        Command::Split {
            amount,
            ratios,
            word,
            basis,
            ratio_bits,
        } => {
            let engine = build_engine(settings.as_ref())?;
            let configured = engine.config();
            let layout = match ratio_bits {
                Some(bits) => SplitLayout::new(bits)?,
                None => configured.split_layout,
            };
            let basis = basis.unwrap_or(configured.ratio_basis);
            let split = match (word, ratios) {
                (Some(word), _) if ratio_bits.is_none() => engine.decode_split(word)?,
                (Some(word), _) => SplitInstruction::decode(word, layout)?,
                (None, Some(list)) => {
                    let ratios = parse_ratio_list(&list).ok_or_else(|| AppError::Validation {
                        field: "ratios".into(),
                        message: format!("invalid ratio list: {list}"),
                    })?;
                    SplitInstruction::new(ratios, layout)?
                }
                (None, None) => SplitInstruction::single(layout),
            };
            tracing::debug!(
                target: "converter",
                engine = %format!("{:#x}", engine.address()),
                registry = %format!("{:#x}", engine.registry().address()),
                "split evaluated"
            );
            let amounts = split.partition(amount, basis)?;
            print_json(&json!({
                "word": format!("{:#x}", split.encode()?),
                "ratio_bits": layout.ratio_bits(),
                "basis": basis,
                "route_count": split.route_count(),
                "ratios": split.ratios(),
                "amounts": amounts.iter().map(|a| a.to_string()).collect::<Vec<_>>(),
            }))
        }
        Command::Capabilities => {
            let rows: Vec<_> = capability_rows()
                .into_iter()
                .map(|(adapter, caps)| json!({ "adapter": adapter, "capabilities": caps }))
                .collect();
            print_json(&json!(rows))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn engine_without_config_uses_default_identities() {
        let engine = build_engine(None).unwrap();
        assert_eq!(engine.config(), &EngineConfig::default());
        assert_eq!(engine.registry().address(), DEFAULT_REGISTRY_ADDRESS);
        assert_eq!(engine.registry().admin(), Address::ZERO);
    }

    #[test]
    fn split_flags_parse() {
        let cli = Cli::try_parse_from([
            "convertctl",
            "split",
            "--amount",
            "1000000",
            "--ratios",
            "200000,300000",
            "--basis",
            "total",
        ])
        .unwrap();
        match cli.command {
            Command::Split { amount, ratios, basis, .. } => {
                assert_eq!(amount, U256::from(1_000_000u64));
                assert_eq!(ratios.as_deref(), Some("200000,300000"));
                assert_eq!(basis, Some(RatioBasis::Total));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
