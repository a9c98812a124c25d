// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@mitander.dev>

use crate::domain::constants::{DEFAULT_ENGINE_ADDRESS, DEFAULT_REGISTRY_ADDRESS};
use crate::domain::error::AppError;
use crate::domain::split::{DEFAULT_RATIO_BITS, MAX_RATIO_BITS, RatioBasis, SplitLayout};
use crate::services::converter::EngineConfig;
use alloy::primitives::Address;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    // General
    #[serde(default = "default_false")]
    pub debug: bool,
    #[serde(default = "default_false")]
    pub json_logs: bool,
    /// Bare level or full `EnvFilter` directive string.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    // Identities
    pub admin_address: Address,
    #[serde(default = "default_engine_address")]
    pub engine_address: Address,
    #[serde(default = "default_registry_address")]
    pub registry_address: Address,

    // Fan-out
    #[serde(default = "default_split_ratio_bits")]
    pub split_ratio_bits: u8,
    #[serde(default)]
    pub split_ratio_basis: RatioBasis,
}

fn default_false() -> bool {
    false
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_engine_address() -> Address {
    DEFAULT_ENGINE_ADDRESS
}

fn default_registry_address() -> Address {
    DEFAULT_REGISTRY_ADDRESS
}

fn default_split_ratio_bits() -> u8 {
    DEFAULT_RATIO_BITS
}

impl Settings {
    pub fn load_with_path(path: Option<&str>) -> Result<Self, AppError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let mut builder = Config::builder();
        if let Some(selected_path) = path {
            builder = builder.add_source(File::from(Path::new(selected_path)).required(true));
        } else {
            builder = builder.add_source(File::with_name("config").required(false));
        }
        // Precedence: CLI (in main) > env/.env > config file.
        builder = builder.add_source(Environment::default());

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        tracing::debug!(
            target: "config",
            engine = %format!("{:#x}", settings.engine_address),
            registry = %format!("{:#x}", settings.registry_address),
            ratio_bits = settings.split_ratio_bits,
            basis = ?settings.split_ratio_basis,
            "settings loaded"
        );
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.admin_address == Address::ZERO {
            return Err(AppError::Validation {
                field: "admin_address".into(),
                message: "ADMIN_ADDRESS is missing or zero".into(),
            });
        }
        if self.engine_address == self.registry_address {
            return Err(AppError::Validation {
                field: "registry_address".into(),
                message: "engine and registry must hold funds at distinct addresses".into(),
            });
        }
        if self.split_ratio_bits == 0 || self.split_ratio_bits > MAX_RATIO_BITS {
            return Err(AppError::Validation {
                field: "split_ratio_bits".into(),
                message: format!(
                    "{} is outside 1..={MAX_RATIO_BITS}",
                    self.split_ratio_bits
                ),
            });
        }
        Ok(())
    }

    pub fn split_layout(&self) -> Result<SplitLayout, AppError> {
        Ok(SplitLayout::new(self.split_ratio_bits)?)
    }

    pub fn engine_config(&self) -> Result<EngineConfig, AppError> {
        Ok(EngineConfig {
            address: self.engine_address,
            split_layout: self.split_layout()?,
            ratio_basis: self.split_ratio_basis,
        })
    }

    /// `debug` forces debug level regardless of `log_level`.
    pub fn log_filter(&self) -> &str {
        if self.debug { "debug" } else { &self.log_level }
    }
}
