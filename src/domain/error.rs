// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::domain::hint::{Action, VenueType};
use alloy::primitives::{Address, U256};
use thiserror::Error;

/// Failure kinds raised by the conversion engine.
///
/// Every error aborts the enclosing call; the engine never retries.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConvertError {
    #[error("Unsupported venue type: {0}")]
    UnsupportedVenueType(u8),

    #[error("Unsupported action {action:?} for venue type {venue_type:?}")]
    UnsupportedAction {
        venue_type: VenueType,
        action: Action,
    },

    #[error("Unsupported protocol selector: {0}")]
    UnsupportedProtocol(u8),

    #[error("Unsupported pool: {0:#x}")]
    UnsupportedPool(Address),

    #[error("No adapter registered for venue type {0:?}")]
    NoAdapterRegistered(VenueType),

    #[error("Insufficient output. Minimum: {min}, Actual: {actual}")]
    InsufficientOutput { min: U256, actual: U256 },

    #[error("Fund transfer of {asset:#x} to {to:#x} failed")]
    FundTransferFailed { asset: Address, to: Address },

    #[error("Insufficient balance of {asset:#x} held by {holder:#x}. Required: {required}, Available: {available}")]
    InsufficientBalance {
        asset: Address,
        holder: Address,
        required: U256,
        available: U256,
    },

    #[error("Field {field} does not fit in {bits} bits")]
    FieldOverflow { field: &'static str, bits: u32 },

    #[error("Invalid action tag: {0}")]
    InvalidActionTag(u8),

    #[error("Invalid route: {0}")]
    InvalidRoute(String),

    #[error("Invalid split instruction: {0}")]
    InvalidSplit(String),

    #[error("Caller {0:#x} is not the administrator")]
    Unauthorized(Address),

    #[error("Venue {venue:#x} rejected the operation: {reason}")]
    Venue { venue: Address, reason: String },

    #[error("Residual balance of {asset:#x} left at {holder:#x}: {amount}")]
    ResidualBalance {
        holder: Address,
        asset: Address,
        amount: U256,
    },

    #[error("Arithmetic overflow in {0}")]
    ArithmeticOverflow(&'static str),
}

impl ConvertError {
    pub fn venue(venue: Address, reason: impl Into<String>) -> Self {
        ConvertError::Venue {
            venue,
            reason: reason.into(),
        }
    }

    /// `true` for kinds that will fail identically on every retry
    /// (configuration or venue-combination problems), `false` for kinds
    /// that depend on market state.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            ConvertError::UnsupportedVenueType(_)
                | ConvertError::UnsupportedAction { .. }
                | ConvertError::UnsupportedProtocol(_)
                | ConvertError::UnsupportedPool(_)
                | ConvertError::NoAdapterRegistered(_)
                | ConvertError::FieldOverflow { .. }
                | ConvertError::InvalidActionTag(_)
                | ConvertError::Unauthorized(_)
        )
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation failed for field {field}: {message}")]
    Validation { field: String, message: String },

    #[error(transparent)]
    Convert(#[from] ConvertError),

    #[error(transparent)]
    Unknown(#[from] anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}
