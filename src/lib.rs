// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>
#![allow(clippy::too_many_arguments)]

pub mod app;
pub mod common;
pub mod domain;
pub mod infrastructure;
pub mod services;

pub use domain::error::{AppError, ConvertError};
pub use domain::hint::{Action, ConversionHint, VenueType};
pub use domain::route::ConversionRoute;
pub use domain::split::{RatioBasis, SplitInstruction, SplitLayout};
pub use infrastructure::ledger::Ledger;
pub use services::converter::{ConversionEngine, ConverterRegistry, EngineConfig, VenueAdapter};
