// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

pub mod adapter;
pub mod adapters;
pub mod engine;
pub mod executor;
pub mod fan_out;
pub mod multi_hop;
pub mod registry;

pub use adapter::{AssetPair, Capability, VenueAdapter};
pub use engine::{ConversionEngine, EngineConfig};
pub use executor::PathExecutor;
pub use fan_out::FanOutRouter;
pub use multi_hop::MultiHopRouter;
pub use registry::ConverterRegistry;
