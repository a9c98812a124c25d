// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::domain::error::ConvertError;
use crate::domain::hint::VenueType;
use crate::infrastructure::ledger::Ledger;
use crate::services::converter::adapter::VenueAdapter;
use alloy::primitives::{Address, U256};
use dashmap::DashMap;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Venue-type to adapter mapping. Mutated only through the admin-gated
/// [`ConverterRegistry::register`]; routes only ever read it.
pub struct ConverterRegistry {
    address: Address,
    admin: Address,
    adapters: DashMap<VenueType, Arc<dyn VenueAdapter>>,
}

impl ConverterRegistry {
    pub fn new(address: Address, admin: Address) -> Self {
        Self {
            address,
            admin,
            adapters: DashMap::new(),
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn admin(&self) -> Address {
        self.admin
    }

    fn ensure_admin(&self, caller: Address) -> Result<(), ConvertError> {
        if caller != self.admin {
            tracing::warn!(
                target: "registry",
                caller = %format!("{:#x}", caller),
                "rejected administrative call"
            );
            return Err(ConvertError::Unauthorized(caller));
        }
        Ok(())
    }

    /// Maps `venue_type` to `adapter`, returning whatever it replaced.
    /// Overwriting is always allowed.
    pub fn register(
        &self,
        caller: Address,
        venue_type: VenueType,
        adapter: Arc<dyn VenueAdapter>,
    ) -> Result<Option<Arc<dyn VenueAdapter>>, ConvertError> {
        self.ensure_admin(caller)?;
        if !adapter.declares(venue_type) {
            tracing::warn!(
                target: "registry",
                venue_type = %venue_type,
                adapter = adapter.name(),
                "adapter does not declare this venue type; every hop will be rejected"
            );
        }
        let name = adapter.name();
        let previous = self.adapters.insert(venue_type, adapter);
        tracing::info!(
            target: "registry",
            venue_type = %venue_type,
            adapter = name,
            replaced = previous.as_ref().map(|p| p.name()).unwrap_or("none"),
            "adapter registered"
        );
        Ok(previous)
    }

    pub fn resolve(&self, venue_type: VenueType) -> Result<Arc<dyn VenueAdapter>, ConvertError> {
        self.adapters
            .get(&venue_type)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or(ConvertError::NoAdapterRegistered(venue_type))
    }

    pub fn is_registered(&self, venue_type: VenueType) -> bool {
        self.adapters.contains_key(&venue_type)
    }

    /// Current mappings ordered by venue-type tag.
    pub fn entries(&self) -> Vec<(VenueType, Arc<dyn VenueAdapter>)> {
        let mut entries: Vec<_> = self
            .adapters
            .iter()
            .map(|entry| (*entry.key(), Arc::clone(entry.value())))
            .collect();
        entries.sort_by_key(|(venue_type, _)| *venue_type);
        entries
    }

    /// Sweeps every unit of `asset` held by the registry or any registered
    /// adapter to `to`. All-or-nothing: a rejected native transfer undoes
    /// the sweeps already made.
    pub fn withdraw_fund(
        &self,
        caller: Address,
        ledger: &mut Ledger,
        asset: Address,
        to: Address,
    ) -> Result<U256, ConvertError> {
        self.ensure_admin(caller)?;
        let mut holders = BTreeSet::new();
        holders.insert(self.address);
        for (_, adapter) in self.entries() {
            holders.insert(adapter.address());
        }
        let swept = ledger.atomic(|ledger| {
            holders.iter().try_fold(U256::ZERO, |total, holder| {
                Ok::<_, ConvertError>(total + ledger.sweep(asset, *holder, to)?)
            })
        })?;
        tracing::info!(
            target: "registry",
            asset = %format!("{:#x}", asset),
            to = %format!("{:#x}", to),
            amount = %swept,
            "funds withdrawn"
        );
        Ok(swept)
    }
}
