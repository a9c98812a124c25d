// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::domain::error::ConvertError;
use crate::domain::hint::{Action, ConversionHint, VenueType};
use crate::infrastructure::ledger::Ledger;
use crate::infrastructure::venues::erc4626::Erc4626Vault;
use crate::services::converter::adapter::{AssetPair, Capability, VenueAdapter, WRAP_UNWRAP};
use alloy::primitives::{Address, U256};
use std::collections::HashMap;
use std::sync::Arc;

pub const CAPABILITIES: &[Capability] = &[Capability::new(VenueType::VaultShare, WRAP_UNWRAP)];

/// Deposit into (`AddLiquidity`) or redeem from (`RemoveLiquidity`) a
/// tokenized vault.
pub struct VaultShareAdapter {
    address: Address,
    vaults: HashMap<Address, Arc<dyn Erc4626Vault>>,
}

impl VaultShareAdapter {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            vaults: HashMap::new(),
        }
    }

    pub fn with_vault(mut self, vault: Arc<dyn Erc4626Vault>) -> Self {
        self.vaults.insert(vault.address(), vault);
        self
    }

    fn lookup(&self, hint: &ConversionHint) -> Result<&Arc<dyn Erc4626Vault>, ConvertError> {
        self.vaults
            .get(&hint.venue)
            .ok_or(ConvertError::UnsupportedPool(hint.venue))
    }
}

impl VenueAdapter for VaultShareAdapter {
    fn name(&self) -> &'static str {
        "vault-share"
    }

    fn address(&self) -> Address {
        self.address
    }

    fn capabilities(&self) -> &'static [Capability] {
        CAPABILITIES
    }

    fn validate(&self, hint: &ConversionHint) -> Result<(), ConvertError> {
        self.lookup(hint).map(|_| ())
    }

    fn resolve_pair(&self, hint: &ConversionHint) -> AssetPair {
        match (hint.action, self.lookup(hint)) {
            (Action::AddLiquidity, Ok(v)) => AssetPair::new(v.asset(), v.address()),
            (Action::RemoveLiquidity, Ok(v)) => AssetPair::new(v.address(), v.asset()),
            _ => AssetPair::UNKNOWN,
        }
    }

    fn estimate(
        &self,
        ledger: &Ledger,
        hint: &ConversionHint,
        amount_in: U256,
    ) -> Result<U256, ConvertError> {
        self.supports(hint)?;
        let vault = self.lookup(hint)?;
        match hint.action {
            Action::AddLiquidity => vault.preview_deposit(ledger, amount_in),
            _ => vault.preview_redeem(ledger, amount_in),
        }
    }

    fn execute(
        &self,
        ledger: &mut Ledger,
        hint: &ConversionHint,
        amount_in: U256,
        recipient: Address,
    ) -> Result<U256, ConvertError> {
        self.supports(hint)?;
        let vault = self.lookup(hint)?;
        match hint.action {
            Action::AddLiquidity => vault.deposit(ledger, self.address, amount_in, recipient),
            _ => vault.redeem(ledger, self.address, amount_in, recipient),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::constants::{FRXETH_MAINNET, SFRXETH_MAINNET};
    use crate::infrastructure::venues::erc4626::SimShareVault;

    #[test]
    fn deposit_and_redeem_round_trip() {
        let vault = SimShareVault::new(SFRXETH_MAINNET, FRXETH_MAINNET);
        let adapter = VaultShareAdapter::new(Address::repeat_byte(0xa8)).with_vault(Arc::new(vault));
        let mut ledger = Ledger::new();
        let amount = U256::from(700u64);
        ledger.mint(FRXETH_MAINNET, adapter.address(), amount).unwrap();

        let deposit = ConversionHint::new(SFRXETH_MAINNET, VenueType::VaultShare, Action::AddLiquidity);
        assert_eq!(
            adapter.resolve_pair(&deposit),
            AssetPair::new(FRXETH_MAINNET, SFRXETH_MAINNET)
        );
        let shares = adapter
            .execute(&mut ledger, &deposit, amount, adapter.address())
            .unwrap();

        let redeem = ConversionHint::new(SFRXETH_MAINNET, VenueType::VaultShare, Action::RemoveLiquidity);
        let quoted = adapter.estimate(&ledger, &redeem, shares).unwrap();
        let assets = adapter
            .execute(&mut ledger, &redeem, shares, Address::repeat_byte(9))
            .unwrap();
        assert_eq!(assets, quoted);
        assert_eq!(assets, amount);
    }

    #[test]
    fn swap_is_not_a_vault_action() {
        let adapter = VaultShareAdapter::new(Address::repeat_byte(0xa8));
        let swap = ConversionHint::swap(SFRXETH_MAINNET, VenueType::VaultShare, 0, 1);
        assert_eq!(
            adapter.supports(&swap),
            Err(ConvertError::UnsupportedAction {
                venue_type: VenueType::VaultShare,
                action: Action::Swap
            })
        );
    }
}
