// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::domain::constants::NATIVE_ASSET;
use crate::domain::error::ConvertError;
use crate::domain::hint::{Action, ConversionHint, VenueType};
use crate::infrastructure::ledger::Ledger;
use crate::infrastructure::venues::wrapped_native::WrappedNative;
use crate::services::converter::adapter::{AssetPair, Capability, VenueAdapter, WRAP_UNWRAP};
use alloy::primitives::{Address, U256};
use std::collections::HashMap;
use std::sync::Arc;

pub const CAPABILITIES: &[Capability] = &[Capability::new(VenueType::NativeWrap, WRAP_UNWRAP)];

pub struct NativeWrapAdapter {
    address: Address,
    wrappers: HashMap<Address, Arc<dyn WrappedNative>>,
}

impl NativeWrapAdapter {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            wrappers: HashMap::new(),
        }
    }

    pub fn with_wrapper(mut self, wrapper: Arc<dyn WrappedNative>) -> Self {
        self.wrappers.insert(wrapper.address(), wrapper);
        self
    }

    fn lookup(&self, hint: &ConversionHint) -> Result<&Arc<dyn WrappedNative>, ConvertError> {
        self.wrappers
            .get(&hint.venue)
            .ok_or(ConvertError::UnsupportedPool(hint.venue))
    }
}

impl VenueAdapter for NativeWrapAdapter {
    fn name(&self) -> &'static str {
        "native-wrap"
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
            (Action::AddLiquidity, Ok(w)) => AssetPair::new(NATIVE_ASSET, w.address()),
            (Action::RemoveLiquidity, Ok(w)) => AssetPair::new(w.address(), NATIVE_ASSET),
            _ => AssetPair::UNKNOWN,
        }
    }

    fn estimate(
        &self,
        _ledger: &Ledger,
        hint: &ConversionHint,
        amount_in: U256,
    ) -> Result<U256, ConvertError> {
        self.supports(hint)?;
        Ok(amount_in)
    }

    fn execute(
        &self,
        ledger: &mut Ledger,
        hint: &ConversionHint,
        amount_in: U256,
        recipient: Address,
    ) -> Result<U256, ConvertError> {
        self.supports(hint)?;
        let wrapper = self.lookup(hint)?;
        if hint.action == Action::AddLiquidity {
            wrapper.deposit(ledger, self.address, amount_in)?;
            ledger.transfer(wrapper.address(), self.address, recipient, amount_in)?;
        } else {
            wrapper.withdraw(ledger, self.address, amount_in)?;
            ledger.transfer(NATIVE_ASSET, self.address, recipient, amount_in)?;
        }
        Ok(amount_in)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::constants::WETH_MAINNET;
    use crate::infrastructure::venues::wrapped_native::SimWrappedNative;

    #[test]
    fn unwrap_to_rejecting_recipient_fails() {
        let adapter = NativeWrapAdapter::new(Address::repeat_byte(0xa7))
            .with_wrapper(Arc::new(SimWrappedNative::new(WETH_MAINNET)));
        let mut ledger = Ledger::new();
        let amount = U256::from(10u64);
        ledger.mint(NATIVE_ASSET, adapter.address(), amount).unwrap();

        let wrap = ConversionHint::new(WETH_MAINNET, VenueType::NativeWrap, Action::AddLiquidity);
        let out = adapter
            .execute(&mut ledger, &wrap, amount, adapter.address())
            .unwrap();
        assert_eq!(out, amount);

        let recipient = Address::repeat_byte(0x0c);
        ledger.reject_native(recipient);
        let unwrap = ConversionHint::new(WETH_MAINNET, VenueType::NativeWrap, Action::RemoveLiquidity);
        assert_eq!(
            adapter.execute(&mut ledger, &unwrap, amount, recipient),
            Err(ConvertError::FundTransferFailed {
                asset: NATIVE_ASSET,
                to: recipient
            })
        );
    }
}
