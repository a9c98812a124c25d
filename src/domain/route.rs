// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::domain::error::ConvertError;
use crate::domain::hint::ConversionHint;
use alloy::primitives::U256;
use serde::{Deserialize, Serialize};

/// Ordered, non-empty list of hops. Asset continuity between hops is the
/// caller's obligation; a mismatch surfaces as a venue rejection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ConversionHint>", into = "Vec<ConversionHint>")]
pub struct ConversionRoute {
    hops: Vec<ConversionHint>,
}

impl ConversionRoute {
    pub fn new(hops: Vec<ConversionHint>) -> Result<Self, ConvertError> {
        if hops.is_empty() {
            return Err(ConvertError::InvalidRoute("route has no hops".into()));
        }
        Ok(Self { hops })
    }

    pub fn single(hop: ConversionHint) -> Self {
        Self { hops: vec![hop] }
    }

    /// Builds a route from wire words, decoding each hop.
    pub fn from_words(words: &[U256]) -> Result<Self, ConvertError> {
        let hops = words
            .iter()
            .map(|word| ConversionHint::decode(*word))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(hops)
    }

    pub fn to_words(&self) -> Result<Vec<U256>, ConvertError> {
        self.hops.iter().map(ConversionHint::encode).collect()
    }

    pub fn hops(&self) -> &[ConversionHint] {
        &self.hops
    }

    pub fn len(&self) -> usize {
        self.hops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hops.is_empty()
    }

    // Both accessors rely on the route being non-empty by construction.
    pub fn first(&self) -> &ConversionHint {
        &self.hops[0]
    }

    pub fn last(&self) -> &ConversionHint {
        &self.hops[self.hops.len() - 1]
    }
}

impl TryFrom<Vec<ConversionHint>> for ConversionRoute {
    type Error = ConvertError;

    fn try_from(hops: Vec<ConversionHint>) -> Result<Self, Self::Error> {
        Self::new(hops)
    }
}

impl From<ConversionRoute> for Vec<ConversionHint> {
    fn from(route: ConversionRoute) -> Self {
        route.hops
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::hint::VenueType;
    use alloy::primitives::Address;

    #[test]
    fn empty_routes_are_rejected() {
        assert!(matches!(
            ConversionRoute::new(Vec::new()),
            Err(ConvertError::InvalidRoute(_))
        ));
    }

    #[test]
    fn words_decode_into_hops_in_order() {
        let a = ConversionHint::swap(Address::repeat_byte(1), VenueType::CurvePlain, 0, 1);
        let b = ConversionHint::swap(Address::repeat_byte(2), VenueType::UniswapV3, 1, 0);
        let route = ConversionRoute::new(vec![a, b]).unwrap();
        let words = route.to_words().unwrap();
        let decoded = ConversionRoute::from_words(&words).unwrap();
        assert_eq!(decoded.hops(), &[a, b]);
        assert_eq!(decoded.last(), &b);
    }
}
