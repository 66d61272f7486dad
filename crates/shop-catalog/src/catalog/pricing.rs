//! Display pricing for listings and variant detail.

use serde::{Deserialize, Serialize};

use crate::catalog::{ProductRecord, VariantRecord};
use crate::money::Money;

/// A price with an optional struck-through reference price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceDisplay {
    /// What the customer pays.
    pub price: Money,
    /// Reference price, when one exists.
    pub compare_at: Option<Money>,
}

impl PriceDisplay {
    /// Listing price: the product price against `metadata.compareAtPrice`.
    pub fn for_listing(product: &ProductRecord) -> Self {
        Self {
            price: product.list_price(),
            compare_at: product
                .metadata
                .compare_at_price
                .filter(|amount| *amount > 0)
                .map(|amount| Money::new(amount, product.currency)),
        }
    }

    /// Detail price for a selected variant.
    ///
    /// A price override replaces the variant's base price, and the base
    /// price becomes the compare-at value when the override is positive.
    /// Without an override the product's compare-at metadata is used.
    pub fn for_variant(product: &ProductRecord, variant: &VariantRecord) -> Self {
        let currency = variant.currency;
        let base = variant.price;
        let compare_at = match variant.price_override {
            Some(over) if over > 0 => Some(base),
            _ => product.metadata.compare_at_price,
        };

        Self {
            price: Money::new(variant.effective_price(), currency),
            compare_at: compare_at.map(|amount| Money::new(amount, currency)),
        }
    }

    /// Whether the reference price should be rendered struck-through.
    pub fn shows_compare_at(&self) -> bool {
        self.compare_at
            .is_some_and(|reference| reference.amount > self.price.amount)
    }

    /// Percentage saved, when a higher reference price exists.
    pub fn discount_percentage(&self) -> Option<f64> {
        self.compare_at
            .and_then(|reference| self.price.discount_percentage(&reference))
    }
}
