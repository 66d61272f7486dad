//! Product and variant records.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{CategoryRecord, PriceDisplay};
use crate::ids::{CategoryId, ProductId, VariantId};
use crate::money::{Currency, Money};

/// Image shown when a product carries no assets.
pub const FALLBACK_IMAGE: &str =
    "https://images.unsplash.com/photo-1523475472560-d2df97ec485c?auto=format&fit=crop&w=800&q=80";

/// Product lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    /// Product is in draft mode, not visible to customers.
    Draft,
    /// Product is active and visible.
    #[default]
    Active,
    /// Product is archived, not visible but data preserved.
    Archived,
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Draft => "draft",
            ProductStatus::Active => "active",
            ProductStatus::Archived => "archived",
        }
    }
}

/// Free-form product metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductMetadata {
    /// Reference price shown struck-through on listings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compare_at_price: Option<u64>,
    /// Any other keys carried by the record.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// A product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub id: ProductId,
    /// Public, URL-stable identifier, unique per catalog.
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub description: String,
    /// List price in the currency's display unit.
    pub price: u64,
    #[serde(default)]
    pub currency: Currency,
    #[serde(default)]
    pub status: ProductStatus,
    /// Direct category association used by the category filter.
    #[serde(default, alias = "category_id", skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    /// Categories shown alongside the product.
    #[serde(default)]
    pub categories: Vec<CategoryRecord>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Ordered image URLs.
    #[serde(default)]
    pub assets: Vec<String>,
    #[serde(default)]
    pub metadata: ProductMetadata,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub variants: Vec<VariantRecord>,
}

impl ProductRecord {
    /// Check if the product is visible to customers.
    pub fn is_active(&self) -> bool {
        self.status == ProductStatus::Active
    }

    /// List price as money.
    pub fn list_price(&self) -> Money {
        Money::new(self.price, self.currency)
    }

    /// First asset, or the shared fallback image.
    pub fn primary_image(&self) -> &str {
        self.assets
            .first()
            .map(String::as_str)
            .unwrap_or(FALLBACK_IMAGE)
    }

    /// The variant flagged as default, or the first one in list order.
    pub fn default_variant(&self) -> Option<&VariantRecord> {
        default_variant(&self.variants)
    }

    /// A product without variants has no sellable configuration.
    pub fn is_sellable(&self) -> bool {
        !self.variants.is_empty()
    }

    /// Price shown on listing cards.
    pub fn card_price(&self) -> PriceDisplay {
        PriceDisplay::for_listing(self)
    }

    /// Case-insensitive substring match on name or summary.
    pub fn matches_text(&self, needle_lowercase: &str) -> bool {
        needle_lowercase.is_empty()
            || self.name.to_lowercase().contains(needle_lowercase)
            || self.summary.to_lowercase().contains(needle_lowercase)
    }
}

/// Resolve the default variant of a list.
///
/// The first variant with `is_default` wins; when none is flagged the
/// first variant in list order is used.
pub fn default_variant(variants: &[VariantRecord]) -> Option<&VariantRecord> {
    variants
        .iter()
        .find(|variant| variant.is_default)
        .or_else(|| variants.first())
}

/// A variant attribute value (e.g., "Hitam" or 64).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum AttributeValue {
    Text(String),
    Number(serde_json::Number),
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Text(s) => f.write_str(s),
            AttributeValue::Number(n) => write!(f, "{}", n),
        }
    }
}

/// A purchasable configuration of a product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VariantRecord {
    pub id: VariantId,
    /// Stock keeping unit, unique within the product.
    pub sku: String,
    #[serde(default)]
    pub title: String,
    /// Base price of this variant.
    pub price: u64,
    /// Supersedes the base price for display and purchase.
    #[serde(default, alias = "price_override", skip_serializing_if = "Option::is_none")]
    pub price_override: Option<u64>,
    #[serde(default)]
    pub currency: Currency,
    /// Zero means unavailable but still listed.
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub attributes: BTreeMap<String, AttributeValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_default: bool,
}

impl VariantRecord {
    /// The price a customer pays for this variant.
    pub fn effective_price(&self) -> u64 {
        self.price_override.unwrap_or(self.price)
    }

    /// Check if this variant can be purchased right now.
    pub fn is_available(&self) -> bool {
        self.stock > 0
    }

    /// Human label built from the title, or from attribute values.
    pub fn label(&self) -> String {
        if !self.title.is_empty() {
            return self.title.clone();
        }
        if self.attributes.is_empty() {
            return "Default".to_string();
        }
        self.attributes
            .values()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(" / ")
    }
}

/// A product together with its variants, as served by the detail endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductDetail {
    pub product: ProductRecord,
    pub variants: Vec<VariantRecord>,
}

impl ProductDetail {
    /// Build a detail view from a product record.
    pub fn from_product(product: ProductRecord) -> Self {
        let variants = product.variants.clone();
        Self { product, variants }
    }

    /// The variant selected when the page opens.
    pub fn default_variant(&self) -> Option<&VariantRecord> {
        default_variant(&self.variants)
    }

    /// Look up a variant, falling back to the default for unknown ids.
    pub fn select_variant(&self, id: &str) -> Option<&VariantRecord> {
        self.variants
            .iter()
            .find(|variant| variant.id == *id)
            .or_else(|| self.default_variant())
    }

    /// Price block for a variant of this product.
    pub fn price_for(&self, variant: &VariantRecord) -> PriceDisplay {
        PriceDisplay::for_variant(&self.product, variant)
    }

    /// Image for a variant: its dedicated image, else the product image.
    pub fn image_for<'a>(&'a self, variant: &'a VariantRecord) -> &'a str {
        variant
            .image_url
            .as_deref()
            .unwrap_or_else(|| self.product.primary_image())
    }
}
