//! Catalog entities as held by the authoritative product store.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Primary key of a product in the store and in the index.
pub type ProductId = u64;

/// A product row from the authoritative store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Primary key.
    pub id: ProductId,
    /// Stock-keeping code.
    pub sku: String,
    /// Display name.
    pub name: String,
    /// Taxons the product is classified under.
    #[serde(default)]
    pub taxon_ids: Vec<u64>,
    /// When the product becomes available. `None` means never.
    #[serde(default)]
    pub available_on: Option<DateTime<Utc>>,
    /// Soft-deletion timestamp.
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
    /// Units on hand.
    #[serde(default)]
    pub count_on_hand: i64,
    /// Whether the product is featured.
    #[serde(default)]
    pub featured: bool,
    /// Free-form properties (color, brand, ...).
    #[serde(default)]
    pub properties: HashMap<String, String>,
}

impl Product {
    /// Create an available, in-stock product with no properties.
    pub fn new<S: Into<String>>(id: ProductId, sku: S, name: S) -> Self {
        Product {
            id,
            sku: sku.into(),
            name: name.into(),
            taxon_ids: Vec::new(),
            available_on: Some(DateTime::<Utc>::UNIX_EPOCH),
            deleted_at: None,
            count_on_hand: 1,
            featured: false,
            properties: HashMap::new(),
        }
    }

    /// Set a property.
    pub fn with_property<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Set the stock level.
    pub fn with_count_on_hand(mut self, count: i64) -> Self {
        self.count_on_hand = count;
        self
    }

    /// Add a taxon.
    pub fn with_taxon(mut self, taxon_id: u64) -> Self {
        self.taxon_ids.push(taxon_id);
        self
    }

    /// Set the availability date.
    pub fn available_on(mut self, when: Option<DateTime<Utc>>) -> Self {
        self.available_on = when;
        self
    }

    /// Mark the product as deleted.
    pub fn deleted_at(mut self, when: DateTime<Utc>) -> Self {
        self.deleted_at = Some(when);
        self
    }

    /// Mark the product as featured.
    pub fn featured(mut self, featured: bool) -> Self {
        self.featured = featured;
        self
    }

    /// Active products are available by `now` and not deleted.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.deleted_at.is_none() && self.available_on.is_some_and(|on| on <= now)
    }

    pub fn in_stock(&self) -> bool {
        self.count_on_hand > 0
    }

    /// Value of a named column or property, rendered as text.
    pub fn field_value(&self, field: &str) -> Option<String> {
        match field {
            "id" => Some(self.id.to_string()),
            "sku" => Some(self.sku.clone()),
            "name" => Some(self.name.clone()),
            "featured" => Some(self.featured.to_string()),
            "count_on_hand" => Some(self.count_on_hand.to_string()),
            _ => self.properties.get(field).cloned(),
        }
    }
}
