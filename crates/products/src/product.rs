use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use wms_core::{DomainResult, Entity, ProductId, ensure_finite, ensure_not_blank};

/// Physical package dimensions (centimetres).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Dimensions {
    pub length: f64,
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    pub fn new(length: f64, width: f64, height: f64) -> Self {
        Self {
            length,
            width,
            height,
        }
    }
}

/// Catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub sku: String,
    pub name: String,
    pub description: String,
    pub category: String,
    /// Kilograms.
    pub weight: f64,
    pub dimensions: Dimensions,
    pub batch_number: Option<String>,
    pub expiry_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Product {
    type Id = ProductId;
    const KIND: &'static str = "product";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Product {
    pub fn from_draft(id: ProductId, draft: ProductDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            sku: draft.sku.trim().to_string(),
            name: draft.name,
            description: draft.description,
            category: draft.category,
            weight: draft.weight,
            dimensions: draft.dimensions,
            batch_number: draft.batch_number,
            expiry_date: draft.expiry_date,
            created_at: now,
            updated_at: now,
        }
    }

    /// Expired strictly before `as_of`; products without a date never expire.
    pub fn is_expired(&self, as_of: NaiveDate) -> bool {
        self.expiry_date.is_some_and(|d| d < as_of)
    }

    pub fn validate(&self) -> DomainResult<()> {
        ensure_not_blank("name", &self.name)?;
        ensure_not_blank("SKU", &self.sku)?;
        ensure_finite("weight", self.weight, true)?;
        ensure_finite("length", self.dimensions.length, true)?;
        ensure_finite("width", self.dimensions.width, true)?;
        ensure_finite("height", self.dimensions.height, true)?;
        Ok(())
    }

    pub(crate) fn matches(&self, term: &str) -> bool {
        self.name.to_lowercase().contains(term)
            || self.sku.to_lowercase().contains(term)
            || self.category.to_lowercase().contains(term)
    }
}

/// Creation input for a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub sku: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub dimensions: Dimensions,
    #[serde(default)]
    pub batch_number: Option<String>,
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
}

impl ProductDraft {
    pub fn new(sku: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            sku: sku.into(),
            name: name.into(),
            description: String::new(),
            category: String::new(),
            weight: 0.0,
            dimensions: Dimensions::default(),
            batch_number: None,
            expiry_date: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_dimensions(mut self, dimensions: Dimensions) -> Self {
        self.dimensions = dimensions;
        self
    }

    pub fn with_batch(mut self, batch_number: impl Into<String>) -> Self {
        self.batch_number = Some(batch_number.into());
        self
    }

    pub fn with_expiry(mut self, expiry_date: NaiveDate) -> Self {
        self.expiry_date = Some(expiry_date);
        self
    }
}

/// Partial product update. `batch_number`/`expiry_date` use a nested option:
/// `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductPatch {
    pub sku: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub weight: Option<f64>,
    pub dimensions: Option<Dimensions>,
    pub batch_number: Option<Option<String>>,
    pub expiry_date: Option<Option<NaiveDate>>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn sku(mut self, sku: impl Into<String>) -> Self {
        self.sku = Some(sku.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn expiry_date(mut self, expiry_date: Option<NaiveDate>) -> Self {
        self.expiry_date = Some(expiry_date);
        self
    }

    /// Merge into `current`; `updated_at` moves to `now` only when a field
    /// actually changes.
    pub fn apply_to(&self, current: &Product, now: DateTime<Utc>) -> Product {
        let mut next = current.clone();
        if let Some(sku) = &self.sku {
            next.sku = sku.trim().to_string();
        }
        if let Some(name) = &self.name {
            next.name = name.clone();
        }
        if let Some(description) = &self.description {
            next.description = description.clone();
        }
        if let Some(category) = &self.category {
            next.category = category.clone();
        }
        if let Some(weight) = self.weight {
            next.weight = weight;
        }
        if let Some(dimensions) = self.dimensions {
            next.dimensions = dimensions;
        }
        if let Some(batch_number) = &self.batch_number {
            next.batch_number = batch_number.clone();
        }
        if let Some(expiry_date) = self.expiry_date {
            next.expiry_date = expiry_date;
        }
        if next != *current {
            next.updated_at = now;
        }
        next
    }
}
