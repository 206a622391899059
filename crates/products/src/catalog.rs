use chrono::{DateTime, NaiveDate, Utc};

use wms_core::{DomainError, DomainResult, EntityList, ProductId};

use crate::product::{Product, ProductDraft, ProductPatch};
use crate::seed;

/// In-memory product catalog.
///
/// # Invariants
/// - SKUs are unique and non-blank.
/// - `updated_at` only moves on an effective change.
#[derive(Debug, Clone, Default)]
pub struct ProductCatalog {
    products: EntityList<Product>,
}

impl ProductCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded() -> DomainResult<Self> {
        let mut catalog = Self::new();
        for product in seed::products() {
            catalog.insert(product)?;
        }
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn list(&self) -> &[Product] {
        self.products.as_slice()
    }

    pub fn add(&mut self, draft: ProductDraft, now: DateTime<Utc>) -> DomainResult<Product> {
        self.insert(Product::from_draft(ProductId::generate(), draft, now))
    }

    pub fn insert(&mut self, mut product: Product) -> DomainResult<Product> {
        product.sku = product.sku.trim().to_string();
        product.validate()?;
        self.ensure_sku_free(&product.sku, None)?;
        let created = self.products.push(product)?.clone();
        tracing::debug!(product_id = %created.id, sku = %created.sku, "product added");
        Ok(created)
    }

    pub fn update(
        &mut self,
        id: &ProductId,
        patch: ProductPatch,
        now: DateTime<Utc>,
    ) -> DomainResult<Product> {
        let current = self.products.get_required(id)?;
        if patch.is_empty() {
            return Ok(current.clone());
        }
        if let Some(sku) = &patch.sku {
            self.ensure_sku_free(sku, Some(id))?;
        }

        let updated = self
            .products
            .replace_with(id, |current| {
                let next = patch.apply_to(current, now);
                next.validate()?;
                Ok(next)
            })?
            .clone();
        tracing::debug!(product_id = %id, "product updated");
        Ok(updated)
    }

    pub fn delete(&mut self, id: &ProductId) -> DomainResult<Product> {
        let removed = self.products.remove(id)?;
        tracing::debug!(product_id = %id, "product deleted");
        Ok(removed)
    }

    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.get(id)
    }

    pub fn get_by_id(&self, id: &ProductId) -> DomainResult<&Product> {
        self.products.get_required(id)
    }

    pub fn find_by_sku(&self, sku: &str) -> Option<&Product> {
        let sku = sku.trim();
        self.products.find(|p| p.sku.eq_ignore_ascii_case(sku))
    }

    /// Case-insensitive match on name, SKU or category; blank matches all.
    pub fn search(&self, term: &str) -> Vec<&Product> {
        let term = term.trim().to_lowercase();
        self.products
            .iter()
            .filter(|p| term.is_empty() || p.matches(&term))
            .collect()
    }

    /// Ids of products matching `term` (for cross-registry searches).
    pub fn matching_ids(&self, term: &str) -> Vec<ProductId> {
        if term.trim().is_empty() {
            return Vec::new();
        }
        self.search(term).into_iter().map(|p| p.id.clone()).collect()
    }

    pub fn expired_as_of(&self, as_of: NaiveDate) -> Vec<&Product> {
        self.products.iter().filter(|p| p.is_expired(as_of)).collect()
    }

    fn ensure_sku_free(&self, sku: &str, owner: Option<&ProductId>) -> DomainResult<()> {
        match self.find_by_sku(sku) {
            Some(existing) if Some(&existing.id) != owner => Err(DomainError::conflict(format!(
                "SKU {} is already used by product {}",
                sku.trim(),
                existing.id
            ))),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap()
    }

    fn t1() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 2, 8, 0, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn add_assigns_id_and_timestamps() {
        let mut catalog = ProductCatalog::new();
        let product = catalog
            .add(ProductDraft::new("SOY-250", "Soy Sauce 250ml").with_category("Sauce"), t0())
            .unwrap();

        assert!(product.id.as_str().starts_with("prod-"));
        assert_eq!(product.created_at, t0());
        assert_eq!(product.updated_at, t0());
        assert_eq!(catalog.get_by_id(&product.id).unwrap(), &product);
    }

    #[test]
    fn rejects_blank_name_and_sku() {
        let mut catalog = ProductCatalog::new();
        assert!(matches!(
            catalog.add(ProductDraft::new("SKU-1", "   "), t0()),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            catalog.add(ProductDraft::new("", "Name"), t0()),
            Err(DomainError::Validation(_))
        ));
        assert!(catalog.is_empty());
    }

    #[test]
    fn sku_is_unique_case_insensitively() {
        let mut catalog = ProductCatalog::seeded().unwrap();
        let err = catalog
            .add(ProductDraft::new("aji-msg-001", "Duplicate"), t0())
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn update_bumps_updated_at_only_when_changed() {
        let mut catalog = ProductCatalog::seeded().unwrap();
        let id = ProductId::from("1");
        let before = catalog.get_by_id(&id).unwrap().clone();

        let unchanged = catalog.update(&id, ProductPatch::default(), t1()).unwrap();
        assert_eq!(unchanged, before);

        let renamed = catalog
            .update(&id, ProductPatch::default().name("MSG 1kg Pouch"), t1())
            .unwrap();
        assert_eq!(renamed.name, "MSG 1kg Pouch");
        assert_eq!(renamed.updated_at, t1());
        assert_eq!(renamed.created_at, before.created_at);
    }

    #[test]
    fn patch_repeating_current_values_keeps_updated_at() {
        let mut catalog = ProductCatalog::seeded().unwrap();
        let id = ProductId::from("1");
        let before = catalog.get_by_id(&id).unwrap().clone();

        let same = ProductPatch::default()
            .name(before.name.clone())
            .sku(format!(" {} ", before.sku));
        let unchanged = catalog.update(&id, same, t1()).unwrap();
        assert_eq!(unchanged, before);
    }

    #[test]
    fn update_to_other_products_sku_conflicts() {
        let mut catalog = ProductCatalog::seeded().unwrap();
        let err = catalog
            .update(&ProductId::from("1"), ProductPatch::default().sku("AJI-MSG-002"), t1())
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn missing_ids_are_not_found() {
        let mut catalog = ProductCatalog::seeded().unwrap();
        let ghost = ProductId::from("ghost");
        let err = catalog.update(&ghost, ProductPatch::default().name("x"), t1()).unwrap_err();
        assert!(err.is_not_found());
        assert!(catalog.delete(&ghost).unwrap_err().is_not_found());
        assert!(catalog.get_by_id(&ghost).unwrap_err().is_not_found());
    }

    #[test]
    fn search_matches_name_sku_and_category() {
        let catalog = ProductCatalog::seeded().unwrap();
        assert_eq!(catalog.search("500g").len(), 1);
        assert_eq!(catalog.search("aji-msg").len(), 2);
        assert_eq!(catalog.search("season").len(), 2);
        assert_eq!(catalog.search("").len(), 2);
        assert!(catalog.matching_ids("").is_empty());
        assert_eq!(catalog.matching_ids("1kg"), vec![ProductId::from("1")]);
    }

    #[test]
    fn expiry_is_strictly_before_reference_date() {
        let mut catalog = ProductCatalog::seeded().unwrap();
        // Product 2 expires 2025-05-15, product 1 on 2025-06-30.
        assert_eq!(catalog.expired_as_of(date(2025, 5, 15)).len(), 0);
        assert_eq!(catalog.expired_as_of(date(2025, 5, 16)).len(), 1);
        assert_eq!(catalog.expired_as_of(date(2025, 7, 1)).len(), 2);

        catalog
            .update(&ProductId::from("1"), ProductPatch::default().expiry_date(None), t1())
            .unwrap();
        assert_eq!(catalog.expired_as_of(date(2025, 7, 1)).len(), 1);
    }
}
