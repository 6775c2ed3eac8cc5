// 📦 Product Entity - Catalog items grouped by category
//
// "Product id is IDENTITY, name/price/category are VALUES"

use crate::error::Result;
use crate::events::{Event, EventLog};
use crate::repository::{Entity, KeyedRepository, Patch};
use crate::validation::non_negative;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

pub type ProductId = u64;

// ============================================================================
// PRODUCT ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Unit price, never negative
    pub price: f64,
    /// Category label (exact-match grouping, e.g. "Electronics")
    pub category: String,
}

impl Product {
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        price: f64,
        category: impl Into<String>,
    ) -> Self {
        Product {
            id,
            name: name.into(),
            price,
            category: category.into(),
        }
    }
}

impl Entity for Product {
    type Id = ProductId;
    const KIND: &'static str = "product";

    fn id(&self) -> ProductId {
        self.id
    }
}

// ============================================================================
// PATCH + PROJECTIONS
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
}

impl ProductPatch {
    pub fn name(name: impl Into<String>) -> Self {
        ProductPatch {
            name: Some(name.into()),
            ..Default::default()
        }
    }
}

impl Patch<Product> for ProductPatch {
    fn apply(&self, current: &Product) -> Result<Product> {
        let mut next = current.clone();
        if let Some(name) = &self.name {
            next.name = name.clone();
        }
        if let Some(price) = self.price {
            next.price = non_negative("price", price)?;
        }
        if let Some(category) = &self.category {
            next.category = category.clone();
        }
        Ok(next)
    }
}

/// Name and category only
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductLabel {
    pub name: String,
    pub category: String,
}

impl From<&Product> for ProductLabel {
    fn from(product: &Product) -> Self {
        ProductLabel {
            name: product.name.clone(),
            category: product.category.clone(),
        }
    }
}

/// Everything except the price
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductListing {
    pub id: ProductId,
    pub name: String,
    pub category: String,
}

impl From<&Product> for ProductListing {
    fn from(product: &Product) -> Self {
        ProductListing {
            id: product.id,
            name: product.name.clone(),
            category: product.category.clone(),
        }
    }
}

// ============================================================================
// PRODUCT MANAGER
// ============================================================================

#[derive(Debug, Clone)]
pub struct ProductManager {
    products: Arc<RwLock<KeyedRepository<Product>>>,
    events: EventLog,
}

impl ProductManager {
    pub fn new() -> Self {
        ProductManager {
            products: Arc::new(RwLock::new(KeyedRepository::new())),
            events: EventLog::new("product_manager"),
        }
    }

    pub fn add_product(&self, product: Product) -> Result<()> {
        non_negative("price", product.price)?;
        let id = product.id;
        let data = serde_json::to_value(&product).unwrap_or_default();
        let name = product.name.clone();

        self.products.write().add(product).map_err(|e| {
            warn!(product = id, "add rejected: {}", e);
            e
        })?;

        info!(product = id, "added product {}", name);
        self.events.record("ProductAdded", Product::KIND, id, data);
        Ok(())
    }

    pub fn remove_product(&self, id: ProductId) -> Result<Product> {
        let removed = self.products.write().remove(id).map_err(|e| {
            warn!(product = id, "remove rejected: {}", e);
            e
        })?;

        info!(product = id, "removed product {}", id);
        self.events
            .record("ProductRemoved", Product::KIND, id, serde_json::json!({}));
        Ok(removed)
    }

    pub fn get_product(&self, id: ProductId) -> Option<Product> {
        self.products.read().get(id).cloned()
    }

    pub fn list_all_products(&self) -> Vec<Product> {
        self.products.read().list_all()
    }

    pub fn update_product(&self, id: ProductId, patch: &ProductPatch) -> Result<Product> {
        let updated = self.products.write().update(id, patch).map_err(|e| {
            warn!(product = id, "update rejected: {}", e);
            e
        })?;

        info!(product = id, "updated product {}", id);
        self.events.record(
            "ProductUpdated",
            Product::KIND,
            id,
            serde_json::to_value(patch).unwrap_or_default(),
        );
        Ok(updated)
    }

    pub fn name_and_category(&self, id: ProductId) -> Option<ProductLabel> {
        self.products.read().view(id)
    }

    pub fn product_without_price(&self, id: ProductId) -> Option<ProductListing> {
        self.products.read().view(id)
    }

    /// Products whose category equals `category` exactly, in storage order
    pub fn find_by_category(&self, category: &str) -> Vec<Product> {
        self.products.read().filter(|p| p.category == category)
    }

    /// Sum of all prices (0 when empty)
    pub fn total_inventory_value(&self) -> f64 {
        self.products.read().iter().map(|p| p.price).sum()
    }

    pub fn count(&self) -> usize {
        self.products.read().len()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.events()
    }
}

impl Default for ProductManager {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ManagerError;

    fn catalog() -> ProductManager {
        let manager = ProductManager::new();
        manager
            .add_product(Product::new(1, "Laptop", 15000000.0, "Electronics"))
            .unwrap();
        manager
            .add_product(Product::new(2, "Phone", 8000000.0, "Electronics"))
            .unwrap();
        manager
            .add_product(Product::new(3, "Shirt", 500000.0, "Clothing"))
            .unwrap();
        manager
    }

    #[test]
    fn test_add_and_get_product() {
        let manager = catalog();
        let laptop = manager.get_product(1).unwrap();
        assert_eq!(laptop.name, "Laptop");
        assert_eq!(laptop.category, "Electronics");
        assert!(manager.get_product(99).is_none());
    }

    #[test]
    fn test_add_duplicate_product() {
        let manager = catalog();
        let err = manager
            .add_product(Product::new(1, "Tablet", 1.0, "Electronics"))
            .unwrap_err();
        assert!(matches!(err, ManagerError::DuplicateKey { .. }));
        assert_eq!(manager.count(), 3);
    }

    #[test]
    fn test_add_negative_price_rejected() {
        let manager = ProductManager::new();
        assert!(manager
            .add_product(Product::new(1, "Broken", -1.0, "Misc"))
            .is_err());
        assert_eq!(manager.count(), 0);
    }

    #[test]
    fn test_find_by_category() {
        let manager = catalog();

        let electronics = manager.find_by_category("Electronics");
        let ids: Vec<ProductId> = electronics.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2]);

        // Exact match only
        assert!(manager.find_by_category("electronics").is_empty());
        assert!(manager.find_by_category("Toys").is_empty());
    }

    #[test]
    fn test_total_inventory_value() {
        let manager = catalog();
        assert_eq!(manager.total_inventory_value(), 23500000.0);
        assert_eq!(ProductManager::new().total_inventory_value(), 0.0);
    }

    #[test]
    fn test_update_product() {
        let manager = catalog();
        let updated = manager
            .update_product(1, &ProductPatch::name("Gaming Laptop"))
            .unwrap();

        assert_eq!(updated.name, "Gaming Laptop");
        assert_eq!(updated.price, 15000000.0);
        assert_eq!(updated.category, "Electronics");

        let bad = ProductPatch {
            price: Some(-5.0),
            ..Default::default()
        };
        assert!(manager.update_product(1, &bad).is_err());
        assert_eq!(manager.get_product(1).unwrap().price, 15000000.0);

        assert!(matches!(
            manager.update_product(42, &ProductPatch::name("x")),
            Err(ManagerError::NotFound { .. })
        ));
    }

    #[test]
    fn test_product_projections() {
        let manager = catalog();

        let label = manager.name_and_category(3).unwrap();
        assert_eq!(label.name, "Shirt");
        assert_eq!(label.category, "Clothing");

        let listing = manager.product_without_price(3).unwrap();
        assert_eq!(listing.id, 3);
        assert_eq!(listing.name, "Shirt");

        assert!(manager.name_and_category(10).is_none());
        assert!(manager.product_without_price(10).is_none());
    }

    #[test]
    fn test_remove_product() {
        let manager = catalog();
        manager.remove_product(2).unwrap();

        let ids: Vec<ProductId> = manager.list_all_products().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(manager.remove_product(2).is_err());
    }
}
