use std::collections::HashMap;

use warehouse_core::{DomainError, DomainResult, Entity, ProductName};

use crate::product::Product;
use crate::snapshot::{ProductSnapshot, StoreSnapshot};

/// The entity store: every product, keyed by its normalized name.
///
/// Invariant: each key equals the name of the product stored under it. The map
/// has no order; listing and snapshot methods sort by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StockBook {
    products: HashMap<ProductName, Product>,
}

impl StockBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from a persisted snapshot. Later duplicates of a name win.
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        let mut book = Self::new();
        for product in snapshot.products {
            book.insert(Product::from_snapshot(product));
        }
        book
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn contains(&self, name: &ProductName) -> bool {
        self.products.contains_key(name)
    }

    pub fn get(&self, name: &ProductName) -> Option<&Product> {
        self.products.get(name)
    }

    pub fn get_mut(&mut self, name: &ProductName) -> Option<&mut Product> {
        self.products.get_mut(name)
    }

    /// Like [`StockBook::get_mut`], as a `NotFound` error.
    pub fn require_mut(&mut self, name: &ProductName) -> DomainResult<&mut Product> {
        self.products
            .get_mut(name)
            .ok_or_else(|| DomainError::not_found(name.as_str()))
    }

    /// Insert under the product's id, returning any product it displaced.
    pub fn insert(&mut self, product: Product) -> Option<Product> {
        let (id, product) = product.into_keyed();
        self.products.insert(id, product)
    }

    pub fn remove(&mut self, name: &ProductName) -> Option<Product> {
        self.products.remove(name)
    }

    pub fn clear(&mut self) {
        self.products.clear();
    }

    /// Products in name order.
    pub fn sorted(&self) -> Vec<&Product> {
        let mut products: Vec<&Product> = self.products.values().collect();
        products.sort_by(|a, b| a.id().cmp(b.id()));
        products
    }

    /// Products whose name contains `fragment` (case-insensitive), in name order.
    pub fn search(&self, fragment: &str) -> Vec<&Product> {
        self.sorted()
            .into_iter()
            .filter(|product| product.name().contains(fragment))
            .collect()
    }

    /// Full copy of every product, in name order.
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            products: self.sorted().into_iter().map(Product::snapshot).collect(),
        }
    }

    pub fn product_snapshot(&self, name: &ProductName) -> Option<ProductSnapshot> {
        self.get(name).map(Product::snapshot)
    }

    /// Names of products whose log no longer folds to their quantity.
    pub fn inconsistent(&self) -> Vec<&ProductName> {
        self.sorted()
            .into_iter()
            .filter(|product| !product.is_consistent())
            .map(Product::name)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use warehouse_core::Quantity;

    fn product(name: &str, quantity: u64) -> Product {
        let at = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        Product::create(ProductName::parse(name).unwrap(), Quantity::new(quantity), at)
    }

    fn name(raw: &str) -> ProductName {
        ProductName::parse(raw).unwrap()
    }

    #[test]
    fn keys_match_product_names() {
        let mut book = StockBook::new();
        book.insert(product("Gizmo", 1));
        assert!(book.contains(&name("GIZMO")));
        assert_eq!(book.get(&name("gizmo")).unwrap().name(), &name("gizmo"));
    }

    #[test]
    fn every_key_is_the_stored_products_id() {
        let mut book = StockBook::new();
        book.insert(product("Gizmo", 1));
        book.insert(product("  bolt ", 2));
        let displaced = book.insert(product("GIZMO", 7)).unwrap();

        assert_eq!(displaced.quantity(), Quantity::new(1));
        assert_eq!(book.len(), 2);
        for (key, product) in &book.products {
            assert_eq!(key, product.id());
        }
        assert_eq!(book.get(&name("gizmo")).unwrap().quantity(), Quantity::new(7));
    }

    #[test]
    fn sorted_and_search_order_by_name() {
        let mut book = StockBook::new();
        book.insert(product("zinc plate", 1));
        book.insert(product("anchor", 2));
        book.insert(product("Plate rack", 3));

        let all: Vec<&str> = book.sorted().into_iter().map(|p| p.name().as_str()).collect();
        assert_eq!(all, vec!["anchor", "plate rack", "zinc plate"]);

        let plates: Vec<&str> = book.search("PLATE").into_iter().map(|p| p.name().as_str()).collect();
        assert_eq!(plates, vec!["plate rack", "zinc plate"]);
    }

    #[test]
    fn require_mut_reports_missing_name() {
        let mut book = StockBook::new();
        assert_eq!(
            book.require_mut(&name("ghost")).unwrap_err(),
            DomainError::not_found("ghost")
        );
    }

    #[test]
    fn from_snapshot_keeps_last_duplicate() {
        let snapshot = StoreSnapshot {
            products: vec![product("bolt", 1).snapshot(), product("BOLT", 9).snapshot()],
        };
        let book = StockBook::from_snapshot(snapshot);
        assert_eq!(book.len(), 1);
        assert_eq!(book.get(&name("bolt")).unwrap().quantity(), Quantity::new(9));
    }

    #[test]
    fn snapshot_round_trips() {
        let mut book = StockBook::new();
        book.insert(product("a", 1));
        book.insert(product("b", 2));
        let restored = StockBook::from_snapshot(book.snapshot());
        assert_eq!(restored, book);
        assert!(restored.inconsistent().is_empty());
    }
}
