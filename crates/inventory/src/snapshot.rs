//! Serializable copies of store state.
//!
//! The same shape serves two purposes: the payload of a removal record (so the
//! removal can be reversed verbatim) and the document written to disk:
//!
//! ```json
//! { "products": [ { "name": "widget", "quantity": 10, "transactions": [ ... ] } ] }
//! ```

use serde::{Deserialize, Serialize};

use warehouse_core::{ProductName, Quantity};
use warehouse_events::Transaction;

/// Full persistent state of one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    pub name: ProductName,
    #[serde(default)]
    pub quantity: Quantity,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

/// Persisted store document. Undo/redo history is deliberately absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    #[serde(default)]
    pub products: Vec<ProductSnapshot>,
}

impl StoreSnapshot {
    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
