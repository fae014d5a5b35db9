//! `warehouse-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod entity;
pub mod error;
pub mod name;
pub mod quantity;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use name::ProductName;
pub use quantity::Quantity;
pub use value_object::ValueObject;
