//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// missing products, stock rules, history replay). I/O failures belong to the
/// persistence layer and never surface through this type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A quantity was not a non-negative integer.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),

    /// A product name was empty after normalization.
    #[error("invalid product name: {0}")]
    InvalidName(String),

    /// The named product is not in the store.
    #[error("product not found: {0}")]
    NotFound(String),

    /// A sale asked for more units than are on hand.
    #[error("insufficient stock for {name}: requested {requested}, available {available}")]
    InsufficientStock {
        name: String,
        requested: u64,
        available: u64,
    },

    /// The undo stack is empty.
    #[error("nothing to undo")]
    NothingToUndo,

    /// The redo stack is empty.
    #[error("nothing to redo")]
    NothingToRedo,

    /// A command record no longer matches the store it is replayed against.
    #[error("cannot replay command: {0}")]
    ReplayConflict(String),
}

impl DomainError {
    pub fn invalid_quantity(msg: impl Into<String>) -> Self {
        Self::InvalidQuantity(msg.into())
    }

    pub fn invalid_name(msg: impl Into<String>) -> Self {
        Self::InvalidName(msg.into())
    }

    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    pub fn insufficient_stock(name: impl Into<String>, requested: u64, available: u64) -> Self {
        Self::InsufficientStock {
            name: name.into(),
            requested,
            available,
        }
    }

    pub fn replay_conflict(msg: impl Into<String>) -> Self {
        Self::ReplayConflict(msg.into())
    }

    /// Business-rule failures the caller can correct and retry.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::InvalidQuantity(_)
                | Self::InvalidName(_)
                | Self::NotFound(_)
                | Self::InsufficientStock { .. }
        )
    }
}
