//! Value object trait: equality by value, not identity.
//!
//! `ProductName` and `Quantity` are value objects: two names that normalize to
//! the same text are the same name, and a quantity is nothing but its count.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values. To
/// "change" one, construct a new one:
///
/// ```
/// use warehouse_core::{ProductName, Quantity, ValueObject};
///
/// fn assert_value_object<V: ValueObject>(_: &V) {}
///
/// let a = ProductName::parse("Widget").unwrap();
/// let b = ProductName::parse("  WIDGET ").unwrap();
/// assert_eq!(a, b);
/// assert_value_object(&a);
///
/// let q = Quantity::new(3);
/// assert_eq!(q.checked_add(Quantity::new(2)), Some(Quantity::new(5)));
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
