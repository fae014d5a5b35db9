//! Normalized product identifiers.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_object::ValueObject;

/// Identifier of a stock entity.
///
/// Always trimmed and case-folded, so `"Widget"`, `"widget "` and `"WIDGET"`
/// name the same product. Deserialization goes through the same normalization,
/// so names read back from disk are canonical too.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProductName(String);

impl ProductName {
    /// Normalize raw user input into a product name.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(DomainError::invalid_name("name cannot be empty"));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive substring match against the normalized name.
    pub fn contains(&self, fragment: &str) -> bool {
        self.0.contains(&fragment.trim().to_lowercase())
    }
}

impl ValueObject for ProductName {}

impl core::fmt::Display for ProductName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ProductName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for ProductName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ProductName {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ProductName> for String {
    fn from(value: ProductName) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_and_case_folds() {
        let name = ProductName::parse("  Blue Widget ").unwrap();
        assert_eq!(name.as_str(), "blue widget");
    }

    #[test]
    fn parse_rejects_blank_names() {
        let err = ProductName::parse("   ").unwrap_err();
        match err {
            DomainError::InvalidName(_) => {}
            _ => panic!("Expected InvalidName error for blank name"),
        }
    }

    #[test]
    fn deserialize_normalizes() {
        let name: ProductName = serde_json::from_str("\"GADGET\"").unwrap();
        assert_eq!(name.as_str(), "gadget");
        assert_eq!(serde_json::to_string(&name).unwrap(), "\"gadget\"");
    }

    #[test]
    fn deserialize_rejects_empty() {
        assert!(serde_json::from_str::<ProductName>("\"\"").is_err());
    }

    #[test]
    fn contains_ignores_case() {
        let name = ProductName::parse("Blue Widget").unwrap();
        assert!(name.contains("WIDG"));
        assert!(!name.contains("gadget"));
    }
}
