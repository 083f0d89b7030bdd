//! Newtype ID for type-safe catalog references.

use serde::{Deserialize, Serialize};

/// Stable identifier for a coffee in the catalog.
///
/// Coffees are keyed by a URL-safe slug (e.g. `"expresso-tradicional"`),
/// assigned when the static catalog is built and never reused.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoffeeId(String);

impl CoffeeId {
    /// Create an ID from a slug.
    #[must_use]
    pub fn new(slug: impl Into<String>) -> Self {
        Self(slug.into())
    }

    /// Get the underlying slug.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CoffeeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CoffeeId {
    fn from(slug: &str) -> Self {
        Self(slug.to_string())
    }
}

impl From<String> for CoffeeId {
    fn from(slug: String) -> Self {
        Self(slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_slug() {
        let id = CoffeeId::new("expresso-tradicional");
        assert_eq!(id.to_string(), "expresso-tradicional");
        assert_eq!(id.as_str(), "expresso-tradicional");
    }

    #[test]
    fn test_equality_by_slug() {
        assert_eq!(CoffeeId::from("latte"), CoffeeId::new("latte"));
        assert_ne!(CoffeeId::from("latte"), CoffeeId::from("mocaccino"));
    }
}
