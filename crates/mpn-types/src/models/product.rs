use serde::{Deserialize, Serialize};

/// A product carrying a source MPN, captured during the catalog scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductCandidate {
    pub id: String,
    pub title: String,
    pub source_value: String,
    pub target_value: Option<String>,
    /// True when the target metafield was absent at scan time
    pub needs_update: bool,
}

impl ProductCandidate {
    /// An empty target value counts as absent.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        source_value: impl Into<String>,
        target_value: Option<String>,
    ) -> Self {
        let target_value = target_value.filter(|v| !v.is_empty());
        Self {
            id: id.into(),
            title: title.into(),
            source_value: source_value.into(),
            needs_update: target_value.is_none(),
            target_value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_update_iff_target_absent() {
        let fresh = ProductCandidate::new("gid://shopify/Product/1", "Bike", "MPN-1", None);
        assert!(fresh.needs_update);

        let done = ProductCandidate::new(
            "gid://shopify/Product/2",
            "Helmet",
            "MPN-2",
            Some("MPN-2".to_string()),
        );
        assert!(!done.needs_update);
    }

    #[test]
    fn test_empty_target_counts_as_absent() {
        let c = ProductCandidate::new("gid://shopify/Product/3", "Lock", "MPN-3", Some(String::new()));
        assert!(c.needs_update);
        assert_eq!(c.target_value, None);
    }
}
