//! Store selection and credential lookup.
//!
//! A run targets exactly one store. It is picked either by an explicit
//! domain or by a built-in profile that also names the environment variable
//! holding that store's Admin API token.

use mpn_types::{ConfigError, StoreConfig};

/// Token variable used when no profile is selected.
pub const DEFAULT_TOKEN_VAR: &str = "SHOPIFY_ACCESS_TOKEN";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreProfile {
    pub name: &'static str,
    pub store_domain: &'static str,
    pub token_var: &'static str,
}

pub const STORE_PROFILES: &[StoreProfile] = &[
    StoreProfile {
        name: "columns",
        store_domain: "columns-com.myshopify.com",
        token_var: "SHOPIFY_ACCESS_TOKEN_COLUMNS",
    },
    StoreProfile {
        name: "bikedepot",
        store_domain: "duq0xw-jh.myshopify.com",
        token_var: "SHOPIFY_ACCESS_TOKEN_DEPOT",
    },
];

pub fn find_profile(name: &str) -> Result<&'static StoreProfile, ConfigError> {
    STORE_PROFILES
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(name.trim()))
        .ok_or_else(|| ConfigError::UnknownProfile { name: name.to_string() })
}

/// Resolve the store to migrate.
///
/// `store` overrides a profile's domain. The credential is checked first so a
/// missing token is always the reported failure, whatever else is wrong.
/// `lookup_env` is `std::env::var(..).ok()` outside of tests.
pub fn resolve_store_config<F>(
    store: Option<&str>,
    profile: Option<&str>,
    api_version: &str,
    lookup_env: F,
) -> Result<StoreConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let profile = profile.map(find_profile).transpose()?;
    let token_var = profile.map_or(DEFAULT_TOKEN_VAR, |p| p.token_var);
    let token = lookup_env(token_var);
    if token.as_deref().map_or(true, |t| t.trim().is_empty()) {
        return Err(ConfigError::MissingCredential { var: token_var.to_string() });
    }

    let domain = store
        .filter(|s| !s.trim().is_empty())
        .or_else(|| profile.map(|p| p.store_domain))
        .ok_or_else(|| ConfigError::ValidationError {
            field: "store_domain".to_string(),
            message: "no store given; pass --store or --profile".to_string(),
        })?;

    tracing::debug!("Resolved store {} (token from {})", domain, token_var);
    StoreConfig::new(domain, api_version, token, token_var)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_token_reported_before_store() {
        let err = resolve_store_config(None, None, "2025-10", env(&[])).unwrap_err();
        assert_eq!(err, ConfigError::MissingCredential { var: "SHOPIFY_ACCESS_TOKEN".to_string() });
    }

    #[test]
    fn test_explicit_store_with_default_token() {
        let config = resolve_store_config(
            Some("shop.myshopify.com"),
            None,
            "2025-10",
            env(&[("SHOPIFY_ACCESS_TOKEN", "shpat_a")]),
        )
        .unwrap();
        assert_eq!(config.store_domain, "shop.myshopify.com");
        assert_eq!(config.access_token, "shpat_a");
    }

    #[test]
    fn test_profile_selects_domain_and_token_var() {
        let config = resolve_store_config(
            None,
            Some("BikeDepot"),
            "2025-10",
            env(&[("SHOPIFY_ACCESS_TOKEN_DEPOT", "shpat_d"), ("SHOPIFY_ACCESS_TOKEN", "wrong")]),
        )
        .unwrap();
        assert_eq!(config.store_domain, "duq0xw-jh.myshopify.com");
        assert_eq!(config.access_token, "shpat_d");
    }

    #[test]
    fn test_profile_token_missing() {
        let err = resolve_store_config(
            None,
            Some("columns"),
            "2025-10",
            env(&[("SHOPIFY_ACCESS_TOKEN", "shpat_a")]),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingCredential { var: "SHOPIFY_ACCESS_TOKEN_COLUMNS".to_string() }
        );
    }

    #[test]
    fn test_unknown_profile() {
        let err = resolve_store_config(None, Some("nope"), "2025-10", env(&[])).unwrap_err();
        assert_eq!(err, ConfigError::UnknownProfile { name: "nope".to_string() });
    }

    #[test]
    fn test_no_store_at_all() {
        let err =
            resolve_store_config(None, None, "2025-10", env(&[("SHOPIFY_ACCESS_TOKEN", "t")]))
                .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { ref field, .. } if field == "store_domain"));
    }
}
