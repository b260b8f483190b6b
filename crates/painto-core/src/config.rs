//! Storefront configuration models.
//!
//! Loaded from `config.toml` by the infrastructure layer. Every field has a
//! default so a missing file, or a file with only some sections, still yields
//! a usable configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::locale::Locale;

pub const DEFAULT_API_VERSION: &str = "2025-01";
pub const DEFAULT_BUYER_COUNTRY: &str = "IL";
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 300;

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct StorefrontConfig {
    #[serde(default)]
    pub shopify: ShopifyConfig,
    #[serde(default)]
    pub i18n: I18nConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Shopify Storefront API settings.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ShopifyConfig {
    /// e.g. `painto-israel-dev.myshopify.com`
    #[serde(default)]
    pub store_domain: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Public (storefront) access token. Not a secret admin token.
    #[serde(default)]
    pub public_access_token: String,
    /// Country hint sent with every newly created cart.
    #[serde(default = "default_buyer_country")]
    pub buyer_country_code: String,
}

impl ShopifyConfig {
    /// GraphQL endpoint derived from the store domain and API version.
    pub fn endpoint(&self) -> String {
        let domain = self
            .store_domain
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_end_matches('/');
        format!("https://{}/api/{}/graphql.json", domain, self.api_version)
    }

    pub fn is_configured(&self) -> bool {
        !self.store_domain.trim().is_empty() && !self.public_access_token.trim().is_empty()
    }
}

impl Default for ShopifyConfig {
    fn default() -> Self {
        Self {
            store_domain: String::new(),
            api_version: default_api_version(),
            public_access_token: String::new(),
            buyer_country_code: default_buyer_country(),
        }
    }
}

/// Localization settings.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct I18nConfig {
    /// Substitute locale when another locale's bundle fails to load.
    #[serde(default = "default_locale")]
    pub default_locale: Locale,
    /// Locale used on first load when no preference is stored.
    #[serde(default = "initial_locale")]
    pub initial_locale: Locale,
    /// Delay before the loading flag clears after a switch.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
    /// Directory containing `<code>/common.json` dictionaries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locales_dir: Option<PathBuf>,
    /// Base URL serving `/locales/<code>/common.json`. Takes precedence over
    /// `locales_dir` when both are set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locales_base_url: Option<String>,
}

impl I18nConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            default_locale: default_locale(),
            initial_locale: initial_locale(),
            settle_delay_ms: default_settle_delay_ms(),
            locales_dir: None,
            locales_base_url: None,
        }
    }
}

/// Client-local storage settings.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct StorageConfig {
    /// Overrides the platform default `client_state.toml` location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_file: Option<PathBuf>,
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_buyer_country() -> String {
    DEFAULT_BUYER_COUNTRY.to_string()
}

fn default_locale() -> Locale {
    Locale::En
}

fn initial_locale() -> Locale {
    Locale::He
}

fn default_settle_delay_ms() -> u64 {
    DEFAULT_SETTLE_DELAY_MS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StorefrontConfig::default();
        assert_eq!(config.shopify.api_version, "2025-01");
        assert_eq!(config.shopify.buyer_country_code, "IL");
        assert_eq!(config.i18n.default_locale, Locale::En);
        assert_eq!(config.i18n.initial_locale, Locale::He);
        assert_eq!(config.i18n.settle_delay(), Duration::from_millis(300));
        assert!(!config.shopify.is_configured());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: StorefrontConfig = toml::from_str(
            r#"
            [shopify]
            store_domain = "painto-israel-dev.myshopify.com"
            public_access_token = "token"

            [i18n]
            initial_locale = "en"
            "#,
        )
        .unwrap();
        assert!(config.shopify.is_configured());
        assert_eq!(config.shopify.buyer_country_code, "IL");
        assert_eq!(config.i18n.initial_locale, Locale::En);
        assert_eq!(config.i18n.default_locale, Locale::En);
        assert_eq!(config.storage, StorageConfig::default());
    }

    #[test]
    fn test_endpoint() {
        let shopify = ShopifyConfig {
            store_domain: "https://painto-israel-dev.myshopify.com/".into(),
            ..ShopifyConfig::default()
        };
        assert_eq!(
            shopify.endpoint(),
            "https://painto-israel-dev.myshopify.com/api/2025-01/graphql.json"
        );
    }
}
