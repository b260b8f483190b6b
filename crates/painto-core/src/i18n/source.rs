//! Bundle source trait.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::{PaintoError, Result};
use crate::i18n::bundle::TranslationBundle;
use crate::locale::Locale;

/// Fetches the dictionary resource for a locale.
///
/// Implementations live in the infrastructure (filesystem) and interaction
/// (HTTP) crates. A missing or unparseable resource is an error here; the
/// runtime decides how to degrade.
#[async_trait]
pub trait BundleSource: Send + Sync {
    async fn fetch(&self, locale: Locale) -> Result<TranslationBundle>;
}

/// A source serving fixed bundles from memory.
///
/// Locales without an entry fail with `NotFound`, which makes it handy for
/// simulating fetch failures.
#[derive(Debug, Clone, Default)]
pub struct StaticBundleSource {
    bundles: HashMap<Locale, TranslationBundle>,
}

impl StaticBundleSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bundle(mut self, bundle: TranslationBundle) -> Self {
        if let Some(locale) = bundle.locale() {
            self.bundles.insert(locale, bundle);
        }
        self
    }

    /// Adds a bundle parsed from JSON.
    pub fn with_json(self, locale: Locale, json: &str) -> Result<Self> {
        Ok(self.with_bundle(TranslationBundle::from_json_str(locale, json)?))
    }
}

#[async_trait]
impl BundleSource for StaticBundleSource {
    async fn fetch(&self, locale: Locale) -> Result<TranslationBundle> {
        self.bundles
            .get(&locale)
            .cloned()
            .ok_or_else(|| PaintoError::not_found("translation bundle", locale.code()))
    }
}
