//! Translation bundles.

use serde_json::{Map, Value};

use crate::error::Result;
use crate::locale::Locale;

/// A nested key→string dictionary for one locale.
///
/// Keys are dot-separated paths into the nested mapping, so `nav.home`
/// resolves `{"nav": {"home": "..."}}`. Only string leaves are translations;
/// a path that ends on an object, array or number is treated as missing.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationBundle {
    locale: Option<Locale>,
    root: Map<String, Value>,
}

impl TranslationBundle {
    /// Creates a bundle for `locale` from an already parsed mapping.
    pub fn new(locale: Locale, root: Map<String, Value>) -> Self {
        Self {
            locale: Some(locale),
            root,
        }
    }

    /// The degraded bundle used when no dictionary could be loaded.
    /// Every lookup misses.
    pub fn empty() -> Self {
        Self {
            locale: None,
            root: Map::new(),
        }
    }

    /// Parses a JSON dictionary. The top level must be an object.
    pub fn from_json_str(locale: Locale, json: &str) -> Result<Self> {
        let root: Map<String, Value> = serde_json::from_str(json)?;
        Ok(Self::new(locale, root))
    }

    /// The locale this bundle was loaded for, `None` for the empty bundle.
    pub fn locale(&self) -> Option<Locale> {
        self.locale
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Walks `key` segment by segment and returns the string leaf, if any.
    pub fn lookup(&self, key: &str) -> Option<&str> {
        let mut segments = key.split('.');
        let first = segments.next()?;
        let mut value = self.root.get(first)?;
        for segment in segments {
            value = value.as_object()?.get(segment)?;
        }
        value.as_str()
    }

    /// Resolves `key`, falling back to `fallback`, or to `key` itself when
    /// the fallback is empty. Never fails.
    pub fn translate(&self, key: &str, fallback: &str) -> String {
        match self.lookup(key) {
            Some(text) => text.to_string(),
            None if !fallback.is_empty() => fallback.to_string(),
            None => key.to_string(),
        }
    }

    /// Number of string leaves in the bundle.
    pub fn len(&self) -> usize {
        fn count(value: &Value) -> usize {
            match value {
                Value::String(_) => 1,
                Value::Object(map) => map.values().map(count).sum(),
                _ => 0,
            }
        }
        self.root.values().map(count).sum()
    }
}

impl Default for TranslationBundle {
    fn default() -> Self {
        Self::empty()
    }
}
