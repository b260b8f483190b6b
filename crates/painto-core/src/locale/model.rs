//! Locale and text-direction models.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// A supported storefront language.
///
/// The locale's code doubles as its serialized form, so `"he"` in a config
/// file or in client storage parses straight into [`Locale::He`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Locale {
    /// English
    En,
    /// Hebrew
    He,
}

impl Locale {
    /// All supported locales, in language-switcher order.
    pub const ALL: [Locale; 2] = [Locale::En, Locale::He];

    /// The locale code (`en`, `he`).
    pub fn code(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::He => "he",
        }
    }

    /// Text direction derived from the locale.
    pub fn direction(self) -> Direction {
        match self {
            Locale::He => Direction::Rtl,
            Locale::En => Direction::Ltr,
        }
    }

    pub fn is_rtl(self) -> bool {
        self.direction() == Direction::Rtl
    }

    /// Native display name for a language switcher.
    pub fn display_name(self) -> &'static str {
        match self {
            Locale::En => "English",
            Locale::He => "עברית",
        }
    }

    /// Flag glyph shown next to the display name.
    pub fn flag(self) -> &'static str {
        match self {
            Locale::En => "🇺🇸",
            Locale::He => "🇮🇱",
        }
    }

    /// Parses a stored code, returning `None` for anything unsupported.
    pub fn from_code(code: &str) -> Option<Self> {
        code.trim().parse().ok()
    }
}

/// Text direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    Ltr,
    Rtl,
}

/// Document-level attributes a renderer applies when the locale changes.
///
/// `rtl_marker` and `ltr_marker` are mutually exclusive body markers consumed
/// by styling; exactly one of them is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentAttributes {
    pub dir: Direction,
    pub lang: Locale,
    pub rtl_marker: bool,
    pub ltr_marker: bool,
}

impl DocumentAttributes {
    pub fn for_locale(locale: Locale) -> Self {
        let dir = locale.direction();
        Self {
            dir,
            lang: locale,
            rtl_marker: dir == Direction::Rtl,
            ltr_marker: dir == Direction::Ltr,
        }
    }

    /// The body marker class name currently in effect.
    pub fn body_class(&self) -> &'static str {
        if self.rtl_marker { "rtl" } else { "ltr" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_direction_is_derived_from_locale() {
        assert_eq!(Locale::He.direction(), Direction::Rtl);
        assert_eq!(Locale::En.direction(), Direction::Ltr);
        assert!(Locale::He.is_rtl());
        assert!(!Locale::En.is_rtl());
    }

    #[test]
    fn test_parse_codes() {
        assert_eq!(Locale::from_code("he"), Some(Locale::He));
        assert_eq!(Locale::from_code(" en "), Some(Locale::En));
        assert_eq!(Locale::from_code("fr"), None);
        assert_eq!(Locale::from_code(""), None);
        assert_eq!(Locale::He.to_string(), "he");
        assert_eq!(Locale::En.as_ref(), Locale::En.code());
    }

    #[test]
    fn test_all_matches_iter() {
        let iterated: Vec<Locale> = Locale::iter().collect();
        assert_eq!(iterated, Locale::ALL.to_vec());
    }

    #[test]
    fn test_document_markers_are_exclusive() {
        for locale in Locale::ALL {
            let attrs = DocumentAttributes::for_locale(locale);
            assert_ne!(attrs.rtl_marker, attrs.ltr_marker);
            assert_eq!(attrs.dir, locale.direction());
        }
        assert_eq!(DocumentAttributes::for_locale(Locale::He).body_class(), "rtl");
        assert_eq!(DocumentAttributes::for_locale(Locale::En).body_class(), "ltr");
    }

    #[test]
    fn test_serde_uses_codes() {
        let json = serde_json::to_string(&Locale::He).unwrap();
        assert_eq!(json, "\"he\"");
        let back: Locale = serde_json::from_str("\"en\"").unwrap();
        assert_eq!(back, Locale::En);
    }
}
