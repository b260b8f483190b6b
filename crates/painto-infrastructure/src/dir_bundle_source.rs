//! Filesystem bundle source.

use std::path::PathBuf;

use async_trait::async_trait;
use painto_core::error::{PaintoError, Result};
use painto_core::i18n::{BundleSource, TranslationBundle};
use painto_core::locale::Locale;

/// Reads `<root>/<code>/common.json`, the same layout the web build serves
/// under `/locales`.
#[derive(Debug, Clone)]
pub struct DirBundleSource {
    root: PathBuf,
}

impl DirBundleSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn bundle_path(&self, locale: Locale) -> PathBuf {
        self.root.join(locale.code()).join("common.json")
    }
}

#[async_trait]
impl BundleSource for DirBundleSource {
    async fn fetch(&self, locale: Locale) -> Result<TranslationBundle> {
        let path = self.bundle_path(locale);
        let content = tokio::fs::read_to_string(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PaintoError::not_found("translation bundle", path.display().to_string())
            } else {
                PaintoError::io(format!("Failed to read {}: {}", path.display(), e))
            }
        })?;
        TranslationBundle::from_json_str(locale, &content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_reads_common_json() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("he")).unwrap();
        std::fs::write(
            dir.path().join("he").join("common.json"),
            r#"{"cart": {"title": "העגלה שלך"}}"#,
        )
        .unwrap();

        let source = DirBundleSource::new(dir.path());
        let bundle = source.fetch(Locale::He).await.unwrap();
        assert_eq!(bundle.lookup("cart.title"), Some("העגלה שלך"));

        let missing = source.fetch(Locale::En).await.unwrap_err();
        assert!(missing.is_not_found());
    }

    #[tokio::test]
    async fn test_unparseable_bundle_is_error() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("en")).unwrap();
        std::fs::write(dir.path().join("en").join("common.json"), "not json").unwrap();

        let err = DirBundleSource::new(dir.path())
            .fetch(Locale::En)
            .await
            .unwrap_err();
        assert!(err.is_serialization());
    }
}
