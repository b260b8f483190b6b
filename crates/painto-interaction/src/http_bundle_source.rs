//! HTTP bundle source.

use std::time::Duration;

use async_trait::async_trait;
use painto_core::error::{PaintoError, Result};
use painto_core::i18n::{BundleSource, TranslationBundle};
use painto_core::locale::Locale;
use reqwest::{Client, StatusCode};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetches `{base_url}/locales/{code}/common.json`.
#[derive(Clone)]
pub struct HttpBundleSource {
    http: Client,
    base_url: String,
}

impl HttpBundleSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn bundle_url(&self, locale: Locale) -> String {
        format!("{}/locales/{}/common.json", self.base_url, locale.code())
    }
}

#[async_trait]
impl BundleSource for HttpBundleSource {
    async fn fetch(&self, locale: Locale) -> Result<TranslationBundle> {
        let url = self.bundle_url(locale);
        let response = self.http.get(&url).timeout(REQUEST_TIMEOUT).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(PaintoError::not_found("translation bundle", url));
        }
        if !status.is_success() {
            return Err(PaintoError::Transport {
                status: Some(status.as_u16()),
                message: format!("Failed to fetch {}: {}", url, status),
            });
        }

        let body = response.text().await?;
        TranslationBundle::from_json_str(locale, &body)
    }
}
