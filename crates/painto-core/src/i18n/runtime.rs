//! Localization runtime.
//!
//! Owns the active-locale pointer, the per-locale bundle cache and the
//! persisted language preference. UI code holds a clone of the runtime (all
//! state sits behind `Arc`s) and either calls [`LocalizationRuntime::translate`]
//! directly or subscribes to [`LocaleState`] changes.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock, watch};

use crate::config::I18nConfig;
use crate::error::Result;
use crate::i18n::bundle::TranslationBundle;
use crate::i18n::source::BundleSource;
use crate::locale::{Direction, DocumentAttributes, Locale};
use crate::storage::{KeyValueStore, PREFERRED_LANGUAGE_KEY};

/// Lifecycle of one locale's cache entry.
///
/// `Ready` is terminal: a cached bundle is never re-fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BundleState {
    Idle,
    Loading,
    Ready,
}

/// Snapshot published to subscribers whenever the locale, the loading flag
/// or the active bundle changes.
#[derive(Debug, Clone)]
pub struct LocaleState {
    pub locale: Locale,
    pub direction: Direction,
    pub is_loading: bool,
    /// Incremented on every effective locale switch.
    pub generation: u64,
    pub bundle: Arc<TranslationBundle>,
}

impl LocaleState {
    fn new(locale: Locale) -> Self {
        Self {
            locale,
            direction: locale.direction(),
            is_loading: false,
            generation: 0,
            bundle: Arc::new(TranslationBundle::empty()),
        }
    }

    pub fn is_rtl(&self) -> bool {
        self.direction == Direction::Rtl
    }

    pub fn document_attributes(&self) -> DocumentAttributes {
        DocumentAttributes::for_locale(self.locale)
    }
}

/// Process-wide localization context.
#[derive(Clone)]
pub struct LocalizationRuntime {
    source: Arc<dyn BundleSource>,
    store: Arc<dyn KeyValueStore>,
    default_locale: Locale,
    initial_locale: Locale,
    settle_delay: Duration,
    cache: Arc<RwLock<HashMap<Locale, Arc<TranslationBundle>>>>,
    in_flight: Arc<Mutex<HashSet<Locale>>>,
    state: Arc<watch::Sender<LocaleState>>,
}

impl LocalizationRuntime {
    /// Creates a runtime. The initial locale is active but no bundle is
    /// loaded until [`initialize`](Self::initialize) or a switch.
    pub fn new(
        config: &I18nConfig,
        source: Arc<dyn BundleSource>,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        let (state, _) = watch::channel(LocaleState::new(config.initial_locale));
        Self {
            source,
            store,
            default_locale: config.default_locale,
            initial_locale: config.initial_locale,
            settle_delay: config.settle_delay(),
            cache: Arc::new(RwLock::new(HashMap::new())),
            in_flight: Arc::new(Mutex::new(HashSet::new())),
            state: Arc::new(state),
        }
    }

    /// Restores the stored preference (or the initial locale), persists it,
    /// and loads its bundle. Returns the resolved locale.
    pub async fn initialize(&self) -> Locale {
        let stored = match self.store.get(PREFERRED_LANGUAGE_KEY).await {
            Ok(value) => value.as_deref().and_then(Locale::from_code),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read stored language preference");
                None
            }
        };
        let locale = stored.unwrap_or(self.initial_locale);

        let mut generation = 0;
        self.state.send_modify(|s| {
            s.locale = locale;
            s.direction = locale.direction();
            s.is_loading = true;
            generation = s.generation;
        });
        self.persist_preference(locale).await;

        let bundle = self.load_bundle(locale).await;
        // A switch made meanwhile owns the loading flag until it settles.
        self.state.send_modify(|s| {
            if s.locale == locale {
                s.bundle = bundle;
            }
            if s.generation == generation {
                s.is_loading = false;
            }
        });

        tracing::info!(locale = %locale, restored = stored.is_some(), "Localization initialized");
        locale
    }

    /// Switches the active locale.
    ///
    /// Returns `false` without any state transition when `locale` is already
    /// active. Otherwise flips the direction, sets the loading flag, persists
    /// the preference and loads the new bundle. The loading flag clears after
    /// the settle delay unless a newer switch has happened meanwhile.
    pub async fn set_locale(&self, locale: Locale) -> bool {
        let mut switched = None;
        self.state.send_if_modified(|s| {
            if s.locale == locale {
                return false;
            }
            s.locale = locale;
            s.direction = locale.direction();
            s.is_loading = true;
            s.generation += 1;
            switched = Some(s.generation);
            true
        });
        let Some(generation) = switched else {
            return false;
        };

        tracing::info!(locale = %locale, rtl = locale.is_rtl(), "Language switched");
        self.schedule_settle(generation);
        self.persist_preference(locale).await;

        let bundle = self.load_bundle(locale).await;
        // A slower load for a locale the user already left must not
        // replace the active bundle.
        self.state.send_if_modified(|s| {
            if s.locale != locale {
                return false;
            }
            s.bundle = bundle;
            true
        });
        true
    }

    /// Resolves `key` against the active bundle. See
    /// [`TranslationBundle::translate`] for the fallback rules.
    pub fn translate(&self, key: &str, fallback: &str) -> String {
        self.state.borrow().bundle.translate(key, fallback)
    }

    /// Returns the bundle for `locale`, fetching and caching it on first use.
    ///
    /// A failed non-default locale is substituted with the default locale's
    /// bundle; if that fails too, the empty bundle is returned. Failures are
    /// not cached, so a later call retries.
    pub async fn load_bundle(&self, locale: Locale) -> Arc<TranslationBundle> {
        if let Some(bundle) = self.cached(locale).await {
            tracing::debug!(locale = %locale, "Translation bundle cache hit");
            return bundle;
        }

        let err = match self.fetch_and_cache(locale).await {
            Ok(bundle) => return bundle,
            Err(e) => e,
        };
        tracing::warn!(locale = %locale, error = %err, "Failed to load translations");

        if locale != self.default_locale {
            let fallback = match self.cached(self.default_locale).await {
                Some(bundle) => Ok(bundle),
                None => self.fetch_and_cache(self.default_locale).await,
            };
            match fallback {
                Ok(bundle) => {
                    tracing::info!(
                        locale = %locale,
                        fallback = %self.default_locale,
                        "Using fallback translations"
                    );
                    return bundle;
                }
                Err(e) => {
                    tracing::warn!(
                        fallback = %self.default_locale,
                        error = %e,
                        "Failed to load fallback translations"
                    );
                }
            }
        }

        Arc::new(TranslationBundle::empty())
    }

    /// Cache state of `locale`.
    pub async fn bundle_state(&self, locale: Locale) -> BundleState {
        if self.cache.read().await.contains_key(&locale) {
            BundleState::Ready
        } else if self.in_flight.lock().await.contains(&locale) {
            BundleState::Loading
        } else {
            BundleState::Idle
        }
    }

    /// Subscribes to state changes.
    pub fn subscribe(&self) -> watch::Receiver<LocaleState> {
        self.state.subscribe()
    }

    /// A copy of the current state.
    pub fn current(&self) -> LocaleState {
        self.state.borrow().clone()
    }

    pub fn locale(&self) -> Locale {
        self.state.borrow().locale
    }

    pub fn direction(&self) -> Direction {
        self.state.borrow().direction
    }

    pub fn is_rtl(&self) -> bool {
        self.state.borrow().is_rtl()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    pub fn document_attributes(&self) -> DocumentAttributes {
        self.state.borrow().document_attributes()
    }

    pub fn available_locales(&self) -> &'static [Locale] {
        &Locale::ALL
    }

    pub fn default_locale(&self) -> Locale {
        self.default_locale
    }

    async fn cached(&self, locale: Locale) -> Option<Arc<TranslationBundle>> {
        self.cache.read().await.get(&locale).cloned()
    }

    async fn fetch_and_cache(&self, locale: Locale) -> Result<Arc<TranslationBundle>> {
        self.in_flight.lock().await.insert(locale);
        let fetched = self.source.fetch(locale).await;
        self.in_flight.lock().await.remove(&locale);

        let bundle = Arc::new(fetched?);
        tracing::info!(locale = %locale, keys = bundle.len(), "Loaded translations");
        self.cache.write().await.insert(locale, bundle.clone());
        Ok(bundle)
    }

    async fn persist_preference(&self, locale: Locale) {
        if let Err(e) = self.store.set(PREFERRED_LANGUAGE_KEY, locale.code()).await {
            tracing::warn!(locale = %locale, error = %e, "Failed to persist language preference");
        }
    }

    fn schedule_settle(&self, generation: u64) {
        let clear = move |s: &mut LocaleState| {
            if s.generation != generation || !s.is_loading {
                return false;
            }
            s.is_loading = false;
            true
        };

        if self.settle_delay.is_zero() {
            self.state.send_if_modified(clear);
            return;
        }

        let state = self.state.clone();
        let delay = self.settle_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            state.send_if_modified(clear);
        });
    }
}
