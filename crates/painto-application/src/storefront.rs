//! Storefront facade.
//!
//! Wires the localization runtime and the cart session manager to concrete
//! collaborators and exposes the button-level actions of the storefront
//! (add to cart, buy now, remove and update items), each returning a
//! localized [`ActionOutcome`].

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use painto_core::cart::{
    Cart, CartSessionManager, CommerceApi, InMemoryCommerceApi, ProductSummary,
};
use painto_core::config::StorefrontConfig;
use painto_core::i18n::{BundleSource, LocalizationRuntime};
use painto_core::locale::Locale;
use painto_core::storage::{KeyValueStore, MemoryStore};
use painto_infrastructure::{DirBundleSource, PaintoPaths, TomlClientStore};
use painto_interaction::{HttpBundleSource, StorefrontClient};
use strum::{AsRefStr, Display};

use crate::messages::{self, Text};
use crate::mini_cart::MiniCart;

/// Which commerce backend the cart talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Backend {
    Shopify,
    /// In-process demo catalog; carts live only as long as the process.
    Offline,
}

/// Options that select where state lives and which backend is used.
#[derive(Debug, Clone, Default)]
pub struct BootstrapOptions {
    /// Root for config, client state and dictionaries instead of the
    /// platform config directory.
    pub home: Option<PathBuf>,
    /// Use the demo catalog even when Shopify is configured.
    pub offline: bool,
}

/// Result of a storefront action, ready for display.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    /// The cart changed; `message` is a localized confirmation.
    CartChanged { cart: Cart, message: String },
    /// Instant checkout is ready at `url`.
    Checkout { url: String },
    /// The action failed; `message` is localized and offers a retry.
    Failed { message: String },
}

impl ActionOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::CartChanged { message, .. } | Self::Failed { message } => Some(message),
            Self::Checkout { .. } => None,
        }
    }
}

/// Process-wide storefront context.
#[derive(Clone)]
pub struct Storefront {
    config: Arc<StorefrontConfig>,
    localization: LocalizationRuntime,
    cart: Arc<CartSessionManager>,
    backend: Backend,
}

impl Storefront {
    /// Builds a storefront from configuration.
    ///
    /// - Dictionaries come from `locales_base_url` over HTTP, else from
    ///   `locales_dir`, else from `<config dir>/locales`.
    /// - The locale preference is persisted to the client state file.
    /// - Carts go to Shopify when it is configured and `offline` is not set;
    ///   otherwise to the demo catalog with an in-memory cart id, so that
    ///   offline carts never overwrite a real persisted cart.
    pub async fn bootstrap(config: StorefrontConfig, options: BootstrapOptions) -> Result<Self> {
        let paths = PaintoPaths::new(options.home.as_deref());

        let i18n = &config.i18n;
        let source: Arc<dyn BundleSource> = match (&i18n.locales_base_url, &i18n.locales_dir) {
            (Some(url), _) => Arc::new(HttpBundleSource::new(url.clone())),
            (None, Some(dir)) => Arc::new(DirBundleSource::new(dir.clone())),
            (None, None) => Arc::new(DirBundleSource::new(paths.locales_dir()?)),
        };

        let state_file = match &config.storage.state_file {
            Some(path) => path.clone(),
            None => paths.client_state_file()?,
        };
        let client_store: Arc<dyn KeyValueStore> = Arc::new(
            TomlClientStore::with_path(state_file.clone())
                .await
                .with_context(|| format!("Failed to open client state {}", state_file.display()))?,
        );

        let use_shopify = !options.offline && config.shopify.is_configured();
        if !options.offline && !use_shopify {
            tracing::warn!("[Bootstrap] Shopify is not configured, using the offline catalog");
        }
        let (api, cart_store, backend): (Arc<dyn CommerceApi>, Arc<dyn KeyValueStore>, Backend) =
            if use_shopify {
                let client = StorefrontClient::new(&config.shopify)
                    .context("Failed to create Shopify client")?;
                (Arc::new(client), client_store.clone(), Backend::Shopify)
            } else {
                (
                    Arc::new(InMemoryCommerceApi::with_demo_catalog()),
                    Arc::new(MemoryStore::new()),
                    Backend::Offline,
                )
            };

        tracing::info!(backend = %backend, "[Bootstrap] Storefront wired");
        Ok(Self::assemble(config, source, client_store, api, cart_store, backend).await)
    }

    /// Builds a storefront from explicit collaborators and initializes
    /// localization.
    pub async fn assemble(
        config: StorefrontConfig,
        source: Arc<dyn BundleSource>,
        locale_store: Arc<dyn KeyValueStore>,
        api: Arc<dyn CommerceApi>,
        cart_store: Arc<dyn KeyValueStore>,
        backend: Backend,
    ) -> Self {
        let localization = LocalizationRuntime::new(&config.i18n, source, locale_store);
        let cart = Arc::new(CartSessionManager::new(
            api,
            cart_store,
            config.shopify.buyer_country_code.clone(),
        ));
        localization.initialize().await;

        Self {
            config: Arc::new(config),
            localization,
            cart,
            backend,
        }
    }

    pub fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    pub fn localization(&self) -> &LocalizationRuntime {
        &self.localization
    }

    pub fn cart(&self) -> &Arc<CartSessionManager> {
        &self.cart
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    pub fn translate(&self, key: &str, fallback: &str) -> String {
        self.localization.translate(key, fallback)
    }

    pub async fn switch_locale(&self, locale: Locale) -> bool {
        self.localization.set_locale(locale).await
    }

    /// Adds to the client's cart, creating it on first use.
    pub async fn add_to_cart(&self, variant_id: Option<&str>, quantity: u32) -> ActionOutcome {
        let Some(variant_id) = present(variant_id) else {
            return self.failed(messages::PRODUCT_UNAVAILABLE);
        };
        match self.cart.ensure_cart(variant_id, quantity).await {
            Some(cart) => self.changed(cart, messages::ADDED),
            None => self.failed(messages::ADD_FAILED),
        }
    }

    /// Creates a fresh single-line cart and hands back its checkout URL.
    pub async fn buy_now(&self, variant_id: Option<&str>, quantity: u32) -> ActionOutcome {
        let Some(variant_id) = present(variant_id) else {
            return self.failed(messages::PRODUCT_UNAVAILABLE);
        };
        match self.cart.buy_now(variant_id, quantity).await {
            Some(url) => ActionOutcome::Checkout { url },
            None => self.failed(messages::CHECKOUT_FAILED),
        }
    }

    /// Removes one line from the persisted cart.
    pub async fn remove_item(&self, line_id: &str) -> ActionOutcome {
        let Some(cart_id) = self.cart.cart_id().await else {
            return self.failed(messages::GENERIC_FAILURE);
        };
        match self.cart.remove_lines(&cart_id, &[line_id.to_string()]).await {
            Some(cart) => self.changed(cart, messages::CART_ITEM_REMOVED),
            None => self.failed(messages::REMOVE_FAILED),
        }
    }

    /// Sets a line's quantity in the persisted cart; `0` removes it.
    pub async fn update_item(&self, line_id: &str, quantity: u32) -> ActionOutcome {
        let Some(cart_id) = self.cart.cart_id().await else {
            return self.failed(messages::GENERIC_FAILURE);
        };
        match self.cart.update_line(&cart_id, line_id, quantity).await {
            Some(cart) => self.changed(cart, messages::CART_ITEM_UPDATED),
            None => self.failed(messages::UPDATE_FAILED),
        }
    }

    pub async fn current_cart(&self) -> Option<Cart> {
        self.cart.current_cart().await
    }

    pub async fn clear_cart(&self) {
        self.cart.clear_cart().await;
    }

    pub async fn products(&self, first: u32) -> Option<Vec<ProductSummary>> {
        self.cart.products(first).await
    }

    pub async fn open_mini_cart(&self) -> MiniCart {
        MiniCart::open(self.cart.clone(), self.localization.clone()).await
    }

    fn text(&self, text: Text) -> String {
        self.localization.translate(text.key, text.fallback)
    }

    fn changed(&self, cart: Cart, text: Text) -> ActionOutcome {
        ActionOutcome::CartChanged {
            cart,
            message: self.text(text),
        }
    }

    fn failed(&self, text: Text) -> ActionOutcome {
        ActionOutcome::Failed {
            message: self.text(text),
        }
    }
}

fn present(variant_id: Option<&str>) -> Option<&str> {
    variant_id.filter(|id| !id.trim().is_empty())
}
