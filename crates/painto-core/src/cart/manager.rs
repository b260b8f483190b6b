//! Cart session manager.
//!
//! Maintains at most one persisted cart id per client and mediates every
//! line mutation through a [`CommerceApi`]. Failures never cross the public
//! surface: each operation logs and returns `None`, and the caller decides
//! whether to offer a retry.

use std::sync::Arc;

use tokio::sync::{Mutex, broadcast};

use crate::cart::api::CommerceApi;
use crate::cart::event::{CartEvent, CartEventKind};
use crate::cart::model::{Cart, CartLineInput, CartLineUpdate, ProductSummary};
use crate::error::{PaintoError, Result};
use crate::storage::{CART_ID_KEY, KeyValueStore};

const EVENT_CAPACITY: usize = 64;

/// Owns the client → cart id mapping.
///
/// Mutations are serialized through one lock, so two near-simultaneous
/// add-to-cart triggers on a client without a cart produce one remote cart:
/// the second caller observes the id persisted by the first and appends.
pub struct CartSessionManager {
    api: Arc<dyn CommerceApi>,
    store: Arc<dyn KeyValueStore>,
    buyer_country: String,
    events: broadcast::Sender<CartEvent>,
    mutation_lock: Mutex<()>,
}

impl CartSessionManager {
    /// # Arguments
    ///
    /// * `api` - Remote commerce backend
    /// * `store` - Client-local storage holding the cart id
    /// * `buyer_country` - Country hint attached to newly created carts
    pub fn new(
        api: Arc<dyn CommerceApi>,
        store: Arc<dyn KeyValueStore>,
        buyer_country: impl Into<String>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            api,
            store,
            buyer_country: buyer_country.into(),
            events,
            mutation_lock: Mutex::new(()),
        }
    }

    /// Subscribes to cart-changed broadcasts.
    pub fn subscribe(&self) -> broadcast::Receiver<CartEvent> {
        self.events.subscribe()
    }

    /// The persisted cart id, if any.
    pub async fn cart_id(&self) -> Option<String> {
        match self.store.get(CART_ID_KEY).await {
            Ok(id) => id.filter(|id| !id.is_empty()),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read persisted cart id");
                None
            }
        }
    }

    /// Adds `quantity` of `variant_id` to the client's cart, creating the
    /// cart first when no id is persisted.
    pub async fn ensure_cart(&self, variant_id: &str, quantity: u32) -> Option<Cart> {
        settle("ensure_cart", validate_line(variant_id, quantity))?;
        let _guard = self.mutation_lock.lock().await;

        match self.cart_id().await {
            Some(cart_id) => {
                tracing::debug!(cart_id = %cart_id, "Adding to existing cart");
                self.add_line_locked(&cart_id, variant_id, quantity).await
            }
            None => {
                tracing::debug!("No persisted cart, creating one");
                self.create_cart_locked(variant_id, quantity).await
            }
        }
    }

    /// Creates a new remote cart seeded with one line and persists its id.
    ///
    /// Any previously persisted id is replaced.
    pub async fn create_cart(&self, variant_id: &str, quantity: u32) -> Option<Cart> {
        settle("create_cart", validate_line(variant_id, quantity))?;
        let _guard = self.mutation_lock.lock().await;
        self.create_cart_locked(variant_id, quantity).await
    }

    /// Appends a line to `cart_id`. Never creates a cart.
    pub async fn add_line(&self, cart_id: &str, variant_id: &str, quantity: u32) -> Option<Cart> {
        settle("add_line", validate_line(variant_id, quantity))?;
        let _guard = self.mutation_lock.lock().await;
        self.add_line_locked(cart_id, variant_id, quantity).await
    }

    /// Read-only fetch. A missing cart and a failed request both yield `None`.
    pub async fn get_cart(&self, cart_id: &str) -> Option<Cart> {
        match settle("get_cart", self.api.get_cart(cart_id).await)? {
            Some(cart) => Some(cart),
            None => {
                tracing::warn!(cart_id = %cart_id, "Cart not found");
                None
            }
        }
    }

    /// Fetches the cart behind the persisted id, if any.
    pub async fn current_cart(&self) -> Option<Cart> {
        let cart_id = self.cart_id().await?;
        self.get_cart(&cart_id).await
    }

    /// Sets a line's quantity. `0` removes the line.
    pub async fn update_line(&self, cart_id: &str, line_id: &str, quantity: u32) -> Option<Cart> {
        let _guard = self.mutation_lock.lock().await;
        let updates = vec![CartLineUpdate {
            line_id: line_id.to_string(),
            quantity,
        }];
        let cart = settle("update_line", self.api.update_lines(cart_id, updates).await)?;

        tracing::info!(cart_id = %cart.id, line_id, quantity, "Cart line updated");
        self.emit(CartEventKind::LinesUpdated {
            cart_id: cart.id.clone(),
            total_quantity: cart.total_quantity,
        });
        Some(cart)
    }

    /// Removes one or more lines.
    pub async fn remove_lines(&self, cart_id: &str, line_ids: &[String]) -> Option<Cart> {
        if line_ids.is_empty() {
            settle::<()>(
                "remove_lines",
                Err(PaintoError::invalid_input("no line ids given")),
            )?;
        }
        let _guard = self.mutation_lock.lock().await;
        let cart = settle(
            "remove_lines",
            self.api.remove_lines(cart_id, line_ids.to_vec()).await,
        )?;

        tracing::info!(cart_id = %cart.id, removed = line_ids.len(), "Removed from cart");
        self.emit(CartEventKind::LinesRemoved {
            cart_id: cart.id.clone(),
            total_quantity: cart.total_quantity,
        });
        Some(cart)
    }

    /// Forgets the persisted cart id. The remote cart is abandoned, not
    /// deleted.
    pub async fn clear_cart(&self) {
        let _guard = self.mutation_lock.lock().await;
        if let Err(e) = self.store.remove(CART_ID_KEY).await {
            tracing::warn!(error = %e, "Failed to clear persisted cart id");
            return;
        }
        tracing::info!("Cart cleared");
        self.emit(CartEventKind::Cleared);
    }

    /// Creates a fresh cart for instant checkout and returns its checkout
    /// URL.
    pub async fn buy_now(&self, variant_id: &str, quantity: u32) -> Option<String> {
        let cart = self.create_cart(variant_id, quantity).await?;
        if cart.checkout_url.is_none() {
            tracing::warn!(cart_id = %cart.id, "Created cart has no checkout URL");
        }
        cart.checkout_url
    }

    /// Lists products for buy buttons. `None` on failure.
    pub async fn products(&self, first: u32) -> Option<Vec<ProductSummary>> {
        settle("products", self.api.products(first).await)
    }

    async fn create_cart_locked(&self, variant_id: &str, quantity: u32) -> Option<Cart> {
        let lines = vec![CartLineInput::new(variant_id, quantity)];
        let cart = settle(
            "create_cart",
            self.api.create_cart(lines, &self.buyer_country).await,
        )?;

        if let Err(e) = self.store.set(CART_ID_KEY, &cart.id).await {
            tracing::warn!(cart_id = %cart.id, error = %e, "Failed to persist cart id");
        }
        tracing::info!(cart_id = %cart.id, variant_id, quantity, "Cart created");
        self.emit(CartEventKind::Created {
            cart_id: cart.id.clone(),
            total_quantity: cart.total_quantity,
        });
        Some(cart)
    }

    async fn add_line_locked(
        &self,
        cart_id: &str,
        variant_id: &str,
        quantity: u32,
    ) -> Option<Cart> {
        let lines = vec![CartLineInput::new(variant_id, quantity)];
        let cart = settle("add_line", self.api.add_lines(cart_id, lines).await)?;

        tracing::info!(cart_id = %cart.id, variant_id, quantity, "Added to cart");
        self.emit(CartEventKind::LinesAdded {
            cart_id: cart.id.clone(),
            total_quantity: cart.total_quantity,
        });
        Some(cart)
    }

    fn emit(&self, kind: CartEventKind) {
        // No subscribers is fine
        let _ = self.events.send(CartEvent::new(kind));
    }
}

fn validate_line(variant_id: &str, quantity: u32) -> Result<()> {
    if variant_id.trim().is_empty() {
        return Err(PaintoError::invalid_input("product variant not available"));
    }
    if quantity == 0 {
        return Err(PaintoError::invalid_input("quantity must be at least 1"));
    }
    Ok(())
}

/// Collapses a failed operation into `None`.
fn settle<T>(operation: &'static str, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(
                operation,
                error = %e,
                remote = e.is_remote_semantic(),
                "Cart operation failed"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::memory::{InMemoryCommerceApi, InjectedFailure};
    use crate::storage::MemoryStore;

    const TILE: &str = "gid://shopify/ProductVariant/101";
    const SEALANT: &str = "gid://shopify/ProductVariant/102";

    fn manager(api: Arc<InMemoryCommerceApi>, store: MemoryStore) -> CartSessionManager {
        CartSessionManager::new(api, Arc::new(store), "IL")
    }

    fn setup() -> (Arc<InMemoryCommerceApi>, MemoryStore, CartSessionManager) {
        let api = Arc::new(InMemoryCommerceApi::with_demo_catalog());
        let store = MemoryStore::new();
        let mgr = manager(api.clone(), store.clone());
        (api, store, mgr)
    }

    #[tokio::test]
    async fn test_ensure_cart_creates_once_then_adds() {
        let (api, store, mgr) = setup();

        let first = mgr.ensure_cart(TILE, 1).await.expect("cart created");
        assert_eq!(api.create_calls(), 1);
        assert_eq!(
            store.get(CART_ID_KEY).await.unwrap().as_deref(),
            Some(first.id.as_str())
        );

        let second = mgr.ensure_cart(SEALANT, 2).await.expect("line added");
        assert_eq!(api.create_calls(), 1);
        assert_eq!(api.add_calls(), 1);
        assert_eq!(second.id, first.id);
        assert_eq!(second.total_quantity, 3);
    }

    #[tokio::test]
    async fn test_concurrent_ensure_cart_converges_on_one_cart() {
        let api = Arc::new(
            InMemoryCommerceApi::with_demo_catalog()
                .with_latency(std::time::Duration::from_millis(10)),
        );
        let mgr = Arc::new(manager(api.clone(), MemoryStore::new()));

        let a = tokio::spawn({
            let mgr = mgr.clone();
            async move { mgr.ensure_cart(TILE, 1).await }
        });
        let b = tokio::spawn({
            let mgr = mgr.clone();
            async move { mgr.ensure_cart(SEALANT, 1).await }
        });
        let (a, b) = (a.await.unwrap().unwrap(), b.await.unwrap().unwrap());

        assert_eq!(a.id, b.id);
        assert_eq!(api.create_calls(), 1);
        assert_eq!(api.cart_count().await, 1);
        assert_eq!(mgr.current_cart().await.unwrap().total_quantity, 2);
    }

    #[tokio::test]
    async fn test_quantity_overflow_returns_none_and_keeps_cart() {
        let (_, _, mgr) = setup();

        let cart = mgr.ensure_cart(TILE, u32::MAX).await.expect("cart created");
        assert!(mgr.ensure_cart(TILE, 1).await.is_none());

        let current = mgr.current_cart().await.expect("cart still readable");
        assert_eq!(current.id, cart.id);
        assert_eq!(current.total_quantity, u32::MAX);

        // later mutations still go through
        let line_id = current.lines[0].id.clone();
        let updated = mgr.update_line(&cart.id, &line_id, 5).await.expect("updated");
        assert_eq!(updated.total_quantity, 5);
    }

    #[tokio::test]
    async fn test_invalid_variant_returns_none_and_persists_nothing() {
        let (api, store, mgr) = setup();

        assert!(mgr.create_cart("variant-123", 1).await.is_none());
        assert_eq!(api.create_calls(), 1);
        assert_eq!(store.get(CART_ID_KEY).await.unwrap(), None);
        assert_eq!(mgr.cart_id().await, None);
    }

    #[tokio::test]
    async fn test_transport_and_api_errors_collapse_to_none() {
        let (api, _store, mgr) = setup();

        api.fail_next(InjectedFailure::Transport).await;
        assert!(mgr.ensure_cart(TILE, 1).await.is_none());

        api.fail_next(InjectedFailure::Api("Throttled".into())).await;
        assert!(mgr.ensure_cart(TILE, 1).await.is_none());

        // No automatic retry: the next explicit call succeeds
        assert!(mgr.ensure_cart(TILE, 1).await.is_some());
        assert_eq!(api.create_calls(), 3);
    }

    #[tokio::test]
    async fn test_input_guards_skip_remote_calls() {
        let (api, _store, mgr) = setup();

        assert!(mgr.ensure_cart("", 1).await.is_none());
        assert!(mgr.ensure_cart(TILE, 0).await.is_none());
        assert!(mgr.add_line("cart", "  ", 1).await.is_none());
        assert!(mgr.remove_lines("cart", &[]).await.is_none());
        assert_eq!(api.calls(), 0);
    }

    #[tokio::test]
    async fn test_remove_last_line_yields_empty_cart() {
        let (_api, _store, mgr) = setup();
        let cart = mgr.ensure_cart(TILE, 2).await.unwrap();
        let line_id = cart.lines[0].id.clone();

        let cart = mgr.remove_lines(&cart.id, &[line_id]).await.unwrap();
        assert_eq!(cart.total_quantity, 0);
        assert!(cart.lines.is_empty());
    }

    #[tokio::test]
    async fn test_update_line_quantity() {
        let (_api, _store, mgr) = setup();
        let cart = mgr.ensure_cart(TILE, 1).await.unwrap();
        let line_id = cart.lines[0].id.clone();

        let cart = mgr.update_line(&cart.id, &line_id, 5).await.unwrap();
        assert_eq!(cart.total_quantity, 5);
        assert!(mgr.update_line(&cart.id, "missing-line", 1).await.is_none());
    }

    #[tokio::test]
    async fn test_persisted_id_survives_reload() {
        let api = Arc::new(InMemoryCommerceApi::with_demo_catalog());
        let store = MemoryStore::new();
        let created = manager(api.clone(), store.clone())
            .ensure_cart(TILE, 1)
            .await
            .unwrap();

        // A fresh manager over the same storage simulates a page reload
        let reloaded = manager(api, store);
        let persisted = reloaded.cart_id().await.unwrap();
        let cart = reloaded.get_cart(&persisted).await.unwrap();
        assert_eq!(cart.id, persisted);
        assert_eq!(cart.id, created.id);
    }

    #[tokio::test]
    async fn test_get_cart_missing_is_none() {
        let (_api, _store, mgr) = setup();
        assert!(mgr.get_cart("gid://shopify/Cart/nope").await.is_none());
        assert!(mgr.current_cart().await.is_none());
    }

    #[tokio::test]
    async fn test_clear_cart_only_forgets_id() {
        let (api, store, mgr) = setup();
        let cart = mgr.ensure_cart(TILE, 1).await.unwrap();
        let calls = api.calls();

        mgr.clear_cart().await;
        assert_eq!(store.get(CART_ID_KEY).await.unwrap(), None);
        assert_eq!(api.calls(), calls);
        // remote cart still exists
        assert!(mgr.get_cart(&cart.id).await.is_some());

        mgr.ensure_cart(TILE, 1).await.unwrap();
        assert_eq!(api.create_calls(), 2);
    }

    #[tokio::test]
    async fn test_buy_now_returns_checkout_url() {
        let (_api, _store, mgr) = setup();
        let url = mgr.buy_now(TILE, 1).await.unwrap();
        assert!(url.starts_with("https://"));
        assert!(mgr.buy_now("variant-123", 1).await.is_none());
    }

    #[tokio::test]
    async fn test_successful_mutations_are_broadcast() {
        let (api, _store, mgr) = setup();
        let mut badge = mgr.subscribe();
        let mut drawer = mgr.subscribe();

        let cart = mgr.ensure_cart(TILE, 1).await.unwrap();
        mgr.ensure_cart(TILE, 1).await.unwrap();
        let line_id = cart.lines[0].id.clone();
        mgr.remove_lines(&cart.id, &[line_id]).await.unwrap();
        api.fail_next(InjectedFailure::Transport).await;
        assert!(mgr.ensure_cart(TILE, 1).await.is_none());
        mgr.clear_cart().await;

        let mut kinds = Vec::new();
        while let Ok(event) = badge.try_recv() {
            kinds.push(event.kind);
        }
        assert!(matches!(kinds[0], CartEventKind::Created { total_quantity: 1, .. }));
        assert!(matches!(kinds[1], CartEventKind::LinesAdded { total_quantity: 2, .. }));
        assert!(matches!(kinds[2], CartEventKind::LinesRemoved { total_quantity: 0, .. }));
        assert_eq!(kinds[3], CartEventKind::Cleared);
        assert_eq!(kinds.len(), 4);

        // Every subscriber sees the same stream
        assert_eq!(drawer.recv().await.unwrap().cart_id(), Some(cart.id.as_str()));
        let mut rest = 0;
        while drawer.try_recv().is_ok() {
            rest += 1;
        }
        assert_eq!(rest, 3);
    }
}
