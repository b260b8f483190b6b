//! End-to-end storefront flows over the shipped dictionaries and the
//! in-memory commerce backend.

use std::sync::Arc;
use std::time::Duration;

use painto_application::{ActionOutcome, Backend, BootstrapOptions, MiniCartContent, Storefront};
use painto_core::cart::{InMemoryCommerceApi, InjectedFailure};
use painto_core::config::StorefrontConfig;
use painto_core::i18n::StaticBundleSource;
use painto_core::locale::Locale;
use painto_core::storage::{KeyValueStore, MemoryStore, PREFERRED_LANGUAGE_KEY};
use tempfile::TempDir;

const EN: &str = include_str!("../../../locales/en/common.json");
const HE: &str = include_str!("../../../locales/he/common.json");
const TILE_ADHESIVE: &str = "gid://shopify/ProductVariant/101";
const SEALANT: &str = "gid://shopify/ProductVariant/102";

fn config() -> StorefrontConfig {
    let mut config = StorefrontConfig::default();
    config.i18n.settle_delay_ms = 0;
    config
}

async fn storefront(api: Arc<InMemoryCommerceApi>) -> (Storefront, Arc<MemoryStore>) {
    let source = StaticBundleSource::new()
        .with_json(Locale::En, EN)
        .unwrap()
        .with_json(Locale::He, HE)
        .unwrap();
    let store = Arc::new(MemoryStore::new());
    let storefront = Storefront::assemble(
        config(),
        Arc::new(source),
        store.clone(),
        api,
        store.clone(),
        Backend::Offline,
    )
    .await;
    (storefront, store)
}

fn message(outcome: &ActionOutcome) -> &str {
    outcome.message().unwrap_or_default()
}

#[tokio::test]
async fn test_hebrew_messages_by_default() {
    let api = Arc::new(InMemoryCommerceApi::with_demo_catalog());
    let (storefront, _) = storefront(api.clone()).await;

    assert_eq!(storefront.localization().locale(), Locale::He);
    assert!(storefront.localization().is_rtl());

    let missing = storefront.add_to_cart(None, 1).await;
    assert!(!missing.is_success());
    assert_eq!(message(&missing), "מזהה מוצר חסר");
    assert_eq!(api.calls(), 0);

    let added = storefront.add_to_cart(Some(TILE_ADHESIVE), 1).await;
    assert_eq!(message(&added), "נוסף לעגלה!");
}

#[tokio::test]
async fn test_add_twice_reuses_cart() {
    let api = Arc::new(InMemoryCommerceApi::with_demo_catalog());
    let (storefront, _) = storefront(api.clone()).await;

    storefront.add_to_cart(Some(TILE_ADHESIVE), 1).await;
    let outcome = storefront.add_to_cart(Some(TILE_ADHESIVE), 1).await;

    match outcome {
        ActionOutcome::CartChanged { cart, .. } => {
            assert_eq!(cart.total_quantity, 2);
            assert_eq!(cart.lines.len(), 1);
        }
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(api.create_calls(), 1);
    assert_eq!(api.cart_count().await, 1);
}

#[tokio::test]
async fn test_failures_are_localized_after_switch() {
    let api = Arc::new(InMemoryCommerceApi::with_demo_catalog());
    let (storefront, store) = storefront(api.clone()).await;

    assert!(storefront.switch_locale(Locale::En).await);
    assert_eq!(
        store.get(PREFERRED_LANGUAGE_KEY).await.unwrap().as_deref(),
        Some("en")
    );

    let unknown = storefront
        .add_to_cart(Some("gid://shopify/ProductVariant/999"), 1)
        .await;
    assert_eq!(message(&unknown), "Unable to add to cart. Please try again.");

    api.fail_next(InjectedFailure::Transport).await;
    let checkout = storefront.buy_now(Some(SEALANT), 1).await;
    assert_eq!(message(&checkout), "Unable to create checkout. Please try again.");

    let no_cart = storefront.remove_item("gid://shopify/CartLine/1").await;
    assert_eq!(message(&no_cart), "Something went wrong. Please try again.");
}

#[tokio::test]
async fn test_buy_now_returns_checkout_url() {
    let api = Arc::new(InMemoryCommerceApi::with_demo_catalog());
    let (storefront, _) = storefront(api.clone()).await;

    let url = match storefront.buy_now(Some(SEALANT), 1).await {
        ActionOutcome::Checkout { url } => url,
        other => panic!("expected checkout, got {:?}", other),
    };
    assert!(url.starts_with("https://"));

    let cart = storefront.current_cart().await.unwrap();
    assert_eq!(cart.checkout_url.as_deref(), Some(url.as_str()));
}

#[tokio::test]
async fn test_update_and_remove_items() {
    let api = Arc::new(InMemoryCommerceApi::with_demo_catalog());
    let (storefront, _) = storefront(api.clone()).await;
    storefront.switch_locale(Locale::En).await;

    storefront.add_to_cart(Some(TILE_ADHESIVE), 1).await;
    let ActionOutcome::CartChanged { cart, .. } = storefront.add_to_cart(Some(SEALANT), 1).await
    else {
        panic!("add failed");
    };
    let sealant_line = cart.line_for_variant(SEALANT).unwrap().id.clone();

    let updated = storefront.update_item(&sealant_line, 3).await;
    assert_eq!(message(&updated), "Cart updated");

    let removed = storefront.remove_item(&sealant_line).await;
    assert_eq!(message(&removed), "Item removed");
    let ActionOutcome::CartChanged { cart, .. } = removed else {
        panic!("remove failed");
    };
    assert_eq!(cart.total_quantity, 1);
}

#[tokio::test]
async fn test_mini_cart_follows_changes() {
    let api = Arc::new(InMemoryCommerceApi::with_demo_catalog());
    let (storefront, _) = storefront(api).await;
    let mini_cart = storefront.open_mini_cart().await;

    let view = mini_cart.view();
    assert_eq!(view.heading, "העגלה שלך (0)");
    assert!(view.rtl);
    assert!(matches!(
        view.content,
        MiniCartContent::Empty { ref title, .. } if title == "העגלה שלך ריקה"
    ));

    let mut snapshots = mini_cart.subscribe();
    storefront.add_to_cart(Some(TILE_ADHESIVE), 2).await;
    tokio::time::timeout(
        Duration::from_secs(2),
        snapshots.wait_for(|cart| cart.as_ref().map(|c| c.total_quantity) == Some(2)),
    )
    .await
    .expect("mini cart did not refresh")
    .unwrap();
    assert_eq!(mini_cart.total_items(), 2);

    let view = mini_cart.view();
    let MiniCartContent::Lines { lines, total, .. } = &view.content else {
        panic!("expected lines");
    };
    assert_eq!(lines[0].title, "Tile Adhesive 25kg");
    assert_eq!(lines[0].quantity, "כמות: 2");
    assert_eq!(total.as_deref(), Some("סה״כ: ₪179.80"));

    let line_id = lines[0].line_id.clone();
    assert!(mini_cart.remove(&line_id).await);
    assert_eq!(mini_cart.total_items(), 0);

    storefront.clear_cart().await;
    tokio::time::timeout(Duration::from_secs(2), snapshots.wait_for(|cart| cart.is_none()))
        .await
        .expect("mini cart did not clear")
        .unwrap();
}

#[tokio::test]
async fn test_bootstrap_offline_restores_locale() {
    let home = TempDir::new().unwrap();
    for (code, json) in [("en", EN), ("he", HE)] {
        let dir = home.path().join("locales").join(code);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("common.json"), json).unwrap();
    }
    let options = || BootstrapOptions {
        home: Some(home.path().to_path_buf()),
        offline: true,
    };

    let storefront = Storefront::bootstrap(config(), options()).await.unwrap();
    assert_eq!(storefront.backend(), Backend::Offline);
    assert_eq!(storefront.translate("navigation.home", "Home"), "בית");
    storefront.switch_locale(Locale::En).await;
    let added = storefront.add_to_cart(Some(TILE_ADHESIVE), 1).await;
    assert!(added.is_success());

    let restarted = Storefront::bootstrap(config(), options()).await.unwrap();
    assert_eq!(restarted.localization().locale(), Locale::En);
    assert_eq!(restarted.translate("navigation.home", "x"), "Home");
    // Offline carts are not persisted across processes.
    assert!(restarted.current_cart().await.is_none());
}

#[tokio::test]
async fn test_bootstrap_without_shopify_falls_back_offline() {
    let home = TempDir::new().unwrap();
    let storefront = Storefront::bootstrap(
        config(),
        BootstrapOptions {
            home: Some(home.path().to_path_buf()),
            offline: false,
        },
    )
    .await
    .unwrap();

    assert_eq!(storefront.backend(), Backend::Offline);
    // No dictionaries on disk: keys fall back to the given text.
    assert_eq!(storefront.translate("cart.title", "Your Cart"), "Your Cart");
    let products = storefront.products(10).await.unwrap();
    assert_eq!(products.len(), 3);
}
