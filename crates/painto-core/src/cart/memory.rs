//! In-memory commerce backend.
//!
//! Behaves like the storefront API closely enough for offline runs and
//! tests: it issues cart and line ids, merges lines of the same variant,
//! reports unknown variants as user errors and computes totals the way the
//! remote side would. Failure injection and call counters make the cart
//! session manager's contract observable.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::cart::api::CommerceApi;
use crate::cart::model::{
    Cart, CartCost, CartLine, CartLineInput, CartLineUpdate, Money, ProductSummary,
};
use crate::error::{PaintoError, Result, UserError};

const CHECKOUT_BASE: &str = "https://checkout.example.com/cart/c";

/// A purchasable variant known to the in-memory backend.
#[derive(Debug, Clone)]
pub struct CatalogVariant {
    pub variant_id: String,
    pub product_id: String,
    pub title: String,
    pub handle: String,
    /// Unit price in minor units (agorot, cents).
    pub unit_price_minor: u64,
    pub currency_code: String,
}

/// Which failure the next call should produce.
#[derive(Debug, Clone)]
pub enum InjectedFailure {
    Transport,
    Api(String),
    UserError(String),
}

#[derive(Debug, Default)]
struct Inner {
    next_cart: u64,
    next_line: u64,
    carts: HashMap<String, Vec<(String, String, u32)>>,
    fail_next: Option<InjectedFailure>,
}

/// See the module docs.
#[derive(Debug, Default)]
pub struct InMemoryCommerceApi {
    catalog: Vec<CatalogVariant>,
    latency: Duration,
    inner: Mutex<Inner>,
    creates: AtomicUsize,
    adds: AtomicUsize,
    calls: AtomicUsize,
}

impl InMemoryCommerceApi {
    pub fn new(catalog: Vec<CatalogVariant>) -> Self {
        Self {
            catalog,
            ..Self::default()
        }
    }

    /// A small adhesive catalog priced in shekels.
    pub fn with_demo_catalog() -> Self {
        let variant = |n: u32, title: &str, handle: &str, price: u64| CatalogVariant {
            variant_id: format!("gid://shopify/ProductVariant/{n}"),
            product_id: format!("gid://shopify/Product/{n}"),
            title: title.to_string(),
            handle: handle.to_string(),
            unit_price_minor: price,
            currency_code: "ILS".to_string(),
        };
        Self::new(vec![
            variant(101, "Tile Adhesive 25kg", "tile-adhesive-25kg", 8990),
            variant(102, "Flexible Sealant", "flexible-sealant", 3450),
            variant(103, "Wood Glue Pro", "wood-glue-pro", 2990),
        ])
    }

    /// Delays every call, to widen interleaving windows in tests.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Makes the next call fail with `failure`.
    pub async fn fail_next(&self, failure: InjectedFailure) {
        self.inner.lock().await.fail_next = Some(failure);
    }

    pub fn create_calls(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    pub fn add_calls(&self) -> usize {
        self.adds.load(Ordering::SeqCst)
    }

    /// Total number of calls of any kind.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub async fn cart_count(&self) -> usize {
        self.inner.lock().await.carts.len()
    }

    async fn begin(&self) -> Result<tokio::sync::MutexGuard<'_, Inner>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let mut inner = self.inner.lock().await;
        match inner.fail_next.take() {
            None => Ok(inner),
            Some(InjectedFailure::Transport) => {
                Err(PaintoError::transport("connection reset by peer"))
            }
            Some(InjectedFailure::Api(message)) => Err(PaintoError::Api(vec![message])),
            Some(InjectedFailure::UserError(message)) => Err(user_error(message)),
        }
    }

    fn variant(&self, variant_id: &str) -> Option<&CatalogVariant> {
        self.catalog.iter().find(|v| v.variant_id == variant_id)
    }

    fn check_lines(&self, lines: &[CartLineInput]) -> Result<()> {
        for line in lines {
            if self.variant(&line.variant_id).is_none() {
                return Err(user_error("invalid variant"));
            }
            if line.quantity == 0 {
                return Err(user_error("quantity must be greater than 0"));
            }
        }
        Ok(())
    }

    /// Merges `lines` into the cart, creating it when absent. The cart is
    /// left untouched when any quantity would overflow.
    fn merge(inner: &mut Inner, cart_id: &str, lines: Vec<CartLineInput>) -> Result<()> {
        let mut merged = inner.carts.get(cart_id).cloned().unwrap_or_default();
        for input in lines {
            if let Some((_, _, qty)) = merged.iter_mut().find(|(_, v, _)| *v == input.variant_id) {
                *qty = qty.checked_add(input.quantity).ok_or_else(quantity_overflow)?;
                continue;
            }
            inner.next_line += 1;
            let line_id = format!("gid://shopify/CartLine/{}", inner.next_line);
            merged.push((line_id, input.variant_id, input.quantity));
        }
        total_quantity(&merged)?;
        inner.carts.insert(cart_id.to_string(), merged);
        Ok(())
    }

    fn snapshot(&self, cart_id: &str, lines: &[(String, String, u32)]) -> Cart {
        let mut total_minor = 0u64;
        let mut currency = "ILS".to_string();
        let lines: Vec<CartLine> = lines
            .iter()
            .map(|(id, variant_id, quantity)| {
                let variant = self.variant(variant_id);
                if let Some(v) = variant {
                    total_minor += v.unit_price_minor * u64::from(*quantity);
                    currency = v.currency_code.clone();
                }
                CartLine {
                    id: id.clone(),
                    quantity: *quantity,
                    variant_id: variant_id.clone(),
                    variant_title: Some("Default Title".to_string()),
                    title: variant.map(|v| v.title.clone()),
                    image_url: None,
                    image_alt: None,
                    unit_price: variant
                        .map(|v| Money::new(format_minor(v.unit_price_minor), &v.currency_code)),
                }
            })
            .collect();
        let total = Money::new(format_minor(total_minor), currency);
        let token = cart_id.rsplit('/').next().unwrap_or(cart_id);
        Cart {
            id: cart_id.to_string(),
            checkout_url: Some(format!("{CHECKOUT_BASE}/{token}")),
            // Mutations reject carts whose total would not fit.
            total_quantity: lines.iter().fold(0u32, |acc, l| acc.saturating_add(l.quantity)),
            lines,
            cost: CartCost {
                subtotal: Some(total.clone()),
                total: Some(total),
            },
        }
    }

    fn existing<'a>(
        inner: &'a mut Inner,
        cart_id: &str,
    ) -> Result<&'a mut Vec<(String, String, u32)>> {
        inner
            .carts
            .get_mut(cart_id)
            .ok_or_else(|| user_error("The specified cart does not exist."))
    }
}

#[async_trait]
impl CommerceApi for InMemoryCommerceApi {
    async fn create_cart(&self, lines: Vec<CartLineInput>, _buyer_country: &str) -> Result<Cart> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        let mut inner = self.begin().await?;
        self.check_lines(&lines)?;

        inner.next_cart += 1;
        let cart_id = format!("gid://shopify/Cart/c{}", inner.next_cart);
        Self::merge(&mut inner, &cart_id, lines)?;
        Ok(self.snapshot(&cart_id, &inner.carts[&cart_id]))
    }

    async fn add_lines(&self, cart_id: &str, lines: Vec<CartLineInput>) -> Result<Cart> {
        self.adds.fetch_add(1, Ordering::SeqCst);
        let mut inner = self.begin().await?;
        self.check_lines(&lines)?;
        Self::existing(&mut inner, cart_id)?;

        Self::merge(&mut inner, cart_id, lines)?;
        Ok(self.snapshot(cart_id, &inner.carts[cart_id]))
    }

    async fn get_cart(&self, cart_id: &str) -> Result<Option<Cart>> {
        let inner = self.begin().await?;
        Ok(inner
            .carts
            .get(cart_id)
            .map(|lines| self.snapshot(cart_id, lines)))
    }

    async fn update_lines(&self, cart_id: &str, updates: Vec<CartLineUpdate>) -> Result<Cart> {
        let mut inner = self.begin().await?;
        let lines = Self::existing(&mut inner, cart_id)?;
        for update in &updates {
            if !lines.iter().any(|(id, _, _)| *id == update.line_id) {
                return Err(user_error("The merchandise line was not found in the cart."));
            }
        }
        let mut updated = lines.clone();
        for update in updates {
            if let Some(line) = updated.iter_mut().find(|(id, _, _)| *id == update.line_id) {
                line.2 = update.quantity;
            }
        }
        updated.retain(|(_, _, qty)| *qty > 0);
        total_quantity(&updated)?;
        *lines = updated;
        Ok(self.snapshot(cart_id, &inner.carts[cart_id]))
    }

    async fn remove_lines(&self, cart_id: &str, line_ids: Vec<String>) -> Result<Cart> {
        let mut inner = self.begin().await?;
        let lines = Self::existing(&mut inner, cart_id)?;
        lines.retain(|(id, _, _)| !line_ids.contains(id));
        Ok(self.snapshot(cart_id, &inner.carts[cart_id]))
    }

    async fn products(&self, first: u32) -> Result<Vec<ProductSummary>> {
        let _inner = self.begin().await?;
        Ok(self
            .catalog
            .iter()
            .take(first as usize)
            .map(|v| {
                let price = Money::new(format_minor(v.unit_price_minor), &v.currency_code);
                ProductSummary {
                    id: v.product_id.clone(),
                    title: v.title.clone(),
                    description: String::new(),
                    handle: v.handle.clone(),
                    compare_at_price: price.clone(),
                    price,
                    image_url: None,
                    image_alt: Some(v.title.clone()),
                    variant_id: Some(v.variant_id.clone()),
                }
            })
            .collect())
    }
}

fn user_error(message: impl Into<String>) -> PaintoError {
    PaintoError::UserErrors(vec![UserError {
        field: None,
        message: message.into(),
        code: None,
    }])
}

fn quantity_overflow() -> PaintoError {
    user_error("quantity exceeds maximum")
}

fn total_quantity(lines: &[(String, String, u32)]) -> Result<u32> {
    lines
        .iter()
        .try_fold(0u32, |acc, (_, _, qty)| acc.checked_add(*qty))
        .ok_or_else(quantity_overflow)
}

fn format_minor(minor: u64) -> String {
    format!("{}.{:02}", minor / 100, minor % 100)
}
