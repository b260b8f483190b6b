//! Mini cart: a cart snapshot kept fresh by cart-changed broadcasts.

use std::fmt;
use std::sync::Arc;

use painto_core::cart::{Cart, CartEvent, CartEventKind, CartSessionManager, Money};
use painto_core::i18n::LocalizationRuntime;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

use crate::messages::{self, Text};

/// Subscribes to a [`CartSessionManager`] and re-fetches the persisted cart
/// on every change notification.
///
/// The listener task stops when the `MiniCart` is dropped.
pub struct MiniCart {
    manager: Arc<CartSessionManager>,
    localization: LocalizationRuntime,
    snapshot: Arc<watch::Sender<Option<Cart>>>,
    listener: JoinHandle<()>,
}

impl MiniCart {
    /// Fetches the current cart and starts listening for changes.
    pub async fn open(manager: Arc<CartSessionManager>, localization: LocalizationRuntime) -> Self {
        // Subscribe before the first fetch so a concurrent change is not missed.
        let events = manager.subscribe();
        let (snapshot, _) = watch::channel(manager.current_cart().await);
        let snapshot = Arc::new(snapshot);
        let listener = tokio::spawn(listen(manager.clone(), events, snapshot.clone()));

        Self {
            manager,
            localization,
            snapshot,
            listener,
        }
    }

    pub fn snapshot(&self) -> Option<Cart> {
        self.snapshot.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Cart>> {
        self.snapshot.subscribe()
    }

    /// Badge count; `0` when there is no cart.
    pub fn total_items(&self) -> u32 {
        self.snapshot
            .borrow()
            .as_ref()
            .map_or(0, |cart| cart.total_quantity)
    }

    /// Re-fetches immediately, without waiting for a notification.
    pub async fn refresh(&self) -> Option<Cart> {
        let cart = self.manager.current_cart().await;
        self.snapshot.send_replace(cart.clone());
        cart
    }

    /// Removes one line from the persisted cart. The resulting broadcast
    /// refreshes every open mini cart, this one included.
    pub async fn remove(&self, line_id: &str) -> bool {
        let Some(cart_id) = self.manager.cart_id().await else {
            return false;
        };
        let removed = self
            .manager
            .remove_lines(&cart_id, &[line_id.to_string()])
            .await;
        if let Some(cart) = &removed {
            self.snapshot.send_replace(Some(cart.clone()));
        }
        removed.is_some()
    }

    /// Localized rendering of the current snapshot.
    pub fn view(&self) -> MiniCartView {
        let t = |text: Text| self.localization.translate(text.key, text.fallback);
        let cart = self.snapshot();
        let total_items = cart.as_ref().map_or(0, |cart| cart.total_quantity);
        let heading = format!("{} ({})", t(messages::CART_TITLE), total_items);
        let rtl = self.localization.is_rtl();

        let Some(cart) = cart.filter(|cart| !cart.is_empty()) else {
            return MiniCartView {
                rtl,
                heading,
                total_items,
                content: MiniCartContent::Empty {
                    title: t(messages::CART_EMPTY_TITLE),
                    description: t(messages::CART_EMPTY_DESCRIPTION),
                    continue_shopping: t(messages::CART_CONTINUE_SHOPPING),
                },
            };
        };

        let quantity_label = t(messages::CART_QUANTITY);
        let lines = cart
            .lines
            .iter()
            .map(|line| MiniCartLine {
                line_id: line.id.clone(),
                title: line
                    .title
                    .clone()
                    .or_else(|| line.variant_title.clone())
                    .unwrap_or_else(|| line.variant_id.clone()),
                price: line.unit_price.as_ref().map(format_money),
                quantity: format!("{}: {}", quantity_label, line.quantity),
            })
            .collect();

        MiniCartView {
            rtl,
            heading,
            total_items,
            content: MiniCartContent::Lines {
                lines,
                subtotal: cart
                    .cost
                    .subtotal
                    .as_ref()
                    .map(|money| {
                        format!("{}: {}", t(messages::CART_SUBTOTAL), format_money(money))
                    }),
                total: cart
                    .cost
                    .total
                    .as_ref()
                    .map(|money| {
                        format!("{}: {}", t(messages::CART_TOTAL), format_money(money))
                    }),
                checkout: cart
                    .checkout_url
                    .map(|url| (t(messages::CART_CHECKOUT), url)),
            },
        }
    }
}

impl Drop for MiniCart {
    fn drop(&mut self) {
        self.listener.abort();
    }
}

async fn listen(
    manager: Arc<CartSessionManager>,
    mut events: broadcast::Receiver<CartEvent>,
    snapshot: Arc<watch::Sender<Option<Cart>>>,
) {
    loop {
        let cart = match events.recv().await {
            Ok(CartEvent {
                kind: CartEventKind::Cleared,
                ..
            }) => None,
            Ok(event) => {
                tracing::debug!(cart_id = ?event.cart_id(), "Cart changed, refreshing mini cart");
                manager.current_cart().await
            }
            Err(RecvError::Lagged(skipped)) => {
                tracing::debug!(skipped, "Mini cart lagged behind cart events");
                manager.current_cart().await
            }
            Err(RecvError::Closed) => break,
        };
        snapshot.send_replace(cart);
    }
}

/// Display form of an API amount: two decimals with the currency symbol.
/// Unparseable amounts are shown as received.
pub fn format_money(money: &Money) -> String {
    let symbol = match money.currency_code.as_str() {
        "ILS" => "₪".to_string(),
        "USD" => "$".to_string(),
        "EUR" => "€".to_string(),
        other => format!("{} ", other),
    };
    match money.amount.parse::<f64>() {
        Ok(amount) => format!("{}{:.2}", symbol, amount),
        Err(_) => format!("{}{}", symbol, money.amount),
    }
}

/// Everything a mini-cart drawer shows, already localized.
#[derive(Debug, Clone, PartialEq)]
pub struct MiniCartView {
    pub rtl: bool,
    /// `"<title> (<count>)"`.
    pub heading: String,
    pub total_items: u32,
    pub content: MiniCartContent,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MiniCartContent {
    Empty {
        title: String,
        description: String,
        continue_shopping: String,
    },
    Lines {
        lines: Vec<MiniCartLine>,
        subtotal: Option<String>,
        total: Option<String>,
        /// Label and URL of the checkout link.
        checkout: Option<(String, String)>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct MiniCartLine {
    pub line_id: String,
    pub title: String,
    pub price: Option<String>,
    pub quantity: String,
}

impl fmt::Display for MiniCartView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.heading)?;
        match &self.content {
            MiniCartContent::Empty {
                title,
                description,
                continue_shopping,
            } => {
                writeln!(f, "  {}", title)?;
                writeln!(f, "  {}", description)?;
                write!(f, "  [{}]", continue_shopping)
            }
            MiniCartContent::Lines {
                lines,
                subtotal,
                total,
                checkout,
            } => {
                for line in lines {
                    write!(f, "  - {}  {}", line.title, line.quantity)?;
                    if let Some(price) = &line.price {
                        write!(f, "  {}", price)?;
                    }
                    writeln!(f, "  ({})", line.line_id)?;
                }
                for amount in [subtotal, total].into_iter().flatten() {
                    writeln!(f, "  {}", amount)?;
                }
                if let Some((label, url)) = checkout {
                    write!(f, "  {} → {}", label, url)?;
                }
                Ok(())
            }
        }
    }
}
