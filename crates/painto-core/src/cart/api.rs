//! Commerce API trait.

use async_trait::async_trait;

use crate::cart::model::{Cart, CartLineInput, CartLineUpdate, ProductSummary};
use crate::error::Result;

/// Remote commerce backend owning carts.
///
/// Every call is a network round trip. Implementations report transport
/// failures, GraphQL errors and user errors as distinct [`PaintoError`]
/// variants; the cart session manager collapses them.
///
/// [`PaintoError`]: crate::error::PaintoError
#[async_trait]
pub trait CommerceApi: Send + Sync {
    /// Creates a cart pre-seeded with `lines`.
    async fn create_cart(&self, lines: Vec<CartLineInput>, buyer_country: &str) -> Result<Cart>;

    /// Appends lines to an existing cart (the API merges same-variant lines).
    async fn add_lines(&self, cart_id: &str, lines: Vec<CartLineInput>) -> Result<Cart>;

    /// Fetches a cart. `Ok(None)` when the API has no such cart.
    async fn get_cart(&self, cart_id: &str) -> Result<Option<Cart>>;

    /// Changes line quantities.
    async fn update_lines(&self, cart_id: &str, updates: Vec<CartLineUpdate>) -> Result<Cart>;

    /// Removes lines by id.
    async fn remove_lines(&self, cart_id: &str, line_ids: Vec<String>) -> Result<Cart>;

    /// Lists the first `first` products.
    async fn products(&self, first: u32) -> Result<Vec<ProductSummary>>;
}
