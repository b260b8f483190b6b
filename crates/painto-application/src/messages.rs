//! UI text keys with their English fallbacks.
//!
//! The Hebrew texts live in `locales/he/common.json`; a fallback is what a
//! user sees when neither the active nor the default dictionary has the key.

/// A translation key paired with its fallback text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Text {
    pub key: &'static str,
    pub fallback: &'static str,
}

const fn text(key: &'static str, fallback: &'static str) -> Text {
    Text { key, fallback }
}

pub const PRODUCT_UNAVAILABLE: Text = text("product.unavailable", "Product variant not available");
pub const ADDED: Text = text("product.added", "Added!");

pub const CART_TITLE: Text = text("cart.title", "Your Cart");
pub const CART_EMPTY_TITLE: Text = text("cart.empty.title", "Your cart is empty");
pub const CART_EMPTY_DESCRIPTION: Text =
    text("cart.empty.description", "Add some products to get started");
pub const CART_CONTINUE_SHOPPING: Text = text("cart.continueShopping", "Continue Shopping");
pub const CART_QUANTITY: Text = text("cart.quantity", "Qty");
pub const CART_SUBTOTAL: Text = text("cart.subtotal", "Subtotal");
pub const CART_TOTAL: Text = text("cart.total", "Total");
pub const CART_CHECKOUT: Text = text("cart.checkout", "Proceed to Checkout");
pub const CART_ITEM_REMOVED: Text = text("cart.itemRemoved", "Item removed");
pub const CART_ITEM_UPDATED: Text = text("cart.itemUpdated", "Cart updated");

pub const ADD_FAILED: Text = text("errors.addToCart", "Unable to add to cart. Please try again.");
pub const CHECKOUT_FAILED: Text =
    text("errors.checkout", "Unable to create checkout. Please try again.");
pub const REMOVE_FAILED: Text =
    text("errors.removeItem", "Unable to remove item. Please try again.");
pub const UPDATE_FAILED: Text =
    text("errors.updateItem", "Unable to update cart. Please try again.");
pub const GENERIC_FAILURE: Text = text("errors.generic", "Something went wrong. Please try again.");
