//! Application layer for the Painto storefront.
//!
//! Wires core services to concrete infrastructure and exposes the
//! storefront's user-facing actions.

pub mod messages;
pub mod mini_cart;
pub mod storefront;

pub use mini_cart::{MiniCart, MiniCartContent, MiniCartLine, MiniCartView, format_money};
pub use storefront::{ActionOutcome, Backend, BootstrapOptions, Storefront};
