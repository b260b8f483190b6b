//! Cart sessions over a remote commerce API.

pub mod api;
pub mod event;
pub mod manager;
pub mod memory;
pub mod model;

pub use api::CommerceApi;
pub use event::{CartEvent, CartEventKind};
pub use manager::CartSessionManager;
pub use memory::{CatalogVariant, InMemoryCommerceApi, InjectedFailure};
pub use model::{
    Cart, CartCost, CartLine, CartLineInput, CartLineUpdate, Money, ProductSummary,
};
