//! Core domain of the Painto storefront.
//!
//! Two subsystems live here:
//!
//! - [`i18n::LocalizationRuntime`]: active locale, lazily loaded translation
//!   bundles with fallback, text direction and the persisted preference.
//! - [`cart::CartSessionManager`]: one persisted cart id per client and
//!   every line mutation routed through a [`cart::CommerceApi`].
//!
//! Both depend only on injected traits ([`storage::KeyValueStore`],
//! [`i18n::BundleSource`], [`cart::CommerceApi`]); concrete implementations
//! live in the infrastructure and interaction crates.

pub mod cart;
pub mod config;
pub mod error;
pub mod i18n;
pub mod locale;
pub mod storage;

// Re-export common error type
pub use error::{PaintoError, Result};
