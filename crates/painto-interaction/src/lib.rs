//! Remote services behind the storefront core traits.
//!
//! - [`shopify::StorefrontClient`] implements [`painto_core::cart::CommerceApi`]
//!   over the Shopify Storefront GraphQL API.
//! - [`HttpBundleSource`] fetches translation dictionaries from the site's
//!   `/locales` path.

pub mod http_bundle_source;
pub mod shopify;

pub use http_bundle_source::HttpBundleSource;
pub use shopify::StorefrontClient;
