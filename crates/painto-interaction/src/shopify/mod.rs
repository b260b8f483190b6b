//! Shopify Storefront API client.

mod client;
mod dto;
mod queries;

pub use client::{ACCESS_TOKEN_HEADER, StorefrontClient};
