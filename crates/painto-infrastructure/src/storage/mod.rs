//! Storage layer for atomic file operations.

mod atomic_toml;
mod client_store;

pub use atomic_toml::{AtomicTomlError, AtomicTomlFile};
pub use client_store::TomlClientStore;
