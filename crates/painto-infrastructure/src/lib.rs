//! File-backed implementations of the storefront core traits.

pub mod config_service;
pub mod dir_bundle_source;
pub mod paths;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::dir_bundle_source::DirBundleSource;
pub use crate::paths::PaintoPaths;
pub use crate::storage::TomlClientStore;
