//! Localization: translation bundles, bundle sources and the runtime that
//! ties them to the active locale.

pub mod bundle;
pub mod runtime;
pub mod source;

pub use bundle::TranslationBundle;
pub use runtime::{BundleState, LocaleState, LocalizationRuntime};
pub use source::{BundleSource, StaticBundleSource};
