//! Configuration structures for packaging runs.
//!
//! This module provides the variant catalog, the process-wide
//! [`BuildConfig`] with its builder, the optional `bundle.toml` manifest, and
//! the output reconciliation policy.

mod builder;
mod catalog;
mod core;
mod manifest;
mod policy;
mod variant;

pub use builder::BuildConfigBuilder;
pub use catalog::VariantCatalog;
pub use core::{BuildConfig, DEFAULT_CONFIG_FILE, DEFAULT_SETTLE_DELAY};
pub use manifest::{MANIFEST_FILE, Manifest, ManifestSettings};
pub use policy::ReconcilePolicy;
pub use variant::{BuildVariant, DataSpec, WindowMode};
