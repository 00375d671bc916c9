//! Variant packaging core.
//!
//! Turns a source tree plus optional assets into `dist/<output_name>/` by
//! driving an external packaging compiler, while carrying the operator's JSON
//! config across the destructive clean step.
//!
//! # Components
//!
//! - [`settings`] - [`BuildConfig`], [`VariantCatalog`], `bundle.toml`
//! - [`icon`] - icon presence probing
//! - [`continuity`] - config backup and restore
//! - [`reconcile`] - output directory cleaning
//! - [`compiler`] - argument assembly and subprocess execution
//! - [`janitor`] - transient artifact removal
//! - [`builder`] - the [`Orchestrator`] tying them together

pub mod builder;
pub mod compiler;
pub mod continuity;
pub mod error;
pub mod icon;
pub mod janitor;
pub mod reconcile;
pub mod settings;
pub mod utils;

pub use builder::{BuildOutcome, BuildReport, Orchestrator, PipelineState};
pub use continuity::{BackupOrigin, ConfigBackup, RestoreStatus};
pub use error::{Error, Result};
pub use icon::IconDecision;
pub use settings::{
    BuildConfig, BuildConfigBuilder, BuildVariant, DataSpec, Manifest, ReconcilePolicy,
    VariantCatalog, WindowMode,
};
