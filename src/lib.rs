//! Multi-variant application packager
//!
//! This library packages each build variant of a Python application into a
//! standalone executable directory using an external compiler (PyInstaller),
//! while preserving the operator's JSON config across rebuilds.
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod bundler;
pub mod cli;
pub mod error;

// Re-export commonly used types
pub use error::{BundlerError, CliError, Result};
