//! Error types for packaging operations.
//!
//! Every fatal path of the pipeline maps onto one variant here. Non-fatal
//! degradations (missing icon, missing config, restore trouble) are not
//! errors; they are recorded on the [`BuildReport`](crate::bundler::BuildReport).

use std::{
    fmt::Display,
    io,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Result type alias for packaging operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the packaging pipeline.
#[derive(Error, Debug)]
pub enum Error {
    /// Interpreter or compiler could not be located.
    #[error("{tool} not found: {reason}")]
    PreconditionMissing {
        /// Tool that was searched for
        tool: String,
        /// Why the lookup failed
        reason: String,
    },

    /// Output directory could not be brought to a clean state.
    #[error("failed to reconcile output directory {path}: {error}")]
    Reconciliation {
        /// Directory being reconciled
        path: PathBuf,
        /// Underlying I/O error
        error: io::Error,
    },

    /// An existing config file could not be copied to the holding file.
    #[error("failed to back up config {path}: {error}")]
    Backup {
        /// Config file that was being preserved
        path: PathBuf,
        /// Underlying I/O error
        error: io::Error,
    },

    /// Selection key is not in the catalog.
    #[error("unknown variant '{key}' (valid: {})", known.join(", "))]
    UnknownVariant {
        /// Key supplied by the operator
        key: String,
        /// Keys the catalog accepts
        known: Vec<String>,
    },

    /// `bundle.toml` is malformed or inconsistent.
    #[error("invalid manifest {path}: {reason}")]
    Manifest {
        /// Manifest file
        path: PathBuf,
        /// What is wrong with it
        reason: String,
    },

    /// External command could not be spawned.
    #[error("failed to run {command}: {error}")]
    CommandFailed {
        /// Program name
        command: String,
        /// Spawn error
        error: io::Error,
    },

    /// Filesystem operation failed.
    #[error("{context} ({}): {error}", path.display())]
    Fs {
        /// What was being done
        context: &'static str,
        /// Path involved
        path: PathBuf,
        /// Underlying I/O error
        error: io::Error,
    },

    /// Invalid data glob.
    #[error("invalid data pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// TOML parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// IO errors
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    /// Anything else
    #[error("{0}")]
    GenericError(String),
}

/// Attaches a description and path to I/O results.
pub trait ErrorExt<T> {
    /// Maps an I/O error into [`Error::Fs`].
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, io::Error> {
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|error| Error::Fs {
            context,
            path: path.as_ref().to_path_buf(),
            error,
        })
    }
}

/// Converts missing values into [`Error::GenericError`].
pub trait Context<T> {
    /// Returns the value or an error carrying `msg`.
    fn context<C: Display>(self, msg: C) -> Result<T>;
}

impl<T> Context<T> for Option<T> {
    fn context<C: Display>(self, msg: C) -> Result<T> {
        self.ok_or_else(|| Error::GenericError(msg.to_string()))
    }
}

/// Returns early with a formatted [`Error::GenericError`].
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::bundler::Error::GenericError(format!($($arg)*)))
    };
}
