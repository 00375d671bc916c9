//! Top-level error types for the command line front end.
//!
//! Wraps pipeline errors with CLI-specific ones and attaches recovery hints.

use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, BundlerError>;

/// Main error type for all CLI operations
#[derive(Error, Debug)]
pub enum BundlerError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Pipeline errors
    #[error("{0}")]
    Bundler(#[from] crate::bundler::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// Interactive selection ended without a valid choice
    #[error("No variant selected: {reason}")]
    SelectionAborted {
        /// Why selection stopped
        reason: String,
    },
}

impl BundlerError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        use crate::bundler::Error as E;
        match self {
            Self::Bundler(E::PreconditionMissing { tool, .. }) => vec![
                format!("Install {tool} or add it to PATH"),
                "Use --compiler / --interpreter to point at a specific executable".to_string(),
            ],
            Self::Bundler(E::Reconciliation { path, .. }) => vec![format!(
                "Close any program using {} and retry",
                path.display()
            )],
            Self::Bundler(E::Backup { path, .. }) => vec![format!(
                "Copy {} somewhere safe before rebuilding",
                path.display()
            )],
            Self::Bundler(E::UnknownVariant { .. }) => {
                vec!["Run with --list to see available variants".to_string()]
            }
            Self::Bundler(E::Manifest { path, .. }) => {
                vec![format!("Fix or remove {}", path.display())]
            }
            Self::Cli(CliError::SelectionAborted { .. }) => {
                vec!["Pass --variant <KEY> to build without prompting".to_string()]
            }
            _ => Vec::new(),
        }
    }
}
