//! Command line argument parsing and validation.
//!
//! Every option can also come from a `VARIANT_BUNDLER_*` environment
//! variable. Options left unset fall back to `bundle.toml`, then to defaults.

use crate::bundler::ReconcilePolicy;
use clap::Parser;
use std::path::PathBuf;

/// Multi-variant application packager
#[derive(Parser, Debug)]
#[command(
    name = "variant_bundler",
    version,
    about = "Packages build variants into standalone executables, keeping the user config across rebuilds",
    long_about = "Packages one build variant of a Python application into dist/<name>/ with PyInstaller.

An existing config file (from the previous build's output, or else the source tree) is held aside
while the output directory is cleaned, then put back next to the new executable.

Usage:
  variant_bundler                      # prompts for a variant
  variant_bundler --variant normal
  variant_bundler --variant multithreaded --policy preserve:json --console

Exit code 0 = executable built. Config restore problems are reported but do not fail the build."
)]
pub struct Args {
    /// Variant to build; prompts when omitted
    #[arg(short = 'v', long, env = "VARIANT_BUNDLER_VARIANT", value_name = "KEY")]
    pub variant: Option<String>,

    /// Source directory with entry scripts, assets and optional bundle.toml
    #[arg(short = 's', long, env = "VARIANT_BUNDLER_SOURCE", value_name = "DIR", default_value = ".")]
    pub source: PathBuf,

    /// Output directory (default: dist)
    #[arg(long, env = "VARIANT_BUNDLER_DIST_DIR", value_name = "DIR")]
    pub dist_dir: Option<PathBuf>,

    /// Transient build directory (default: build)
    #[arg(long, env = "VARIANT_BUNDLER_WORK_DIR", value_name = "DIR")]
    pub work_dir: Option<PathBuf>,

    /// Persisted config file name (default: roi_thresholds.json)
    #[arg(long, env = "VARIANT_BUNDLER_CONFIG_NAME", value_name = "NAME")]
    pub config_name: Option<String>,

    /// Output cleaning policy: full-wipe or preserve:<ext>[,<ext>...]
    #[arg(long, env = "VARIANT_BUNDLER_POLICY", value_name = "POLICY")]
    pub policy: Option<ReconcilePolicy>,

    /// Variant chosen when the prompt gets empty input
    #[arg(long, env = "VARIANT_BUNDLER_DEFAULT_VARIANT", value_name = "KEY")]
    pub default_variant: Option<String>,

    /// Build console executables instead of windowed ones
    #[arg(long)]
    pub console: bool,

    /// Compiler executable (default: pyinstaller)
    #[arg(long, env = "VARIANT_BUNDLER_COMPILER", value_name = "PROG")]
    pub compiler: Option<String>,

    /// Interpreter that must be present (default: python)
    #[arg(long, env = "VARIANT_BUNDLER_INTERPRETER", value_name = "PROG")]
    pub interpreter: Option<String>,

    /// Skip the interpreter check
    #[arg(long, conflicts_with = "interpreter")]
    pub no_interpreter_check: bool,

    /// Kill the compiler after this many seconds
    #[arg(long, env = "VARIANT_BUNDLER_TIMEOUT", value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Wait between compiler exit and config restore, in milliseconds (default: 500)
    #[arg(long, env = "VARIANT_BUNDLER_SETTLE_MS", value_name = "MS")]
    pub settle_ms: Option<u64>,

    /// List variants and exit
    #[arg(long)]
    pub list: bool,

    /// Only print warnings, errors and compiler diagnostics
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.timeout == Some(0) {
            return Err("Timeout must be at least 1 second".to_string());
        }
        if let Some(key) = &self.variant
            && key.trim().is_empty()
        {
            return Err("Variant cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Output manager for colored terminal output
    output: super::OutputManager,
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        Self {
            output: super::OutputManager::new(args.quiet),
        }
    }
}

impl RuntimeConfig {
    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }
}
