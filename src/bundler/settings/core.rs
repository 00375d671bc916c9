//! Core BuildConfig struct and implementations.

use super::{BuildVariant, ReconcilePolicy};
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

/// Default persisted config file name (read by the packaged bot at startup).
pub const DEFAULT_CONFIG_FILE: &str = "roi_thresholds.json";

/// Default wait between compiler exit and config restore.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(500);

/// Process-wide packaging settings.
///
/// Constructed once via [`BuildConfigBuilder`](super::BuildConfigBuilder) and
/// passed by reference into every pipeline component. All directory paths are
/// absolute.
///
/// # Examples
///
/// ```no_run
/// use variant_bundler::bundler::BuildConfigBuilder;
///
/// # fn example() -> variant_bundler::bundler::Result<()> {
/// let config = BuildConfigBuilder::new()
///     .source_dir("bot")
///     .config_file_name("saved_user_vars.json")
///     .build()?;
/// assert!(config.dist_dir().is_absolute());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct BuildConfig {
    /// Directory holding entry scripts and assets; compiler working directory.
    source_dir: PathBuf,

    /// Parent of every `<output_name>/` directory.
    dist_dir: PathBuf,

    /// Transient intermediate build directory.
    work_dir: PathBuf,

    /// Where the compiler writes generated `.spec` descriptors.
    spec_dir: PathBuf,

    /// Persisted config file name.
    config_file_name: String,

    /// Reconciliation policy for the variant output directory.
    policy: ReconcilePolicy,

    /// Wait before restoring config after compiler exit.
    settle_delay: Duration,

    /// Upper bound on compiler run time. None waits indefinitely.
    compiler_timeout: Option<Duration>,

    /// Directory for the config holding file. None uses the system temp dir.
    backup_dir: Option<PathBuf>,

    /// Variant picked on empty interactive input.
    default_variant: Option<String>,

    /// Compiler program.
    compiler: String,

    /// Interpreter that must be reachable. None skips the check.
    interpreter: Option<String>,
}

impl BuildConfig {
    /// Returns the source directory.
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Returns the output directory.
    pub fn dist_dir(&self) -> &Path {
        &self.dist_dir
    }

    /// Returns the transient build directory.
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Returns the `.spec` output directory.
    pub fn spec_dir(&self) -> &Path {
        &self.spec_dir
    }

    /// Returns the persisted config file name.
    pub fn config_file_name(&self) -> &str {
        &self.config_file_name
    }

    /// Returns the reconciliation policy.
    pub fn policy(&self) -> &ReconcilePolicy {
        &self.policy
    }

    /// Returns the post-compile settle delay.
    pub fn settle_delay(&self) -> Duration {
        self.settle_delay
    }

    /// Returns the compiler timeout.
    pub fn compiler_timeout(&self) -> Option<Duration> {
        self.compiler_timeout
    }

    /// Returns the holding-file directory override.
    pub fn backup_dir(&self) -> Option<&Path> {
        self.backup_dir.as_deref()
    }

    /// Returns the documented default variant, if configured.
    pub fn default_variant(&self) -> Option<&str> {
        self.default_variant.as_deref()
    }

    /// Returns the compiler program.
    pub fn compiler(&self) -> &str {
        &self.compiler
    }

    /// Returns the interpreter program.
    pub fn interpreter(&self) -> Option<&str> {
        self.interpreter.as_deref()
    }

    /// `dist_dir/<output_name>`: where the variant's executable lands.
    pub fn output_dir(&self, variant: &BuildVariant) -> PathBuf {
        self.dist_dir.join(&variant.output_name)
    }

    /// `dist_dir/<output_name>.<config>`: where a config that could not be put
    /// back is saved, and picked up again by the next build.
    pub fn rescue_path(&self, variant: &BuildVariant) -> PathBuf {
        self.dist_dir
            .join(format!("{}.{}", variant.output_name, self.config_file_name))
    }

    /// Generated build descriptor for a variant.
    pub fn spec_file(&self, variant: &BuildVariant) -> PathBuf {
        self.spec_dir.join(format!("{}.spec", variant.output_name))
    }

    /// Resolves a source-relative path.
    pub fn source_path(&self, relative: &Path) -> PathBuf {
        self.source_dir.join(relative)
    }

    /// Creates a new BuildConfig (used by BuildConfigBuilder).
    #[allow(clippy::too_many_arguments)]
    pub(super) fn new(
        source_dir: PathBuf,
        dist_dir: PathBuf,
        work_dir: PathBuf,
        spec_dir: PathBuf,
        config_file_name: String,
        policy: ReconcilePolicy,
        settle_delay: Duration,
        compiler_timeout: Option<Duration>,
        backup_dir: Option<PathBuf>,
        default_variant: Option<String>,
        compiler: String,
        interpreter: Option<String>,
    ) -> Self {
        Self {
            source_dir,
            dist_dir,
            work_dir,
            spec_dir,
            config_file_name,
            policy,
            settle_delay,
            compiler_timeout,
            backup_dir,
            default_variant,
            compiler,
            interpreter,
        }
    }
}
