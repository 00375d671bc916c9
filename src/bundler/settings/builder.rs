//! Builder for constructing BuildConfig.

use super::{
    BuildConfig, ManifestSettings, ReconcilePolicy,
    core::{DEFAULT_CONFIG_FILE, DEFAULT_SETTLE_DELAY},
    variant::is_bare_name,
};
use crate::bundler::error::{Error, ErrorExt};
use path_absolutize::Absolutize;
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

/// Builder for constructing [`BuildConfig`].
///
/// Later calls override earlier ones, so apply [`manifest`](Self::manifest)
/// first and command line values after it.
///
/// Relative `dist_dir`, `work_dir` and `spec_dir` are resolved against the
/// source directory, which itself is resolved against the current directory.
#[derive(Default)]
pub struct BuildConfigBuilder {
    source_dir: Option<PathBuf>,
    dist_dir: Option<PathBuf>,
    work_dir: Option<PathBuf>,
    spec_dir: Option<PathBuf>,
    config_file_name: Option<String>,
    policy: Option<ReconcilePolicy>,
    settle_delay: Option<Duration>,
    compiler_timeout: Option<Duration>,
    backup_dir: Option<PathBuf>,
    default_variant: Option<String>,
    compiler: Option<String>,
    interpreter: Option<Option<String>>,
}

impl BuildConfigBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Applies `[settings]` from `bundle.toml`.
    pub fn manifest(mut self, settings: &ManifestSettings) -> crate::bundler::Result<Self> {
        if let Some(dir) = &settings.dist_dir {
            self.dist_dir = Some(dir.clone());
        }
        if let Some(dir) = &settings.work_dir {
            self.work_dir = Some(dir.clone());
        }
        if let Some(name) = &settings.config_file {
            self.config_file_name = Some(name.clone());
        }
        if let Some(key) = &settings.default_variant {
            self.default_variant = Some(key.clone());
        }
        if let Some(policy) = &settings.policy {
            self.policy = Some(policy.parse().map_err(Error::GenericError)?);
        }
        Ok(self)
    }

    /// Sets the source directory.
    ///
    /// Default: current directory
    pub fn source_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.source_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the output directory.
    ///
    /// Default: `dist`
    pub fn dist_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.dist_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the transient build directory.
    ///
    /// Default: `build`
    pub fn work_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.work_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets where `.spec` descriptors are written.
    ///
    /// Default: the source directory
    pub fn spec_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.spec_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the persisted config file name.
    ///
    /// Default: [`DEFAULT_CONFIG_FILE`]
    pub fn config_file_name(mut self, name: impl Into<String>) -> Self {
        self.config_file_name = Some(name.into());
        self
    }

    /// Sets the reconcile policy.
    ///
    /// Default: [`ReconcilePolicy::FullWipe`]
    pub fn policy(mut self, policy: ReconcilePolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Sets the settle delay before config restore.
    ///
    /// Default: [`DEFAULT_SETTLE_DELAY`]
    pub fn settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = Some(delay);
        self
    }

    /// Sets a compiler timeout.
    ///
    /// Default: None
    pub fn compiler_timeout(mut self, timeout: Duration) -> Self {
        self.compiler_timeout = Some(timeout);
        self
    }

    /// Sets where the config holding file is created.
    ///
    /// Default: system temp directory
    pub fn backup_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.backup_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the default variant for empty interactive input.
    ///
    /// Default: None (empty input re-prompts)
    pub fn default_variant(mut self, key: impl Into<String>) -> Self {
        self.default_variant = Some(key.into());
        self
    }

    /// Sets the compiler program.
    ///
    /// Default: `pyinstaller`
    pub fn compiler(mut self, program: impl Into<String>) -> Self {
        self.compiler = Some(program.into());
        self
    }

    /// Sets the interpreter checked before building. None disables the check.
    ///
    /// Default: `python`
    pub fn interpreter(mut self, program: Option<String>) -> Self {
        self.interpreter = Some(program);
        self
    }

    /// Builds the config.
    ///
    /// # Errors
    ///
    /// Returns an error if a path cannot be made absolute, the config file
    /// name is not a bare file name, the work directory contains the source or
    /// dist directory, or the dist directory contains the source directory.
    pub fn build(self) -> crate::bundler::Result<BuildConfig> {
        let source_dir = self.source_dir.unwrap_or_else(|| PathBuf::from("."));
        let source_dir = source_dir
            .absolutize()
            .fs_context("resolving source directory", &source_dir)?
            .into_owned();

        let under_source = |path: PathBuf| -> crate::bundler::Result<PathBuf> {
            Ok(path
                .absolutize_from(&source_dir)
                .fs_context("resolving directory", &path)?
                .into_owned())
        };

        let dist_dir = under_source(self.dist_dir.unwrap_or_else(|| PathBuf::from("dist")))?;
        let work_dir = under_source(self.work_dir.unwrap_or_else(|| PathBuf::from("build")))?;
        let spec_dir = under_source(self.spec_dir.unwrap_or_else(|| PathBuf::from(".")))?;

        // The janitor deletes work_dir outright and reconcile wipes dist/<name>
        if source_dir.starts_with(&work_dir) || dist_dir.starts_with(&work_dir) {
            return Err(Error::GenericError(format!(
                "work directory {} must not contain the source or dist directory",
                work_dir.display()
            )));
        }
        if source_dir.starts_with(&dist_dir) {
            return Err(Error::GenericError(format!(
                "dist directory {} must not contain the source directory",
                dist_dir.display()
            )));
        }

        let config_file_name = self
            .config_file_name
            .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());
        if !is_bare_name(&config_file_name) {
            return Err(Error::GenericError(format!(
                "config file name must be a bare file name, got '{config_file_name}'"
            )));
        }

        Ok(BuildConfig::new(
            source_dir,
            dist_dir,
            work_dir,
            spec_dir,
            config_file_name,
            self.policy.unwrap_or_default(),
            self.settle_delay.unwrap_or(DEFAULT_SETTLE_DELAY),
            self.compiler_timeout,
            self.backup_dir,
            self.default_variant,
            self.compiler.unwrap_or_else(|| "pyinstaller".to_string()),
            self.interpreter.unwrap_or_else(|| Some("python".to_string())),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_resolve_under_source() {
        let dir = tempfile::tempdir().unwrap();
        let config = BuildConfigBuilder::new().source_dir(dir.path()).build().unwrap();

        assert_eq!(config.dist_dir(), dir.path().join("dist"));
        assert_eq!(config.work_dir(), dir.path().join("build"));
        assert_eq!(config.spec_dir(), dir.path());
        assert_eq!(config.config_file_name(), DEFAULT_CONFIG_FILE);
        assert_eq!(config.policy(), &ReconcilePolicy::FullWipe);
        assert_eq!(config.compiler(), "pyinstaller");
        assert_eq!(config.interpreter(), Some("python"));
        assert!(config.default_variant().is_none());
    }

    #[test]
    fn later_values_override_manifest() {
        let settings = ManifestSettings {
            dist_dir: Some("out".into()),
            config_file: Some("saved_user_vars.json".into()),
            policy: Some("preserve:json".into()),
            ..Default::default()
        };
        let dir = tempfile::tempdir().unwrap();
        let config = BuildConfigBuilder::new()
            .source_dir(dir.path())
            .manifest(&settings)
            .unwrap()
            .dist_dir("release")
            .build()
            .unwrap();

        assert_eq!(config.dist_dir(), dir.path().join("release"));
        assert_eq!(config.config_file_name(), "saved_user_vars.json");
        assert_eq!(config.policy(), &ReconcilePolicy::preserve(["json"]));
    }

    #[test]
    fn invalid_manifest_policy_is_an_error() {
        let settings = ManifestSettings {
            policy: Some("nuke".into()),
            ..Default::default()
        };
        assert!(BuildConfigBuilder::new().manifest(&settings).is_err());
    }

    #[test]
    fn work_dir_may_not_swallow_source_or_dist() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("bot");
        for work in [".", "..", "dist/.."] {
            let err = BuildConfigBuilder::new()
                .source_dir(&src)
                .work_dir(work)
                .build()
                .unwrap_err();
            assert!(err.to_string().contains("work directory"), "{work}: {err}");
        }

        let err = BuildConfigBuilder::new()
            .source_dir(&src)
            .dist_dir(dir.path().join("out"))
            .work_dir(dir.path())
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("work directory"));

        let config = BuildConfigBuilder::new()
            .source_dir(&src)
            .work_dir("dist/build")
            .build()
            .unwrap();
        assert_eq!(config.work_dir(), src.join("dist").join("build"));
    }

    #[test]
    fn dist_dir_may_not_contain_source() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("bot");
        for dist in [".", ".."] {
            let err = BuildConfigBuilder::new()
                .source_dir(&src)
                .dist_dir(dist)
                .build()
                .unwrap_err();
            assert!(err.to_string().contains("dist directory"), "{dist}: {err}");
        }
    }

    #[test]
    fn config_name_must_be_bare() {
        assert!(BuildConfigBuilder::new().config_file_name("a/b.json").build().is_err());
        assert!(BuildConfigBuilder::new().config_file_name("").build().is_err());
        assert!(BuildConfigBuilder::new().config_file_name("..").build().is_err());
    }
}
