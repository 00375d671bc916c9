//! Config continuity across destructive rebuilds.
//!
//! Before the output directory is reconciled, the operator's config is copied
//! into a holding file. After a successful compile it is copied back next to
//! the new executable. The holding file is a [`TempPath`], so it is removed on
//! every exit path: explicitly by [`ConfigBackup::restore`] or
//! [`ConfigBackup::discard`], and by `Drop` if the pipeline unwinds early.
//!
//! Search order: the prior build's output, then a config rescued by an earlier
//! run (`dist/<output_name>.<config>`), then the source tree.

use crate::bundler::{
    builder::calculate_sha256,
    error::{Error, Result},
    settings::{BuildConfig, BuildVariant},
    utils::fs,
};
use std::path::{Path, PathBuf};
use tempfile::TempPath;

/// Where a backed-up config came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupOrigin {
    /// `dist/<output_name>/<config>` from an earlier build
    PriorOutput,
    /// `dist/<output_name>.<config>` saved by an earlier run that could not
    /// put it back
    Rescued,
    /// `<source_dir>/<config>`
    SourceTree,
    /// Nothing found
    None,
}

impl std::fmt::Display for BackupOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackupOrigin::PriorOutput => write!(f, "prior output"),
            BackupOrigin::Rescued => write!(f, "rescued copy"),
            BackupOrigin::SourceTree => write!(f, "source tree"),
            BackupOrigin::None => write!(f, "none"),
        }
    }
}

/// Result of putting the config back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreStatus {
    /// Pipeline never reached the restore step.
    NotAttempted,
    /// Config copied and verified at this path.
    Restored(PathBuf),
    /// No config existed before the build.
    NothingToRestore,
    /// The compiler did not produce the output directory.
    TargetMissing {
        /// Where the held config was saved instead
        rescued: Option<PathBuf>,
    },
    /// Copy or verification failed.
    Failed {
        /// What went wrong
        reason: String,
        /// Where the held config was saved instead
        rescued: Option<PathBuf>,
    },
}

impl RestoreStatus {
    /// True for outcomes the operator must act on.
    pub fn needs_attention(&self) -> bool {
        matches!(self, Self::TargetMissing { .. } | Self::Failed { .. })
    }
}

/// A config held across one pipeline run.
#[derive(Debug)]
pub struct ConfigBackup {
    origin: BackupOrigin,
    source: Option<PathBuf>,
    holding: Option<TempPath>,
    checksum: Option<String>,
}

impl ConfigBackup {
    /// Finds the variant's config and copies it into a holding file.
    ///
    /// Finding nothing is not an error. Failing to copy a config that does
    /// exist is, since the following reconcile step would destroy it.
    pub async fn backup(config: &BuildConfig, variant: &BuildVariant) -> Result<Self> {
        let candidates = [
            (
                BackupOrigin::PriorOutput,
                config.output_dir(variant).join(config.config_file_name()),
            ),
            (BackupOrigin::Rescued, config.rescue_path(variant)),
            (
                BackupOrigin::SourceTree,
                config.source_dir().join(config.config_file_name()),
            ),
        ];

        for (origin, path) in candidates {
            if !fs::is_file(&path).await {
                continue;
            }
            let holding = hold(config, &path).await?;
            let checksum = calculate_sha256(&holding).await?;
            log::info!(
                "Backed up {} ({origin}) to {}",
                path.display(),
                holding.display()
            );
            return Ok(Self {
                origin,
                source: Some(path),
                holding: Some(holding),
                checksum: Some(checksum),
            });
        }

        log::warn!(
            "No {} found for '{}'; building without a config",
            config.config_file_name(),
            variant.key
        );
        Ok(Self::empty())
    }

    /// A no-op backup.
    pub fn empty() -> Self {
        Self {
            origin: BackupOrigin::None,
            source: None,
            holding: None,
            checksum: None,
        }
    }

    /// Where the config came from.
    pub fn origin(&self) -> BackupOrigin {
        self.origin
    }

    /// The original config path.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// The holding file, while the backup is live.
    pub fn holding_path(&self) -> Option<&Path> {
        self.holding.as_deref()
    }

    /// Copies the held config into `output_dir`, then deletes the holding file.
    ///
    /// Waits the configured settle delay first so the compiler has released
    /// its output. Never fails the build: problems come back as
    /// [`RestoreStatus::TargetMissing`] or [`RestoreStatus::Failed`], with the
    /// config rescued next to the output directory when possible.
    pub async fn restore(
        mut self,
        config: &BuildConfig,
        variant: &BuildVariant,
        output_dir: &Path,
    ) -> RestoreStatus {
        let Some(holding) = self.holding.take() else {
            return RestoreStatus::NothingToRestore;
        };

        if !config.settle_delay().is_zero() {
            log::debug!("Waiting {:?} for compiler output to settle", config.settle_delay());
            tokio::time::sleep(config.settle_delay()).await;
        }

        let status = if !fs::is_dir(output_dir).await {
            log::warn!(
                "Output directory {} missing; config not restored",
                output_dir.display()
            );
            RestoreStatus::TargetMissing {
                rescued: rescue(config, variant, &holding).await,
            }
        } else {
            let target = output_dir.join(config.config_file_name());
            match place(&holding, &target, self.checksum.as_deref()).await {
                Ok(()) => {
                    log::info!("Restored config to {}", target.display());
                    if self.origin == BackupOrigin::Rescued
                        && let Some(rescued) = &self.source
                        && let Err(e) = fs::remove_file(rescued).await
                    {
                        log::warn!("Could not remove {}: {e}", rescued.display());
                    }
                    RestoreStatus::Restored(target)
                }
                Err(reason) => {
                    log::warn!("Config restore to {} failed: {reason}", target.display());
                    RestoreStatus::Failed {
                        reason,
                        rescued: rescue(config, variant, &holding).await,
                    }
                }
            }
        };

        release(holding);
        status
    }

    /// Deletes the holding file after a failed build.
    ///
    /// A config taken from the prior output has no other copy left once the
    /// output directory was reconciled, so it is saved next to the output
    /// directory first. Returns where it was saved.
    pub async fn discard_after_failure(
        self,
        config: &BuildConfig,
        variant: &BuildVariant,
    ) -> Option<PathBuf> {
        let rescued = match (&self.holding, self.origin) {
            (Some(holding), BackupOrigin::PriorOutput) => rescue(config, variant, holding).await,
            _ => None,
        };
        self.discard();
        rescued
    }

    /// Deletes the holding file without restoring.
    pub fn discard(mut self) {
        if let Some(holding) = self.holding.take() {
            log::debug!("Discarding config backup {}", holding.display());
            release(holding);
        }
    }
}

/// Source-tree config to bundle into the executable, if one exists.
pub async fn source_tree_config(config: &BuildConfig) -> Option<PathBuf> {
    let path = config.source_dir().join(config.config_file_name());
    fs::is_file(&path).await.then_some(path)
}

async fn hold(config: &BuildConfig, source: &Path) -> Result<TempPath> {
    let backup_err = |error| Error::Backup {
        path: source.to_path_buf(),
        error,
    };

    let mut builder = tempfile::Builder::new();
    builder.prefix("config-backup-").suffix(".json");
    let file = match config.backup_dir() {
        Some(dir) => builder.tempfile_in(dir),
        None => builder.tempfile(),
    }
    .map_err(backup_err)?;
    let holding = file.into_temp_path();

    fs::copy_file(source, &holding).await.map_err(backup_err)?;
    Ok(holding)
}

async fn place(
    holding: &Path,
    target: &Path,
    expected: Option<&str>,
) -> std::result::Result<(), String> {
    fs::copy_file(holding, target)
        .await
        .map_err(|e| e.to_string())?;
    let actual = calculate_sha256(target).await.map_err(|e| e.to_string())?;
    match expected {
        Some(expected) if expected != actual => Err(format!(
            "checksum mismatch after copy (expected {expected}, got {actual})"
        )),
        _ => Ok(()),
    }
}

async fn rescue(config: &BuildConfig, variant: &BuildVariant, holding: &Path) -> Option<PathBuf> {
    let target = config.rescue_path(variant);
    let copied = async {
        tokio::fs::create_dir_all(config.dist_dir()).await?;
        fs::copy_file(holding, &target).await
    }
    .await;
    match copied {
        Ok(_) => {
            log::warn!("Config saved to {} for manual placement", target.display());
            Some(target)
        }
        Err(e) => {
            log::error!("Could not save config for manual placement: {e}");
            None
        }
    }
}

fn release(holding: TempPath) {
    let path = holding.to_path_buf();
    if let Err(e) = holding.close() {
        log::warn!("Failed to delete holding file {}: {e}", path.display());
    }
}
