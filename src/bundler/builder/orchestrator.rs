//! Main packaging pipeline.
//!
//! This module provides the [`Orchestrator`] that drives one variant through
//! preconditions, config backup, output reconciliation, compilation, config
//! restore and cleanup.

use super::{
    checksum::calculate_sha256,
    report::{BuildOutcome, BuildReport, PipelineState},
    tool_detection::verify_preconditions,
};
use crate::bundler::{
    Result,
    compiler::{self, CompileRequest, DataBundle},
    continuity::{self, ConfigBackup, RestoreStatus},
    icon::{self, IconDecision},
    janitor,
    reconcile::reconcile,
    settings::{BuildConfig, BuildVariant},
};
use std::path::Path;

/// Single-variant packaging pipeline.
///
/// States advance strictly forward:
///
/// ```text
/// Idle → VariantSelected → ConfigBackedUp → OutputClean → Compiled{..}
///      → Restored | Discarded → Cleaned → Done
/// ```
///
/// A failed compile goes to `Discarded` and never `Restored`. `Restored` marks
/// that the restore step ran; the report's `restore` field holds its result,
/// including `NothingToRestore` and the failure cases. Every exit path,
/// including errors after the backup step, discards the holding file and runs
/// the janitor.
///
/// Two orchestrators must not run against the same output directory at once;
/// the backup/restore handshake is not guarded against that.
///
/// # Examples
///
/// ```no_run
/// use variant_bundler::bundler::{BuildConfigBuilder, Orchestrator, VariantCatalog};
///
/// # async fn example() -> variant_bundler::bundler::Result<()> {
/// let config = BuildConfigBuilder::new().source_dir("bot").build()?;
/// let catalog = VariantCatalog::builtin();
/// let report = Orchestrator::new(&config)
///     .run(catalog.resolve("normal")?)
///     .await?;
/// std::process::exit(report.exit_code());
/// # }
/// ```
#[derive(Debug)]
pub struct Orchestrator<'a> {
    config: &'a BuildConfig,
    state: PipelineState,
    trace: Vec<PipelineState>,
    warnings: Vec<String>,
}

impl<'a> Orchestrator<'a> {
    /// Creates an idle orchestrator.
    pub fn new(config: &'a BuildConfig) -> Self {
        Self {
            config,
            state: PipelineState::Idle,
            trace: vec![PipelineState::Idle],
            warnings: Vec::new(),
        }
    }

    /// Runs the pipeline for `variant`.
    ///
    /// # Errors
    ///
    /// Missing tools, backup failure, reconciliation failure and compiler
    /// spawn failure. A compiler that runs and fails is not an error; it is
    /// reported through [`BuildReport::exit_code`].
    pub async fn run(mut self, variant: &BuildVariant) -> Result<BuildReport> {
        let config = self.config;
        self.advance(PipelineState::VariantSelected);
        log::info!("Packaging variant '{}' ({})", variant.key, variant.entry.display());

        let tools = verify_preconditions(config).await?;

        let backup = ConfigBackup::backup(config, variant).await?;
        let backup_origin = backup.origin();
        if backup.holding_path().is_none() {
            self.warn(format!(
                "no {} found; building without a config",
                config.config_file_name()
            ));
        }
        self.advance(PipelineState::ConfigBackedUp);

        let output_dir = config.output_dir(variant);
        let (outcome, icon) = match self.compile(variant, &tools.compiler, &output_dir).await {
            Ok(compiled) => compiled,
            Err(e) => {
                if let Some(saved) = backup.discard_after_failure(config, variant).await {
                    self.warn(format!("config saved to {}", saved.display()));
                }
                self.advance(PipelineState::Discarded);
                self.clean(variant).await;
                return Err(e);
            }
        };
        self.advance(PipelineState::Compiled {
            success: outcome.success,
        });

        let restore = if outcome.success {
            let status = backup.restore(config, variant, &output_dir).await;
            match &status {
                RestoreStatus::TargetMissing { rescued } => self.warn(format!(
                    "output directory {} missing; config needs manual placement{}",
                    output_dir.display(),
                    rescued_note(rescued.as_deref())
                )),
                RestoreStatus::Failed { reason, rescued } => self.warn(format!(
                    "config restore failed: {reason}; config needs manual placement{}",
                    rescued_note(rescued.as_deref())
                )),
                _ => {}
            }
            self.advance(PipelineState::Restored);
            status
        } else {
            log::error!(
                "Compiler failed for '{}' (exit code: {:?})",
                variant.key,
                outcome.exit_code
            );
            if let Some(saved) = backup.discard_after_failure(config, variant).await {
                self.warn(format!("config saved to {}", saved.display()));
            }
            if let Some(w) = janitor::remove_partial_output(&output_dir).await {
                self.warnings.push(w);
            }
            self.advance(PipelineState::Discarded);
            RestoreStatus::NotAttempted
        };

        self.clean(variant).await;

        let output_checksum = if outcome.success {
            match calculate_sha256(&output_dir).await {
                Ok(sum) => Some(sum),
                Err(e) => {
                    self.warn(format!("could not hash output: {e}"));
                    None
                }
            }
        } else {
            None
        };

        self.advance(PipelineState::Done);
        Ok(BuildReport {
            outcome,
            icon,
            backup_origin,
            restore,
            output_dir,
            output_checksum,
            warnings: self.warnings,
            trace: self.trace,
        })
    }

    async fn compile(
        &mut self,
        variant: &BuildVariant,
        program: &Path,
        output_dir: &Path,
    ) -> Result<(BuildOutcome, IconDecision)> {
        let config = self.config;

        reconcile(output_dir, config.policy()).await?;
        self.advance(PipelineState::OutputClean);

        let icon = icon::resolve(config, variant).await;
        if let Some(path) = icon.icon_path.as_ref().filter(|_| !icon.present) {
            self.warnings
                .push(format!("icon {} not found; no icon flag", path.display()));
        }

        let config_bundle = continuity::source_tree_config(config)
            .await
            .map(DataBundle::at_root);
        let (data, data_warnings) = compiler::resolve_data_bundles(config, variant)?;
        self.warnings.extend(data_warnings);

        let outcome = {
            let request = CompileRequest {
                variant,
                icon: &icon,
                config_bundle,
                data,
                mode: variant.mode,
            };
            compiler::invoke(config, program, &request).await?
        };
        Ok((outcome, icon))
    }

    async fn clean(&mut self, variant: &BuildVariant) {
        let spec = self.config.spec_file(variant);
        let warnings = janitor::cleanup(self.config.work_dir(), &[spec]).await;
        self.warnings.extend(warnings);
        self.advance(PipelineState::Cleaned);
    }

    fn advance(&mut self, next: PipelineState) {
        log::debug!("Pipeline: {} -> {}", self.state, next);
        self.state = next;
        self.trace.push(next);
    }

    fn warn(&mut self, msg: String) {
        log::warn!("{msg}");
        self.warnings.push(msg);
    }
}

fn rescued_note(rescued: Option<&Path>) -> String {
    rescued
        .map(|p| format!(" (saved to {})", p.display()))
        .unwrap_or_default()
}
