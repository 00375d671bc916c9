//! Pipeline states and run results.

use crate::bundler::{continuity::BackupOrigin, continuity::RestoreStatus, icon::IconDecision};
use std::{fmt, path::PathBuf};

/// Pipeline position. Runs move strictly forward through these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// Nothing done yet
    Idle,
    /// A catalog variant was chosen
    VariantSelected,
    /// Config (if any) is in the holding file
    ConfigBackedUp,
    /// Output directory reconciled
    OutputClean,
    /// Compiler exited
    Compiled {
        /// Exit status was zero
        success: bool,
    },
    /// Restore step ran after a successful compile. Entered whatever the
    /// outcome; [`BuildReport::restore`] says whether a config was actually
    /// copied back.
    Restored,
    /// Backup dropped without restoring
    Discarded,
    /// Transient artifacts removed
    Cleaned,
    /// Terminal
    Done,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::VariantSelected => write!(f, "variant selected"),
            Self::ConfigBackedUp => write!(f, "config backed up"),
            Self::OutputClean => write!(f, "output clean"),
            Self::Compiled { success: true } => write!(f, "compiled (success)"),
            Self::Compiled { success: false } => write!(f, "compiled (failure)"),
            Self::Restored => write!(f, "restored"),
            Self::Discarded => write!(f, "discarded"),
            Self::Cleaned => write!(f, "cleaned"),
            Self::Done => write!(f, "done"),
        }
    }
}

/// What the compiler did for one variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutcome {
    /// Variant key
    pub variant: String,
    /// Exit status zero, within the timeout
    pub success: bool,
    /// Raw exit code; None when killed or timed out
    pub exit_code: Option<i32>,
    /// Compiler stdout followed by stderr, unmodified
    pub diagnostic_text: String,
    /// Run exceeded the configured timeout
    pub timed_out: bool,
}

/// Everything an operator needs to know about a run.
#[derive(Debug, Clone)]
pub struct BuildReport {
    /// Compiler result
    pub outcome: BuildOutcome,
    /// Icon used, if any
    pub icon: IconDecision,
    /// Where the preserved config came from
    pub backup_origin: BackupOrigin,
    /// Config placement result
    pub restore: RestoreStatus,
    /// Variant output directory
    pub output_dir: PathBuf,
    /// Digest of the output tree after a successful run
    pub output_checksum: Option<String>,
    /// Non-fatal problems in the order they happened
    pub warnings: Vec<String>,
    /// States visited
    pub trace: Vec<PipelineState>,
}

impl BuildReport {
    /// 0 on success, 1 on compile failure. Restore trouble does not count.
    pub fn exit_code(&self) -> i32 {
        if self.outcome.success { 0 } else { 1 }
    }

    /// True if the run passed through `state`.
    pub fn visited(&self, state: PipelineState) -> bool {
        self.trace.contains(&state)
    }
}
