//! Pipeline orchestration and coordination.
//!
//! This module provides the main [`Orchestrator`] that drives one build
//! variant through the packaging pipeline and reports the result.
//!
//! # Module Organization
//!
//! - [`checksum`] - SHA-256 digests for configs and output trees
//! - [`orchestrator`] - Main [`Orchestrator`] and its state machine
//! - [`report`] - [`PipelineState`], [`BuildOutcome`] and [`BuildReport`]
//! - [`tool_detection`] - Interpreter and compiler availability checks

mod checksum;
mod orchestrator;
mod report;
mod tool_detection;

pub use checksum::calculate_sha256;
pub use orchestrator::Orchestrator;
pub use report::{BuildOutcome, BuildReport, PipelineState};
pub use tool_detection::{Toolchain, verify_preconditions};
