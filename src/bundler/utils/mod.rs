//! Shared helpers for pipeline components.

pub mod fs;
