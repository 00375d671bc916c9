//! Icon presence probing.

use crate::bundler::{
    settings::{BuildConfig, BuildVariant},
    utils::fs,
};
use std::path::PathBuf;

/// Whether a variant's icon will be passed to the compiler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconDecision {
    /// Absolute icon path, when the variant declares one.
    pub icon_path: Option<PathBuf>,
    /// True only if the icon exists as a regular file.
    pub present: bool,
}

impl IconDecision {
    /// The path to hand to the compiler, if any.
    pub fn flag_path(&self) -> Option<&PathBuf> {
        self.icon_path.as_ref().filter(|_| self.present)
    }
}

/// Checks the variant's icon on disk. Never fails; absence only drops the flag.
pub async fn resolve(config: &BuildConfig, variant: &BuildVariant) -> IconDecision {
    let Some(icon) = &variant.icon else {
        log::debug!("Variant '{}' declares no icon", variant.key);
        return IconDecision {
            icon_path: None,
            present: false,
        };
    };

    let path = config.source_path(icon);
    let present = fs::is_file(&path).await;
    if !present {
        log::warn!(
            "Icon {} not found; building '{}' without an icon",
            path.display(),
            variant.key
        );
    }
    IconDecision {
        icon_path: Some(path),
        present,
    }
}
