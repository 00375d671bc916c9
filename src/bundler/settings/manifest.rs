//! Optional `bundle.toml` manifest.
//!
//! ```toml
//! [settings]
//! config_file = "roi_thresholds.json"
//! default_variant = "normal"
//!
//! [[variant]]
//! key = "normal"
//! entry = "winrate.py"
//! output_name = "winrate"
//! icon = "winrate.ico"
//! data = [{ source = "*.png" }]
//! ```

use super::BuildVariant;
use crate::bundler::error::{Error, ErrorExt, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Manifest file name looked up in the source directory.
pub const MANIFEST_FILE: &str = "bundle.toml";

/// `[settings]` table. Every field is optional; CLI and environment win.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ManifestSettings {
    /// Output directory.
    #[serde(default)]
    pub dist_dir: Option<PathBuf>,

    /// Transient build directory.
    #[serde(default)]
    pub work_dir: Option<PathBuf>,

    /// Persisted config file name.
    #[serde(default)]
    pub config_file: Option<String>,

    /// Variant chosen on empty interactive input.
    #[serde(default)]
    pub default_variant: Option<String>,

    /// Reconcile policy string (`full-wipe`, `preserve:json`).
    #[serde(default)]
    pub policy: Option<String>,
}

/// Parsed `bundle.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    /// Process-wide overrides.
    #[serde(default)]
    pub settings: ManifestSettings,

    /// Variant table; empty means "use the built-in catalog".
    #[serde(default, rename = "variant")]
    pub variants: Vec<BuildVariant>,
}

impl Manifest {
    /// Loads `bundle.toml` from `source_dir`, if present.
    pub async fn load(source_dir: &Path) -> Result<Option<Self>> {
        let path = source_dir.join(MANIFEST_FILE);
        if !tokio::fs::try_exists(&path)
            .await
            .fs_context("checking for manifest", &path)?
        {
            return Ok(None);
        }

        let text = tokio::fs::read_to_string(&path)
            .await
            .fs_context("reading manifest", &path)?;
        let manifest = Self::parse(&text).map_err(|e| Error::Manifest {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        log::debug!(
            "Loaded manifest {} ({} variants)",
            path.display(),
            manifest.variants.len()
        );
        Ok(Some(manifest))
    }

    /// Parses manifest text.
    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::settings::WindowMode;

    #[test]
    fn parses_variants_and_settings() {
        let manifest = Manifest::parse(
            r#"
            [settings]
            config_file = "saved_user_vars.json"
            default_variant = "normal"

            [[variant]]
            key = "normal"
            entry = "winrate.py"
            output_name = "winrate"
            icon = "winrate.ico"
            data = [{ source = "*.png" }, { source = "templates/*.png", destination = "templates" }]

            [[variant]]
            key = "cli"
            entry = "watch_winrate.py"
            output_name = "watch"
            mode = "console"
            "#,
        )
        .unwrap();

        assert_eq!(manifest.settings.config_file.as_deref(), Some("saved_user_vars.json"));
        assert_eq!(manifest.variants.len(), 2);
        assert_eq!(manifest.variants[0].data[0].destination, ".");
        assert_eq!(manifest.variants[0].data[1].destination, "templates");
        assert_eq!(manifest.variants[1].mode, WindowMode::Console);
        assert!(manifest.variants[1].icon.is_none());
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(Manifest::parse("[[variant]]\nkey = ").is_err());
    }

    #[tokio::test]
    async fn missing_manifest_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Manifest::load(dir.path()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn malformed_manifest_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(MANIFEST_FILE), "variant = 3").unwrap();
        let err = Manifest::load(dir.path()).await.unwrap_err();
        assert!(matches!(err, Error::Manifest { .. }));
    }
}
