//! Registry of build variants.

use super::{BuildVariant, DataSpec, Manifest, variant::is_bare_name};
use crate::bundler::error::{Error, Result};
use std::{collections::HashSet, path::Path};

/// Closed set of variants selectable in one process.
#[derive(Debug, Clone)]
pub struct VariantCatalog {
    variants: Vec<BuildVariant>,
}

impl VariantCatalog {
    /// The two reference variants: single-threaded and multithreaded bot.
    pub fn builtin() -> Self {
        Self {
            variants: vec![
                BuildVariant::new("normal", "winrate.py", "winrate")
                    .with_icon("winrate.ico")
                    .with_data(DataSpec::at_root("*.png")),
                BuildVariant::new("multithreaded", "multithread_winrate.py", "multithread_winrate")
                    .with_icon("multithread_winrate.ico")
                    .with_data(DataSpec::at_root("*.png")),
            ],
        }
    }

    /// Builds a catalog from explicit variants.
    ///
    /// Keys must be unique (case-insensitive) and the list non-empty. Each
    /// `output_name` must be a bare directory name, since the variant's output
    /// directory is `dist/<output_name>` and gets wiped on every build.
    pub fn new(variants: Vec<BuildVariant>) -> std::result::Result<Self, String> {
        if variants.is_empty() {
            return Err("no variants defined".to_string());
        }
        let mut seen = HashSet::new();
        let mut outputs = HashSet::new();
        for variant in &variants {
            let key = normalize(&variant.key);
            if key.is_empty() {
                return Err("variant key cannot be empty".to_string());
            }
            if !seen.insert(key) {
                return Err(format!("duplicate variant key '{}'", variant.key));
            }
            if !is_bare_name(&variant.output_name) {
                return Err(format!(
                    "variant '{}' has invalid output_name '{}' (must be a plain directory name)",
                    variant.key, variant.output_name
                ));
            }
            if !outputs.insert(variant.output_name.as_str()) {
                return Err(format!(
                    "output_name '{}' is used by more than one variant",
                    variant.output_name
                ));
            }
        }
        Ok(Self { variants })
    }

    /// Uses the manifest's variants when it defines any, otherwise the built-ins.
    pub fn from_manifest(manifest: Option<&Manifest>, source_dir: &Path) -> Result<Self> {
        match manifest {
            Some(m) if !m.variants.is_empty() => {
                Self::new(m.variants.clone()).map_err(|reason| Error::Manifest {
                    path: source_dir.join(super::manifest::MANIFEST_FILE),
                    reason,
                })
            }
            _ => Ok(Self::builtin()),
        }
    }

    /// Looks up a variant by key. Surrounding whitespace and case are ignored.
    pub fn resolve(&self, key: &str) -> Result<&BuildVariant> {
        let wanted = normalize(key);
        self.variants
            .iter()
            .find(|v| normalize(&v.key) == wanted)
            .ok_or_else(|| Error::UnknownVariant {
                key: key.trim().to_string(),
                known: self.keys().map(str::to_string).collect(),
            })
    }

    /// Valid selection keys in catalog order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.variants.iter().map(|v| v.key.as_str())
    }

    /// All variants in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &BuildVariant> {
        self.variants.iter()
    }

    /// Number of variants.
    pub fn len(&self) -> usize {
        self.variants.len()
    }

    /// Always false for a constructed catalog.
    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}

fn normalize(key: &str) -> String {
    key.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_every_builtin_key() {
        let catalog = VariantCatalog::builtin();
        for key in ["normal", "multithreaded"] {
            assert_eq!(catalog.resolve(key).unwrap().key, key);
        }
        assert_eq!(catalog.resolve("  Multithreaded\n").unwrap().key, "multithreaded");
    }

    #[test]
    fn rejects_unknown_keys() {
        let catalog = VariantCatalog::builtin();
        for key in ["", "3", "norm", "multi threaded"] {
            let err = catalog.resolve(key).unwrap_err();
            assert!(matches!(err, Error::UnknownVariant { .. }), "{key:?}");
        }
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let err = VariantCatalog::new(vec![
            BuildVariant::new("a", "a.py", "a"),
            BuildVariant::new("A", "b.py", "b"),
        ])
        .unwrap_err();
        assert!(err.contains("duplicate"));
        assert!(VariantCatalog::new(Vec::new()).is_err());
    }

    #[test]
    fn output_names_must_be_plain_directory_names() {
        for name in ["", ".", "..", "a/b", "../escape", "/abs", "a/"] {
            let err = VariantCatalog::new(vec![BuildVariant::new("a", "a.py", name)]).unwrap_err();
            assert!(err.contains("invalid output_name"), "{name:?}: {err}");
        }
        assert!(VariantCatalog::new(vec![BuildVariant::new("a", "a.py", "winrate_v2")]).is_ok());
    }

    #[test]
    fn shared_output_names_are_rejected() {
        let err = VariantCatalog::new(vec![
            BuildVariant::new("a", "a.py", "same"),
            BuildVariant::new("b", "b.py", "same"),
        ])
        .unwrap_err();
        assert!(err.contains("more than one variant"));
    }

    #[test]
    fn empty_output_name_in_manifest_is_a_manifest_error() {
        let manifest = Manifest::parse(
            "[[variant]]\nkey = \"lite\"\nentry = \"lite.py\"\noutput_name = \"\"\n",
        )
        .unwrap();
        let err = VariantCatalog::from_manifest(Some(&manifest), Path::new("bot")).unwrap_err();
        assert!(matches!(err, Error::Manifest { ref path, .. } if path.ends_with("bundle.toml")));
    }

    #[test]
    fn manifest_variants_replace_builtins() {
        let manifest = Manifest::parse(
            "[[variant]]\nkey = \"lite\"\nentry = \"lite.py\"\noutput_name = \"lite\"\n",
        )
        .unwrap();
        let catalog = VariantCatalog::from_manifest(Some(&manifest), Path::new(".")).unwrap();
        assert_eq!(catalog.keys().collect::<Vec<_>>(), ["lite"]);

        let empty = Manifest::default();
        let catalog = VariantCatalog::from_manifest(Some(&empty), Path::new(".")).unwrap();
        assert_eq!(catalog.len(), 2);
    }
}
