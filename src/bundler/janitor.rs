//! Transient artifact cleanup.

use crate::bundler::utils::fs;
use std::path::{Path, PathBuf};

/// Removes the compiler's work directory and generated `.spec` descriptors.
///
/// Runs on every terminal path. Idempotent; failures are returned as
/// warnings rather than errors since the build result is already decided.
pub async fn cleanup(work_dir: &Path, spec_files: &[PathBuf]) -> Vec<String> {
    let mut warnings = Vec::new();

    if let Err(e) = fs::remove_dir_all(work_dir).await {
        warnings.push(format!("could not remove {}: {e}", work_dir.display()));
    } else {
        log::debug!("Removed work directory {}", work_dir.display());
    }

    for spec in spec_files {
        if let Err(e) = fs::remove_file(spec).await {
            warnings.push(format!("could not remove {}: {e}", spec.display()));
        }
    }

    for warning in &warnings {
        log::warn!("{warning}");
    }
    warnings
}

/// Deletes a failed build's output directory so no partial executable remains.
pub async fn remove_partial_output(output_dir: &Path) -> Option<String> {
    match fs::remove_dir_all(output_dir).await {
        Ok(()) => None,
        Err(e) => {
            let msg = format!(
                "could not remove partial output {}: {e}",
                output_dir.display()
            );
            log::warn!("{msg}");
            Some(msg)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn removes_work_dir_and_specs_idempotently() {
        let dir = tempfile::tempdir().unwrap();
        let work = dir.path().join("build");
        let spec = dir.path().join("winrate.spec");
        std::fs::create_dir_all(work.join("winrate")).unwrap();
        std::fs::write(work.join("winrate").join("base_library.zip"), b"z").unwrap();
        std::fs::write(&spec, b"# spec").unwrap();

        assert!(cleanup(&work, std::slice::from_ref(&spec)).await.is_empty());
        assert!(!work.exists());
        assert!(!spec.exists());

        assert!(cleanup(&work, &[spec]).await.is_empty());
    }

    #[tokio::test]
    async fn partial_output_is_removed() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("dist").join("winrate");
        std::fs::create_dir_all(&out).unwrap();
        std::fs::write(out.join("winrate"), b"half").unwrap();

        assert!(remove_partial_output(&out).await.is_none());
        assert!(!out.exists());
        assert!(remove_partial_output(&out).await.is_none());
    }
}
