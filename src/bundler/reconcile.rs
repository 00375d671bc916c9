//! Output directory reconciliation.
//!
//! Brings a variant's output directory to a known state before the compiler
//! runs. Any failure here is fatal: compiling into a half-cleaned directory
//! would mix stale and fresh artifacts.

use crate::bundler::{
    error::{Error, Result},
    settings::ReconcilePolicy,
    utils::fs,
};
use std::{
    io,
    path::{Path, PathBuf},
};

/// Reconciles `dir` according to `policy`, creating it if absent.
///
/// `SelectivePreserve` works on direct children only: files whose extension
/// is in the preserved set stay, every other entry is removed, and
/// subdirectories are always removed whole.
pub async fn reconcile(dir: &Path, policy: &ReconcilePolicy) -> Result<()> {
    let wrap = |error: io::Error| Error::Reconciliation {
        path: dir.to_path_buf(),
        error,
    };

    match policy {
        ReconcilePolicy::FullWipe => {
            log::debug!("Wiping {}", dir.display());
            fs::create_dir_all(dir, true).await.map_err(wrap)?;
        }
        ReconcilePolicy::SelectivePreserve(keep) => {
            fs::create_dir_all(dir, false).await.map_err(wrap)?;
            let doomed = list_unpreserved(dir.to_path_buf(), keep.clone())
                .await
                .map_err(wrap)?;
            for path in doomed {
                log::debug!("Removing {}", path.display());
                fs::remove_entry(&path).await.map_err(wrap)?;
            }
        }
    }
    Ok(())
}

async fn list_unpreserved(
    dir: PathBuf,
    keep: std::collections::BTreeSet<String>,
) -> io::Result<Vec<PathBuf>> {
    tokio::task::spawn_blocking(move || {
        let mut doomed = Vec::new();
        for entry in walkdir::WalkDir::new(&dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(io::Error::other)?;
            let preserved = entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| keep.contains(&e.to_ascii_lowercase()));
            if preserved {
                log::debug!("Preserving {}", entry.path().display());
            } else {
                doomed.push(entry.into_path());
            }
        }
        Ok(doomed)
    })
    .await
    .map_err(io::Error::other)?
}
