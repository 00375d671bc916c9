//! SHA-256 digests for configs and output trees.
//!
//! Files hash their contents. Directories hash every file's relative path and
//! contents in sorted order, so two builds with identical output produce the
//! same digest regardless of timestamps.

use crate::{bail, bundler::Result, bundler::error::ErrorExt};
use sha2::{Digest, Sha256};
use std::path::Path;
use tokio::io::AsyncReadExt;

/// Calculates the SHA-256 of a file or directory tree.
pub async fn calculate_sha256(path: &Path) -> Result<String> {
    let metadata = tokio::fs::metadata(path)
        .await
        .fs_context("reading metadata for hashing", path)?;

    if metadata.is_file() {
        let mut hasher = Sha256::new();
        hash_file_into(&mut hasher, path).await?;
        Ok(format!("{:x}", hasher.finalize()))
    } else if metadata.is_dir() {
        calculate_directory_sha256(path).await
    } else {
        bail!("Path is neither file nor directory: {}", path.display())
    }
}

async fn hash_file_into(hasher: &mut Sha256, path: &Path) -> Result<()> {
    let mut file = tokio::fs::File::open(path)
        .await
        .fs_context("opening file for hashing", path)?;
    let mut buffer = vec![0u8; 8192];

    loop {
        let n = file
            .read(&mut buffer)
            .await
            .fs_context("reading file for hash calculation", path)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }
    Ok(())
}

async fn calculate_directory_sha256(dir_path: &Path) -> Result<String> {
    let mut entries: Vec<_> = walkdir::WalkDir::new(dir_path)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .collect();

    // Sort by path for deterministic ordering
    entries.sort_by_key(|e| e.path().to_path_buf());

    let mut hasher = Sha256::new();
    for entry in entries {
        if let Ok(rel_path) = entry.path().strip_prefix(dir_path) {
            hasher.update(rel_path.to_string_lossy().as_bytes());
        }
        hash_file_into(&mut hasher, entry.path()).await?;
    }

    Ok(format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn identical_files_share_digest() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.json");
        let b = dir.path().join("b.json");
        std::fs::write(&a, br#"{"delay": 1}"#).unwrap();
        std::fs::write(&b, br#"{"delay": 1}"#).unwrap();

        let digest = calculate_sha256(&a).await.unwrap();
        assert_eq!(digest.len(), 64);
        assert_eq!(digest, calculate_sha256(&b).await.unwrap());
    }

    #[tokio::test]
    async fn directory_digest_tracks_names_and_contents() {
        let dir = tempfile::tempdir().unwrap();
        let one = dir.path().join("one");
        let two = dir.path().join("two");
        for d in [&one, &two] {
            std::fs::create_dir_all(d.join("_internal")).unwrap();
            std::fs::write(d.join("app"), b"bin").unwrap();
            std::fs::write(d.join("_internal").join("lib"), b"lib").unwrap();
        }
        assert_eq!(
            calculate_sha256(&one).await.unwrap(),
            calculate_sha256(&two).await.unwrap()
        );

        std::fs::rename(two.join("app"), two.join("app2")).unwrap();
        assert_ne!(
            calculate_sha256(&one).await.unwrap(),
            calculate_sha256(&two).await.unwrap()
        );
    }

    #[tokio::test]
    async fn missing_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(calculate_sha256(&dir.path().join("nope")).await.is_err());
    }
}
