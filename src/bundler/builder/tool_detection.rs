//! External tool detection and availability checking.
//!
//! Both the interpreter and the compiler must be reachable before anything
//! destructive happens to the output directory.

use crate::bundler::{
    error::{Context, Error, Result},
    settings::BuildConfig,
};
use std::path::{Path, PathBuf};

/// Resolved tool locations.
#[derive(Debug, Clone)]
pub struct Toolchain {
    /// Compiler executable
    pub compiler: PathBuf,
    /// Interpreter executable and its reported version, when checked
    pub interpreter: Option<(PathBuf, String)>,
}

/// Locates the compiler and, if configured, the interpreter.
pub async fn verify_preconditions(config: &BuildConfig) -> Result<Toolchain> {
    let compiler = locate(config.compiler())?;
    log::debug!("Found compiler at: {}", compiler.display());

    let interpreter = match config.interpreter() {
        Some(name) => {
            let path = locate(name)?;
            let version = query_version(name, &path).await?;
            log::info!("✓ {name} available: {version}");
            Some((path, version))
        }
        None => None,
    };

    Ok(Toolchain {
        compiler,
        interpreter,
    })
}

fn locate(program: &str) -> Result<PathBuf> {
    which::which(program).map_err(|e| Error::PreconditionMissing {
        tool: program.to_string(),
        reason: format!("{e}. Install it or point to it explicitly."),
    })
}

async fn query_version(name: &str, path: &Path) -> Result<String> {
    let output = tokio::process::Command::new(path)
        .arg("--version")
        .output()
        .await
        .map_err(|e| Error::PreconditionMissing {
            tool: name.to_string(),
            reason: format!(
                "found at {} but failed to execute: {e}. Check file permissions.",
                path.display()
            ),
        })?;

    if !output.status.success() {
        return Err(Error::PreconditionMissing {
            tool: name.to_string(),
            reason: format!(
                "found at {} but --version check failed (exit code: {:?}). Stderr: {}",
                path.display(),
                output.status.code(),
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        });
    }

    // Older Python releases print the version on stderr
    let text = if output.stdout.is_empty() {
        output.stderr
    } else {
        output.stdout
    };
    String::from_utf8_lossy(&text)
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
        .context(format!("{name} --version printed nothing"))
}
