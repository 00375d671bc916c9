//! Compiler invocation.
//!
//! Assembles one deterministic argument list for the external packaging
//! compiler (PyInstaller's flag surface), runs it as a subprocess and captures
//! its output. Diagnostics are surfaced verbatim and never interpreted.

use crate::bundler::{
    builder::BuildOutcome,
    error::{Error, Result},
    icon::IconDecision,
    settings::{BuildConfig, BuildVariant, WindowMode},
};
use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    process::Stdio,
    time::Duration,
};
use tokio::{io::AsyncReadExt, process::Command, task::JoinHandle};

/// Separator between source and destination in `--add-data`.
pub const DATA_SEPARATOR: &str = if cfg!(windows) { ";" } else { ":" };

/// One concrete `--add-data` directive.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct DataBundle {
    /// File on disk
    pub source: PathBuf,
    /// Directory inside the bundle
    pub destination: String,
}

impl DataBundle {
    /// Bundles `source` at the bundle root.
    pub fn at_root(source: PathBuf) -> Self {
        Self {
            source,
            destination: ".".to_string(),
        }
    }

    /// `<source><SEP><destination>`
    pub fn directive(&self) -> OsString {
        let mut directive = self.source.clone().into_os_string();
        directive.push(DATA_SEPARATOR);
        directive.push(&self.destination);
        directive
    }
}

/// Inputs for one compiler run.
#[derive(Debug, Clone)]
pub struct CompileRequest<'a> {
    /// Variant being built
    pub variant: &'a BuildVariant,
    /// Icon decision
    pub icon: &'a IconDecision,
    /// Source-tree config to embed, if present
    pub config_bundle: Option<DataBundle>,
    /// Expanded data bundles
    pub data: Vec<DataBundle>,
    /// Console or windowed
    pub mode: WindowMode,
}

/// Expands a variant's data globs against the source directory.
///
/// Matches are sorted and de-duplicated. Patterns matching nothing come back
/// as warnings; malformed patterns are errors.
pub fn resolve_data_bundles(
    config: &BuildConfig,
    variant: &BuildVariant,
) -> Result<(Vec<DataBundle>, Vec<String>)> {
    let root = glob::Pattern::escape(&config.source_dir().to_string_lossy());
    let mut bundles = Vec::new();
    let mut warnings = Vec::new();

    for spec in &variant.data {
        let pattern = Path::new(&root).join(&spec.source);
        let mut matched = 0usize;
        for entry in glob::glob(&pattern.to_string_lossy())? {
            match entry {
                Ok(path) if path.is_file() => {
                    matched += 1;
                    bundles.push(DataBundle {
                        source: path,
                        destination: spec.destination.clone(),
                    });
                }
                Ok(_) => {}
                Err(e) => warnings.push(format!("unreadable data path: {e}")),
            }
        }
        if matched == 0 {
            let msg = format!("data pattern '{}' matched no files", spec.source);
            log::warn!("{msg}");
            warnings.push(msg);
        }
    }

    bundles.sort();
    bundles.dedup();
    Ok((bundles, warnings))
}

/// Builds the compiler argument list. Same inputs, same output.
pub fn build_args(config: &BuildConfig, request: &CompileRequest<'_>) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "--noconfirm".into(),
        "--clean".into(),
        "--onedir".into(),
        "--name".into(),
        request.variant.output_name.clone().into(),
        "--distpath".into(),
        config.dist_dir().into(),
        "--workpath".into(),
        config.work_dir().into(),
        "--specpath".into(),
        config.spec_dir().into(),
        request.mode.flag().into(),
    ];

    if let Some(icon) = request.icon.flag_path() {
        args.push("--icon".into());
        args.push(icon.into());
    }

    for bundle in request.config_bundle.iter().chain(request.data.iter()) {
        args.push("--add-data".into());
        args.push(bundle.directive());
    }

    args.push(config.source_path(&request.variant.entry).into());
    args
}

/// Runs `program` (the resolved compiler) and waits for it.
///
/// Non-zero exit and timeout produce `success = false`; only a spawn failure
/// is an error.
pub async fn invoke(
    config: &BuildConfig,
    program: &Path,
    request: &CompileRequest<'_>,
) -> Result<BuildOutcome> {
    let args = build_args(config, request);
    log::info!(
        "Running {} {}",
        program.display(),
        args.iter()
            .map(|a| a.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    );

    let mut child = Command::new(program)
        .args(&args)
        .current_dir(config.source_dir())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|error| Error::CommandFailed {
            command: config.compiler().to_string(),
            error,
        })?;

    // Drain both pipes in the background so neither fills and blocks the
    // compiler, and so output written before a timeout is kept
    let stdout = tokio::spawn(read_all(child.stdout.take()));
    let stderr = tokio::spawn(read_all(child.stderr.take()));

    let status = match config.compiler_timeout() {
        Some(limit) => tokio::time::timeout(limit, child.wait()).await.ok(),
        None => Some(child.wait().await),
    };

    let Some(status) = status else {
        let limit = config.compiler_timeout().unwrap_or_default();
        log::error!("Compiler timed out after {limit:?}, terminating");
        if let Err(e) = child.kill().await {
            log::warn!("Failed to kill compiler: {e}");
        }
        let mut diagnostic_text = collect(stdout, Some(OUTPUT_GRACE)).await;
        diagnostic_text.push_str(&collect(stderr, Some(OUTPUT_GRACE)).await);
        if !diagnostic_text.is_empty() && !diagnostic_text.ends_with('\n') {
            diagnostic_text.push('\n');
        }
        diagnostic_text.push_str(&format!("compiler timed out after {limit:?}\n"));
        return Ok(BuildOutcome {
            variant: request.variant.key.clone(),
            success: false,
            exit_code: None,
            diagnostic_text,
            timed_out: true,
        });
    };

    let status = status.map_err(|error| Error::CommandFailed {
        command: config.compiler().to_string(),
        error,
    })?;

    let mut diagnostic_text = collect(stdout, None).await;
    diagnostic_text.push_str(&collect(stderr, None).await);

    log::debug!("Compiler exited with {status}");
    Ok(BuildOutcome {
        variant: request.variant.key.clone(),
        success: status.success(),
        exit_code: status.code(),
        diagnostic_text,
        timed_out: false,
    })
}

/// How long to wait for pipes to close after killing a timed-out compiler.
/// Grandchildren can keep them open past the kill.
const OUTPUT_GRACE: Duration = Duration::from_secs(2);

async fn read_all<R: tokio::io::AsyncRead + Unpin>(stream: Option<R>) -> String {
    let mut buf = Vec::new();
    if let Some(mut stream) = stream
        && let Err(e) = stream.read_to_end(&mut buf).await
    {
        log::warn!("Failed to read compiler output: {e}");
    }
    String::from_utf8_lossy(&buf).into_owned()
}

async fn collect(mut reader: JoinHandle<String>, grace: Option<Duration>) -> String {
    let joined = match grace {
        Some(limit) => match tokio::time::timeout(limit, &mut reader).await {
            Ok(joined) => joined,
            Err(_) => {
                log::warn!("Compiler output still open after {limit:?}; dropping the rest");
                reader.abort();
                return String::new();
            }
        },
        None => reader.await,
    };
    joined.unwrap_or_else(|e| {
        log::warn!("Compiler output reader failed: {e}");
        String::new()
    })
}
