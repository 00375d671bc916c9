//! Command line interface for the variant bundler.
//!
//! This module parses arguments, assembles the [`BuildConfig`], selects a
//! variant (prompting when needed), runs the [`Orchestrator`] and prints the
//! result.

mod args;
mod output;
pub mod prompt;

pub use args::{Args, RuntimeConfig};
pub use output::OutputManager;

use crate::bundler::{
    BuildConfig, BuildConfigBuilder, BuildReport, BuildVariant, Manifest, Orchestrator,
    RestoreStatus, VariantCatalog, WindowMode,
};
use crate::error::{CliError, Result};
use std::time::Duration;

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    args.validate()
        .map_err(|reason| CliError::InvalidArguments { reason })?;
    let runtime = RuntimeConfig::from(&args);
    execute(&args, &runtime).await
}

/// Runs one packaging invocation for already-parsed arguments.
pub async fn execute(args: &Args, runtime: &RuntimeConfig) -> Result<i32> {
    let output = runtime.output();
    let manifest = Manifest::load(&args.source).await?;
    let catalog = VariantCatalog::from_manifest(manifest.as_ref(), &args.source)?;

    if args.list {
        output.section("Variants");
        for variant in catalog.iter() {
            output.indent(&format!(
                "{:<16} {} -> {}",
                variant.key,
                variant.entry.display(),
                variant.output_name
            ));
        }
        return Ok(0);
    }

    let config = build_config(args, manifest.as_ref())?;
    if let Some(default) = config.default_variant() {
        catalog.resolve(default)?;
    }

    let mut variant = match &args.variant {
        Some(key) => catalog.resolve(key)?.clone(),
        None => prompt_on_stdin(catalog.clone(), config.default_variant().map(str::to_string)).await?,
    };
    if args.console {
        variant = variant.with_mode(WindowMode::Console);
    }

    output.section(&format!("Packaging '{}'", variant.key));
    output.progress(&format!("Output: {}", config.output_dir(&variant).display()));
    output.progress(&format!("Policy: {}", config.policy()));

    let report = Orchestrator::new(&config).run(&variant).await?;

    print_report(&report, output);
    Ok(report.exit_code())
}

/// Builds the config: defaults, then `bundle.toml`, then CLI/environment.
pub fn build_config(args: &Args, manifest: Option<&Manifest>) -> Result<BuildConfig> {
    let mut builder = BuildConfigBuilder::new().source_dir(&args.source);
    if let Some(manifest) = manifest {
        builder = builder.manifest(&manifest.settings)?;
    }
    if let Some(dir) = &args.dist_dir {
        builder = builder.dist_dir(dir);
    }
    if let Some(dir) = &args.work_dir {
        builder = builder.work_dir(dir);
    }
    if let Some(name) = &args.config_name {
        builder = builder.config_file_name(name);
    }
    if let Some(policy) = &args.policy {
        builder = builder.policy(policy.clone());
    }
    if let Some(key) = &args.default_variant {
        builder = builder.default_variant(key);
    }
    if let Some(compiler) = &args.compiler {
        builder = builder.compiler(compiler);
    }
    if args.no_interpreter_check {
        builder = builder.interpreter(None);
    } else if let Some(interpreter) = &args.interpreter {
        builder = builder.interpreter(Some(interpreter.clone()));
    }
    if let Some(secs) = args.timeout {
        builder = builder.compiler_timeout(Duration::from_secs(secs));
    }
    if let Some(ms) = args.settle_ms {
        builder = builder.settle_delay(Duration::from_millis(ms));
    }
    Ok(builder.build()?)
}

async fn prompt_on_stdin(catalog: VariantCatalog, default: Option<String>) -> Result<BuildVariant> {
    tokio::task::spawn_blocking(move || {
        let stdin = std::io::stdin();
        let mut input = stdin.lock();
        let mut out = std::io::stdout();
        prompt::select_variant(&catalog, default.as_deref(), &mut input, &mut out)
    })
    .await
    .map_err(std::io::Error::other)?
}

fn print_report(report: &BuildReport, output: &OutputManager) {
    output.section("Result");

    if report.outcome.success {
        output.success(&format!(
            "Built '{}' into {}",
            report.outcome.variant,
            report.output_dir.display()
        ));
        if let Some(sum) = &report.output_checksum {
            output.indent(&format!("SHA256: {sum}"));
        }
        if !report.icon.present {
            output.indent("No icon embedded");
        }
    } else {
        let reason = if report.outcome.timed_out {
            "timed out".to_string()
        } else {
            format!("exit code {:?}", report.outcome.exit_code)
        };
        output.error(&format!(
            "Compiler failed for '{}' ({reason}); compiler output follows",
            report.outcome.variant
        ));
        output.diagnostics(&report.outcome.diagnostic_text);
    }

    match &report.restore {
        RestoreStatus::Restored(path) => output.success(&format!(
            "Config restored to {} (from {})",
            path.display(),
            report.backup_origin
        )),
        RestoreStatus::NothingToRestore => output.indent("No config to restore"),
        status if status.needs_attention() => {
            output.warn("CONFIG NOT RESTORED: place it manually (see warnings)")
        }
        _ => {}
    }

    for warning in &report.warnings {
        output.warn(warning);
    }
}
