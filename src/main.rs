//! Variant Bundler - packages build variants into standalone executables.
//!
//! This binary selects one build variant, runs the packaging compiler for it
//! and keeps the operator's config file across rebuilds.

use std::process;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Run CLI and get exit code
    let exit_code = match variant_bundler::cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            for hint in e.recovery_suggestions() {
                eprintln!("  hint: {}", hint);
            }
            1
        }
    };

    process::exit(exit_code);
}
