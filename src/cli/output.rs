//! Operator-facing terminal output.
//!
//! Structured logging goes through `log`; this is the human summary printed
//! regardless of `RUST_LOG`.

use console::style;

/// Colored terminal output with a quiet mode.
#[derive(Debug, Clone)]
pub struct OutputManager {
    quiet: bool,
}

impl OutputManager {
    /// Creates an output manager. Quiet mode keeps warnings and errors only.
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    /// Print section header
    pub fn section(&self, title: &str) {
        if !self.quiet {
            println!("\n{}", style(title).bold().cyan());
        }
    }

    /// Print progress message
    pub fn progress(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("→").blue(), message);
        }
    }

    /// Print success message
    pub fn success(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("✓").green(), message);
        }
    }

    /// Print indented text
    pub fn indent(&self, message: &str) {
        if !self.quiet {
            println!("  {}", message);
        }
    }

    /// Print warning message
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", style("⚠").yellow(), style(message).yellow());
    }

    /// Print error message
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✗").red().bold(), style(message).red());
    }

    /// Print compiler output as-is
    pub fn diagnostics(&self, text: &str) {
        if !text.is_empty() {
            eprint!("{text}");
            if !text.ends_with('\n') {
                eprintln!();
            }
        }
    }
}
