//! Build variant definitions.

use serde::Deserialize;
use std::path::{Component, Path, PathBuf};

/// Whether the packaged executable opens a console window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowMode {
    /// GUI application, no console window
    #[default]
    Windowed,
    /// Console application
    Console,
}

impl WindowMode {
    /// Compiler flag for this mode.
    pub fn flag(self) -> &'static str {
        match self {
            WindowMode::Windowed => "--windowed",
            WindowMode::Console => "--console",
        }
    }
}

/// A data-bundling rule: files matching `source` land at `destination`
/// inside the bundle.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DataSpec {
    /// Glob relative to the source directory.
    pub source: String,

    /// Destination directory inside the bundle.
    ///
    /// Default: `"."` (bundle root)
    #[serde(default = "default_destination")]
    pub destination: String,
}

fn default_destination() -> String {
    ".".to_string()
}

impl DataSpec {
    /// Creates a rule bundling `source` at the bundle root.
    pub fn at_root(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            destination: default_destination(),
        }
    }
}

/// One buildable flavour of the application.
///
/// Immutable once the catalog is loaded; exactly one is selected per run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BuildVariant {
    /// Selection key, e.g. `normal` or `multithreaded`.
    pub key: String,

    /// Entry script, relative to the source directory.
    pub entry: PathBuf,

    /// Executable name; also names the output subdirectory.
    pub output_name: String,

    /// Optional icon, relative to the source directory.
    #[serde(default)]
    pub icon: Option<PathBuf>,

    /// Data files bundled next to the executable.
    #[serde(default)]
    pub data: Vec<DataSpec>,

    /// Console or windowed executable.
    #[serde(default)]
    pub mode: WindowMode,
}

impl BuildVariant {
    /// Creates a windowed variant with no icon or data.
    pub fn new(key: impl Into<String>, entry: impl Into<PathBuf>, output_name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            entry: entry.into(),
            output_name: output_name.into(),
            icon: None,
            data: Vec::new(),
            mode: WindowMode::default(),
        }
    }

    /// Sets the icon path.
    pub fn with_icon(mut self, icon: impl Into<PathBuf>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Adds a data-bundling rule.
    pub fn with_data(mut self, spec: DataSpec) -> Self {
        self.data.push(spec);
        self
    }

    /// Sets the window mode.
    pub fn with_mode(mut self, mode: WindowMode) -> Self {
        self.mode = mode;
        self
    }
}

/// True when `name` is a single plain path component: not empty, no
/// separators, not `.` or `..`.
pub(crate) fn is_bare_name(name: &str) -> bool {
    let mut parts = Path::new(name).components();
    matches!(
        (parts.next(), parts.next()),
        (Some(Component::Normal(part)), None) if part == name
    )
}
