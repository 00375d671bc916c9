//! Shared fixtures: a throwaway source tree and a fake PyInstaller.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Stands in for PyInstaller. Understands the flags the bundler emits and
/// writes `<dist>/<name>/<name>`. The entry script steers it: `FAIL` exits 1,
/// `HANG` leaves partial output and sleeps, `CFGDIR` puts a directory where
/// the config belongs. Arguments are appended to `$FAKE_COMPILER_LOG` when set.
const FAKE_COMPILER: &str = r##"#!/bin/sh
[ -n "$FAKE_COMPILER_LOG" ] && printf '%s\n' "$@" >> "$FAKE_COMPILER_LOG"
name=""; dist=""; work=""; spec=""; entry=""; cfg=""
while [ $# -gt 0 ]; do
  case "$1" in
    --name) name="$2"; shift 2 ;;
    --distpath) dist="$2"; shift 2 ;;
    --workpath) work="$2"; shift 2 ;;
    --specpath) spec="$2"; shift 2 ;;
    --icon) shift 2 ;;
    --add-data)
      case "$2" in
        *.json:*) cfg="${2%:*}" ;;
      esac
      shift 2 ;;
    --*) shift ;;
    *) entry="$1"; shift ;;
  esac
done
if [ -z "$name" ] || [ -z "$dist" ] || [ -z "$work" ] || [ -z "$spec" ] || [ -z "$entry" ]; then
  echo "fake compiler: missing required arguments" >&2
  exit 2
fi
mkdir -p "$work/$name"
echo "# generated" > "$spec/$name.spec"
if grep -q HANG "$entry"; then
  mkdir -p "$dist/$name"
  echo "partial" > "$dist/$name/$name"
  echo "fake compiler: analysing $entry"
  exec sleep 30
fi
if grep -q FAIL "$entry"; then
  mkdir -p "$dist/$name"
  echo "partial" > "$dist/$name/$name"
  echo "fake compiler: syntax error in $entry" >&2
  exit 1
fi
rm -rf "$dist/$name"
mkdir -p "$dist/$name/_internal"
echo "executable for $name" > "$dist/$name/$name"
echo "runtime" > "$dist/$name/_internal/base_library.zip"
[ -n "$cfg" ] && cp "$cfg" "$dist/$name/"
if grep -q CFGDIR "$entry"; then
  mkdir -p "$dist/$name/roi_thresholds.json"
fi
echo "fake compiler: built $name"
exit 0
"##;

/// A source tree with both reference entry scripts and a fake compiler.
pub struct Project {
    pub root: TempDir,
    pub holding: TempDir,
}

impl Project {
    pub fn new() -> Self {
        let root = TempDir::new().unwrap();
        let src = root.path().join("src");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("winrate.py"), "print('normal')\n").unwrap();
        fs::write(src.join("multithread_winrate.py"), "print('mt')\n").unwrap();
        fs::write(src.join("Win SDR.png"), b"png").unwrap();

        let tools = root.path().join("tools");
        fs::create_dir_all(&tools).unwrap();
        let compiler = tools.join("fake-pyinstaller");
        fs::write(&compiler, FAKE_COMPILER).unwrap();
        make_executable(&compiler);

        Self {
            root,
            holding: TempDir::new().unwrap(),
        }
    }

    pub fn src(&self) -> PathBuf {
        self.root.path().join("src")
    }

    pub fn compiler(&self) -> PathBuf {
        self.root.path().join("tools").join("fake-pyinstaller")
    }

    pub fn args_log(&self) -> PathBuf {
        self.root.path().join("compiler-args.log")
    }

    pub fn dist(&self, name: &str) -> PathBuf {
        self.src().join("dist").join(name)
    }

    pub fn holding_files(&self) -> usize {
        fs::read_dir(self.holding.path()).unwrap().count()
    }

    pub fn break_entry(&self, entry: &str) {
        self.write_entry(entry, "FAIL\n");
    }

    pub fn write_entry(&self, entry: &str, contents: &str) {
        fs::write(self.src().join(entry), contents).unwrap();
    }
}

#[cfg(unix)]
fn make_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) {}

/// Relative path and contents of every file under `dir`, sorted.
pub fn snapshot(dir: &Path) -> Vec<(String, Vec<u8>)> {
    let mut files: Vec<_> = walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let rel = e.path().strip_prefix(dir).unwrap().to_string_lossy().into_owned();
            (rel, fs::read(e.path()).unwrap())
        })
        .collect();
    files.sort();
    files
}
