//! Package finder module
//!
//! This module decides how a benchmark file has to be loaded by walking upward
//! from its directory over package marker files.

use crate::error::{Error, Result};
use relative_path::RelativePathBuf;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File marking a directory as part of a benchmark package
pub const PACKAGE_MARKER: &str = "mod.rhai";

/// File extension of benchmark and module scripts
pub const SCRIPT_EXTENSION: &str = "rhai";

/// Where a benchmark file lives and how it must be loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitLocation {
    /// File inside a nested package hierarchy
    Package {
        /// First directory above the outermost package; goes on the search path
        root: PathBuf,
        /// Package names, outermost first
        segments: Vec<String>,
        /// Base name of the benchmark file
        name: String,
        /// Canonical benchmark file path
        path: PathBuf,
    },
    /// Loose file outside any package
    Standalone {
        /// Base name of the benchmark file
        name: String,
        /// Canonical benchmark file path
        path: PathBuf,
    },
}

impl UnitLocation {
    /// Name of the unit: dotted package path plus base name, or the base name
    pub fn qualified_name(&self) -> String {
        match self {
            UnitLocation::Package { segments, name, .. } => {
                let mut parts = segments.clone();
                parts.push(name.clone());
                parts.join(".")
            }
            UnitLocation::Standalone { name, .. } => name.clone(),
        }
    }

    /// Canonical benchmark file path
    pub fn path(&self) -> &Path {
        match self {
            UnitLocation::Package { path, .. } | UnitLocation::Standalone { path, .. } => path,
        }
    }
}

/// Utility for locating benchmark units
pub struct PackageFinder;

impl PackageFinder {
    /// Locate a benchmark file
    ///
    /// The path is canonicalised first, so the result does not depend on the
    /// current working directory. The upward walk stops at the first directory
    /// without a marker file, and never goes past the filesystem root.
    pub fn locate(path: impl AsRef<Path>) -> Result<UnitLocation> {
        let requested = path.as_ref();
        let path = requested.canonicalize().map_err(|e| {
            Error::load_error(requested, format!("cannot access benchmark file: {e}"))
        })?;

        if !path.is_file() {
            return Err(Error::load_error(&path, "not a regular file"));
        }

        let name = Self::base_name(&path)
            .ok_or_else(|| Error::load_error(&path, "benchmark file has no usable name"))?;

        let directory = path
            .parent()
            .ok_or_else(|| Error::load_error(&path, "benchmark file has no parent directory"))?;

        let (root, segments) = Self::walk_packages(directory);

        if let Some(segment) = segments.iter().find(|s| s.contains('.')) {
            return Err(Error::load_error(
                &path,
                format!("package directory '{segment}' contains '.' and cannot be part of a dotted unit name"),
            ));
        }

        debug!(
            file = %path.display(),
            packages = ?segments,
            "located benchmark unit"
        );

        Ok(if segments.is_empty() {
            UnitLocation::Standalone { name, path }
        } else {
            UnitLocation::Package {
                root,
                segments,
                name,
                path,
            }
        })
    }

    /// File name up to its first dot
    pub fn base_name(path: &Path) -> Option<String> {
        path.file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.split('.').next())
            .filter(|n| !n.is_empty())
            .map(ToOwned::to_owned)
    }

    /// Whether a directory carries the package marker
    pub fn is_package(directory: &Path) -> bool {
        directory.join(PACKAGE_MARKER).is_file()
    }

    /// Module path of a qualified name relative to a search path entry
    ///
    /// `a.b.bench` becomes `a/b/bench.rhai`.
    pub fn module_path(qualified_name: &str) -> RelativePathBuf {
        let mut path: RelativePathBuf = qualified_name.split('.').collect();
        path.set_extension(SCRIPT_EXTENSION);
        path
    }

    /// Walk upward while directories are packages; returns the terminal
    /// directory and the collected segments, outermost first
    fn walk_packages(start: &Path) -> (PathBuf, Vec<String>) {
        let mut segments = Vec::new();
        let mut current = start;

        while Self::is_package(current) {
            // The filesystem root has no leaf name and no parent to move to
            let (Some(leaf), Some(parent)) = (
                current.file_name().and_then(|n| n.to_str()),
                current.parent(),
            ) else {
                break;
            };
            segments.insert(0, leaf.to_owned());
            current = parent;
        }

        (current.to_path_buf(), segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    /// **What is tested:** Standalone detection for a file without marker files above it
    /// **Why it is tested:** Loose files are loaded directly rather than through a package
    /// **Test conditions:** Single file in a temporary directory
    /// **Expectations:** Standalone location with the base name
    #[test]
    fn test_locate_standalone() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("fib.rhai");
        touch(&file);

        let location = PackageFinder::locate(&file).unwrap();
        assert!(matches!(location, UnitLocation::Standalone { ref name, .. } if name == "fib"));
        assert_eq!(location.qualified_name(), "fib");
        assert_eq!(location.path(), file.canonicalize().unwrap());
    }

    /// **What is tested:** Package walk across several nested marker levels
    /// **Why it is tested:** Nested packages must produce the full dotted name and the right root
    /// **Test conditions:** root/suite/micro/loops.rhai with markers in suite and micro
    /// **Expectations:** Segments [suite, micro], root is the temp dir, name suite.micro.loops
    #[test]
    fn test_locate_nested_package() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("suite").join(PACKAGE_MARKER));
        touch(&temp.path().join("suite/micro").join(PACKAGE_MARKER));
        let file = temp.path().join("suite/micro/loops.rhai");
        touch(&file);

        let location = PackageFinder::locate(&file).unwrap();
        match &location {
            UnitLocation::Package { root, segments, name, .. } => {
                assert_eq!(root, &temp.path().canonicalize().unwrap());
                assert_eq!(segments, &["suite".to_owned(), "micro".to_owned()]);
                assert_eq!(name, "loops");
            }
            other => panic!("expected package, got {other:?}"),
        }
        assert_eq!(location.qualified_name(), "suite.micro.loops");
    }

    /// **What is tested:** Walk stops at the first directory without a marker
    /// **Why it is tested:** A gap in the markers ends the package hierarchy
    /// **Test conditions:** Marker in a/b/c and a, none in a/b
    /// **Expectations:** Only segment c, root a/b
    #[test]
    fn test_walk_stops_at_gap() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("a").join(PACKAGE_MARKER));
        touch(&temp.path().join("a/b/c").join(PACKAGE_MARKER));
        let file = temp.path().join("a/b/c/bench.rhai");
        touch(&file);

        match PackageFinder::locate(&file).unwrap() {
            UnitLocation::Package { root, segments, .. } => {
                assert_eq!(segments, vec!["c".to_owned()]);
                assert!(root.ends_with("a/b"));
            }
            other => panic!("expected package, got {other:?}"),
        }
    }

    /// **What is tested:** Package directories whose names contain a dot
    /// **Why it is tested:** Such a directory cannot be addressed by a dotted unit name
    /// **Test conditions:** my.pkg/bench.rhai with a marker in my.pkg
    /// **Expectations:** Error::Load naming the offending directory
    #[test]
    fn test_dotted_package_directory_rejected() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("my.pkg").join(PACKAGE_MARKER));
        let file = temp.path().join("my.pkg/bench.rhai");
        touch(&file);

        let err = PackageFinder::locate(&file).unwrap_err();
        assert!(matches!(err, Error::Load { .. }));
        assert!(err.to_string().contains("package directory 'my.pkg'"));
    }

    /// **What is tested:** Missing benchmark files
    /// **Why it is tested:** A missing file is a load error before anything else happens
    /// **Test conditions:** Path that does not exist
    /// **Expectations:** Error::Load mentioning the path
    #[test]
    fn test_locate_missing_file() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope.rhai");
        let err = PackageFinder::locate(&missing).unwrap_err();
        assert!(matches!(err, Error::Load { .. }));
        assert!(err.to_string().contains("nope.rhai"));
    }

    /// **What is tested:** Base name extraction and module path mapping
    /// **Why it is tested:** Names are cut at the first dot, dotted names map to nested files
    /// **Test conditions:** Multi-dot file name; three-part qualified name
    /// **Expectations:** Base name before the first dot; a/b/c.rhai relative path
    #[test]
    fn test_names_and_module_paths() {
        assert_eq!(
            PackageFinder::base_name(Path::new("/x/bench.v2.rhai")),
            Some("bench".to_owned())
        );
        assert_eq!(PackageFinder::base_name(Path::new("/x/.hidden")), None);
        assert_eq!(PackageFinder::module_path("a.b.c").as_str(), "a/b/c.rhai");
    }
}
