//! Native extension compilation
//!
//! Standalone benchmark units can build small C snippets into shared
//! libraries next to the benchmark file through the `ccompile(name, source)`
//! script function.

use crate::error::{Error, Result};
use crate::search_path::SearchPathResolver;
use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tracing::{debug, info};

/// Script function name under which the helper is registered
pub const HELPER_NAME: &str = "ccompile";

/// Builds C sources into shared libraries inside an install directory
#[derive(Debug, Clone)]
pub struct NativeCompiler {
    install_dir: PathBuf,
    compiler: OsString,
    resolver: Option<SearchPathResolver>,
}

impl NativeCompiler {
    /// Create a compiler installing into `install_dir`, using `$CC` or `cc`
    pub fn new(install_dir: impl Into<PathBuf>) -> Self {
        Self {
            install_dir: install_dir.into(),
            compiler: env::var_os("CC").unwrap_or_else(|| OsString::from("cc")),
            resolver: None,
        }
    }

    /// Use a specific compiler executable
    #[must_use]
    pub fn with_compiler(mut self, compiler: impl Into<OsString>) -> Self {
        self.compiler = compiler.into();
        self
    }

    /// Invalidate this resolver's module cache after each successful build
    #[must_use]
    pub fn with_resolver(mut self, resolver: SearchPathResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// File name of the installed artefact for an extension name
    pub fn artifact_name(name: &str) -> String {
        format!("{}{name}{}", env::consts::DLL_PREFIX, env::consts::DLL_SUFFIX)
    }

    /// Write `source` to `<install_dir>/<name>.c`, build it and install the
    /// shared library next to it. Returns the installed artefact path.
    pub fn compile(&self, name: &str, source: &str) -> Result<PathBuf> {
        Self::validate_name(name)?;

        let source_file = self.install_dir.join(format!("{name}.c"));
        fs::write(&source_file, source)?;

        // Build inside the install directory so the final rename stays on one filesystem
        let build_dir = tempfile::Builder::new()
            .prefix(".build-")
            .tempdir_in(&self.install_dir)?;
        let artifact = Self::artifact_name(name);
        let built = build_dir.path().join(&artifact);

        debug!(
            compiler = ?self.compiler,
            source = %source_file.display(),
            "building native extension"
        );

        let output = Command::new(&self.compiler)
            .args(["-shared", "-fPIC", "-O2", "-o"])
            .arg(&built)
            .arg(&source_file)
            .output()
            .map_err(|e| {
                Error::Native(format!(
                    "failed to run compiler {}: {e}",
                    self.compiler.to_string_lossy()
                ))
            })?;

        if !output.status.success() {
            return Err(Error::Native(format!(
                "compiler exited with {} for {}: {}",
                output.status,
                source_file.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let installed = self.install_dir.join(&artifact);
        fs::rename(&built, &installed)?;

        if let Some(resolver) = &self.resolver {
            resolver.invalidate();
        }

        info!(extension = name, artifact = %installed.display(), "installed native extension");
        Ok(installed)
    }

    fn validate_name(name: &str) -> Result<()> {
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_');

        valid.then_some(()).ok_or_else(|| {
            Error::Native(format!(
                "invalid extension name '{name}' (expected ASCII letters, digits and '_')"
            ))
        })
    }
}
