//! Module resolver
//!
//! Turns a benchmark file path into a [`BenchmarkHandle`]. Two layouts are
//! supported:
//!
//! - **package-qualified**: the file sits in directories carrying a
//!   [`PACKAGE_MARKER`]. The directory above the outermost package joins the
//!   search path and the unit is loaded by its dotted name, executing each
//!   package's marker script on the way down.
//! - **standalone**: any other file. It is compiled with its path as the
//!   diagnostic source, its top-level statements run once, and the
//!   `ccompile` helper is available to it.
//!
//! In both cases the entry points are the script functions named
//! `process_args`, `setup`, `benchmark` and `teardown`.

use crate::error::{Error, Result, ResultExt};
use crate::handle::{BenchmarkHandle, Capabilities, EntryPoint, Value};
use crate::native::{NativeCompiler, HELPER_NAME};
use crate::package_finder::{PackageFinder, UnitLocation, PACKAGE_MARKER};
use crate::search_path::SearchPathResolver;
use rhai::{CallFnOptions, Engine, EvalAltResult, Scope, AST};
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::fs;
use std::iter;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::{debug, info};

/// A compiled and executed script unit
struct ScriptUnit {
    engine: Engine,
    ast: AST,
    scope: RefCell<Scope<'static>>,
}

impl ScriptUnit {
    /// Script function names defined by the unit
    fn function_names(&self) -> BTreeSet<String> {
        self.ast
            .iter_functions()
            .map(|f| f.name.to_string())
            .collect()
    }

    fn call(&self, entry_point: EntryPoint, args: &[Value]) -> Result<Value> {
        let mut scope = self.scope.borrow_mut();
        let options = CallFnOptions::new().eval_ast(false).rewind_scope(true);

        self.engine
            .call_fn_with_options::<Value>(
                options,
                &mut scope,
                &self.ast,
                entry_point.name(),
                args.to_vec(),
            )
            .map_err(|err| Error::entry_point_error(entry_point, err))
    }

    /// Capability set with one callable per entry point the unit defines
    fn into_capabilities(self) -> Capabilities {
        let defined = self.function_names();
        let unit = Rc::new(self);

        EntryPoint::ALL
            .into_iter()
            .filter(|ep| defined.contains(ep.name()))
            .fold(Capabilities::new(), |caps, ep| {
                let unit = Rc::clone(&unit);
                caps.with(ep, Box::new(move |args: &[Value]| unit.call(ep, args)))
            })
    }
}

/// Resolves benchmark files into handles
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    search_paths: Vec<PathBuf>,
}

impl Resolver {
    /// Create a resolver with extra module search paths
    pub fn new<I, P>(search_paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            search_paths: search_paths.into_iter().map(Into::into).collect(),
        }
    }

    /// Load the benchmark unit at `path`
    pub fn resolve(&self, path: impl AsRef<Path>) -> Result<BenchmarkHandle> {
        let location = PackageFinder::locate(path)?;

        match &location {
            UnitLocation::Package { root, .. } => {
                self.load_qualified(root, &location.qualified_name())
            }
            UnitLocation::Standalone { name, path } => self.load_standalone(name, path),
        }
    }

    /// Load a package-qualified unit by dotted name relative to `root`
    ///
    /// `a.b.bench` runs `root/a/mod.rhai`, then `root/a/b/mod.rhai`, then
    /// loads `root/a/b/bench.rhai` as the unit.
    pub fn load_qualified(&self, root: impl AsRef<Path>, qualified_name: &str) -> Result<BenchmarkHandle> {
        let root = root.as_ref();
        let segments: Vec<&str> = qualified_name.split('.').collect();

        if segments.len() < 2 || segments.iter().any(|s| s.is_empty()) {
            return Err(Error::load_error(
                root,
                format!("'{qualified_name}' is not a package-qualified name"),
            ));
        }

        let path = PackageFinder::module_path(qualified_name).to_logical_path(root);
        let resolver = SearchPathResolver::new(
            iter::once(root.to_path_buf()).chain(self.search_paths.iter().cloned()),
        );
        let engine = Self::engine(resolver);

        let packages = &segments[..segments.len() - 1];
        for depth in 1..=packages.len() {
            let package_dir = packages[..depth]
                .iter()
                .fold(root.to_path_buf(), |dir, segment| dir.join(segment));
            let marker = package_dir.join(PACKAGE_MARKER);

            if !marker.is_file() {
                return Err(Error::load_error(
                    &path,
                    format!("package '{}' has no {PACKAGE_MARKER}", packages[..depth].join(".")),
                ));
            }

            debug!(package = %packages[..depth].join("."), "initializing package");
            let ast = Self::compile(&engine, &marker)?;
            engine
                .run_ast(&ast)
                .map_err(|e| Error::load_error(&marker, e.to_string()))?;
        }

        let handle = Self::load_unit(engine, qualified_name, &path)?;
        info!(
            unit = qualified_name,
            root = %root.display(),
            entry_points = ?handle.capabilities(),
            "loaded package-qualified benchmark"
        );
        Ok(handle)
    }

    /// Load a standalone unit
    fn load_standalone(&self, name: &str, path: &Path) -> Result<BenchmarkHandle> {
        let directory = path
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| Error::load_error(path, "benchmark file has no parent directory"))?;

        let resolver = SearchPathResolver::new(
            iter::once(directory.clone()).chain(self.search_paths.iter().cloned()),
        );
        let mut engine = Self::engine(resolver.clone());

        let compiler = NativeCompiler::new(&directory).with_resolver(resolver);
        engine.register_fn(
            HELPER_NAME,
            move |name: &str, source: &str| -> std::result::Result<String, Box<EvalAltResult>> {
                compiler
                    .compile(name, source)
                    .map(|artifact| artifact.display().to_string())
                    .map_err(|e| e.to_string().into())
            },
        );

        let handle = Self::load_unit(engine, name, path)?;
        info!(
            unit = name,
            file = %path.display(),
            entry_points = ?handle.capabilities(),
            "loaded standalone benchmark"
        );
        Ok(handle)
    }

    /// Compile the benchmark file, run its top-level statements once and
    /// extract the entry points
    fn load_unit(engine: Engine, name: &str, path: &Path) -> Result<BenchmarkHandle> {
        let ast = Self::compile(&engine, path)?;

        let mut scope = Scope::new();
        engine
            .run_ast_with_scope(&mut scope, &ast)
            .map_err(|e| Error::load_error(path, e.to_string()))
            .with_context(|| "executing top-level statements".to_owned())?;

        let unit = ScriptUnit {
            engine,
            ast,
            scope: RefCell::new(scope),
        };

        Ok(BenchmarkHandle::new(name, path, unit.into_capabilities()))
    }

    /// Read and compile a script with its path as the diagnostic source name
    fn compile(engine: &Engine, path: &Path) -> Result<AST> {
        let source = fs::read_to_string(path)
            .map_err(|e| Error::load_error(path, format!("cannot read file: {e}")))?;

        let mut ast = engine
            .compile(&source)
            .map_err(|e| Error::load_error(path, e.to_string()))
            .with_context(|| "compiling".to_owned())?;
        ast.set_source(path.display().to_string());
        Ok(ast)
    }

    fn engine(resolver: SearchPathResolver) -> Engine {
        let mut engine = Engine::new();
        engine.set_module_resolver(resolver);
        engine
    }
}
