//! Module search path
//!
//! Resolves `import` statements inside benchmark scripts against an explicit,
//! ordered list of directories. The list is handed to the resolver by the
//! caller; nothing process-wide is consulted or modified.

use crate::package_finder::SCRIPT_EXTENSION;
use relative_path::RelativePath;
use rhai::{Engine, EvalAltResult, Module, ModuleResolver, Position, Scope};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::{debug, trace};

/// Script module resolver over an ordered directory list
///
/// Clones share the module cache, so a clone handed to a helper can
/// invalidate what the engine's resolver has cached.
#[derive(Debug, Clone, Default)]
pub struct SearchPathResolver {
    directories: Rc<Vec<PathBuf>>,
    cache: Rc<RefCell<BTreeMap<PathBuf, Rc<Module>>>>,
}

impl SearchPathResolver {
    /// Create a resolver searching the given directories in order
    pub fn new<I, P>(directories: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            directories: Rc::new(directories.into_iter().map(Into::into).collect()),
            cache: Rc::default(),
        }
    }

    /// Find the file an import path refers to
    ///
    /// `import "util/strings"` looks for `util/strings.rhai` in each directory.
    pub fn find(&self, import_path: &str) -> Option<PathBuf> {
        let mut relative = RelativePath::new(import_path).normalize();
        if relative.extension() != Some(SCRIPT_EXTENSION) {
            relative.set_extension(SCRIPT_EXTENSION);
        }

        self.directories
            .iter()
            .map(|dir| relative.to_logical_path(dir))
            .find(|candidate| candidate.is_file())
    }

    /// Drop every cached module so the next import re-reads the filesystem
    pub fn invalidate(&self) {
        let mut cache = self.cache.borrow_mut();
        debug!(entries = cache.len(), "invalidating module cache");
        cache.clear();
    }

    /// Number of modules currently cached
    pub fn cached(&self) -> usize {
        self.cache.borrow().len()
    }

    fn load(&self, engine: &Engine, file: &Path) -> Result<Rc<Module>, Box<EvalAltResult>> {
        if let Some(module) = self.cache.borrow().get(file) {
            trace!(file = %file.display(), "module cache hit");
            return Ok(Rc::clone(module));
        }

        let ast = engine.compile_file(file.to_path_buf())?;
        let module: Rc<Module> = Module::eval_ast_as_new(Scope::new(), &ast, engine)?.into();

        self.cache
            .borrow_mut()
            .insert(file.to_path_buf(), Rc::clone(&module));
        Ok(module)
    }
}

impl ModuleResolver for SearchPathResolver {
    fn resolve(
        &self,
        engine: &Engine,
        _source: Option<&str>,
        path: &str,
        pos: Position,
    ) -> Result<Rc<Module>, Box<EvalAltResult>> {
        let file = self
            .find(path)
            .ok_or_else(|| Box::new(EvalAltResult::ErrorModuleNotFound(path.to_owned(), pos)))?;

        debug!(import = path, file = %file.display(), "resolved module import");

        self.load(engine, &file).map_err(|err| {
            Box::new(EvalAltResult::ErrorInModule(path.to_owned(), err, pos))
        })
    }
}
