//! Benchmark handle module
//!
//! A loaded benchmark unit is a name plus a capability set: four optional
//! entry points. Absence of an entry point is a normal, checked state.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Script value passed to and returned from entry points
pub type Value = rhai::Dynamic;

/// An entry point callable. Receives the argument list spread as positional
/// parameters.
pub type Callable = Box<dyn FnMut(&[Value]) -> Result<Value>>;

/// The four recognized lifecycle entry points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryPoint {
    /// Preprocesses the raw argument strings
    ProcessArgs,
    /// Called once with the processed arguments before benchmarking
    Setup,
    /// Called once per warmup and once per measured iteration
    Benchmark,
    /// Called once after all iterations
    Teardown,
}

impl EntryPoint {
    /// All entry points in lifecycle order
    pub const ALL: [EntryPoint; 4] = [
        EntryPoint::ProcessArgs,
        EntryPoint::Setup,
        EntryPoint::Benchmark,
        EntryPoint::Teardown,
    ];

    /// Function name a benchmark unit defines for this entry point
    pub const fn name(self) -> &'static str {
        match self {
            EntryPoint::ProcessArgs => "process_args",
            EntryPoint::Setup => "setup",
            EntryPoint::Benchmark => "benchmark",
            EntryPoint::Teardown => "teardown",
        }
    }
}

impl fmt::Display for EntryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Optional entry point callables of a benchmark unit
#[derive(Default)]
pub struct Capabilities {
    pub process_args: Option<Callable>,
    pub setup: Option<Callable>,
    pub benchmark: Option<Callable>,
    pub teardown: Option<Callable>,
}

impl Capabilities {
    /// Create an empty capability set
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the callable for an entry point
    #[must_use]
    pub fn with(mut self, entry_point: EntryPoint, callable: Callable) -> Self {
        *self.slot_mut(entry_point) = Some(callable);
        self
    }

    /// Whether the unit defines the entry point
    pub fn has(&self, entry_point: EntryPoint) -> bool {
        match entry_point {
            EntryPoint::ProcessArgs => self.process_args.is_some(),
            EntryPoint::Setup => self.setup.is_some(),
            EntryPoint::Benchmark => self.benchmark.is_some(),
            EntryPoint::Teardown => self.teardown.is_some(),
        }
    }

    /// Mutable access to the callable of an entry point, if defined
    pub fn get_mut(&mut self, entry_point: EntryPoint) -> Option<&mut Callable> {
        self.slot_mut(entry_point).as_mut()
    }

    /// Call an entry point if it is defined; `None` when absent
    pub fn call(&mut self, entry_point: EntryPoint, args: &[Value]) -> Option<Result<Value>> {
        self.get_mut(entry_point).map(|callable| callable(args))
    }

    /// Names of the defined entry points in lifecycle order
    pub fn defined(&self) -> Vec<EntryPoint> {
        EntryPoint::ALL
            .into_iter()
            .filter(|ep| self.has(*ep))
            .collect()
    }

    fn slot_mut(&mut self, entry_point: EntryPoint) -> &mut Option<Callable> {
        match entry_point {
            EntryPoint::ProcessArgs => &mut self.process_args,
            EntryPoint::Setup => &mut self.setup,
            EntryPoint::Benchmark => &mut self.benchmark,
            EntryPoint::Teardown => &mut self.teardown,
        }
    }
}

impl fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.defined()).finish()
    }
}

/// A loaded benchmark unit
#[derive(Debug)]
pub struct BenchmarkHandle {
    name: String,
    source: PathBuf,
    capabilities: Capabilities,
}

impl BenchmarkHandle {
    /// Create a handle from its parts
    pub fn new(name: impl Into<String>, source: impl Into<PathBuf>, capabilities: Capabilities) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            capabilities,
        }
    }

    /// Unit name: the dotted package name or the file's base name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path of the benchmark file the unit was loaded from
    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    pub fn capabilities_mut(&mut self) -> &mut Capabilities {
        &mut self.capabilities
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    /// **What is tested:** Entry point names and their display form
    /// **Why it is tested:** Script functions are matched against these exact names
    /// **Test conditions:** Every entry point in lifecycle order
    /// **Expectations:** Names match the script function names, Display prints the same name
    #[test]
    fn test_entry_point_names() {
        assert_eq!(
            EntryPoint::ALL.map(EntryPoint::name),
            ["process_args", "setup", "benchmark", "teardown"]
        );
        for ep in EntryPoint::ALL {
            assert_eq!(ep.to_string(), ep.name());
        }
    }

    /// **What is tested:** Calling present and absent capabilities
    /// **Why it is tested:** Absence must be a checked state rather than a failure
    /// **Test conditions:** Capability set with only a counting benchmark callable
    /// **Expectations:** Benchmark is called with the given arguments, other entry points return None
    #[test]
    fn test_capabilities_call() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let mut caps = Capabilities::new().with(
            EntryPoint::Benchmark,
            Box::new(move |args: &[Value]| {
                counter.set(counter.get() + 1);
                Ok(Value::from(args.len() as i64))
            }),
        );

        assert!(caps.has(EntryPoint::Benchmark));
        assert!(!caps.has(EntryPoint::Setup));
        assert_eq!(caps.defined(), vec![EntryPoint::Benchmark]);

        let result = caps
            .call(EntryPoint::Benchmark, &[Value::from(1_i64), Value::from(2_i64)])
            .expect("benchmark is defined")
            .expect("benchmark succeeds");
        assert_eq!(result.as_int(), Ok(2));
        assert_eq!(calls.get(), 1);

        assert!(caps.call(EntryPoint::Setup, &[]).is_none());
        assert!(caps.call(EntryPoint::Teardown, &[]).is_none());
    }

    /// **What is tested:** Handle accessors
    /// **Why it is tested:** The reporter prints the handle name in every banner line
    /// **Test conditions:** Builds a handle with an empty capability set
    /// **Expectations:** Name and source are returned as given
    #[test]
    fn test_handle_accessors() {
        let handle = BenchmarkHandle::new("pkg.bench", "/tmp/pkg/bench.rhai", Capabilities::new());
        assert_eq!(handle.name(), "pkg.bench");
        assert_eq!(handle.source(), Path::new("/tmp/pkg/bench.rhai"));
        assert!(handle.capabilities().defined().is_empty());
    }
}
