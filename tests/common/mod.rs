//! Test framework for bench-harness
//!
//! Builds throwaway benchmark trees on disk and runs the binary against them.

pub mod framework;
pub mod test_utilities;

#[allow(unused_imports)]
pub use framework::*;
