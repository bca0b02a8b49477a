//! Script fixtures and output helpers shared by the integration tests

/// Unit defining every entry point; each call prints a marker line
#[allow(dead_code)]
pub const TRACED_UNIT: &str = r#"
fn process_args(n) { print("process_args called"); [parse_int(n)] }
fn setup(n) { print("setup called"); }
fn benchmark(n) {
    print("benchmark called");
    let s = 0;
    for i in 0..n { s += i; }
    s
}
fn teardown() { print("teardown called"); }
"#;

/// Unit relying on default argument processing
#[allow(dead_code)]
pub const SUM_UNIT: &str = r#"
fn benchmark(n, m) {
    print("benchmark called with " + n + " and " + m);
    n + m
}
"#;

/// Unit without a benchmark entry point
#[allow(dead_code)]
pub const SETUP_ONLY_UNIT: &str = r#"
fn setup() { print("setup called"); }
fn teardown() { print("teardown called"); }
"#;

/// Unit whose benchmark entry point fails
#[allow(dead_code)]
pub const FAILING_UNIT: &str = r#"
fn benchmark() { throw "benchmark exploded"; }
fn teardown() { print("teardown called"); }
"#;

/// Count stdout lines equal to `line` after trimming
#[allow(dead_code)]
pub fn count_lines(output: &str, line: &str) -> usize {
    output.lines().filter(|l| l.trim() == line).count()
}

/// Assert that every fragment occurs in `output`, in the given order
#[allow(dead_code)]
pub fn assert_in_order(output: &str, fragments: &[&str]) {
    let mut rest = output;
    for fragment in fragments {
        match rest.find(fragment) {
            Some(position) => rest = &rest[position + fragment.len()..],
            None => panic!("'{fragment}' missing or out of order in:\n{output}"),
        }
    }
}
