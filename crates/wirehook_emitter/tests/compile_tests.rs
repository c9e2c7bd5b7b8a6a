//! Compile-time tests for the `#[hooks]` and `#[fires]` macros.
//!
//! Uses `trybuild` to verify that valid macro usage compiles and runs.

#[test]
fn compile_pass() {
    let t = trybuild::TestCases::new();
    t.pass("tests/compile_pass/*.rs");
}
