// Shared helpers for integration tests

#![allow(dead_code)]

use microc::interpreter::{Interpreter, QueueInput, RunConfig, RuntimeError};
use microc::memory::value::Value;
use std::path::PathBuf;
use std::sync::Arc;

pub fn demo_source(name: &str) -> String {
    let path: PathBuf = [env!("CARGO_MANIFEST_DIR"), "demos", name].iter().collect();
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("reading {}: {}", path.display(), e))
}

/// Compile and run `source`, returning the output and the run result
pub fn run_with_config(
    source: &str,
    input: &str,
    config: RunConfig,
) -> (Vec<Value>, Result<(), RuntimeError>) {
    let compiled = microc::compile(source).expect("program should compile");
    let mut interpreter =
        Interpreter::new(Arc::new(compiled), Box::new(QueueInput::from_text(input)), config);
    let result = interpreter.run();
    (interpreter.output().to_vec(), result)
}

pub fn run(source: &str, input: &str) -> (Vec<Value>, Result<(), RuntimeError>) {
    run_with_config(source, input, RunConfig::default())
}

/// Run a program that must finish cleanly and return its output as ints
pub fn run_ints(source: &str, input: &str) -> Vec<i32> {
    let (output, result) = run(source, input);
    assert!(result.is_ok(), "Execution failed: {:?}", result);
    output
        .iter()
        .map(|v| v.as_int().unwrap_or_else(|| panic!("not an int: {}", v)))
        .collect()
}
