// Runs every program in demos/ and checks its output

mod common;

use common::{demo_source, run, run_ints};
use microc::interpreter::RuntimeError;
use microc::memory::store::BoundsReason;
use microc::memory::value::Value;
use microc::semantic::NameErrorKind;
use microc::{Error, ErrorKind};

#[test]
fn test_basic_pointers_faults_after_output() {
    let (output, result) = run(&demo_source("basic_pointers.c"), "7");
    assert_eq!(output, vec![Value::Int(7), Value::Int(-42)]);
    match result {
        Err(RuntimeError::BoundsFault { reason, location }) => {
            assert_eq!(reason, BoundsReason::Null);
            assert_eq!(location.line, 15);
        }
        other => panic!("expected a null bounds fault, got {:?}", other),
    }
}

#[test]
fn test_factorial() {
    assert_eq!(run_ints(&demo_source("factorial.c"), ""), vec![6]);
}

#[test]
fn test_fibonacci() {
    assert_eq!(run_ints(&demo_source("fibonacci.c"), ""), vec![610]);
}

#[test]
fn test_argument_passing() {
    assert_eq!(
        run_ints(&demo_source("arguments.c"), ""),
        vec![42, 142, 242, 342, 442, 1210, 1210]
    );
}

#[test]
fn test_array_argument() {
    assert_eq!(run_ints(&demo_source("array_max.c"), ""), vec![13]);
}

#[test]
fn test_arrays_and_pointers() {
    assert_eq!(
        run_ints(&demo_source("arrays_and_pointers.c"), ""),
        vec![42, 42, 42, 33, 3, 33, 42, 0, 42, 42, 33, 3]
    );
}

#[test]
fn test_mutual_recursion() {
    assert_eq!(
        run_ints(&demo_source("mutual_recursion.c"), ""),
        vec![9, 7, 5, 3, 1, 42]
    );
}

#[test]
fn test_arity_mismatch_is_rejected() {
    let err = microc::compile(&demo_source("arity_mismatch.c")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Name);
    match err {
        Error::Name(name_error) => {
            assert_eq!(
                name_error.kind,
                NameErrorKind::ArityMismatch {
                    function: "goo".to_string(),
                    expected: 2,
                    found: 1,
                }
            );
            assert_eq!(name_error.location.line, 9);
        }
        other => panic!("expected a name error, got {:?}", other),
    }
}

#[test]
fn test_assignments() {
    assert_eq!(
        run_ints(&demo_source("assignments.c"), ""),
        vec![3, 3, 3, 16, 4, 12, 4]
    );
}

#[test]
fn test_out_parameter() {
    assert_eq!(run_ints(&demo_source("out_parameter.c"), ""), vec![25, 390625]);
}

#[test]
fn test_every_demo_round_trips_through_the_printer() {
    let names = [
        "basic_pointers.c",
        "factorial.c",
        "fibonacci.c",
        "arguments.c",
        "array_max.c",
        "arrays_and_pointers.c",
        "mutual_recursion.c",
        "arity_mismatch.c",
        "assignments.c",
        "out_parameter.c",
    ];
    for name in names {
        let program = microc::parse(&demo_source(name)).expect("demo should parse");
        let printed = microc::parser::printer::print_program(&program);
        let reparsed = microc::parse(&printed)
            .unwrap_or_else(|e| panic!("{}: printed form does not parse: {}\n{}", name, e, printed));
        assert_eq!(program, reparsed, "{} changed after printing", name);
    }
}
