// Integration tests for the RAM interpreter

use rami::interpreter::constants::DEFAULT_SNAPSHOT_LIMIT;
use rami::interpreter::engine::{DebugFlag, Machine, RunOptions, Status};
use rami::interpreter::errors::{CompileError, RuntimeError};
use rami::interpreter::history::History;
use rami::memory::Memory;
use rami::parser::{compile_source, StdPreprocessor, Substitutions};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

fn compile(source: &str) -> Machine {
    let program = compile_source(
        source,
        &Substitutions::default(),
        &StdPreprocessor::new().with_comment("#"),
    )
    .expect("Compilation failed");
    Machine::with_seed(program, 7)
}

/// Run to completion, returning the machine and everything it printed
fn run(source: &str, options: &RunOptions) -> (Machine, Result<(), RuntimeError>, String) {
    let mut machine = compile(source);
    let mut out = Vec::new();
    let result = machine.run(Memory::new(), options, &mut out);
    (machine, result, String::from_utf8(out).expect("utf-8 output"))
}

#[test]
fn test_counting_loop() {
    let source = r#"
        A := 0
        L: A := A + 1
        if A <> 5 then goto L
        halt
    "#;

    let (machine, result, output) = run(source, &RunOptions::new());
    assert!(result.is_ok(), "Execution failed: {:?}", result);
    assert_eq!(machine.memory().read(-1).unwrap(), 5);
    // 6 assignments + 5 conditions + 4 taken gotos
    assert_eq!(machine.counter(), 15);
    assert_eq!(machine.status(), Status::Halted);
    assert_eq!(output, "Halt\n");
}

#[test]
fn test_loop_from_preset_memory() {
    let mut machine = compile("L: A := A + 1\nif A <> 5 then goto L\nhalt");
    let memory: Memory = [(-1, 0)].into_iter().collect();
    let mut out = Vec::new();
    machine
        .run(memory, &RunOptions::new(), &mut out)
        .expect("run halts");
    assert_eq!(machine.memory().read(-1).unwrap(), 5);
    assert_eq!(machine.counter(), 14);
}

#[test]
fn test_floor_division_and_remainder() {
    let source = "A := -7 / 2\nB := -7 % 2\nC := 7 / -2\nD := 7 % -2\nhalt";
    let (machine, result, _) = run(source, &RunOptions::new());
    result.expect("run halts");
    let memory = machine.memory();
    assert_eq!(memory.read(-1).unwrap(), -4);
    assert_eq!(memory.read(-2).unwrap(), 1);
    assert_eq!(memory.read(-3).unwrap(), -4);
    assert_eq!(memory.read(-4).unwrap(), -1);
}

#[test]
fn test_register_aliasing_and_indirection() {
    let source = r#"
        [-1] := 3
        B := A
        [5] := 7
        A := 5
        C := [A]
        [A] := 9
        halt
    "#;
    let (machine, result, _) = run(source, &RunOptions::new());
    result.expect("run halts");
    let memory = machine.memory();
    assert_eq!(memory.read(-2).unwrap(), 3);
    assert_eq!(memory.read(-3).unwrap(), 7);
    assert_eq!(memory.read(5).unwrap(), 9);
}

#[test]
fn test_init_and_print() {
    let source = r#"
        $init [0] 1:4        # 0, 1, 2 = 1, 2, 3
        $init [10] 9*3
        [20] := 5
        [22] := 6
        $print 0:3, 10:13, 20:23
        halt
    "#;
    let (machine, result, output) = run(source, &RunOptions::new());
    result.expect("run halts");
    assert_eq!(
        output,
        "0: 1, 1: 2, 2: 3\n10: 9, 11: 9, 12: 9\n20: 5, 22: 6\nHalt\n"
    );
    // only the two assignments count
    assert_eq!(machine.counter(), 2);
}

#[test]
fn test_unsubstituted_placeholder_is_rejected() {
    let result = compile_source(
        "A := {N}\nhalt",
        &Substitutions::default(),
        &StdPreprocessor::new(),
    );
    assert!(matches!(result, Err(CompileError::Unsubstituted { .. })));

    let substitutions: Substitutions = [("N".to_string(), "12".to_string())].into_iter().collect();
    let program = compile_source("A := {N}\nhalt", &substitutions, &StdPreprocessor::new())
        .expect("substituted program compiles");
    let mut machine = Machine::with_seed(program, 0);
    machine
        .run(Memory::new(), &RunOptions::new(), &mut Vec::new())
        .expect("run halts");
    assert_eq!(machine.memory().read(-1).unwrap(), 12);
}

#[test]
fn test_syntax_error_names_the_line() {
    let result = compile_source(
        "A := 1\n\nB := := 2\nhalt",
        &Substitutions::default(),
        &StdPreprocessor::new(),
    );
    match result {
        Err(err @ CompileError::Syntax { .. }) => {
            assert_eq!(err.line(), Some(3));
            assert!(err.to_string().contains("B := := 2"));
        }
        other => panic!("expected syntax error, got {:?}", other),
    }
}

#[test]
fn test_running_off_the_end() {
    let (machine, result, output) = run("A := 1\nB := 2", &RunOptions::new());
    assert!(matches!(
        result,
        Err(RuntimeError::InstructionPointerOutOfRange { ip: 2, len: 2 })
    ));
    assert_eq!(machine.status(), Status::OutOfRange);
    assert!(output.is_empty());
}

#[test]
fn test_uninitialized_read() {
    let (machine, result, _) = run("A := 1\nB := C + A\nhalt", &RunOptions::new());
    let err = result.unwrap_err();
    assert!(matches!(err, RuntimeError::UninitializedCell { address: -3 }));
    assert_eq!(err.to_string(), "Invalid (uninitialized) memory cell C");
    assert_eq!(machine.status(), Status::Faulted);
    assert_eq!(machine.ip(), 1);
}

#[test]
fn test_division_by_zero_faults() {
    let (_, result, _) = run("A := 0\nB := 1 / A\nhalt", &RunOptions::new());
    assert!(matches!(result, Err(RuntimeError::DivisionByZero { .. })));
}

#[test]
fn test_seeded_random_is_reproducible() {
    let source = "$init [0] @1:1000*8, @@1:1000*4\nhalt";
    let (first, result, _) = run(source, &RunOptions::new());
    result.expect("run halts");
    let (second, result, _) = run(source, &RunOptions::new());
    result.expect("run halts");
    assert_eq!(first.memory(), second.memory());

    let memory = first.memory();
    for address in 0..8 {
        let value = memory.read(address).unwrap();
        assert!((1..1000).contains(&value));
    }
    // a fixed random value is drawn once and repeated
    let fixed = memory.read(8).unwrap();
    for address in 9..12 {
        assert_eq!(memory.read(address).unwrap(), fixed);
    }
}

#[test]
fn test_oversized_init_faults_without_writing() {
    let (machine, result, _) = run("$init [0] 7*18446744073709551615\nhalt", &RunOptions::new());
    assert!(matches!(result, Err(RuntimeError::IntegerOverflow { .. })));
    assert_eq!(machine.status(), Status::Faulted);
    assert!(machine.memory().is_empty());

    let (machine, result, _) = run("$init [0] 0:9223372036854775807\nhalt", &RunOptions::new());
    assert!(matches!(result, Err(RuntimeError::AllocationFailed { .. })));
    assert!(machine.memory().is_empty());

    let (machine, result, _) = run(
        "$init [9223372036854775806] 1, 2, 3\nhalt",
        &RunOptions::new(),
    );
    assert!(matches!(result, Err(RuntimeError::IntegerOverflow { .. })));
    assert!(machine.memory().is_empty());
}

#[test]
fn test_if_counts_condition_and_body() {
    let source = r#"
        A := 1
        if A = 1 then B := 2
        if A = 0 then B := 3
        halt
    "#;
    let (machine, result, _) = run(source, &RunOptions::new());
    result.expect("run halts");
    assert_eq!(machine.memory().read(-2).unwrap(), 2);
    // A := 1, condition + body, condition
    assert_eq!(machine.counter(), 4);
}

#[test]
fn test_step_trace() {
    let source = r#"
        A := 0
        L: A := A + 1
        if A <> 2 then goto L
        $print -1
        if A = 2 then halt
    "#;
    let options = RunOptions::new().with_debug(DebugFlag::Step);
    let (_, result, output) = run(source, &options);
    result.expect("run halts");
    let expected = [
        "A := 0 (0)",
        "L: A := A + 1 (1)",
        "if A <> 2 then goto L (true)",
        "L: A := A + 1 (2)",
        "if A <> 2 then goto L (false)",
        "A: 2",
        "$print -1",
        "Halt",
    ];
    assert_eq!(output.lines().collect::<Vec<_>>(), expected);
}

#[test]
fn test_cancelled_run_is_interrupted() {
    let cancel = Arc::new(AtomicBool::new(true));
    let options = RunOptions::new().with_cancel(cancel);
    let (_, result, _) = run("L: goto L", &options);
    assert!(matches!(result, Err(RuntimeError::Interrupted { steps: 0 })));
}

#[test]
fn test_history_replays_run() {
    let machine = compile("A := 1\n$print -1\nB := A * 3\nhalt");
    let mut history = History::record(machine, Memory::new(), DEFAULT_SNAPSHOT_LIMIT);
    assert!(history.fault().is_none());
    assert_eq!(history.final_status(), Status::Halted);
    assert_eq!(history.total_snapshots(), 5);
    assert_eq!(history.output(), ["A: 1".to_string(), "Halt".to_string()]);

    history.rewind_to_start().unwrap();
    assert!(history.machine().memory().is_empty());
    assert!(history.output().is_empty());

    history.step_forward().unwrap();
    history.step_forward().unwrap();
    assert_eq!(history.output(), ["A: 1".to_string()]);
    assert_eq!(history.machine().counter(), 1);

    history.step_backward().unwrap();
    assert!(history.output().is_empty());
    assert_eq!(history.machine().memory().read(-1).unwrap(), 1);
}

#[test]
fn test_history_keeps_fault() {
    let machine = compile("A := B\nhalt");
    let history = History::record(machine, Memory::new(), DEFAULT_SNAPSHOT_LIMIT);
    assert!(matches!(
        history.fault(),
        Some(RuntimeError::UninitializedCell { address: -2 })
    ));
    assert_eq!(history.final_status(), Status::Faulted);
    assert_eq!(history.machine().status(), Status::Faulted);
}
