// Execution engine for the Random Access Machine

use crate::interpreter::constants::HALT_MESSAGE;
use crate::interpreter::errors::RuntimeError;
use crate::interpreter::statements::{Control, EvalContext};
use crate::memory::{Address, Memory};
use crate::parser::ast::Program;
use log::{debug, trace, warn};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::fmt;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Lifecycle of a machine
///
/// `Ready` -> `Running` -> one of `Halted`, `Faulted`, `OutOfRange`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ready,
    Running,
    Halted,
    Faulted,
    OutOfRange,
}

impl Status {
    pub fn is_finished(self) -> bool {
        matches!(self, Status::Halted | Status::Faulted | Status::OutOfRange)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Status::Ready => "ready",
            Status::Running => "running",
            Status::Halted => "halted",
            Status::Faulted => "faulted",
            Status::OutOfRange => "out of range",
        };
        write!(f, "{}", text)
    }
}

/// Debug options for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum DebugFlag {
    /// Print every executed instruction with its value
    Step,
}

/// Per-run configuration
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub debug: Vec<DebugFlag>,
    /// Checked between steps; when set the run stops with `Interrupted`
    pub cancel: Option<Arc<AtomicBool>>,
}

impl RunOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_debug(mut self, flag: DebugFlag) -> Self {
        if !self.debug.contains(&flag) {
            self.debug.push(flag);
        }
        self
    }

    pub fn with_cancel(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn is_enabled(&self, flag: DebugFlag) -> bool {
        self.debug.contains(&flag)
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

/// Mutable part of a run: instruction pointer, step counter and memory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionState {
    pub ip: usize,
    pub counter: u64,
    pub memory: Memory,
    /// Cell written by the most recent instruction
    pub last_written: Option<Address>,
}

impl ExecutionState {
    pub fn new(memory: Memory) -> Self {
        ExecutionState {
            memory,
            ..Default::default()
        }
    }
}

/// A compiled program together with the state of its execution
pub struct Machine {
    program: Program,
    state: ExecutionState,
    status: Status,
    rng: Box<dyn RngCore>,
}

impl Machine {
    /// Create a machine whose random source is seeded from the OS
    pub fn new(program: Program) -> Self {
        Self::with_rng(program, Box::new(StdRng::from_entropy()))
    }

    /// Create a machine with a reproducible random source
    pub fn with_seed(program: Program, seed: u64) -> Self {
        Self::with_rng(program, Box::new(StdRng::seed_from_u64(seed)))
    }

    pub fn with_rng(program: Program, rng: Box<dyn RngCore>) -> Self {
        Machine {
            program,
            state: ExecutionState::default(),
            status: Status::Ready,
            rng,
        }
    }

    /// Discard any previous run and start over with `memory`
    pub fn reset(&mut self, memory: Memory) {
        self.state = ExecutionState::new(memory);
        self.status = Status::Ready;
    }

    /// Run from the first instruction until `halt` or a fault
    pub fn run(
        &mut self,
        memory: Memory,
        options: &RunOptions,
        out: &mut dyn Write,
    ) -> Result<(), RuntimeError> {
        self.reset(memory);
        debug!(
            "starting run: {} instructions, {} preset cells",
            self.program.len(),
            self.state.memory.len()
        );

        loop {
            if options.is_cancelled() {
                self.status = Status::Faulted;
                warn!("run interrupted after {} steps", self.state.counter);
                return Err(RuntimeError::Interrupted {
                    steps: self.state.counter,
                });
            }
            if self.step(out, options)? == Status::Halted {
                return Ok(());
            }
        }
    }

    /// Execute exactly one instruction and return the resulting status
    ///
    /// Stepping a finished machine does nothing.
    pub fn step(&mut self, out: &mut dyn Write, options: &RunOptions) -> Result<Status, RuntimeError> {
        if self.status.is_finished() {
            return Ok(self.status);
        }
        self.status = Status::Running;

        match self.execute_current(out, options) {
            Ok(status) => Ok(status),
            Err(err) => {
                self.status = if err.is_out_of_range() {
                    Status::OutOfRange
                } else {
                    Status::Faulted
                };
                warn!(
                    "run stopped at instruction {} after {} steps: {}",
                    self.state.ip, self.state.counter, err
                );
                Err(err)
            }
        }
    }

    fn execute_current(
        &mut self,
        out: &mut dyn Write,
        options: &RunOptions,
    ) -> Result<Status, RuntimeError> {
        let ip = self.state.ip;
        let instruction = self
            .program
            .get(ip)
            .ok_or(RuntimeError::InstructionPointerOutOfRange {
                ip,
                len: self.program.len(),
            })?;
        trace!("[{}] {}", ip, instruction);

        self.state.last_written = None;
        let mut ctx = EvalContext {
            labels: &self.program.labels,
            state: &mut self.state,
            rng: self.rng.as_mut(),
            out: &mut *out,
        };
        let outcome = instruction.eval(&mut ctx)?;

        if outcome.control == Control::Halt {
            writeln!(out, "{}", HALT_MESSAGE)?;
            self.status = Status::Halted;
            debug!("halted after {} steps", self.state.counter);
            return Ok(self.status);
        }

        if options.is_enabled(DebugFlag::Step) {
            let line = instruction.trace_line(self.program.label_for(ip), outcome.value);
            writeln!(out, "{}", line)?;
        }

        self.state.ip = match outcome.control {
            Control::Jump(target) => target,
            _ => ip + 1,
        };
        Ok(self.status)
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn state(&self) -> &ExecutionState {
        &self.state
    }

    /// Restore a previously captured state (used by history navigation)
    pub(crate) fn restore(&mut self, state: ExecutionState, status: Status) {
        self.state = state;
        self.status = status;
    }

    pub fn memory(&self) -> &Memory {
        &self.state.memory
    }

    /// Number of steps executed so far
    pub fn counter(&self) -> u64 {
        self.state.counter
    }

    pub fn ip(&self) -> usize {
        self.state.ip
    }

    pub fn status(&self) -> Status {
        self.status
    }
}
