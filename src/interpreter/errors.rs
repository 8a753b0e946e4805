//! Error types for the RAM interpreter
//!
//! This module defines [`CompileError`], raised while turning source lines into
//! a [`Program`](crate::parser::ast::Program), and [`RuntimeError`], which
//! covers every fault that can occur during execution.
//!
//! All errors are fatal: compilation aborts without a partial program and
//! execution stops at the faulting instruction. `halt` is not an error; it is
//! reported through the machine's [`Status`](crate::interpreter::engine::Status).

use crate::memory::{format_address, Address};
use crate::parser::parse::ParseError;
use thiserror::Error;

fn cell_name(address: &Address) -> String {
    format_address(*address)
}

/// Errors raised while compiling source text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// No grammar alternative matched the whole line
    #[error("Compile error at line {line}: `{text}`: {source}")]
    Syntax {
        line: usize,
        text: String,
        #[source]
        source: ParseError,
    },

    /// A `{name}` placeholder survived substitution
    #[error("Unsubstituted text in `{text}`")]
    Unsubstituted { text: String },

    /// A label was defined twice
    #[error("Compile error at line {line}: label {label} already defined at instruction {first}")]
    DuplicateLabel {
        label: String,
        line: usize,
        first: usize,
    },
}

impl CompileError {
    /// Source line (1-based) the error refers to, if known
    pub fn line(&self) -> Option<usize> {
        match self {
            CompileError::Syntax { line, .. } => Some(*line),
            CompileError::DuplicateLabel { line, .. } => Some(*line),
            CompileError::Unsubstituted { .. } => None,
        }
    }
}

/// Runtime errors that can occur during execution
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Read of a cell that was never written
    #[error("Invalid (uninitialized) memory cell {}", cell_name(.address))]
    UninitializedCell { address: Address },

    /// `goto` to a label that is not defined
    #[error("Unknown label {label}")]
    UnknownLabel { label: String },

    /// Execution ran past the last instruction without `halt`
    #[error("Instruction pointer out of code range ({ip} >= {len})")]
    InstructionPointerOutOfRange { ip: usize, len: usize },

    /// `min_address`/`max_address` on empty memory
    #[error("Memory is empty")]
    EmptyMemory,

    /// Division or remainder by zero
    #[error("Division by zero in {operation}")]
    DivisionByZero { operation: String },

    /// Result does not fit in a 64-bit signed word
    #[error("Integer overflow in {operation}")]
    IntegerOverflow { operation: String },

    /// Shift by a negative amount
    #[error("Negative shift count in {operation}")]
    InvalidShift { operation: String },

    /// Memory could not grow to hold the cells of an `$init`
    #[error("Cannot allocate {cells} memory cells")]
    AllocationFailed { cells: u128 },

    /// Random draw from a range with no values
    #[error("Empty range {range} for random value")]
    EmptyRange { range: String },

    /// Writing to the output sink failed
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),

    /// Cancellation flag was raised between steps
    #[error("Execution interrupted after {steps} steps")]
    Interrupted { steps: u64 },

    /// Snapshot history limit exceeded
    #[error("Snapshot memory limit exceeded: {current} bytes used, limit is {limit}")]
    SnapshotLimitExceeded { current: usize, limit: usize },

    /// History navigation failed
    #[error("History operation failed: {message}")]
    HistoryOperationFailed { message: String },
}

impl RuntimeError {
    /// Address involved in the fault, if any
    pub fn address(&self) -> Option<Address> {
        match self {
            RuntimeError::UninitializedCell { address } => Some(*address),
            _ => None,
        }
    }

    /// Whether this fault is the instruction pointer leaving the program
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, RuntimeError::InstructionPointerOutOfRange { .. })
    }
}
