//! RAM execution engine
//!
//! This module provides the core execution logic:
//! - [`engine`]: The [`Machine`](engine::Machine) with its fetch-evaluate-advance loop
//! - [`statements`]: Evaluation of each instruction kind
//! - [`ops`]: Checked word arithmetic
//! - [`generators`]: Ranges and random values for `$init` and `$print`
//! - [`history`]: Recorded runs for stepping backward and forward
//! - [`errors`]: Compile and runtime error types
//!
//! # Execution Model
//!
//! The machine fetches the instruction at the instruction pointer, evaluates
//! it against memory, and then either advances to the next instruction or
//! jumps to a label's index. A run ends at `halt` or at the first fault.

pub mod constants;
pub mod engine;
pub mod errors;
pub mod generators;
pub mod history;
pub mod ops;
pub mod statements;
