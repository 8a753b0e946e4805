//! # Introduction
//!
//! RAMI compiles and executes programs for a Random Access Machine: a toy
//! assembly language with 26 registers, unbounded integer memory, one level
//! of indirect addressing, conditional jumps and `halt`. A run can also be
//! recorded as a snapshot per instruction and browsed forward and backward
//! through a terminal UI built with [ratatui](https://docs.rs/ratatui).
//!
//! ## Execution pipeline
//!
//! ```text
//! Source → Preprocessor → Lexer → Parser → Program → Machine → Output
//!                                                        └→ Snapshots → TUI
//! ```
//!
//! 1. [`parser`]: substitutes placeholders, strips comments, and parses each
//!    line into an [`parser::ast::Instruction`].
//! 2. [`interpreter`]: the [`interpreter::engine::Machine`] walks the
//!    program, evaluating instructions against memory.
//! 3. [`memory`]: sparse signed-integer memory with registers `A..Z` at
//!    addresses `-1..-26`.
//! 4. [`snapshot`]: snapshot store with a configurable memory limit and a
//!    [`snapshot::MockTerminal`] that records output.
//! 5. [`ui`]: ratatui-based TUI; not part of the stable library API.
//!
//! ## Language
//!
//! ```text
//! $init [0] 1:11            # cells 0..10 = 1..10
//! N := 0
//! S := 0
//! LOOP: S := S + [N]
//! N := N + 1
//! if N < 10 then goto LOOP
//! $print 0:10
//! halt
//! ```

pub mod interpreter;
pub mod memory;
pub mod parser;
pub mod snapshot;
pub mod ui;
