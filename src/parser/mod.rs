//! RAM source code parser
//!
//! This module transforms RAM assembly text into a [`Program`](ast::Program):
//! - [`preprocessor`]: Line preprocessing (substitutions, comments, trimming)
//! - [`lexer`]: Tokenization (one line → tokens)
//! - [`parse`]: Parsing (tokens → instruction, optionally label-prefixed)
//! - [`compile`](mod@compile): Whole-program compilation and label tables
//! - [`ast`]: Instruction definitions
//!
//! # Language
//!
//! One statement per line:
//! - Assignments: `A := 5`, `[A] := B + [3]`, `C := - D`
//! - Control flow: `halt`, `goto LABEL`, `if A < 10 then goto LOOP`
//! - Labels: `LOOP: A := A + 1`
//! - Directives: `$init [0] 1:10, @1:100*5`, `$print 0:10, 42`
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser with ordered backtracking over the
//! assignment forms. No external parser generator dependencies.

pub mod ast;
pub mod compile;
mod directives;
pub mod lexer;
mod operands;
pub mod parse;
pub mod preprocessor;
mod statements;

pub use compile::{compile, compile_source};
pub use parse::{ParseError, Parser};
pub use preprocessor::{set_substitution, Preprocessor, StdPreprocessor, Substitutions};
