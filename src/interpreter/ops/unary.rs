//! Unary operator evaluation

use crate::interpreter::errors::RuntimeError;
use crate::memory::Word;
use crate::parser::ast::UnaryOp;

/// Apply a unary assignment operator to a word
pub fn apply_unary(op: UnaryOp, value: Word) -> Result<Word, RuntimeError> {
    match op {
        UnaryOp::Copy => Ok(value),
        UnaryOp::Neg => value
            .checked_neg()
            .ok_or_else(|| RuntimeError::IntegerOverflow {
                operation: format!("- {}", value),
            }),
    }
}
