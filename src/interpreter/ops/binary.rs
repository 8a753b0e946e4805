//! Binary operator evaluation
//!
//! All arithmetic is checked: a result outside the 64-bit word range is an
//! [`RuntimeError::IntegerOverflow`], never a wrapped value. Division and
//! remainder round toward negative infinity, so `-7 / 2 == -4` and
//! `-7 % 2 == 1` (the remainder takes the sign of the divisor).

use crate::interpreter::errors::RuntimeError;
use crate::memory::Word;
use crate::parser::ast::BinOp;

fn describe(a: Word, op: BinOp, b: Word) -> String {
    format!("{} {} {}", a, op.symbol(), b)
}

fn overflow(a: Word, op: BinOp, b: Word) -> RuntimeError {
    RuntimeError::IntegerOverflow {
        operation: describe(a, op, b),
    }
}

/// Apply `op` to two words
pub fn apply_binary(op: BinOp, a: Word, b: Word) -> Result<Word, RuntimeError> {
    match op {
        BinOp::Add => a.checked_add(b).ok_or_else(|| overflow(a, op, b)),
        BinOp::Sub => a.checked_sub(b).ok_or_else(|| overflow(a, op, b)),
        BinOp::Mul => a.checked_mul(b).ok_or_else(|| overflow(a, op, b)),
        BinOp::Div => floor_div(a, b),
        BinOp::Mod => floor_mod(a, b),
        BinOp::BitAnd => Ok(a & b),
        BinOp::BitOr => Ok(a | b),
        BinOp::BitXor => Ok(a ^ b),
        BinOp::Shl => shift_left(a, b),
        BinOp::Shr => shift_right(a, b),
    }
}

#[inline]
fn floor_div(a: Word, b: Word) -> Result<Word, RuntimeError> {
    if b == 0 {
        return Err(RuntimeError::DivisionByZero {
            operation: describe(a, BinOp::Div, b),
        });
    }
    // i64::MIN / -1 is the only overflowing case
    let q = a.checked_div(b).ok_or_else(|| overflow(a, BinOp::Div, b))?;
    if a % b != 0 && ((a < 0) != (b < 0)) {
        Ok(q - 1)
    } else {
        Ok(q)
    }
}

#[inline]
fn floor_mod(a: Word, b: Word) -> Result<Word, RuntimeError> {
    if b == 0 {
        return Err(RuntimeError::DivisionByZero {
            operation: describe(a, BinOp::Mod, b),
        });
    }
    let r = a.wrapping_rem(b);
    if r != 0 && ((r < 0) != (b < 0)) {
        Ok(r + b)
    } else {
        Ok(r)
    }
}

#[inline]
fn shift_left(a: Word, b: Word) -> Result<Word, RuntimeError> {
    if b < 0 {
        return Err(RuntimeError::InvalidShift {
            operation: describe(a, BinOp::Shl, b),
        });
    }
    if a == 0 {
        return Ok(0);
    }
    if b >= Word::BITS as Word {
        return Err(overflow(a, BinOp::Shl, b));
    }
    let r = a << b;
    if (r >> b) != a {
        return Err(overflow(a, BinOp::Shl, b));
    }
    Ok(r)
}

#[inline]
fn shift_right(a: Word, b: Word) -> Result<Word, RuntimeError> {
    if b < 0 {
        return Err(RuntimeError::InvalidShift {
            operation: describe(a, BinOp::Shr, b),
        });
    }
    if b >= Word::BITS as Word {
        return Ok(if a < 0 { -1 } else { 0 });
    }
    Ok(a >> b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_division() {
        assert_eq!(apply_binary(BinOp::Div, 7, 2).unwrap(), 3);
        assert_eq!(apply_binary(BinOp::Div, -7, 2).unwrap(), -4);
        assert_eq!(apply_binary(BinOp::Div, 7, -2).unwrap(), -4);
        assert_eq!(apply_binary(BinOp::Div, -7, -2).unwrap(), 3);
        assert_eq!(apply_binary(BinOp::Div, -8, 2).unwrap(), -4);
    }

    #[test]
    fn test_floor_remainder() {
        assert_eq!(apply_binary(BinOp::Mod, 7, 2).unwrap(), 1);
        assert_eq!(apply_binary(BinOp::Mod, -7, 2).unwrap(), 1);
        assert_eq!(apply_binary(BinOp::Mod, 7, -2).unwrap(), -1);
        assert_eq!(apply_binary(BinOp::Mod, -7, -2).unwrap(), -1);
        assert_eq!(apply_binary(BinOp::Mod, i64::MIN, -1).unwrap(), 0);
    }

    #[test]
    fn test_division_by_zero() {
        assert!(matches!(
            apply_binary(BinOp::Div, 1, 0),
            Err(RuntimeError::DivisionByZero { .. })
        ));
        assert!(matches!(
            apply_binary(BinOp::Mod, 1, 0),
            Err(RuntimeError::DivisionByZero { .. })
        ));
    }

    #[test]
    fn test_overflow() {
        assert!(matches!(
            apply_binary(BinOp::Add, i64::MAX, 1),
            Err(RuntimeError::IntegerOverflow { .. })
        ));
        assert!(matches!(
            apply_binary(BinOp::Mul, i64::MAX, 2),
            Err(RuntimeError::IntegerOverflow { .. })
        ));
        assert!(matches!(
            apply_binary(BinOp::Div, i64::MIN, -1),
            Err(RuntimeError::IntegerOverflow { .. })
        ));
    }

    #[test]
    fn test_shifts() {
        assert_eq!(apply_binary(BinOp::Shl, 3, 4).unwrap(), 48);
        assert_eq!(apply_binary(BinOp::Shl, -1, 63).unwrap(), i64::MIN);
        assert_eq!(apply_binary(BinOp::Shl, 0, 200).unwrap(), 0);
        assert!(apply_binary(BinOp::Shl, 1, 63).is_err());
        assert!(apply_binary(BinOp::Shl, 1, 64).is_err());

        assert_eq!(apply_binary(BinOp::Shr, -7, 1).unwrap(), -4);
        assert_eq!(apply_binary(BinOp::Shr, 100, 64).unwrap(), 0);
        assert_eq!(apply_binary(BinOp::Shr, -100, 64).unwrap(), -1);

        assert!(matches!(
            apply_binary(BinOp::Shr, 1, -1),
            Err(RuntimeError::InvalidShift { .. })
        ));
    }

    #[test]
    fn test_bitwise() {
        assert_eq!(apply_binary(BinOp::BitAnd, 0b1100, 0b1010).unwrap(), 0b1000);
        assert_eq!(apply_binary(BinOp::BitOr, 0b1100, 0b1010).unwrap(), 0b1110);
        assert_eq!(apply_binary(BinOp::BitXor, 0b1100, 0b1010).unwrap(), 0b0110);
        assert_eq!(apply_binary(BinOp::BitAnd, -1, 5).unwrap(), 5);
    }
}
