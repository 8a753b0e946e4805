//! Statement parsing implementation
//!
//! This module handles parsing of all RAM statements:
//!
//! - Assignments: `A := B + 1`, `[5] := [A]`, `B := - C`
//! - Jumps: `halt`, `goto LABEL`
//! - Conditionals: `if A <> 5 then goto LOOP`
//!
//! # Grammar
//!
//! ```text
//! statement ::= simple | if
//! simple    ::= 'halt' | 'goto' label
//!             | lvalue ':=' rvalue binop rvalue
//!             | lvalue ':=' rvalue
//!             | lvalue ':=' '-' rvalue
//! if        ::= 'if' rvalue relop rvalue 'then' simple
//! ```
//!
//! Every statement form must consume the rest of the line.

use crate::memory::link::MemoryLink;
use crate::parser::ast::{BinOp, Condition, Instruction, RelOp, Span, UnaryOp};
use crate::parser::lexer::Token;
use crate::parser::parse::{furthest, ParseError, Parser};

impl Parser {
    /// Parse a statement (anything but a directive), up to the end of the line
    pub(crate) fn parse_statement(&mut self) -> Result<Instruction, ParseError> {
        if self.check_keyword("if") {
            return self.parse_if_statement();
        }
        self.parse_simple_statement()
    }

    /// Parse a statement that may appear as the body of an `if`
    fn parse_simple_statement(&mut self) -> Result<Instruction, ParseError> {
        if self.check_keyword("halt") {
            self.advance();
            self.expect_end()?;
            return Ok(Instruction::Halt);
        }

        if self.check_keyword("goto") {
            self.advance();
            let label = self.expect_label()?;
            self.expect_end()?;
            return Ok(Instruction::Goto(label));
        }

        self.parse_assignment()
    }

    /// Try the assignment forms from most to least specific
    fn parse_assignment(&mut self) -> Result<Instruction, ParseError> {
        let binary = self.attempt(|p| {
            let target = p.parse_assignment_target()?;
            let left = p.parse_rvalue()?;
            let op = p.parse_binop()?;
            let right = p.parse_rvalue()?;
            p.expect_end()?;
            Ok(Instruction::Binary {
                target,
                op,
                left,
                right,
            })
        });
        let binary_err = match binary {
            Ok(instruction) => return Ok(instruction),
            Err(e) => e,
        };

        let copy = self.attempt(|p| {
            let target = p.parse_assignment_target()?;
            let operand = p.parse_rvalue()?;
            p.expect_end()?;
            Ok(Instruction::Assign {
                target,
                op: UnaryOp::Copy,
                operand,
            })
        });
        let copy_err = match copy {
            Ok(instruction) => return Ok(instruction),
            Err(e) => e,
        };

        self.attempt(|p| {
            let target = p.parse_assignment_target()?;
            p.expect_token(&Token::Minus(Span::default()), "Expected '-' for negation")?;
            let operand = p.parse_rvalue()?;
            p.expect_end()?;
            Ok(Instruction::Assign {
                target,
                op: UnaryOp::Neg,
                operand,
            })
        })
        .map_err(|neg_err| furthest(furthest(binary_err, copy_err), neg_err))
    }

    /// `lvalue ':='`
    fn parse_assignment_target(&mut self) -> Result<MemoryLink, ParseError> {
        let target = self.parse_lvalue()?;
        self.expect_token(&Token::Assign(Span::default()), "Expected ':='")?;
        Ok(target)
    }

    fn parse_binop(&mut self) -> Result<BinOp, ParseError> {
        let op = match self.peek() {
            Token::Plus(_) => BinOp::Add,
            Token::Minus(_) => BinOp::Sub,
            Token::Star(_) => BinOp::Mul,
            Token::Slash(_) => BinOp::Div,
            Token::Percent(_) => BinOp::Mod,
            Token::Amp(_) => BinOp::BitAnd,
            Token::Pipe(_) => BinOp::BitOr,
            Token::Caret(_) => BinOp::BitXor,
            Token::LtLt(_) => BinOp::Shl,
            Token::GtGt(_) => BinOp::Shr,
            other => {
                let message = format!("Expected binary operator, found {}", other);
                return Err(self.error(message));
            }
        };
        self.advance();
        Ok(op)
    }

    fn parse_relop(&mut self) -> Result<RelOp, ParseError> {
        let op = match self.peek() {
            Token::Eq(_) => RelOp::Eq,
            Token::NotEq(_) => RelOp::Ne,
            Token::Le(_) => RelOp::Le,
            Token::Lt(_) => RelOp::Lt,
            Token::Ge(_) => RelOp::Ge,
            Token::Gt(_) => RelOp::Gt,
            other => {
                let message = format!("Expected comparison operator, found {}", other);
                return Err(self.error(message));
            }
        };
        self.advance();
        Ok(op)
    }

    /// `rvalue relop rvalue`
    pub(crate) fn parse_condition(&mut self) -> Result<Condition, ParseError> {
        let left = self.parse_rvalue()?;
        let op = self.parse_relop()?;
        let right = self.parse_rvalue()?;
        Ok(Condition { op, left, right })
    }

    /// `if condition then simple-statement`
    fn parse_if_statement(&mut self) -> Result<Instruction, ParseError> {
        self.expect_keyword("if")?;
        let condition = self.parse_condition()?;
        self.expect_keyword("then")?;
        let body = self.parse_simple_statement()?;
        Ok(Instruction::If {
            condition,
            body: Box::new(body),
        })
    }
}
