//! Operand parsing implementation
//!
//! # Grammar
//!
//! ```text
//! integer      ::= '-'? digits        (the sign must touch the digits)
//! register     ::= [A-Z]
//! direct-ref   ::= '[' integer ']'
//! ref          ::= direct-ref | register
//! indirect-ref ::= '[' ref ']'
//! lvalue       ::= ref | indirect-ref
//! rvalue       ::= integer | ref | indirect-ref
//! ```

use crate::memory::link::{MemoryLink, Operand};
use crate::memory::{register_address, Address, Word};
use crate::parser::ast::Span;
use crate::parser::lexer::Token;
use crate::parser::parse::{ParseError, Parser};

impl Parser {
    /// Parse a signed integer literal
    pub(crate) fn parse_integer(&mut self) -> Result<Word, ParseError> {
        let start_column = self.current_column();
        let negative = matches!(
            (self.peek(), self.peek_ahead(1)),
            (Token::Minus(minus), Some(Token::Number(_, digits))) if minus.end == digits.start
        );
        if negative {
            self.advance();
        }

        let digits = match self.peek() {
            Token::Number(digits, _) => digits.clone(),
            other => {
                let message = format!("Expected integer, found {}", other);
                return Err(self.error(message));
            }
        };
        self.advance();

        let text = if negative {
            format!("-{}", digits)
        } else {
            digits
        };
        text.parse::<Word>().map_err(|_| ParseError {
            message: format!("Integer literal {} is out of range", text),
            column: start_column,
        })
    }

    /// Parse a register name, returning its address
    fn parse_register(&mut self) -> Result<Address, ParseError> {
        let address = match self.peek() {
            Token::Word(w, _) if w.chars().count() == 1 => w.chars().next().and_then(register_address),
            _ => None,
        };
        match address {
            Some(address) => {
                self.advance();
                Ok(address)
            }
            None => {
                let message = format!("Expected register, found {}", self.peek());
                Err(self.error(message))
            }
        }
    }

    /// `ref ::= '[' integer ']' | register`, returning the referenced address
    fn parse_ref(&mut self) -> Result<Address, ParseError> {
        if self.match_token(&Token::LBracket(Span::default())) {
            let address = self.parse_integer()?;
            self.expect_token(&Token::RBracket(Span::default()), "Expected ']' after address")?;
            Ok(address)
        } else {
            self.parse_register()
        }
    }

    /// `lvalue ::= ref | indirect-ref`
    pub(crate) fn parse_lvalue(&mut self) -> Result<MemoryLink, ParseError> {
        let is_indirect = self.check(&Token::LBracket(Span::default()))
            && matches!(
                self.peek_ahead(1),
                Some(Token::LBracket(_)) | Some(Token::Word(..))
            );

        if is_indirect {
            self.advance(); // '['
            let pointer = self.parse_ref()?;
            self.expect_token(
                &Token::RBracket(Span::default()),
                "Expected ']' after indirect reference",
            )?;
            Ok(MemoryLink::Indirect(pointer))
        } else {
            Ok(MemoryLink::Direct(self.parse_ref()?))
        }
    }

    /// `rvalue ::= integer | ref | indirect-ref`
    pub(crate) fn parse_rvalue(&mut self) -> Result<Operand, ParseError> {
        match self.peek() {
            Token::Number(..) | Token::Minus(_) => Ok(Operand::Literal(self.parse_integer()?)),
            _ => Ok(Operand::Link(self.parse_lvalue()?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rvalue(text: &str) -> Result<Operand, ParseError> {
        let mut parser = Parser::new(text)?;
        let operand = parser.parse_rvalue()?;
        parser.expect_end()?;
        Ok(operand)
    }

    #[test]
    fn test_literals() {
        assert_eq!(rvalue("42").unwrap(), Operand::Literal(42));
        assert_eq!(rvalue("-42").unwrap(), Operand::Literal(-42));
        assert!(rvalue("- 42").is_err());
        assert_eq!(
            rvalue("-9223372036854775808").unwrap(),
            Operand::Literal(i64::MIN)
        );
        assert!(rvalue("9223372036854775808").is_err());
    }

    #[test]
    fn test_references() {
        assert_eq!(rvalue("A").unwrap(), Operand::Link(MemoryLink::Direct(-1)));
        assert_eq!(rvalue("Z").unwrap(), Operand::Link(MemoryLink::Direct(-26)));
        assert_eq!(rvalue("[7]").unwrap(), Operand::Link(MemoryLink::Direct(7)));
        assert_eq!(rvalue("[-1]").unwrap(), Operand::Link(MemoryLink::Direct(-1)));
        assert_eq!(rvalue("[B]").unwrap(), Operand::Link(MemoryLink::Indirect(-2)));
        assert_eq!(rvalue("[[7]]").unwrap(), Operand::Link(MemoryLink::Indirect(7)));
        assert_eq!(rvalue("[ [ 7 ] ]").unwrap(), Operand::Link(MemoryLink::Indirect(7)));
    }

    #[test]
    fn test_rejected_references() {
        assert!(rvalue("AB").is_err());
        assert!(rvalue("a").is_err());
        assert!(rvalue("[[[1]]]").is_err());
        assert!(rvalue("[[A]]").is_err());
        assert!(rvalue("[]").is_err());
    }

    #[test]
    fn test_lvalue_rejects_literal() {
        let mut parser = Parser::new("5").unwrap();
        assert!(parser.parse_lvalue().is_err());
    }
}
