//! Directive parsing implementation
//!
//! Directives are standalone lines starting with `$`. They cannot carry a
//! label and cannot be the body of an `if`.
//!
//! # Grammar
//!
//! ```text
//! init       ::= '$init' '[' integer ']' value-spec (',' value-spec)*
//! value-spec ::= ('@@' range | '@' range | range | integer) ('*' digits)?
//! print      ::= '$print' addr-spec (',' addr-spec)*
//! addr-spec  ::= range | integer
//! range      ::= integer ':' integer (':' integer)?
//! ```

use crate::memory::Word;
use crate::parser::ast::{Instruction, SliceRange, Span, ValueSource, ValueSpec};
use crate::parser::lexer::Token;
use crate::parser::parse::{ParseError, Parser};

impl Parser {
    /// Parse a `$name ...` line
    pub(crate) fn parse_directive(&mut self) -> Result<Instruction, ParseError> {
        let name = match self.peek() {
            Token::Directive(name, _) => name.clone(),
            other => {
                let message = format!("Expected directive, found {}", other);
                return Err(self.error(message));
            }
        };

        match name.as_str() {
            "init" => {
                self.advance();
                self.parse_init()
            }
            "print" => {
                self.advance();
                self.parse_print()
            }
            _ => Err(self.error(format!("Unknown directive '${}'", name))),
        }
    }

    fn parse_init(&mut self) -> Result<Instruction, ParseError> {
        self.expect_token(
            &Token::LBracket(Span::default()),
            "Expected '[' before start address",
        )?;
        let start = self.parse_integer()?;
        self.expect_token(
            &Token::RBracket(Span::default()),
            "Expected ']' after start address",
        )?;

        let mut specs = vec![self.parse_value_spec()?];
        while self.match_token(&Token::Comma(Span::default())) {
            specs.push(self.parse_value_spec()?);
        }

        Ok(Instruction::Init { start, specs })
    }

    fn parse_print(&mut self) -> Result<Instruction, ParseError> {
        let mut ranges = vec![self.parse_addr_spec()?];
        while self.match_token(&Token::Comma(Span::default())) {
            ranges.push(self.parse_addr_spec()?);
        }
        Ok(Instruction::Print(ranges))
    }

    fn parse_value_spec(&mut self) -> Result<ValueSpec, ParseError> {
        let source = if self.match_token(&Token::AtAt(Span::default())) {
            ValueSource::FixedRandom(self.parse_range()?)
        } else if self.match_token(&Token::At(Span::default())) {
            ValueSource::Random(self.parse_range()?)
        } else {
            let column = self.current_column();
            let first = self.parse_integer()?;
            if self.check(&Token::Colon(Span::default())) {
                ValueSource::Range(self.parse_range_tail(first, column)?)
            } else {
                ValueSource::Literal(first)
            }
        };

        let repeat = if self.match_token(&Token::Star(Span::default())) {
            self.parse_count()?
        } else {
            1
        };

        Ok(ValueSpec { source, repeat })
    }

    /// `integer | integer ':' integer (':' integer)?`; a bare `n` means `n:n+1`
    fn parse_addr_spec(&mut self) -> Result<SliceRange, ParseError> {
        let column = self.current_column();
        let first = self.parse_integer()?;
        if self.check(&Token::Colon(Span::default())) {
            return self.parse_range_tail(first, column);
        }

        let stop = first.checked_add(1).ok_or_else(|| ParseError {
            message: format!("Address {} is out of range", first),
            column,
        })?;
        Ok(SliceRange {
            start: first,
            stop,
            step: 1,
        })
    }

    fn parse_range(&mut self) -> Result<SliceRange, ParseError> {
        let column = self.current_column();
        let start = self.parse_integer()?;
        self.parse_range_tail(start, column)
    }

    /// The `':' stop (':' step)?` part of a range whose start is already parsed
    fn parse_range_tail(&mut self, start: Word, column: usize) -> Result<SliceRange, ParseError> {
        self.expect_token(&Token::Colon(Span::default()), "Expected ':' in range")?;
        let stop = self.parse_integer()?;
        let step = if self.match_token(&Token::Colon(Span::default())) {
            self.parse_integer()?
        } else {
            1
        };

        if step == 0 {
            return Err(ParseError {
                message: "Range step cannot be zero".to_string(),
                column,
            });
        }

        Ok(SliceRange { start, stop, step })
    }

    /// Unsigned repeat count after `*`
    fn parse_count(&mut self) -> Result<usize, ParseError> {
        let column = self.current_column();
        let digits = match self.peek() {
            Token::Number(digits, _) => digits.clone(),
            other => {
                let message = format!("Expected repeat count, found {}", other);
                return Err(self.error(message));
            }
        };
        self.advance();
        digits.parse::<usize>().map_err(|_| ParseError {
            message: format!("Repeat count {} is out of range", digits),
            column,
        })
    }
}
