//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including the error type, helper methods, and the per-line entry point.
//!
//! # Parser Architecture
//!
//! The Parser is a recursive descent parser over the tokens of a single line:
//! - This module: Parser struct, helper methods, label prefixes
//! - `operands`: integers, registers, direct and indirect references
//! - `statements`: assignments, `halt`, `goto`, `if`
//! - `directives`: `$init` and `$print`
//!
//! # Backtracking
//!
//! Several statement forms share a prefix (`A := B + C`, `A := B`,
//! `A := - B`). Alternatives are tried in a fixed order with
//! [`Parser::attempt`], which rewinds the token position when an alternative
//! fails, so the most specific form always wins.

use crate::parser::ast::{ParsedLine, Span};
use crate::parser::lexer::{LexError, Lexer, Token};
use thiserror::Error;

/// Parser error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("column {column}: {message}")]
pub struct ParseError {
    pub message: String,
    pub column: usize,
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError {
            message: err.message,
            column: err.column,
        }
    }
}

/// Recursive descent parser for one RAM source line
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,
}

impl Parser {
    pub fn new(line: &str) -> Result<Self, ParseError> {
        let mut lexer = Lexer::new(line);
        let tokens = lexer.tokenize()?;
        Ok(Self {
            tokens,
            position: 0,
        })
    }

    /// Parse the whole line: a directive, a statement, or `LABEL: statement`
    pub fn parse_line(&mut self) -> Result<ParsedLine, ParseError> {
        if matches!(self.peek(), Token::Directive(..)) {
            let instruction = self.parse_directive()?;
            self.expect_end()?;
            return Ok(ParsedLine {
                label: None,
                instruction,
            });
        }

        let unlabeled = self.attempt(|p| {
            let instruction = p.parse_statement()?;
            p.expect_end()?;
            Ok(ParsedLine {
                label: None,
                instruction,
            })
        });

        match unlabeled {
            Ok(line) => Ok(line),
            Err(first) => self
                .attempt(|p| {
                    let label = p.parse_label_prefix()?;
                    let instruction = p.parse_statement()?;
                    p.expect_end()?;
                    Ok(ParsedLine {
                        label: Some(label),
                        instruction,
                    })
                })
                .map_err(|second| furthest(first, second)),
        }
    }

    /// `LABEL :`
    fn parse_label_prefix(&mut self) -> Result<String, ParseError> {
        let label = self.expect_label()?;
        self.expect_token(&Token::Colon(Span::default()), "Expected ':' after label")?;
        Ok(label)
    }

    // ===== Helper methods =====

    /// Run `f`; on failure rewind to where it started
    pub(crate) fn attempt<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        let saved = self.position;
        let result = f(self);
        if result.is_err() {
            self.position = saved;
        }
        result
    }

    pub(crate) fn match_token(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn check(&self, token: &Token) -> bool {
        std::mem::discriminant(self.peek()) == std::mem::discriminant(token)
    }

    pub(crate) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.position += 1;
        }
        self.previous()
    }

    pub(crate) fn is_at_end(&self) -> bool {
        matches!(self.peek(), Token::Eof(_))
    }

    pub(crate) fn peek(&self) -> &Token {
        &self.tokens[self.position]
    }

    pub(crate) fn peek_ahead(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.position + n)
    }

    pub(crate) fn previous(&self) -> &Token {
        &self.tokens[self.position.saturating_sub(1)]
    }

    pub(crate) fn current_column(&self) -> usize {
        self.peek().span().start
    }

    pub(crate) fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError {
            message: message.into(),
            column: self.current_column(),
        }
    }

    pub(crate) fn expect_token(&mut self, token: &Token, message: &str) -> Result<(), ParseError> {
        if self.check(token) {
            self.advance();
            Ok(())
        } else {
            Err(self.error(format!("{}, found {}", message, self.peek())))
        }
    }

    pub(crate) fn expect_end(&self) -> Result<(), ParseError> {
        if self.is_at_end() {
            Ok(())
        } else {
            Err(self.error(format!("Expected end of line, found {}", self.peek())))
        }
    }

    /// Consume the lowercase keyword `word`
    pub(crate) fn expect_keyword(&mut self, word: &str) -> Result<(), ParseError> {
        match self.peek() {
            Token::Word(w, _) if w == word => {
                self.advance();
                Ok(())
            }
            other => Err(self.error(format!("Expected '{}', found {}", word, other))),
        }
    }

    pub(crate) fn check_keyword(&self, word: &str) -> bool {
        matches!(self.peek(), Token::Word(w, _) if w == word)
    }

    /// Consume a label: one or more of `A-Z` and `_`
    pub(crate) fn expect_label(&mut self) -> Result<String, ParseError> {
        match self.peek() {
            Token::Word(w, _) if is_label(w) => {
                let label = w.clone();
                self.advance();
                Ok(label)
            }
            other => Err(self.error(format!("Expected label, found {}", other))),
        }
    }
}

/// Labels are made of uppercase letters and underscores
pub fn is_label(word: &str) -> bool {
    !word.is_empty() && word.chars().all(|c| c.is_ascii_uppercase() || c == '_')
}

/// Of two failed alternatives, report the one that got further into the line
pub(crate) fn furthest(a: ParseError, b: ParseError) -> ParseError {
    if b.column > a.column {
        b
    } else {
        a
    }
}
