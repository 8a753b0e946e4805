//! Lexer (tokenizer) for one RAM source line
//!
//! Converts a preprocessed line into a flat [`Token`] stream consumed by the
//! parser. Integer literals are lexed without their sign: whether a `-` is a
//! sign or an operator depends on whether it touches the digits, which the
//! parser decides from the token [`Span`]s.

use super::ast::Span;
use std::fmt;
use thiserror::Error;

/// All token variants produced by the lexer.
///
/// Every variant carries a [`Span`] so that parse errors can point at a column
/// and the parser can check token adjacency.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    Number(String, Span), // digits only

    // Words: keywords (`halt`, `goto`, `if`, `then`), registers and labels
    Word(String, Span),

    // `$init`, `$print`
    Directive(String, Span),

    // Assignment and label separator
    Assign(Span), // :=
    Colon(Span),  // :

    // Arithmetic
    Plus(Span),    // +
    Minus(Span),   // -
    Star(Span),    // *
    Slash(Span),   // /
    Percent(Span), // %

    // Bitwise
    Amp(Span),   // &
    Pipe(Span),  // |
    Caret(Span), // ^
    LtLt(Span),  // <<
    GtGt(Span),  // >>

    // Comparison
    Eq(Span),    // =
    NotEq(Span), // <>
    Le(Span),    // <=
    Lt(Span),    // <
    Ge(Span),    // >=
    Gt(Span),    // >

    // Random value markers
    At(Span),   // @
    AtAt(Span), // @@

    // Punctuation
    LBracket(Span), // [
    RBracket(Span), // ]
    Comma(Span),    // ,

    // End of line
    Eof(Span),
}

impl Token {
    /// Returns the span of this token.
    pub fn span(&self) -> Span {
        match self {
            Token::Number(_, span)
            | Token::Word(_, span)
            | Token::Directive(_, span)
            | Token::Assign(span)
            | Token::Colon(span)
            | Token::Plus(span)
            | Token::Minus(span)
            | Token::Star(span)
            | Token::Slash(span)
            | Token::Percent(span)
            | Token::Amp(span)
            | Token::Pipe(span)
            | Token::Caret(span)
            | Token::LtLt(span)
            | Token::GtGt(span)
            | Token::Eq(span)
            | Token::NotEq(span)
            | Token::Le(span)
            | Token::Lt(span)
            | Token::Ge(span)
            | Token::Gt(span)
            | Token::At(span)
            | Token::AtAt(span)
            | Token::LBracket(span)
            | Token::RBracket(span)
            | Token::Comma(span)
            | Token::Eof(span) => *span,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(digits, _) => write!(f, "number {}", digits),
            Token::Word(w, _) => write!(f, "'{}'", w),
            Token::Directive(d, _) => write!(f, "directive '${}'", d),
            Token::Assign(_) => write!(f, "':='"),
            Token::Colon(_) => write!(f, "':'"),
            Token::Plus(_) => write!(f, "'+'"),
            Token::Minus(_) => write!(f, "'-'"),
            Token::Star(_) => write!(f, "'*'"),
            Token::Slash(_) => write!(f, "'/'"),
            Token::Percent(_) => write!(f, "'%'"),
            Token::Amp(_) => write!(f, "'&'"),
            Token::Pipe(_) => write!(f, "'|'"),
            Token::Caret(_) => write!(f, "'^'"),
            Token::LtLt(_) => write!(f, "'<<'"),
            Token::GtGt(_) => write!(f, "'>>'"),
            Token::Eq(_) => write!(f, "'='"),
            Token::NotEq(_) => write!(f, "'<>'"),
            Token::Le(_) => write!(f, "'<='"),
            Token::Lt(_) => write!(f, "'<'"),
            Token::Ge(_) => write!(f, "'>='"),
            Token::Gt(_) => write!(f, "'>'"),
            Token::At(_) => write!(f, "'@'"),
            Token::AtAt(_) => write!(f, "'@@'"),
            Token::LBracket(_) => write!(f, "'['"),
            Token::RBracket(_) => write!(f, "']'"),
            Token::Comma(_) => write!(f, "','"),
            Token::Eof(_) => write!(f, "end of line"),
        }
    }
}

/// Lexer error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Lexer error at column {column}: {message}")]
pub struct LexError {
    pub message: String,
    pub column: usize,
}

/// Lexer for a single source line
pub struct Lexer {
    input: Vec<char>,
    position: usize,
}

impl Lexer {
    /// Create a new lexer for the given line.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
        }
    }

    /// Tokenize the entire line
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace();

            if self.is_at_end() {
                tokens.push(Token::Eof(Span::new(self.position, self.position)));
                break;
            }

            tokens.push(self.next_token()?);
        }

        Ok(tokens)
    }

    /// Get next token
    fn next_token(&mut self) -> Result<Token, LexError> {
        let start = self.position;
        let ch = self.advance().ok_or_else(|| LexError {
            message: "Unexpected end of line".to_string(),
            column: start,
        })?;

        let token = match ch {
            '0'..='9' => {
                let digits = self.take_while(ch, |c| c.is_ascii_digit());
                Token::Number(digits, self.span_from(start))
            }

            'a'..='z' | 'A'..='Z' | '_' => {
                let word = self.take_while(ch, |c| c.is_ascii_alphabetic() || c == '_');
                Token::Word(word, self.span_from(start))
            }

            '$' => {
                let name = match self.peek() {
                    Some(c) if c.is_ascii_alphabetic() => {
                        self.advance();
                        self.take_while(c, |c| c.is_ascii_alphabetic())
                    }
                    _ => {
                        return Err(LexError {
                            message: "Expected directive name after '$'".to_string(),
                            column: start,
                        })
                    }
                };
                Token::Directive(name, self.span_from(start))
            }

            ':' => {
                if self.match_char('=') {
                    Token::Assign(self.span_from(start))
                } else {
                    Token::Colon(self.span_from(start))
                }
            }

            '+' => Token::Plus(self.span_from(start)),
            '-' => Token::Minus(self.span_from(start)),
            '*' => Token::Star(self.span_from(start)),
            '/' => Token::Slash(self.span_from(start)),
            '%' => Token::Percent(self.span_from(start)),
            '&' => Token::Amp(self.span_from(start)),
            '|' => Token::Pipe(self.span_from(start)),
            '^' => Token::Caret(self.span_from(start)),
            '=' => Token::Eq(self.span_from(start)),

            '<' => {
                if self.match_char('<') {
                    Token::LtLt(self.span_from(start))
                } else if self.match_char('>') {
                    Token::NotEq(self.span_from(start))
                } else if self.match_char('=') {
                    Token::Le(self.span_from(start))
                } else {
                    Token::Lt(self.span_from(start))
                }
            }
            '>' => {
                if self.match_char('>') {
                    Token::GtGt(self.span_from(start))
                } else if self.match_char('=') {
                    Token::Ge(self.span_from(start))
                } else {
                    Token::Gt(self.span_from(start))
                }
            }

            '@' => {
                if self.match_char('@') {
                    Token::AtAt(self.span_from(start))
                } else {
                    Token::At(self.span_from(start))
                }
            }

            '[' => Token::LBracket(self.span_from(start)),
            ']' => Token::RBracket(self.span_from(start)),
            ',' => Token::Comma(self.span_from(start)),

            _ => {
                return Err(LexError {
                    message: format!("Unexpected character '{}'", ch),
                    column: start,
                })
            }
        };

        Ok(token)
    }

    fn take_while(&mut self, first: char, pred: impl Fn(char) -> bool) -> String {
        let mut text = String::new();
        text.push(first);
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            text.push(c);
            self.advance();
        }
        text
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.advance();
        }
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.input.get(self.position).copied();
        if c.is_some() {
            self.position += 1;
        }
        c
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(start, self.position)
    }
}
