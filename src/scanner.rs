//! Module `scanner` implements a one‑pass, streaming lexer for the glu language.
//!
//! It transforms source text into a sequence of [`Token`]s, skipping whitespace
//! and comments, and (by default) emitting exactly one `EOF` token at the end.
//! Designed as a `FusedIterator`, it can be chained safely with other iterator
//! adapters; [`Scanner::scan_tokens`] drains it into separate token and error
//! lists.
//!
//! # Core Phases
//!
//! 1. **Primitive Helpers**
//!    - `advance()`, `peek()`, `peek_next()` and `match_char()` walk the text one
//!      character at a time while keeping `line`/`column` in step.
//!
//! 2. **Lexing Loop** (`next`)
//!    - Reset `start` and `pending`, then call `scan_token()`.
//!    - Whitespace and `//` comments leave `pending` empty and the loop goes on.
//!    - A lexical error is yielded as `Err` and scanning resumes after it.
//!
//! 3. **Token Recognition** (`scan_token`)
//!    - Single‑character tokens: `(`, `)`, `{`, `}`, `,`, `.`, `-`, `+`, `;`, `*`.
//!    - Two‑character operators: `!=`, `==`, `<=`, `>=`.
//!    - String literals: `"` … `"`, reporting unterminated strings.
//!    - Numeric literals: digits with an optional fractional part.
//!    - Identifiers/keywords via a perfect‑hash `KEYWORDS` map.
//!    - Escaped whitespace (`\n`, `\r`, `\t` written as two characters) so that a
//!      whole program fits on one REPL/CLI line.
//!
//! # Example
//!
//! ```rust
//! use glu::scanner::Scanner;
//!
//! let (tokens, errors) = Scanner::new("log 123; // example").scan_tokens();
//! assert_eq!(tokens.len(), 4);
//! assert!(errors.is_empty());
//! ```

use crate::error::{GluError, Result};
use crate::token::{Source, Token, TokenType};
use log::{debug, info};
use memchr::memchr;
use phf::phf_map;
use std::iter::FusedIterator;

// ─────────────────────────────────────────────────────────────────────────────
// Static keyword map (compile‑time perfect hash)
// ─────────────────────────────────────────────────────────────────────────────

static KEYWORDS: phf::Map<&'static str, TokenType> = phf_map! {
    "nil"    => TokenType::NIL,
    "true"   => TokenType::TRUE,
    "false"  => TokenType::FALSE,
    "and"    => TokenType::AND,
    "or"     => TokenType::OR,
    "if"     => TokenType::IF,
    "else"   => TokenType::ELSE,
    "while"  => TokenType::WHILE,
    "for"    => TokenType::FOR,
    "return" => TokenType::RETURN,
    "var"    => TokenType::VAR,
    "func"   => TokenType::FUNC,
    "log"    => TokenType::LOG,
};

const NUL: char = '\0';

/// Options controlling how source text is tokenised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannerConfig {
    /// Origin id stamped into every token position (file name, `repl`, …).
    pub origin: String,

    /// Append a synthetic `EOF` token once the input is exhausted.
    pub auto_eof: bool,

    /// Treat the two‑character sequences `\n`, `\r` and `\t` as whitespace.
    pub escaped_whitespace: bool,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            origin: String::new(),
            auto_eof: true,
            escaped_whitespace: true,
        }
    }
}

impl ScannerConfig {
    pub fn with_origin(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            ..Self::default()
        }
    }
}

/// A single pass **scanner / lexer** that converts glu source into a sequence
/// of [`Token`]s.
pub struct Scanner<'a> {
    src: &'a str,
    config: ScannerConfig,
    start: usize,               // byte index of the first character of the lexeme
    curr: usize,                // byte index one past the last character examined
    line: usize,                // 1‑based line counter
    column: usize,              // 0‑based column of `curr`
    start_line: usize,          // line where the current lexeme began
    start_column: usize,        // column where the current lexeme began
    pending: Option<TokenType>, // recognised token kind waiting to be emitted
    lexeme: Option<String>,     // lexeme override (string contents)
    finished: bool,
}

impl<'a> Scanner<'a> {
    /// Create a new lexer over `src` with the default configuration.
    #[inline]
    pub fn new(src: &'a str) -> Self {
        Self::with_config(src, ScannerConfig::default())
    }

    /// Create a new lexer over `src`.
    pub fn with_config(src: &'a str, config: ScannerConfig) -> Self {
        info!(
            "Scanner created over {} bytes (origin={:?})",
            src.len(),
            config.origin
        );

        Self {
            src,
            config,
            start: 0,
            curr: 0,
            line: 1,
            column: 0,
            start_line: 1,
            start_column: 0,
            pending: None,
            lexeme: None,
            finished: false,
        }
    }

    /// Tokenise the whole input, returning every token and every lexical error.
    pub fn scan_tokens(self) -> (Vec<Token>, Vec<GluError>) {
        let mut tokens: Vec<Token> = Vec::new();
        let mut errors: Vec<GluError> = Vec::new();

        for result in self {
            match result {
                Ok(token) => tokens.push(token),
                Err(e) => errors.push(e),
            }
        }

        info!(
            "Scanned {} token(s) with {} error(s)",
            tokens.len(),
            errors.len()
        );

        (tokens, errors)
    }

    // ───────────────────────────── primitive helpers ────────────────────────

    /// Are we at (or past) the end of input?
    #[inline(always)]
    fn is_at_end(&self) -> bool {
        self.curr >= self.src.len()
    }

    /// Advance one character and return it (`NUL` at end of input).
    #[inline(always)]
    fn advance(&mut self) -> char {
        let c = self.peek();

        if c != NUL || !self.is_at_end() {
            self.curr += c.len_utf8();
            self.column += 1;
        }

        c
    }

    /// Peek at the current character without consuming it.
    #[inline(always)]
    fn peek(&self) -> char {
        self.src[self.curr..].chars().next().unwrap_or(NUL)
    }

    /// Peek one character beyond [`peek`](Self::peek).
    #[inline(always)]
    fn peek_next(&self) -> char {
        let mut chars = self.src[self.curr..].chars();
        chars.next();
        chars.next().unwrap_or(NUL)
    }

    /// Conditionally consume a character **iff** it matches `expected`.
    #[inline(always)]
    fn match_char(&mut self, expected: char) -> bool {
        if !self.is_at_end() && self.peek() == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    #[inline(always)]
    fn newline(&mut self) {
        self.line += 1;
        self.column = 0;
    }

    /// Position of the character just consumed.
    fn here(&self) -> Source {
        Source::new(
            &self.config.origin,
            self.line,
            self.column.saturating_sub(1),
            1,
        )
    }

    // ───────────────────────────── core lexing ─────────────────────────────

    /// Scan a *single* lexeme starting at `self.curr`.  If it produces an
    /// actual token the kind is stored in `self.pending`.  Whitespace and
    /// comments are skipped by returning `Ok(())` with `pending = None`.
    fn scan_token(&mut self) -> Result<()> {
        let c = self.advance();

        match c {
            // ── single‑character punctuators ──────────────────────────────
            '(' => self.pending = Some(TokenType::LEFT_PAREN),
            ')' => self.pending = Some(TokenType::RIGHT_PAREN),
            '{' => self.pending = Some(TokenType::LEFT_BRACE),
            '}' => self.pending = Some(TokenType::RIGHT_BRACE),
            ',' => self.pending = Some(TokenType::COMMA),
            '.' => self.pending = Some(TokenType::DOT),
            ';' => self.pending = Some(TokenType::SEMICOLON),
            '-' => self.pending = Some(TokenType::MINUS),
            '+' => self.pending = Some(TokenType::PLUS),
            '*' => self.pending = Some(TokenType::STAR),

            // ── two‑character operators (!=, ==, <=, >=) ─────────────────
            '!' => {
                let tt = if self.match_char('=') {
                    TokenType::BANG_EQUAL
                } else {
                    TokenType::BANG
                };

                self.pending = Some(tt);
            }

            '=' => {
                let tt = if self.match_char('=') {
                    TokenType::EQUAL_EQUAL
                } else {
                    TokenType::EQUAL
                };

                self.pending = Some(tt);
            }

            '<' => {
                let tt = if self.match_char('=') {
                    TokenType::LESS_EQUAL
                } else {
                    TokenType::LESS
                };

                self.pending = Some(tt);
            }

            '>' => {
                let tt = if self.match_char('=') {
                    TokenType::GREATER_EQUAL
                } else {
                    TokenType::GREATER
                };

                self.pending = Some(tt);
            }

            // ── comments (// … until newline) ────────────────────────────
            '/' => {
                if self.match_char('/') {
                    // The newline itself is left for the main loop so that the
                    // line counter stays in one place.
                    let end = memchr(b'\n', &self.src.as_bytes()[self.curr..])
                        .map_or(self.src.len(), |pos| self.curr + pos);

                    self.column += self.src[self.curr..end].chars().count();
                    self.curr = end;

                    return Ok(());
                }

                self.pending = Some(TokenType::SLASH);
            }

            // ── whitespace / newline ─────────────────────────────────────
            ' ' | '\r' | '\t' => {}

            '\n' => self.newline(),

            // ── escaped whitespace (REPL / single‑line mode) ─────────────
            '\\' if self.config.escaped_whitespace => return self.escaped_whitespace(),

            // ── string literal " … " ─────────────────────────────────────
            '"' => return self.string(),

            // ── number literal (digit‑leading) ───────────────────────────
            c if c.is_ascii_digit() => self.number(),

            // ── identifiers / keywords ───────────────────────────────────
            c if is_alpha(c) => self.identifier(),

            // ── unexpected character ─────────────────────────────────────
            c => {
                return Err(GluError::lex(
                    self.here(),
                    format!("Unexpected character: {}.", c),
                ));
            }
        }

        Ok(())
    }

    /// Handle a `\` that introduces an escaped whitespace sequence.
    fn escaped_whitespace(&mut self) -> Result<()> {
        if self.match_char('n') {
            self.newline();
            return Ok(());
        }

        if self.match_char('r') || self.match_char('t') {
            return Ok(());
        }

        if self.is_at_end() {
            return Err(GluError::lex(self.here(), "Unterminated escape sequence."));
        }

        let unexpected = self.advance();

        Err(GluError::lex(
            self.here(),
            format!("Unexpected escape character: {}.", unexpected),
        ))
    }

    /// Parse a double‑quoted string literal.
    ///
    /// * `self.start` still points to the opening `"`.
    /// * When we return, `self.curr` points **past** the closing `"`.
    fn string(&mut self) -> Result<()> {
        while !self.is_at_end() && self.peek() != '"' {
            if self.advance() == '\n' {
                self.newline();
            }
        }

        if self.is_at_end() {
            return Err(GluError::lex(
                Source::new(
                    &self.config.origin,
                    self.start_line,
                    self.start_column,
                    self.src[self.start..self.curr].chars().count(),
                ),
                "Unterminated string.",
            ));
        }

        self.advance(); // consume closing quote

        self.lexeme = Some(self.src[self.start + 1..self.curr - 1].to_owned());
        self.pending = Some(TokenType::STRING);

        Ok(())
    }

    /// Parse a numeric literal (`123`, `3.14`).  Fractions are optional and a
    /// trailing `.` without digits is left for the next token.
    fn number(&mut self) {
        while self.peek().is_ascii_digit() {
            self.advance();
        }

        if self.peek() == '.' && self.peek_next().is_ascii_digit() {
            self.advance(); // consume "."

            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        self.pending = Some(TokenType::NUMBER);
    }

    /// Parse an identifier and decide if it is a **keyword** or a generic
    /// `IDENTIFIER` token (longest match).
    fn identifier(&mut self) {
        while is_alphanumeric(self.peek()) {
            self.advance();
        }

        let text: &str = &self.src[self.start..self.curr];

        let tt: TokenType = KEYWORDS
            .get(text)
            .copied()
            .unwrap_or(TokenType::IDENTIFIER);

        self.pending = Some(tt);
    }

    fn make_token(&mut self, tt: TokenType) -> Token {
        let raw: &str = &self.src[self.start..self.curr];
        let source = Source::new(
            &self.config.origin,
            self.start_line,
            self.start_column,
            raw.chars().count(),
        );
        let lexeme: String = self.lexeme.take().unwrap_or_else(|| raw.to_owned());

        Token::new(tt, lexeme, source)
    }
}

#[inline]
fn is_alpha(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

#[inline]
fn is_alphanumeric(c: char) -> bool {
    c.is_ascii_digit() || is_alpha(c)
}

// ───────────────────────── Iterator implementation ─────────────────────────

impl<'a> Iterator for Scanner<'a> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        while !self.is_at_end() {
            // Reset per‑token state.
            self.start = self.curr;
            self.start_line = self.line;
            self.start_column = self.column;
            self.pending = None;
            self.lexeme = None;

            if let Err(e) = self.scan_token() {
                debug!("Lexical error: {}", e);
                return Some(Err(e));
            }

            if let Some(tt) = self.pending.take() {
                return Some(Ok(self.make_token(tt)));
            }
            // Otherwise it was whitespace / comment → continue loop.
        }

        // Emit at most one EOF, then stay exhausted.
        self.finished = true;

        if self.config.auto_eof {
            let source = Source::new(&self.config.origin, self.line, self.column, 0);
            return Some(Ok(Token::new(TokenType::EOF, "", source)));
        }

        None
    }
}

impl<'a> FusedIterator for Scanner<'a> {}
