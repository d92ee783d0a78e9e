//! Centralised error hierarchy for the **glu interpreter**.
//!
//! Every pipeline stage (scanner, parser, resolver, runtime) reports failures
//! through one of the variants defined here.  The four language variants carry
//! the location they refer to plus a message; their display form is
//! `{<token>, <message>}` and the message strings are stable.
//!
//! The module **does not** print diagnostics itself.

use std::io;
use thiserror::Error;

use log::info;

use crate::token::{Source, Token};

/// Canonical error type used throughout the interpreter.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GluError {
    /// Lexical (scanner) error.  There is no token yet, so the position of the
    /// offending character stands in for it.
    #[error("{{{position}, {message}}}")]
    Lex { message: String, position: Source },

    /// Syntactic (parser) error, tagged with the token the parser was looking at.
    #[error("{{{token}, {message}}}")]
    Parse { message: String, token: Token },

    /// Static resolution failure (redeclaration, self‑reference, stray `return`).
    #[error("{{{token}, {message}}}")]
    Resolve { message: String, token: Token },

    /// Runtime evaluation error.
    #[error("{{{token}, {message}}}")]
    Runtime { message: String, token: Token },

    /// Wrapper around `std::io::Error` (transparent).  Enables `?` on I/O ops.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// UTF‑8 decoding failure when ingesting external text.
    #[error(transparent)]
    Utf8(#[from] std::str::Utf8Error),
}

impl GluError {
    /// Helper constructor for the **scanner**.
    pub fn lex<S: Into<String>>(position: Source, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Lex error: at={}, msg={}", position, message);

        GluError::Lex { message, position }
    }

    /// Helper constructor for the **parser**.
    pub fn parse<S: Into<String>>(token: &Token, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Parse error: token={}, msg={}", token, message);

        GluError::Parse {
            message,
            token: token.clone(),
        }
    }

    /// Helper constructor for the **resolver**.
    pub fn resolve<S: Into<String>>(token: &Token, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Resolve error: token={}, msg={}", token, message);

        GluError::Resolve {
            message,
            token: token.clone(),
        }
    }

    /// Helper constructor for the **interpreter**.
    pub fn runtime<S: Into<String>>(token: &Token, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Runtime error: token={}, msg={}", token, message);

        GluError::Runtime {
            message,
            token: token.clone(),
        }
    }

    /// The bare message of a language error, without location.
    pub fn message(&self) -> Option<&str> {
        match self {
            GluError::Lex { message, .. }
            | GluError::Parse { message, .. }
            | GluError::Resolve { message, .. }
            | GluError::Runtime { message, .. } => Some(message),
            GluError::Io(_) | GluError::Utf8(_) => None,
        }
    }

    /// The token a parse, resolve or runtime error points at.
    pub fn token(&self) -> Option<&Token> {
        match self {
            GluError::Parse { token, .. }
            | GluError::Resolve { token, .. }
            | GluError::Runtime { token, .. } => Some(token),
            _ => None,
        }
    }

    /// Source position of a language error.
    pub fn position(&self) -> Option<&Source> {
        match self {
            GluError::Lex { position, .. } => Some(position),
            _ => self.token().map(|token| &token.source),
        }
    }
}

/// Crate‑wide `Result` alias.
pub type Result<T> = std::result::Result<T, GluError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenType;

    #[test]
    fn runtime_error_renders_token_and_message_in_braces() {
        let token = Token::new(TokenType::IDENTIFIER, "x", Source::new("", 1, 4, 1));
        let err = GluError::runtime(&token, "Undefined variable 'x'.");

        assert_eq!(err.to_string(), "{identifier 'x' 1:4, Undefined variable 'x'.}");
        assert_eq!(err.message(), Some("Undefined variable 'x'."));
        assert_eq!(err.token(), Some(&token));
    }

    #[test]
    fn lex_error_renders_position_in_place_of_token() {
        let err = GluError::lex(Source::new("repl", 2, 7, 1), "Unterminated string.");

        assert_eq!(err.to_string(), "{repl:2:7, Unterminated string.}");
        assert!(err.token().is_none());
        assert_eq!(err.position().map(|p| p.line), Some(2));
    }
}
