use log::debug;
use serde::Serialize;
use std::fmt;

/// The closed set of token categories produced by the glu scanner.
///
/// Literal categories (`IDENTIFIER`, `STRING`, `NUMBER`) carry no payload: the
/// raw text lives in [`Token::lexeme`] and is interpreted by later passes.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenType {
    /// '('
    LEFT_PAREN,

    /// ')'
    RIGHT_PAREN,

    /// '{'
    LEFT_BRACE,

    /// '}'
    RIGHT_BRACE,

    /// ','
    COMMA,

    /// '.'
    DOT,

    /// ';'
    SEMICOLON,

    /// '-'
    MINUS,

    /// '+'
    PLUS,

    /// '/'
    SLASH,

    /// '*'
    STAR,

    /// '!'
    BANG,

    /// '!='
    BANG_EQUAL,

    /// '='
    EQUAL,

    /// '=='
    EQUAL_EQUAL,

    /// '>'
    GREATER,

    /// '>='
    GREATER_EQUAL,

    /// '<'
    LESS,

    /// '<='
    LESS_EQUAL,

    /// A user‑defined name
    IDENTIFIER,

    /// A string literal; the lexeme holds the contents without quotes
    STRING,

    /// A numeric literal; the lexeme holds the digits as written
    NUMBER,

    /// 'nil'
    NIL,

    /// 'true'
    TRUE,

    /// 'false'
    FALSE,

    /// 'and'
    AND,

    /// 'or'
    OR,

    /// 'if'
    IF,

    /// 'else'
    ELSE,

    /// 'while'
    WHILE,

    /// 'for'
    FOR,

    /// 'return'
    RETURN,

    /// 'var'
    VAR,

    /// 'func'
    FUNC,

    /// 'log'
    LOG,

    /// End‑of‑stream marker
    EOF,
}

impl TokenType {
    /// The stable textual name of this category.
    pub const fn as_str(self) -> &'static str {
        match self {
            TokenType::LEFT_PAREN => "(",
            TokenType::RIGHT_PAREN => ")",
            TokenType::LEFT_BRACE => "{",
            TokenType::RIGHT_BRACE => "}",
            TokenType::COMMA => ",",
            TokenType::DOT => ".",
            TokenType::SEMICOLON => ";",
            TokenType::MINUS => "-",
            TokenType::PLUS => "+",
            TokenType::SLASH => "/",
            TokenType::STAR => "*",
            TokenType::BANG => "!",
            TokenType::BANG_EQUAL => "!=",
            TokenType::EQUAL => "=",
            TokenType::EQUAL_EQUAL => "==",
            TokenType::GREATER => ">",
            TokenType::GREATER_EQUAL => ">=",
            TokenType::LESS => "<",
            TokenType::LESS_EQUAL => "<=",
            TokenType::IDENTIFIER => "identifier",
            TokenType::STRING => "string",
            TokenType::NUMBER => "number",
            TokenType::NIL => "nil",
            TokenType::TRUE => "true",
            TokenType::FALSE => "false",
            TokenType::AND => "and",
            TokenType::OR => "or",
            TokenType::IF => "if",
            TokenType::ELSE => "else",
            TokenType::WHILE => "while",
            TokenType::FOR => "for",
            TokenType::RETURN => "return",
            TokenType::VAR => "var",
            TokenType::FUNC => "func",
            TokenType::LOG => "log",
            TokenType::EOF => "EOF",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a lexeme was found.
///
/// `line` is 1‑based, `column` is the 0‑based character offset of the first
/// character of the lexeme within its line, `length` counts characters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Source {
    /// Name of the file or stream the text came from (may be empty).
    pub origin: String,
    pub line: usize,
    pub column: usize,
    pub length: usize,
}

impl Source {
    pub fn new(origin: &str, line: usize, column: usize, length: usize) -> Self {
        Self {
            origin: origin.to_owned(),
            line,
            column,
            length,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.origin.is_empty() {
            write!(f, "{}:{}", self.line, self.column)
        } else {
            write!(f, "{}:{}:{}", self.origin, self.line, self.column)
        }
    }
}

/// A scanned token: its category, the text that produced it and its position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub token_type: TokenType,
    pub lexeme: String,
    pub source: Source,
}

impl Token {
    /// Create a new token.
    pub fn new(token_type: TokenType, lexeme: impl Into<String>, source: Source) -> Self {
        let lexeme: String = lexeme.into();

        debug!(
            "Creating token: type={:?}, lexeme={}, at {}",
            token_type, lexeme, source
        );

        Self {
            token_type,
            lexeme,
            source,
        }
    }

    /// A token of another category sharing this token's position. Used when the
    /// parser lowers sugar into nodes that have no source text of their own.
    pub fn synthetic(&self, token_type: TokenType, lexeme: &str) -> Self {
        Self {
            token_type,
            lexeme: lexeme.to_owned(),
            source: self.source.clone(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}' {}", self.token_type, self.lexeme, self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_category_lexeme_and_position() {
        let token = Token::new(TokenType::IDENTIFIER, "answer", Source::new("", 3, 4, 6));

        assert_eq!(token.to_string(), "identifier 'answer' 3:4");
    }

    #[test]
    fn display_prefixes_origin_when_present() {
        let token = Token::new(TokenType::EOF, "", Source::new("main.glu", 1, 0, 0));

        assert_eq!(token.to_string(), "EOF '' main.glu:1:0");
    }
}
