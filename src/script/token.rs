//! Token types produced by the lexer

use std::fmt;

/// Kind of a lexical token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    LBrace,
    RBrace,
    LParen,
    RParen,
    Colon,
    Comma,
    /// Single `=` used in `var` blocks
    Equals,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    Not,
    Ident,
    /// `$name`, text holds the name without the sigil
    Custom,
    String,
    Number,
    Bool,
    Null,
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::Colon => "':'",
            TokenKind::Comma => "','",
            TokenKind::Equals => "'='",
            TokenKind::Eq => "'=='",
            TokenKind::Ne => "'!='",
            TokenKind::Lt => "'<'",
            TokenKind::Le => "'<='",
            TokenKind::Gt => "'>'",
            TokenKind::Ge => "'>='",
            TokenKind::And => "'&&'",
            TokenKind::Or => "'||'",
            TokenKind::Not => "'!'",
            TokenKind::Ident => "identifier",
            TokenKind::Custom => "custom task",
            TokenKind::String => "string",
            TokenKind::Number => "number",
            TokenKind::Bool => "boolean",
            TokenKind::Null => "null",
            TokenKind::Eof => "end of input",
        };
        f.write_str(s)
    }
}

/// A lexical token with its source line
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,

    /// Literal text (operator text, identifier, unescaped string contents)
    pub text: String,

    /// Parsed value for `Number` tokens
    pub number: f64,

    /// Parsed value for `Bool` tokens
    pub boolean: bool,

    /// 1-based source line
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize) -> Self {
        Token {
            kind,
            text: text.into(),
            number: 0.0,
            boolean: false,
            line,
        }
    }

    pub fn number(value: f64, line: usize) -> Self {
        Token {
            number: value,
            ..Token::new(TokenKind::Number, "", line)
        }
    }

    pub fn boolean(value: bool, line: usize) -> Self {
        Token {
            boolean: value,
            ..Token::new(TokenKind::Bool, "", line)
        }
    }

    pub fn eof(line: usize) -> Self {
        Token::new(TokenKind::Eof, "", line)
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}
