//! Lexer for Ship scripts
//!
//! Turns script text into tokens. Lexing never fails: unknown characters are
//! dropped and unterminated strings or block comments run to end of input.

use crate::script::token::{Token, TokenKind};

/// Two-character operators, matched before their one-character prefixes
const TWO_CHAR_OPS: &[(&str, TokenKind)] = &[
    ("==", TokenKind::Eq),
    ("!=", TokenKind::Ne),
    ("<=", TokenKind::Le),
    (">=", TokenKind::Ge),
    ("&&", TokenKind::And),
    ("||", TokenKind::Or),
];

/// Streaming lexer over a script
pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    col: usize,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Lexer {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    /// Current character offset
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Current 1-based line
    pub fn line(&self) -> usize {
        self.line
    }

    /// Current 1-based column
    pub fn column(&self) -> usize {
        self.col
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek(0) {
            if c == '\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
            self.pos += 1;
        }
    }

    fn advance_by(&mut self, n: usize) {
        for _ in 0..n {
            self.advance();
        }
    }

    fn skip_to_line_end(&mut self) {
        while let Some(c) = self.peek(0) {
            if c == '\n' {
                break;
            }
            self.advance();
        }
    }

    /// Skip whitespace and `//`, `/* */`, `#` comments
    fn skip_trivia(&mut self) {
        while let Some(c) = self.peek(0) {
            match (c, self.peek(1)) {
                (' ' | '\t' | '\n' | '\r', _) => self.advance(),
                ('/', Some('/')) | ('#', _) => self.skip_to_line_end(),
                ('/', Some('*')) => {
                    self.advance_by(2);
                    while !self.at_end() {
                        if self.peek(0) == Some('*') && self.peek(1) == Some('/') {
                            self.advance_by(2);
                            break;
                        }
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    fn read_string(&mut self, quote: char) -> String {
        self.advance();
        let mut out = String::new();
        while let Some(c) = self.peek(0) {
            if c == quote {
                self.advance();
                break;
            }
            if c == '\\' {
                self.advance();
                match self.peek(0) {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some(other) => out.push(other),
                    None => break,
                }
                self.advance();
            } else {
                out.push(c);
                self.advance();
            }
        }
        out
    }

    fn read_ident(&mut self) -> String {
        let mut out = String::new();
        while let Some(c) = self.peek(0) {
            if is_ident_char(c) {
                out.push(c);
                self.advance();
            } else {
                break;
            }
        }
        out
    }

    fn read_number(&mut self, line: usize) -> Token {
        let negative = self.peek(0) == Some('-');
        if negative {
            self.advance();
        }
        let mut digits = String::new();
        while let Some(c) = self.peek(0) {
            if c.is_ascii_digit() || c == '.' {
                digits.push(c);
                self.advance();
            } else {
                break;
            }
        }
        let magnitude = parse_number_prefix(&digits);
        let mut token = Token::number(if negative { -magnitude } else { magnitude }, line);
        token.text = if negative { format!("-{}", digits) } else { digits };
        token
    }

    /// Produce the next token; returns `Eof` forever once input is exhausted
    pub fn next_token(&mut self) -> Token {
        loop {
            self.skip_trivia();
            let line = self.line;

            let c = match self.peek(0) {
                Some(c) => c,
                None => return Token::eof(line),
            };
            let n = self.peek(1);

            if let Some(next) = n {
                let pair: String = [c, next].iter().collect();
                if let Some((text, kind)) = TWO_CHAR_OPS.iter().find(|(op, _)| *op == pair) {
                    self.advance_by(2);
                    return Token::new(*kind, *text, line);
                }
            }

            let single = match c {
                '{' => Some(TokenKind::LBrace),
                '}' => Some(TokenKind::RBrace),
                '(' => Some(TokenKind::LParen),
                ')' => Some(TokenKind::RParen),
                ':' => Some(TokenKind::Colon),
                ',' => Some(TokenKind::Comma),
                '=' => Some(TokenKind::Equals),
                '<' => Some(TokenKind::Lt),
                '>' => Some(TokenKind::Gt),
                '!' => Some(TokenKind::Not),
                _ => None,
            };
            if let Some(kind) = single {
                self.advance();
                return Token::new(kind, c.to_string(), line);
            }

            if c == '"' || c == '\'' {
                let text = self.read_string(c);
                return Token::new(TokenKind::String, text, line);
            }

            if c == '$' {
                self.advance();
                let name = self.read_ident();
                return Token::new(TokenKind::Custom, name, line);
            }

            if c.is_ascii_digit() || (c == '-' && n.is_some_and(|d| d.is_ascii_digit())) {
                return self.read_number(line);
            }

            if c.is_ascii_alphabetic() || c == '_' {
                let ident = self.read_ident();
                return match ident.as_str() {
                    "true" | "True" => Token::boolean(true, line),
                    "false" | "False" => Token::boolean(false, line),
                    "null" | "none" => Token::new(TokenKind::Null, "", line),
                    _ => Token::new(TokenKind::Ident, ident, line),
                };
            }

            // Unrecognized character
            self.advance();
        }
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '/')
}

/// Parse the longest leading float in a digit/dot run, e.g. `1.2.3` reads as 1.2
fn parse_number_prefix(digits: &str) -> f64 {
    let end = digits
        .char_indices()
        .filter(|(_, c)| *c == '.')
        .nth(1)
        .map(|(i, _)| i)
        .unwrap_or(digits.len());
    digits[..end].parse().unwrap_or(0.0)
}

/// Tokenize a whole script; the result always ends with a single `Eof` token
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token();
        let done = token.is(TokenKind::Eof);
        tokens.push(token);
        if done {
            return tokens;
        }
    }
}
