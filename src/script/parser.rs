//! Recursive-descent parser for Ship scripts
//!
//! The parser resolves variables and evaluates `if` gates while it reads, so
//! its output is a flat plan: tasks of a true branch are spliced in place and
//! a false branch is skipped without being evaluated.
//!
//! ```text
//! Script    := "ship" "{" Block "}" | Block
//! Block     := Directive*
//! Directive := "title" [":"] Expr
//!            | "var" "{" (Ident "=" Expr [","])* "}"
//!            | "if" Expr "{" Block "}"
//!            | TaskKeyword "{" (ArgName ":" Expr [","])* "}"
//!            | "$" Ident "{" ... "}"
//!            | UnknownIdent "{" ... "}"
//! Expr      := String | Number | Boolean | Null | Ident | "(" Expr ")"
//! ```

use crate::error::{SyntaxError, SyntaxResult};
use crate::runner::{CustomTask, Plan, Registry, Task};
use crate::script::lexer::tokenize;
use crate::script::token::{Token, TokenKind};
use crate::script::value::{Value, ValueMap};

/// Keyword of the optional top-level wrapper block
const SCRIPT_KEYWORD: &str = "ship";

/// Deepest allowed nesting of parentheses and taken `if` branches
pub const MAX_NESTING: usize = 256;

pub struct Parser<'r> {
    tokens: Vec<Token>,
    pos: usize,
    registry: &'r Registry,
    vars: ValueMap,
    plan: Plan,
    depth: usize,
}

impl<'r> Parser<'r> {
    pub fn new(mut tokens: Vec<Token>, registry: &'r Registry) -> Self {
        if !tokens.last().is_some_and(|t| t.is(TokenKind::Eof)) {
            let line = tokens.last().map(|t| t.line).unwrap_or(1);
            tokens.push(Token::eof(line));
        }
        Parser {
            tokens,
            pos: 0,
            registry,
            vars: ValueMap::new(),
            plan: Plan::new(),
            depth: 0,
        }
    }

    pub fn from_source(source: &str, registry: &'r Registry) -> Self {
        Self::new(tokenize(source), registry)
    }

    /// Variables defined so far
    pub fn variables(&self) -> &ValueMap {
        &self.vars
    }

    pub fn title(&self) -> &str {
        &self.plan.title
    }

    pub fn tasks(&self) -> &[Task] {
        &self.plan.tasks
    }

    pub fn into_plan(self) -> Plan {
        self.plan
    }

    /// Parse the whole token stream
    pub fn parse(&mut self) -> SyntaxResult<()> {
        let wrapped = {
            let first = self.current();
            first.is(TokenKind::Ident) && first.text == SCRIPT_KEYWORD
        };

        let tasks = if wrapped {
            self.advance();
            self.expect(TokenKind::LBrace)?;
            let tasks = self.parse_block_body()?;
            self.expect(TokenKind::RBrace)?;
            tasks
        } else {
            self.parse_block_body()?
        };

        let rest = self.current();
        if !rest.is(TokenKind::Eof) {
            return Err(SyntaxError::TrailingInput {
                found: rest.kind,
                line: rest.line,
            });
        }

        self.plan.tasks = tasks;
        Ok(())
    }

    fn current(&self) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[self.pos.min(last)]
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.current().is(kind)
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
    }

    fn expect(&mut self, kind: TokenKind) -> SyntaxResult<()> {
        let token = self.current();
        if !token.is(kind) {
            return Err(SyntaxError::Unexpected {
                expected: kind,
                found: token.kind,
                line: token.line,
            });
        }
        self.advance();
        Ok(())
    }

    fn enter(&mut self, line: usize) -> SyntaxResult<()> {
        if self.depth >= MAX_NESTING {
            return Err(SyntaxError::TooDeep { line });
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    fn resolve(&self, name: &str) -> Value {
        self.vars
            .get(name)
            .cloned()
            .unwrap_or_else(|| Value::Ident(name.to_string()))
    }

    fn parse_expression(&mut self) -> SyntaxResult<Value> {
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> SyntaxResult<Value> {
        let token = self.current().clone();
        self.advance();
        let value = match token.kind {
            TokenKind::String => Value::String(token.text),
            TokenKind::Number => Value::Number(token.number),
            TokenKind::Bool => Value::Boolean(token.boolean),
            TokenKind::Ident => self.resolve(&token.text),
            TokenKind::LParen => {
                self.enter(token.line)?;
                let inner = self.parse_expression()?;
                self.expect(TokenKind::RParen)?;
                self.leave();
                inner
            }
            // null, and any token that cannot start an expression
            _ => Value::Null,
        };
        Ok(value)
    }

    /// `{ name: expr, ... }` after a task keyword
    fn parse_task_args(&mut self) -> SyntaxResult<ValueMap> {
        let mut args = ValueMap::new();
        self.expect(TokenKind::LBrace)?;
        while !self.at(TokenKind::RBrace) {
            let key = self.current().clone();
            if !matches!(key.kind, TokenKind::Ident | TokenKind::String) {
                return Err(SyntaxError::ExpectedArgName {
                    found: key.kind,
                    line: key.line,
                });
            }
            self.advance();

            let colon = self.current();
            if !colon.is(TokenKind::Colon) {
                return Err(SyntaxError::ExpectedColon {
                    name: key.text,
                    found: colon.kind,
                    line: colon.line,
                });
            }
            self.advance();

            let value = self.parse_expression()?;
            args.set(key.text, value);
            if self.at(TokenKind::Comma) {
                self.advance();
            }
        }
        self.expect(TokenKind::RBrace)?;
        Ok(args)
    }

    /// `var { name = expr, ... }`; malformed entries are skipped token by token
    fn parse_var_block(&mut self) -> SyntaxResult<()> {
        self.expect(TokenKind::LBrace)?;
        while !self.at(TokenKind::RBrace) && !self.at(TokenKind::Eof) {
            if !self.at(TokenKind::Ident) {
                self.advance();
                continue;
            }
            let name = self.current().text.clone();
            self.advance();

            if !self.at(TokenKind::Equals) {
                self.advance();
                continue;
            }
            self.advance();

            let value = self.parse_expression()?;
            self.vars.set(name, value);
            if self.at(TokenKind::Comma) {
                self.advance();
            }
        }
        self.expect(TokenKind::RBrace)
    }

    /// Skip to the matching `}`; the opening brace must already be consumed
    fn skip_block(&mut self) {
        let mut depth = 1usize;
        while depth > 0 && !self.at(TokenKind::Eof) {
            match self.current().kind {
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => depth -= 1,
                _ => {}
            }
            self.advance();
        }
    }

    fn skip_braced_body(&mut self) {
        if self.at(TokenKind::LBrace) {
            self.advance();
            self.skip_block();
        }
    }

    fn parse_if(&mut self, line: usize) -> SyntaxResult<Vec<Task>> {
        let condition = self.parse_expression()?;
        self.expect(TokenKind::LBrace)?;
        if !condition.is_truthy() {
            self.skip_block();
            return Ok(Vec::new());
        }
        self.enter(line)?;
        let tasks = self.parse_block_body()?;
        if self.at(TokenKind::RBrace) {
            self.advance();
        }
        self.leave();
        Ok(tasks)
    }

    fn parse_block_body(&mut self) -> SyntaxResult<Vec<Task>> {
        let mut tasks = Vec::new();
        while !self.at(TokenKind::RBrace) && !self.at(TokenKind::Eof) {
            let token = self.current().clone();
            match token.kind {
                TokenKind::Ident => {
                    self.advance();
                    match token.text.as_str() {
                        "title" => {
                            if self.at(TokenKind::Colon) {
                                self.advance();
                            }
                            if let Some(title) = self.parse_expression()?.as_text() {
                                self.plan.title = title;
                            }
                        }
                        "var" => self.parse_var_block()?,
                        "if" => tasks.extend(self.parse_if(token.line)?),
                        keyword => match self.registry.lookup(keyword) {
                            Some(handler) => {
                                let args = self.parse_task_args()?;
                                tasks.push(Task::new(
                                    keyword,
                                    self.registry.display_name_of(keyword),
                                    args,
                                    token.line,
                                    handler,
                                ));
                            }
                            None => self.skip_braced_body(),
                        },
                    }
                }
                TokenKind::Custom => {
                    self.advance();
                    self.skip_braced_body();
                    self.plan.custom.push(CustomTask {
                        name: token.text,
                        line: token.line,
                    });
                }
                _ => self.advance(),
            }
        }
        Ok(tasks)
    }
}

/// Parse a script into a plan
pub fn parse_script(source: &str, registry: &Registry) -> SyntaxResult<Plan> {
    let mut parser = Parser::from_source(source, registry);
    parser.parse()?;
    Ok(parser.into_plan())
}
