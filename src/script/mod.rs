//! Ship script front end
//!
//! This module turns script text into a resolved build plan: lexing,
//! value resolution, parsing and script file discovery.

pub mod lexer;
pub mod load;
pub mod parser;
pub mod token;
pub mod value;

// Re-export main types
pub use lexer::{tokenize, Lexer};
pub use load::*;
pub use parser::{parse_script, Parser};
pub use token::{Token, TokenKind};
pub use value::{Value, ValueMap};
