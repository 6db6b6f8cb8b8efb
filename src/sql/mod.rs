//! SQL front end
//!
//! A small compiler front end for the supported dialect:
//! - Lexer: tokenizes SQL text (lenient, never fails)
//! - Parser: recursive descent over tokens, building the statement AST
//!
//! Translation of the AST into MongoDB queries lives in `crate::translate`.

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod token;

pub use ast::{BoolOp, BooleanExpr, Column, CompareOp, Join, Statement};
pub use lexer::Lexer;
pub use parser::Parser;
pub use token::{Token, TokenKind};

use crate::error::Result;

/// Parse one SQL statement.
pub fn parse(sql: &str) -> Result<Statement> {
    let tokens = Lexer::new(sql).tokenize();
    Parser::new(tokens).parse_statement()
}

/// Parse a standalone boolean expression, e.g. a stored check condition.
pub fn parse_bool_expr(sql: &str) -> Result<BooleanExpr> {
    let tokens = Lexer::new(sql).tokenize();
    Parser::new(tokens).parse_bool_expr_only()
}
