//! SQL parser - converts tokens into the statement AST
//!
//! A recursive descent parser with one token of lookahead. Every grammar
//! rule reports its own failure so errors name the clause that broke
//! (SELECT, FROM, JOIN, WHERE, boolean expression, trailing input).

use super::ast::*;
use super::token::{Token, TokenKind};
use crate::document::Value;
use crate::error::{Error, Result};

pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, position: 0 }
    }

    /// Parse a full statement:
    /// `SELECT Columns FROM <id> [JOIN <id> ON <id> = <id>] [WHERE BoolExpr] [;]`
    pub fn parse_statement(&mut self) -> Result<Statement> {
        self.expect_keyword("SELECT")?;
        let select_columns = self.parse_columns()?;

        self.expect_keyword("FROM")?;
        let from_table = self.parse_identifier("FROM")?;

        let join = if self.match_keyword("JOIN") {
            Some(self.parse_join()?)
        } else {
            None
        };

        let where_clause = if self.match_keyword("WHERE") {
            self.parse_bool_expr()?
        } else {
            BooleanExpr::Empty
        };

        self.match_punct(";");
        self.expect_end()?;

        Ok(Statement {
            select_columns,
            from_table,
            join,
            where_clause,
        })
    }

    /// Parse a bare boolean expression (no SELECT/FROM), consuming all
    /// input. Used for standalone condition strings such as stored check
    /// constraints.
    pub fn parse_bool_expr_only(&mut self) -> Result<BooleanExpr> {
        let expr = self.parse_bool_expr()?;
        self.match_punct(";");
        self.expect_end()?;
        Ok(expr)
    }

    /// Columns -> "*" | ColumnItem ("," ColumnItem)*
    ///
    /// A bare `*` selects everything and yields an empty column list.
    fn parse_columns(&mut self) -> Result<Vec<Column>> {
        if self.match_punct("*") {
            return Ok(Vec::new());
        }

        let mut columns = vec![self.parse_column_item()?];
        while self.match_punct(",") {
            columns.push(self.parse_column_item()?);
        }

        Ok(columns)
    }

    /// ColumnItem -> <id> [ "(" <id> ")" ]
    ///
    /// The trailing parenthesized form is a group function application: the
    /// outer identifier is the function, the inner one the column. `*` is
    /// accepted as the inner name so `COUNT(*)` parses.
    fn parse_column_item(&mut self) -> Result<Column> {
        let name = self.parse_identifier("SELECT")?;

        if !self.match_punct("(") {
            return Ok(Column::plain(name));
        }

        let token = self.current().clone();
        let inner = match token.kind {
            TokenKind::Ident => token.text,
            TokenKind::Punct if token.text == "*" => token.text,
            _ => return Err(self.error("expected column name inside group function")),
        };
        self.advance();
        self.expect_punct(")", "SELECT")?;

        Ok(Column::grouped(inner, name))
    }

    /// Join -> <id> ON <id> "=" <id>  (the JOIN keyword is already consumed)
    fn parse_join(&mut self) -> Result<Join> {
        let table = self.parse_identifier("JOIN")?;
        self.expect_keyword("ON")?;
        let from_attr = self.parse_identifier("JOIN")?;
        self.expect_punct("=", "JOIN")?;
        let to_attr = self.parse_identifier("JOIN")?;

        Ok(Join {
            table,
            from_attr,
            to_attr,
        })
    }

    /// BoolExpr -> CompExpr ( (AND|OR) CompExpr )*
    ///
    /// The first connective locks the operator for the level; mixing AND
    /// and OR without parentheses is an error.
    fn parse_bool_expr(&mut self) -> Result<BooleanExpr> {
        let first = self.parse_comp_expr()?;

        if self.at_bool_expr_end() {
            return Ok(first);
        }

        let mut op = None;
        let mut children = vec![first];

        loop {
            let token = self.current();
            let token_op = match token.kind {
                TokenKind::Ident => BoolOp::from_keyword(&token.text),
                _ => None,
            };
            let Some(token_op) = token_op else {
                return Err(self.error("expected AND or OR in boolean expression"));
            };

            match op {
                None => op = Some(token_op),
                Some(locked) if locked != token_op => {
                    return Err(self.error(
                        "mixing AND and OR at the same level requires parentheses",
                    ));
                }
                Some(_) => {}
            }
            self.advance();

            children.push(self.parse_comp_expr()?);

            if self.at_bool_expr_end() {
                return Ok(BooleanExpr::Composite {
                    op: op.expect("at least one connective was consumed"),
                    children,
                });
            }
        }
    }

    /// CompExpr -> "(" BoolExpr ")" | InCompExpr | SimpleCompExpr
    fn parse_comp_expr(&mut self) -> Result<BooleanExpr> {
        if self.match_punct("(") {
            let expr = self.parse_bool_expr()?;
            self.expect_punct(")", "boolean expression")?;
            return Ok(expr);
        }

        let id = self.parse_identifier("boolean expression")?;

        let token = self.current();
        if token.is_keyword("IS") {
            self.advance();
            return self.parse_is_null(id);
        }
        if token.is_keyword("NOT") || token.is_keyword("IN") {
            return self.parse_in_comp(id);
        }
        if token.kind == TokenKind::Punct {
            if let Some(op) = CompareOp::from_symbol(&token.text) {
                self.advance();
                let value = self.parse_value()?;
                return Ok(BooleanExpr::Comparison { id, op, value });
            }
        }

        Err(self.error("expected comparison operator in boolean expression"))
    }

    /// `IS [NOT] NULL` parses to an equality/inequality comparison against
    /// null, which is exactly what the filter compiler needs.
    fn parse_is_null(&mut self, id: String) -> Result<BooleanExpr> {
        let negated = self.match_keyword("NOT");
        self.expect_keyword("NULL")?;

        Ok(BooleanExpr::Comparison {
            id,
            op: if negated { CompareOp::Ne } else { CompareOp::Eq },
            value: Value::Null,
        })
    }

    /// InCompExpr -> [NOT] IN "(" Value ("," Value)* ")"
    fn parse_in_comp(&mut self, id: String) -> Result<BooleanExpr> {
        let negated = self.match_keyword("NOT");
        self.expect_keyword("IN")?;
        self.expect_punct("(", "IN list")?;

        let mut values = vec![self.parse_value()?];
        while self.match_punct(",") {
            values.push(self.parse_value()?);
        }

        self.expect_punct(")", "IN list")?;

        Ok(BooleanExpr::InComparison {
            id,
            negated,
            values,
        })
    }

    /// A comparison value is an identifier-like or integer token, typed by
    /// `literal_value`.
    fn parse_value(&mut self) -> Result<Value> {
        let token = self.current();
        match token.kind {
            TokenKind::Ident | TokenKind::Int => {
                let value = literal_value(&token.text);
                self.advance();
                Ok(value)
            }
            _ => Err(self.error("expected value in comparison")),
        }
    }

    // Helper methods

    fn at_bool_expr_end(&self) -> bool {
        let token = self.current();
        token.kind == TokenKind::Eof || token.is_punct(";") || token.is_punct(")")
    }

    fn parse_identifier(&mut self, rule: &str) -> Result<String> {
        let token = self.current();
        if token.kind == TokenKind::Ident {
            let name = token.text.clone();
            self.advance();
            Ok(name)
        } else {
            Err(self.error(&format!("expected identifier in {rule}")))
        }
    }

    fn current(&self) -> &Token {
        &self.tokens[self.position]
    }

    fn advance(&mut self) {
        if self.position < self.tokens.len() - 1 {
            self.position += 1;
        }
    }

    fn match_keyword(&mut self, keyword: &str) -> bool {
        if self.current().is_keyword(keyword) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn match_punct(&mut self, punct: &str) -> bool {
        if self.current().is_punct(punct) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<()> {
        if self.match_keyword(keyword) {
            Ok(())
        } else {
            Err(self.error(&format!("expected {keyword}")))
        }
    }

    fn expect_punct(&mut self, punct: &str, rule: &str) -> Result<()> {
        if self.match_punct(punct) {
            Ok(())
        } else {
            Err(self.error(&format!("expected '{punct}' in {rule}")))
        }
    }

    fn expect_end(&mut self) -> Result<()> {
        if self.current().kind == TokenKind::Eof {
            Ok(())
        } else {
            Err(self.error("there is trailing input"))
        }
    }

    fn error(&self, msg: &str) -> Error {
        let token = self.current();
        if token.kind == TokenKind::Eof {
            Error::Parse(format!("{} at end of input", msg))
        } else {
            Error::Parse(format!(
                "{} at line {} column {} (near '{}')",
                msg, token.line, token.column, token.text
            ))
        }
    }
}

/// Types a literal token: the NULL keyword becomes null, an integer parse
/// wins next, a quote-bounded token becomes text with the quotes stripped,
/// and anything else is kept as raw text.
pub fn literal_value(text: &str) -> Value {
    if text.eq_ignore_ascii_case("NULL") {
        return Value::Null;
    }

    if let Ok(v) = text.parse::<i64>() {
        return Value::Int(v);
    }

    let bytes = text.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        let last = bytes[bytes.len() - 1];
        if (first == b'\'' || first == b'"') && last == first {
            return Value::Text(text[1..text.len() - 1].to_string());
        }
    }

    Value::Text(text.to_string())
}
