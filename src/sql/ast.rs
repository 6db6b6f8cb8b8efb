//! Abstract syntax tree for the SQL subset
use crate::document::Value;

/// A selected column, optionally wrapped in a group function.
///
/// `SELECT SUM(POP)` records `name = "POP"`, `group_function = Some("SUM")`.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub group_function: Option<String>,
}

impl Column {
    pub fn plain(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            group_function: None,
        }
    }

    pub fn grouped(name: impl Into<String>, function: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            group_function: Some(function.into()),
        }
    }
}

/// The single equality join a statement may carry:
/// `JOIN table ON from_attr = to_attr`.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub table: String,
    pub from_attr: String,
    pub to_attr: String,
}

/// One parsed SELECT statement.
///
/// `SELECT *` leaves `select_columns` empty; a missing WHERE clause is
/// `BooleanExpr::Empty`.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub select_columns: Vec<Column>,
    pub from_table: String,
    pub join: Option<Join>,
    pub where_clause: BooleanExpr,
}

impl Statement {
    /// True iff the statement needs an aggregation pipeline rather than a
    /// find: a join is present or any selected column is grouped.
    pub fn is_aggregate(&self) -> bool {
        self.join.is_some()
            || self
                .select_columns
                .iter()
                .any(|c| c.group_function.is_some())
    }
}

/// The six comparison operators of the dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl CompareOp {
    /// Recognizes the SQL spelling of an operator; anything else is not an
    /// operator of the dialect.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "=" => Some(CompareOp::Eq),
            "<>" => Some(CompareOp::Ne),
            ">" => Some(CompareOp::Gt),
            ">=" => Some(CompareOp::Ge),
            "<" => Some(CompareOp::Lt),
            "<=" => Some(CompareOp::Le),
            _ => None,
        }
    }
}

/// Boolean connective of a composite expression. One composite level is
/// joined by exactly one connective; mixing requires parentheses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOp {
    And,
    Or,
}

impl BoolOp {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        if keyword.eq_ignore_ascii_case("AND") {
            Some(BoolOp::And)
        } else if keyword.eq_ignore_ascii_case("OR") {
            Some(BoolOp::Or)
        } else {
            None
        }
    }
}

/// A WHERE expression tree. The variant set is closed; compilation in the
/// translator is an exhaustive match over it.
#[derive(Debug, Clone, PartialEq)]
pub enum BooleanExpr {
    /// Always true (no WHERE clause).
    Empty,
    /// `id op value`, also produced by `id IS [NOT] NULL`.
    Comparison {
        id: String,
        op: CompareOp,
        value: Value,
    },
    /// `id [NOT] IN (v1, v2, ...)`.
    InComparison {
        id: String,
        negated: bool,
        values: Vec<Value>,
    },
    /// Children joined by a single connective.
    Composite {
        op: BoolOp,
        children: Vec<BooleanExpr>,
    },
}
