//! mongrate - relational-to-document translation engine
//!
//! Translates a constrained SQL dialect (single-table SELECT, optional
//! single JOIN, boolean WHERE, aggregate group functions) into MongoDB
//! queries, and converts relational rows into nested documents by
//! following foreign-key references.
//!
//! ## Architecture
//! - SQL front end: lexer + recursive-descent parser producing a
//!   `Statement` AST
//! - Schema context: primary keys, foreign-key references and column sets,
//!   read once per connection and immutable afterwards
//! - Translator: compiles a statement into a find (filter + projection) or
//!   an aggregation pipeline
//! - Embedder: builds nested documents from flat rows along chosen
//!   foreign-key references
//! - Generation + shell: validator/index documents and mongosh command
//!   text for the produced queries

pub mod document;
pub mod embed;
pub mod generate;
pub mod schema;
pub mod shell;
pub mod sql;
pub mod translate;

mod error;

#[cfg(test)]
pub(crate) mod testutil;

pub use document::{Document, Value};
pub use embed::{Embedder, Row, RowSource};
pub use error::{Error, Result};
pub use schema::{Reference, SchemaContext, SchemaSpec};
pub use sql::{parse, parse_bool_expr, Statement};
pub use translate::{FindQuery, Translator};

/// Parse a statement and translate it against a schema, choosing the query
/// shape from the statement itself. Returns the rendered mongosh command.
pub fn translate_sql(schema: &SchemaContext, sql: &str) -> Result<String> {
    let stmt = parse(sql)?;
    let translator = Translator::new(schema);

    if stmt.is_aggregate() {
        let pipeline = translator.to_aggregate(&stmt)?;
        Ok(shell::aggregate_command(&stmt.from_table, &pipeline))
    } else {
        let query = translator.to_find(&stmt)?;
        Ok(shell::find_command(&stmt.from_table, &query))
    }
}
