//! Statement translation into MongoDB queries
//!
//! A `Statement` compiles into one of two shapes, selected by
//! `Statement::is_aggregate`:
//! - find: a filter + projection pair, when there is no join and no group
//!   function
//! - aggregate: an ordered pipeline of stage documents, otherwise
//!
//! Field names are resolved against the `SchemaContext` so primary-key
//! columns land where the embedder puts them (`_id.<column>`).

mod aggregate;
mod filter;
mod find;

use crate::document::Document;
use crate::schema::SchemaContext;

/// A find query: filter plus field projection against one collection.
#[derive(Debug, Clone, PartialEq)]
pub struct FindQuery {
    pub filter: Document,
    pub projection: Document,
}

/// Compiles statements against one schema generation.
pub struct Translator<'a> {
    schema: &'a SchemaContext,
}

impl<'a> Translator<'a> {
    pub fn new(schema: &'a SchemaContext) -> Self {
        Self { schema }
    }

    /// Compiles a standalone boolean expression into a filter document,
    /// e.g. for check-constraint validators. `join_table` participates in
    /// field resolution exactly as in statement translation.
    pub fn compile_filter(
        &self,
        expr: &crate::sql::BooleanExpr,
        from_table: &str,
        join_table: Option<&str>,
    ) -> Document {
        filter::compile(self.schema, expr, from_table, join_table)
    }
}
