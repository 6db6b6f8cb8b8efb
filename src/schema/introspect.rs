//! Introspection seam between a relational connection and the schema
//! context.
//!
//! A `SchemaSource` yields the flat rows a catalog query would return; the
//! context builder in `super` assembles them. The trait is synchronous and
//! read once at connection time.

use crate::error::Result;

/// One row of a foreign-key catalog query. Rows must arrive ordered and
/// grouped by constraint name so composite keys assemble correctly.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceRow {
    pub constraint_name: String,
    pub referencing_table: String,
    pub referencing_column: String,
    pub referenced_table: String,
    pub referenced_column: String,
}

/// One check condition for a table, ordered by table so conditions on the
/// same table are adjacent.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckRow {
    pub table: String,
    pub condition: String,
}

/// One column of a unique constraint, ordered and grouped by constraint
/// name.
#[derive(Debug, Clone, PartialEq)]
pub struct UniqueRow {
    pub constraint_name: String,
    pub table: String,
    pub column: String,
}

/// Read access to a relational schema catalog.
///
/// Implementations wrap a live connection; tests use in-memory fixtures.
pub trait SchemaSource {
    fn tables(&self) -> Result<Vec<String>>;

    /// `(table, column)` pairs for every primary-key column.
    fn primary_key_columns(&self) -> Result<Vec<(String, String)>>;

    /// Foreign-key rows, ordered by constraint name.
    fn reference_rows(&self) -> Result<Vec<ReferenceRow>>;

    /// `(table, column)` pairs for every column of every table.
    fn table_columns(&self) -> Result<Vec<(String, String)>>;

    /// Check-constraint rows, ordered by table.
    fn check_rows(&self) -> Result<Vec<CheckRow>> {
        Ok(Vec::new())
    }

    /// Unique-constraint rows, ordered by constraint name.
    fn unique_rows(&self) -> Result<Vec<UniqueRow>> {
        Ok(Vec::new())
    }
}
