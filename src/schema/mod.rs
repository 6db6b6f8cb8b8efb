//! Schema metadata captured once per relational connection
//!
//! The `SchemaContext` is the shared substrate every translation and
//! embedding call reads: primary keys per table, foreign-key references,
//! column membership, and the check/unique constraints used for
//! generation. It is immutable after construction; reconnection builds a
//! new context and swaps it, it never mutates one in place.
//!
//! Table names are matched case-insensitively against the catalog's
//! canonical casing; column checks are case-insensitive too, but
//! `to_document_id` keeps the caller's spelling in its output.

pub mod introspect;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::error::Result;
pub use introspect::{CheckRow, ReferenceRow, SchemaSource, UniqueRow};

/// A foreign-key constraint from a referencing table and columns to a
/// referenced table and columns. Composite keys keep their columns in
/// catalog order, positionally paired.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    pub constraint_name: String,
    pub referencing_table: String,
    pub referencing_columns: Vec<String>,
    pub referenced_table: String,
    pub referenced_columns: Vec<String>,
}

/// All check conditions of one table, concatenated into a single condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckConstraint {
    pub table: String,
    pub condition: String,
}

/// A unique constraint over one or more columns of a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniqueConstraint {
    pub constraint_name: String,
    pub table: String,
    pub columns: Vec<String>,
}

/// Declarative form of a schema, for configuration files and tests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaSpec {
    pub tables: Vec<TableSpec>,
    #[serde(default)]
    pub references: Vec<Reference>,
    #[serde(default)]
    pub checks: Vec<CheckConstraint>,
    #[serde(default)]
    pub uniques: Vec<UniqueConstraint>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableSpec {
    pub name: String,
    pub columns: Vec<String>,
    #[serde(default)]
    pub primary_key: Vec<String>,
}

/// Read-only schema metadata for one connection generation.
#[derive(Debug, Clone, Default)]
pub struct SchemaContext {
    tables: Vec<String>,
    /// keyed by uppercase table name
    primary_keys: AHashMap<String, Vec<String>>,
    /// keyed by uppercase table name
    columns: AHashMap<String, Vec<String>>,
    references: Vec<Reference>,
    checks: Vec<CheckConstraint>,
    uniques: Vec<UniqueConstraint>,
}

impl SchemaContext {
    /// Builds the context by running every catalog query of `source` once.
    pub fn load(source: &dyn SchemaSource) -> Result<Self> {
        let tables = source.tables()?;

        let mut primary_keys: AHashMap<String, Vec<String>> = AHashMap::new();
        for (table, column) in source.primary_key_columns()? {
            primary_keys.entry(table.to_uppercase()).or_default().push(column);
        }

        let mut columns: AHashMap<String, Vec<String>> = AHashMap::new();
        for (table, column) in source.table_columns()? {
            columns.entry(table.to_uppercase()).or_default().push(column);
        }

        Ok(Self {
            tables,
            primary_keys,
            columns,
            references: group_references(source.reference_rows()?),
            checks: concat_checks(source.check_rows()?),
            uniques: group_uniques(source.unique_rows()?),
        })
    }

    /// Builds the context from a declarative description.
    pub fn from_spec(spec: SchemaSpec) -> Self {
        let mut tables = Vec::new();
        let mut primary_keys = AHashMap::new();
        let mut columns = AHashMap::new();

        for table in spec.tables {
            let key = table.name.to_uppercase();
            if !table.primary_key.is_empty() {
                primary_keys.insert(key.clone(), table.primary_key);
            }
            columns.insert(key, table.columns);
            tables.push(table.name);
        }

        Self {
            tables,
            primary_keys,
            columns,
            references: spec.references,
            checks: spec.checks,
            uniques: spec.uniques,
        }
    }

    /// Builds the context from the JSON form of a `SchemaSpec`.
    pub fn from_json(text: &str) -> Result<Self> {
        let spec: SchemaSpec = serde_json::from_str(text)?;
        Ok(Self::from_spec(spec))
    }

    pub fn tables(&self) -> &[String] {
        &self.tables
    }

    pub fn references(&self) -> &[Reference] {
        &self.references
    }

    pub fn checks(&self) -> &[CheckConstraint] {
        &self.checks
    }

    pub fn uniques(&self) -> &[UniqueConstraint] {
        &self.uniques
    }

    /// True iff `column` is a primary-key column of `table`. Unknown tables
    /// and columns are simply not keys; lookups never error.
    pub fn is_primary_key(&self, table: &str, column: &str) -> bool {
        self.is_primary_key_any(&[table], column)
    }

    /// Candidate-set form of `is_primary_key`: true if `column` is a key of
    /// any of the tables, first match wins. Every key lookup funnels
    /// through here; the single-table operations pass a one-element set.
    pub fn is_primary_key_any(&self, tables: &[&str], column: &str) -> bool {
        tables.iter().any(|t| {
            self.primary_keys
                .get(&t.to_uppercase())
                .is_some_and(|cols| cols.iter().any(|c| c.eq_ignore_ascii_case(column)))
        })
    }

    /// Remaps a column to its document field: `"_id." + column` if it is a
    /// primary-key column of `table`, the column unchanged otherwise. The
    /// returned name keeps the caller's spelling.
    pub fn to_document_id(&self, table: &str, column: &str) -> String {
        self.to_document_id_any(&[table], column)
    }

    /// Candidate-set form of `to_document_id`.
    pub fn to_document_id_any(&self, tables: &[&str], column: &str) -> String {
        if self.is_primary_key_any(tables, column) {
            format!("_id.{column}")
        } else {
            column.to_string()
        }
    }

    /// Membership test against the table's column set.
    pub fn table_has_column(&self, table: &str, column: &str) -> bool {
        self.columns
            .get(&table.to_uppercase())
            .is_some_and(|cols| cols.iter().any(|c| c.eq_ignore_ascii_case(column)))
    }
}

/// Assembles composite foreign keys from flat rows ordered by constraint
/// name: adjacent rows with the same constraint extend the same reference.
fn group_references(rows: Vec<ReferenceRow>) -> Vec<Reference> {
    let mut refs: Vec<Reference> = Vec::new();

    for row in rows {
        match refs.last_mut() {
            Some(last) if last.constraint_name == row.constraint_name => {
                last.referencing_columns.push(row.referencing_column);
                last.referenced_columns.push(row.referenced_column);
            }
            _ => refs.push(Reference {
                constraint_name: row.constraint_name,
                referencing_table: row.referencing_table,
                referencing_columns: vec![row.referencing_column],
                referenced_table: row.referenced_table,
                referenced_columns: vec![row.referenced_column],
            }),
        }
    }

    refs
}

/// Concatenates the check conditions of each table into one parseable
/// condition: `(c1) AND (c2) AND ...`.
fn concat_checks(rows: Vec<CheckRow>) -> Vec<CheckConstraint> {
    let mut checks: Vec<CheckConstraint> = Vec::new();

    for row in rows {
        match checks.last_mut() {
            Some(last) if last.table == row.table => {
                last.condition = format!("{} AND ({})", last.condition, row.condition);
            }
            _ => checks.push(CheckConstraint {
                table: row.table,
                condition: format!("({})", row.condition),
            }),
        }
    }

    checks
}

fn group_uniques(rows: Vec<UniqueRow>) -> Vec<UniqueConstraint> {
    let mut uniques: Vec<UniqueConstraint> = Vec::new();

    for row in rows {
        match uniques.last_mut() {
            Some(last) if last.constraint_name == row.constraint_name => {
                last.columns.push(row.column);
            }
            _ => uniques.push(UniqueConstraint {
                constraint_name: row.constraint_name,
                table: row.table,
                columns: vec![row.column],
            }),
        }
    }

    uniques
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::city_state_context;

    #[test]
    fn test_is_primary_key_case_insensitive() {
        let ctx = city_state_context();
        assert!(ctx.is_primary_key("CITY", "ID"));
        assert!(ctx.is_primary_key("city", "id"));
        assert!(!ctx.is_primary_key("CITY", "NAME"));
        assert!(!ctx.is_primary_key("NO_SUCH_TABLE", "ID"));
    }

    #[test]
    fn test_to_document_id_scoped_to_table() {
        let ctx = city_state_context();
        assert_eq!(ctx.to_document_id("CITY", "ID"), "_id.ID");
        // STATE_ID is a key of nothing, remapping is the identity
        assert_eq!(ctx.to_document_id("CITY", "STATE_ID"), "STATE_ID");
        // remapping keeps the caller's spelling
        assert_eq!(ctx.to_document_id("CITY", "id"), "_id.id");
    }

    #[test]
    fn test_to_document_id_candidate_set() {
        let ctx = city_state_context();
        assert_eq!(ctx.to_document_id_any(&["CITY", "STATE"], "ID"), "_id.ID");
        assert_eq!(ctx.to_document_id_any(&["CITY"], "POP"), "POP");
    }

    #[test]
    fn test_table_has_column() {
        let ctx = city_state_context();
        assert!(ctx.table_has_column("CITY", "POP"));
        assert!(ctx.table_has_column("city", "pop"));
        assert!(!ctx.table_has_column("STATE", "POP"));
        assert!(!ctx.table_has_column("NO_SUCH_TABLE", "POP"));
    }

    #[test]
    fn test_group_references_assembles_composite_keys() {
        let row = |cn: &str, rc: &str, dc: &str| ReferenceRow {
            constraint_name: cn.to_string(),
            referencing_table: "ORDERS".to_string(),
            referencing_column: rc.to_string(),
            referenced_table: "ITEMS".to_string(),
            referenced_column: dc.to_string(),
        };

        let refs = group_references(vec![
            row("FK_A", "ITEM_ID", "ID"),
            row("FK_A", "ITEM_REV", "REV"),
            row("FK_B", "OTHER_ID", "ID"),
        ]);

        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].referencing_columns, ["ITEM_ID", "ITEM_REV"]);
        assert_eq!(refs[0].referenced_columns, ["ID", "REV"]);
        assert_eq!(refs[1].referencing_columns, ["OTHER_ID"]);
    }

    #[test]
    fn test_concat_checks_per_table() {
        let checks = concat_checks(vec![
            CheckRow {
                table: "CITY".to_string(),
                condition: "POP > 0".to_string(),
            },
            CheckRow {
                table: "CITY".to_string(),
                condition: "ID IS NOT NULL".to_string(),
            },
            CheckRow {
                table: "STATE".to_string(),
                condition: "ID IS NOT NULL".to_string(),
            },
        ]);

        assert_eq!(checks.len(), 2);
        assert_eq!(checks[0].condition, "(POP > 0) AND (ID IS NOT NULL)");
        assert_eq!(checks[1].condition, "(ID IS NOT NULL)");
    }

    #[test]
    fn test_load_from_source() {
        struct Fixture;

        impl SchemaSource for Fixture {
            fn tables(&self) -> crate::error::Result<Vec<String>> {
                Ok(vec!["CITY".to_string()])
            }

            fn primary_key_columns(&self) -> crate::error::Result<Vec<(String, String)>> {
                Ok(vec![("CITY".to_string(), "ID".to_string())])
            }

            fn reference_rows(&self) -> crate::error::Result<Vec<ReferenceRow>> {
                Ok(Vec::new())
            }

            fn table_columns(&self) -> crate::error::Result<Vec<(String, String)>> {
                Ok(vec![
                    ("CITY".to_string(), "ID".to_string()),
                    ("CITY".to_string(), "NAME".to_string()),
                ])
            }
        }

        let ctx = SchemaContext::load(&Fixture).unwrap();
        assert_eq!(ctx.tables(), ["CITY"]);
        assert!(ctx.is_primary_key("CITY", "ID"));
        assert!(ctx.table_has_column("CITY", "NAME"));
        assert!(ctx.references().is_empty());
    }

    #[test]
    fn test_from_json_rejects_malformed_input() {
        let err = SchemaContext::from_json("{not json").unwrap_err();
        assert!(err.to_string().contains("schema error"), "{err}");
    }

    #[test]
    fn test_schema_spec_round_trips_through_json() {
        let ctx = city_state_context();
        let loaded = SchemaContext::from_json(
            r#"{
                "tables": [
                    {"name": "CITY",
                     "columns": ["ID", "NAME", "POP", "STATE_ID"],
                     "primary_key": ["ID"]},
                    {"name": "STATE",
                     "columns": ["ID", "NAME"],
                     "primary_key": ["ID"]}
                ],
                "references": [
                    {"constraint_name": "FK_CITY_STATE",
                     "referencing_table": "CITY",
                     "referencing_columns": ["STATE_ID"],
                     "referenced_table": "STATE",
                     "referenced_columns": ["ID"]}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(loaded.tables(), ctx.tables());
        assert_eq!(loaded.references(), ctx.references());
        assert!(loaded.is_primary_key("STATE", "ID"));
    }
}
