//! Schema-driven document embedding
//!
//! Converts flat rows of a table into nested documents by following a
//! caller-chosen subset of the schema's foreign-key references:
//! - embed-to: this table references a parent; the unique matching parent
//!   row is nested as a sub-document (to-one)
//! - embed-from: other rows reference this table; the matching child rows
//!   are nested as an array (to-many)
//!
//! Embedding is selective per relationship because embedding the full
//! reference graph would duplicate or cyclically nest data. The chosen
//! sets are validated to be acyclic up front; the recursion itself does no
//! cycle bookkeeping.

use ahash::{AHashMap, AHashSet};

use crate::document::{Document, Value};
use crate::error::{Error, Result};
use crate::schema::{Reference, SchemaContext};

/// An ordered column-to-value mapping, read once from the row source.
pub type Row = Vec<(String, Value)>;

/// Read access to table data, consumed during embedding.
///
/// One call per embedded reference per row: the access pattern is N+1 by
/// design and each call blocks until the source responds.
pub trait RowSource {
    /// All rows of `table` whose `columns` are equal to `values`,
    /// positionally paired.
    fn rows_matching(&self, table: &str, columns: &[String], values: &[Value]) -> Result<Vec<Row>>;
}

/// Builds nested documents from rows against one schema generation.
pub struct Embedder<'a> {
    schema: &'a SchemaContext,
    source: &'a dyn RowSource,
}

impl<'a> Embedder<'a> {
    pub fn new(schema: &'a SchemaContext, source: &'a dyn RowSource) -> Self {
        Self { schema, source }
    }

    /// Builds one document per row of `table`, embedding the chosen
    /// references. Fails before touching any row if the chosen sets
    /// contain a cycle, which would otherwise recurse without bound.
    pub fn collection(
        &self,
        table: &str,
        rows: &[Row],
        embed_to: &[Reference],
        embed_from: &[Reference],
    ) -> Result<Vec<Document>> {
        validate_acyclic(embed_to, embed_from)?;

        rows.iter()
            .map(|row| self.build_document(table, row, embed_to, embed_from))
            .collect()
    }

    fn build_document(
        &self,
        table: &str,
        row: &Row,
        embed_to: &[Reference],
        embed_from: &[Reference],
    ) -> Result<Document> {
        let mut doc = Document::new();

        // columns consumed by an embed-to reference are redundant with the
        // embedded sub-document and stay out of the flat fields
        let mut consumed: AHashSet<&str> = AHashSet::new();

        for reference in embed_to {
            if !reference.referencing_table.eq_ignore_ascii_case(table) {
                continue;
            }

            let values = self.referencing_values(row, reference)?;
            for column in &reference.referencing_columns {
                consumed.insert(column.as_str());
            }

            let embedded = self.embed_parent(reference, values, embed_to, embed_from)?;
            doc.insert(reference.constraint_name.clone(), embedded);
        }

        for reference in embed_from {
            if !reference.referenced_table.eq_ignore_ascii_case(table) {
                continue;
            }

            let values = self.referenced_values(row, reference)?;
            let embedded = self.embed_children(reference, values, embed_to, embed_from)?;
            doc.insert(reference.constraint_name.clone(), embedded);
        }

        // remaining columns: primary keys fold into the _id sub-document,
        // everything else is a flat field
        let mut id = Document::new();
        for (column, value) in row {
            if consumed.contains(column.as_str()) {
                continue;
            }
            if self.schema.is_primary_key(table, column) {
                id.insert(column.clone(), value.clone());
            } else {
                doc.insert(column.clone(), value.clone());
            }
        }

        // with no primary key at all, the target store assigns a surrogate
        if !id.is_empty() {
            doc.insert("_id", id);
        }

        Ok(doc)
    }

    /// Follows a to-one reference: a null foreign key embeds as null,
    /// otherwise exactly one parent row must match.
    fn embed_parent(
        &self,
        reference: &Reference,
        values: Vec<Value>,
        embed_to: &[Reference],
        embed_from: &[Reference],
    ) -> Result<Value> {
        if values.iter().any(Value::is_null) {
            return Ok(Value::Null);
        }

        let mut rows = self.source.rows_matching(
            &reference.referenced_table,
            &reference.referenced_columns,
            &values,
        )?;

        if rows.is_empty() {
            return Err(Error::Embedding(format!(
                "reference {} matched no row in {}",
                reference.constraint_name, reference.referenced_table
            )));
        }
        if rows.len() > 1 {
            return Err(Error::Embedding(format!(
                "reference {} matched more than one row in {}",
                reference.constraint_name, reference.referenced_table
            )));
        }

        let row = rows.remove(0);
        let doc =
            self.build_document(&reference.referenced_table, &row, embed_to, embed_from)?;
        Ok(Value::Document(doc))
    }

    /// Follows a to-many reference: every child row matching this row's
    /// referenced values embeds into an array. A null referenced value can
    /// match nothing and embeds an empty array.
    fn embed_children(
        &self,
        reference: &Reference,
        values: Vec<Value>,
        embed_to: &[Reference],
        embed_from: &[Reference],
    ) -> Result<Value> {
        if values.iter().any(Value::is_null) {
            return Ok(Value::Array(Vec::new()));
        }

        let rows = self.source.rows_matching(
            &reference.referencing_table,
            &reference.referencing_columns,
            &values,
        )?;

        let docs = rows
            .iter()
            .map(|row| {
                self.build_document(&reference.referencing_table, row, embed_to, embed_from)
                    .map(Value::Document)
            })
            .collect::<Result<Vec<Value>>>()?;

        Ok(Value::Array(docs))
    }

    fn referencing_values(&self, row: &Row, reference: &Reference) -> Result<Vec<Value>> {
        collect_values(row, &reference.referencing_columns, &reference.constraint_name)
    }

    fn referenced_values(&self, row: &Row, reference: &Reference) -> Result<Vec<Value>> {
        collect_values(row, &reference.referenced_columns, &reference.constraint_name)
    }
}

fn collect_values(row: &Row, columns: &[String], constraint: &str) -> Result<Vec<Value>> {
    columns
        .iter()
        .map(|column| {
            row.iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(column))
                .map(|(_, value)| value.clone())
                .ok_or_else(|| {
                    Error::Embedding(format!(
                        "row is missing column {column} required by reference {constraint}"
                    ))
                })
        })
        .collect()
}

/// Rejects embed selections whose reference graph has a cycle.
///
/// Nodes are tables; an embed-to reference points from its referencing
/// table to its referenced table, an embed-from reference the other way
/// around, matching the direction the recursion travels.
fn validate_acyclic(embed_to: &[Reference], embed_from: &[Reference]) -> Result<()> {
    let mut edges: AHashMap<String, Vec<String>> = AHashMap::new();

    for reference in embed_to {
        edges
            .entry(reference.referencing_table.to_uppercase())
            .or_default()
            .push(reference.referenced_table.to_uppercase());
    }
    for reference in embed_from {
        edges
            .entry(reference.referenced_table.to_uppercase())
            .or_default()
            .push(reference.referencing_table.to_uppercase());
    }

    // DFS with a three-state visit map; a back edge is a cycle
    let mut finished: AHashSet<String> = AHashSet::new();

    for start in edges.keys() {
        if finished.contains(start) {
            continue;
        }

        let mut in_progress: AHashSet<String> = AHashSet::new();
        let mut stack: Vec<(String, usize)> = vec![(start.clone(), 0)];
        in_progress.insert(start.clone());

        while let Some((table, next)) = stack.pop() {
            let targets = edges.get(&table).map(Vec::as_slice).unwrap_or_default();

            if next >= targets.len() {
                in_progress.remove(&table);
                finished.insert(table);
                continue;
            }

            let target = targets[next].clone();
            stack.push((table, next + 1));

            if in_progress.contains(&target) {
                return Err(Error::Embedding(format!(
                    "chosen embed references form a cycle involving table {target}"
                )));
            }
            if !finished.contains(&target) {
                in_progress.insert(target.clone());
                stack.push((target, 0));
            }
        }
    }

    Ok(())
}
