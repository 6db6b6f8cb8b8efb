//! Aggregate translation: pipelines for statements with a join or group
//! functions

use super::{filter, Translator};
use crate::document::{Document, Value};
use crate::error::{Error, Result};
use crate::sql::Statement;

/// MongoDB accumulator for a group function name, matched
/// case-insensitively. MEADIAN is the historically accepted spelling of
/// MEDIAN and both map to the median accumulator. COUNT is handled
/// separately because it takes no field argument.
fn accumulator_operator(function: &str) -> Result<&'static str> {
    match function.to_uppercase().as_str() {
        "SUM" => Ok("$sum"),
        "MIN" => Ok("$min"),
        "MAX" => Ok("$max"),
        "AVG" => Ok("$avg"),
        "MEDIAN" | "MEADIAN" => Ok("$median"),
        _ => Err(Error::UnknownGroupFunction(function.to_string())),
    }
}

impl Translator<'_> {
    /// Translates an aggregate statement into its pipeline of stages, in
    /// fixed order: `$lookup` + `$unwind` (join only), `$match`, `$group`
    /// (group functions only), `$project`. Stages with empty bodies other
    /// than `$match` are omitted.
    pub fn to_aggregate(&self, stmt: &Statement) -> Result<Vec<Document>> {
        if !stmt.is_aggregate() {
            return Err(Error::Translation(
                "invalid statement for aggregation".to_string(),
            ));
        }

        let mut pipeline = Vec::new();
        let join_table = stmt.join.as_ref().map(|j| j.table.as_str());

        if let Some(join) = &stmt.join {
            let mut lookup = Document::new();
            lookup.insert("$lookup", self.lookup(&stmt.from_table, join));
            pipeline.push(lookup);

            // unwinding the joined array gives inner-join semantics: rows
            // without a match are dropped
            let mut unwind = Document::new();
            unwind.insert("$unwind", format!("${}", join.table));
            pipeline.push(unwind);
        }

        let mut match_stage = Document::new();
        match_stage.insert(
            "$match",
            filter::compile(self.schema, &stmt.where_clause, &stmt.from_table, join_table),
        );
        pipeline.push(match_stage);

        let group = self.group(stmt)?;
        if !group.is_empty() {
            let mut stage = Document::new();
            stage.insert("$group", group);
            pipeline.push(stage);
        }

        let projection = self.projection(stmt);
        if !projection.is_empty() {
            let mut stage = Document::new();
            stage.insert("$project", projection);
            pipeline.push(stage);
        }

        Ok(pipeline)
    }

    /// `$lookup` body joining the base collection to the joined one on the
    /// document-id-resolved attributes. The joined documents land in an
    /// array named after the joined table.
    fn lookup(&self, from_table: &str, join: &crate::sql::Join) -> Document {
        let mut doc = Document::new();
        doc.insert("from", join.table.clone());
        doc.insert(
            "localField",
            self.schema.to_document_id(from_table, &join.from_attr),
        );
        doc.insert(
            "foreignField",
            self.schema.to_document_id(&join.table, &join.to_attr),
        );
        doc.insert("as", join.table.clone());
        doc
    }

    /// `$group` body: a single `_id: null` bucket (the dialect has no GROUP
    /// BY key) with one accumulator per grouped column. Empty when no
    /// column is grouped.
    fn group(&self, stmt: &Statement) -> Result<Document> {
        let has_group = stmt
            .select_columns
            .iter()
            .any(|c| c.group_function.is_some());
        if !has_group {
            return Ok(Document::new());
        }

        let mut doc = Document::new();
        doc.insert("_id", Value::Null);

        let join_table = stmt.join.as_ref().map(|j| j.table.as_str());

        for column in &stmt.select_columns {
            let Some(function) = &column.group_function else {
                continue;
            };

            if function.eq_ignore_ascii_case("COUNT") {
                if column.name != "*" {
                    return Err(Error::Translation(
                        "COUNT is only supported as COUNT(*)".to_string(),
                    ));
                }
                let mut body = Document::new();
                body.insert("$count", Document::new());
                doc.insert("count", body);
                continue;
            }

            let operator = accumulator_operator(function)?;
            let field =
                filter::resolve_field(self.schema, &stmt.from_table, join_table, &column.name);

            let mut body = Document::new();
            body.insert(operator, format!("${field}"));
            doc.insert(column.name.clone(), body);
        }

        Ok(doc)
    }
}
