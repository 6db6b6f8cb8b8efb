//! Document generation from declarative schema constraints
//!
//! Check constraints become collection validators: the stored condition is
//! parsed with the boolean-expression entry point and compiled into a
//! filter against its own table. Unique constraints become unique index
//! key documents.

use crate::document::Document;
use crate::error::Result;
use crate::schema::SchemaContext;
use crate::sql::parse_bool_expr;
use crate::translate::Translator;

/// One `collMod` command document per table carrying check constraints.
pub fn validators(schema: &SchemaContext) -> Result<Vec<Document>> {
    let translator = Translator::new(schema);

    schema
        .checks()
        .iter()
        .map(|check| {
            let expr = parse_bool_expr(&check.condition)?;
            let filter = translator.compile_filter(&expr, &check.table, None);

            let mut doc = Document::new();
            doc.insert("collMod", check.table.clone());
            doc.insert("validator", filter);
            doc.insert("validationAction", "error");
            Ok(doc)
        })
        .collect()
}

/// One `(collection, key document)` pair per unique constraint, the key
/// columns mapped through document-id resolution.
pub fn unique_indexes(schema: &SchemaContext) -> Vec<(String, Document)> {
    schema
        .uniques()
        .iter()
        .map(|unique| {
            let mut keys = Document::new();
            for column in &unique.columns {
                keys.insert(schema.to_document_id(&unique.table, column), 1);
            }
            (unique.table.clone(), keys)
        })
        .collect()
}
