//! Boolean-expression compilation into filter documents

use crate::document::{Document, Value};
use crate::schema::SchemaContext;
use crate::sql::{BoolOp, BooleanExpr, CompareOp};

/// MongoDB spelling of a comparison operator. Total over the closed
/// operator set; anything the parser did not recognize never reaches here.
pub(crate) fn comparison_operator(op: CompareOp) -> &'static str {
    match op {
        CompareOp::Eq => "$eq",
        CompareOp::Ne => "$ne",
        CompareOp::Gt => "$gt",
        CompareOp::Ge => "$gte",
        CompareOp::Lt => "$lt",
        CompareOp::Le => "$lte",
    }
}

pub(crate) fn boolean_operator(op: BoolOp) -> &'static str {
    match op {
        BoolOp::And => "$and",
        BoolOp::Or => "$or",
    }
}

/// Resolves an unqualified identifier to a document field.
///
/// In a join context the joined table is consulted first: a column it owns
/// is addressed through the joined array (`join.field`). Either side maps
/// primary-key columns into the `_id` sub-document.
pub(crate) fn resolve_field(
    schema: &SchemaContext,
    from_table: &str,
    join_table: Option<&str>,
    id: &str,
) -> String {
    if let Some(join) = join_table {
        if schema.table_has_column(join, id) {
            return format!("{}.{}", join, schema.to_document_id(join, id));
        }
    }

    schema.to_document_id(from_table, id)
}

/// Compiles a WHERE tree into a filter document. `Empty` compiles to the
/// empty filter (match everything).
pub(crate) fn compile(
    schema: &SchemaContext,
    expr: &BooleanExpr,
    from_table: &str,
    join_table: Option<&str>,
) -> Document {
    match expr {
        BooleanExpr::Empty => Document::new(),

        BooleanExpr::Comparison { id, op, value } => {
            let mut body = Document::new();
            body.insert(comparison_operator(*op), value.clone());

            let mut doc = Document::new();
            doc.insert(resolve_field(schema, from_table, join_table, id), body);
            doc
        }

        BooleanExpr::InComparison {
            id,
            negated,
            values,
        } => {
            let operator = if *negated { "$nin" } else { "$in" };
            let mut body = Document::new();
            body.insert(operator, values.clone());

            let mut doc = Document::new();
            doc.insert(resolve_field(schema, from_table, join_table, id), body);
            doc
        }

        BooleanExpr::Composite { op, children } => {
            let compiled: Vec<Value> = children
                .iter()
                .map(|child| Value::Document(compile(schema, child, from_table, join_table)))
                .collect();

            let mut doc = Document::new();
            doc.insert(boolean_operator(*op), compiled);
            doc
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::parse_bool_expr;
    use crate::testutil::city_state_context;

    fn compile_str(sql: &str, join: Option<&str>) -> Document {
        let schema = city_state_context();
        let expr = parse_bool_expr(sql).unwrap();
        compile(&schema, &expr, "CITY", join)
    }

    #[test]
    fn test_empty_compiles_to_empty_filter() {
        let schema = city_state_context();
        let doc = compile(&schema, &BooleanExpr::Empty, "CITY", None);
        assert!(doc.is_empty());
    }

    #[test]
    fn test_all_comparison_operators() {
        let cases = [
            ("A = 1", "$eq"),
            ("A <> 1", "$ne"),
            ("A > 1", "$gt"),
            ("A >= 1", "$gte"),
            ("A < 1", "$lt"),
            ("A <= 1", "$lte"),
        ];

        for (sql, operator) in cases {
            let doc = compile_str(sql, None);
            let expected: Document = [(
                "A",
                Value::Document([(operator, Value::Int(1))].into_iter().collect()),
            )]
            .into_iter()
            .collect();
            assert_eq!(doc, expected, "{sql}");
        }
    }

    #[test]
    fn test_primary_key_field_remapped() {
        let doc = compile_str("ID = 5", None);
        assert!(doc.get("_id.ID").is_some());
    }

    #[test]
    fn test_join_side_column_addressed_through_join() {
        // NAME exists in STATE, so the joined side wins
        let doc = compile_str("NAME = 'X'", Some("STATE"));
        assert!(doc.get("STATE.NAME").is_some());

        // POP only exists in CITY
        let doc = compile_str("POP = 1", Some("STATE"));
        assert!(doc.get("POP").is_some());

        // the joined side's primary key is remapped inside the join path
        let doc = compile_str("ID = 1", Some("STATE"));
        assert!(doc.get("STATE._id.ID").is_some());
    }

    #[test]
    fn test_in_and_nin() {
        let doc = compile_str("POP IN (1, 2)", None);
        let expected: Document = [(
            "POP",
            Value::Document(
                [("$in", Value::Array(vec![Value::Int(1), Value::Int(2)]))]
                    .into_iter()
                    .collect(),
            ),
        )]
        .into_iter()
        .collect();
        assert_eq!(doc, expected);

        let doc = compile_str("POP NOT IN (1)", None);
        assert_eq!(
            doc.get("POP"),
            Some(&Value::Document(
                [("$nin", Value::Array(vec![Value::Int(1)]))]
                    .into_iter()
                    .collect()
            ))
        );
    }

    #[test]
    fn test_composite_preserves_order_and_nesting() {
        let doc = compile_str("(POP = 1 AND NAME = 'X') OR POP = 3", None);
        let Some(Value::Array(children)) = doc.get("$or") else {
            panic!("expected $or array, got {doc}");
        };
        assert_eq!(children.len(), 2);
        let Value::Document(first) = &children[0] else {
            panic!("expected nested document");
        };
        let Some(Value::Array(and_children)) = first.get("$and") else {
            panic!("expected nested $and, got {first}");
        };
        assert_eq!(and_children.len(), 2);
    }

    #[test]
    fn test_is_null_compiles_to_eq_null() {
        let doc = compile_str("NAME IS NULL", None);
        assert_eq!(
            doc.get("NAME"),
            Some(&Value::Document(
                [("$eq", Value::Null)].into_iter().collect()
            ))
        );
    }
}
