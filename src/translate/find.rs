//! Find translation: filter + projection for statements without join or
//! grouping

use super::filter;
use super::{FindQuery, Translator};
use crate::document::Document;
use crate::error::{Error, Result};
use crate::sql::Statement;

impl Translator<'_> {
    /// Translates a non-aggregate statement into a find query.
    pub fn to_find(&self, stmt: &Statement) -> Result<FindQuery> {
        if stmt.is_aggregate() {
            return Err(Error::Translation("invalid statement for find".to_string()));
        }

        let filter = filter::compile(self.schema, &stmt.where_clause, &stmt.from_table, None);

        Ok(FindQuery {
            filter,
            projection: self.projection(stmt),
        })
    }

    /// Builds the projection document shared by find and aggregate
    /// translation.
    ///
    /// Selected columns project to 1 under their document field name; a
    /// grouped COUNT projects the `count` accumulator output. When fields
    /// are projected but no primary-key field was requested, `_id` is
    /// suppressed explicitly since the store returns it by default. A bare
    /// `*` (empty column list) projects nothing, returning whole documents.
    pub(crate) fn projection(&self, stmt: &Statement) -> Document {
        let mut doc = Document::new();
        let mut key_requested = false;

        let join_table = stmt.join.as_ref().map(|j| j.table.as_str());

        for column in &stmt.select_columns {
            if let Some(function) = &column.group_function {
                if function.eq_ignore_ascii_case("COUNT") {
                    doc.insert("count", 1);
                } else {
                    // group output fields keep the column name
                    doc.insert(column.name.clone(), 1);
                }
                continue;
            }

            let field =
                filter::resolve_field(self.schema, &stmt.from_table, join_table, &column.name);
            if field.starts_with("_id.") || field.contains("._id.") {
                key_requested = true;
            }
            doc.insert(field, 1);
        }

        if !doc.is_empty() && !key_requested {
            doc.insert("_id", 0);
        }

        doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Value;
    use crate::sql::parse;
    use crate::testutil::city_state_context;

    fn find(sql: &str) -> Result<FindQuery> {
        let schema = city_state_context();
        let stmt = parse(sql).unwrap();
        Translator::new(&schema).to_find(&stmt)
    }

    #[test]
    fn test_select_star_yields_empty_filter_and_projection() {
        let query = find("SELECT * FROM DUAL;").unwrap();
        assert!(query.filter.is_empty());
        assert!(query.projection.is_empty());
    }

    #[test]
    fn test_projection_suppresses_id() {
        let query = find("SELECT NAME FROM CITY WHERE POP > 1000;").unwrap();

        let expected_filter: Document = [(
            "POP",
            Value::Document([("$gt", Value::Int(1000))].into_iter().collect()),
        )]
        .into_iter()
        .collect();
        assert_eq!(query.filter, expected_filter);

        let expected_projection: Document =
            [("NAME", 1), ("_id", 0)].into_iter().collect();
        assert_eq!(query.projection, expected_projection);
    }

    #[test]
    fn test_key_request_keeps_id() {
        let query = find("SELECT ID, NAME FROM CITY").unwrap();
        assert_eq!(query.projection.get("_id.ID"), Some(&Value::Int(1)));
        assert_eq!(query.projection.get("_id"), None);
    }

    #[test]
    fn test_aggregate_statement_rejected() {
        let err = find("SELECT SUM(POP) FROM CITY").unwrap_err();
        assert!(err.to_string().contains("invalid statement for find"), "{err}");

        let err = find("SELECT NAME FROM CITY JOIN STATE ON STATE_ID = ID").unwrap_err();
        assert!(err.to_string().contains("invalid statement for find"), "{err}");
    }
}
