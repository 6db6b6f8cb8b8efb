//! mongosh command rendering
//!
//! Pure string building over `Document`'s extended-JSON display. The
//! engine hands these to whatever surface shows or runs them; no I/O
//! happens here.

use crate::document::Document;
use crate::translate::FindQuery;

/// `db.<collection>.find(<filter>, <projection>)`
pub fn find_command(collection: &str, query: &FindQuery) -> String {
    format!(
        "db.{}.find({}, {})",
        collection, query.filter, query.projection
    )
}

/// `db.<collection>.aggregate([ <stages> ])`, one stage per line.
pub fn aggregate_command(collection: &str, pipeline: &[Document]) -> String {
    let stages = pipeline
        .iter()
        .map(Document::to_string)
        .collect::<Vec<_>>()
        .join(",\n  ");

    format!("db.{}.aggregate([\n  {}\n])", collection, stages)
}

/// `db.<collection>.insertMany([ <documents> ])`, one document per line.
pub fn insert_many_command(collection: &str, documents: &[Document]) -> String {
    let rendered = documents
        .iter()
        .map(Document::to_string)
        .collect::<Vec<_>>()
        .join(",\n  ");

    if rendered.is_empty() {
        format!("db.{}.insertMany([])", collection)
    } else {
        format!("db.{}.insertMany([\n  {}\n])", collection, rendered)
    }
}

/// `db.<collection>.createIndex(<keys>, {unique: true})`
pub fn create_index_command(collection: &str, keys: &Document) -> String {
    format!("db.{}.createIndex({}, {{unique: true}})", collection, keys)
}

/// `db.runCommand(<command>)`
pub fn run_command(command: &Document) -> String {
    format!("db.runCommand({})", command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Value;

    #[test]
    fn test_find_command() {
        let query = FindQuery {
            filter: [(
                "POP",
                Value::Document([("$gt", Value::Int(1000))].into_iter().collect()),
            )]
            .into_iter()
            .collect(),
            projection: [("NAME", 1), ("_id", 0)].into_iter().collect(),
        };

        assert_eq!(
            find_command("CITY", &query),
            r#"db.CITY.find({"POP":{"$gt":1000}}, {"NAME":1,"_id":0})"#
        );
    }

    #[test]
    fn test_aggregate_command() {
        let match_stage: Document = [("$match", Document::new())].into_iter().collect();
        let rendered = aggregate_command("CITY", &[match_stage]);
        assert_eq!(rendered, "db.CITY.aggregate([\n  {\"$match\":{}}\n])");
    }

    #[test]
    fn test_insert_many_empty_and_nonempty() {
        assert_eq!(insert_many_command("CITY", &[]), "db.CITY.insertMany([])");

        let doc: Document = [("NAME", "X")].into_iter().collect();
        assert_eq!(
            insert_many_command("CITY", &[doc]),
            "db.CITY.insertMany([\n  {\"NAME\":\"X\"}\n])"
        );
    }

    #[test]
    fn test_create_index_command() {
        let keys: Document = [("NAME", 1)].into_iter().collect();
        assert_eq!(
            create_index_command("CITY", &keys),
            r#"db.CITY.createIndex({"NAME":1}, {unique: true})"#
        );
    }
}
