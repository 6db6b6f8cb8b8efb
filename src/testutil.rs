//! Shared fixtures for unit tests.

use crate::schema::{Reference, SchemaContext, SchemaSpec, TableSpec};

/// A two-table schema: CITY(ID pk, NAME, POP, STATE_ID) referencing
/// STATE(ID pk, NAME) through FK_CITY_STATE.
pub(crate) fn city_state_context() -> SchemaContext {
    SchemaContext::from_spec(SchemaSpec {
        tables: vec![
            TableSpec {
                name: "CITY".to_string(),
                columns: vec![
                    "ID".to_string(),
                    "NAME".to_string(),
                    "POP".to_string(),
                    "STATE_ID".to_string(),
                ],
                primary_key: vec!["ID".to_string()],
            },
            TableSpec {
                name: "STATE".to_string(),
                columns: vec!["ID".to_string(), "NAME".to_string()],
                primary_key: vec!["ID".to_string()],
            },
        ],
        references: vec![city_state_reference()],
        checks: Vec::new(),
        uniques: Vec::new(),
    })
}

pub(crate) fn city_state_reference() -> Reference {
    Reference {
        constraint_name: "FK_CITY_STATE".to_string(),
        referencing_table: "CITY".to_string(),
        referencing_columns: vec!["STATE_ID".to_string()],
        referenced_table: "STATE".to_string(),
        referenced_columns: vec!["ID".to_string()],
    }
}
