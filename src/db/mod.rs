pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use serde_json::Value;

use crate::models::employee::Employee;

pub use memory::MemoryEmployeeStore;
pub use postgres::PgEmployeeStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("document {0} not found")]
    NotFound(String),
    #[error("document {0} already exists")]
    Conflict(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("invalid request: {0}")]
    Invalid(String),
    #[error("store error: {0}")]
    Backend(String),
}

/// One collection of employee documents, partitioned by `Employee::id`.
///
/// Implementations must be safe to share across actix workers; the handle is
/// built once at startup and never mutated afterwards.
#[async_trait]
pub trait EmployeeStore: Send + Sync {
    /// Every document containing `filter` (a JSON object), in store order.
    async fn query(&self, filter: &Value) -> Result<Vec<Employee>, StoreError>;

    async fn read(&self, id: &str) -> Result<Employee, StoreError>;

    /// Inserts a new document. Fails with `Conflict` if the id is taken.
    async fn create(&self, employee: &Employee) -> Result<(), StoreError>;

    /// Insert-or-replace keyed by id. Returns the document as stored.
    async fn upsert(&self, employee: &Employee) -> Result<Employee, StoreError>;

    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}

/// Parses a filter in the store's native syntax: a JSON object matched by
/// containment. Blank text matches everything.
pub fn parse_filter(filter_query: &str) -> Result<Value, StoreError> {
    if filter_query.trim().is_empty() {
        return Ok(Value::Object(Default::default()));
    }

    let filter: Value = serde_json::from_str(filter_query)
        .map_err(|err| StoreError::Invalid(format!("filter is not valid JSON: {}", err)))?;

    if !filter.is_object() {
        return Err(StoreError::Invalid("filter must be a JSON object".to_string()));
    }
    Ok(filter)
}

/// JSONB `@>` semantics: objects contain every key of the pattern, arrays
/// contain a match for every pattern element, scalars compare equal.
pub fn json_contains(document: &Value, pattern: &Value) -> bool {
    match (document, pattern) {
        (Value::Object(doc), Value::Object(pat)) => pat
            .iter()
            .all(|(key, value)| doc.get(key).is_some_and(|field| json_contains(field, value))),
        (Value::Array(doc), Value::Array(pat)) => pat
            .iter()
            .all(|value| doc.iter().any(|item| json_contains(item, value))),
        (doc, pat) => doc == pat,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blank_filter_matches_everything() {
        let filter = parse_filter("  ").unwrap();
        assert_eq!(filter, json!({}));
        assert!(json_contains(&json!({ "company": "acme" }), &filter));
    }

    #[test]
    fn filter_must_be_an_object() {
        assert!(matches!(parse_filter("[1, 2]"), Err(StoreError::Invalid(_))));
        assert!(matches!(parse_filter("company = 'acme'"), Err(StoreError::Invalid(_))));
    }

    #[test]
    fn containment_matches_subsets() {
        let doc = json!({ "company": "acme", "age": 30, "tags": ["a", "b"] });

        assert!(json_contains(&doc, &json!({ "company": "acme" })));
        assert!(json_contains(&doc, &json!({ "company": "acme", "age": 30 })));
        assert!(json_contains(&doc, &json!({ "tags": ["b"] })));
        assert!(!json_contains(&doc, &json!({ "company": "other" })));
        assert!(!json_contains(&doc, &json!({ "missing": 1 })));
    }
}
