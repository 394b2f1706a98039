//! Document store abstraction over the three record collections.
//!
//! Two backends implement the same [`Collection`] contract: a Postgres
//! JSONB store issuing structured UUID identifiers, and an in-memory
//! stand-in issuing sequential integers for local development. The backend
//! is selected once at startup from configuration presence, never per-call.

mod memory;
mod postgres;

pub use memory::MemoryCollection;
pub use postgres::PgCollection;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::core::error::Result;

/// Store-generated record identifier.
///
/// The persistent backend produces structured UUIDs; the in-memory fallback
/// produces plain sequential integers. Callers that cannot know which
/// backend is active compare identifiers by their canonical string form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentId {
    Object(Uuid),
    Seq(i64),
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentId::Object(id) => write!(f, "{}", id),
            DocumentId::Seq(n) => write!(f, "{}", n),
        }
    }
}

/// A document together with its store-assigned identifier.
#[derive(Debug, Clone)]
pub struct Stored<T> {
    pub id: DocumentId,
    pub doc: T,
}

/// Field-equality filter, the query shape both backends understand.
///
/// Matches a document iff every `(field, value)` pair equals the
/// corresponding top-level field of the document.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    fields: Vec<(String, Value)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.push((field.into(), value.into()));
        self
    }

    /// True iff every filter field equals the document's field.
    pub fn matches(&self, doc: &Value) -> bool {
        self.fields
            .iter()
            .all(|(field, value)| doc.get(field) == Some(value))
    }

    /// JSON object form, usable as a JSONB containment operand.
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.fields
                .iter()
                .map(|(field, value)| (field.clone(), value.clone()))
                .collect(),
        )
    }

}

/// Append-only document collection. No update or delete operations exist
/// anywhere in the data model.
#[async_trait]
pub trait Collection<T>: Send + Sync
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    /// Insert a document and return it with its store-assigned id.
    async fn insert(&self, doc: T) -> Result<Stored<T>>;

    /// All documents in insertion order.
    async fn find_all(&self) -> Result<Vec<Stored<T>>>;

    /// First document matching the filter, in insertion order.
    async fn find_one(&self, filter: &Filter) -> Result<Option<Stored<T>>>;

    /// Native lookup by structured identifier. The in-memory backend never
    /// issues structured ids, so it always misses.
    async fn find_by_object_id(&self, id: Uuid) -> Result<Option<Stored<T>>>;
}

pub type DynCollection<T> = Arc<dyn Collection<T>>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn document_id_canonical_strings() {
        let uuid = Uuid::parse_str("6f2b4a18-9c61-4a2e-8d35-27c15f1b9d40").unwrap();
        assert_eq!(
            DocumentId::Object(uuid).to_string(),
            "6f2b4a18-9c61-4a2e-8d35-27c15f1b9d40"
        );
        assert_eq!(DocumentId::Seq(7).to_string(), "7");
    }

    #[test]
    fn filter_matches_all_fields() {
        let doc = json!({"email": "a@x.com", "role": "creator", "name": "A"});

        assert!(Filter::new().eq("email", "a@x.com").matches(&doc));
        assert!(Filter::new()
            .eq("email", "a@x.com")
            .eq("role", "creator")
            .matches(&doc));
        assert!(!Filter::new().eq("email", "b@x.com").matches(&doc));
        assert!(!Filter::new().eq("missing", "x").matches(&doc));
        // Empty filter matches everything, like an empty query document
        assert!(Filter::new().matches(&doc));
    }

    #[test]
    fn filter_json_form() {
        let filter = Filter::new().eq("email", "a@x.com");
        assert_eq!(filter.to_json(), json!({"email": "a@x.com"}));
    }
}
