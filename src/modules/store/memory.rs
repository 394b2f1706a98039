use std::marker::PhantomData;
use std::sync::Mutex;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::modules::store::{Collection, DocumentId, Filter, Stored};

/// In-memory collection used when no DATABASE_URL is configured.
///
/// Identifiers are sequential integers starting at 1. This is a
/// single-process development stand-in; it makes no durability promises and
/// is not meant for concurrent writers beyond what the mutex serializes.
pub struct MemoryCollection<T> {
    inner: Mutex<Inner>,
    _marker: PhantomData<fn() -> T>,
}

struct Inner {
    rows: Vec<(i64, Value)>,
    next_id: i64,
}

impl<T> MemoryCollection<T> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                rows: Vec::new(),
                next_id: 1,
            }),
            _marker: PhantomData,
        }
    }
}

impl<T> Default for MemoryCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn decode<T: DeserializeOwned>(value: &Value) -> Result<T> {
    serde_json::from_value(value.clone())
        .map_err(|e| AppError::Internal(format!("Failed to decode stored document: {}", e)))
}

#[async_trait]
impl<T> Collection<T> for MemoryCollection<T>
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    async fn insert(&self, doc: T) -> Result<Stored<T>> {
        let value = serde_json::to_value(&doc)
            .map_err(|e| AppError::Internal(format!("Failed to encode document: {}", e)))?;

        let mut inner = self
            .inner
            .lock()
            .map_err(|_| AppError::Internal("Store mutex poisoned".to_string()))?;

        let id = inner.next_id;
        inner.next_id += 1;
        inner.rows.push((id, value));

        Ok(Stored {
            id: DocumentId::Seq(id),
            doc,
        })
    }

    async fn find_all(&self) -> Result<Vec<Stored<T>>> {
        let inner = self
            .inner
            .lock()
            .map_err(|_| AppError::Internal("Store mutex poisoned".to_string()))?;

        inner
            .rows
            .iter()
            .map(|(id, value)| {
                Ok(Stored {
                    id: DocumentId::Seq(*id),
                    doc: decode(value)?,
                })
            })
            .collect()
    }

    async fn find_one(&self, filter: &Filter) -> Result<Option<Stored<T>>> {
        let inner = self
            .inner
            .lock()
            .map_err(|_| AppError::Internal("Store mutex poisoned".to_string()))?;

        for (id, value) in &inner.rows {
            if filter.matches(value) {
                return Ok(Some(Stored {
                    id: DocumentId::Seq(*id),
                    doc: decode(value)?,
                }));
            }
        }

        Ok(None)
    }

    async fn find_by_object_id(&self, _id: Uuid) -> Result<Option<Stored<T>>> {
        // This backend only ever issues sequential ids
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct Doc {
        name: String,
        tag: String,
    }

    fn doc(name: &str, tag: &str) -> Doc {
        Doc {
            name: name.to_string(),
            tag: tag.to_string(),
        }
    }

    #[tokio::test]
    async fn insert_assigns_sequential_ids_from_one() {
        let coll = MemoryCollection::<Doc>::new();

        let a = coll.insert(doc("a", "x")).await.unwrap();
        let b = coll.insert(doc("b", "y")).await.unwrap();

        assert_eq!(a.id, DocumentId::Seq(1));
        assert_eq!(b.id, DocumentId::Seq(2));
    }

    #[tokio::test]
    async fn find_all_preserves_insertion_order() {
        let coll = MemoryCollection::<Doc>::new();
        coll.insert(doc("first", "x")).await.unwrap();
        coll.insert(doc("second", "x")).await.unwrap();
        coll.insert(doc("third", "x")).await.unwrap();

        let all = coll.find_all().await.unwrap();
        let names: Vec<_> = all.iter().map(|s| s.doc.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn find_one_returns_first_match() {
        let coll = MemoryCollection::<Doc>::new();
        coll.insert(doc("a", "x")).await.unwrap();
        coll.insert(doc("b", "y")).await.unwrap();
        coll.insert(doc("c", "y")).await.unwrap();

        let found = coll
            .find_one(&Filter::new().eq("tag", "y"))
            .await
            .unwrap()
            .expect("match expected");
        assert_eq!(found.doc.name, "b");

        let missing = coll
            .find_one(&Filter::new().eq("tag", "z"))
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn object_id_lookup_always_misses() {
        let coll = MemoryCollection::<Doc>::new();
        coll.insert(doc("a", "x")).await.unwrap();

        let found = coll.find_by_object_id(Uuid::new_v4()).await.unwrap();
        assert!(found.is_none());
    }
}
