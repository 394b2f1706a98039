use std::marker::PhantomData;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::modules::store::{Collection, DocumentId, Filter, Stored};

/// Postgres-backed collection: one JSONB document per row, structured UUID
/// identifiers, insertion order preserved by a serial column.
///
/// Queries are built at runtime because the set of collections is fixed but
/// the document shape is schema-less.
pub struct PgCollection<T> {
    pool: PgPool,
    table: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> PgCollection<T> {
    pub fn new(pool: PgPool, table: &'static str) -> Self {
        Self {
            pool,
            table,
            _marker: PhantomData,
        }
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value)
        .map_err(|e| AppError::Internal(format!("Failed to decode stored document: {}", e)))
}

#[async_trait]
impl<T> Collection<T> for PgCollection<T>
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    async fn insert(&self, doc: T) -> Result<Stored<T>> {
        let value = serde_json::to_value(&doc)
            .map_err(|e| AppError::Internal(format!("Failed to encode document: {}", e)))?;

        let sql = format!("INSERT INTO {} (doc) VALUES ($1) RETURNING id", self.table);
        let row = sqlx::query(&sql).bind(&value).fetch_one(&self.pool).await?;
        let id: Uuid = row.try_get("id")?;

        Ok(Stored {
            id: DocumentId::Object(id),
            doc,
        })
    }

    async fn find_all(&self) -> Result<Vec<Stored<T>>> {
        let sql = format!("SELECT id, doc FROM {} ORDER BY seq", self.table);
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

        rows.into_iter()
            .map(|row| {
                let id: Uuid = row.try_get("id")?;
                let doc: Value = row.try_get("doc")?;
                Ok(Stored {
                    id: DocumentId::Object(id),
                    doc: decode(doc)?,
                })
            })
            .collect()
    }

    async fn find_one(&self, filter: &Filter) -> Result<Option<Stored<T>>> {
        // Field-equality filters map onto JSONB containment
        let sql = format!(
            "SELECT id, doc FROM {} WHERE doc @> $1 ORDER BY seq LIMIT 1",
            self.table
        );
        let row = sqlx::query(&sql)
            .bind(filter.to_json())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let id: Uuid = row.try_get("id")?;
                let doc: Value = row.try_get("doc")?;
                Ok(Some(Stored {
                    id: DocumentId::Object(id),
                    doc: decode(doc)?,
                }))
            }
            None => Ok(None),
        }
    }

    async fn find_by_object_id(&self, id: Uuid) -> Result<Option<Stored<T>>> {
        let sql = format!("SELECT id, doc FROM {} WHERE id = $1", self.table);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let id: Uuid = row.try_get("id")?;
                let doc: Value = row.try_get("doc")?;
                Ok(Some(Stored {
                    id: DocumentId::Object(id),
                    doc: decode(doc)?,
                }))
            }
            None => Ok(None),
        }
    }
}
