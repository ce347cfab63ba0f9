use async_trait::async_trait;
use futures_util::TryStreamExt;
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::PgPool;

use super::{EmployeeStore, StoreError};
use crate::models::employee::Employee;

/// Employee documents kept as JSONB rows: `(id TEXT PRIMARY KEY, doc JSONB)`.
pub struct PgEmployeeStore {
    pool: PgPool,
    collection: String,
}

fn map_sqlx_error(err: sqlx::Error, id: &str) -> StoreError {
    match err {
        sqlx::Error::RowNotFound => StoreError::NotFound(id.to_string()),
        // unique_violation
        sqlx::Error::Database(ref db_err) if db_err.code().as_deref() == Some("23505") => {
            StoreError::Conflict(id.to_string())
        }
        err @ (sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed) => StoreError::Unavailable(err.to_string()),
        err => StoreError::Backend(err.to_string()),
    }
}

/// Collection names end up in SQL text, so only plain identifiers are accepted.
pub fn is_valid_collection_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

impl PgEmployeeStore {
    pub async fn connect(
        database_url: &str,
        collection: &str,
        max_connections: u32,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|err| StoreError::Unavailable(err.to_string()))?;
        Self::with_pool(pool, collection)
    }

    pub fn with_pool(pool: PgPool, collection: &str) -> Result<Self, StoreError> {
        if !is_valid_collection_name(collection) {
            return Err(StoreError::Invalid(format!("invalid collection name: {}", collection)));
        }
        Ok(PgEmployeeStore {
            pool,
            collection: collection.to_string(),
        })
    }

    /// Creates the collection table if it does not exist yet.
    pub async fn ensure_collection(&self) -> Result<(), StoreError> {
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} (id TEXT PRIMARY KEY, doc JSONB NOT NULL)",
            self.collection
        );
        sqlx::query(&sql)
            .execute(&self.pool)
            .await
            .map_err(|err| map_sqlx_error(err, &self.collection))?;
        Ok(())
    }
}

#[async_trait]
impl EmployeeStore for PgEmployeeStore {
    async fn query(&self, filter: &Value) -> Result<Vec<Employee>, StoreError> {
        let sql = format!("SELECT doc FROM {} WHERE doc @> $1", self.collection);
        let mut rows = sqlx::query_as::<_, (Json<Employee>,)>(&sql)
            .bind(Json(filter))
            .fetch(&self.pool);

        let mut results = Vec::new();
        while let Some((Json(employee),)) = rows
            .try_next()
            .await
            .map_err(|err| map_sqlx_error(err, &self.collection))?
        {
            results.push(employee);
        }
        Ok(results)
    }

    async fn read(&self, id: &str) -> Result<Employee, StoreError> {
        let sql = format!("SELECT doc FROM {} WHERE id = $1", self.collection);
        let (Json(employee),) = sqlx::query_as::<_, (Json<Employee>,)>(&sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|err| map_sqlx_error(err, id))?;
        Ok(employee)
    }

    async fn create(&self, employee: &Employee) -> Result<(), StoreError> {
        let sql = format!("INSERT INTO {} (id, doc) VALUES ($1, $2)", self.collection);
        sqlx::query(&sql)
            .bind(&employee.id)
            .bind(Json(employee))
            .execute(&self.pool)
            .await
            .map_err(|err| map_sqlx_error(err, &employee.id))?;
        Ok(())
    }

    async fn upsert(&self, employee: &Employee) -> Result<Employee, StoreError> {
        let sql = format!(
            "INSERT INTO {} (id, doc) VALUES ($1, $2) \
             ON CONFLICT (id) DO UPDATE SET doc = EXCLUDED.doc \
             RETURNING doc",
            self.collection
        );
        let (Json(stored),) = sqlx::query_as::<_, (Json<Employee>,)>(&sql)
            .bind(&employee.id)
            .bind(Json(employee))
            .fetch_one(&self.pool)
            .await
            .map_err(|err| map_sqlx_error(err, &employee.id))?;
        Ok(stored)
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", self.collection);
        let result = sqlx::query(&sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|err| map_sqlx_error(err, id))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_names_are_plain_identifiers() {
        assert!(is_valid_collection_name("employees"));
        assert!(is_valid_collection_name("_staging_2"));
        assert!(!is_valid_collection_name(""));
        assert!(!is_valid_collection_name("2fast"));
        assert!(!is_valid_collection_name("employees; DROP TABLE x"));
    }

    #[test]
    fn row_not_found_maps_to_not_found() {
        let err = map_sqlx_error(sqlx::Error::RowNotFound, "e-1");
        assert!(matches!(err, StoreError::NotFound(id) if id == "e-1"));
    }

    #[test]
    fn pool_exhaustion_maps_to_unavailable() {
        assert!(matches!(
            map_sqlx_error(sqlx::Error::PoolTimedOut, "e-1"),
            StoreError::Unavailable(_)
        ));
    }
}
