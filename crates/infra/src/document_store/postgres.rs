//! Postgres-backed document store.
//!
//! All collections share one `documents` table keyed by `(collection, id)`,
//! with the body kept as JSONB. Ids are stored in their 32-character hex form
//! and sorted with the `"C"` collation so SQL order equals byte order. Field
//! filters use JSONB containment (`@>`), which the GIN index serves.

use serde_json::Value as JsonValue;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::Row;
use tokio_stream::StreamExt;
use tracing::instrument;

use postboard_core::DocumentId;

use super::r#trait::{Document, DocumentStore, DocumentStream, FieldFilter, FindOrder, StoreError};

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS documents (
    collection TEXT NOT NULL,
    id TEXT NOT NULL,
    body JSONB NOT NULL,
    PRIMARY KEY (collection, id)
)
"#;

const CREATE_BODY_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS documents_body_idx ON documents USING GIN (body jsonb_path_ops)
"#;

const FIND_NATURAL: &str = r#"
SELECT id, body
FROM documents
WHERE collection = $1 AND body @> jsonb_build_object($2::text, $3::jsonb)
"#;

const FIND_ID_ASCENDING: &str = r#"
SELECT id, body
FROM documents
WHERE collection = $1 AND body @> jsonb_build_object($2::text, $3::jsonb)
ORDER BY id COLLATE "C" ASC
"#;

#[derive(Debug, Clone)]
pub struct PostgresDocumentStore {
    pool: PgPool,
}

impl PostgresDocumentStore {
    /// Wrap an existing pool. The caller is responsible for the schema; see
    /// [`PostgresDocumentStore::ensure_schema`].
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool against `database_url` and make sure the table exists.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;

        let store = Self::new(pool);
        store.ensure_schema().await?;
        Ok(store)
    }

    /// Create the `documents` table if it is missing. This is bootstrap only;
    /// there are no migrations.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_TABLE)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("create_table", e))?;
        sqlx::query(CREATE_BODY_INDEX)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("create_index", e))?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl DocumentStore for PostgresDocumentStore {
    #[instrument(skip(self, body), err)]
    async fn insert(&self, collection: &str, body: JsonValue) -> Result<DocumentId, StoreError> {
        if !body.is_object() {
            return Err(StoreError::Malformed("document body must be a JSON object".to_string()));
        }

        let id = DocumentId::generate();
        sqlx::query("INSERT INTO documents (collection, id, body) VALUES ($1, $2, $3)")
            .bind(collection)
            .bind(id.to_hex())
            .bind(Json(body))
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("insert", e))?;
        Ok(id)
    }

    #[instrument(skip(self), fields(id = %id), err)]
    async fn find_one(&self, collection: &str, id: DocumentId) -> Result<Option<Document>, StoreError> {
        let row = sqlx::query("SELECT id, body FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id.to_hex())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_one", e))?;

        row.map(decode_row).transpose()
    }

    fn find(&self, collection: &str, filter: FieldFilter, order: FindOrder) -> DocumentStream<'_> {
        let sql = match order {
            FindOrder::Natural => FIND_NATURAL,
            FindOrder::IdAscending => FIND_ID_ASCENDING,
        };

        let rows = sqlx::query(sql)
            .bind(collection.to_string())
            .bind(filter.field)
            .bind(Json(filter.value))
            .fetch(&self.pool);

        Box::pin(rows.map(|row| decode_row(row.map_err(|e| map_sqlx_error("find", e))?)))
    }
}

fn decode_row(row: PgRow) -> Result<Document, StoreError> {
    let id: String = row
        .try_get("id")
        .map_err(|e| StoreError::Malformed(format!("id column: {e}")))?;
    let id: DocumentId = id
        .parse()
        .map_err(|e| StoreError::Malformed(format!("stored id {id:?}: {e}")))?;
    let Json(body): Json<JsonValue> = row
        .try_get("body")
        .map_err(|e| StoreError::Malformed(format!("body column: {e}")))?;
    Ok(Document { id, body })
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            StoreError::Backend(format!("database error in {operation}: {}", db_err.message()))
        }
        sqlx::Error::ColumnDecode { index, source } => {
            StoreError::Malformed(format!("{operation}: column {index}: {source}"))
        }
        other => StoreError::Backend(format!("{operation}: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn connect() -> PostgresDocumentStore {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for postgres tests");
        PostgresDocumentStore::connect(&url, 2).await.expect("failed to connect")
    }

    #[tokio::test]
    #[ignore = "requires a running Postgres (DATABASE_URL)"]
    async fn insert_find_one_and_sorted_find() {
        let store = connect().await;
        let collection = format!("test_{}", DocumentId::generate());
        let author = DocumentId::generate().to_hex();

        let a = store.insert(&collection, json!({ "author": author, "n": 1 })).await.unwrap();
        let b = store.insert(&collection, json!({ "author": author, "n": 2 })).await.unwrap();
        store.insert(&collection, json!({ "author": "someone else" })).await.unwrap();

        let found = store.find_one(&collection, a).await.unwrap().unwrap();
        assert_eq!(found.body["n"], 1);

        let docs: Vec<Document> = store
            .find(&collection, FieldFilter::eq("author", author.clone()), FindOrder::IdAscending)
            .map(|r| r.unwrap())
            .collect()
            .await;
        assert_eq!(docs.iter().map(|d| d.id).collect::<Vec<_>>(), vec![a, b]);

        // Containment on a scalar field is exact equality: a prefix of the
        // author does not match.
        let prefix = author[..8].to_string();
        let none: Vec<Document> = store
            .find(&collection, FieldFilter::eq("author", prefix), FindOrder::Natural)
            .map(|r| r.unwrap())
            .collect()
            .await;
        assert!(none.is_empty());
    }
}
