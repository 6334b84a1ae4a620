use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqlitePoolOptions, Row, SqlitePool};
use std::path::Path;
use wundr_core::{storage_key, CoreError, Flashcard, FlashcardStore, STORE_NAMESPACE};

/// Key-value table holding each flashcard as a JSON body under its
/// namespaced `flashcard:` key. The body is decoded lazily so one bad
/// row is skipped instead of failing a whole listing.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub async fn open_file(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        // mode=rwc creates the database file on first open.
        let url = format!("sqlite://{}?mode=rwc", path.as_ref().to_string_lossy());
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&url)
            .await
            .map_err(|_| CoreError::Storage("sqlite connect"))?;
        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    /// In-memory database, one connection so every query sees the same
    /// instance. Used by tests.
    pub async fn open_memory() -> Result<Self, CoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(|_| CoreError::Storage("sqlite connect"))?;
        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    async fn ensure_schema(&self) -> Result<(), CoreError> {
        const STMT: &str = r#"
        CREATE TABLE IF NOT EXISTS records (
          key         TEXT PRIMARY KEY,
          body        TEXT NOT NULL,
          created_at  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_records_created ON records (created_at);
        "#;

        // Execute statements one by one for compatibility.
        for chunk in STMT.split(';') {
            let sql = chunk.trim();
            if sql.is_empty() {
                continue;
            }
            sqlx::query(sql)
                .execute(&self.pool)
                .await
                .map_err(|_| CoreError::Storage("sqlite schema"))?;
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl FlashcardStore for SqliteStore {
    async fn put(&self, card: &Flashcard) -> Result<(), CoreError> {
        let body = serde_json::to_string(card).map_err(|_| CoreError::Storage("encode card"))?;
        sqlx::query("INSERT OR REPLACE INTO records (key, body, created_at) VALUES (?,?,?)")
            .bind(storage_key(&card.id))
            .bind(body)
            .bind(dt_to_str(card.created_at))
            .execute(&self.pool)
            .await
            .map_err(|_| CoreError::Storage("insert card"))?;
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Flashcard>, CoreError> {
        let key = storage_key(id);
        let row = sqlx::query("SELECT body FROM records WHERE key=?")
            .bind(&key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|_| CoreError::Storage("read card"))?;
        Ok(row.and_then(|r| decode(&key, &r.get::<String, _>("body"))))
    }

    async fn delete(&self, id: &str) -> Result<(), CoreError> {
        // Absent key is a no-op, not an error.
        sqlx::query("DELETE FROM records WHERE key=?")
            .bind(storage_key(id))
            .execute(&self.pool)
            .await
            .map_err(|_| CoreError::Storage("delete card"))?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), CoreError> {
        // Single statement, so no reader sees a half-emptied set.
        sqlx::query("DELETE FROM records WHERE key LIKE ? || '%'")
            .bind(STORE_NAMESPACE)
            .execute(&self.pool)
            .await
            .map_err(|_| CoreError::Storage("clear cards"))?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Flashcard>, CoreError> {
        let rows = sqlx::query(
            "SELECT key, body FROM records WHERE key LIKE ? || '%' ORDER BY created_at DESC",
        )
        .bind(STORE_NAMESPACE)
        .fetch_all(&self.pool)
        .await
        .map_err(|_| CoreError::Storage("list cards"))?;
        Ok(rows
            .into_iter()
            .filter_map(|r| decode(&r.get::<String, _>("key"), &r.get::<String, _>("body")))
            .collect())
    }
}

// ===== Helpers =====
fn dt_to_str(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn decode(key: &str, body: &str) -> Option<Flashcard> {
    match serde_json::from_str::<Flashcard>(body) {
        Ok(card) => Some(card),
        Err(err) => {
            tracing::warn!(%err, key, "skipping unreadable flashcard record");
            None
        }
    }
}
