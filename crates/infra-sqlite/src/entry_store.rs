// SQLite EntryStore Implementation

use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::str::FromStr;
use tracing::debug;
use waitlist_core::domain::{Entry, EntryId, EntryStatus};
use waitlist_core::error::{AppError, Result};
use waitlist_core::port::{EntryPredicate, EntryStore};

/// Upper bound on bound parameters per bulk delete
const DELETE_CHUNK: usize = 500;

// Helper to convert sqlx::Error to AppError with structured information
fn map_sqlx_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) => {
            if let Some(code) = db_err.code() {
                let code_str = code.as_ref();

                // SQLite error codes: https://www.sqlite.org/rescode.html
                match code_str {
                    "2067" | "1555" => AppError::Storage(format!(
                        "Unique constraint violation: {} ({})",
                        db_err.message(),
                        code_str
                    )),
                    "5" | "517" => AppError::Storage(format!(
                        "Database locked (SQLITE_BUSY): {}",
                        db_err.message()
                    )),
                    "13" => AppError::Storage(format!("Database full: {}", db_err.message())),
                    _ => AppError::Storage(format!(
                        "Database error [{}]: {}",
                        code_str,
                        db_err.message()
                    )),
                }
            } else {
                AppError::Storage(format!("Database error: {}", db_err.message()))
            }
        }
        sqlx::Error::PoolTimedOut => {
            AppError::Storage("Timed out waiting for a database connection".to_string())
        }
        sqlx::Error::ColumnNotFound(col) => AppError::Storage(format!("Column not found: {}", col)),
        _ => AppError::Storage(err.to_string()),
    }
}

pub struct SqliteEntryStore {
    pool: SqlitePool,
}

impl SqliteEntryStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn delete_ids(&self, ids: &[EntryId]) -> Result<u64> {
        let mut removed = 0;
        for chunk in ids.chunks(DELETE_CHUNK) {
            let mut builder: QueryBuilder<Sqlite> =
                QueryBuilder::new("DELETE FROM entries WHERE id IN (");
            let mut separated = builder.separated(", ");
            for id in chunk {
                separated.push_bind(id);
            }
            separated.push_unseparated(")");

            removed += builder
                .build()
                .execute(&self.pool)
                .await
                .map_err(map_sqlx_error)?
                .rows_affected();
        }
        Ok(removed)
    }
}

#[async_trait]
impl EntryStore for SqliteEntryStore {
    async fn insert(&self, entry: &Entry, active_since: i64) -> Result<()> {
        let activities = serde_json::to_string(&entry.activities)?;

        // Check and insert in one statement: SQLite takes the write lock
        // before evaluating the NOT EXISTS, so concurrent inserts serialize.
        let result = sqlx::query(
            r#"
            INSERT INTO entries (id, name, status, activities, urgency, timestamp)
            SELECT ?, ?, ?, ?, ?, ?
            WHERE NOT EXISTS (
                SELECT 1 FROM entries
                WHERE name = ? AND timestamp >= ? AND status != 'done'
            )
            "#,
        )
        .bind(&entry.id)
        .bind(&entry.name)
        .bind(entry.status.as_str())
        .bind(&activities)
        .bind(entry.urgency)
        .bind(entry.timestamp)
        .bind(&entry.name)
        .bind(active_since)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::Conflict(format!(
                "{} is already in the queue",
                entry.name
            )));
        }

        Ok(())
    }

    async fn find_by_id(&self, id: &EntryId) -> Result<Option<Entry>> {
        let row = sqlx::query_as::<_, EntryRow>("SELECT * FROM entries WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.map(EntryRow::into_entry).transpose()
    }

    async fn remove(&self, id: &EntryId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM entries WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_status(&self, id: &EntryId, status: EntryStatus) -> Result<Entry> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        // Write first so the transaction holds the write lock from the start
        let updated = sqlx::query("UPDATE entries SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        if updated.rows_affected() == 0 {
            tx.rollback().await.map_err(map_sqlx_error)?;
            return Err(AppError::NotFound(format!("Entry {} not found", id)));
        }

        if status == EntryStatus::Using {
            let displaced = sqlx::query("DELETE FROM entries WHERE status = 'using' AND id != ?")
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(map_sqlx_error)?;
            if displaced.rows_affected() > 0 {
                debug!(
                    entry_id = %id,
                    displaced = displaced.rows_affected(),
                    "Previous user removed"
                );
            }
        }

        let row = sqlx::query_as::<_, EntryRow>("SELECT * FROM entries WHERE id = ?")
            .bind(id)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;

        row.into_entry()
    }

    async fn list_all(&self) -> Result<Vec<Entry>> {
        let rows =
            sqlx::query_as::<_, EntryRow>("SELECT * FROM entries ORDER BY timestamp ASC, id ASC")
                .fetch_all(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        rows.into_iter().map(EntryRow::into_entry).collect()
    }

    async fn remove_where(&self, predicate: EntryPredicate<'_>) -> Result<u64> {
        // The predicate runs in Rust, so it sees a snapshot. Rows removed
        // concurrently in between are simply not counted twice.
        let doomed: Vec<EntryId> = self
            .list_all()
            .await?
            .into_iter()
            .filter(|entry| predicate(entry))
            .map(|entry| entry.id)
            .collect();

        if doomed.is_empty() {
            return Ok(0);
        }

        self.delete_ids(&doomed).await
    }
}

#[derive(Debug, sqlx::FromRow)]
struct EntryRow {
    id: String,
    name: String,
    status: String,
    activities: String, // JSON array
    urgency: bool,      // SQLite boolean as integer
    timestamp: i64,
}

impl EntryRow {
    fn into_entry(self) -> Result<Entry> {
        let status = EntryStatus::from_str(&self.status).map_err(|_| {
            AppError::Storage(format!(
                "Entry {} has unknown status '{}'",
                self.id, self.status
            ))
        })?;
        let activities: Vec<String> = serde_json::from_str(&self.activities)?;

        Ok(Entry {
            id: self.id,
            name: self.name,
            status,
            activities,
            urgency: self.urgency,
            timestamp: self.timestamp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_pool, run_migrations};
    use std::sync::Arc;
    use std::time::Duration;
    use waitlist_core::domain::{is_expired, MAX_WAIT_TIME_MS};

    const NOW: i64 = 1_700_000_000_000;

    async fn setup_test_db() -> SqliteEntryStore {
        let pool = create_pool("sqlite::memory:", Duration::from_secs(5))
            .await
            .unwrap();
        run_migrations(&pool).await.unwrap();
        SqliteEntryStore::new(pool)
    }

    fn entry(id: &str, name: &str, timestamp: i64) -> Entry {
        Entry::new(id, timestamp, name, vec!["shave".into(), "misc".into()], false).unwrap()
    }

    fn window() -> i64 {
        NOW - MAX_WAIT_TIME_MS
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = setup_test_db().await;
        let mut e = entry("e1", "Grace", NOW);
        e.urgency = true;

        store.insert(&e, window()).await.unwrap();

        let found = store.find_by_id(&e.id).await.unwrap();
        assert_eq!(found, Some(e));
        assert!(store.find_by_id(&"missing".to_string()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_rejects_active_duplicate_name() {
        let store = setup_test_db().await;
        store.insert(&entry("e1", "Krithik", NOW), window()).await.unwrap();

        let err = store
            .insert(&entry("e2", "Krithik", NOW + 1), window())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(store.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_insert_allows_name_when_previous_done_or_stale() {
        let store = setup_test_db().await;

        let stale = entry("old", "Nikita", window() - 1);
        store.insert(&stale, i64::MIN).await.unwrap();
        store.insert(&entry("e1", "Nikita", NOW), window()).await.unwrap();

        store.set_status(&"e1".to_string(), EntryStatus::Done).await.unwrap();
        store.insert(&entry("e2", "Nikita", NOW), window()).await.unwrap();

        assert_eq!(store.list_all().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_set_status_keeps_single_user() {
        let store = setup_test_db().await;
        store.insert(&entry("a", "A", NOW), window()).await.unwrap();
        store.insert(&entry("b", "B", NOW + 1), window()).await.unwrap();
        store.insert(&entry("c", "C", NOW + 2), window()).await.unwrap();

        store.set_status(&"a".to_string(), EntryStatus::Using).await.unwrap();
        let b = store
            .set_status(&"b".to_string(), EntryStatus::Using)
            .await
            .unwrap();
        assert_eq!(b.status, EntryStatus::Using);

        let all = store.list_all().await.unwrap();
        let ids: Vec<&str> = all.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
        assert_eq!(all.iter().filter(|e| e.is_using()).count(), 1);
    }

    #[tokio::test]
    async fn test_set_status_missing_entry() {
        let store = setup_test_db().await;
        let err = store
            .set_status(&"ghost".to_string(), EntryStatus::Using)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_remove() {
        let store = setup_test_db().await;
        store.insert(&entry("e1", "Viraat", NOW), window()).await.unwrap();

        assert!(store.remove(&"e1".to_string()).await.unwrap());
        assert!(!store.remove(&"e1".to_string()).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_all_is_oldest_first() {
        let store = setup_test_db().await;
        store.insert(&entry("late", "Late", NOW + 10), window()).await.unwrap();
        store.insert(&entry("early", "Early", NOW), window()).await.unwrap();

        let names: Vec<String> = store
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["Early", "Late"]);
    }

    #[tokio::test]
    async fn test_remove_where_expired() {
        let store = setup_test_db().await;
        for i in 0..3 {
            let e = entry(&format!("old{}", i), &format!("Old{}", i), 0);
            store.insert(&e, i64::MIN).await.unwrap();
        }
        store.insert(&entry("new", "New", NOW), window()).await.unwrap();

        let expired = |e: &Entry| is_expired(e, NOW, MAX_WAIT_TIME_MS);
        assert_eq!(store.remove_where(&expired).await.unwrap(), 3);
        assert_eq!(store.remove_where(&expired).await.unwrap(), 0);
        assert_eq!(store.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_remove_where_spans_several_delete_chunks() {
        let store = setup_test_db().await;
        let total = DELETE_CHUNK * 2 + 1;
        for i in 0..total {
            let e = entry(&format!("old{}", i), &format!("Old{}", i), 0);
            store.insert(&e, i64::MIN).await.unwrap();
        }
        store.insert(&entry("new", "New", NOW), window()).await.unwrap();

        let expired = |e: &Entry| is_expired(e, NOW, MAX_WAIT_TIME_MS);
        assert_eq!(store.remove_where(&expired).await.unwrap(), total as u64);

        let left = store.list_all().await.unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].id, "new");
    }

    #[tokio::test]
    async fn test_corrupt_status_is_storage_error() {
        let store = setup_test_db().await;
        sqlx::query(
            "INSERT INTO entries (id, name, status, activities, urgency, timestamp) \
             VALUES ('x', 'X', 'sleeping', '[]', 0, 0)",
        )
        .execute(&store.pool)
        .await
        .unwrap();

        let err = store.list_all().await.unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));
    }

    #[tokio::test]
    async fn test_concurrent_inserts_same_name_file_db() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("race.db").display());
        let pool = create_pool(&url, Duration::from_secs(5)).await.unwrap();
        run_migrations(&pool).await.unwrap();
        let store = Arc::new(SqliteEntryStore::new(pool));

        let mut handles = Vec::new();
        for i in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .insert(&entry(&format!("k{}", i), "Krithik", NOW), window())
                    .await
            }));
        }

        let mut ok = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(()) => ok += 1,
                Err(e) => assert!(matches!(e, AppError::Conflict(_)), "got {:?}", e),
            }
        }
        assert_eq!(ok, 1);
    }

    #[tokio::test]
    async fn test_entries_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("persist.db").display());

        {
            let pool = create_pool(&url, Duration::from_secs(5)).await.unwrap();
            run_migrations(&pool).await.unwrap();
            let store = SqliteEntryStore::new(pool.clone());
            store.insert(&entry("e1", "Shihao", NOW), window()).await.unwrap();
            pool.close().await;
        }

        let pool = create_pool(&url, Duration::from_secs(5)).await.unwrap();
        run_migrations(&pool).await.unwrap();
        let store = SqliteEntryStore::new(pool);
        let all = store.list_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].activities, vec!["shave", "misc"]);
    }
}
