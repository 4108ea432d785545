//! Diesel-based repository for the append-only analysis log.
//!
//! Uses diesel-async's SyncConnectionWrapper to provide an async interface
//! while maintaining Diesel's compile-time query checking. The table is
//! append-only by construction: no update or delete path exists.

use chrono::Utc;
use diesel::prelude::*;
use diesel_async::{RunQueryDsl, SimpleAsyncConnection};

use super::models::{AnalysisLogRecord, NewAnalysisLog};
use super::parse_datetime;
use super::pool::{AsyncSqlitePool, DieselError};
use crate::models::AnalysisLog;
use crate::schema::analysis_logs;

/// Convert a database record to a domain model.
impl From<AnalysisLogRecord> for AnalysisLog {
    fn from(record: AnalysisLogRecord) -> Self {
        AnalysisLog {
            id: record.id,
            request_text: record.request_text,
            response_text: record.response_text,
            timestamp: parse_datetime(&record.timestamp),
        }
    }
}

/// Repository over the `analysis_logs` table.
#[derive(Clone)]
pub struct LogRepository {
    pool: AsyncSqlitePool,
}

impl LogRepository {
    /// Create a new log repository with an existing pool.
    pub fn new(pool: AsyncSqlitePool) -> Self {
        Self { pool }
    }

    /// Create the table if it does not exist yet.
    ///
    /// The only schema change this service ever makes; safe to run on every
    /// startup.
    pub async fn init_schema(&self) -> Result<(), DieselError> {
        let mut conn = self.pool.get().await?;

        conn.batch_execute(
            r#"CREATE TABLE IF NOT EXISTS analysis_logs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                request_text TEXT NOT NULL,
                response_text TEXT NOT NULL,
                timestamp TEXT NOT NULL
            )"#,
        )
        .await?;

        Ok(())
    }

    /// Append a request/response pair, returning the persisted row.
    pub async fn append(
        &self,
        request_text: &str,
        response_text: &str,
    ) -> Result<AnalysisLog, DieselError> {
        let mut conn = self.pool.get().await?;
        let timestamp = Utc::now().to_rfc3339();

        diesel::insert_into(analysis_logs::table)
            .values(NewAnalysisLog {
                request_text,
                response_text,
                timestamp: &timestamp,
            })
            .execute(&mut conn)
            .await?;

        // The connection is exclusive to this operation, so the newest row
        // is the one just inserted.
        analysis_logs::table
            .order(analysis_logs::id.desc())
            .first::<AnalysisLogRecord>(&mut conn)
            .await
            .map(AnalysisLog::from)
    }

    /// All log entries in insertion order.
    pub async fn list_all(&self) -> Result<Vec<AnalysisLog>, DieselError> {
        let mut conn = self.pool.get().await?;

        analysis_logs::table
            .order(analysis_logs::id.asc())
            .load::<AnalysisLogRecord>(&mut conn)
            .await
            .map(|records| records.into_iter().map(AnalysisLog::from).collect())
    }

    /// Most recent entries, newest first.
    pub async fn list_recent(&self, limit: usize) -> Result<Vec<AnalysisLog>, DieselError> {
        let mut conn = self.pool.get().await?;

        analysis_logs::table
            .order(analysis_logs::id.desc())
            .limit(limit as i64)
            .load::<AnalysisLogRecord>(&mut conn)
            .await
            .map(|records| records.into_iter().map(AnalysisLog::from).collect())
    }

    /// Number of persisted entries.
    pub async fn count(&self) -> Result<i64, DieselError> {
        let mut conn = self.pool.get().await?;

        use diesel::dsl::count_star;
        analysis_logs::table
            .select(count_star())
            .first(&mut conn)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn setup_test_db() -> (AsyncSqlitePool, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let pool = AsyncSqlitePool::from_path(&db_path);

        let repo = LogRepository::new(pool.clone());
        repo.init_schema().await.unwrap();

        (pool, dir)
    }

    #[tokio::test]
    async fn test_append_assigns_id_and_timestamp() {
        let (pool, _dir) = setup_test_db().await;
        let repo = LogRepository::new(pool);

        let before = Utc::now();
        let entry = repo.append("some request", "some response").await.unwrap();

        assert_eq!(entry.request_text, "some request");
        assert_eq!(entry.response_text, "some response");
        assert!(entry.id >= 1);
        assert!(entry.timestamp >= before - chrono::Duration::seconds(1));
    }

    #[tokio::test]
    async fn test_list_all_preserves_insertion_order() {
        let (pool, _dir) = setup_test_db().await;
        let repo = LogRepository::new(pool);

        for i in 0..3 {
            repo.append(&format!("request {}", i), "{}").await.unwrap();
        }

        let all = repo.list_all().await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].request_text, "request 0");
        assert_eq!(all[2].request_text, "request 2");

        // Ids are non-decreasing in insertion order
        assert!(all.windows(2).all(|w| w[0].id < w[1].id));
    }

    #[tokio::test]
    async fn test_count_and_recent() {
        let (pool, _dir) = setup_test_db().await;
        let repo = LogRepository::new(pool);

        assert_eq!(repo.count().await.unwrap(), 0);

        repo.append("a", "{}").await.unwrap();
        repo.append("b", "{}").await.unwrap();

        assert_eq!(repo.count().await.unwrap(), 2);

        let recent = repo.list_recent(1).await.unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].request_text, "b");
    }

    #[tokio::test]
    async fn test_init_schema_is_idempotent() {
        let (pool, _dir) = setup_test_db().await;
        let repo = LogRepository::new(pool);

        repo.append("a", "{}").await.unwrap();
        repo.init_schema().await.unwrap();

        // Existing rows survive a second init
        assert_eq!(repo.count().await.unwrap(), 1);
    }
}
