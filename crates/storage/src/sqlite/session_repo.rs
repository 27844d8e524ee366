use chrono::{DateTime, Utc};
use quiz_core::model::SessionId;

use super::mapping::map_sqlx_error;
use super::SqliteRepository;
use crate::repository::{SessionRepository, StorageError};

#[async_trait::async_trait]
impl SessionRepository for SqliteRepository {
    async fn session_exists(&self, session_id: SessionId) -> Result<bool, StorageError> {
        let row = sqlx::query("SELECT 1 FROM quiz_sessions WHERE id = ?1")
            .bind(session_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.is_some())
    }

    async fn create_session(
        &self,
        session_id: SessionId,
        started_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        // ON CONFLICT DO NOTHING keeps the gate idempotent under concurrent
        // first submissions for the same token.
        sqlx::query(
            r"
            INSERT INTO quiz_sessions (id, started_at)
            VALUES (?1, ?2)
            ON CONFLICT(id) DO NOTHING
            ",
        )
        .bind(session_id.to_string())
        .bind(started_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        Ok(())
    }
}
