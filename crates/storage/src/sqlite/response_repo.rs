use quiz_core::model::{QuestionId, Response, ResponseId, SessionId};
use sqlx::Row;

use super::mapping::{
    map_response_row, map_sqlx_error, question_id_to_i64, response_id_from_i64, ser,
};
use super::SqliteRepository;
use crate::repository::{ResponseRepository, StorageError};

#[async_trait::async_trait]
impl ResponseRepository for SqliteRepository {
    async fn get_response(
        &self,
        session_id: SessionId,
        question_id: QuestionId,
    ) -> Result<Option<Response>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, session_id, question_id, answer_text
            FROM responses
            WHERE session_id = ?1 AND question_id = ?2
            ",
        )
        .bind(session_id.to_string())
        .bind(question_id_to_i64(question_id)?)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref().map(map_response_row).transpose()
    }

    async fn upsert_response(
        &self,
        session_id: SessionId,
        question_id: QuestionId,
        answer_text: &str,
    ) -> Result<ResponseId, StorageError> {
        // Single atomic statement: the unique index on (session_id,
        // question_id) turns a concurrent duplicate insert into an update,
        // and RETURNING yields the surviving row id either way.
        let row = sqlx::query(
            r"
            INSERT INTO responses (session_id, question_id, answer_text)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(session_id, question_id) DO UPDATE SET
                answer_text = excluded.answer_text
            RETURNING id
            ",
        )
        .bind(session_id.to_string())
        .bind(question_id_to_i64(question_id)?)
        .bind(answer_text)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        response_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)
    }

    async fn list_for_session(
        &self,
        session_id: SessionId,
    ) -> Result<Vec<Response>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, session_id, question_id, answer_text
            FROM responses
            WHERE session_id = ?1
            ORDER BY question_id ASC
            ",
        )
        .bind(session_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.iter().map(map_response_row).collect()
    }
}
