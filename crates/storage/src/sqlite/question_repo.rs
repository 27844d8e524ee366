use std::collections::HashMap;

use quiz_core::model::{Question, QuestionOption};
use sqlx::Row;

use super::mapping::{map_option_row, map_question_row, map_sqlx_error, ser};
use super::SqliteRepository;
use crate::repository::{QuestionRepository, StorageError};

impl SqliteRepository {
    /// Options for every question, grouped by owning question id.
    async fn load_all_options(&self) -> Result<HashMap<i64, Vec<QuestionOption>>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, question_id, text
            FROM question_options
            ORDER BY question_id ASC, id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let mut by_question: HashMap<i64, Vec<QuestionOption>> = HashMap::new();
        for row in rows {
            let question_id: i64 = row.try_get("question_id").map_err(ser)?;
            by_question
                .entry(question_id)
                .or_default()
                .push(map_option_row(&row)?);
        }
        Ok(by_question)
    }

    async fn load_options_for(&self, question_id: i64) -> Result<Vec<QuestionOption>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, question_id, text
            FROM question_options
            WHERE question_id = ?1
            ORDER BY id ASC
            ",
        )
        .bind(question_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.iter().map(map_option_row).collect()
    }
}

#[async_trait::async_trait]
impl QuestionRepository for SqliteRepository {
    async fn list_questions(&self) -> Result<Vec<Question>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, order_no, text, question_type, correct_answer
            FROM questions
            ORDER BY order_no ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let mut options = self.load_all_options().await?;

        let mut questions = Vec::with_capacity(rows.len());
        for row in rows {
            let id: i64 = row.try_get("id").map_err(ser)?;
            let opts = options.remove(&id).unwrap_or_default();
            questions.push(map_question_row(&row, opts)?);
        }
        Ok(questions)
    }

    async fn get_by_order_no(&self, order_no: u32) -> Result<Option<Question>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, order_no, text, question_type, correct_answer
            FROM questions
            WHERE order_no = ?1
            ",
        )
        .bind(i64::from(order_no))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let id: i64 = row.try_get("id").map_err(ser)?;
        let options = self.load_options_for(id).await?;
        Ok(Some(map_question_row(&row, options)?))
    }

    async fn count(&self) -> Result<u64, StorageError> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM questions")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        let n: i64 = row.try_get("n").map_err(ser)?;
        u64::try_from(n).map_err(|_| StorageError::Serialization(format!("invalid count: {n}")))
    }
}
