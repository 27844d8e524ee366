use std::str::FromStr;

use quiz_core::model::{
    OptionId, Question, QuestionId, QuestionOption, QuestionType, Response, ResponseId, SessionId,
};
use sqlx::Row;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn i64_to_u64(field: &'static str, v: i64) -> Result<u64, StorageError> {
    u64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} sign overflow")))
}

pub(crate) fn question_id_from_i64(v: i64) -> Result<QuestionId, StorageError> {
    Ok(QuestionId::new(i64_to_u64("question_id", v)?))
}

pub(crate) fn option_id_from_i64(v: i64) -> Result<OptionId, StorageError> {
    Ok(OptionId::new(i64_to_u64("option_id", v)?))
}

pub(crate) fn response_id_from_i64(v: i64) -> Result<ResponseId, StorageError> {
    Ok(ResponseId::new(i64_to_u64("response_id", v)?))
}

pub(crate) fn question_id_to_i64(id: QuestionId) -> Result<i64, StorageError> {
    i64::try_from(id.value()).map_err(|_| StorageError::Serialization("question_id overflow".into()))
}

pub(crate) fn option_id_to_i64(id: OptionId) -> Result<i64, StorageError> {
    i64::try_from(id.value()).map_err(|_| StorageError::Serialization("option_id overflow".into()))
}

pub(crate) fn session_id_from_text(raw: &str) -> Result<SessionId, StorageError> {
    SessionId::from_str(raw).map_err(ser)
}

pub(crate) fn order_no_from_i64(v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid order_no: {v}")))
}

pub(crate) fn map_option_row(row: &sqlx::sqlite::SqliteRow) -> Result<QuestionOption, StorageError> {
    Ok(QuestionOption {
        id: option_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?,
        question_id: question_id_from_i64(row.try_get::<i64, _>("question_id").map_err(ser)?)?,
        text: row.try_get("text").map_err(ser)?,
    })
}

/// Rehydrates a question row plus its (already fetched) options into the
/// domain type, re-running the domain invariant checks.
pub(crate) fn map_question_row(
    row: &sqlx::sqlite::SqliteRow,
    options: Vec<QuestionOption>,
) -> Result<Question, StorageError> {
    let type_str: String = row.try_get("question_type").map_err(ser)?;
    let question_type = QuestionType::from_str(&type_str).map_err(ser)?;

    Question::new(
        question_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?,
        order_no_from_i64(row.try_get::<i64, _>("order_no").map_err(ser)?)?,
        row.try_get::<String, _>("text").map_err(ser)?,
        question_type,
        row.try_get("correct_answer").map_err(ser)?,
        options,
    )
    .map_err(ser)
}

pub(crate) fn map_response_row(row: &sqlx::sqlite::SqliteRow) -> Result<Response, StorageError> {
    let session_raw: String = row.try_get("session_id").map_err(ser)?;
    Ok(Response {
        id: response_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?,
        session_id: session_id_from_text(&session_raw)?,
        question_id: question_id_from_i64(row.try_get::<i64, _>("question_id").map_err(ser)?)?,
        answer_text: row.try_get("answer_text").map_err(ser)?,
    })
}

/// Maps a sqlx error to the storage taxonomy: constraint violations become
/// `Conflict`, everything else `Connection`.
pub(crate) fn map_sqlx_error(e: sqlx::Error) -> StorageError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() || db_err.is_foreign_key_violation() {
            return StorageError::Conflict;
        }
    }
    StorageError::Connection(e.to_string())
}
