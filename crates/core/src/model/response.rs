use crate::model::ids::{QuestionId, ResponseId, SessionId};

/// A stored answer for one (session, question) pair.
///
/// Invariant: at most one response exists per pair; a repeat submission
/// overwrites the text in place and keeps the row identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub id: ResponseId,
    pub session_id: SessionId,
    pub question_id: QuestionId,
    /// Trimmed, HTML-escaped answer text.
    pub answer_text: String,
}
