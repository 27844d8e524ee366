//! Answer text sanitization.
//!
//! Answers are HTML-escaped before validation and storage so that markup
//! submitted as an answer cannot leak into summary rendering later.

/// Trims and HTML-escapes raw answer text.
#[must_use]
pub fn sanitize_answer(raw: &str) -> String {
    ammonia::clean_text(raw.trim())
}
