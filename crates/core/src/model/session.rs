use chrono::{DateTime, Utc};

use crate::model::ids::SessionId;

/// A quiz session, created lazily on the first accepted answer for a
/// previously-unseen token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub id: SessionId,
    pub started_at: DateTime<Utc>,
}

impl Session {
    #[must_use]
    pub fn new(id: SessionId, started_at: DateTime<Utc>) -> Self {
        Self { id, started_at }
    }
}
