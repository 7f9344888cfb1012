//! Keeps the saved-session history in step with the live session.
//!
//! The history mirrors every session that ever had content: an entry is
//! created when its session first holds data, rewritten when the content
//! changes, and dropped once the session is emptied out. Identical content
//! never rewrites the entry, so `saved_at` only moves on real edits.

use chrono::{DateTime, Utc};

use crate::{
    saved::{SavedSession, SavedSessions},
    session::Session,
};

/// What a synchronization did to the history.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncOutcome {
    Created,
    Updated,
    Removed,
    Unchanged,
}

impl SyncOutcome {
    /// `true` when the history was written and must be persisted.
    #[must_use]
    pub fn is_write(self) -> bool {
        !matches!(self, SyncOutcome::Unchanged)
    }
}

/// Reconciles `saved` with `session`, stamping writes with `now`.
pub fn sync_session(
    session: &Session,
    saved: &mut SavedSessions,
    now: DateTime<Utc>,
) -> SyncOutcome {
    let id = session.id();
    let existing = saved.get(id).map(|entry| entry.differs_from(session));

    match (session.has_data(), existing) {
        (true, None) => {
            saved.upsert(SavedSession::snapshot(session, now));
            SyncOutcome::Created
        }
        (true, Some(true)) => {
            saved.upsert(SavedSession::snapshot(session, now));
            SyncOutcome::Updated
        }
        (false, Some(_)) => {
            saved.remove(id);
            SyncOutcome::Removed
        }
        (true, Some(false)) | (false, None) => SyncOutcome::Unchanged,
    }
}
