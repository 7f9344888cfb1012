//! The module contains `SavedSession`, a durable snapshot of a session, and
//! `SavedSessions`, the collection keyed by session id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::session::{ExpenseRow, Session};

/// A snapshot of a session, stored in the history.
///
/// Rows are owned copies: editing the live session never reaches into a
/// snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedSession {
    pub id: Uuid,
    #[serde(default)]
    pub title: String,
    #[serde(default, rename = "names", alias = "participants")]
    pub participants: Vec<String>,
    #[serde(default)]
    pub rows: Vec<ExpenseRow>,
    #[serde(default = "first_row_id", rename = "nextId", alias = "nextRowId")]
    pub next_row_id: u64,
    #[serde(default = "Utc::now", with = "chrono::serde::ts_milliseconds")]
    pub saved_at: DateTime<Utc>,
}

fn first_row_id() -> u64 {
    1
}

impl SavedSession {
    /// Deep-copies the session content into a snapshot stamped `saved_at`.
    pub fn snapshot(session: &Session, saved_at: DateTime<Utc>) -> Self {
        Self {
            id: session.id(),
            title: session.title().to_string(),
            participants: session.participants().to_vec(),
            rows: session.rows().to_vec(),
            next_row_id: session.next_row_id(),
            saved_at,
        }
    }

    /// `true` when title, participant list (order included) or any row field
    /// differ from the session.
    #[must_use]
    pub fn differs_from(&self, session: &Session) -> bool {
        self.title != session.title()
            || lists_differ(&self.participants, session.participants())
            || lists_differ(&self.rows, session.rows())
    }

    /// Rebuilds an editable session from the snapshot, keeping its id.
    pub fn to_session(&self) -> Session {
        Session::from_parts(
            self.id,
            self.title.clone(),
            self.participants.clone(),
            self.rows.clone(),
            self.next_row_id,
        )
    }
}

fn lists_differ<T: PartialEq>(a: &[T], b: &[T]) -> bool {
    a.len() != b.len() || a.iter().zip(b).any(|(x, y)| x != y)
}

/// The saved-session history: at most one entry per session id.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SavedSessions {
    entries: Vec<SavedSession>,
}

impl SavedSessions {
    /// Builds a collection, keeping the most recent entry for each id.
    pub fn from_entries(entries: Vec<SavedSession>) -> Self {
        let mut collection = Self::default();
        for entry in entries {
            match collection.position(entry.id) {
                Some(index) if collection.entries[index].saved_at >= entry.saved_at => {}
                Some(index) => collection.entries[index] = entry,
                None => collection.entries.push(entry),
            }
        }
        collection
    }

    pub fn get(&self, id: Uuid) -> Option<&SavedSession> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by `saved_at`, most recent first.
    pub fn newest_first(&self) -> Vec<&SavedSession> {
        let mut sorted: Vec<&SavedSession> = self.entries.iter().collect();
        sorted.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));
        sorted
    }

    /// Inserts or replaces the entry with the same id.
    pub(crate) fn upsert(&mut self, entry: SavedSession) {
        match self.position(entry.id) {
            Some(index) => self.entries[index] = entry,
            None => self.entries.push(entry),
        }
    }

    pub(crate) fn remove(&mut self, id: Uuid) -> Option<SavedSession> {
        self.position(id).map(|index| self.entries.remove(index))
    }

    fn position(&self, id: Uuid) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id == id)
    }
}
