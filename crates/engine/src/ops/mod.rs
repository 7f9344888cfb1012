use chrono::{DateTime, SubsecRound, Utc};

use crate::{
    Balance, SavedSession, SavedSessions, Session, Settlement, balances::build_summary,
    records, settlements::calculate_settlements,
    storage::{KeyValueStore, MemoryStore},
};

mod lifecycle;
mod participants;
mod persistence;
mod rows;

/// Owns the live session, the saved-session history and the storage they
/// are persisted to.
///
/// Every mutating method reports whether it changed anything. A change is
/// followed, before the method returns, by a synchronization of the history
/// and a write of the affected records. Storage failures are logged and
/// swallowed: the in-memory state stays authoritative.
#[derive(Debug)]
pub struct Tracker<S: KeyValueStore> {
    session: Session,
    saved: SavedSessions,
    storage: S,
}

impl Tracker<MemoryStore> {
    /// Return a builder for `Tracker`. Help to build the struct.
    pub fn builder() -> TrackerBuilder<MemoryStore> {
        TrackerBuilder::default()
    }
}

impl<S: KeyValueStore> Tracker<S> {
    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn saved(&self) -> &SavedSessions {
        &self.saved
    }

    /// Saved sessions, most recently written first.
    pub fn saved_sessions(&self) -> Vec<&SavedSession> {
        self.saved.newest_first()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Net balance of every participant of the current session.
    pub fn summary(&self) -> Vec<Balance> {
        build_summary(self.session.participants(), self.session.rows())
    }

    /// Transfers that settle the current session.
    pub fn settlements(&self) -> Vec<Settlement> {
        calculate_settlements(&self.summary())
    }
}

/// Stored timestamps keep millisecond precision; stamping at the same
/// precision keeps in-memory and reloaded snapshots equal.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// The builder for `Tracker`
#[derive(Debug, Default)]
pub struct TrackerBuilder<S> {
    storage: S,
}

impl<S: KeyValueStore> TrackerBuilder<S> {
    /// Pass the storage the tracker reads from and writes to
    pub fn storage<T: KeyValueStore>(self, storage: T) -> TrackerBuilder<T> {
        TrackerBuilder { storage }
    }

    /// Construct `Tracker`, reading both records once.
    ///
    /// The loaded session is synchronized against the loaded history right
    /// away, so a history that lost track of the current session is
    /// repaired on startup.
    pub fn build(self) -> Tracker<S> {
        let session = records::load_session(&self.storage);
        let saved = records::load_saved(&self.storage);
        tracing::debug!(
            session = %session.id(),
            saved = saved.len(),
            "loaded tracker state"
        );

        let mut tracker = Tracker {
            session,
            saved,
            storage: self.storage,
        };
        tracker.sync();
        tracker
    }
}
