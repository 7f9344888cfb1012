use crate::{
    records,
    storage::KeyValueStore,
    sync::{SyncOutcome, sync_session},
};

use super::{Tracker, now};

impl<S: KeyValueStore> Tracker<S> {
    /// Reconciles the history with the current session and persists the
    /// history if it was written.
    ///
    /// Calling it again without an intervening change is a no-op: nothing is
    /// written and `saved_at` stays put.
    pub fn sync(&mut self) -> SyncOutcome {
        let outcome = sync_session(&self.session, &mut self.saved, now());
        tracing::debug!(session = %self.session.id(), ?outcome, "synchronized history");
        if outcome.is_write() {
            self.persist_saved();
        }
        outcome
    }

    /// Runs after every applied mutation of the current session.
    pub(super) fn commit(&mut self) {
        self.sync();
        self.persist_session();
    }

    pub(super) fn persist_session(&mut self) {
        if let Err(err) = records::save_session(&mut self.storage, &self.session) {
            tracing::warn!("failed to persist current session: {err}");
        }
    }

    pub(super) fn persist_saved(&mut self) {
        if let Err(err) = records::save_saved(&mut self.storage, &self.saved) {
            tracing::warn!("failed to persist saved sessions: {err}");
        }
    }
}
