use uuid::Uuid;

use crate::{Session, storage::KeyValueStore};

use super::Tracker;

impl<S: KeyValueStore> Tracker<S> {
    /// Starts over with a blank session under a new id.
    ///
    /// The abandoned session is synchronized first, so whatever it held is
    /// kept in the history.
    pub fn reset(&mut self) {
        self.sync();
        let previous = self.session.id();
        self.session = Session::new();
        tracing::info!(previous = %previous, session = %self.session.id(), "session reset");
        self.commit();
    }

    /// Makes a saved session the current one, adopting its id.
    ///
    /// The current session is synchronized before switching away. Returns
    /// `false`, leaving the current session in place, when `id` is not in
    /// the history.
    pub fn restore(&mut self, id: Uuid) -> bool {
        self.sync();
        let Some(entry) = self.saved.get(id) else {
            tracing::debug!(session = %id, "nothing to restore");
            return false;
        };
        self.session = entry.to_session();
        tracing::info!(session = %id, "session restored");
        self.commit();
        true
    }

    /// Drops an entry from the history.
    ///
    /// The current session is left alone even when it has the same id; its
    /// next change creates the entry again.
    pub fn delete_saved(&mut self, id: Uuid) -> bool {
        if self.saved.remove(id).is_none() {
            return false;
        }
        tracing::info!(session = %id, "saved session deleted");
        self.persist_saved();
        true
    }
}
