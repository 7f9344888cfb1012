use crate::storage::KeyValueStore;

use super::Tracker;

impl<S: KeyValueStore> Tracker<S> {
    /// Adds a participant unless the name is blank or already taken.
    ///
    /// Every existing row gains a `false` receiver entry for them.
    pub fn add_participant(&mut self, name: &str) -> bool {
        let changed = self.session.add_participant(name);
        if changed {
            self.commit();
        }
        changed
    }

    /// Removes a participant from the list, from every receiver map and
    /// from every row they paid for.
    pub fn remove_participant(&mut self, name: &str) -> bool {
        let changed = self.session.remove_participant(name);
        if changed {
            self.commit();
        }
        changed
    }

    pub fn set_title(&mut self, title: &str) -> bool {
        let changed = self.session.set_title(title);
        if changed {
            self.commit();
        }
        changed
    }
}
