use crate::storage::KeyValueStore;

use super::Tracker;

impl<S: KeyValueStore> Tracker<S> {
    /// Appends a blank row and returns its id.
    pub fn add_row(&mut self) -> u64 {
        let id = self.session.add_row();
        self.commit();
        id
    }

    /// Deletes a row; unknown ids are ignored.
    pub fn remove_row(&mut self, id: u64) -> bool {
        let changed = self.session.remove_row(id);
        if changed {
            self.commit();
        }
        changed
    }

    /// Sets a row amount, clamped to `[0, 9999.99]`. `None` clears it.
    pub fn set_amount(&mut self, id: u64, amount: Option<f64>) -> bool {
        let changed = self.session.set_amount(id, amount);
        if changed {
            self.commit();
        }
        changed
    }

    pub fn set_description(&mut self, id: u64, description: &str) -> bool {
        let changed = self.session.set_description(id, description);
        if changed {
            self.commit();
        }
        changed
    }

    /// Sets who paid for a row: a participant, or empty to clear.
    pub fn set_payer(&mut self, id: u64, name: &str) -> bool {
        let changed = self.session.set_payer(id, name);
        if changed {
            self.commit();
        }
        changed
    }

    pub fn set_received(&mut self, id: u64, name: &str, received: bool) -> bool {
        let changed = self.session.set_received(id, name, received);
        if changed {
            self.commit();
        }
        changed
    }

    pub fn set_all_received(&mut self, id: u64, received: bool) -> bool {
        let changed = self.session.set_all_received(id, received);
        if changed {
            self.commit();
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use crate::{Tracker, records::APP_STATE_KEY, storage::KeyValueStore};

    #[test]
    fn amount_edits_are_clamped_and_persisted() {
        let mut tracker = Tracker::builder().build();
        tracker.add_participant("Anna");
        let row = tracker.add_row();

        assert!(tracker.set_amount(row, Some(-5.0)));
        assert_eq!(tracker.session().row(row).unwrap().amount, Some(0.0));
        assert!(tracker.set_amount(row, Some(20_000.0)));
        assert_eq!(tracker.session().row(row).unwrap().amount, Some(9999.99));
        assert!(tracker.set_amount(row, None));
        assert_eq!(tracker.session().row(row).unwrap().amount, None);

        let raw = tracker.storage().get(APP_STATE_KEY).unwrap().unwrap();
        assert!(raw.contains("\"amount\":null"));
    }

    #[test]
    fn summary_and_settlements_follow_rows() {
        let mut tracker = Tracker::builder().build();
        for name in ["A", "B", "C"] {
            tracker.add_participant(name);
        }
        let row = tracker.add_row();
        tracker.set_payer(row, "A");
        tracker.set_amount(row, Some(30.0));
        tracker.set_description(row, "Dinner");
        tracker.set_all_received(row, true);

        let balances: Vec<f64> = tracker.summary().iter().map(|b| b.balance).collect();
        assert_eq!(balances, vec![20.0, -10.0, -10.0]);

        let plan = tracker.settlements();
        assert_eq!(plan.len(), 2);
        assert!(plan.iter().all(|s| s.to == "A" && s.amount == 10.0));
        assert_eq!(plan[0].from, "B");
    }
}
