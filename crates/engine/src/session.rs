//! The module contains the `Session` type: the editable unit of state
//! (title, participants and expense rows) and its mutation primitives.
//!
//! Mutations here are pure data edits. They never fail: blank or duplicate
//! names are ignored, amounts are clamped. Each returns `true` when it
//! changed something, so the owner knows whether to synchronize.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{money::clamp_amount, util::normalize_name};

/// Which participants benefited from a row, keyed by participant name.
pub type ReceiverMap = BTreeMap<String, bool>;

/// One expense: who paid, how much, and who it was for.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseRow {
    /// Monotonic within a session, never reused.
    pub id: u64,
    /// Payer name, empty when not chosen yet.
    #[serde(default)]
    pub who_paid: String,
    #[serde(default)]
    pub description: String,
    /// `None` until an amount is entered.
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub who_received: ReceiverMap,
}

impl ExpenseRow {
    fn blank(id: u64, participants: &[String]) -> Self {
        Self {
            id,
            who_paid: String::new(),
            description: String::new(),
            amount: None,
            who_received: all_off(participants),
        }
    }

    /// Number of participants flagged as receivers.
    #[must_use]
    pub fn receivers(&self) -> usize {
        self.who_received.values().filter(|on| **on).count()
    }

    /// A row is invalid when it has no payer, or when it carries a non-zero
    /// amount that nobody received.
    #[must_use]
    pub fn is_invalid(&self) -> bool {
        if self.who_paid.is_empty() {
            return true;
        }
        matches!(self.amount, Some(amount) if amount != 0.0) && self.receivers() == 0
    }
}

fn all_off(participants: &[String]) -> ReceiverMap {
    participants.iter().map(|name| (name.clone(), false)).collect()
}

/// The live, editable session.
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    id: Uuid,
    title: String,
    participants: Vec<String>,
    rows: Vec<ExpenseRow>,
    next_row_id: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// A blank session with a freshly generated id.
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4())
    }

    pub fn with_id(id: Uuid) -> Self {
        Self {
            id,
            title: String::new(),
            participants: Vec::new(),
            rows: Vec::new(),
            next_row_id: 1,
        }
    }

    /// Rebuild a session from stored parts, repairing anything that breaks
    /// the row invariants (see [`Session::sanitize`]).
    pub fn from_parts(
        id: Uuid,
        title: String,
        participants: Vec<String>,
        rows: Vec<ExpenseRow>,
        next_row_id: u64,
    ) -> Self {
        let mut session = Self {
            id,
            title,
            participants,
            rows,
            next_row_id,
        };
        session.sanitize();
        session
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn participants(&self) -> &[String] {
        &self.participants
    }

    pub fn rows(&self) -> &[ExpenseRow] {
        &self.rows
    }

    pub fn row(&self, id: u64) -> Option<&ExpenseRow> {
        self.rows.iter().find(|row| row.id == id)
    }

    pub fn next_row_id(&self) -> u64 {
        self.next_row_id
    }

    /// `true` once the session holds anything worth keeping.
    #[must_use]
    pub fn has_data(&self) -> bool {
        !self.title.trim().is_empty() || !self.participants.is_empty() || !self.rows.is_empty()
    }

    pub fn set_title(&mut self, title: &str) -> bool {
        if self.title == title {
            return false;
        }
        self.title = title.to_string();
        true
    }

    /// Appends a participant and gives every row a `false` receiver entry.
    pub fn add_participant(&mut self, name: &str) -> bool {
        let Some(name) = normalize_name(name) else {
            return false;
        };
        if self.participants.contains(&name) {
            return false;
        }
        for row in &mut self.rows {
            row.who_received.insert(name.clone(), false);
        }
        self.participants.push(name);
        true
    }

    /// Drops a participant from the list, from every receiver map and from
    /// every row they paid for.
    pub fn remove_participant(&mut self, name: &str) -> bool {
        let Some(name) = normalize_name(name) else {
            return false;
        };
        let Some(index) = self.participants.iter().position(|n| *n == name) else {
            return false;
        };
        let name = self.participants.remove(index);
        for row in &mut self.rows {
            row.who_received.remove(&name);
            if row.who_paid == name {
                row.who_paid.clear();
            }
        }
        true
    }

    /// Appends a blank row and returns its id.
    pub fn add_row(&mut self) -> u64 {
        let id = self.next_row_id;
        self.next_row_id = id.saturating_add(1);
        self.rows.push(ExpenseRow::blank(id, &self.participants));
        id
    }

    pub fn remove_row(&mut self, id: u64) -> bool {
        let before = self.rows.len();
        self.rows.retain(|row| row.id != id);
        self.rows.len() != before
    }

    pub fn set_amount(&mut self, id: u64, amount: Option<f64>) -> bool {
        let amount = clamp_amount(amount);
        let Some(row) = self.row_mut(id) else {
            return false;
        };
        if row.amount == amount {
            return false;
        }
        row.amount = amount;
        true
    }

    pub fn set_description(&mut self, id: u64, description: &str) -> bool {
        let Some(row) = self.row_mut(id) else {
            return false;
        };
        if row.description == description {
            return false;
        }
        row.description = description.to_string();
        true
    }

    /// Sets the payer. Only current participants, or blank to clear.
    pub fn set_payer(&mut self, id: u64, name: &str) -> bool {
        let name = normalize_name(name).unwrap_or_default();
        if !name.is_empty() && !self.participants.contains(&name) {
            return false;
        }
        let Some(row) = self.row_mut(id) else {
            return false;
        };
        if row.who_paid == name {
            return false;
        }
        row.who_paid = name;
        true
    }

    pub fn set_received(&mut self, id: u64, name: &str, received: bool) -> bool {
        let Some(name) = normalize_name(name) else {
            return false;
        };
        if !self.participants.contains(&name) {
            return false;
        }
        let Some(row) = self.row_mut(id) else {
            return false;
        };
        match row.who_received.insert(name, received) {
            Some(previous) => previous != received,
            None => true,
        }
    }

    /// Flags every participant on a row as receiver (or none of them).
    pub fn set_all_received(&mut self, id: u64, received: bool) -> bool {
        let participants = self.participants.clone();
        let Some(row) = self.row_mut(id) else {
            return false;
        };
        let mut changed = false;
        for name in participants {
            if row.who_received.insert(name, received) != Some(received) {
                changed = true;
            }
        }
        changed
    }

    fn row_mut(&mut self, id: u64) -> Option<&mut ExpenseRow> {
        self.rows.iter_mut().find(|row| row.id == id)
    }

    /// Re-establishes the row invariants on data that did not come through
    /// the mutation methods (a stored record, a restored snapshot).
    ///
    /// - participant names are normalized and deduplicated
    /// - amounts are clamped
    /// - receiver maps hold exactly the participants, missing ones `false`
    /// - unknown payers are cleared
    /// - duplicate row ids are dropped, `next_row_id` is above every id
    /// - rows whose id leaves no room for a successor are dropped
    pub(crate) fn sanitize(&mut self) {
        let mut participants: Vec<String> = Vec::with_capacity(self.participants.len());
        for name in self.participants.drain(..).filter_map(|n| normalize_name(&n)) {
            if !participants.contains(&name) {
                participants.push(name);
            }
        }
        self.participants = participants;

        let mut seen = Vec::with_capacity(self.rows.len());
        self.rows.retain(|row| {
            if row.id == u64::MAX {
                tracing::warn!("dropping row with out-of-range id {}", row.id);
                return false;
            }
            if seen.contains(&row.id) {
                return false;
            }
            seen.push(row.id);
            true
        });

        for row in &mut self.rows {
            row.amount = clamp_amount(row.amount);
            row.who_received
                .retain(|name, _| self.participants.contains(name));
            for name in &self.participants {
                row.who_received.entry(name.clone()).or_insert(false);
            }
            if !self.participants.contains(&row.who_paid) {
                row.who_paid.clear();
            }
        }

        let floor = self
            .rows
            .iter()
            .map(|row| row.id + 1)
            .max()
            .unwrap_or(1);
        if self.next_row_id == u64::MAX {
            self.next_row_id = floor;
        }
        self.next_row_id = self.next_row_id.max(floor);
    }
}
