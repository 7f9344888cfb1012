//! Stored document shapes and their (de)serialization.
//!
//! Two records live in the store:
//!
//! - `appState`: the current session, `{ id, title, names, nextId, rows }`.
//! - `savedStates`: an array of saved sessions.
//!
//! Reading never fails. A missing record yields defaults, a malformed one is
//! logged and replaced by defaults, and a malformed saved entry is skipped
//! without dropping its siblings.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    ResultEngine,
    saved::{SavedSession, SavedSessions},
    session::{ExpenseRow, Session},
    storage::KeyValueStore,
};

pub const APP_STATE_KEY: &str = "appState";
pub const SAVED_STATES_KEY: &str = "savedStates";

/// The `appState` document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppStateRecord {
    pub id: Option<Uuid>,
    pub title: String,
    pub names: Vec<String>,
    pub next_id: u64,
    pub rows: Vec<ExpenseRow>,
}

impl Default for AppStateRecord {
    fn default() -> Self {
        Self {
            id: None,
            title: String::new(),
            names: Vec::new(),
            next_id: 1,
            rows: Vec::new(),
        }
    }
}

impl From<&Session> for AppStateRecord {
    fn from(session: &Session) -> Self {
        Self {
            id: Some(session.id()),
            title: session.title().to_string(),
            names: session.participants().to_vec(),
            next_id: session.next_row_id(),
            rows: session.rows().to_vec(),
        }
    }
}

impl From<AppStateRecord> for Session {
    /// A record without an id gets a fresh one.
    fn from(record: AppStateRecord) -> Self {
        Session::from_parts(
            record.id.unwrap_or_else(Uuid::new_v4),
            record.title,
            record.names,
            record.rows,
            record.next_id,
        )
    }
}

/// Reads the current session, falling back to a blank one.
pub fn load_session(store: &impl KeyValueStore) -> Session {
    let Some(raw) = read_raw(store, APP_STATE_KEY) else {
        return Session::new();
    };
    match serde_json::from_str::<AppStateRecord>(&raw) {
        Ok(record) => record.into(),
        Err(err) => {
            tracing::warn!("ignoring corrupt {APP_STATE_KEY} record: {err}");
            Session::new()
        }
    }
}

/// Reads the saved-session history, falling back to an empty one.
pub fn load_saved(store: &impl KeyValueStore) -> SavedSessions {
    let Some(raw) = read_raw(store, SAVED_STATES_KEY) else {
        return SavedSessions::default();
    };
    let values: Vec<serde_json::Value> = match serde_json::from_str(&raw) {
        Ok(values) => values,
        Err(err) => {
            tracing::warn!("ignoring corrupt {SAVED_STATES_KEY} record: {err}");
            return SavedSessions::default();
        }
    };

    let mut entries = Vec::with_capacity(values.len());
    for value in values {
        match serde_json::from_value::<SavedSession>(value) {
            Ok(entry) => entries.push(entry),
            Err(err) => tracing::warn!("skipping corrupt saved session: {err}"),
        }
    }
    SavedSessions::from_entries(entries)
}

pub fn save_session(store: &mut impl KeyValueStore, session: &Session) -> ResultEngine<()> {
    let payload = serde_json::to_string(&AppStateRecord::from(session))?;
    store.set(APP_STATE_KEY, &payload)
}

pub fn save_saved(store: &mut impl KeyValueStore, saved: &SavedSessions) -> ResultEngine<()> {
    let payload = serde_json::to_string(saved)?;
    store.set(SAVED_STATES_KEY, &payload)
}

fn read_raw(store: &impl KeyValueStore, key: &str) -> Option<String> {
    match store.get(key) {
        Ok(raw) => raw,
        Err(err) => {
            tracing::warn!("failed to read {key}: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use crate::storage::MemoryStore;

    use super::*;

    #[test]
    fn missing_records_give_defaults() {
        let store = MemoryStore::new();
        let session = load_session(&store);
        assert!(!session.has_data());
        assert_eq!(session.next_row_id(), 1);
        assert!(load_saved(&store).is_empty());
    }

    #[test]
    fn corrupt_records_give_defaults() {
        let store = MemoryStore::new()
            .with_record(APP_STATE_KEY, "{not json")
            .with_record(SAVED_STATES_KEY, "{\"also\": \"wrong\"}");
        assert!(!load_session(&store).has_data());
        assert!(load_saved(&store).is_empty());
    }

    #[test]
    fn partial_app_state_is_merged_with_defaults() {
        let store = MemoryStore::new().with_record(
            APP_STATE_KEY,
            r#"{"title":"Trip","names":["Anna"],"rows":[{"id":4,"whoPaid":"Anna","amount":12.5}]}"#,
        );
        let session = load_session(&store);
        assert_eq!(session.title(), "Trip");
        assert_eq!(session.participants(), ["Anna"]);
        assert_eq!(session.next_row_id(), 5);
        let row = &session.rows()[0];
        assert_eq!(row.amount, Some(12.5));
        assert_eq!(row.who_received.get("Anna"), Some(&false));
    }

    #[test]
    fn session_survives_a_round_trip() {
        let mut session = Session::new();
        session.set_title("Trip");
        session.add_participant("Anna");
        session.add_participant("Bruno");
        let id = session.add_row();
        session.set_payer(id, "Anna");
        session.set_amount(id, Some(40.0));
        session.set_received(id, "Bruno", true);

        let mut store = MemoryStore::new();
        save_session(&mut store, &session).unwrap();
        assert_eq!(load_session(&store), session);

        let raw = store.get(APP_STATE_KEY).unwrap().unwrap();
        assert!(raw.contains("\"whoPaid\":\"Anna\""));
        assert!(raw.contains("\"whoReceived\""));
        assert!(raw.contains("\"nextId\":2"));
    }

    #[test]
    fn one_bad_saved_entry_does_not_drop_the_rest() {
        let mut session = Session::new();
        session.set_title("Trip");
        let good = SavedSession::snapshot(&session, Utc::now());
        let good_json = serde_json::to_string(&good).unwrap();
        let raw = format!("[{good_json}, {{\"id\": \"not-a-uuid\"}}]");

        let store = MemoryStore::new().with_record(SAVED_STATES_KEY, &raw);
        let saved = load_saved(&store);
        assert_eq!(saved.len(), 1);
        assert_eq!(saved.get(session.id()).unwrap().title, "Trip");
    }

    #[test]
    fn row_id_at_the_top_of_the_range_is_dropped() {
        let raw = r#"{"names":["A"],"rows":[{"id":18446744073709551615},{"id":2}]}"#;
        let store = MemoryStore::new().with_record(APP_STATE_KEY, raw);
        let session = load_session(&store);
        assert_eq!(session.rows().len(), 1);
        assert_eq!(session.rows()[0].id, 2);
        assert_eq!(session.next_row_id(), 3);

        let store = MemoryStore::new().with_record(APP_STATE_KEY, raw);
        let mut tracker = crate::Tracker::builder().storage(store).build();
        assert_eq!(tracker.add_row(), 3);

        let saved = format!(
            r#"[{{"id":"{}","names":["A"],"rows":[{{"id":{max}}}],"nextId":{max}}}]"#,
            Uuid::new_v4(),
            max = u64::MAX
        );
        let store = MemoryStore::new().with_record(SAVED_STATES_KEY, &saved);
        let entry = load_saved(&store).newest_first()[0].to_session();
        assert!(entry.rows().is_empty());
        assert_eq!(entry.next_row_id(), 1);
    }
}
