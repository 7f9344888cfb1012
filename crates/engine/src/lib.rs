//! Shared-expense engine.
//!
//! A [`Tracker`] owns one live [`Session`] (title, participants, expense
//! rows) and a history of [`SavedSession`]s that follows it automatically:
//! every change to the live session is mirrored into the history and both
//! are written to a [`KeyValueStore`].
//!
//! The money side is two pure functions: [`build_summary`] turns rows into
//! per-participant [`Balance`]s and [`calculate_settlements`] reduces those
//! to a short list of [`Settlement`] transfers.
//!
//! ```rust
//! use engine::Tracker;
//!
//! let mut tracker = Tracker::builder().build();
//! for name in ["Anna", "Bruno", "Carla"] {
//!     tracker.add_participant(name);
//! }
//! let row = tracker.add_row();
//! tracker.set_payer(row, "Anna");
//! tracker.set_amount(row, Some(30.0));
//! tracker.set_all_received(row, true);
//!
//! let plan = tracker.settlements();
//! assert_eq!(plan.len(), 2);
//! assert!(plan.iter().all(|s| s.to == "Anna"));
//! ```

pub use balances::{Balance, build_summary};
pub use error::EngineError;
pub use money::{MAX_AMOUNT, MIN_AMOUNT, clamp_amount, format_amount, parse_amount};
pub use ops::{Tracker, TrackerBuilder};
pub use records::{APP_STATE_KEY, AppStateRecord, SAVED_STATES_KEY};
pub use saved::{SavedSession, SavedSessions};
pub use session::{ExpenseRow, ReceiverMap, Session};
pub use settlements::{BALANCE_EPSILON, Settlement, calculate_settlements};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use sync::{SyncOutcome, sync_session};
pub use util::{format_saved_at, format_saved_at_local, normalize_name};

mod balances;
mod error;
mod money;
mod ops;
mod records;
mod saved;
mod session;
mod settlements;
mod storage;
mod sync;
mod util;

pub type ResultEngine<T> = Result<T, EngineError>;
