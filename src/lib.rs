mod core;
mod backend;
pub mod config;
pub mod draft;
pub mod tracker;

pub use crate::core::{Category, CategoryCatalog, Ledger, Transaction, TransactionKind};
pub use crate::core::{category, error, id, ledger, transaction};
pub use crate::backend::{json_store, slots};
pub use crate::backend::{LedgerStore, BackendError, JsonStore, KeyValueSlots, FileSlots, MemorySlots};
pub use crate::draft::EntryDraft;
pub use crate::tracker::{Tracker, TrackerEvent, Totals};
