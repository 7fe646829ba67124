mod interface;
pub mod slots;
pub mod json_store;

pub use interface::{LedgerStore, Result, BackendError};
pub use json_store::JsonStore;
pub use slots::{KeyValueSlots, FileSlots, MemorySlots};
