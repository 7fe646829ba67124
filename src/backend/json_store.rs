use log::debug;

use crate::backend::interface::{BackendError, LedgerStore, Result};
use crate::backend::slots::KeyValueSlots;
use crate::core::Transaction;

/// Slot the ledger lives in unless configured otherwise.
pub const DEFAULT_KEY: &str = "@money_tracker";

pub fn encode(transactions: &[Transaction]) -> Result<String> {
    serde_json::to_string(transactions).map_err(BackendError::Encode)
}

pub fn decode(raw: &str) -> Result<Vec<Transaction>> {
    serde_json::from_str(raw).map_err(BackendError::Malformed)
}

/// Stores the whole ledger as one JSON array under a single key.
pub struct JsonStore<S: KeyValueSlots> {
    slots: S,
    key: String
}

impl<S: KeyValueSlots> JsonStore<S> {
    pub fn new(slots: S) -> JsonStore<S> {
        JsonStore::with_key(slots, DEFAULT_KEY)
    }

    pub fn with_key(slots: S, key: &str) -> JsonStore<S> {
        JsonStore { slots, key: key.to_owned() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn slots(&self) -> &S {
        &self.slots
    }
}

impl<S: KeyValueSlots> LedgerStore for JsonStore<S> {
    fn load(&self) -> Result<Vec<Transaction>> {
        let transactions = match self.slots.get(&self.key)? {
            Some(raw) => decode(&raw)?,
            None => Vec::new()
        };
        debug!("loaded {} transactions from {}", transactions.len(), self.key);
        return Ok(transactions);
    }

    fn save(&self, transactions: &[Transaction]) -> Result<()> {
        let raw = encode(transactions)?;
        self.slots.set(&self.key, &raw)?;
        debug!("saved {} transactions to {}", transactions.len(), self.key);
        return Ok(());
    }
}
