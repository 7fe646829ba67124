use std::collections::VecDeque;

use log::{info, warn};

use crate::backend::LedgerStore;
use crate::core::{CategoryCatalog, Ledger, Transaction, TransactionKind};
use crate::core::error::TransactionError;
use crate::core::transaction::{Amount, TransactionId};

/// Something the tracker did or refused to do. Failures never reach the
/// caller of a mutation, so this is where they can be observed.
#[derive(Clone, PartialEq, Debug)]
pub enum TrackerEvent {
    Loaded { count: usize },
    LoadFailed { reason: String },
    Added { id: TransactionId },
    Rejected { reason: TransactionError },
    Removed { id: TransactionId },
    RemoveDeclined { id: TransactionId },
    RemoveMissing { id: TransactionId },
    Saved { count: usize },
    SaveFailed { reason: String },
}

impl TrackerEvent {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::LoadFailed { .. } | Self::SaveFailed { .. } | Self::Rejected { .. })
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Totals {
    pub balance: Amount,
    pub income: Amount,
    pub expense: Amount,
}

/// Owns the ledger and the store it is persisted to. Every mutation
/// updates the ledger first and then writes the whole ledger back.
pub struct Tracker<S: LedgerStore> {
    ledger: Ledger,
    store: S,
    events: VecDeque<TrackerEvent>
}

impl<S: LedgerStore> Tracker<S> {
    const EVENT_HISTORY: usize = 100;

    /// Seeds a ledger from `store`. A store that cannot be read, or holds
    /// data that does not decode, yields an empty ledger.
    pub fn open(store: S, catalog: CategoryCatalog) -> Tracker<S> {
        let mut tracker = Tracker { ledger: Ledger::new(catalog.clone()), store, events: VecDeque::new() };

        match tracker.store.load() {
            Ok(transactions) => {
                let count = transactions.len();
                tracker.ledger = Ledger::with_transactions(catalog, transactions);
                tracker.record(TrackerEvent::Loaded { count });
            },
            Err(err) => {
                warn!("error loading data, starting with an empty ledger: {}", err);
                tracker.record(TrackerEvent::LoadFailed { reason: err.to_string() });
            }
        }
        return tracker;
    }

    /// Records a new transaction and persists. Invalid input is dropped
    /// without creating anything; the returned id is `None` in that case.
    pub fn add(&mut self, amount: &str, kind: TransactionKind, category_id: &str, note: &str) -> Option<TransactionId> {
        let id = match self.ledger.add(amount, kind, category_id, note).map(|t| t.id) {
            Ok(id) => id,
            Err(reason) => {
                info!("ignoring {} entry: {}", kind, reason);
                self.record(TrackerEvent::Rejected { reason });
                return None;
            }
        };
        info!("added transaction {}", id);
        self.record(TrackerEvent::Added { id });
        self.persist();
        return Some(id);
    }

    /// Removes a transaction once `confirm` agrees. `confirm` is only asked
    /// about transactions that exist; declining leaves everything untouched.
    pub fn remove<F>(&mut self, id: TransactionId, confirm: F) -> bool
    where
        F: FnOnce(&Transaction) -> bool
    {
        let confirmed = match self.ledger.get_transaction(id).map(confirm) {
            Some(confirmed) => confirmed,
            None => {
                self.record(TrackerEvent::RemoveMissing { id });
                return false;
            }
        };
        if !confirmed {
            self.record(TrackerEvent::RemoveDeclined { id });
            return false;
        }

        match self.ledger.remove(id) {
            Ok(_) => {
                info!("removed transaction {}", id);
                self.record(TrackerEvent::Removed { id });
                self.persist();
                return true;
            },
            Err(_) => {
                self.record(TrackerEvent::RemoveMissing { id });
                return false;
            }
        }
    }

    /// Writes the full ledger to the store, overwriting what was there.
    /// A failed write is logged and recorded; the in-memory ledger stays
    /// authoritative.
    pub fn persist(&mut self) {
        match self.store.save(self.ledger.transactions()) {
            Ok(()) => {
                let count = self.ledger.len();
                self.record(TrackerEvent::Saved { count });
            },
            Err(err) => {
                warn!("error saving data: {}", err);
                self.record(TrackerEvent::SaveFailed { reason: err.to_string() });
            }
        }
    }

    pub fn balance(&self) -> Amount {
        self.ledger.balance()
    }

    pub fn total_income(&self) -> Amount {
        self.ledger.total_income()
    }

    pub fn total_expense(&self) -> Amount {
        self.ledger.total_expense()
    }

    pub fn totals(&self) -> Totals {
        Totals {
            balance: self.balance(),
            income: self.total_income(),
            expense: self.total_expense(),
        }
    }

    pub fn transactions(&self) -> &[Transaction] {
        self.ledger.transactions()
    }

    pub fn catalog(&self) -> &CategoryCatalog {
        self.ledger.catalog()
    }

    /// Most recent events, oldest first.
    pub fn events(&self) -> impl Iterator<Item = &TrackerEvent> {
        self.events.iter()
    }

    pub fn last_event(&self) -> Option<&TrackerEvent> {
        self.events.back()
    }

    pub fn take_events(&mut self) -> Vec<TrackerEvent> {
        self.events.drain(..).collect()
    }

    fn record(&mut self, event: TrackerEvent) {
        if self.events.len() == Self::EVENT_HISTORY {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }
}
