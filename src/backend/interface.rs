use thiserror::Error;

use crate::core::Transaction;

#[derive(Debug, Error)]
pub enum BackendError {
    /// The underlying slot could not be read or written.
    #[error("storage unavailable: {0}")]
    Io(#[from] std::io::Error),
    /// A value was present but does not decode as a list of transactions.
    #[error("malformed ledger data: {0}")]
    Malformed(#[source] serde_json::Error),
    #[error("failed to encode ledger: {0}")]
    Encode(#[source] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BackendError>;

/// Durable home of a ledger's transactions.
pub trait LedgerStore {
    /// Reads the stored sequence, empty when nothing was saved yet.
    fn load(&self) -> Result<Vec<Transaction>>;
    /// Replaces whatever was stored with `transactions`.
    fn save(&self, transactions: &[Transaction]) -> Result<()>;
}
