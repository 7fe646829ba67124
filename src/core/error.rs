use thiserror::Error;

use crate::core::transaction::TransactionKind;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum TransactionError {
    /// Occurs when the amount input is missing or blank.
    #[error("no amount given")]
    MissingAmount,
    /// Occurs when the amount input does not parse as a number.
    #[error("not a number: {0:?}")]
    InvalidAmount(String),
    /// Occurs when the amount parses but is zero, negative or not finite.
    #[error("amount must be a positive number, got {0}")]
    NonPositiveAmount(f64),
    /// Occurs when a category id is not listed for the transaction's kind.
    #[error("no {kind} category with id {id:?}")]
    UnknownCategory {
        kind: TransactionKind,
        id: String
    },
    /// Occurs when attempting to reference a transaction
    /// by an id which does not exist on the ledger
    #[error("no such transaction id: {0}")]
    UnknownTransactionId(u64),
    /// Occurs when the largest possible id has already been handed out.
    #[error("no transaction ids left")]
    IdsExhausted
}

pub type TransactionResult<T> = Result<T, TransactionError>;

#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("the {0} category list is empty")]
    Empty(TransactionKind),
    #[error("category id {0:?} is listed more than once")]
    DuplicateId(String),
}
