pub mod category;
pub mod error;
pub mod id;
pub mod transaction;
pub mod ledger;

pub use category::{Category, CategoryCatalog};
pub use transaction::{Transaction, TransactionKind};
pub use ledger::Ledger;
