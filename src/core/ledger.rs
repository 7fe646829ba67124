use chrono::{DateTime, Utc};

use crate::core::category::CategoryCatalog;
use crate::core::error::{TransactionError, TransactionResult};
use crate::core::id::IdGenerator;
use crate::core::transaction::{
    Transaction, TransactionId, TransactionKind,
    Amount, parse_amount};

/// All recorded transactions, newest first.
pub struct Ledger {
    transactions: Vec<Transaction>,
    catalog: CategoryCatalog,
    ids: IdGenerator
}

impl Ledger {
    pub fn new(catalog: CategoryCatalog) -> Ledger {
        Ledger::with_transactions(catalog, Vec::new())
    }

    /// Seeds the ledger with `transactions` kept in the given order.
    pub fn with_transactions(catalog: CategoryCatalog, transactions: Vec<Transaction>) -> Ledger {
        let ids = IdGenerator::after(transactions.iter().map(|t| t.id));
        return Ledger { transactions, catalog, ids };
    }

    pub fn catalog(&self) -> &CategoryCatalog {
        &self.catalog
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn get_transaction(&self, id: TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn add(&mut self, amount: &str, kind: TransactionKind, category_id: &str, note: &str) -> TransactionResult<&Transaction> {
        self.add_at(amount, kind, category_id, note, Utc::now())
    }

    pub fn add_at(&mut self, amount: &str, kind: TransactionKind, category_id: &str, note: &str, now: DateTime<Utc>) -> TransactionResult<&Transaction> {
        let amount = parse_amount(amount)?;
        let category = self.catalog.find(kind, category_id)
            .ok_or_else(|| TransactionError::UnknownCategory { kind, id: category_id.to_owned() })?;

        let id = self.ids.next_at(now)?;
        let transaction = Transaction::new_at(id, amount, kind, category, note, now);
        self.transactions.insert(0, transaction);
        return Ok(&self.transactions[0]);
    }

    pub fn remove(&mut self, id: TransactionId) -> TransactionResult<Transaction> {
        let position = self.transactions.iter()
            .position(|t| t.id == id)
            .ok_or(TransactionError::UnknownTransactionId(id))?;
        return Ok(self.transactions.remove(position));
    }

    pub fn balance(&self) -> Amount {
        self.transactions.iter()
            .map(|t| t.signed_amount())
            .sum()
    }

    pub fn total_income(&self) -> Amount {
        self.total_of(TransactionKind::Income)
    }

    pub fn total_expense(&self) -> Amount {
        self.total_of(TransactionKind::Expense)
    }

    fn total_of(&self, kind: TransactionKind) -> Amount {
        self.transactions.iter()
            .filter(|t| t.kind == kind)
            .map(|t| t.amount)
            .sum()
    }
}
