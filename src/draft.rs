use crate::backend::LedgerStore;
use crate::core::{Category, CategoryCatalog, TransactionKind};
use crate::core::transaction::TransactionId;
use crate::tracker::Tracker;

/// Entry form state: the amount and note typed so far plus the selected
/// kind and category. Starts as an expense in the first expense category.
#[derive(Clone, PartialEq, Debug)]
pub struct EntryDraft {
    pub amount: String,
    pub note: String,
    kind: TransactionKind,
    category: Option<Category>
}

impl EntryDraft {
    pub fn new(catalog: &CategoryCatalog) -> EntryDraft {
        let kind = TransactionKind::Expense;
        EntryDraft {
            amount: String::new(),
            note: String::new(),
            kind,
            category: catalog.first(kind).cloned()
        }
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn category(&self) -> Option<&Category> {
        self.category.as_ref()
    }

    /// Switching kind always resets the selection to the first category
    /// of the new kind.
    pub fn set_kind(&mut self, kind: TransactionKind, catalog: &CategoryCatalog) {
        self.kind = kind;
        self.category = catalog.first(kind).cloned();
    }

    /// Returns false and keeps the current selection when `id` is not a
    /// category of the selected kind.
    pub fn select_category(&mut self, id: &str, catalog: &CategoryCatalog) -> bool {
        match catalog.find(self.kind, id) {
            Some(category) => {
                self.category = Some(category.clone());
                true
            },
            None => false
        }
    }

    /// Hands the draft to the tracker. A recorded entry clears the amount
    /// and note; a rejected one leaves the draft as it was.
    pub fn submit<S: LedgerStore>(&mut self, tracker: &mut Tracker<S>) -> Option<TransactionId> {
        let category_id = self.category.as_ref().map(|c| c.id.as_str()).unwrap_or_default();
        let id = tracker.add(&self.amount, self.kind, category_id, &self.note)?;
        self.amount.clear();
        self.note.clear();
        return Some(id);
    }
}
