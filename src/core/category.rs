use std::fmt;

use serde::{Serialize, Deserialize};

use crate::core::error::CatalogError;
use crate::core::transaction::TransactionKind;

/// A selectable classification. Transactions keep their own copy of it,
/// so later edits to the catalog never touch recorded entries.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub icon: String,
}

impl Category {
    pub fn new(id: &str, name: &str, icon: &str) -> Category {
        Category { id: id.to_owned(), name: name.to_owned(), icon: icon.to_owned() }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// The fixed set of categories, partitioned by transaction kind.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct CategoryCatalog {
    expense: Vec<Category>,
    income: Vec<Category>,
}

impl CategoryCatalog {
    pub fn new(expense: Vec<Category>, income: Vec<Category>) -> Result<CategoryCatalog, CatalogError> {
        let catalog = CategoryCatalog { expense, income };
        catalog.validate()?;
        return Ok(catalog);
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.expense.is_empty() {
            return Err(CatalogError::Empty(TransactionKind::Expense));
        }
        if self.income.is_empty() {
            return Err(CatalogError::Empty(TransactionKind::Income));
        }

        let mut seen = std::collections::HashSet::new();
        for category in self.expense.iter().chain(self.income.iter()) {
            if !seen.insert(category.id.as_str()) {
                return Err(CatalogError::DuplicateId(category.id.clone()));
            }
        }
        return Ok(());
    }

    pub fn categories(&self, kind: TransactionKind) -> &[Category] {
        match kind {
            TransactionKind::Expense => &self.expense,
            TransactionKind::Income => &self.income,
        }
    }

    /// Looks up a category only within the list for `kind`.
    pub fn find(&self, kind: TransactionKind, id: &str) -> Option<&Category> {
        self.categories(kind).iter().find(|category| category.id == id)
    }

    pub fn first(&self, kind: TransactionKind) -> Option<&Category> {
        self.categories(kind).first()
    }
}

impl Default for CategoryCatalog {
    fn default() -> Self {
        CategoryCatalog {
            expense: vec![
                Category::new("food", "Food", "fast-food"),
                Category::new("transport", "Transport", "bus"),
                Category::new("shopping", "Shopping", "cart"),
                Category::new("bills", "Bills", "receipt"),
            ],
            income: vec![
                Category::new("salary", "Salary", "cash"),
                Category::new("bonus", "Bonus", "gift"),
            ],
        }
    }
}


#[cfg(test)]
mod tests {
    use crate::core::category::{Category, CategoryCatalog};
    use crate::core::error::CatalogError;
    use crate::core::transaction::TransactionKind;

    #[test]
    fn default_catalog_is_partitioned() {
        let catalog = CategoryCatalog::default();
        assert!(catalog.validate().is_ok());

        let expense: Vec<&str> = catalog.categories(TransactionKind::Expense)
            .iter().map(|c| c.id.as_str()).collect();
        let income: Vec<&str> = catalog.categories(TransactionKind::Income)
            .iter().map(|c| c.id.as_str()).collect();

        assert_eq!(expense, vec!["food", "transport", "shopping", "bills"]);
        assert_eq!(income, vec!["salary", "bonus"]);
    }

    #[test]
    fn find_is_scoped_by_kind() {
        let catalog = CategoryCatalog::default();
        assert!(catalog.find(TransactionKind::Expense, "food").is_some());
        assert!(catalog.find(TransactionKind::Income, "food").is_none());
        assert_eq!(catalog.find(TransactionKind::Income, "bonus").unwrap().icon, "gift");
    }

    #[test]
    fn rejects_empty_list() {
        let res = CategoryCatalog::new(vec![Category::new("food", "Food", "fast-food")], vec![]);
        assert!(matches!(res, Err(CatalogError::Empty(TransactionKind::Income))));
    }

    #[test]
    fn rejects_id_shared_across_kinds() {
        let res = CategoryCatalog::new(
            vec![Category::new("gift", "Gifts given", "gift")],
            vec![Category::new("gift", "Gifts received", "gift")]);
        assert!(matches!(res, Err(CatalogError::DuplicateId(id)) if id == "gift"));
    }
}
