//! Keyword-based table categorization.

use std::collections::HashMap;

use tracing::debug;

use crate::layout::RawTable;
use crate::models::template::{BillingCategory, CategoryKeywords};

/// Category -> table binding for one document.
///
/// A category missing from the map means no table of that kind was found.
#[derive(Debug, Clone, Default)]
pub struct CategorizedTables<'a> {
    tables: HashMap<BillingCategory, &'a RawTable>,
}

impl<'a> CategorizedTables<'a> {
    pub fn get(&self, category: BillingCategory) -> Option<&'a RawTable> {
        self.tables.get(&category).copied()
    }

    pub fn contains(&self, category: BillingCategory) -> bool {
        self.tables.contains_key(&category)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Bound categories in declaration order.
    pub fn categories(&self) -> Vec<BillingCategory> {
        let mut categories: Vec<_> = self.tables.keys().copied().collect();
        categories.sort();
        categories
    }

    fn bind(&mut self, category: BillingCategory, table: &'a RawTable) {
        self.tables.insert(category, table);
    }
}

/// Assigns tables to billing categories by keyword presence.
#[derive(Debug, Clone)]
pub struct TableCategorizer {
    keyword_sets: Vec<CategoryKeywords>,
}

impl TableCategorizer {
    pub fn new(keyword_sets: Vec<CategoryKeywords>) -> Self {
        Self { keyword_sets }
    }

    /// Bind each category to the table whose flattened text contains all of
    /// the category's keywords (case-sensitive).
    ///
    /// Every (table, category) pair is checked, tables outermost. When several
    /// tables match one category the last one wins. Tables matching nothing
    /// are dropped.
    pub fn categorize<'a>(&self, tables: &'a [RawTable]) -> CategorizedTables<'a> {
        let mut result = CategorizedTables::default();

        for (index, table) in tables.iter().enumerate() {
            let text = table.to_text();
            for set in &self.keyword_sets {
                if set.keywords.iter().all(|k| text.contains(k.as_str())) {
                    if result.contains(set.category) {
                        debug!("Table {} replaces earlier {} table", index, set.category);
                    } else {
                        debug!(
                            "Table {} categorized as {} ({})",
                            index,
                            set.category,
                            set.category.invoice_label()
                        );
                    }
                    result.bind(set.category, table);
                }
            }
        }

        result
    }
}
