//! Category indexer: one category per distinct label.

use std::collections::HashMap;

use super::tally;
use crate::ir::{Category, CategoryId, CategoryMetadata, SourceTable, DEFAULT_SUPERCATEGORY};

/// Category records sorted by name, plus the label -> id lookup the
/// annotation builder resolves against.
#[derive(Clone, Debug, Default)]
pub struct CategoryIndex {
    categories: Vec<Category>,
    ids: HashMap<String, CategoryId>,
}

impl CategoryIndex {
    /// Indexes every non-blank label of `table`.
    ///
    /// `metadata.count` counts all rows carrying the label, including rows
    /// the annotation builder later drops.
    pub fn build(table: &SourceTable, created_at: &str) -> Self {
        let counts = tally(&table.rows, |row| row.label.as_str());

        let mut ids = HashMap::with_capacity(counts.len());
        let categories = counts
            .into_iter()
            .map(|(name, count)| {
                let id = CategoryId::for_label(name);
                ids.insert(name.to_string(), id);
                Category {
                    id,
                    name: name.to_string(),
                    supercategory: DEFAULT_SUPERCATEGORY.to_string(),
                    metadata: CategoryMetadata {
                        count,
                        created_at: created_at.to_string(),
                    },
                }
            })
            .collect();

        Self { categories, ids }
    }

    pub fn id_of(&self, label: &str) -> Option<CategoryId> {
        self.ids.get(label).copied()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn into_categories(self) -> Vec<Category> {
        self.categories
    }
}
