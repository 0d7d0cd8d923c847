use crate::data::datatable::{Row, RowId};
use std::collections::HashSet;

/// Durable set of selected row ids.
///
/// Ids stay selected while their rows are filtered out or on another page.
/// Ids whose rows were removed from the backing collection are dropped lazily
/// by [`SelectionSet::resolve`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: HashSet<RowId>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership of `id`. Returns true if the id is now selected.
    pub fn toggle(&mut self, id: &RowId) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.clone());
            true
        }
    }

    pub fn contains(&self, id: &RowId) -> bool {
        self.ids.contains(id)
    }

    pub fn insert(&mut self, id: RowId) -> bool {
        self.ids.insert(id)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// True when `ids` is non-empty and every one of them is selected
    pub fn contains_all<'a>(&self, ids: impl IntoIterator<Item = &'a RowId>) -> bool {
        let mut any = false;
        for id in ids {
            any = true;
            if !self.ids.contains(id) {
                return false;
            }
        }
        any
    }

    /// Select every id in `ids` unless they are all selected already, in which
    /// case deselect them. Returns true if the ids ended up selected.
    pub fn toggle_all(&mut self, ids: &[RowId]) -> bool {
        if self.contains_all(ids) {
            for id in ids {
                self.ids.remove(id);
            }
            false
        } else {
            self.ids.extend(ids.iter().cloned());
            true
        }
    }

    /// Selected rows in backing order. Ids with no backing row are skipped.
    pub fn resolve(&self, rows: &[Row]) -> Vec<Row> {
        rows.iter()
            .filter(|row| self.ids.contains(row.id()))
            .cloned()
            .collect()
    }
}
