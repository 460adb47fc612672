//! Row selection set

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::table::RecordId;

/// Set of selected row ids.
///
/// Membership is O(1); iteration follows insertion order so an export lists
/// rows in the order the user picked them. Equality ignores order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    ids: IndexSet<RecordId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.ids.contains(&id)
    }

    /// Selected ids in insertion order
    pub fn iter(&self) -> impl Iterator<Item = RecordId> + '_ {
        self.ids.iter().copied()
    }

    /// Whether every id of `page_ids` is selected. An empty page never is.
    pub fn covers(&self, page_ids: &[RecordId]) -> bool {
        !page_ids.is_empty() && page_ids.iter().all(|id| self.ids.contains(id))
    }

    /// Add `id` if absent, remove it if present
    #[must_use]
    pub fn toggled(&self, id: RecordId) -> Self {
        let mut ids = self.ids.clone();
        if !ids.shift_remove(&id) {
            ids.insert(id);
        }
        Self { ids }
    }

    /// Select-all checkbox of the visible page.
    ///
    /// When the page is fully selected its ids are removed, otherwise they are
    /// all added. Ids from other pages are left alone either way.
    #[must_use]
    pub fn toggled_page(&self, page_ids: &[RecordId]) -> Self {
        let mut ids = self.ids.clone();
        if self.covers(page_ids) {
            for id in page_ids {
                ids.shift_remove(id);
            }
        } else {
            ids.extend(page_ids.iter().copied());
        }
        Self { ids }
    }
}

impl FromIterator<RecordId> for Selection {
    fn from_iter<I: IntoIterator<Item = RecordId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_is_its_own_inverse() {
        let base: Selection = [3, 1, 4].into_iter().collect();
        assert_eq!(base.toggled(9).toggled(9), base);
        assert_eq!(base.toggled(1).toggled(1), base);
        assert!(!base.toggled(1).contains(1));
    }

    #[test]
    fn test_toggle_keeps_insertion_order() {
        let selection = Selection::new().toggled(5).toggled(2).toggled(8).toggled(2);
        assert_eq!(selection.iter().collect::<Vec<_>>(), vec![5, 8]);
    }

    #[test]
    fn test_page_toggle_is_scoped_to_page() {
        let first_page = [1, 2, 3];
        let second_page = [4, 5, 6];

        let selection = Selection::new().toggled_page(&first_page);
        let selection = selection.toggled_page(&second_page);
        assert_eq!(selection.len(), 6);

        // Second page fully selected: deselect only it
        let selection = selection.toggled_page(&second_page);
        assert_eq!(selection.iter().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_partial_page_selects_rest() {
        let selection = Selection::new().toggled(2).toggled(10);
        let selection = selection.toggled_page(&[1, 2, 3]);
        assert!(selection.covers(&[1, 2, 3]));
        assert!(selection.contains(10));
    }

    #[test]
    fn test_empty_page_is_never_covered() {
        let selection: Selection = [1].into_iter().collect();
        assert!(!selection.covers(&[]));
        assert_eq!(selection.toggled_page(&[]), selection);
    }
}
