//! Table view state
//!
//! The presentation layer owns a [`ViewState`] and replaces it on every user
//! action. All transitions return a new value; nothing here is shared.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::quality::QualityFilter;
use crate::selection::Selection;
use crate::table::{RecordId, SortField};

/// Sort direction of the active column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Active sort column and its direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortState<F> {
    pub field: F,
    pub direction: SortDirection,
}

impl<F: SortField> SortState<F> {
    pub fn new(field: F, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Column header click: a new column starts ascending, the active one flips
    #[must_use]
    pub fn clicked(self, field: F) -> Self {
        if self.field == field {
            Self {
                field,
                direction: self.direction.flipped(),
            }
        } else {
            Self {
                field,
                direction: SortDirection::Asc,
            }
        }
    }
}

/// Everything that determines the rendered table besides the records
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState<F> {
    pub query: String,
    pub quality_filter: QualityFilter,
    pub sort: SortState<F>,
    /// 1-based
    pub page: usize,
    pub page_size: usize,
    pub selection: Selection,
}

impl<F: SortField> ViewState<F> {
    pub fn new(sort: SortState<F>, page_size: usize) -> Self {
        Self {
            query: String::new(),
            quality_filter: QualityFilter::All,
            sort,
            page: 1,
            page_size,
            selection: Selection::new(),
        }
    }

    /// New search text. Changes the row scope: back to page 1, selection cleared.
    #[must_use]
    pub fn with_query(&self, query: impl Into<String>) -> Self {
        let query = query.into();
        debug!(%query, "search query changed");
        Self {
            query,
            ..self.rescoped()
        }
    }

    /// New quality filter. Changes the row scope.
    #[must_use]
    pub fn with_quality_filter(&self, quality_filter: QualityFilter) -> Self {
        debug!(filter = %quality_filter, "quality filter changed");
        Self {
            quality_filter,
            ..self.rescoped()
        }
    }

    /// New page size. Changes which rows share a page, so it rescopes too.
    #[must_use]
    pub fn with_page_size(&self, page_size: usize) -> Self {
        debug!(page_size, "page size changed");
        Self {
            page_size,
            ..self.rescoped()
        }
    }

    /// Jump to a page; the caller clamps against the page count
    #[must_use]
    pub fn with_page(&self, page: usize) -> Self {
        Self {
            page,
            ..self.clone()
        }
    }

    /// Column header click
    #[must_use]
    pub fn with_sort_click(&self, field: F) -> Self {
        let sort = self.sort.clicked(field);
        debug!(field = %sort.field, direction = ?sort.direction, "sort changed");
        Self {
            sort,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_row_toggled(&self, id: RecordId) -> Self {
        Self {
            selection: self.selection.toggled(id),
            ..self.clone()
        }
    }

    /// Select-all checkbox over the ids currently on screen
    #[must_use]
    pub fn with_page_toggled(&self, page_ids: &[RecordId]) -> Self {
        Self {
            selection: self.selection.toggled_page(page_ids),
            ..self.clone()
        }
    }

    fn rescoped(&self) -> Self {
        Self {
            page: 1,
            selection: Selection::new(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quality::Quality;
    use crate::records::ProfileField;

    fn state() -> ViewState<ProfileField> {
        ViewState::new(SortState::new(ProfileField::Date, SortDirection::Desc), 10)
    }

    #[test]
    fn test_sort_click_contract() {
        let sort = SortState::new(ProfileField::Date, SortDirection::Desc);

        let sort = sort.clicked(ProfileField::Mld);
        assert_eq!(sort, SortState::new(ProfileField::Mld, SortDirection::Asc));

        let sort = sort.clicked(ProfileField::Mld);
        assert_eq!(sort.direction, SortDirection::Desc);

        let sort = sort.clicked(ProfileField::Mld);
        assert_eq!(sort.direction, SortDirection::Asc);
    }

    #[test]
    fn test_scope_change_resets_page_and_selection() {
        let s = state().with_page(3).with_row_toggled(7);
        assert_eq!(s.page, 3);
        assert!(s.selection.contains(7));

        let filtered = s.with_quality_filter(QualityFilter::Only(Quality::Good));
        assert_eq!(filtered.page, 1);
        assert!(filtered.selection.is_empty());

        let searched = s.with_query("D19");
        assert_eq!(searched.query, "D19");
        assert_eq!(searched.page, 1);
        assert!(searched.selection.is_empty());
    }

    #[test]
    fn test_paging_and_sorting_keep_selection() {
        let s = state().with_row_toggled(7).with_page(2).with_sort_click(ProfileField::Id);
        assert!(s.selection.contains(7));
        assert_eq!(s.page, 2);
    }
}
