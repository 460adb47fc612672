//! Search, filter, sort and pagination over a record collection
//!
//! Every function here is pure: the output depends only on the arguments and
//! no state survives between calls.

use std::cmp::Ordering;

use argo_core::quality::QualityFilter;
use argo_core::selection::Selection;
use argo_core::table::{RecordId, TableRecord};
use argo_core::view_state::{SortDirection, SortState, ViewState};

/// Records matching the quality filter and the free-text query, in input order
pub fn filter<'a, R: TableRecord>(
    records: &'a [R],
    query: &str,
    quality_filter: &QualityFilter,
) -> Vec<&'a R> {
    filtered_indices(records, query, quality_filter)
        .into_iter()
        .map(|idx| &records[idx])
        .collect()
}

/// Stable sort of `records` by one field; the input is left untouched
pub fn sort<'a, R: TableRecord>(records: &[&'a R], sort: SortState<R::Field>) -> Vec<&'a R> {
    let mut order: Vec<usize> = (0..records.len()).collect();
    merge_sort_by(&mut order, |&a, &b| compare(records[a], records[b], sort));
    order.into_iter().map(|idx| records[idx]).collect()
}

/// Rows of 1-based `page`; empty when the page lies past the end or `page` is 0
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let Some(start) = page.checked_sub(1).and_then(|p| p.checked_mul(page_size)) else {
        return &[];
    };
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// Number of pages needed for `count` rows; zero for no rows or a zero page size
pub fn total_pages(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        0
    } else {
        count.div_ceil(page_size)
    }
}

/// Add or remove one id
pub fn toggle_selection(selection: &Selection, id: RecordId) -> Selection {
    selection.toggled(id)
}

/// Page-scoped select-all toggle
pub fn select_all_on_page(selection: &Selection, page_ids: &[RecordId]) -> Selection {
    selection.toggled_page(page_ids)
}

/// Pagination metadata of a rendered page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub current_page: usize,
    pub total_pages: usize,
    pub total_count: usize,
    /// 1-based index of the first row shown, 0 when nothing is shown
    pub page_start: usize,
    /// 1-based index of the last row shown, 0 when nothing is shown
    pub page_end: usize,
}

impl PageInfo {
    pub fn new(current_page: usize, page_size: usize, total_count: usize) -> Self {
        let shown = paginate_range(current_page, page_size, total_count);
        let (page_start, page_end) = match shown {
            Some((start, end)) => (start + 1, end),
            None => (0, 0),
        };
        Self {
            current_page,
            total_pages: total_pages(total_count, page_size),
            total_count,
            page_start,
            page_end,
        }
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// `page` clamped into `[1, total_pages]`; 1 when there are no pages
    pub fn clamp(&self, page: usize) -> usize {
        page.clamp(1, self.total_pages.max(1))
    }

    pub fn next_page(&self) -> usize {
        self.clamp(self.current_page.saturating_add(1))
    }

    pub fn previous_page(&self) -> usize {
        self.clamp(self.current_page.saturating_sub(1))
    }

    /// Numbered pager buttons: the first `max_buttons` pages
    pub fn page_buttons(&self, max_buttons: usize) -> std::ops::RangeInclusive<usize> {
        1..=self.total_pages.min(max_buttons)
    }
}

/// One rendered page of a table
#[derive(Debug, Clone)]
pub struct TablePage<'a, R> {
    pub rows: Vec<&'a R>,
    pub info: PageInfo,
    pub selection: &'a Selection,
    /// Drives the select-all checkbox
    pub page_fully_selected: bool,
}

impl<R: TableRecord> TablePage<'_, R> {
    pub fn row_ids(&self) -> Vec<RecordId> {
        self.rows.iter().map(|r| r.record_id()).collect()
    }

    pub fn is_selected(&self, record: &R) -> bool {
        self.selection.contains(record.record_id())
    }
}

/// Filter, sort and paginate `records` for `state` from scratch
pub fn render<'a, R: TableRecord>(
    records: &'a [R],
    state: &'a ViewState<R::Field>,
) -> TablePage<'a, R> {
    let order = ordered_indices(records, &state.query, &state.quality_filter, state.sort);
    page_from_order(records, &order, state)
}

/// Indices of matching records in display order
pub(crate) fn ordered_indices<R: TableRecord>(
    records: &[R],
    query: &str,
    quality_filter: &QualityFilter,
    sort: SortState<R::Field>,
) -> Vec<usize> {
    let mut order = filtered_indices(records, query, quality_filter);
    merge_sort_by(&mut order, |&a, &b| compare(&records[a], &records[b], sort));
    order
}

pub(crate) fn page_from_order<'a, R: TableRecord>(
    records: &'a [R],
    order: &[usize],
    state: &'a ViewState<R::Field>,
) -> TablePage<'a, R> {
    let rows: Vec<&R> = paginate(order, state.page, state.page_size)
        .iter()
        .map(|&idx| &records[idx])
        .collect();
    let page_ids: Vec<RecordId> = rows.iter().map(|r| r.record_id()).collect();

    TablePage {
        info: PageInfo::new(state.page, state.page_size, order.len()),
        page_fully_selected: state.selection.covers(&page_ids),
        selection: &state.selection,
        rows,
    }
}

fn filtered_indices<R: TableRecord>(
    records: &[R],
    query: &str,
    quality_filter: &QualityFilter,
) -> Vec<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(_, r)| quality_filter.accepts(r.quality()) && r.matches_query(query))
        .map(|(idx, _)| idx)
        .collect()
}

fn paginate_range(page: usize, page_size: usize, count: usize) -> Option<(usize, usize)> {
    let start = page.checked_sub(1)?.checked_mul(page_size)?;
    if start >= count || page_size == 0 {
        return None;
    }
    Some((start, start.saturating_add(page_size).min(count)))
}

fn compare<R: TableRecord>(a: &R, b: &R, sort: SortState<R::Field>) -> Ordering {
    let ordering = a.field(sort.field).compare(&b.field(sort.field));
    match sort.direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

/// Stable top-down merge sort.
///
/// The field comparator treats mismatched or missing values as equal, which is
/// not a total order; `slice::sort_by` may panic on such comparators, this
/// never does.
fn merge_sort_by<T: Copy, F>(items: &mut [T], mut cmp: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    let mut scratch = items.to_vec();
    merge_sort_rec(items, &mut scratch, &mut cmp);
}

fn merge_sort_rec<T: Copy, F>(items: &mut [T], scratch: &mut [T], cmp: &mut F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    let len = items.len();
    if len <= 1 {
        return;
    }
    let mid = len / 2;
    {
        let (left, right) = items.split_at_mut(mid);
        let (scratch_left, scratch_right) = scratch.split_at_mut(mid);
        merge_sort_rec(left, scratch_left, cmp);
        merge_sort_rec(right, scratch_right, cmp);
    }

    scratch[..len].copy_from_slice(items);
    let (left, right) = scratch[..len].split_at(mid);
    let (mut i, mut j) = (0, 0);
    for slot in items.iter_mut() {
        // Take from the left run unless the right element is strictly smaller
        let take_left = j >= right.len()
            || (i < left.len() && cmp(&left[i], &right[j]) != Ordering::Greater);
        if take_left {
            *slot = left[i];
            i += 1;
        } else {
            *slot = right[j];
            j += 1;
        }
    }
}
