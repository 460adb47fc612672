//! Table view implementation

pub mod cache;
pub mod columns;
pub mod engine;

use std::path::Path;
use std::sync::Arc;

use ahash::AHashMap;
use serde::Serialize;
use tracing::{debug, info};

use argo_core::events::events::{PageRendered, SelectionChanged, SelectionExported};
use argo_core::events::EventBus;
use argo_core::table::{RecordId, TableRecord};
use argo_core::view_state::ViewState;

use crate::export::{export_to_file, ExportError, ExportFormat};
use cache::{OrderKey, QueryCache};
pub use engine::{PageInfo, TablePage};

/// Display configuration for table views
#[derive(Debug, Clone)]
pub struct TableConfig {
    pub show_row_numbers: bool,
    pub show_selection: bool,
    pub max_page_buttons: usize,
    /// Longer cell text is truncated with an ellipsis
    pub max_cell_width: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            show_row_numbers: true,
            show_selection: true,
            max_page_buttons: 5,
            max_cell_width: 32,
        }
    }
}

/// Table over one record collection.
///
/// Holds the records and a memo cache, never the view state: every method
/// takes the caller's [`ViewState`] and returns a new one where it changes.
pub struct TableView<R: TableRecord> {
    name: &'static str,
    records: Arc<[R]>,
    /// Record id to position in `records`
    id_index: AHashMap<RecordId, usize>,
    cache: QueryCache<R::Field>,
    pub config: TableConfig,
    event_bus: Option<Arc<EventBus>>,
}

impl<R: TableRecord> TableView<R> {
    /// Create a new table view
    pub fn new(name: &'static str, records: Arc<[R]>) -> Self {
        Self {
            name,
            id_index: build_index(&records),
            records,
            cache: QueryCache::new(16),
            config: TableConfig::default(),
            event_bus: None,
        }
    }

    /// Remember at most `capacity` orderings; 0 recomputes every render
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache = QueryCache::new(capacity);
        self
    }

    pub fn with_event_bus(mut self, event_bus: Arc<EventBus>) -> Self {
        self.event_bus = Some(event_bus);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    /// Swap in a new collection; cached orderings are dropped
    pub fn set_records(&mut self, records: Arc<[R]>) {
        self.id_index = build_index(&records);
        self.records = records;
        self.cache.clear();
    }

    /// Render the page described by `state`
    pub fn render<'a>(&'a self, state: &'a ViewState<R::Field>) -> TablePage<'a, R> {
        let order = self.order(state);
        let page = engine::page_from_order(&self.records, &order, state);

        debug!(
            table = self.name,
            page = page.info.current_page,
            rows = page.rows.len(),
            total = page.info.total_count,
            "rendered table page"
        );
        self.publish(PageRendered {
            table: self.name,
            page: page.info.current_page,
            total_pages: page.info.total_pages,
            total_count: page.info.total_count,
        });

        page
    }

    /// Pagination metadata for `state` without building the rows
    pub fn page_info(&self, state: &ViewState<R::Field>) -> PageInfo {
        PageInfo::new(state.page, state.page_size, self.order(state).len())
    }

    /// Pull the current page back into `[1, total_pages]`
    pub fn clamp_page(&self, state: &ViewState<R::Field>) -> ViewState<R::Field> {
        let info = self.page_info(state);
        state.with_page(info.clamp(state.page))
    }

    pub fn next_page(&self, state: &ViewState<R::Field>) -> ViewState<R::Field> {
        state.with_page(self.page_info(state).next_page())
    }

    pub fn previous_page(&self, state: &ViewState<R::Field>) -> ViewState<R::Field> {
        state.with_page(self.page_info(state).previous_page())
    }

    /// Row checkbox
    pub fn toggle_row(&self, state: &ViewState<R::Field>, id: RecordId) -> ViewState<R::Field> {
        let next = state.with_row_toggled(id);
        self.selection_changed(&next);
        next
    }

    /// Header checkbox: select or deselect every row on the current page
    pub fn toggle_page(&self, state: &ViewState<R::Field>) -> ViewState<R::Field> {
        let order = self.order(state);
        let page_ids: Vec<RecordId> = engine::paginate(&order[..], state.page, state.page_size)
            .iter()
            .map(|&idx| self.records[idx].record_id())
            .collect();
        let next = state.with_page_toggled(&page_ids);
        self.selection_changed(&next);
        next
    }

    /// Full records for the selected ids, in selection order. Ids that are not
    /// in the collection are skipped.
    pub fn selected_records(&self, state: &ViewState<R::Field>) -> Vec<&R> {
        state
            .selection
            .iter()
            .filter_map(|id| self.id_index.get(&id).map(|&idx| &self.records[idx]))
            .collect()
    }

    /// Export the selected records to `path`; fails when nothing is selected.
    /// `SelectionExported` is published only once the file is flushed.
    pub fn export_selected(
        &self,
        state: &ViewState<R::Field>,
        format: ExportFormat,
        path: &Path,
    ) -> Result<usize, ExportError>
    where
        R: Serialize,
    {
        let selected = self.selected_records(state);
        if selected.is_empty() {
            return Err(ExportError::EmptySelection);
        }

        let row_count = export_to_file(&selected, format, path)?;
        info!("Exported {} {} rows to {}", row_count, self.name, path.display());
        self.publish(SelectionExported {
            table: self.name,
            row_count,
            destination: path.display().to_string(),
        });
        Ok(row_count)
    }

    fn order(&self, state: &ViewState<R::Field>) -> Arc<[usize]> {
        let key = OrderKey {
            query: state.query.clone(),
            quality_filter: state.quality_filter.clone(),
            sort: state.sort,
        };
        self.cache.get_or_insert_with(key, || {
            engine::ordered_indices(&self.records, &state.query, &state.quality_filter, state.sort)
        })
    }

    fn selection_changed(&self, state: &ViewState<R::Field>) {
        debug!(table = self.name, selected = state.selection.len(), "selection changed");
        self.publish(SelectionChanged {
            table: self.name,
            selected: state.selection.iter().collect(),
        });
    }

    fn publish<E: argo_core::events::Event>(&self, event: E) {
        if let Some(bus) = &self.event_bus {
            bus.publish(event);
        }
    }
}

fn build_index<R: TableRecord>(records: &[R]) -> AHashMap<RecordId, usize> {
    records
        .iter()
        .enumerate()
        .map(|(idx, record)| (record.record_id(), idx))
        .collect()
}
