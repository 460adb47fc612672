//! Table settings loaded from an optional JSON file

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::records::{MeasurementField, ProfileField};
use crate::view_state::{SortDirection, SortState, ViewState};

/// Errors while reading settings
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid settings: {0}")]
    Invalid(String),
}

/// Settings for the profile and measurement tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableSettings {
    /// Rows per page when a table is first shown
    pub default_page_size: usize,

    /// Page sizes offered by the page size selector
    pub page_size_options: Vec<usize>,

    /// Initial sort of the profile table
    pub profile_sort: SortState<ProfileField>,

    /// Initial sort of the measurement table
    pub measurement_sort: SortState<MeasurementField>,

    /// Number of numbered page buttons shown in the pager
    pub max_page_buttons: usize,

    /// Distinct (query, filter, sort) orderings kept by the render cache
    pub cache_capacity: usize,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            page_size_options: vec![5, 10, 25, 50],
            profile_sort: SortState::new(ProfileField::Date, SortDirection::Desc),
            measurement_sort: SortState::new(MeasurementField::Id, SortDirection::Asc),
            max_page_buttons: 5,
            cache_capacity: 16,
        }
    }
}

impl TableSettings {
    /// Load settings from a JSON file; missing keys keep their defaults
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path)?;
        let settings: TableSettings = serde_json::from_str(&text)?;
        settings.validate()?;
        info!("Loaded table settings from {:?}", path);
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.default_page_size == 0 {
            return Err(SettingsError::Invalid("default_page_size must be positive".into()));
        }
        if self.page_size_options.iter().any(|&size| size == 0) {
            return Err(SettingsError::Invalid("page sizes must be positive".into()));
        }
        Ok(())
    }

    /// Whether `page_size` is one of the offered options
    pub fn allows_page_size(&self, page_size: usize) -> bool {
        self.page_size_options.contains(&page_size)
    }

    pub fn profile_view(&self) -> ViewState<ProfileField> {
        ViewState::new(self.profile_sort, self.default_page_size)
    }

    pub fn measurement_view(&self) -> ViewState<MeasurementField> {
        ViewState::new(self.measurement_sort, self.default_page_size)
    }
}
