//! Core functionality for the ARGO profile tables
//!
//! This crate provides the record model, view state and shared application
//! state that the data sources and the table engine build on.

pub mod events;
pub mod quality;
pub mod records;
pub mod selection;
pub mod settings;
pub mod state;
pub mod table;
pub mod view_state;

// Re-export commonly used types
pub use data::DataSource;
pub use quality::{BadgeVariant, Quality, QualityFilter};
pub use records::{Measurement, MeasurementField, Profile, ProfileField};
pub use selection::Selection;
pub use settings::{SettingsError, TableSettings};
pub use state::{AppState, Collections};
pub use table::{FieldValue, RecordId, SortField, TableRecord, UnknownField};
pub use view_state::{SortDirection, SortState, ViewState};

pub mod data {
    use crate::records::{Measurement, Profile};

    /// Provider of the session's record collections
    #[async_trait::async_trait]
    pub trait DataSource: Send + Sync {
        /// Load every profile
        async fn profiles(&self) -> anyhow::Result<Vec<Profile>>;

        /// Load every measurement
        async fn measurements(&self) -> anyhow::Result<Vec<Measurement>>;

        /// Get the source name/path
        fn source_name(&self) -> &str;
    }
}
