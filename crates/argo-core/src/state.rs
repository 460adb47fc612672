use std::sync::Arc;

use ahash::AHashSet;
use anyhow::bail;
use parking_lot::RwLock;
use tracing::{info, warn};

use crate::data::DataSource;
use crate::events::EventBus;
use crate::records::{Measurement, Profile};
use crate::settings::TableSettings;
use crate::table::TableRecord;

/// Collections loaded for the session; read-only once set
#[derive(Debug, Clone)]
pub struct Collections {
    pub profiles: Arc<[Profile]>,
    pub measurements: Arc<[Measurement]>,
}

impl Default for Collections {
    fn default() -> Self {
        Self {
            profiles: Arc::from(Vec::new()),
            measurements: Arc::from(Vec::new()),
        }
    }
}

/// The main application state
pub struct AppState {
    /// The event bus
    pub event_bus: Arc<EventBus>,

    /// Name of the loaded data source
    pub source_name: Arc<RwLock<Option<String>>>,

    /// The loaded record collections
    pub collections: Arc<RwLock<Collections>>,

    /// Table settings
    pub settings: Arc<RwLock<TableSettings>>,
}

impl AppState {
    /// Create a new application state
    pub fn new(settings: TableSettings) -> Self {
        Self {
            event_bus: Arc::new(EventBus::new()),
            source_name: Arc::new(RwLock::new(None)),
            collections: Arc::new(RwLock::new(Collections::default())),
            settings: Arc::new(RwLock::new(settings)),
        }
    }

    /// Load both collections from a data source.
    ///
    /// A collection with duplicate ids is rejected and the previous state is kept.
    pub async fn load_data_source(&self, source: Arc<dyn DataSource>) -> anyhow::Result<()> {
        let name = source.source_name().to_string();

        let loaded = async {
            let profiles = source.profiles().await?;
            let measurements = source.measurements().await?;
            ensure_unique_ids("profile", &profiles)?;
            ensure_unique_ids("measurement", &measurements)?;
            anyhow::Ok((profiles, measurements))
        }
        .await;

        let (profiles, measurements) = match loaded {
            Ok(collections) => collections,
            Err(e) => {
                warn!("Failed to load {}: {:#}", name, e);
                self.event_bus.publish(crate::events::events::DataSourceError {
                    source_name: name,
                    error: format!("{e:#}"),
                });
                return Err(e);
            }
        };

        info!(
            "Loaded {} profiles and {} measurements from {}",
            profiles.len(),
            measurements.len(),
            name
        );

        let profile_count = profiles.len();
        let measurement_count = measurements.len();

        *self.collections.write() = Collections {
            profiles: profiles.into(),
            measurements: measurements.into(),
        };
        *self.source_name.write() = Some(name.clone());

        self.event_bus.publish(crate::events::events::DataSourceLoaded {
            source_name: name,
            profile_count,
            measurement_count,
        });

        Ok(())
    }

    /// Snapshot of the loaded collections
    pub fn collections(&self) -> Collections {
        self.collections.read().clone()
    }

    /// Clear the loaded collections
    pub fn clear_data_source(&self) {
        *self.collections.write() = Collections::default();
        *self.source_name.write() = None;
    }
}

fn ensure_unique_ids<R: TableRecord>(kind: &str, records: &[R]) -> anyhow::Result<()> {
    let mut seen = AHashSet::with_capacity(records.len());
    for record in records {
        if !seen.insert(record.record_id()) {
            bail!("duplicate {} id {}", kind, record.record_id());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quality::Quality;
    use async_trait::async_trait;
    use chrono::NaiveDate;

    struct FixedSource {
        profiles: Vec<Profile>,
    }

    #[async_trait]
    impl DataSource for FixedSource {
        async fn profiles(&self) -> anyhow::Result<Vec<Profile>> {
            Ok(self.profiles.clone())
        }

        async fn measurements(&self) -> anyhow::Result<Vec<Measurement>> {
            Ok(Vec::new())
        }

        fn source_name(&self) -> &str {
            "fixed"
        }
    }

    fn profile(id: u64) -> Profile {
        Profile {
            id,
            file: format!("F{id}.nc"),
            date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            lat: 0.0,
            lon: 0.0,
            mld: None,
            thermoclinedepth: None,
            salinitymindepth: None,
            salinitymaxdepth: None,
            meanstratification: None,
            ohc_0_200m: None,
            surfacetemp: None,
            surfacesal: None,
            n_levels: None,
            direction: None,
            quality: Quality::Good,
        }
    }

    #[tokio::test]
    async fn test_load_data_source() {
        let state = AppState::new(TableSettings::default());
        let source = Arc::new(FixedSource {
            profiles: vec![profile(1), profile(2)],
        });

        state.load_data_source(source).await.unwrap();

        assert_eq!(state.collections().profiles.len(), 2);
        assert_eq!(state.source_name.read().as_deref(), Some("fixed"));
    }

    #[tokio::test]
    async fn test_duplicate_ids_rejected() {
        let state = AppState::new(TableSettings::default());
        let source = Arc::new(FixedSource {
            profiles: vec![profile(1), profile(1)],
        });

        let err = state.load_data_source(source).await.unwrap_err();
        assert!(err.to_string().contains("duplicate profile id 1"));
        assert!(state.collections().profiles.is_empty());
    }
}
