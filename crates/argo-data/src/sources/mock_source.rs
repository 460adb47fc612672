//! Built-in sample collections for demos and tests

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use argo_core::data::DataSource;
use argo_core::quality::Quality;
use argo_core::records::{Measurement, Profile};

const DEFAULT_SEED: u64 = 42;
const MEASUREMENT_COUNT: u64 = 50;

/// In-memory source with six reference profiles and seeded measurements
pub struct MockSource {
    seed: u64,
}

impl MockSource {
    pub fn new() -> Self {
        Self { seed: DEFAULT_SEED }
    }

    /// Use a different seed for the generated measurements
    pub fn with_seed(seed: u64) -> Self {
        Self { seed }
    }

    /// The six reference profiles from the Indian Ocean sample set
    pub fn sample_profiles() -> Vec<Profile> {
        // (id, date, lat, lon, mld, thermocline, sal min, sal max, stratification, ohc, sst, sss, levels, quality)
        let rows: [(u64, (i32, u32, u32), f64, f64, f64, f64, f64, f64, f64, f64, f64, f64, u32, Quality); 6] = [
            (1, (2023, 6, 15), -5.2, 67.8, 45.5, 120.3, 85.2, 200.1, 0.0045, 2.8e9, 28.5, 35.2, 156, Quality::Excellent),
            (2, (2023, 7, 20), -8.1, 72.3, 32.8, 95.7, 75.4, 180.6, 0.0052, 3.1e9, 29.2, 34.8, 142, Quality::Good),
            (3, (2023, 8, 1), -12.5, 78.9, 28.3, 85.2, 65.1, 150.8, 0.0058, 3.4e9, 30.1, 34.5, 138, Quality::Excellent),
            (4, (2023, 9, 10), 8.2, 88.1, 22.1, 78.5, 58.3, 165.2, 0.0061, 3.6e9, 29.8, 33.9, 145, Quality::Good),
            (5, (2023, 10, 5), 15.7, 68.4, 38.7, 105.8, 82.1, 195.3, 0.0048, 3.2e9, 28.9, 35.8, 152, Quality::Excellent),
            (6, (2023, 11, 12), 2.1, 75.6, 41.2, 112.4, 88.7, 205.9, 0.0043, 2.9e9, 28.1, 35.1, 148, Quality::Fair),
        ];

        rows.into_iter()
            .filter_map(
                |(id, (y, m, d), lat, lon, mld, thermo, sal_min, sal_max, strat, ohc, sst, sss, levels, quality)| {
                    Some(Profile {
                        id,
                        file: format!("D{}_{:03}.nc", 1901392 + id, id),
                        date: NaiveDate::from_ymd_opt(y, m, d)?,
                        lat,
                        lon,
                        mld: Some(mld),
                        thermoclinedepth: Some(thermo),
                        salinitymindepth: Some(sal_min),
                        salinitymaxdepth: Some(sal_max),
                        meanstratification: Some(strat),
                        ohc_0_200m: Some(ohc),
                        surfacetemp: Some(sst),
                        surfacesal: Some(sss),
                        n_levels: Some(levels),
                        direction: Some("ascending".to_string()),
                        quality,
                    })
                },
            )
            .collect()
    }

    /// Fifty measurements drifting with depth, ten per float label
    pub fn sample_measurements(seed: u64) -> Vec<Measurement> {
        let mut rng = StdRng::seed_from_u64(seed);

        (0..MEASUREMENT_COUNT)
            .filter_map(|i| {
                let step = i as f64;
                let float = i / 10;
                let day = 15 - float as u32;
                let hour = rng.gen_range(0..24);
                let minute = rng.gen_range(0..60);
                let timestamp = Utc.with_ymd_and_hms(2024, 1, day, hour, minute, 0).single()?;

                let quality = if rng.gen::<f64>() > 0.8 {
                    Quality::Excellent
                } else if rng.gen::<f64>() > 0.5 {
                    Quality::Good
                } else {
                    Quality::Fair
                };

                Some(Measurement {
                    id: i + 1,
                    profile_id: format!("ARGO_{:03}", float + 1),
                    depth: step * 40.0 + rng.gen::<f64>() * 20.0,
                    temperature: 25.0 - step * 0.4 + rng.gen::<f64>() * 2.0,
                    salinity: 34.5 + step * 0.01 + rng.gen::<f64>() * 0.5,
                    pressure: step * 4.0 + rng.gen::<f64>() * 2.0,
                    oxygen: 250.0 - step * 3.0 + rng.gen::<f64>() * 20.0,
                    ph: 8.1 - step * 0.002 + rng.gen::<f64>() * 0.1,
                    timestamp,
                    quality,
                })
            })
            .collect()
    }
}

impl Default for MockSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DataSource for MockSource {
    async fn profiles(&self) -> anyhow::Result<Vec<Profile>> {
        Ok(Self::sample_profiles())
    }

    async fn measurements(&self) -> anyhow::Result<Vec<Measurement>> {
        Ok(Self::sample_measurements(self.seed))
    }

    fn source_name(&self) -> &str {
        "sample"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_profiles() {
        let profiles = MockSource::sample_profiles();
        assert_eq!(profiles.len(), 6);
        assert_eq!(profiles[0].file, "D1901393_001.nc");
        assert_eq!(profiles[5].file, "D1901398_006.nc");
        assert_eq!(profiles[5].quality, Quality::Fair);
    }

    #[test]
    fn test_measurements_are_seeded() {
        let a = MockSource::sample_measurements(7);
        let b = MockSource::sample_measurements(7);
        assert_eq!(a, b);
        assert_eq!(a.len(), 50);
        assert_eq!(a[0].profile_id, "ARGO_001");
        assert_eq!(a[49].profile_id, "ARGO_005");
        assert_eq!(a[49].id, 50);
    }

    #[tokio::test]
    async fn test_data_source() {
        let source = MockSource::new();
        assert_eq!(source.profiles().await.unwrap().len(), 6);
        assert_eq!(source.measurements().await.unwrap().len(), 50);
    }
}
