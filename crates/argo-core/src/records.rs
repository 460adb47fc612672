//! ARGO profile and measurement records

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::quality::Quality;
use crate::table::{sort_fields, FieldValue, RecordId, TableRecord};

/// One ARGO float profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: RecordId,
    /// Source file name, display only
    pub file: String,
    pub date: NaiveDate,
    pub lat: f64,
    pub lon: f64,
    /// Mixed layer depth (m)
    #[serde(default)]
    pub mld: Option<f64>,
    #[serde(default)]
    pub thermoclinedepth: Option<f64>,
    #[serde(default)]
    pub salinitymindepth: Option<f64>,
    #[serde(default)]
    pub salinitymaxdepth: Option<f64>,
    #[serde(default)]
    pub meanstratification: Option<f64>,
    /// Ocean heat content over 0-200m (J/m²)
    #[serde(default)]
    pub ohc_0_200m: Option<f64>,
    #[serde(default)]
    pub surfacetemp: Option<f64>,
    #[serde(default)]
    pub surfacesal: Option<f64>,
    #[serde(default)]
    pub n_levels: Option<u32>,
    #[serde(default)]
    pub direction: Option<String>,
    pub quality: Quality,
}

sort_fields! {
    /// Sortable columns of the profile table
    pub enum ProfileField {
        Id => "id",
        File => "file",
        Date => "date",
        Lat => "lat",
        Lon => "lon",
        Mld => "mld",
        ThermoclineDepth => "thermoclinedepth",
        SalinityMinDepth => "salinitymindepth",
        SalinityMaxDepth => "salinitymaxdepth",
        MeanStratification => "meanstratification",
        Ohc0To200m => "ohc_0_200m",
        SurfaceTemp => "surfacetemp",
        SurfaceSal => "surfacesal",
        NLevels => "n_levels",
        Direction => "direction",
        Quality => "quality",
    }
}

impl Profile {
    /// Latitude formatted with hemisphere, e.g. `5.20°S`
    pub fn lat_label(&self) -> String {
        let hemisphere = if self.lat >= 0.0 { 'N' } else { 'S' };
        format!("{:.2}°{}", self.lat.abs(), hemisphere)
    }

    /// Longitude formatted with hemisphere, e.g. `67.80°E`
    pub fn lon_label(&self) -> String {
        let hemisphere = if self.lon >= 0.0 { 'E' } else { 'W' };
        format!("{:.2}°{}", self.lon.abs(), hemisphere)
    }

    /// Heat content in GJ/m²
    pub fn ohc_gj_per_m2(&self) -> Option<f64> {
        self.ohc_0_200m.map(|ohc| ohc / 1e9)
    }
}

impl TableRecord for Profile {
    type Field = ProfileField;

    fn record_id(&self) -> RecordId {
        self.id
    }

    fn quality(&self) -> &Quality {
        &self.quality
    }

    fn matches_query(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        // Numbers are matched on their plain decimal text, the file name case-insensitively
        self.id.to_string().contains(query)
            || self.file.to_lowercase().contains(&query.to_lowercase())
            || self.lat.to_string().contains(query)
            || self.lon.to_string().contains(query)
    }

    fn field(&self, field: ProfileField) -> FieldValue<'_> {
        match field {
            ProfileField::Id => FieldValue::Number(self.id as f64),
            ProfileField::File => FieldValue::Text(&self.file),
            ProfileField::Date => FieldValue::Date(self.date),
            ProfileField::Lat => FieldValue::Number(self.lat),
            ProfileField::Lon => FieldValue::Number(self.lon),
            ProfileField::Mld => self.mld.into(),
            ProfileField::ThermoclineDepth => self.thermoclinedepth.into(),
            ProfileField::SalinityMinDepth => self.salinitymindepth.into(),
            ProfileField::SalinityMaxDepth => self.salinitymaxdepth.into(),
            ProfileField::MeanStratification => self.meanstratification.into(),
            ProfileField::Ohc0To200m => self.ohc_0_200m.into(),
            ProfileField::SurfaceTemp => self.surfacetemp.into(),
            ProfileField::SurfaceSal => self.surfacesal.into(),
            ProfileField::NLevels => self.n_levels.map(f64::from).into(),
            ProfileField::Direction => self
                .direction
                .as_deref()
                .map(FieldValue::Text)
                .unwrap_or(FieldValue::Missing),
            ProfileField::Quality => FieldValue::Text(self.quality.as_str()),
        }
    }
}

/// One depth-resolved sensor sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub id: RecordId,
    /// Display label of the originating float, not a foreign key
    #[serde(rename = "profileId")]
    pub profile_id: String,
    pub depth: f64,
    pub temperature: f64,
    pub salinity: f64,
    pub pressure: f64,
    pub oxygen: f64,
    pub ph: f64,
    pub timestamp: DateTime<Utc>,
    pub quality: Quality,
}

sort_fields! {
    /// Sortable columns of the measurement table
    pub enum MeasurementField {
        Id => "id",
        ProfileId => "profileId",
        Depth => "depth",
        Temperature => "temperature",
        Salinity => "salinity",
        Pressure => "pressure",
        Oxygen => "oxygen",
        Ph => "ph",
        Timestamp => "timestamp",
        Quality => "quality",
    }
}

impl TableRecord for Measurement {
    type Field = MeasurementField;

    fn record_id(&self) -> RecordId {
        self.id
    }

    fn quality(&self) -> &Quality {
        &self.quality
    }

    fn matches_query(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        self.id.to_string().contains(query)
            || self
                .profile_id
                .to_lowercase()
                .contains(&query.to_lowercase())
    }

    fn field(&self, field: MeasurementField) -> FieldValue<'_> {
        match field {
            MeasurementField::Id => FieldValue::Number(self.id as f64),
            MeasurementField::ProfileId => FieldValue::Text(&self.profile_id),
            MeasurementField::Depth => FieldValue::Number(self.depth),
            MeasurementField::Temperature => FieldValue::Number(self.temperature),
            MeasurementField::Salinity => FieldValue::Number(self.salinity),
            MeasurementField::Pressure => FieldValue::Number(self.pressure),
            MeasurementField::Oxygen => FieldValue::Number(self.oxygen),
            MeasurementField::Ph => FieldValue::Number(self.ph),
            MeasurementField::Timestamp => FieldValue::Timestamp(self.timestamp),
            MeasurementField::Quality => FieldValue::Text(self.quality.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::SortField;

    fn profile() -> Profile {
        Profile {
            id: 12,
            file: "D1901393_001.nc".to_string(),
            date: NaiveDate::from_ymd_opt(2023, 6, 15).unwrap(),
            lat: -5.2,
            lon: 67.8,
            mld: Some(45.5),
            thermoclinedepth: None,
            salinitymindepth: None,
            salinitymaxdepth: None,
            meanstratification: None,
            ohc_0_200m: Some(2.8e9),
            surfacetemp: None,
            surfacesal: None,
            n_levels: Some(156),
            direction: None,
            quality: Quality::Excellent,
        }
    }

    #[test]
    fn test_profile_search_fields() {
        let p = profile();
        assert!(p.matches_query(""));
        assert!(p.matches_query("12"));
        assert!(p.matches_query("d1901393"));
        assert!(p.matches_query("-5.2"));
        assert!(p.matches_query("67.8"));
        assert!(!p.matches_query("D1901394"));
        assert!(!p.matches_query("45.5"));
    }

    #[test]
    fn test_missing_optional_field() {
        let p = profile();
        assert_eq!(p.field(ProfileField::Direction), FieldValue::Missing);
        assert_eq!(p.field(ProfileField::SurfaceTemp), FieldValue::Missing);
        assert_eq!(p.field(ProfileField::NLevels), FieldValue::Number(156.0));
    }

    #[test]
    fn test_labels() {
        let p = profile();
        assert_eq!(p.lat_label(), "5.20°S");
        assert_eq!(p.lon_label(), "67.80°E");
        assert_eq!(p.ohc_gj_per_m2(), Some(2.8));
    }

    #[test]
    fn test_field_names_round_trip() {
        for field in ProfileField::ALL {
            assert_eq!(field.name().parse::<ProfileField>(), Ok(*field));
        }
        assert_eq!(
            "profileId".parse::<MeasurementField>(),
            Ok(MeasurementField::ProfileId)
        );
        assert!("nope".parse::<MeasurementField>().is_err());
    }
}
