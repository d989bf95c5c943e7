//! Marker data model
//!
//! A marker document is a JSON object whose `locations` field holds the ordered
//! list of marker records. Fields this crate does not know about are kept in
//! `extra` so a read-modify-write cycle does not drop them.

use crate::{MarkerError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One point of interest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerRecord {
    /// Latitude in degrees (WGS84)
    pub lat: f64,

    /// Longitude in degrees (WGS84)
    pub lon: f64,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub description: String,

    /// File name inside the asset directory, empty when the marker has no image
    #[serde(default)]
    pub image: String,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl MarkerRecord {
    pub fn new(
        lat: f64,
        lon: f64,
        title: impl Into<String>,
        description: impl Into<String>,
        image: impl Into<String>,
    ) -> Self {
        Self {
            lat,
            lon,
            title: title.into(),
            description: description.into(),
            image: image.into(),
            extra: serde_json::Map::new(),
        }
    }

    pub fn has_image(&self) -> bool {
        !self.image.is_empty()
    }
}

/// The whole content of the marker document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarkerDocument {
    pub locations: Vec<MarkerRecord>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl MarkerDocument {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Pretty JSON with two-space indentation and no trailing newline
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Which coordinate a form value was meant for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateField {
    Latitude,
    Longitude,
}

impl fmt::Display for CoordinateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latitude => f.write_str("Latitude"),
            Self::Longitude => f.write_str("Longitude"),
        }
    }
}

/// Parse a coordinate typed by the user.
///
/// Surrounding whitespace is ignored. Values that are not finite numbers are
/// rejected because the marker document cannot store them.
pub fn parse_coordinate(field: CoordinateField, text: &str) -> Result<f64> {
    match text.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(MarkerError::InvalidCoordinate {
            field,
            value: text.to_owned(),
        }),
    }
}

/// Textual form of a coordinate as shown in the form fields.
///
/// Shortest round-tripping representation, always with a decimal point
/// (`20.0` stays `"20.0"`).
pub fn format_coordinate(value: f64) -> String {
    format!("{value:?}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_coordinate() {
        assert_eq!(parse_coordinate(CoordinateField::Latitude, "10.5").unwrap(), 10.5);
        assert_eq!(parse_coordinate(CoordinateField::Latitude, " -3 ").unwrap(), -3.0);
        assert_eq!(parse_coordinate(CoordinateField::Longitude, "1e1").unwrap(), 10.0);
    }

    #[test]
    fn test_parse_coordinate_rejects_non_numeric() {
        for text in ["", "abc", "10,5", "NaN", "inf", "-infinity"] {
            let err = parse_coordinate(CoordinateField::Longitude, text).unwrap_err();
            assert!(
                matches!(
                    err,
                    MarkerError::InvalidCoordinate {
                        field: CoordinateField::Longitude,
                        ..
                    }
                ),
                "{text:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_format_coordinate() {
        assert_eq!(format_coordinate(10.5), "10.5");
        assert_eq!(format_coordinate(20.0), "20.0");
        assert_eq!(format_coordinate(-0.1278), "-0.1278");
        assert_eq!(format_coordinate(55.751244), "55.751244");
    }

    #[test]
    fn test_missing_text_fields_default_to_empty() {
        let doc = MarkerDocument::from_json(r#"{"locations": [{"lat": 1, "lon": 2}]}"#).unwrap();
        assert_eq!(doc.locations.len(), 1);
        let record = &doc.locations[0];
        assert_eq!((record.lat, record.lon), (1.0, 2.0));
        assert!(record.title.is_empty());
        assert!(!record.has_image());
    }

    #[test]
    fn test_rejects_documents_without_numeric_coordinates() {
        assert!(MarkerDocument::from_json(r#"{"markers": []}"#).is_err());
        assert!(MarkerDocument::from_json(r#"{"locations": [{"lat": "x", "lon": 2}]}"#).is_err());
        assert!(MarkerDocument::from_json(r#"{"locations": [{"lon": 2}]}"#).is_err());
        assert!(MarkerDocument::from_json("not json").is_err());
    }

    #[test]
    fn test_unknown_fields_survive_round_trip() {
        let source = json!({
            "version": 2,
            "locations": [
                {"lat": 1.5, "lon": 2.5, "title": "T", "description": "", "image": "", "color": "red"}
            ]
        });
        let doc = MarkerDocument::from_json(&source.to_string()).unwrap();
        assert_eq!(doc.extra.get("version"), Some(&json!(2)));
        assert_eq!(doc.locations[0].extra.get("color"), Some(&json!("red")));

        let written: serde_json::Value = serde_json::from_str(&doc.to_json().unwrap()).unwrap();
        assert_eq!(written, source);
    }

    #[test]
    fn test_to_json_keeps_non_ascii_and_indents_two_spaces() {
        let doc = MarkerDocument {
            locations: vec![MarkerRecord::new(55.75, 37.61, "Красная площадь", "", "")],
            extra: Default::default(),
        };
        let json = doc.to_json().unwrap();
        assert!(json.contains("Красная площадь"));
        assert!(json.starts_with("{\n  \"locations\": [\n    {\n      \"lat\": 55.75,"));
        assert!(!json.ends_with('\n'));
    }
}
