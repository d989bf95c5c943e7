//! New-marker form model
//!
//! Holds the text the user typed (or the click bridge filled in) and turns it
//! into a [`NewMarker`]. The only validation is that both coordinates parse as
//! numbers.

use crate::bridge::CoordinateSink;
use crate::marker::{CoordinateField, MarkerRecord, format_coordinate, parse_coordinate};
use crate::store::{MarkerStore, NewMarker};
use crate::Result;
use std::path::PathBuf;

/// Contents and visibility of the new-marker form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkerForm {
    pub latitude: String,
    pub longitude: String,
    pub title: String,
    pub description: String,
    /// Path of the image to attach, empty for none
    pub image: String,
    pub visible: bool,
}

impl MarkerForm {
    /// Show or hide the form
    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    /// Caption of the button that toggles the form
    pub fn toggle_label(&self) -> &'static str {
        if self.visible { "✕ Cancel" } else { "📍 New Marker" }
    }

    /// Validate the fields and build the marker to append
    pub fn to_new_marker(&self) -> Result<NewMarker> {
        let lat = parse_coordinate(CoordinateField::Latitude, &self.latitude)?;
        let lon = parse_coordinate(CoordinateField::Longitude, &self.longitude)?;

        Ok(NewMarker {
            lat,
            lon,
            title: self.title.clone(),
            description: self.description.clone(),
            image_source: (!self.image.is_empty()).then(|| PathBuf::from(&self.image)),
        })
    }

    /// Validate, append to `store` and hide the form on success.
    ///
    /// Nothing on disk is touched when validation fails.
    pub fn submit(&mut self, store: &MarkerStore) -> Result<MarkerRecord> {
        let marker = self.to_new_marker()?;
        let record = store.append(marker)?;
        self.visible = false;
        Ok(record)
    }
}

impl CoordinateSink for MarkerForm {
    fn receive(&mut self, lat: f64, lon: f64) {
        self.latitude = format_coordinate(lat);
        self.longitude = format_coordinate(lon);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MarkerError;

    fn filled_form(latitude: &str, longitude: &str) -> MarkerForm {
        MarkerForm {
            latitude: latitude.to_owned(),
            longitude: longitude.to_owned(),
            title: "Title".to_owned(),
            description: "Description".to_owned(),
            ..Default::default()
        }
    }

    #[test]
    fn test_toggle_flips_visibility_and_label() {
        let mut form = MarkerForm::default();
        assert!(!form.visible);
        let hidden_label = form.toggle_label();

        form.toggle();
        assert!(form.visible);
        assert_ne!(form.toggle_label(), hidden_label);

        form.toggle();
        assert!(!form.visible);
        assert_eq!(form.toggle_label(), hidden_label);
    }

    #[test]
    fn test_receive_overwrites_only_coordinates() {
        let mut form = filled_form("1", "2");
        form.receive(55.751244, 37.0);

        assert_eq!(form.latitude, "55.751244");
        assert_eq!(form.longitude, "37.0");
        assert_eq!(form.title, "Title");
        assert_eq!(form.description, "Description");
    }

    #[test]
    fn test_to_new_marker() {
        let marker = filled_form("10.5", "20.25").to_new_marker().unwrap();
        assert_eq!(marker.lat, 10.5);
        assert_eq!(marker.lon, 20.25);
        assert_eq!(marker.title, "Title");
        assert_eq!(marker.image_source, None);

        let mut form = filled_form("0", "0");
        form.image = "/tmp/photo.jpg".to_owned();
        assert_eq!(
            form.to_new_marker().unwrap().image_source,
            Some(PathBuf::from("/tmp/photo.jpg"))
        );
    }

    #[test]
    fn test_to_new_marker_reports_the_bad_field() {
        let err = filled_form("north", "20").to_new_marker().unwrap_err();
        assert!(matches!(
            err,
            MarkerError::InvalidCoordinate {
                field: CoordinateField::Latitude,
                ..
            }
        ));

        let err = filled_form("10", "").to_new_marker().unwrap_err();
        assert!(matches!(
            err,
            MarkerError::InvalidCoordinate {
                field: CoordinateField::Longitude,
                ..
            }
        ));
    }
}
