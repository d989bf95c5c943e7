//! JSON-backed marker store
//!
//! The marker document is read in full and rewritten in full on every
//! addition. There is no locking: one process, one writer.

use crate::assets::AssetDirectory;
use crate::marker::{MarkerDocument, MarkerRecord};
use crate::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// A marker about to be added, as collected from the form
#[derive(Debug, Clone, PartialEq)]
pub struct NewMarker {
    pub lat: f64,
    pub lon: f64,
    pub title: String,
    pub description: String,
    /// Image file to import into the asset directory
    pub image_source: Option<PathBuf>,
}

/// Marker document plus the asset directory its images live in
#[derive(Debug, Clone)]
pub struct MarkerStore {
    document_path: PathBuf,
    assets: AssetDirectory,
}

impl MarkerStore {
    pub fn new(document_path: impl Into<PathBuf>, assets: AssetDirectory) -> Self {
        Self {
            document_path: document_path.into(),
            assets,
        }
    }

    pub fn document_path(&self) -> &Path {
        &self.document_path
    }

    pub fn assets(&self) -> &AssetDirectory {
        &self.assets
    }

    /// Read and parse the whole marker document
    pub fn read_document(&self) -> Result<MarkerDocument> {
        let json = fs::read_to_string(&self.document_path)?;
        MarkerDocument::from_json(&json)
    }

    /// Load all marker records in document order
    pub fn load(&self) -> Result<Vec<MarkerRecord>> {
        profiling::scope!("MarkerStore::load");

        let document = self.read_document()?;
        tracing::info!(
            "Loaded {} markers from {}",
            document.locations.len(),
            self.document_path.display()
        );
        Ok(document.locations)
    }

    /// Append one marker and rewrite the document.
    ///
    /// The image, if any, is imported first; a failed import leaves the
    /// document untouched.
    pub fn append(&self, marker: NewMarker) -> Result<MarkerRecord> {
        profiling::scope!("MarkerStore::append");

        let image = match &marker.image_source {
            Some(source) => self.assets.import(source)?,
            None => String::new(),
        };

        let mut document = self.read_document()?;
        let record = MarkerRecord::new(
            marker.lat,
            marker.lon,
            marker.title,
            marker.description,
            image,
        );
        document.locations.push(record.clone());
        fs::write(&self.document_path, document.to_json()?)?;

        tracing::info!(
            "Added marker {:?} at ({}, {}), {} markers in {}",
            record.title,
            record.lat,
            record.lon,
            document.locations.len(),
            self.document_path.display()
        );
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MarkerError;

    fn create_test_store(dir: &Path, json: &str) -> MarkerStore {
        let path = dir.join("markers.json");
        fs::write(&path, json).unwrap();
        MarkerStore::new(path, AssetDirectory::new(dir.join("images")))
    }

    fn new_marker(lat: f64, lon: f64, title: &str) -> NewMarker {
        NewMarker {
            lat,
            lon,
            title: title.to_owned(),
            description: String::new(),
            image_source: None,
        }
    }

    #[test]
    fn test_load_returns_records_in_order() {
        let tmp = tempfile::tempdir().unwrap();
        let store = create_test_store(
            tmp.path(),
            r#"{"locations": [
                {"lat": 1.0, "lon": 2.0, "title": "first", "description": "", "image": ""},
                {"lat": 3.0, "lon": 4.0, "title": "second", "description": "d", "image": "b.png"}
            ]}"#,
        );

        let markers = store.load().unwrap();
        let titles: Vec<_> = markers.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, ["first", "second"]);
        assert_eq!(markers[1].image, "b.png");
    }

    #[test]
    fn test_load_missing_document_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let store = MarkerStore::new(tmp.path().join("absent.json"), AssetDirectory::new("images"));
        assert!(matches!(store.load(), Err(MarkerError::Io(_))));
    }

    #[test]
    fn test_load_malformed_document_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let store = create_test_store(tmp.path(), r#"{"locations": [}"#);
        assert!(matches!(store.load(), Err(MarkerError::Json(_))));
    }

    #[test]
    fn test_append_adds_one_record_at_the_end() {
        let tmp = tempfile::tempdir().unwrap();
        let store = create_test_store(
            tmp.path(),
            r#"{"locations": [{"lat": 1.0, "lon": 2.0, "title": "old", "description": "x", "image": ""}]}"#,
        );
        let before = store.load().unwrap();

        let record = store.append(new_marker(5.0, 6.0, "new")).unwrap();
        assert_eq!(record.image, "");

        let after = store.load().unwrap();
        assert_eq!(after.len(), 2);
        assert_eq!(after[0], before[0]);
        assert_eq!(after[1], record);
    }

    #[test]
    fn test_append_to_missing_document_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let store = MarkerStore::new(
            tmp.path().join("absent.json"),
            AssetDirectory::new(tmp.path().join("images")),
        );
        assert!(store.append(new_marker(1.0, 1.0, "a")).is_err());
        assert!(!store.document_path().exists());
    }

    #[test]
    fn test_failed_image_copy_leaves_document_untouched() {
        let tmp = tempfile::tempdir().unwrap();
        let original = r#"{"locations": []}"#;
        let store = create_test_store(tmp.path(), original);

        let mut marker = new_marker(1.0, 2.0, "with image");
        marker.image_source = Some(tmp.path().join("missing.png"));

        let err = store.append(marker).unwrap_err();
        assert!(err.is_image_error());
        assert_eq!(fs::read_to_string(store.document_path()).unwrap(), original);
    }
}
