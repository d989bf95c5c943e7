//! POI Map Library - Marker Storage and Map Surface Plumbing
//!
//! This library holds everything the POI Map application does besides drawing
//! widgets: the JSON-backed marker list, the image asset folder, the form that
//! turns text input into a new marker, the click bridge that carries map clicks
//! back into that form, and the HTML map artifact generated at startup.
//!
//! # Architecture
//!
//! - **[`MarkerRecord`]** / **[`MarkerDocument`]**: the on-disk data model
//! - **[`MarkerStore`]**: load and append-only read-modify-write of the document
//! - **[`AssetDirectory`]**: image import with skip-if-present semantics
//! - **[`MarkerForm`]**: text fields, visibility toggle and validation
//! - **[`ClickBridge`]**: one-directional channel from map clicks to the form
//! - **[`MapArtifact`]**: Leaflet page rendered from the marker list
//!
//! # Usage Example
//!
//! ```rust
//! use poi_map_lib::{AssetDirectory, ClickBridge, MarkerForm, MarkerStore};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! # let dir = std::env::temp_dir().join("poi-map-lib-doctest");
//! # std::fs::create_dir_all(&dir)?;
//! # std::fs::write(dir.join("markers.json"), r#"{"locations": []}"#)?;
//! let store = MarkerStore::new(dir.join("markers.json"), AssetDirectory::new(dir.join("images")));
//! let mut form = MarkerForm::default();
//!
//! // The map surface reports a click through its endpoint...
//! let mut bridge = ClickBridge::new();
//! bridge.endpoint().send_coordinates(10.5, 20.25);
//! // ...and the native side delivers it into the form.
//! bridge.deliver(&mut form);
//!
//! form.title = "A".to_owned();
//! let record = form.submit(&store)?;
//! assert_eq!(record.lat, 10.5);
//! # Ok(())
//! # }
//! ```

mod artifact;
mod assets;
mod bridge;
mod form;
mod marker;
mod store;

// Public API exports
pub use artifact::{BRIDGE_OBJECT_NAME, MapArtifact, MapView, TileLayer};
pub use assets::AssetDirectory;
pub use bridge::{BridgeEndpoint, ClickBridge, CoordinateSink};
pub use form::MarkerForm;
pub use marker::{CoordinateField, MarkerDocument, MarkerRecord, format_coordinate, parse_coordinate};
pub use store::{MarkerStore, NewMarker};

use std::path::PathBuf;

/// Error types for marker storage and rendering
#[derive(Debug, thiserror::Error)]
pub enum MarkerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed marker document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{field} must be a number, got {value:?}")]
    InvalidCoordinate {
        field: CoordinateField,
        value: String,
    },

    #[error("Invalid image path: {}", .0.display())]
    InvalidImagePath(PathBuf),

    #[error("Failed to copy {}: {source}", .path.display())]
    ImageCopy {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl MarkerError {
    /// Whether the error comes from the image import step
    pub fn is_image_error(&self) -> bool {
        matches!(self, Self::ImageCopy { .. } | Self::InvalidImagePath(_))
    }
}

pub type Result<T> = std::result::Result<T, MarkerError>;
