//! Application state management
//!
//! This module owns the marker store, the markers loaded at startup, the
//! new-marker form and the queue of dialogs waiting to be shown.

use crate::app::settings::Settings;
use poi_map_lib::{AssetDirectory, MapArtifact, MarkerError, MarkerForm, MarkerRecord, MarkerStore};
use std::path::PathBuf;
use std::sync::Arc;

/// Main application state
pub struct AppState {
    /// Marker document and asset directory
    pub store: MarkerStore,

    /// Markers as loaded at startup; additions show up after a restart
    pub markers: Arc<Vec<MarkerRecord>>,

    /// New-marker form, filled by typing or by clicking the map
    pub form: MarkerForm,

    /// Current UI settings
    pub ui_settings: UiSettings,

    /// HTML map written at startup
    pub map_file: PathBuf,

    /// Marker whose pop-up is open
    pub selected_marker: Option<usize>,

    /// Dialogs waiting to be shown, oldest first
    pub notices: Vec<Notice>,

    /// Open the image file dialog on the next frame
    pub show_image_picker: bool,

    /// Zoom the map to the loaded markers on the next frame
    pub pending_fit_bounds: bool,
}

/// UI-specific settings that can be adjusted at runtime
#[derive(Clone)]
pub struct UiSettings {
    /// Map tiles provider
    pub tiles_provider: TilesProvider,

    /// Whether sidebar is open
    pub sidebar_open: bool,
}

/// Available map tile providers
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TilesProvider {
    OpenStreetMap,
    OpenTopoMap,
}

impl TilesProvider {
    pub fn attribution(&self) -> &'static str {
        match self {
            Self::OpenStreetMap => "© OpenStreetMap contributors",
            Self::OpenTopoMap => "© OpenTopoMap (CC-BY-SA)",
        }
    }

    pub fn all() -> &'static [Self] {
        &[Self::OpenStreetMap, Self::OpenTopoMap]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::OpenStreetMap => "OpenStreetMap",
            Self::OpenTopoMap => "OpenTopoMap",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NoticeLevel {
    Info,
    Warning,
}

/// A modal message for the user
#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            title: "Error".to_owned(),
            message: message.into(),
        }
    }
}

impl AppState {
    /// Load the markers and write the HTML map, in that order
    pub fn new(settings: &Settings) -> Self {
        let store = MarkerStore::new(
            settings.markers.clone(),
            AssetDirectory::new(settings.assets_dir.clone()),
        );

        let mut state = Self {
            store,
            markers: Arc::new(Vec::new()),
            form: MarkerForm::default(),
            ui_settings: UiSettings::default(),
            map_file: settings.map_file.clone(),
            selected_marker: None,
            notices: Vec::new(),
            show_image_picker: false,
            pending_fit_bounds: false,
        };

        state.load_markers();
        state.write_map_artifact(&MapArtifact::new(
            settings.map_view(),
            &settings.assets_dir,
        ));
        state
    }

    /// Read the marker document; on failure the map starts empty
    pub fn load_markers(&mut self) {
        match self.store.load() {
            Ok(markers) => self.markers = Arc::new(markers),
            Err(e) => {
                tracing::warn!(
                    "Failed to load markers from {}: {}",
                    self.store.document_path().display(),
                    e
                );
                self.markers = Arc::new(Vec::new());
                self.notices.push(Notice::warning(format!(
                    "Failed to load markers from {}: {}",
                    self.store.document_path().display(),
                    e
                )));
            }
        }
    }

    pub fn write_map_artifact(&mut self, artifact: &MapArtifact) {
        if let Err(e) = artifact.write(&self.markers, &self.map_file) {
            tracing::warn!("Failed to write {}: {}", self.map_file.display(), e);
            self.notices.push(Notice::warning(format!(
                "Failed to write the map to {}: {}",
                self.map_file.display(),
                e
            )));
        }
    }

    /// Validate the form and append the marker, queueing the outcome as a notice
    pub fn submit_form(&mut self) {
        profiling::scope!("submit_form");

        match self.form.submit(&self.store) {
            Ok(record) => {
                self.notices.push(Notice::info(
                    "Success",
                    format!(
                        "Marker '{}' added! Restart the application to see it on the map.",
                        record.title
                    ),
                ));
            }
            Err(e) => {
                tracing::warn!("Marker not added: {}", e);
                self.notices.push(Notice::warning(submit_error_message(&e)));
            }
        }
    }

    /// Stored image of a loaded marker, if it has one
    pub fn marker_image_path(&self, index: usize) -> Option<PathBuf> {
        let marker = self.markers.get(index)?;
        marker
            .has_image()
            .then(|| self.store.assets().path_of(&marker.image))
    }

    /// Bounding box of the loaded markers as (min_lat, min_lon, max_lat, max_lon)
    pub fn markers_bounds(&self) -> Option<(f64, f64, f64, f64)> {
        self.markers.iter().fold(None, |bounds, m| {
            Some(match bounds {
                None => (m.lat, m.lon, m.lat, m.lon),
                Some((min_lat, min_lon, max_lat, max_lon)) => (
                    min_lat.min(m.lat),
                    min_lon.min(m.lon),
                    max_lat.max(m.lat),
                    max_lon.max(m.lon),
                ),
            })
        })
    }
}

/// Text of the warning shown when a submission fails
fn submit_error_message(error: &MarkerError) -> String {
    match error {
        MarkerError::InvalidCoordinate { .. } => {
            "Latitude and longitude must be numeric values!".to_owned()
        }
        e if e.is_image_error() => format!("Failed to save the image: {e}"),
        e => format!("Failed to save the marker: {e}"),
    }
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            tiles_provider: TilesProvider::OpenStreetMap,
            sidebar_open: true,
        }
    }
}
