use clap::Parser;
use poi_map_lib::{MapView, TileLayer};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
/// POI Map - An interactive map for collecting points of interest
pub struct Settings {
    /// Marker document to load on startup and append new markers to
    #[clap(short, long, value_name = "FILE", default_value = "markers.json")]
    pub markers: PathBuf,

    /// Directory marker images are copied into
    #[clap(short, long, value_name = "DIR", default_value = "images")]
    pub assets_dir: PathBuf,

    /// HTML map generated from the markers on startup
    #[clap(long, value_name = "FILE", default_value = "map.html")]
    pub map_file: PathBuf,

    /// Initial map center latitude
    #[clap(long, default_value = "55.751244", allow_hyphen_values = true)]
    pub center_lat: f64,

    /// Initial map center longitude
    #[clap(long, default_value = "37.618423", allow_hyphen_values = true)]
    pub center_lon: f64,

    /// Initial zoom level
    #[clap(long, default_value = "10")]
    pub zoom: u8,

    /// Ignore previously persisted state and start fresh
    #[clap(long, default_value = "false")]
    pub ignore_persisted: bool,
}

impl Settings {
    pub fn from_cli() -> Self {
        match Settings::try_parse() {
            Ok(args) => args,
            Err(e) => e.exit(),
        }
    }

    /// Camera and tiles for both the window map and the HTML map
    pub fn map_view(&self) -> MapView {
        MapView {
            center_lat: self.center_lat,
            center_lon: self.center_lon,
            zoom: self.zoom,
            tiles: TileLayer::open_street_map(),
        }
    }
}
