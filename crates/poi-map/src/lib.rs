//! POI Map - Application Library
//!
//! The desktop application around [`poi_map_lib`]: a tile map with the stored
//! markers, a sidebar form for new markers and the entry point that wires
//! logging and the eframe window together.

mod app;
mod entrypoints;

pub use app::PoiMapApp;
pub use entrypoints::native_main;
