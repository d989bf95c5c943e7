#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

// The binary uses the library, not duplicate modules
use poi_map::{PoiMapApp, native_main};

fn main() {
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to start tokio runtime");

    rt.block_on(async {
        native_main("POI Map", |cc| Box::new(PoiMapApp::new(cc))).await;
    });
}
