//! Application module
//!
//! This module provides the main application structure:
//! - Full-screen map view with the stored markers
//! - Toggleable sidebar with the new-marker form
//! - Click bridge from the map into the form's coordinate fields
//! - Native dialogs for errors and confirmations

mod plugin;
pub(crate) mod settings;
mod state;
mod ui_panels;

use crate::app::plugin::MarkerPlugin;
use crate::app::settings::Settings;
use crate::app::state::{AppState, TilesProvider};
use eframe::egui;
use poi_map_lib::ClickBridge;
use std::sync::Arc;
use tokio::sync::RwLock;
use walkers::{
    HttpTiles, Map, MapMemory, TileId,
    sources::{Attribution, OpenStreetMap, TileSource},
};

/// Custom OpenTopoMap tile source
pub struct OpenTopoMap;

impl TileSource for OpenTopoMap {
    fn tile_url(&self, tile_id: TileId) -> String {
        format!(
            "https://tile.opentopomap.org/{}/{}/{}.png",
            tile_id.zoom, tile_id.x, tile_id.y
        )
    }

    fn attribution(&self) -> Attribution {
        Attribution {
            text: "© OpenTopoMap (CC-BY-SA)",
            url: "https://opentopomap.org/",
            logo_light: None,
            logo_dark: None,
        }
    }

    fn max_zoom(&self) -> u8 {
        17 // OpenTopoMap has max zoom of 17
    }
}

/// Persisted settings (UI only, markers live in their own document)
#[derive(serde::Serialize, serde::Deserialize)]
struct PersistedSettings {
    sidebar_open: bool,
    tiles_provider: String,
}

/// Main application structure
pub struct PoiMapApp {
    /// Application state (markers, form, UI settings, etc.)
    state: AppState,

    /// Native side of the click bridge; the marker plugin holds the endpoint
    click_bridge: ClickBridge,

    /// Marker clicked on the map, written by the plugin
    clicked_marker: Arc<RwLock<Option<usize>>>,

    /// Map tiles provider (OpenStreetMap)
    tiles_osm: HttpTiles,

    /// Map tiles provider (OpenTopoMap)
    tiles_otm: HttpTiles,

    /// Map state (camera position, zoom, etc.)
    map_memory: MapMemory,

    /// Position the map starts at
    home: walkers::Position,

    /// Show help overlay
    show_help: bool,
}

impl PoiMapApp {
    /// Startup order: load markers, write the HTML map, set up the UI, wire the click bridge
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let cli_args = Settings::from_cli();

        let mut state = AppState::new(&cli_args);

        if cli_args.ignore_persisted {
            tracing::info!("Ignoring persisted state (--ignore-persisted flag)");
        } else if let Some(storage) = cc.storage {
            Self::restore_persisted_settings(storage, &mut state);
        }

        egui_extras::install_image_loaders(&cc.egui_ctx);

        let tiles_osm = HttpTiles::new(OpenStreetMap, cc.egui_ctx.clone());
        let tiles_otm = HttpTiles::new(OpenTopoMap, cc.egui_ctx.clone());

        let view = cli_args.map_view();
        let home = walkers::lat_lon(view.center_lat, view.center_lon);
        let mut map_memory = MapMemory::default();
        let _ = map_memory.set_zoom(view.zoom as f64);

        tracing::info!("Initialized with {} markers", state.markers.len());

        Self {
            state,
            click_bridge: ClickBridge::new(),
            clicked_marker: Arc::new(RwLock::new(None)),
            tiles_osm,
            tiles_otm,
            map_memory,
            home,
            show_help: false,
        }
    }

    fn restore_persisted_settings(storage: &dyn eframe::Storage, state: &mut AppState) {
        if let Some(json) = storage.get_string("persisted_settings")
            && !json.is_empty()
            && let Ok(settings) = serde_json::from_str::<PersistedSettings>(&json)
        {
            state.ui_settings.sidebar_open = settings.sidebar_open;
            state.ui_settings.tiles_provider = match settings.tiles_provider.as_str() {
                "OpenTopoMap" => TilesProvider::OpenTopoMap,
                _ => TilesProvider::OpenStreetMap,
            };
            tracing::info!("Restored UI settings");
        } else {
            tracing::info!("No persisted settings found, starting fresh");
        }
    }

    /// Fit the map view to the bounding box of the loaded markers
    fn fit_to_bounds(&mut self) {
        if let Some((min_lat, min_lon, max_lat, max_lon)) = self.state.markers_bounds() {
            let center_lat = (min_lat + max_lat) / 2.0;
            let center_lon = (min_lon + max_lon) / 2.0;

            let max_span = (max_lat - min_lat).abs().max((max_lon - min_lon).abs());

            let zoom = if max_span > 0.0 {
                let zoom_estimate = (4.0 * 360.0 / max_span).log2();
                (zoom_estimate - 0.5).clamp(1.0, 17.0)
            } else {
                14.0
            };

            self.map_memory
                .center_at(walkers::lat_lon(center_lat, center_lon));
            let _ = self.map_memory.set_zoom(zoom);

            tracing::trace!(
                "Zoomed to markers: ({:.4}, {:.4}) - ({:.4}, {:.4}), zoom: {:.1}",
                min_lat,
                min_lon,
                max_lat,
                max_lon,
                zoom
            );
        }
    }
}

#[profiling::all_functions]
impl eframe::App for PoiMapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.input(|i| {
            if i.key_pressed(egui::Key::F1) {
                self.show_help = !self.show_help;
            }
            if i.key_pressed(egui::Key::H) && i.modifiers.ctrl {
                self.show_help = !self.show_help;
            }
        });

        if self.state.pending_fit_bounds {
            self.state.pending_fit_bounds = false;
            self.fit_to_bounds();
        }

        if self.show_help {
            ui_panels::help_overlay(ctx, &mut self.show_help);
        }

        ui_panels::render_sidebar(ctx, &mut self.state);

        let markers = self.state.markers.clone();
        let endpoint = self.click_bridge.endpoint();
        let clicked_marker = self.clicked_marker.clone();
        let selected = self.state.selected_marker;
        let tiles_provider = self.state.ui_settings.tiles_provider;
        let home = self.home;

        // Central panel: Map view (full screen)
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                profiling::scope!("map_panel");

                let marker_plugin = MarkerPlugin::new(markers, endpoint, clicked_marker, selected);

                let tiles: &mut HttpTiles = match tiles_provider {
                    TilesProvider::OpenStreetMap => &mut self.tiles_osm,
                    TilesProvider::OpenTopoMap => &mut self.tiles_otm,
                };

                let map = Map::new(Some(tiles), &mut self.map_memory, home).with_plugin(marker_plugin);
                ui.add(map);

                ui_panels::sidebar_toggle_button(ui, &mut self.state);
                ui_panels::attribution_label(ui, tiles_provider.attribution());
            });

        // Clicks on empty map fill the form, clicks on a pin open its pop-up
        let delivered = self.click_bridge.deliver(&mut self.state.form);
        if delivered > 0 {
            tracing::trace!("Delivered {} map click(s) to the form", delivered);
        }
        if let Ok(mut clicked) = self.clicked_marker.try_write()
            && let Some(idx) = clicked.take()
        {
            self.state.selected_marker = Some(idx);
        }

        ui_panels::marker_popup(ctx, &mut self.state);

        ui_panels::show_image_picker(&mut self.state);
        ui_panels::show_notices(&mut self.state);
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let settings = PersistedSettings {
            sidebar_open: self.state.ui_settings.sidebar_open,
            tiles_provider: format!("{:?}", self.state.ui_settings.tiles_provider),
        };

        if let Ok(json) = serde_json::to_string(&settings) {
            storage.set_string("persisted_settings", json);
            tracing::debug!("Saved settings on exit");
        }
    }
}
