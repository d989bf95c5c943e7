//! Walkers plugin for drawing markers and reporting map clicks
//!
//! Clicking a marker selects it (its pop-up opens); clicking anywhere else on
//! the map sends the clicked coordinates through the click bridge.

use egui::{Color32, Pos2, Stroke};
use poi_map_lib::{BridgeEndpoint, MarkerRecord};
use std::sync::Arc;
use tokio::sync::RwLock;
use walkers::{Plugin, Projector};

/// Radius of a marker pin in pixels
const PIN_RADIUS: f32 = 7.0;

/// Clicks this close to a pin (in pixels) select the marker
const PICK_RADIUS: f32 = 12.0;

const PIN_COLOR: Color32 = Color32::from_rgb(220, 60, 50);
const SELECTED_PIN_COLOR: Color32 = Color32::from_rgb(250, 170, 30);

/// Plugin rendering the loaded markers on the map
pub struct MarkerPlugin {
    markers: Arc<Vec<MarkerRecord>>,
    /// Surface side of the click bridge
    endpoint: BridgeEndpoint,
    /// Marker clicked during this frame, read back by the app
    clicked_marker: Arc<RwLock<Option<usize>>>,
    /// Marker whose pop-up is currently open
    selected: Option<usize>,
}

impl MarkerPlugin {
    pub fn new(
        markers: Arc<Vec<MarkerRecord>>,
        endpoint: BridgeEndpoint,
        clicked_marker: Arc<RwLock<Option<usize>>>,
        selected: Option<usize>,
    ) -> Self {
        Self {
            markers,
            endpoint,
            clicked_marker,
            selected,
        }
    }

    fn draw_pin(&self, painter: &egui::Painter, pos: Pos2, selected: bool) {
        let color = if selected {
            SELECTED_PIN_COLOR
        } else {
            PIN_COLOR
        };
        painter.circle_filled(pos + egui::vec2(1.0, 1.5), PIN_RADIUS, Color32::from_black_alpha(80));
        painter.circle_filled(pos, PIN_RADIUS, color);
        painter.circle_stroke(pos, PIN_RADIUS, Stroke::new(2.0, Color32::WHITE));
    }

    fn draw_tooltip(painter: &egui::Painter, pos: Pos2, text: &str) {
        let galley = painter.layout_no_wrap(
            text.to_owned(),
            egui::FontId::proportional(13.0),
            Color32::WHITE,
        );
        let min = pos + egui::vec2(PIN_RADIUS + 6.0, -galley.size().y / 2.0);
        let rect = egui::Rect::from_min_size(min, galley.size()).expand(4.0);
        painter.rect_filled(rect, 4.0, Color32::from_black_alpha(200));
        painter.galley(min, galley, Color32::WHITE);
    }
}

impl Plugin for MarkerPlugin {
    fn run(
        self: Box<Self>,
        ui: &mut egui::Ui,
        response: &egui::Response,
        projector: &Projector,
        _map_memory: &walkers::MapMemory,
    ) {
        profiling::scope!("MarkerPlugin::run");

        let painter = ui.painter().with_clip_rect(response.rect);
        let hover_pos = response.hover_pos();
        let click_pos = if response.clicked() {
            response.interact_pointer_pos()
        } else {
            None
        };

        let mut hovered: Option<(f32, Pos2, &MarkerRecord)> = None;
        let mut picked: Option<(f32, usize)> = None;

        for (idx, marker) in self.markers.iter().enumerate() {
            let screen = projector
                .project(walkers::lat_lon(marker.lat, marker.lon))
                .to_pos2();
            if !response.rect.expand(PIN_RADIUS).contains(screen) {
                continue;
            }

            self.draw_pin(&painter, screen, self.selected == Some(idx));

            if let Some(hover) = hover_pos {
                let dist = screen.distance(hover);
                if dist < PICK_RADIUS && hovered.is_none_or(|(best, _, _)| dist < best) {
                    hovered = Some((dist, screen, marker));
                }
            }

            if let Some(click) = click_pos {
                let dist = screen.distance(click);
                if dist < PICK_RADIUS && picked.is_none_or(|(best, _)| dist < best) {
                    picked = Some((dist, idx));
                }
            }
        }

        if let Some((_, screen, marker)) = hovered
            && !marker.title.is_empty()
        {
            Self::draw_tooltip(&painter, screen, &marker.title);
        }

        match (picked, click_pos) {
            (Some((_, idx)), _) => {
                if let Ok(mut clicked) = self.clicked_marker.try_write() {
                    *clicked = Some(idx);
                }
            }
            (None, Some(click)) => {
                let position = projector.unproject(click.to_vec2());
                self.endpoint.send_coordinates(position.y(), position.x());
            }
            (None, None) => {}
        }
    }
}
