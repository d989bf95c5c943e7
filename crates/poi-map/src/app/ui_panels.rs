//! UI panels for the application
//!
//! This module provides the sidebar with the new-marker form, the marker
//! pop-up, the help overlay and the native dialogs.

use crate::app::state::{AppState, Notice, NoticeLevel, TilesProvider};
use egui::{Color32, RichText, Ui};

/// Render the sidebar toggle button (overlaid on top-right of map)
pub fn sidebar_toggle_button(ui: &mut Ui, state: &mut AppState) {
    let button_size = egui::vec2(40.0, 40.0);
    let margin = 10.0;

    let rect = ui.max_rect();
    let button_pos = rect.right_top() + egui::vec2(-button_size.x - margin, margin);
    let button_rect = egui::Rect::from_min_size(button_pos, button_size);

    let response = ui.allocate_rect(button_rect, egui::Sense::click());
    if response.clicked() {
        state.ui_settings.sidebar_open = !state.ui_settings.sidebar_open;
    }

    let bg_color = if response.hovered() {
        ui.visuals().widgets.hovered.bg_fill
    } else {
        ui.visuals().widgets.inactive.bg_fill
    };
    ui.painter().rect_filled(button_rect, 5.0, bg_color);

    let icon = if state.ui_settings.sidebar_open {
        "✕"
    } else {
        "☰"
    };
    ui.painter().text(
        button_rect.center(),
        egui::Align2::CENTER_CENTER,
        icon,
        egui::FontId::proportional(20.0),
        ui.visuals().text_color(),
    );
}

/// Render the sidebar with the marker form and map options
pub fn render_sidebar(ctx: &egui::Context, state: &mut AppState) {
    if !state.ui_settings.sidebar_open {
        return;
    }

    egui::SidePanel::right("main_sidebar")
        .default_width(320.0)
        .min_width(260.0)
        .max_width(450.0)
        .resizable(true)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    render_form_section(ui, state);

                    ui.add_space(8.0);
                    ui.separator();
                    render_markers_section(ui, state);

                    ui.add_space(8.0);
                    ui.separator();
                    render_map_section(ui, state);
                });
        });
}

/// Toggle button and, when open, the new-marker form
fn render_form_section(ui: &mut Ui, state: &mut AppState) {
    if ui
        .add_sized(
            [ui.available_width(), 28.0],
            egui::Button::new(state.form.toggle_label()),
        )
        .clicked()
    {
        state.form.toggle();
    }

    if !state.form.visible {
        return;
    }

    ui.add_space(8.0);
    ui.label(
        RichText::new("Click the map to fill in the coordinates")
            .small()
            .weak(),
    );
    ui.add_space(4.0);

    egui::Grid::new("marker_form_grid")
        .num_columns(2)
        .spacing([12.0, 6.0])
        .show(ui, |ui| {
            ui.label("Latitude:");
            ui.text_edit_singleline(&mut state.form.latitude);
            ui.end_row();

            ui.label("Longitude:");
            ui.text_edit_singleline(&mut state.form.longitude);
            ui.end_row();

            ui.label("Title:");
            ui.text_edit_singleline(&mut state.form.title);
            ui.end_row();

            ui.label("Description:");
            ui.text_edit_singleline(&mut state.form.description);
            ui.end_row();

            ui.label("Image:");
            ui.text_edit_singleline(&mut state.form.image);
            ui.end_row();
        });

    ui.add_space(4.0);
    ui.horizontal(|ui| {
        if ui.button("🖼 Select Image...").clicked() {
            state.show_image_picker = true;
        }
        if ui.button("➕ Add Marker").clicked() {
            state.submit_form();
        }
    });
}

/// List of the markers loaded at startup
fn render_markers_section(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui| {
        ui.label(RichText::new(format!("📍 Markers ({})", state.markers.len())).strong());
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui
                .add_enabled(!state.markers.is_empty(), egui::Button::new("🎯 Fit"))
                .clicked()
            {
                state.pending_fit_bounds = true;
            }
        });
    });
    ui.add_space(4.0);

    if state.markers.is_empty() {
        ui.label(RichText::new("No markers loaded").italics().weak());
    } else {
        let mut to_select = None;
        egui::ScrollArea::vertical()
            .id_salt("markers_scroll")
            .max_height(220.0)
            .show(ui, |ui| {
                for (idx, marker) in state.markers.iter().enumerate() {
                    let title = if marker.title.is_empty() {
                        "(untitled)"
                    } else {
                        marker.title.as_str()
                    };
                    let selected = state.selected_marker == Some(idx);
                    if ui
                        .selectable_label(selected, RichText::new(title).small())
                        .on_hover_text(format!("{:.5}, {:.5}", marker.lat, marker.lon))
                        .clicked()
                    {
                        to_select = Some(idx);
                    }
                }
            });
        if let Some(idx) = to_select {
            state.selected_marker = Some(idx);
        }
    }

    ui.add_space(4.0);
    ui.label(
        RichText::new("New markers appear on the map after a restart")
            .small()
            .color(ui.visuals().warn_fg_color),
    );
}

/// Tile provider selection and the HTML map
fn render_map_section(ui: &mut Ui, state: &mut AppState) {
    ui.label(RichText::new("🗺 Map Tiles").strong());
    ui.add_space(6.0);

    for provider in TilesProvider::all() {
        let selected = state.ui_settings.tiles_provider == *provider;
        if ui.selectable_label(selected, provider.name()).clicked() {
            state.ui_settings.tiles_provider = *provider;
        }
    }

    ui.add_space(4.0);
    ui.label(
        RichText::new(state.ui_settings.tiles_provider.attribution())
            .small()
            .italics()
            .weak(),
    );

    ui.add_space(12.0);
    if ui.button("🌐 Open Map in Browser").clicked() {
        open_map_file(state);
    }
    ui.label(
        RichText::new(format!("{}", state.map_file.display()))
            .small()
            .weak(),
    );
}

fn open_map_file(state: &mut AppState) {
    if let Err(e) = open::that(&state.map_file) {
        tracing::warn!("Could not open {}: {}", state.map_file.display(), e);
        state.notices.push(Notice::warning(format!(
            "Could not open {}: {}",
            state.map_file.display(),
            e
        )));
    }
}

/// Pop-up for the selected marker: title, description and image
pub fn marker_popup(ctx: &egui::Context, state: &mut AppState) {
    let Some(idx) = state.selected_marker else {
        return;
    };
    let Some(marker) = state.markers.get(idx) else {
        state.selected_marker = None;
        return;
    };
    let image_path = state.marker_image_path(idx);

    let mut open = true;
    egui::Window::new("Marker")
        .id(egui::Id::new("marker_popup"))
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .max_width(300.0)
        .anchor(egui::Align2::LEFT_TOP, [12.0, 12.0])
        .show(ctx, |ui| {
            ui.heading(&marker.title);
            if !marker.description.is_empty() {
                ui.label(&marker.description);
            }
            if let Some(path) = image_path {
                ui.add_space(4.0);
                ui.add(
                    egui::Image::new(format!("file://{}", path.display()))
                        .max_width(200.0)
                        .alt_text(&marker.title),
                );
            }
            ui.add_space(4.0);
            ui.label(
                RichText::new(format!("{:.6}, {:.6}", marker.lat, marker.lon))
                    .small()
                    .weak(),
            );
        });

    if !open {
        state.selected_marker = None;
    }
}

/// Show the image file dialog
pub fn show_image_picker(state: &mut AppState) {
    if state.show_image_picker {
        state.show_image_picker = false;

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", &["png", "jpg", "jpeg", "gif"])
            .set_title("Select Image")
            .pick_file()
        {
            state.form.image = path.display().to_string();
        }
    }
}

/// Show queued notices as native message boxes, oldest first
pub fn show_notices(state: &mut AppState) {
    for notice in state.notices.drain(..) {
        let level = match notice.level {
            NoticeLevel::Info => rfd::MessageLevel::Info,
            NoticeLevel::Warning => rfd::MessageLevel::Warning,
        };
        rfd::MessageDialog::new()
            .set_level(level)
            .set_title(notice.title.as_str())
            .set_description(notice.message.as_str())
            .set_buttons(rfd::MessageButtons::Ok)
            .show();
    }
}

/// Help overlay
pub fn help_overlay(ctx: &egui::Context, show_help: &mut bool) {
    egui::Window::new("Help")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.heading("POI Map");
            ui.add_space(8.0);

            ui.label("Collect points of interest on an interactive map.");
            ui.add_space(12.0);

            ui.label(RichText::new("Adding Markers").strong());
            ui.label("• Click 'New Marker' in the sidebar");
            ui.label("• Click the map to fill in latitude and longitude");
            ui.label("• Add a title, description and optional image");
            ui.label("• New markers appear after restarting the application");
            ui.add_space(8.0);

            ui.label(RichText::new("Navigation").strong());
            ui.label("• Ctrl + Scroll wheel to zoom");
            ui.label("• Click and drag to pan");
            ui.label("• Click a marker to see its details");
            ui.add_space(8.0);

            ui.label(RichText::new("Keyboard Shortcuts").strong());
            ui.label("• F1 or Ctrl+H - Toggle this help");
            ui.add_space(12.0);

            if ui.button("Close").clicked() {
                *show_help = false;
            }
        });
}

/// Attribution text over the bottom of the map
pub fn attribution_label(ui: &Ui, text: &str) {
    let screen_rect = ui.max_rect();
    ui.painter().text(
        screen_rect.center_bottom() + egui::vec2(0.0, -5.0),
        egui::Align2::CENTER_BOTTOM,
        text,
        egui::FontId::proportional(10.0),
        Color32::from_black_alpha(180),
    );
}
