//! HTML map artifact
//!
//! A standalone Leaflet page rendered from the marker list at startup. Each
//! marker gets a tooltip and a pop-up with its title, description and image.
//! Clicks on the map are forwarded to `window.bridge.send_coordinates` when a
//! host has registered that object, so the page also opens in a plain browser.

use crate::marker::MarkerRecord;
use crate::Result;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// Name under which the click bridge is reachable from page script
pub const BRIDGE_OBJECT_NAME: &str = "bridge";

const LEAFLET_VERSION: &str = "1.9.4";
const POPUP_MAX_WIDTH: u32 = 300;
const POPUP_IMAGE_WIDTH: &str = "200px";

/// Raster tile layer shown under the markers
#[derive(Debug, Clone, PartialEq)]
pub struct TileLayer {
    /// URL template with `{z}`, `{x}` and `{y}` placeholders
    pub url: String,
    pub attribution: String,
    pub max_zoom: u8,
}

impl TileLayer {
    pub fn open_street_map() -> Self {
        Self {
            url: "https://tile.openstreetmap.org/{z}/{x}/{y}.png".to_owned(),
            attribution: "&copy; OpenStreetMap contributors".to_owned(),
            max_zoom: 19,
        }
    }
}

/// Initial camera and tiles of a rendered map
#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    pub center_lat: f64,
    pub center_lon: f64,
    pub zoom: u8,
    pub tiles: TileLayer,
}

impl Default for MapView {
    /// Moscow city centre, zoom 10
    fn default() -> Self {
        Self {
            center_lat: 55.751244,
            center_lon: 37.618423,
            zoom: 10,
            tiles: TileLayer::open_street_map(),
        }
    }
}

/// Renderer for the standalone HTML map
#[derive(Debug, Clone)]
pub struct MapArtifact {
    view: MapView,
    /// URL prefix of the asset directory, relative to the HTML file
    asset_href: String,
}

impl MapArtifact {
    pub fn new(view: MapView, asset_dir: &Path) -> Self {
        let asset_href = asset_dir
            .to_string_lossy()
            .replace('\\', "/")
            .trim_end_matches('/')
            .to_owned();
        Self { view, asset_href }
    }

    pub fn view(&self) -> &MapView {
        &self.view
    }

    /// Pop-up HTML for one marker
    pub fn popup_html(&self, marker: &MarkerRecord) -> String {
        let title = escape_html(&marker.title);
        let mut html = format!("<h3>{title}</h3><p>{}</p>", escape_html(&marker.description));
        if marker.has_image() {
            let _ = write!(
                html,
                r#"<img src="{}/{}" alt="{title}" width="{POPUP_IMAGE_WIDTH}">"#,
                escape_html(&self.asset_href),
                escape_html(&marker.image),
            );
        }
        html
    }

    /// Full HTML document with one Leaflet marker per record
    pub fn render(&self, markers: &[MarkerRecord]) -> String {
        profiling::scope!("MapArtifact::render");

        let view = &self.view;
        let mut html = String::with_capacity(2048 + markers.len() * 256);

        let _ = write!(
            html,
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>POI Map</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@{LEAFLET_VERSION}/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@{LEAFLET_VERSION}/dist/leaflet.js"></script>
<style>html, body, #map {{ height: 100%; margin: 0; }}</style>
</head>
<body>
<div id="map"></div>
<script>
var map = L.map('map').setView([{lat}, {lon}], {zoom});
L.tileLayer({url}, {{ attribution: {attribution}, maxZoom: {max_zoom} }}).addTo(map);
"#,
            lat = view.center_lat,
            lon = view.center_lon,
            zoom = view.zoom,
            url = js_string(&view.tiles.url),
            attribution = js_string(&view.tiles.attribution),
            max_zoom = view.tiles.max_zoom,
        );

        for marker in markers {
            let _ = write!(
                html,
                "L.marker([{}, {}]).bindPopup({}, {{ maxWidth: {POPUP_MAX_WIDTH} }})",
                marker.lat,
                marker.lon,
                js_string(&self.popup_html(marker)),
            );
            if !marker.title.is_empty() {
                let _ = write!(html, ".bindTooltip({})", js_string(&escape_html(&marker.title)));
            }
            html.push_str(".addTo(map);\n");
        }

        let _ = write!(
            html,
            r#"map.on('click', function (e) {{
    if (window.{BRIDGE_OBJECT_NAME}) {{
        window.{BRIDGE_OBJECT_NAME}.send_coordinates(e.latlng.lat, e.latlng.lng);
    }}
}});
</script>
</body>
</html>
"#
        );

        html
    }

    /// Render and write the page to `path`
    pub fn write(&self, markers: &[MarkerRecord], path: &Path) -> Result<()> {
        fs::write(path, self.render(markers))?;
        tracing::info!("Wrote map with {} markers to {}", markers.len(), path.display());
        Ok(())
    }
}

/// Escape text for HTML element content and quoted attributes
fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// JavaScript string literal that is safe inside a `<script>` block
fn js_string(text: &str) -> String {
    // A JSON string is a valid JS literal; `</` must not close the script element
    serde_json::Value::from(text)
        .to_string()
        .replace("</", r"<\/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_artifact() -> MapArtifact {
        MapArtifact::new(MapView::default(), Path::new("images"))
    }

    #[test]
    fn test_renders_one_marker_per_record() {
        let artifact = create_test_artifact();
        let markers: Vec<_> = (0..5)
            .map(|i| MarkerRecord::new(i as f64, -(i as f64), format!("m{i}"), "", ""))
            .collect();

        let html = artifact.render(&markers);
        assert_eq!(html.matches("L.marker(").count(), 5);
        assert!(html.contains("L.marker([3, -3])"));

        let empty = artifact.render(&[]);
        assert_eq!(empty.matches("L.marker(").count(), 0);
    }

    #[test]
    fn test_default_view() {
        let html = create_test_artifact().render(&[]);
        assert!(html.contains("setView([55.751244, 37.618423], 10)"));
        assert!(html.contains("https://tile.openstreetmap.org/{z}/{x}/{y}.png"));
    }

    #[test]
    fn test_click_is_forwarded_to_bridge() {
        let html = create_test_artifact().render(&[]);
        assert!(html.contains("window.bridge.send_coordinates(e.latlng.lat, e.latlng.lng)"));
        assert!(html.contains("if (window.bridge)"));
    }

    #[test]
    fn test_popup_contents() {
        let artifact = create_test_artifact();

        let with_image = MarkerRecord::new(1.0, 2.0, "Tower", "Tall", "tower.png");
        assert_eq!(
            artifact.popup_html(&with_image),
            r#"<h3>Tower</h3><p>Tall</p><img src="images/tower.png" alt="Tower" width="200px">"#
        );

        let without_image = MarkerRecord::new(1.0, 2.0, "Tower", "Tall", "");
        assert_eq!(artifact.popup_html(&without_image), "<h3>Tower</h3><p>Tall</p>");
    }

    #[test]
    fn test_user_text_is_escaped() {
        let artifact = create_test_artifact();
        let marker = MarkerRecord::new(0.0, 0.0, "<b>\"x\"</b>", "</script><script>alert(1)", "");

        let popup = artifact.popup_html(&marker);
        assert!(popup.contains("&lt;b&gt;&quot;x&quot;&lt;/b&gt;"));

        let html = artifact.render(&[marker]);
        assert_eq!(html.matches("</script>").count(), 2);
    }

    #[test]
    fn test_asset_href_uses_forward_slashes() {
        let artifact = MapArtifact::new(MapView::default(), Path::new("data").join("img").as_path());
        let marker = MarkerRecord::new(0.0, 0.0, "", "", "a.jpg");
        assert!(artifact.popup_html(&marker).contains(r#"src="data/img/a.jpg""#));
    }

    #[test]
    fn test_write_creates_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("map.html");
        let markers = vec![MarkerRecord::new(1.0, 2.0, "a", "", "")];

        create_test_artifact().write(&markers, &path).unwrap();
        let html = fs::read_to_string(&path).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert_eq!(html.matches("L.marker(").count(), 1);
    }
}
