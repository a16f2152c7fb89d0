//! HTML preview page.
//!
//! A single self-contained page showing the rendered pyramid in a Leaflet
//! map. Values are substituted into `${name}` placeholders; unknown names are
//! replaced with the empty string.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Serialize;
use tracing::info;

use crate::error::RasterError;

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\{([^}]+)\}").unwrap_or_else(|e| panic!("invalid placeholder regex: {}", e))
});

const DEFAULT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>Tile layer preview</title>
    <meta http-equiv="Content-Type" content="text/html; charset=utf-8"/>
    <link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css"/>
    <script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
    <style type="text/css">
        html, body, #map {
            padding: 0;
            margin: 0;
            width: 100%;
            height: 100%;
        }
    </style>
</head>
<body>
    <div id="map"></div>
    <script type="text/javascript">
        // projection: ${projection}
        var map = L.map("map", {
            crs: L.CRS.${crs},
            minZoom: ${minZoom},
            maxZoom: ${maxZoom}
        });
        L.tileLayer("${tileUrlTemplate}.${tileType}", {
            minZoom: ${minZoom},
            maxZoom: ${maxZoom},
            noWrap: ${noWrap}
        }).addTo(map);
        map.fitWorld();
    </script>
</body>
</html>
"#;

/// Values shown on the preview page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageData {
    pub min_zoom: u32,
    pub max_zoom: u32,
    /// Tile URL relative to the page, with `{z}`, `{x}` and `{y}` tokens and
    /// without the extension.
    pub tile_url_template: String,
    /// Tile file extension.
    pub tile_type: String,
    /// Configuration name of the projection.
    pub projection: String,
}

impl PageData {
    /// Leaflet CRS matching the projection.
    fn crs(&self) -> &'static str {
        match self.projection.as_str() {
            "wgs84Mercator" => "EPSG3395",
            "cartesian" => "Simple",
            _ => "EPSG3857",
        }
    }

    fn values(&self) -> HashMap<&'static str, String> {
        HashMap::from([
            ("minZoom", self.min_zoom.to_string()),
            ("maxZoom", self.max_zoom.to_string()),
            ("tileUrlTemplate", self.tile_url_template.clone()),
            ("tileType", self.tile_type.clone()),
            ("projection", self.projection.clone()),
            ("crs", self.crs().to_string()),
            ("noWrap", (self.projection == "cartesian").to_string()),
        ])
    }
}

#[derive(Debug, Clone)]
pub struct PageRenderer {
    template: String,
}

impl Default for PageRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE)
    }
}

impl PageRenderer {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Substitute `values` into the template.
    pub fn build(&self, values: &HashMap<&str, String>) -> String {
        PLACEHOLDER
            .replace_all(&self.template, |caps: &Captures| {
                values.get(&caps[1]).cloned().unwrap_or_default()
            })
            .into_owned()
    }

    pub fn render(&self, data: &PageData) -> String {
        self.build(&data.values())
    }

    /// Render the page for `data` and write it to `path`.
    pub fn save(&self, path: &Path, data: &PageData) -> Result<(), RasterError> {
        fs::write(path, self.render(data)).map_err(|source| RasterError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "Wrote preview page");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(projection: &str) -> PageData {
        PageData {
            min_zoom: 0,
            max_zoom: 5,
            tile_url_template: "tiles/{z}/{x}-{y}".to_string(),
            tile_type: "png".to_string(),
            projection: projection.to_string(),
        }
    }

    #[test]
    fn test_build_substitutes_and_blanks_unknown() {
        let renderer = PageRenderer::new("[${a}|${missing}|${b}]");
        let values = HashMap::from([("a", "1".to_string()), ("b", "two".to_string())]);
        assert_eq!(renderer.build(&values), "[1||two]");
    }

    #[test]
    fn test_default_page() {
        let html = PageRenderer::default().render(&data("sphericalMercator"));
        assert!(html.contains("L.CRS.EPSG3857"));
        assert!(html.contains("\"tiles/{z}/{x}-{y}.png\""));
        assert!(html.contains("maxZoom: 5"));
        assert!(!html.contains("${"));
    }

    #[test]
    fn test_crs_per_projection() {
        assert_eq!(data("wgs84Mercator").crs(), "EPSG3395");
        assert_eq!(data("cartesian").crs(), "Simple");
    }
}
