//! KML `GroundOverlay` input.
//!
//! An overlay names its image in `Icon/href` and places it with the
//! `north`, `south`, `east` and `west` edges of a `LatLonBox` (degrees).

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use tiler_common::{Bounds, CoordOrder};
use tracing::info;

/// Image and placement taken from a ground overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct GroundOverlay {
    pub href: String,
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl GroundOverlay {
    /// South-west to north-east corners in `order`. A west edge east of the
    /// east edge crosses the antimeridian.
    pub fn bounds(&self, order: CoordOrder) -> Bounds {
        Bounds::new(
            order.from_planar([self.west, self.south]),
            order.from_planar([self.east, self.north]),
        )
    }

    /// Image path, relative hrefs resolved against the KML file's directory.
    pub fn image_path(&self, kml_path: &Path) -> PathBuf {
        let href = Path::new(&self.href);
        match kml_path.parent() {
            Some(dir) if href.is_relative() => dir.join(href),
            _ => href.to_path_buf(),
        }
    }
}

/// Read the first complete ground overlay of a KML file.
pub fn load(path: &Path) -> Result<GroundOverlay> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read KML: {:?}", path))?;
    let overlay = parse_ground_overlay(&content)
        .with_context(|| format!("Failed to parse KML: {:?}", path))?;

    info!(
        path = %path.display(),
        href = %overlay.href,
        "Loaded ground overlay"
    );
    Ok(overlay)
}

#[derive(Debug, Default)]
struct OverlayFields {
    href: Option<String>,
    north: Option<f64>,
    south: Option<f64>,
    east: Option<f64>,
    west: Option<f64>,
}

impl OverlayFields {
    fn complete(&self) -> Option<GroundOverlay> {
        Some(GroundOverlay {
            href: self.href.clone()?,
            north: self.north?,
            south: self.south?,
            east: self.east?,
            west: self.west?,
        })
    }
}

fn read_field(fields: &mut OverlayFields, path: &[String], text: &str) -> Result<()> {
    let [.., parent, leaf] = path else {
        return Ok(());
    };

    if parent == "Icon" && leaf == "href" {
        fields.href = Some(text.to_string());
        return Ok(());
    }
    if parent != "LatLonBox" {
        return Ok(());
    }

    let slot = match leaf.as_str() {
        "north" => &mut fields.north,
        "south" => &mut fields.south,
        "east" => &mut fields.east,
        "west" => &mut fields.west,
        _ => return Ok(()),
    };
    let value: f64 = text
        .parse()
        .with_context(|| format!("LatLonBox {} is not a number: '{}'", leaf, text))?;
    *slot = Some(value);
    Ok(())
}

/// Parse the first `GroundOverlay` carrying both an icon and a `LatLonBox`.
pub fn parse_ground_overlay(xml: &str) -> Result<GroundOverlay> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut buf = Vec::new();
    // Local element names from the root down to the current element.
    let mut path: Vec<String> = Vec::new();
    let mut fields: Option<OverlayFields> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                if name == "GroundOverlay" {
                    fields = Some(OverlayFields::default());
                }
                path.push(name);
            }
            Ok(Event::Text(t)) => {
                if let Some(fields) = fields.as_mut() {
                    let text = t.unescape()?;
                    read_field(fields, &path, text.trim())?;
                }
            }
            Ok(Event::End(e)) => {
                path.pop();
                if e.local_name().as_ref() == b"GroundOverlay" {
                    if let Some(overlay) = fields.take().and_then(|f| f.complete()) {
                        return Ok(overlay);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(anyhow!(
                    "XML parsing error at position {}: {:?}",
                    reader.buffer_position(),
                    e
                ))
            }
            _ => {}
        }
        buf.clear();
    }

    Err(anyhow!("No GroundOverlay with Icon/href and LatLonBox found"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SITE_PLAN: &str = include_str!("../fixtures/overlay.kml");

    #[test]
    fn test_parse_skips_incomplete_overlays() {
        let overlay = parse_ground_overlay(SITE_PLAN).unwrap();
        assert_eq!(overlay.href, "blocks/block-L5-1-1.jpg");
        assert_eq!(overlay.north, 55.7602);
        assert_eq!(overlay.south, 55.7501);
        assert_eq!(overlay.east, 37.6308);
        assert_eq!(overlay.west, 37.6104);
    }

    #[test]
    fn test_bounds_follow_coord_order() {
        let overlay = parse_ground_overlay(SITE_PLAN).unwrap();

        let latlong = overlay.bounds(CoordOrder::LatLong);
        assert_eq!(latlong.lower(), [55.7501, 37.6104]);
        assert_eq!(latlong.upper(), [55.7602, 37.6308]);

        let longlat = overlay.bounds(CoordOrder::LongLat);
        assert_eq!(longlat.lower(), [37.6104, 55.7501]);
        assert_eq!(longlat.upper(), [37.6308, 55.7602]);
    }

    #[test]
    fn test_prefixed_elements() {
        let xml = r#"
<kml:kml xmlns:kml="http://www.opengis.net/kml/2.2">
  <kml:GroundOverlay>
    <kml:Icon><kml:href>/data/pacific.png</kml:href></kml:Icon>
    <kml:LatLonBox>
      <kml:north>10</kml:north><kml:south>-10</kml:south>
      <kml:east>-170</kml:east><kml:west>170</kml:west>
    </kml:LatLonBox>
  </kml:GroundOverlay>
</kml:kml>
        "#;

        let overlay = parse_ground_overlay(xml).unwrap();
        // West of east: the box crosses the antimeridian.
        assert_eq!(overlay.bounds(CoordOrder::LongLat).lower(), [170.0, -10.0]);
        assert_eq!(overlay.image_path(Path::new("/tmp/doc.kml")), PathBuf::from("/data/pacific.png"));
    }

    #[test]
    fn test_relative_href_resolves_next_to_kml() {
        let overlay = parse_ground_overlay(SITE_PLAN).unwrap();
        assert_eq!(
            overlay.image_path(Path::new("site/doc.kml")),
            PathBuf::from("site/blocks/block-L5-1-1.jpg")
        );
    }

    #[test]
    fn test_missing_overlay_is_an_error() {
        let err = parse_ground_overlay("<kml><Document/></kml>").unwrap_err();
        assert!(err.to_string().contains("No GroundOverlay"));
    }

    #[test]
    fn test_bad_edge_value_is_an_error() {
        let xml = "<kml><GroundOverlay><LatLonBox><north>far</north></LatLonBox></GroundOverlay></kml>";
        let err = parse_ground_overlay(xml).unwrap_err();
        assert!(err.to_string().contains("north"));
    }

    #[test]
    fn test_load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.kml");
        std::fs::write(&path, SITE_PLAN).unwrap();

        let overlay = load(&path).unwrap();
        assert_eq!(overlay.image_path(&path), dir.path().join("blocks/block-L5-1-1.jpg"));
    }
}
