//! Tile file naming.
//!
//! A template is a relative path without extension in which `%z`, `%x` and
//! `%y` stand for the zoom and tile indices, e.g. `tiles/%z/%x-%y`.

use std::fmt;
use std::path::{Path, PathBuf};

use tiler_common::{TileCoord, TilerError, TilerResult};

pub const DEFAULT_TILE_URL_TEMPLATE: &str = "tiles/%z/%x-%y";

const TOKENS: [&str; 3] = ["%z", "%x", "%y"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileUrlTemplate {
    raw: String,
}

impl Default for TileUrlTemplate {
    fn default() -> Self {
        Self {
            raw: DEFAULT_TILE_URL_TEMPLATE.to_string(),
        }
    }
}

impl TileUrlTemplate {
    /// Validate and wrap a template string.
    pub fn parse(raw: &str) -> TilerResult<Self> {
        let missing: Vec<&str> = TOKENS.iter().copied().filter(|t| !raw.contains(t)).collect();
        if !missing.is_empty() {
            return Err(TilerError::invalid_config(
                "tileUrlTemplate",
                format!("'{}' is missing {}", raw, missing.join(", ")),
            ));
        }

        if let Some(joined) = unseparated_tokens(raw) {
            return Err(TilerError::invalid_config(
                "tileUrlTemplate",
                format!("'{}' needs a non-digit separator in '{}'", raw, joined),
            ));
        }

        if raw.starts_with('/') || raw.split('/').any(|part| part == "..") {
            return Err(TilerError::invalid_config(
                "tileUrlTemplate",
                format!("'{}' must be a relative path inside the output directory", raw),
            ));
        }

        Ok(Self {
            raw: raw.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Template with the indices of `coord` filled in.
    pub fn expand(&self, coord: TileCoord) -> String {
        self.raw
            .replace("%z", &coord.z.to_string())
            .replace("%x", &coord.x.to_string())
            .replace("%y", &coord.y.to_string())
    }

    /// File path of a tile below `output`.
    pub fn tile_path(&self, output: &Path, coord: TileCoord, extension: &str) -> PathBuf {
        output.join(format!("{}.{}", self.expand(coord), extension))
    }

    /// Directory shared by all tiles of `zoom`: the directory part of the
    /// template up to the first component that depends on `x` or `y`.
    pub fn zoom_dir(&self, output: &Path, zoom: u32) -> PathBuf {
        let mut dir = output.to_path_buf();
        for part in self.dir_parts() {
            if part.contains("%x") || part.contains("%y") {
                break;
            }
            dir.push(part.replace("%z", &zoom.to_string()));
        }
        dir
    }

    /// True when tiles of one zoom are spread over several directories.
    pub fn has_tile_dirs(&self) -> bool {
        self.dir_parts()
            .any(|part| part.contains("%x") || part.contains("%y"))
    }

    /// Template in the `{z}/{x}/{y}` form used by web map viewers.
    pub fn viewer_url(&self) -> String {
        self.raw
            .replace("%z", "{z}")
            .replace("%x", "{x}")
            .replace("%y", "{y}")
    }

    fn dir_parts(&self) -> impl Iterator<Item = &str> {
        let dir = self.raw.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("");
        dir.split('/').filter(|part| !part.is_empty() && *part != ".")
    }
}

/// First pair of neighbouring tokens with only digits (or nothing) between
/// them. Such a pair makes distinct tiles expand to the same name.
fn unseparated_tokens(raw: &str) -> Option<&str> {
    let mut positions: Vec<usize> = TOKENS
        .iter()
        .flat_map(|token| raw.match_indices(token).map(|(i, _)| i))
        .collect();
    positions.sort_unstable();

    positions.windows(2).find_map(|pair| {
        let between = &raw[pair[0] + 2..pair[1]];
        between
            .chars()
            .all(|c| c.is_ascii_digit())
            .then(|| &raw[pair[0]..pair[1] + 2])
    })
}

impl fmt::Display for TileUrlTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_template() {
        let template = TileUrlTemplate::default();
        let coord = TileCoord::new(3, 5, 2);

        assert_eq!(template.expand(coord), "tiles/3/5-2");
        assert_eq!(
            template.tile_path(Path::new("/out"), coord, "png"),
            PathBuf::from("/out/tiles/3/5-2.png")
        );
        assert_eq!(template.zoom_dir(Path::new("/out"), 3), PathBuf::from("/out/tiles/3"));
        assert!(!template.has_tile_dirs());
        assert_eq!(template.viewer_url(), "tiles/{z}/{x}-{y}");
    }

    #[test]
    fn test_nested_template() {
        let template = TileUrlTemplate::parse("%z/%x/%y").unwrap();
        assert_eq!(template.zoom_dir(Path::new("out"), 7), PathBuf::from("out/7"));
        assert!(template.has_tile_dirs());
    }

    #[test]
    fn test_flat_template() {
        let template = TileUrlTemplate::parse("%z_%x-%y").unwrap();
        assert_eq!(template.zoom_dir(Path::new("out"), 1), PathBuf::from("out"));
        assert_eq!(template.expand(TileCoord::new(1, 0, 1)), "1_0-1");
    }

    #[test]
    fn test_missing_tokens_rejected() {
        let err = TileUrlTemplate::parse("tiles/%z/%x").unwrap_err();
        assert!(err.to_string().contains("%y"));
        assert!(err.is_config_error());
    }

    #[test]
    fn test_escaping_paths_rejected() {
        assert!(TileUrlTemplate::parse("/abs/%z/%x-%y").is_err());
        assert!(TileUrlTemplate::parse("../%z/%x-%y").is_err());
    }

    #[test]
    fn test_joined_tokens_rejected() {
        // 4/1/12 and 4/11/2 would both become "4112".
        let err = TileUrlTemplate::parse("%z%x%y").unwrap_err();
        assert!(err.is_config_error());
        assert!(err.to_string().contains("%z%x"));

        assert!(TileUrlTemplate::parse("%z/%x0%y").is_err());
        assert!(TileUrlTemplate::parse("%z/%xa%y").is_ok());
    }
}
