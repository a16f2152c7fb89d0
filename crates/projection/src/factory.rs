//! Projection factory.
//!
//! Builds projections by name, merging per-kind defaults, factory-wide
//! options and per-call options (later layers win).

use serde::{Deserialize, Serialize};
use tiler_common::{Bounds, CoordOrder, TilerError, TilerResult};
use tracing::debug;

use crate::mercator::WGS84_ECCENTRICITY;
use crate::{CartesianProjection, MercatorProjection, Projection, ProjectionKind};

/// Options understood by the projections. Unset fields fall through to the
/// next layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionOptions {
    pub coord_order: Option<CoordOrder>,
    /// Cartesian only: projected rectangle in `coord_order`.
    pub bounds: Option<Bounds>,
    /// Cartesian only: coordinate system scale.
    pub scale: Option<[f64; 2]>,
    /// Cartesian only: per planar axis wrap flags.
    pub cycled: Option<[bool; 2]>,
    /// Mercator only.
    pub eccentricity: Option<f64>,
}

impl ProjectionOptions {
    /// Overlay `other` on top of `self`.
    pub fn merge(&self, other: &ProjectionOptions) -> ProjectionOptions {
        ProjectionOptions {
            coord_order: other.coord_order.or(self.coord_order),
            bounds: other.bounds.or(self.bounds),
            scale: other.scale.or(self.scale),
            cycled: other.cycled.or(self.cycled),
            eccentricity: other.eccentricity.or(self.eccentricity),
        }
    }

    /// Built-in defaults of a projection kind.
    pub fn defaults_for(kind: ProjectionKind) -> ProjectionOptions {
        match kind {
            ProjectionKind::Cartesian => ProjectionOptions {
                scale: Some([1.0, 1.0]),
                cycled: Some([false, false]),
                ..Default::default()
            },
            ProjectionKind::SphericalMercator => ProjectionOptions {
                eccentricity: Some(0.0),
                ..Default::default()
            },
            ProjectionKind::Wgs84Mercator => ProjectionOptions {
                eccentricity: Some(WGS84_ECCENTRICITY),
                ..Default::default()
            },
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProjectionFactory {
    global: ProjectionOptions,
}

impl ProjectionFactory {
    pub fn new(global: ProjectionOptions) -> Self {
        Self { global }
    }

    /// Create a projection by configuration name.
    pub fn create(
        &self,
        name: &str,
        options: &ProjectionOptions,
    ) -> TilerResult<Box<dyn Projection>> {
        let kind: ProjectionKind = name.parse()?;
        self.create_kind(kind, options)
    }

    /// Create a projection of a known kind.
    pub fn create_kind(
        &self,
        kind: ProjectionKind,
        options: &ProjectionOptions,
    ) -> TilerResult<Box<dyn Projection>> {
        let opts = ProjectionOptions::defaults_for(kind)
            .merge(&self.global)
            .merge(options);
        let coord_order = opts.coord_order.unwrap_or_default();

        debug!(projection = %kind, coord_order = %coord_order, "Creating projection");

        match kind {
            ProjectionKind::Cartesian => {
                let bounds = opts.bounds.ok_or_else(|| {
                    TilerError::invalid_config("bounds", "cartesian projection requires bounds")
                })?;
                let projection = CartesianProjection::new(
                    bounds,
                    opts.scale.unwrap_or([1.0, 1.0]),
                    opts.cycled.unwrap_or([false, false]),
                    coord_order,
                )?;
                Ok(Box::new(projection))
            }
            ProjectionKind::SphericalMercator | ProjectionKind::Wgs84Mercator => {
                let e = opts.eccentricity.unwrap_or(0.0);
                if !(0.0..1.0).contains(&e) {
                    return Err(TilerError::invalid_config(
                        "eccentricity",
                        format!("must be in [0, 1), got {}", e),
                    ));
                }
                Ok(Box::new(MercatorProjection::with_eccentricity(e, coord_order)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_later_layer_wins() {
        let base = ProjectionOptions {
            coord_order: Some(CoordOrder::LatLong),
            scale: Some([2.0, 2.0]),
            ..Default::default()
        };
        let top = ProjectionOptions {
            coord_order: Some(CoordOrder::LongLat),
            ..Default::default()
        };

        let merged = base.merge(&top);
        assert_eq!(merged.coord_order, Some(CoordOrder::LongLat));
        assert_eq!(merged.scale, Some([2.0, 2.0]));
    }

    #[test]
    fn test_defaults_per_kind() {
        assert_eq!(
            ProjectionOptions::defaults_for(ProjectionKind::Wgs84Mercator).eccentricity,
            Some(WGS84_ECCENTRICITY)
        );
        assert_eq!(
            ProjectionOptions::defaults_for(ProjectionKind::Cartesian).scale,
            Some([1.0, 1.0])
        );
    }
}
