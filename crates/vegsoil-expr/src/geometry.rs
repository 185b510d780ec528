//! Bounding-box regions in geographic coordinates.

use crate::encode::Node;
use crate::{ExprError, Result};
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box in degrees (EPSG:4326).
///
/// Regions are immutable once constructed. Use [`Region::CONUS`] for the
/// continental United States or [`Region::new`] for a validated custom box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RegionBounds")]
pub struct Region {
    west: f64,
    south: f64,
    east: f64,
    north: f64,
}

/// Unvalidated bounds as they appear in configuration files.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RegionBounds {
    west: f64,
    south: f64,
    east: f64,
    north: f64,
}

impl TryFrom<RegionBounds> for Region {
    type Error = ExprError;

    fn try_from(b: RegionBounds) -> Result<Self> {
        Region::new(b.west, b.south, b.east, b.north)
    }
}

impl Region {
    /// Continental United States.
    pub const CONUS: Region = Region {
        west: -125.48,
        south: 24.86,
        east: -65.93,
        north: 49.84,
    };

    /// Create a region from west, south, east and north bounds.
    ///
    /// Boxes crossing the antimeridian are not supported; `west` must be
    /// strictly less than `east`.
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Result<Self> {
        let invalid = |reason| ExprError::InvalidBounds {
            west,
            south,
            east,
            north,
            reason,
        };

        if ![west, south, east, north].iter().all(|v| v.is_finite()) {
            return Err(invalid("coordinates must be finite"));
        }
        if !(-180.0..=180.0).contains(&west) || !(-180.0..=180.0).contains(&east) {
            return Err(invalid("longitude outside [-180, 180]"));
        }
        if !(-90.0..=90.0).contains(&south) || !(-90.0..=90.0).contains(&north) {
            return Err(invalid("latitude outside [-90, 90]"));
        }
        if west >= east {
            return Err(invalid("west must be less than east"));
        }
        if south >= north {
            return Err(invalid("south must be less than north"));
        }

        Ok(Self {
            west,
            south,
            east,
            north,
        })
    }

    /// Western longitude.
    pub fn west(&self) -> f64 {
        self.west
    }

    /// Southern latitude.
    pub fn south(&self) -> f64 {
        self.south
    }

    /// Eastern longitude.
    pub fn east(&self) -> f64 {
        self.east
    }

    /// Northern latitude.
    pub fn north(&self) -> f64 {
        self.north
    }

    /// Bounds as `(west, south, east, north)`.
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        (self.west, self.south, self.east, self.north)
    }

    /// Server-side geometry constructor call for this box.
    pub fn to_node(&self) -> Node {
        Node::call(
            "GeometryConstructors.BBox",
            [
                ("west", Node::constant(self.west)),
                ("south", Node::constant(self.south)),
                ("east", Node::constant(self.east)),
                ("north", Node::constant(self.north)),
            ],
        )
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "bbox({}, {}, {}, {})",
            self.west, self.south, self.east, self.north
        )
    }
}
