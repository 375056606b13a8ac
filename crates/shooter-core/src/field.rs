//! Field & hub geometry (FRC 2022 "Rapid React" half field).
//!
//! Conventions:
//! - Field frame: x along the field length, y across it, z up; origin at the
//!   alliance wall corner.
//! - The hub sits just past the far end of the modelled area, centred across
//!   the field width. Its scoring funnel is a cone between the hub base height
//!   and the rim top, opening from the inner to the outer ring radius.
//!
//! `hub_radius_at` and `end_of_hub` are drawing helpers for field plots; the
//! solvers only need the heights and the hub centre.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::inches_to_m;

/// Fixed lengths & radii [m].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldGeometry {
    /// Field length (x)
    pub length: f64,
    /// Field width (y)
    pub width: f64,
    /// Hub footprint width
    pub hub_width: f64,
    /// Hub base height (top of the post)
    pub hub_base_height: f64,
    /// Upper rim height above the base
    pub hub_rim_height: f64,
    /// Field wall height
    pub wall_height: f64,
    /// Inner ring radius (bottom of the funnel)
    pub hub_inner_radius: f64,
    /// Outer ring radius (top of the funnel)
    pub hub_outer_radius: f64,
    /// Clearance above the rim the ball should pass through
    pub target_zone_tolerance: f64,
}

impl FieldGeometry {
    pub fn rapid_react() -> Self {
        Self {
            length: inches_to_m(158.611),
            width: inches_to_m(318.188),
            hub_width: inches_to_m(60.0),
            hub_base_height: inches_to_m(60.0),
            hub_rim_height: inches_to_m(13.5),
            wall_height: inches_to_m(20.0),
            hub_inner_radius: inches_to_m(25.0 / 2.0),
            hub_outer_radius: inches_to_m(45.0 / 2.0),
            target_zone_tolerance: 0.1,
        }
    }

    /// Height of the rim top (base + rim).
    pub fn rim_height(&self) -> f64 {
        self.hub_base_height + self.hub_rim_height
    }

    /// Height the ball is aimed through: rim top plus the zone tolerance.
    pub fn target_band_height(&self) -> f64 {
        self.rim_height() + self.target_zone_tolerance
    }

    /// Hub centre on the floor plane.
    pub fn hub_center(&self) -> Vector2<f64> {
        Vector2::new(self.length + self.hub_width / 2.0, self.width / 2.0)
    }

    /// Radius of the hub funnel at height `z`, or `None` outside the funnel.
    pub fn hub_radius_at(&self, z: f64) -> Option<f64> {
        if z < self.hub_base_height || z > self.rim_height() {
            return None;
        }
        let slope = (self.hub_outer_radius - self.hub_inner_radius) / self.hub_rim_height;
        Some(self.hub_inner_radius + slope * (z - self.hub_base_height))
    }

    /// Downrange distance of the far hub edge for a ball crossing the band at `u`.
    pub fn end_of_hub(&self, u: f64) -> f64 {
        u + 2.0 * self.hub_outer_radius
    }
}

impl Default for FieldGeometry {
    fn default() -> Self { Self::rapid_react() }
}
