//! Ballistic plane → field coordinates.
//!
//! The ballistic plane is the vertical plane through the launch point along the
//! robot heading: `u` downrange, `n` up. Projection is a rotation by the heading
//! plus the launch offset; height and time pass through unchanged.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// One sample in the ballistic plane.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlaneSample {
    /// Downrange distance [m]
    pub u: f64,
    /// Height [m]
    pub n: f64,
    /// Elapsed time [s]
    pub t: f64,
}

/// One sample in field coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldSample {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub t: f64,
}

impl FieldSample {
    pub fn position(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }
}

/// Project a single plane point `(u, n)` for a shooter at `(pos_x, pos_y)`
/// facing `heading` [rad].
#[inline]
pub fn project_point(u: f64, n: f64, pos_x: f64, pos_y: f64, heading: f64) -> Vector3<f64> {
    Vector3::new(pos_x + u * heading.cos(), pos_y + u * heading.sin(), n)
}

/// Project a whole sequence, element by element.
pub fn project_to_field(samples: &[PlaneSample], pos_x: f64, pos_y: f64, heading: f64) -> Vec<FieldSample> {
    samples
        .iter()
        .map(|s| {
            let p = project_point(s.u, s.n, pos_x, pos_y, heading);
            FieldSample { x: p.x, y: p.y, z: p.z, t: s.t }
        })
        .collect()
}
