//! Core shooter math utilities
//!
//! Includes:
//! - Units & conversions (inches, RPM, surface speed)
//! - Physical constants of the ball, flywheel and air
//! - Field & hub geometry
//! - Shooter parameter record (+ opt-in validation)
//! - Ballistic-plane → field projection
//! - JSON configuration load/save

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

pub mod config;
pub mod field;
pub mod params;
pub mod projection;

pub use config::{ConfigError, ShooterConfig, DEFAULT_CONFIG_FILE};
pub use field::FieldGeometry;
pub use params::{ParameterIssue, ShooterParameters};
pub use projection::{project_point, project_to_field, FieldSample, PlaneSample};

/// -------------------------
/// Units & Conversions
/// -------------------------

pub fn inches_to_m(inches: f64) -> f64 { inches * 2.54 / 100.0 }

/// Flywheel RPM → angular speed [rad/s]
pub fn rpm_to_rad_s(rpm: f64) -> f64 { rpm / 60.0 * 2.0 * PI }

/// Tangential (surface) speed [m/s] of a wheel of `radius_m` spinning at `rpm`.
pub fn surface_speed(rpm: f64, radius_m: f64) -> f64 {
    rpm_to_rad_s(rpm) * radius_m
}

/// -------------------------
/// Physical constants
/// -------------------------

/// Ball, flywheel and air properties. Fixed for the lifetime of the process.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Physics {
    /// Gravitational acceleration [m/s²]
    pub gravity: f64,
    /// Air density [kg/m³] at sea level
    pub air_density: f64,
    /// Ball mass [kg]
    pub ball_mass: f64,
    /// Ball radius [m]
    pub ball_radius: f64,
    /// Flywheel radius [m]
    pub flywheel_radius: f64,
}

impl Physics {
    /// Cargo ball (150 mm, 225 g) off a 2" flywheel.
    pub fn standard() -> Self {
        Self {
            gravity: 9.81,
            air_density: 1.2,
            ball_mass: 0.225,
            ball_radius: 0.15 / 2.0,
            flywheel_radius: inches_to_m(2.0),
        }
    }

    /// Ball cross-sectional area [m²]
    pub fn ball_area(&self) -> f64 {
        PI * self.ball_radius * self.ball_radius
    }
}

impl Default for Physics {
    fn default() -> Self { Self::standard() }
}

/// -------------------------
/// Arena
/// -------------------------

/// Everything fixed about the world a shot happens in. Build once, pass by
/// value (it is `Copy`) into every solver.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub physics: Physics,
    pub field: FieldGeometry,
}

impl Arena {
    pub fn standard() -> Self {
        Self { physics: Physics::standard(), field: FieldGeometry::rapid_react() }
    }
}

impl Default for Arena {
    fn default() -> Self { Self::standard() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn inch_conversion() {
        assert_abs_diff_eq!(inches_to_m(60.0), 1.524, epsilon = 1e-12);
        assert_abs_diff_eq!(inches_to_m(13.5), 0.3429, epsilon = 1e-12);
    }

    #[test]
    fn surface_speed_of_standard_flywheel() {
        // 2750 RPM on a 2" wheel ≈ 14.63 m/s
        let v = surface_speed(2750.0, Physics::standard().flywheel_radius);
        assert_abs_diff_eq!(v, 14.6294, epsilon = 1e-3);
        assert_abs_diff_eq!(v, 2750.0 / 60.0 * 2.0 * PI * 0.0508, epsilon = 1e-12);
    }

    #[test]
    fn ball_area_matches_radius() {
        let p = Physics::standard();
        assert_abs_diff_eq!(p.ball_area(), PI * 0.075 * 0.075, epsilon = 1e-15);
    }
}
