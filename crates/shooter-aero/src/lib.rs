//! shooter-aero
//!
//! Force law for a foam ball leaving a single-flywheel shooter.
//!
//! Launch (flywheel → ball):
//!   V_s  = (w/60) · 2π · R_w                 flywheel surface speed
//!   V_b0 = V_s · C_roll                       translational ball speed
//!   w_b  = V_s / R_b · (1 − C_roll)           residual ball spin [rad/s]
//!
//! In flight (per unit mass, ballistic plane u/n):
//!   a_drag = ½ C_D ρ A V² / m                 opposite to velocity
//!   a_lift = ½ ρ A R_b w_b V C_L / m          velocity rotated +90°
//!
//! Spin is constant over the flight (no decay model).

use std::f64::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};
use shooter_core::{surface_speed, Physics, ShooterParameters};

/// Initial ball state derived from the flywheel.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Launch {
    /// Flywheel surface speed [m/s]
    pub surface_speed: f64,
    /// Ball speed off the wheel [m/s]
    pub ball_speed: f64,
    /// Ball spin rate [rad/s]
    pub spin_rate: f64,
    /// Downrange velocity component [m/s]
    pub v_u0: f64,
    /// Vertical velocity component [m/s]
    pub v_n0: f64,
}

impl Launch {
    pub fn from_params(params: &ShooterParameters, physics: &Physics) -> Self {
        let v_s = surface_speed(params.flywheel_rpm, physics.flywheel_radius);
        let ball_speed = v_s * params.roll_efficiency;
        let spin_rate = v_s / physics.ball_radius * (1.0 - params.roll_efficiency);
        Self {
            surface_speed: v_s,
            ball_speed,
            spin_rate,
            v_u0: ball_speed * params.launch_angle.cos(),
            v_n0: ball_speed * params.launch_angle.sin(),
        }
    }
}

/// Drag deceleration magnitude [m/s²] at `speed`.
#[inline]
pub fn drag_deceleration(speed: f64, c_d: f64, physics: &Physics) -> f64 {
    let force = 0.5 * c_d * physics.air_density * physics.ball_area() * speed * speed;
    force / physics.ball_mass
}

/// Magnus lift acceleration magnitude [m/s²] at `speed` for spin `spin_rate`.
#[inline]
pub fn lift_acceleration(speed: f64, c_l: f64, spin_rate: f64, physics: &Physics) -> f64 {
    let force = 0.5 * physics.air_density * physics.ball_area() * physics.ball_radius * spin_rate * speed * c_l;
    force / physics.ball_mass
}

/// Everything needed to evaluate the acceleration of one shot.
#[derive(Clone, Copy, Debug)]
pub struct ForceModel {
    pub physics: Physics,
    pub drag_coefficient: f64,
    pub lift_coefficient: f64,
    pub spin_rate: f64,
}

impl ForceModel {
    pub fn new(params: &ShooterParameters, physics: &Physics) -> Self {
        Self {
            physics: *physics,
            drag_coefficient: params.drag_coefficient,
            lift_coefficient: params.lift_coefficient,
            spin_rate: Launch::from_params(params, physics).spin_rate,
        }
    }

    /// Total acceleration `(a_u, a_n)` including gravity.
    ///
    /// At exactly zero speed the heading is taken as 0 and both aerodynamic
    /// terms vanish, leaving gravity alone.
    pub fn acceleration(&self, v_u: f64, v_n: f64) -> (f64, f64) {
        let v = (v_u * v_u + v_n * v_n).sqrt();
        let (a_drag, a_lift, theta) = if v == 0.0 {
            (0.0, 0.0, 0.0)
        } else {
            (
                -drag_deceleration(v, self.drag_coefficient, &self.physics),
                lift_acceleration(v, self.lift_coefficient, self.spin_rate, &self.physics),
                v_n.atan2(v_u),
            )
        };

        let a_u = theta.cos() * a_drag + (theta + FRAC_PI_2).cos() * a_lift;
        let a_n = theta.sin() * a_drag + (theta + FRAC_PI_2).sin() * a_lift - self.physics.gravity;
        (a_u, a_n)
    }
}

/* -------------------------------- tests -------------------------------- */
