//! shooter-pointmass
//!
//! Point-mass flight of a spinning ball in the ballistic plane (u downrange,
//! n up), explicit Euler integration with a fixed step.
//! - `trajectory`: fixed-window display paths (closed-form ideal + drag/lift),
//!   with tolerance-based "reaches target height" markers.
//! - `events`: event-stopping runs (target distance reached, target height
//!   crossed after the apex) with a simulated-time budget.
//! - `optimize`: launch-angle sweep picking the angle that lands closest to
//!   the target height at a given distance.
//!
//! Maths per step (velocity first, then position with the new velocity):
//!   v ← v + a(v)·dt
//!   p ← p + v·dt
//! where `a` comes from `shooter_aero::ForceModel` (drag, Magnus lift, gravity).
//!
//! All three share the same [`Stepper`]; they differ only in step size, ground
//! handling and what ends the run.

use serde::{Deserialize, Serialize};
use shooter_aero::{ForceModel, Launch};
use shooter_core::{Physics, ShooterParameters};

pub mod events;
pub mod optimize;
pub mod trajectory;

pub use events::{DistanceHit, EventOptions, EventSimulator, ImpactKind, ImpactPoint};
pub use optimize::{AngleSweep, OptimalAngleResult, OptimalAngleSolver, SolveStatus};
pub use trajectory::{compute_trajectories, CrossingPoint, TrajectoryIntegrator, TrajectoryOptions, TrajectoryResult};

/// Ball state in the ballistic plane.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct State {
    pub t: f64,                 // time (s)
    pub u: f64, pub n: f64,     // position (m)
    pub v_u: f64, pub v_n: f64, // velocity (m/s)
}

impl State {
    /// Ball leaving the flywheel at the release height.
    pub fn at_release(params: &ShooterParameters, physics: &Physics) -> Self {
        let launch = Launch::from_params(params, physics);
        State { t: 0.0, u: 0.0, n: params.release_height, v_u: launch.v_u0, v_n: launch.v_n0 }
    }

    pub fn speed(&self) -> f64 {
        (self.v_u * self.v_u + self.v_n * self.v_n).sqrt()
    }
}

/// One integration step: the state before, the state after, and the speed
/// the forces were evaluated at (i.e. the speed of `prev`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Step {
    pub prev: State,
    pub next: State,
    pub speed: f64,
}

/// Endless explicit-Euler step iterator. Stop it with iterator adapters.
#[derive(Clone, Debug)]
pub struct Stepper {
    model: ForceModel,
    state: State,
    dt: f64,
    clamp_to_ground: bool,
}

impl Stepper {
    pub fn new(params: &ShooterParameters, physics: &Physics, dt: f64) -> Self {
        Stepper {
            model: ForceModel::new(params, physics),
            state: State::at_release(params, physics),
            dt,
            clamp_to_ground: false,
        }
    }

    /// Pin the height at zero whenever a step would take it below ground.
    /// Velocity is left alone, so the ball keeps sliding downrange.
    pub fn clamp_to_ground(mut self) -> Self {
        self.clamp_to_ground = true;
        self
    }
}

impl Iterator for Stepper {
    type Item = Step;

    fn next(&mut self) -> Option<Step> {
        let s = self.state;
        let dt = self.dt;
        let speed = s.speed();
        let (a_u, a_n) = self.model.acceleration(s.v_u, s.v_n);

        let v_u = s.v_u + dt * a_u;
        let v_n = s.v_n + dt * a_n;
        let mut next = State { t: s.t + dt, u: s.u + v_u * dt, n: s.n + v_n * dt, v_u, v_n };
        if self.clamp_to_ground && next.n < 0.0 {
            next.n = 0.0;
        }

        self.state = next;
        Some(Step { prev: s, next, speed })
    }
}

/* ----------------------------------- tests ---------------------------------- */

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    pub(crate) fn base_params() -> ShooterParameters {
        ShooterParameters {
            pos_x: 0.54,
            pos_y: 0.73,
            heading: 0.0,
            flywheel_rpm: 2750.0,
            launch_angle: 45f64.to_radians(),
            release_height: 0.15,
            drag_coefficient: 0.0,
            lift_coefficient: 0.0,
            roll_efficiency: 0.5,
        }
    }

    #[test]
    fn release_state_matches_launch() {
        let phys = Physics::standard();
        let s = State::at_release(&base_params(), &phys);
        assert_eq!(s.t, 0.0);
        assert_eq!(s.n, 0.15);
        assert_abs_diff_eq!(s.speed(), Launch::from_params(&base_params(), &phys).ball_speed, epsilon = 1e-12);
    }

    #[test]
    fn position_uses_updated_velocity() {
        let phys = Physics::standard();
        let dt = 0.01;
        let first = Stepper::new(&base_params(), &phys, dt).next().unwrap();
        let expected_vn = first.prev.v_n - 9.81 * dt;
        assert_abs_diff_eq!(first.next.v_n, expected_vn, epsilon = 1e-12);
        assert_abs_diff_eq!(first.next.n, first.prev.n + expected_vn * dt, epsilon = 1e-12);
        assert_abs_diff_eq!(first.next.t, dt, epsilon = 1e-15);
        assert_eq!(first.speed, first.prev.speed());
    }

    #[test]
    fn clamped_stepper_never_goes_below_ground() {
        let p = ShooterParameters { launch_angle: -0.3, ..base_params() };
        let steps: Vec<Step> = Stepper::new(&p, &Physics::standard(), 0.004).clamp_to_ground().take(300).collect();
        assert!(steps.iter().all(|s| s.next.n >= 0.0));
        // downrange keeps growing after contact
        assert!(steps[299].next.u > steps[200].next.u);
    }

    #[test]
    fn unclamped_stepper_falls_through() {
        let p = ShooterParameters { launch_angle: -0.3, ..base_params() };
        let last = Stepper::new(&p, &Physics::standard(), 0.004).take(300).last().unwrap();
        assert!(last.next.n < 0.0);
        assert!(last.next.n < last.prev.n);
    }
}
