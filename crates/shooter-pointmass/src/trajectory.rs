//! Fixed-window display trajectories.
//!
//! Two tracks over the same time grid:
//! - ideal: closed form, no air, `n(t) = Z_sh + V_n0·t − ½·g·t²`, `u(t) = V_u0·t`
//! - drag: explicit Euler with drag & Magnus lift at `dt = duration / steps`
//!
//! Both are clamped at ground level and never stop early. Sample `i` of the
//! drag track holds the state after `i + 1` steps and carries grid time `i`.
//!
//! Crossing markers are tolerance based: the first sample whose height lies
//! within `crossing_tolerance` of the target band. A track that jumps over the
//! window between two samples gets no marker.

use serde::{Deserialize, Serialize};
use shooter_aero::Launch;
use shooter_core::{project_to_field, Arena, FieldSample, PlaneSample, ShooterParameters};

use crate::Stepper;

/// Where a track first reaches the target band.
pub type CrossingPoint = PlaneSample;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryOptions {
    /// Simulated window [s]
    pub duration: f64,
    /// Samples in the window (also the number of Euler steps)
    pub steps: usize,
    /// Half-width of the crossing window [m]
    pub crossing_tolerance: f64,
}

impl Default for TrajectoryOptions {
    fn default() -> Self {
        Self { duration: 2.0, steps: 500, crossing_tolerance: 0.01 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryResult {
    pub ideal: Vec<PlaneSample>,
    pub ideal_crossing: Option<CrossingPoint>,
    pub drag: Vec<PlaneSample>,
    pub drag_crossing: Option<CrossingPoint>,
    pub ideal_field: Vec<FieldSample>,
    pub drag_field: Vec<FieldSample>,
}

impl TrajectoryResult {
    /// Highest sample of the drag track.
    pub fn apex(&self) -> Option<PlaneSample> {
        self.drag.iter().copied().reduce(|best, s| if s.n > best.n { s } else { best })
    }

    /// First drag sample after launch sitting on the ground.
    pub fn drag_landing(&self) -> Option<PlaneSample> {
        self.drag.iter().skip(1).copied().find(|s| s.n == 0.0)
    }

    /// First ideal sample after launch sitting on the ground.
    pub fn ideal_landing(&self) -> Option<PlaneSample> {
        self.ideal.iter().skip(1).copied().find(|s| s.n == 0.0)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct TrajectoryIntegrator {
    pub arena: Arena,
    pub options: TrajectoryOptions,
}

impl TrajectoryIntegrator {
    pub fn new(arena: Arena) -> Self {
        Self { arena, options: TrajectoryOptions::default() }
    }

    pub fn with_options(mut self, options: TrajectoryOptions) -> Self {
        self.options = options;
        self
    }

    pub fn compute(&self, params: &ShooterParameters) -> TrajectoryResult {
        let physics = &self.arena.physics;
        let band = self.arena.field.target_band_height();
        let tol = self.options.crossing_tolerance;
        let times = sample_times(self.options.duration, self.options.steps);

        // Ideal, closed form per sample
        let launch = Launch::from_params(params, physics);
        let g = physics.gravity;
        let ideal: Vec<PlaneSample> = times
            .iter()
            .map(|&t| PlaneSample {
                u: launch.v_u0 * t,
                n: (params.release_height + launch.v_n0 * t - 0.5 * g * t * t).max(0.0),
                t,
            })
            .collect();

        // Drag & lift, stepped
        let dt = self.options.duration / self.options.steps as f64;
        let drag: Vec<PlaneSample> = Stepper::new(params, physics, dt)
            .clamp_to_ground()
            .zip(&times)
            .map(|(step, &t)| PlaneSample { u: step.next.u, n: step.next.n, t })
            .collect();

        let ideal_crossing = first_crossing(&ideal, band, tol);
        let drag_crossing = first_crossing(&drag, band, tol);
        let ideal_field = project_to_field(&ideal, params.pos_x, params.pos_y, params.heading);
        let drag_field = project_to_field(&drag, params.pos_x, params.pos_y, params.heading);

        TrajectoryResult { ideal, ideal_crossing, drag, drag_crossing, ideal_field, drag_field }
    }
}

/// Display trajectories with the standard window.
pub fn compute_trajectories(params: &ShooterParameters, arena: &Arena) -> TrajectoryResult {
    TrajectoryIntegrator::new(*arena).compute(params)
}

/* ------------------------------- internals ------------------------------- */

// `steps` evenly spaced times from 0 to `duration`, both ends included.
fn sample_times(duration: f64, steps: usize) -> Vec<f64> {
    match steps {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => {
            let last = (steps - 1) as f64;
            let mut out: Vec<f64> = (0..steps).map(|i| duration * i as f64 / last).collect();
            out[steps - 1] = duration;
            out
        }
    }
}

fn first_crossing(samples: &[PlaneSample], band: f64, tol: f64) -> Option<CrossingPoint> {
    samples.iter().copied().find(|s| (s.n - band).abs() < tol)
}

/* ----------------------------------- tests ---------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::base_params;
    use approx::assert_abs_diff_eq;
    use shooter_core::{project_point, surface_speed};

    fn run(params: &ShooterParameters) -> TrajectoryResult {
        compute_trajectories(params, &Arena::standard())
    }

    // RPM that gives a vertical launch speed `v_n0` at `angle_deg`.
    fn rpm_for_vertical_speed(v_n0: f64, angle_deg: f64, base: &ShooterParameters) -> f64 {
        let phys = Arena::standard().physics;
        let ball_speed = v_n0 / angle_deg.to_radians().sin();
        let per_rpm = surface_speed(1.0, phys.flywheel_radius) * base.roll_efficiency;
        ball_speed / per_rpm
    }

    #[test]
    fn grid_spans_the_window() {
        let r = run(&base_params());
        for seq in [&r.ideal, &r.drag] {
            assert_eq!(seq.len(), 500);
            assert_eq!(seq[0].t, 0.0);
            assert_eq!(seq[499].t, 2.0);
            assert!(seq.windows(2).all(|w| w[1].t >= w[0].t));
        }
    }

    #[test]
    fn no_sample_below_ground() {
        let p = ShooterParameters { drag_coefficient: 0.6, lift_coefficient: 0.3, ..base_params() };
        let r = run(&p);
        assert!(r.ideal.iter().chain(&r.drag).all(|s| s.n >= 0.0));
        assert!(r.ideal_field.iter().chain(&r.drag_field).all(|s| s.z >= 0.0));
    }

    #[test]
    fn zero_drag_track_follows_closed_form() {
        let r = run(&base_params());
        for (i, d) in r.ideal.iter().zip(&r.drag) {
            assert_abs_diff_eq!(i.u, d.u, epsilon = 0.1);
            assert_abs_diff_eq!(i.n, d.n, epsilon = 0.1);
        }
    }

    #[test]
    fn ideal_lands_at_analytic_time() {
        let p = base_params();
        let arena = Arena::standard();
        let l = Launch::from_params(&p, &arena.physics);
        let g = arena.physics.gravity;
        let step_width = 2.0 / 499.0;

        let t_land = (l.v_n0 + (l.v_n0 * l.v_n0 + 2.0 * g * p.release_height).sqrt()) / g;
        let landing = run(&p).ideal_landing().unwrap();
        assert!(landing.t >= t_land);
        assert!(landing.t - t_land < step_width);

        // launched from the floor it comes back at 2·V_n0/g
        let flat = ShooterParameters { release_height: 0.0, ..p };
        let landing = run(&flat).ideal_landing().unwrap();
        let t_flat = 2.0 * l.v_n0 / g;
        assert!((landing.t - t_flat).abs() < step_width);
    }

    #[test]
    fn drag_shortens_the_flight() {
        let ideal = run(&base_params()).ideal_landing().unwrap();
        let dragged = run(&ShooterParameters { drag_coefficient: 0.6, ..base_params() }).drag_landing().unwrap();
        assert!(dragged.u < ideal.u);
    }

    #[test]
    fn low_shot_gets_no_marker() {
        // apex ≈ 1.5 m, under the 1.97 m band
        let r = run(&base_params());
        assert!(r.ideal_crossing.is_none());
        assert!(r.drag_crossing.is_none());
    }

    #[test]
    fn marker_is_first_sample_inside_window() {
        let band = Arena::standard().field.target_band_height();
        let base = base_params();
        // apex 5 cm above the band: the ball is slow there, so the window is hit
        let v_n0 = (2.0 * 9.81 * (band + 0.05 - base.release_height)).sqrt();
        let p = ShooterParameters {
            launch_angle: 80f64.to_radians(),
            flywheel_rpm: rpm_for_vertical_speed(v_n0, 80.0, &base),
            ..base
        };
        let r = run(&p);

        for (seq, marker) in [(&r.ideal, r.ideal_crossing), (&r.drag, r.drag_crossing)] {
            let m = marker.expect("apex above band must produce a marker");
            assert!((m.n - band).abs() < 0.01);
            let first = seq.iter().position(|s| (s.n - band).abs() < 0.01).unwrap();
            assert_eq!(seq[first], m);
        }
    }

    #[test]
    fn field_tracks_are_projections() {
        let p = ShooterParameters { heading: 0.7, ..base_params() };
        let r = run(&p);
        for (s, f) in r.drag.iter().zip(&r.drag_field) {
            let q = project_point(s.u, s.n, p.pos_x, p.pos_y, p.heading);
            assert_eq!((f.x, f.y, f.z, f.t), (q.x, q.y, q.z, s.t));
        }
    }

    #[test]
    fn apex_is_highest_drag_sample() {
        let r = run(&ShooterParameters { drag_coefficient: 0.6, ..base_params() });
        let apex = r.apex().unwrap();
        assert!(r.drag.iter().all(|s| s.n <= apex.n));
    }

    #[test]
    fn sample_times_edges() {
        assert!(sample_times(2.0, 0).is_empty());
        assert_eq!(sample_times(2.0, 1), vec![0.0]);
        assert_eq!(sample_times(2.0, 3), vec![0.0, 1.0, 2.0]);
    }
}
