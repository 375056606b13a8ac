//! shooter-dispersion
//!
//! Where does the ball come down if the launch angle and flywheel speed are a
//! little off? A `grid × grid` lattice of perturbations (angle offsets evenly
//! spaced over ±angle variance [deg], speed offsets over ±speed variance [%],
//! applied as `w·(1 + offset/100)`) is flown with the event simulator down to
//! the target band (or the floor), projected from the *unperturbed* launch pose,
//! and summarised:
//!   - centre: per-axis mean of the impact points
//!   - radius: largest floor-plane distance from the centre
//!   - probability: % of points inside the outer hub ring and within the
//!     height window of the rim
//!   - in_target: the same test applied to the centre alone
//!
//! The lattice is deterministic (no RNG); duplicate offsets simply repeat.

use nalgebra::Vector3;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use shooter_core::{project_point, Arena, ShooterParameters};
use shooter_pointmass::EventSimulator;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImpactZone {
    /// Mean impact point (field frame) [m]
    pub center: Vector3<f64>,
    /// Max floor-plane distance of any point from the centre [m]
    pub radius: f64,
    /// Every collected impact point, lattice order
    pub points: Vec<Vector3<f64>>,
    /// Centre lies inside the hub ring and height window
    pub in_target: bool,
    /// Share of points that would score [%]
    pub target_probability: f64,
    /// Highest impact point [m]
    pub max_height: f64,
}

impl ImpactZone {
    /// Nothing landed: collapse onto the launch position.
    fn empty(params: &ShooterParameters) -> Self {
        ImpactZone {
            center: Vector3::new(params.pos_x, params.pos_y, 0.0),
            radius: 0.0,
            points: Vec::new(),
            in_target: false,
            target_probability: 0.0,
            max_height: 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ImpactZoneEstimator {
    pub simulator: EventSimulator,
    /// Offsets per axis
    pub grid: usize,
    /// Allowed |z − rim height| for a point to score [m]
    pub height_window: f64,
}

impl ImpactZoneEstimator {
    pub fn new(arena: Arena) -> Self {
        Self { simulator: EventSimulator::new(arena), grid: 5, height_window: 0.3 }
    }

    pub fn estimate(&self, params: &ShooterParameters, angle_variance_deg: f64, speed_variance_pct: f64) -> ImpactZone {
        let angle_offsets = linspace(-angle_variance_deg, angle_variance_deg, self.grid);
        let speed_offsets = linspace(-speed_variance_pct, speed_variance_pct, self.grid);

        let variants: Vec<ShooterParameters> = angle_offsets
            .iter()
            .flat_map(|&da| {
                speed_offsets.iter().map(move |&dw| {
                    params
                        .with_launch_angle(params.launch_angle + da.to_radians())
                        .with_flywheel_rpm(params.flywheel_rpm * (1.0 + dw / 100.0))
                })
            })
            .collect();

        let points: Vec<Vector3<f64>> = variants
            .par_iter()
            .filter_map(|v| self.simulator.stop_at_height_after_apex(v))
            .map(|imp| project_point(imp.distance, imp.height, params.pos_x, params.pos_y, params.heading))
            .collect();

        log::debug!("impact zone: {} of {} variants landed", points.len(), variants.len());
        if points.is_empty() {
            return ImpactZone::empty(params);
        }

        let center = points.iter().sum::<Vector3<f64>>() / points.len() as f64;
        let radius = points
            .iter()
            .map(|p| (p.xy() - center.xy()).norm())
            .fold(0.0, f64::max);
        let max_height = points.iter().map(|p| p.z).fold(f64::NEG_INFINITY, f64::max);

        let scoring = points.iter().filter(|p| self.scores(p)).count();
        let target_probability = scoring as f64 / points.len() as f64 * 100.0;

        ImpactZone {
            center,
            radius,
            in_target: self.scores(&center),
            points,
            target_probability,
            max_height,
        }
    }

    // Inside the outer ring on the floor plane and near the rim in height.
    fn scores(&self, p: &Vector3<f64>) -> bool {
        let field = &self.simulator.arena.field;
        let dist_to_hub = (p.xy() - field.hub_center()).norm();
        dist_to_hub < field.hub_outer_radius && (p.z - field.rim_height()).abs() < self.height_window
    }
}

/* ------------------------------- internals ------------------------------- */

// `n` evenly spaced values from `lo` to `hi`, both ends included.
fn linspace(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![lo],
        _ => {
            let step = (hi - lo) / (n - 1) as f64;
            let mut out: Vec<f64> = (0..n).map(|i| lo + step * i as f64).collect();
            out[n - 1] = hi;
            out
        }
    }
}

/* ----------------------------------- tests ---------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn params() -> ShooterParameters {
        ShooterParameters {
            pos_x: 0.54,
            pos_y: 0.73,
            heading: 0.0,
            flywheel_rpm: 3500.0,
            launch_angle: 60f64.to_radians(),
            release_height: 0.15,
            drag_coefficient: 0.0,
            lift_coefficient: 0.0,
            roll_efficiency: 0.5,
        }
    }

    fn estimator() -> ImpactZoneEstimator {
        ImpactZoneEstimator::new(Arena::standard())
    }

    #[test]
    fn linspace_is_symmetric() {
        assert_eq!(linspace(-2.0, 2.0, 5), vec![-2.0, -1.0, 0.0, 1.0, 2.0]);
        assert_eq!(linspace(0.0, 0.0, 5), vec![0.0; 5]);
        assert_eq!(linspace(1.0, 3.0, 1), vec![1.0]);
    }

    #[test]
    fn zero_variance_collapses_to_one_point() {
        let zone = estimator().estimate(&params(), 0.0, 0.0);
        assert_eq!(zone.points.len(), 25);
        let first = zone.points[0];
        assert!(zone.points.iter().all(|p| (p - first).norm() < 1e-12));
        assert_abs_diff_eq!(zone.radius, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!((zone.center - first).norm(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn variance_spreads_the_zone() {
        let zone = estimator().estimate(&params(), 2.0, 3.0);
        assert_eq!(zone.points.len(), 25);
        assert!(zone.radius > 0.0);
        assert!(zone.points.iter().all(|p| p.z <= zone.max_height));
        assert!((0.0..=100.0).contains(&zone.target_probability));
    }

    #[test]
    fn stalled_shooter_gives_degenerate_zone() {
        let p = ShooterParameters { flywheel_rpm: 0.0, ..params() };
        let zone = estimator().estimate(&p, 2.0, 3.0);
        assert!(zone.points.is_empty());
        assert_eq!(zone.center, Vector3::new(p.pos_x, p.pos_y, 0.0));
        assert_eq!(zone.radius, 0.0);
        assert_eq!(zone.target_probability, 0.0);
        assert!(!zone.in_target);
    }

    #[test]
    fn zone_placed_on_the_hub_scores() {
        let est = estimator();
        let hub = est.simulator.arena.field.hub_center();

        // find how far the shot travels, then back the robot off by that much
        let probe = est.estimate(&params(), 0.0, 0.0);
        let travel = probe.center.x - params().pos_x;
        let aimed = ShooterParameters { pos_x: hub.x - travel, pos_y: hub.y, ..params() };

        let zone = est.estimate(&aimed, 0.5, 0.5);
        assert!(zone.in_target, "{zone:?}");
        assert!(zone.radius < est.simulator.arena.field.hub_outer_radius);
        assert_abs_diff_eq!(zone.target_probability, 100.0, epsilon = 1e-9);
    }

    #[test]
    fn zone_far_from_hub_never_scores() {
        let zone = estimator().estimate(&ShooterParameters { heading: std::f64::consts::PI, ..params() }, 1.0, 1.0);
        assert!(!zone.in_target);
        assert_eq!(zone.target_probability, 0.0);
    }
}
