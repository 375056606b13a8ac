//! Launch-angle sweep.
//!
//! Every candidate angle of the sweep is flown to the target distance with the
//! event simulator; the one whose height there is closest to the target band
//! wins (first one on ties, i.e. the lowest angle). Candidates are evaluated in
//! parallel and reduced in sweep order, so the answer is deterministic.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use shooter_core::{Arena, ShooterParameters};

use crate::events::{DistanceHit, EventSimulator};

/// Candidate angles `start_deg, start_deg + step_deg, …, end_deg`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AngleSweep {
    pub start_deg: f64,
    pub end_deg: f64,
    pub step_deg: f64,
}

impl Default for AngleSweep {
    fn default() -> Self {
        Self { start_deg: 20.0, end_deg: 75.0, step_deg: 0.5 }
    }
}

impl AngleSweep {
    pub fn angles_deg(&self) -> Vec<f64> {
        if self.step_deg <= 0.0 || self.end_deg < self.start_deg {
            return vec![self.start_deg];
        }
        let count = ((self.end_deg - self.start_deg) / self.step_deg).round() as usize + 1;
        (0..count).map(|i| self.start_deg + i as f64 * self.step_deg).collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveStatus {
    /// Best candidate is within tolerance of the band
    Found,
    /// Closest approach only; the caller decides whether to use it
    OutOfTolerance,
    /// No candidate reached the distance
    NoTrajectory,
}

impl SolveStatus {
    pub fn message(self) -> &'static str {
        match self {
            SolveStatus::Found => "Optimal angle found!",
            SolveStatus::OutOfTolerance => "Target may not be reachable with current RPM",
            SolveStatus::NoTrajectory => "Could not find valid trajectory",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OptimalAngleResult {
    pub angle_deg: f64,
    /// Height at the target distance [m]
    pub landing_height: f64,
    /// |landing_height − band| [m]; infinite when nothing was found
    pub error: f64,
    pub speed_at_target: f64,
    pub flight_time: f64,
    pub success: bool,
    pub status: SolveStatus,
}

impl OptimalAngleResult {
    pub fn message(&self) -> &'static str {
        self.status.message()
    }
}

#[derive(Clone, Copy, Debug)]
pub struct OptimalAngleSolver {
    pub simulator: EventSimulator,
    pub sweep: AngleSweep,
    /// Largest height error counted as success [m]
    pub tolerance: f64,
    /// Reported when no candidate works [deg]
    pub fallback_angle_deg: f64,
}

impl OptimalAngleSolver {
    pub fn new(arena: Arena) -> Self {
        Self {
            simulator: EventSimulator::new(arena),
            sweep: AngleSweep::default(),
            tolerance: 0.15,
            fallback_angle_deg: 45.0,
        }
    }

    pub fn solve(&self, params: &ShooterParameters, target_distance: f64) -> OptimalAngleResult {
        let band = self.simulator.arena.field.target_band_height();

        let candidates: Vec<Option<(f64, DistanceHit)>> = self
            .sweep
            .angles_deg()
            .into_par_iter()
            .map(|deg| {
                let variant = params.with_launch_angle(deg.to_radians());
                self.simulator.stop_at_distance(&variant, target_distance).map(|hit| (deg, hit))
            })
            .collect();

        let Some((angle_deg, hit, error)) = closest_to_band(candidates.into_iter().flatten(), band) else {
            log::warn!("no launch angle reaches {target_distance:.2} m at {:.0} RPM", params.flywheel_rpm);
            return OptimalAngleResult {
                angle_deg: self.fallback_angle_deg,
                landing_height: 0.0,
                error: f64::INFINITY,
                speed_at_target: 0.0,
                flight_time: 0.0,
                success: false,
                status: SolveStatus::NoTrajectory,
            };
        };

        let success = error < self.tolerance;
        log::debug!("best angle {angle_deg:.1}° for {target_distance:.2} m, height error {error:.3} m");
        OptimalAngleResult {
            angle_deg,
            landing_height: hit.height,
            error,
            speed_at_target: hit.speed,
            flight_time: hit.time,
            success,
            status: if success { SolveStatus::Found } else { SolveStatus::OutOfTolerance },
        }
    }
}

// First candidate with the smallest |height − band|, sweep order.
fn closest_to_band(
    candidates: impl IntoIterator<Item = (f64, DistanceHit)>,
    band: f64,
) -> Option<(f64, DistanceHit, f64)> {
    let mut best: Option<(f64, DistanceHit, f64)> = None;
    for (deg, hit) in candidates {
        let error = (hit.height - band).abs();
        if best.map_or(true, |(_, _, e)| error < e) {
            best = Some((deg, hit, error));
        }
    }
    best
}

/* ----------------------------------- tests ---------------------------------- */
