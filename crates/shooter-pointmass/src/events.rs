//! Event-stopping runs of the drag/lift model.
//!
//! Finer step than the display tracks and a budget of simulated time. A run
//! whose pre-step speed is exactly zero is abandoned (no heading to integrate
//! along), as is one that exhausts the budget.

use serde::{Deserialize, Serialize};
use shooter_core::{Arena, ShooterParameters};

use crate::{State, Stepper};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventOptions {
    /// Step [s]
    pub dt: f64,
    /// Simulated time budget [s]
    pub budget: f64,
}

impl Default for EventOptions {
    fn default() -> Self {
        Self { dt: 0.002, budget: 3.0 }
    }
}

/// State at the first step reaching the requested distance.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DistanceHit {
    /// Height after the step [m]
    pub height: f64,
    /// Speed the step was evaluated at [m/s]
    pub speed: f64,
    /// Time after the step [s]
    pub time: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImpactKind {
    /// Came down through the target band after the apex
    TargetCrossing,
    /// Hit the floor first
    Ground,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImpactPoint {
    /// Downrange distance [m]
    pub distance: f64,
    /// Band height for a crossing, 0 for ground contact [m]
    pub height: f64,
    /// Time of the step that detected the event [s]
    pub time: f64,
    pub kind: ImpactKind,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct EventSimulator {
    pub arena: Arena,
    pub options: EventOptions,
}

impl EventSimulator {
    pub fn new(arena: Arena) -> Self {
        Self { arena, options: EventOptions::default() }
    }

    pub fn with_options(mut self, options: EventOptions) -> Self {
        self.options = options;
        self
    }

    fn steps(&self, params: &ShooterParameters) -> impl Iterator<Item = crate::Step> {
        let budget = self.options.budget;
        Stepper::new(params, &self.arena.physics, self.options.dt).take_while(move |s| s.prev.t < budget)
    }

    /// Fly until `u ≥ target_distance`. `None` if the ball goes below ground
    /// first, stalls, or runs out of budget.
    pub fn stop_at_distance(&self, params: &ShooterParameters, target_distance: f64) -> Option<DistanceHit> {
        for step in self.steps(params) {
            if step.speed == 0.0 {
                return None;
            }
            if step.next.u >= target_distance {
                return Some(DistanceHit { height: step.next.n, speed: step.speed, time: step.next.t });
            }
            if step.next.n < 0.0 {
                return None;
            }
        }
        None
    }

    /// Fly until the ball comes down through the target band after its apex,
    /// interpolating the crossing distance linearly inside the step. Falls
    /// back to a ground-contact point if the floor comes first.
    pub fn stop_at_height_after_apex(&self, params: &ShooterParameters) -> Option<ImpactPoint> {
        let band = self.arena.field.target_band_height();
        let mut passed_apex = false;

        for step in self.steps(params) {
            if step.speed == 0.0 {
                return None;
            }
            let (prev, next) = (step.prev, step.next);
            if next.v_n < 0.0 {
                passed_apex = true;
            }

            if passed_apex && prev.n >= band && band >= next.n {
                return Some(ImpactPoint {
                    distance: crossing_distance(&prev, &next, band),
                    height: band,
                    time: next.t,
                    kind: ImpactKind::TargetCrossing,
                });
            }

            if next.n < 0.0 {
                return Some(ImpactPoint { distance: next.u, height: 0.0, time: next.t, kind: ImpactKind::Ground });
            }
        }
        None
    }
}

// Downrange distance where the segment prev → next passes `band`. A level
// segment reports the post-step distance.
fn crossing_distance(prev: &State, next: &State, band: f64) -> f64 {
    let drop = prev.n - next.n;
    let ratio = if drop == 0.0 { 0.0 } else { (band - next.n) / drop };
    next.u - ratio * (next.u - prev.u)
}

/* ----------------------------------- tests ---------------------------------- */
