//! Shooter parameter record.
//!
//! Every solver takes this by value and never mutates it; sweeps build
//! variants with the `with_*` helpers. Angles are radians here, whatever the
//! input layer stores.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShooterParameters {
    /// Launch position x [m]
    pub pos_x: f64,
    /// Launch position y [m]
    pub pos_y: f64,
    /// Robot heading [rad], 0 = +x
    pub heading: f64,
    /// Flywheel speed [RPM]
    pub flywheel_rpm: f64,
    /// Launch angle above horizontal [rad]
    pub launch_angle: f64,
    /// Release height [m]
    pub release_height: f64,
    /// Drag coefficient C_D
    pub drag_coefficient: f64,
    /// Magnus lift coefficient C_L
    pub lift_coefficient: f64,
    /// Fraction of flywheel surface speed the ball keeps as translation (0..1)
    pub roll_efficiency: f64,
}

impl ShooterParameters {
    pub fn with_launch_angle(self, launch_angle: f64) -> Self {
        Self { launch_angle, ..self }
    }

    pub fn with_flywheel_rpm(self, flywheel_rpm: f64) -> Self {
        Self { flywheel_rpm, ..self }
    }

    pub fn launch_angle_deg(&self) -> f64 {
        self.launch_angle.to_degrees()
    }

    /// Report physically doubtful values. Solvers never call this and never
    /// clamp; it exists for input layers that want to flag bad inputs.
    pub fn validate(&self) -> Vec<ParameterIssue> {
        let mut issues = Vec::new();

        let fields = [
            ("pos_x", self.pos_x),
            ("pos_y", self.pos_y),
            ("heading", self.heading),
            ("flywheel_rpm", self.flywheel_rpm),
            ("launch_angle", self.launch_angle),
            ("release_height", self.release_height),
            ("drag_coefficient", self.drag_coefficient),
            ("lift_coefficient", self.lift_coefficient),
            ("roll_efficiency", self.roll_efficiency),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                issues.push(ParameterIssue::NonFinite { field: name, value });
            }
        }

        if self.flywheel_rpm < 0.0 {
            issues.push(ParameterIssue::NegativeRpm(self.flywheel_rpm));
        }
        if !(0.0..=1.0).contains(&self.roll_efficiency) {
            issues.push(ParameterIssue::RollEfficiencyOutOfRange(self.roll_efficiency));
        }
        if self.drag_coefficient < 0.0 {
            issues.push(ParameterIssue::NegativeDrag(self.drag_coefficient));
        }
        issues
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum ParameterIssue {
    #[error("{field} is not finite ({value})")]
    NonFinite { field: &'static str, value: f64 },
    #[error("flywheel speed is negative ({0} RPM)")]
    NegativeRpm(f64),
    #[error("roll efficiency {0} is outside [0, 1]")]
    RollEfficiencyOutOfRange(f64),
    #[error("drag coefficient is negative ({0})")]
    NegativeDrag(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> ShooterParameters {
        ShooterParameters {
            pos_x: 0.54,
            pos_y: 0.73,
            heading: 0.0,
            flywheel_rpm: 2750.0,
            launch_angle: 45f64.to_radians(),
            release_height: 0.15,
            drag_coefficient: 0.6,
            lift_coefficient: 0.0,
            roll_efficiency: 0.5,
        }
    }

    #[test]
    fn variants_leave_base_untouched() {
        let p = base();
        let q = p.with_launch_angle(0.3).with_flywheel_rpm(3000.0);
        assert_eq!(p.flywheel_rpm, 2750.0);
        assert_eq!(q.launch_angle, 0.3);
        assert_eq!(q.flywheel_rpm, 3000.0);
        assert_eq!(q.pos_x, p.pos_x);
    }

    #[test]
    fn sane_parameters_have_no_issues() {
        assert!(base().validate().is_empty());
    }

    #[test]
    fn flags_out_of_range_values_without_clamping() {
        let p = ShooterParameters { flywheel_rpm: -10.0, roll_efficiency: 1.5, ..base() };
        let issues = p.validate();
        assert!(issues.contains(&ParameterIssue::NegativeRpm(-10.0)));
        assert!(issues.contains(&ParameterIssue::RollEfficiencyOutOfRange(1.5)));
        assert_eq!(p.roll_efficiency, 1.5);
    }

    #[test]
    fn flags_non_finite() {
        let p = ShooterParameters { release_height: f64::NAN, ..base() };
        assert!(matches!(
            p.validate().as_slice(),
            [ParameterIssue::NonFinite { field: "release_height", .. }]
        ));
    }
}
