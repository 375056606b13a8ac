// crates/shooter-ffi-wasm/src/lib.rs
//
// WASM bindings: display trajectories, optimal angle, impact zone, config JSON.
// Angles cross the JS boundary in degrees and are converted to radians here.

use anyhow::Context;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

// --- our crates ---
use shooter_core::{Arena, ShooterConfig, ShooterParameters};
use shooter_dispersion::ImpactZoneEstimator;
use shooter_pointmass::{OptimalAngleSolver, TrajectoryIntegrator};

static ARENA: Lazy<Arena> = Lazy::new(Arena::standard);

// Better panic messages in browser console
#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
}

/* --------------------------- Shared DTOs (JS) --------------------------- */

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JsShooterParams {
    pub pos_x: f64,
    pub pos_y: f64,
    pub heading_deg: f64,
    pub flywheel_rpm: f64,
    pub launch_angle_deg: f64,
    pub release_height: f64,
    pub drag_coefficient: f64,
    pub lift_coefficient: f64,
    pub roll_efficiency: f64,
}

impl From<ShooterConfig> for JsShooterParams {
    fn from(c: ShooterConfig) -> Self {
        JsShooterParams {
            pos_x: c.pos_x,
            pos_y: c.pos_y,
            heading_deg: c.heading_deg,
            flywheel_rpm: c.flywheel_rpm,
            launch_angle_deg: c.launch_angle_deg,
            release_height: c.release_height,
            drag_coefficient: c.drag_coefficient,
            lift_coefficient: c.lift_coefficient,
            roll_efficiency: c.roll_efficiency,
        }
    }
}

impl From<JsShooterParams> for ShooterConfig {
    fn from(p: JsShooterParams) -> Self {
        ShooterConfig {
            pos_x: p.pos_x,
            pos_y: p.pos_y,
            heading_deg: p.heading_deg,
            flywheel_rpm: p.flywheel_rpm,
            launch_angle_deg: p.launch_angle_deg,
            release_height: p.release_height,
            drag_coefficient: p.drag_coefficient,
            lift_coefficient: p.lift_coefficient,
            roll_efficiency: p.roll_efficiency,
        }
    }
}

impl From<JsShooterParams> for ShooterParameters {
    fn from(p: JsShooterParams) -> Self {
        ShooterConfig::from(p).to_parameters()
    }
}

// Out-of-range inputs are reported, never corrected.
fn checked(p: JsShooterParams) -> ShooterParameters {
    let params = ShooterParameters::from(p);
    for issue in params.validate() {
        log::warn!("shooter parameters: {issue}");
    }
    params
}

fn to_js_err(e: &anyhow::Error) -> JsValue {
    JsValue::from_str(&format!("{e:#}"))
}

/* ----------------------------- Trajectories ----------------------------- */

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JsPlanePoint {
    pub u: f64,
    pub n: f64,
    pub t: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JsFieldPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub t: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JsCrossing {
    pub u: f64,
    pub n: f64,
    pub t: f64,
    /// Downrange distance of the far hub edge for this crossing
    pub end_of_hub_u: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsTrajectoryResult {
    pub ideal: Vec<JsPlanePoint>,
    pub ideal_crossing: Option<JsCrossing>,
    pub drag: Vec<JsPlanePoint>,
    pub drag_crossing: Option<JsCrossing>,
    pub ideal_xyz: Vec<JsFieldPoint>,
    pub drag_xyz: Vec<JsFieldPoint>,
    pub rim_height: f64,
    pub target_height: f64,
}

fn trajectories(p: JsShooterParams) -> JsTrajectoryResult {
    let params = checked(p);
    let field = ARENA.field;
    let res = TrajectoryIntegrator::new(*ARENA).compute(&params);

    let plane = |v: &[shooter_core::PlaneSample]| -> Vec<JsPlanePoint> {
        v.iter().map(|s| JsPlanePoint { u: s.u, n: s.n, t: s.t }).collect()
    };
    let xyz = |v: &[shooter_core::FieldSample]| -> Vec<JsFieldPoint> {
        v.iter().map(|s| JsFieldPoint { x: s.x, y: s.y, z: s.z, t: s.t }).collect()
    };
    let crossing = |c: Option<shooter_pointmass::CrossingPoint>| {
        c.map(|c| JsCrossing { u: c.u, n: c.n, t: c.t, end_of_hub_u: field.end_of_hub(c.u) })
    };

    JsTrajectoryResult {
        ideal: plane(&res.ideal),
        ideal_crossing: crossing(res.ideal_crossing),
        drag: plane(&res.drag),
        drag_crossing: crossing(res.drag_crossing),
        ideal_xyz: xyz(&res.ideal_field),
        drag_xyz: xyz(&res.drag_field),
        rim_height: field.rim_height(),
        target_height: field.target_band_height(),
    }
}

#[wasm_bindgen]
pub fn compute_trajectories_js(params: JsValue) -> Result<JsValue, JsValue> {
    let p: JsShooterParams = swb::from_value(params)?;
    swb::to_value(&trajectories(p)).map_err(|e| e.into())
}

/* ---------------------------- Optimal angle ----------------------------- */

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsOptimalAngle {
    pub angle_deg: f64,
    pub landing_height: f64,
    /// `None` when no angle reached the distance
    pub error: Option<f64>,
    pub speed_at_target: f64,
    pub flight_time: f64,
    pub success: bool,
    pub message: String,
}

fn optimal_angle(p: JsShooterParams, target_distance: f64) -> JsOptimalAngle {
    let r = OptimalAngleSolver::new(*ARENA).solve(&checked(p), target_distance);
    JsOptimalAngle {
        angle_deg: r.angle_deg,
        landing_height: r.landing_height,
        error: r.error.is_finite().then_some(r.error),
        speed_at_target: r.speed_at_target,
        flight_time: r.flight_time,
        success: r.success,
        message: r.message().to_string(),
    }
}

#[wasm_bindgen]
pub fn solve_optimal_angle_js(params: JsValue, target_distance: f64) -> Result<JsValue, JsValue> {
    let p: JsShooterParams = swb::from_value(params)?;
    if !target_distance.is_finite() || target_distance <= 0.0 {
        return Err(JsValue::from_str("target_distance must be a positive number"));
    }
    swb::to_value(&optimal_angle(p, target_distance)).map_err(|e| e.into())
}

/* ----------------------------- Impact zone ------------------------------ */

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsImpactZone {
    pub center: [f64; 3],
    pub radius: f64,
    pub points: Vec<[f64; 3]>,
    pub in_target: bool,
    pub target_probability: f64,
    pub max_height: f64,
}

fn impact_zone(p: JsShooterParams, angle_variance_deg: f64, speed_variance_pct: f64) -> JsImpactZone {
    let zone = ImpactZoneEstimator::new(*ARENA).estimate(&checked(p), angle_variance_deg, speed_variance_pct);
    JsImpactZone {
        center: zone.center.into(),
        radius: zone.radius,
        points: zone.points.iter().map(|v| (*v).into()).collect(),
        in_target: zone.in_target,
        target_probability: zone.target_probability,
        max_height: zone.max_height,
    }
}

#[wasm_bindgen]
pub fn estimate_impact_zone_js(
    params: JsValue,
    angle_variance_deg: f64,
    speed_variance_pct: f64,
) -> Result<JsValue, JsValue> {
    let p: JsShooterParams = swb::from_value(params)?;
    swb::to_value(&impact_zone(p, angle_variance_deg, speed_variance_pct)).map_err(|e| e.into())
}

/* -------------------------------- Config -------------------------------- */

fn parse_config(json: &str) -> anyhow::Result<JsShooterParams> {
    let cfg = ShooterConfig::from_json_str(json).context("parsing shooter config")?;
    Ok(cfg.into())
}

fn config_json(p: JsShooterParams) -> anyhow::Result<String> {
    let text = ShooterConfig::from(p).to_json_string().context("encoding shooter config")?;
    Ok(text)
}

#[wasm_bindgen]
pub fn default_config_js() -> Result<JsValue, JsValue> {
    let p = JsShooterParams::from(ShooterConfig::default());
    swb::to_value(&p).map_err(|e| e.into())
}

#[wasm_bindgen]
pub fn parse_config_js(json: &str) -> Result<JsValue, JsValue> {
    let p = parse_config(json).map_err(|e| to_js_err(&e))?;
    swb::to_value(&p).map_err(|e| e.into())
}

#[wasm_bindgen]
pub fn config_to_json_js(params: JsValue) -> Result<String, JsValue> {
    let p: JsShooterParams = swb::from_value(params)?;
    config_json(p).map_err(|e| to_js_err(&e))
}

/* -------------------------------- tests -------------------------------- */
