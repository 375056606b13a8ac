//! Persisted shooter configuration (JSON).
//!
//! File format, one flat object:
//!
//! ```json
//! { "P_x": 0.54, "P_y": 0.73, "O_r_deg": 0, "w": 2750, "O_b_deg": 70,
//!   "Z_sh": 0.15, "C_D": 0.6, "C_L": 0, "C_roll": 0.5 }
//! ```
//!
//! Angles are stored in degrees. Older files carry the heading as `O_r`
//! (also degrees); `O_r_deg` wins when both are present. Missing keys take
//! the defaults, unknown keys are ignored.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ShooterParameters;

pub const DEFAULT_CONFIG_FILE: &str = "config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot access config file {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config in {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("cannot encode config")]
    Serialize(#[source] serde_json::Error),
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawConfig")]
pub struct ShooterConfig {
    #[serde(rename = "P_x")]
    pub pos_x: f64,
    #[serde(rename = "P_y")]
    pub pos_y: f64,
    #[serde(rename = "O_r_deg")]
    pub heading_deg: f64,
    #[serde(rename = "w")]
    pub flywheel_rpm: f64,
    #[serde(rename = "O_b_deg")]
    pub launch_angle_deg: f64,
    #[serde(rename = "Z_sh")]
    pub release_height: f64,
    #[serde(rename = "C_D")]
    pub drag_coefficient: f64,
    #[serde(rename = "C_L")]
    pub lift_coefficient: f64,
    #[serde(rename = "C_roll")]
    pub roll_efficiency: f64,
}

impl Default for ShooterConfig {
    fn default() -> Self {
        Self {
            pos_x: 0.54,
            pos_y: 0.73,
            heading_deg: 0.0,
            flywheel_rpm: 2750.0,
            launch_angle_deg: 70.0,
            release_height: 0.15,
            drag_coefficient: 0.6,
            lift_coefficient: 0.0,
            roll_efficiency: 0.5,
        }
    }
}

// On-disk shape, every key optional.
#[derive(Deserialize)]
#[allow(non_snake_case)]
struct RawConfig {
    P_x: Option<f64>,
    P_y: Option<f64>,
    O_r: Option<f64>,
    O_r_deg: Option<f64>,
    w: Option<f64>,
    O_b_deg: Option<f64>,
    Z_sh: Option<f64>,
    C_D: Option<f64>,
    C_L: Option<f64>,
    C_roll: Option<f64>,
}

impl From<RawConfig> for ShooterConfig {
    fn from(raw: RawConfig) -> Self {
        let d = ShooterConfig::default();
        Self {
            pos_x: raw.P_x.unwrap_or(d.pos_x),
            pos_y: raw.P_y.unwrap_or(d.pos_y),
            heading_deg: raw.O_r_deg.or(raw.O_r).unwrap_or(d.heading_deg),
            flywheel_rpm: raw.w.unwrap_or(d.flywheel_rpm),
            launch_angle_deg: raw.O_b_deg.unwrap_or(d.launch_angle_deg),
            release_height: raw.Z_sh.unwrap_or(d.release_height),
            drag_coefficient: raw.C_D.unwrap_or(d.drag_coefficient),
            lift_coefficient: raw.C_L.unwrap_or(d.lift_coefficient),
            roll_efficiency: raw.C_roll.unwrap_or(d.roll_efficiency),
        }
    }
}

impl ShooterConfig {
    /// Degrees → radians at the solver boundary.
    pub fn to_parameters(&self) -> ShooterParameters {
        ShooterParameters {
            pos_x: self.pos_x,
            pos_y: self.pos_y,
            heading: self.heading_deg.to_radians(),
            flywheel_rpm: self.flywheel_rpm,
            launch_angle: self.launch_angle_deg.to_radians(),
            release_height: self.release_height,
            drag_coefficient: self.drag_coefficient,
            lift_coefficient: self.lift_coefficient,
            roll_efficiency: self.roll_efficiency,
        }
    }

    pub fn from_parameters(p: &ShooterParameters) -> Self {
        Self {
            pos_x: p.pos_x,
            pos_y: p.pos_y,
            heading_deg: p.heading.to_degrees(),
            flywheel_rpm: p.flywheel_rpm,
            launch_angle_deg: p.launch_angle.to_degrees(),
            release_height: p.release_height,
            drag_coefficient: p.drag_coefficient,
            lift_coefficient: p.lift_coefficient,
            roll_efficiency: p.roll_efficiency,
        }
    }

    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Pretty JSON, 4-space indent.
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        let mut buf = Vec::new();
        let fmt = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, fmt);
        self.serialize(&mut ser).map_err(ConfigError::Serialize)?;
        // serde_json only ever emits UTF-8
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Strict load: any I/O or parse failure is returned.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = with_json_extension(path.as_ref());
        let text = fs::read_to_string(&path).map_err(|source| ConfigError::Io { path: path.clone(), source })?;
        let cfg = Self::from_json_str(&text).map_err(|source| ConfigError::Parse { path: path.clone(), source })?;
        log::info!("loaded config from {}", path.display());
        Ok(cfg)
    }

    /// Forgiving load used at startup. `None` means [`DEFAULT_CONFIG_FILE`].
    ///
    /// A missing [`DEFAULT_CONFIG_FILE`] (exactly that relative path, not a
    /// `config.json` elsewhere) is created with the defaults. Any other
    /// missing or unreadable file yields the defaults with a warning.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let path = with_json_extension(path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE)));
        let create_if_missing = path == Path::new(DEFAULT_CONFIG_FILE);
        Self::load_or_init(&path, create_if_missing)
    }

    fn load_or_init(path: &Path, create_if_missing: bool) -> Self {
        if !path.exists() {
            let defaults = Self::default();
            if create_if_missing {
                if let Err(e) = defaults.save(path) {
                    log::warn!("could not write default config: {e}");
                }
            } else {
                log::warn!("config file {} not found, loading defaults", path.display());
            }
            return defaults;
        }

        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                log::warn!("{e}, using defaults");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = with_json_extension(path.as_ref());
        let text = self.to_json_string()?;
        fs::write(&path, text).map_err(|source| ConfigError::Io { path: path.clone(), source })?;
        log::info!("configuration saved to {}", path.display());
        Ok(())
    }
}

/// Append `.json` unless the name already ends with it.
pub fn with_json_extension(path: &Path) -> PathBuf {
    if path.extension().is_some_and(|e| e == "json") {
        return path.to_path_buf();
    }
    let mut name = path.as_os_str().to_owned();
    name.push(".json");
    PathBuf::from(name)
}
