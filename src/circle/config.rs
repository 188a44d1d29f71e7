use std::{
    f32::consts::PI,
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_RADIUS_TOLERANCE: f32 = 0.35;
const DEFAULT_MIN_RADIUS_PX: f32 = 12.0;
const DEFAULT_CENTER_WINDOW_SAMPLES: u16 = 6;
const DEFAULT_MIN_SAMPLE_SPACING_PX: f32 = 2.0;
const DEFAULT_MIN_WINDOW_BOW_PX: f32 = 4.0;
const DEFAULT_ANGLE_NOISE_RAD: f32 = 0.05;
const DEFAULT_REVERSAL_MAX_SAMPLES: u8 = 3;
const DEFAULT_REVERSAL_MAX_ANGLE_RAD: f32 = 0.35;
// A circle fit needs at least three non-collinear points.
pub(crate) const MIN_CENTER_WINDOW_SAMPLES: u16 = 3;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse gesture config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// How the establishment window for the gesture center closes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CenterWindow {
    /// After this many distinct points, the Begin point included.
    Samples(u16),
    /// On the first sample at least this long after the Begin sample.
    DurationMs(u64),
}

impl Default for CenterWindow {
    fn default() -> Self {
        Self::Samples(DEFAULT_CENTER_WINDOW_SAMPLES)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressPolicy {
    /// One revolution completes the gesture; progress holds at 1.0 afterwards.
    #[default]
    Saturating,
    /// Revolutions keep counting past 1.0.
    Unbounded,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CircleGestureConfig {
    /// Allowed relative deviation from the reference radius.
    pub radius_tolerance: f32,
    pub min_radius: f32,
    pub center_window: CenterWindow,
    /// Points closer than this to the previous window point do not count.
    pub min_sample_spacing: f32,
    /// How far the window points must bow away from their chord before a
    /// center is fitted. Straighter windows count as lines.
    pub min_window_bow: f32,
    pub angle_noise: f32,
    pub reversal_max_samples: u8,
    pub reversal_max_angle: f32,
    pub progress_policy: ProgressPolicy,
}

impl Default for CircleGestureConfig {
    fn default() -> Self {
        Self {
            radius_tolerance: DEFAULT_RADIUS_TOLERANCE,
            min_radius: DEFAULT_MIN_RADIUS_PX,
            center_window: CenterWindow::default(),
            min_sample_spacing: DEFAULT_MIN_SAMPLE_SPACING_PX,
            min_window_bow: DEFAULT_MIN_WINDOW_BOW_PX,
            angle_noise: DEFAULT_ANGLE_NOISE_RAD,
            reversal_max_samples: DEFAULT_REVERSAL_MAX_SAMPLES,
            reversal_max_angle: DEFAULT_REVERSAL_MAX_ANGLE_RAD,
            progress_policy: ProgressPolicy::default(),
        }
    }
}

impl CircleGestureConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.radius_tolerance.is_finite() || self.radius_tolerance <= 0.0 {
            return Err(invalid(
                "radius_tolerance",
                format!("must be a positive fraction, got {}", self.radius_tolerance),
            ));
        }
        if !self.min_radius.is_finite() || self.min_radius < 0.0 {
            return Err(invalid(
                "min_radius",
                format!("must be a non-negative distance, got {}", self.min_radius),
            ));
        }
        match self.center_window {
            CenterWindow::Samples(count) if count < MIN_CENTER_WINDOW_SAMPLES => {
                return Err(invalid(
                    "center_window.samples",
                    format!("must be at least {MIN_CENTER_WINDOW_SAMPLES}, got {count}"),
                ));
            }
            CenterWindow::DurationMs(0) => {
                return Err(invalid("center_window.duration_ms", "must be non-zero".into()));
            }
            _ => {}
        }
        if !self.min_sample_spacing.is_finite() || self.min_sample_spacing < 0.0 {
            return Err(invalid(
                "min_sample_spacing",
                format!(
                    "must be a non-negative distance, got {}",
                    self.min_sample_spacing
                ),
            ));
        }
        if !self.min_window_bow.is_finite() || self.min_window_bow < 0.0 {
            return Err(invalid(
                "min_window_bow",
                format!("must be a non-negative distance, got {}", self.min_window_bow),
            ));
        }
        if !self.angle_noise.is_finite() || !(0.0..PI).contains(&self.angle_noise) {
            return Err(invalid(
                "angle_noise",
                format!("must be within [0, pi), got {}", self.angle_noise),
            ));
        }
        if !self.reversal_max_angle.is_finite()
            || self.reversal_max_angle <= self.angle_noise
            || self.reversal_max_angle >= PI
        {
            return Err(invalid(
                "reversal_max_angle",
                format!(
                    "must be above angle_noise ({}) and below pi, got {}",
                    self.angle_noise, self.reversal_max_angle
                ),
            ));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}
