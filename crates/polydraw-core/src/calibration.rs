//! Pixel to real-world unit calibration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default real-world units per drawing inch.
pub const DEFAULT_SCALE: f64 = 1.0;

/// Default pixels per drawing inch.
pub const DEFAULT_DPI: f64 = 10.0;

/// Calibration errors.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CalibrationError {
    #[error("Scale must be a positive number, got {0}")]
    InvalidScale(f64),
    #[error("DPI must be a positive number, got {0}")]
    InvalidDpi(f64),
}

/// Conversion from canvas pixels to real-world units.
///
/// `scale` is real-world units per drawing inch and `dpi` is pixels per
/// drawing inch, so one pixel measures `scale / dpi` units. Both values are
/// finite and strictly positive; every constructor and setter enforces it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCalibration")]
pub struct Calibration {
    scale: f64,
    dpi: f64,
}

#[derive(Deserialize)]
struct RawCalibration {
    scale: f64,
    dpi: f64,
}

impl TryFrom<RawCalibration> for Calibration {
    type Error = CalibrationError;

    fn try_from(raw: RawCalibration) -> Result<Self, Self::Error> {
        Self::new(raw.scale, raw.dpi)
    }
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            dpi: DEFAULT_DPI,
        }
    }
}

fn is_valid(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

impl Calibration {
    /// Create a calibration, rejecting zero, negative or non-finite values.
    pub fn new(scale: f64, dpi: f64) -> Result<Self, CalibrationError> {
        if !is_valid(scale) {
            return Err(CalibrationError::InvalidScale(scale));
        }
        if !is_valid(dpi) {
            return Err(CalibrationError::InvalidDpi(dpi));
        }
        Ok(Self { scale, dpi })
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn dpi(&self) -> f64 {
        self.dpi
    }

    /// Replace the scale. On error the previous value is kept.
    pub fn set_scale(&mut self, scale: f64) -> Result<(), CalibrationError> {
        if !is_valid(scale) {
            return Err(CalibrationError::InvalidScale(scale));
        }
        self.scale = scale;
        Ok(())
    }

    /// Replace the DPI. On error the previous value is kept.
    pub fn set_dpi(&mut self, dpi: f64) -> Result<(), CalibrationError> {
        if !is_valid(dpi) {
            return Err(CalibrationError::InvalidDpi(dpi));
        }
        self.dpi = dpi;
        Ok(())
    }

    /// Real-world length of one pixel.
    pub fn linear_factor(&self) -> f64 {
        self.scale / self.dpi
    }

    /// Real-world area of one square pixel (the linear factor squared).
    pub fn area_factor(&self) -> f64 {
        let factor = self.linear_factor();
        factor * factor
    }
}
