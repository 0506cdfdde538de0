//! Caller-resolved sample and population corrections
//!
//! Age bracket and regional reference population are resolved by the
//! surrounding application into plain numbers; this module only applies them.

use serde::{Deserialize, Serialize};

use crate::color::LabColor;
use crate::season::Season;
use crate::{ColorError, Result};

/// Additive/multiplicative adjustment of a measured Lab sample
///
/// Applied as `L' = L · lightness_scale + lightness_offset`,
/// `a' = a + a_offset`, `b' = b + b_offset`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SampleCorrection {
    pub lightness_scale: f64,
    pub lightness_offset: f64,
    pub a_offset: f64,
    pub b_offset: f64,
}

impl Default for SampleCorrection {
    fn default() -> Self {
        Self {
            lightness_scale: 1.0,
            lightness_offset: 0.0,
            a_offset: 0.0,
            b_offset: 0.0,
        }
    }
}

impl SampleCorrection {
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }

    /// Apply the correction. The corrected color is validated, not clamped.
    pub fn apply(&self, lab: LabColor) -> Result<LabColor> {
        lab.validate()?;
        let corrected = LabColor::new(
            lab.l * self.lightness_scale + self.lightness_offset,
            lab.a + self.a_offset,
            lab.b + self.b_offset,
        );
        corrected.validate()?;
        Ok(corrected)
    }
}

/// Population-specific multiplicative factors on the season totals
///
/// - spring × brightness · saturation
/// - summer × brightness
/// - autumn × saturation
/// - winter × contrast
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationCorrection {
    pub brightness: f64,
    pub saturation: f64,
    pub contrast: f64,
}

impl Default for PopulationCorrection {
    fn default() -> Self {
        Self {
            brightness: 1.0,
            saturation: 1.0,
            contrast: 1.0,
        }
    }
}

impl PopulationCorrection {
    /// Factors must be finite and strictly positive
    pub fn validate(&self) -> Result<()> {
        for (name, v) in [
            ("brightness", self.brightness),
            ("saturation", self.saturation),
            ("contrast", self.contrast),
        ] {
            if !v.is_finite() || v <= 0.0 {
                return Err(ColorError::configuration(format!(
                    "population correction '{}' must be a positive number, got {}",
                    name, v
                )));
            }
        }
        Ok(())
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }

    /// Multiplier applied to one season's running total
    pub fn multiplier(&self, season: Season) -> f64 {
        match season {
            Season::Spring => self.brightness * self.saturation,
            Season::Summer => self.brightness,
            Season::Autumn => self.saturation,
            Season::Winter => self.contrast,
        }
    }
}
