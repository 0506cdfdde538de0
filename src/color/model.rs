//! Color value types
//!
//! Plain immutable value types for the color spaces used by the diagnosis
//! engine. Construction is unchecked; every public conversion, metric and
//! classifier entry point calls `validate()` before doing any work.

use palette::Lab;
use serde::{Deserialize, Serialize};

use crate::constants::limits;
use crate::{ColorError, Result};

/// 8-bit sRGB color
///
/// Channels are `u8`, so the [0, 255] domain holds by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RgbColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build from wider integers, rejecting anything outside [0, 255]
    pub fn try_from_ints(r: i32, g: i32, b: i32) -> Result<Self> {
        let channel = |field: &'static str, v: i32| -> Result<u8> {
            u8::try_from(v)
                .map_err(|_| ColorError::invalid_color("RGB", field, v as f64, "0..=255"))
        };
        Ok(Self::new(channel("r", r)?, channel("g", g)?, channel("b", b)?))
    }
}

/// CIE L*a*b* color
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabColor {
    /// Lightness, 0 to 100
    pub l: f64,
    /// Green (−) to red (+), −128 to 127
    pub a: f64,
    /// Blue (−) to yellow (+), −128 to 127
    pub b: f64,
}

impl LabColor {
    pub const fn new(l: f64, a: f64, b: f64) -> Self {
        Self { l, a, b }
    }

    /// Reject non-finite or out-of-range components. Never clamps.
    pub fn validate(&self) -> Result<()> {
        check_range("Lab", "l", self.l, limits::LAB_L_MIN, limits::LAB_L_MAX, "0..=100")?;
        check_range("Lab", "a", self.a, limits::LAB_AB_MIN, limits::LAB_AB_MAX, "-128..=127")?;
        check_range("Lab", "b", self.b, limits::LAB_AB_MIN, limits::LAB_AB_MAX, "-128..=127")?;
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// C*ab = √(a² + b²)
    pub fn chroma(&self) -> f64 {
        self.a.hypot(self.b)
    }

    /// Hue angle in degrees, [0, 360). Zero chroma yields 0.
    pub fn hue_degrees(&self) -> f64 {
        hue_angle(self.a, self.b)
    }

    /// Cylindrical form (L, C, h)
    pub fn to_lch(&self) -> LchColor {
        LchColor {
            l: self.l,
            c: self.chroma(),
            h: self.hue_degrees(),
        }
    }
}

impl From<LabColor> for Lab {
    fn from(color: LabColor) -> Self {
        Lab::new(color.l as f32, color.a as f32, color.b as f32)
    }
}

impl TryFrom<Lab> for LabColor {
    type Error = ColorError;

    fn try_from(lab: Lab) -> Result<Self> {
        let color = LabColor::new(lab.l as f64, lab.a as f64, lab.b as f64);
        color.validate()?;
        Ok(color)
    }
}

/// Cylindrical Lab (lightness, chroma, hue angle in degrees)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LchColor {
    pub l: f64,
    pub c: f64,
    pub h: f64,
}

/// HSL color: hue in degrees [0, 360), saturation and lightness in percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HslColor {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl HslColor {
    pub const fn new(h: f64, s: f64, l: f64) -> Self {
        Self { h, s, l }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.h.is_finite() || self.h < 0.0 || self.h >= 360.0 {
            return Err(ColorError::invalid_color("HSL", "h", self.h, "0..360"));
        }
        check_range("HSL", "s", self.s, 0.0, 100.0, "0..=100")?;
        check_range("HSL", "l", self.l, 0.0, 100.0, "0..=100")?;
        Ok(())
    }
}

/// CIE XYZ tristimulus values scaled so that Y of the white point is 100
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct XyzColor {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl XyzColor {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Tristimulus values must be finite and non-negative
    pub fn validate(&self) -> Result<()> {
        for (field, v) in [("x", self.x), ("y", self.y), ("z", self.z)] {
            if !v.is_finite() || v < 0.0 {
                return Err(ColorError::invalid_color("XYZ", field, v, "finite, >= 0"));
            }
        }
        Ok(())
    }

    pub(crate) fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    pub(crate) fn from_array(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

/// Hue angle of an (a, b) pair in degrees, normalized to [0, 360)
pub(crate) fn hue_angle(a: f64, b: f64) -> f64 {
    if a == 0.0 && b == 0.0 {
        return 0.0;
    }
    let h = b.atan2(a).to_degrees();
    if h < 0.0 {
        h + 360.0
    } else {
        h
    }
}

fn check_range(
    space: &'static str,
    field: &'static str,
    value: f64,
    min: f64,
    max: f64,
    expected: &'static str,
) -> Result<()> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ColorError::invalid_color(space, field, value, expected))
    }
}
