//! Color space conversion utilities
//!
//! Provides conversions between color spaces under a selectable illuminant:
//! - sRGB (8-bit) ↔ XYZ ↔ CIE Lab
//! - sRGB ↔ HSL
//! - sRGB ↔ hexadecimal strings
//! - Bradford chromatic adaptation between standard illuminants
//!
//! Every public method validates its input and rounds its floating-point
//! output to the converter's precision (3 decimals by default). The private
//! `*_raw` helpers assume validated input and do not round.
//!
//! sRGB is defined against D65. Under any other illuminant, sRGB-derived XYZ
//! is Bradford-adapted to that illuminant before Lab normalization, and back
//! to D65 before the sRGB matrix, so sRGB white is always Lab (100, 0, 0).

use std::sync::Arc;

use crate::cache::{CacheKey, CacheOp, ReferenceCache};
use crate::calibration::illuminant::mat_vec;
use crate::calibration::Illuminant;
use crate::color::model::{HslColor, LabColor, LchColor, RgbColor, XyzColor};
use crate::constants::{cie, limits, srgb};
use crate::{ColorError, Result};
use palette::{FromColor, Hsl, Srgb};

type SrgbHsl = Hsl<palette::encoding::Srgb, f64>;

/// Color converter bound to one illuminant and one output precision
///
/// The converter is immutable; switching illuminant means building a new one
/// with [`ColorConverter::with_illuminant`]. A shared cache may be attached;
/// its keys carry the illuminant and precision, so converters with different
/// settings can share one cache safely.
#[derive(Debug, Clone)]
pub struct ColorConverter {
    illuminant: Illuminant,
    precision: u32,
    cache: Option<Arc<ReferenceCache<LabColor>>>,
}

impl Default for ColorConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorConverter {
    /// Create a converter with D65 and 3-decimal output
    pub fn new() -> Self {
        Self {
            illuminant: Illuminant::D65,
            precision: limits::DEFAULT_PRECISION,
            cache: None,
        }
    }

    pub fn with_illuminant(mut self, illuminant: Illuminant) -> Self {
        self.illuminant = illuminant;
        self
    }

    /// Set output precision in decimal places
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` above 10 decimals.
    pub fn with_precision(mut self, precision: u32) -> Result<Self> {
        if precision > limits::MAX_PRECISION {
            return Err(ColorError::configuration(format!(
                "precision {} exceeds maximum of {} decimals",
                precision,
                limits::MAX_PRECISION
            )));
        }
        self.precision = precision;
        Ok(self)
    }

    /// Memoize `rgb_to_lab` results in a shared cache
    pub fn with_cache(mut self, cache: Arc<ReferenceCache<LabColor>>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn illuminant(&self) -> Illuminant {
        self.illuminant
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    pub fn cache(&self) -> Option<&Arc<ReferenceCache<LabColor>>> {
        self.cache.as_ref()
    }

    /// Convert 8-bit sRGB to XYZ (Y of white = 100), adapted to the
    /// converter's illuminant
    pub fn rgb_to_xyz(&self, rgb: RgbColor) -> Result<XyzColor> {
        Ok(self.round_xyz(Illuminant::D65.adapt(rgb_to_xyz_raw(rgb), self.illuminant)))
    }

    /// Convert XYZ to Lab relative to the converter's illuminant
    ///
    /// # Errors
    ///
    /// Returns `InvalidColor` for negative or non-finite XYZ, and for XYZ
    /// whose Lab falls outside L in [0, 100] or a/b in [-128, 127].
    pub fn xyz_to_lab(&self, xyz: XyzColor) -> Result<LabColor> {
        xyz.validate()?;
        self.finish_lab(xyz_to_lab_raw(xyz, self.illuminant))
    }

    /// Convert Lab to XYZ relative to the converter's illuminant
    pub fn lab_to_xyz(&self, lab: LabColor) -> Result<XyzColor> {
        lab.validate()?;
        Ok(self.round_xyz(lab_to_xyz_raw(lab, self.illuminant)))
    }

    /// Convert XYZ relative to the converter's illuminant to 8-bit sRGB
    ///
    /// Out-of-gamut results are clipped to [0, 255] per channel. Only
    /// non-finite input is rejected, since valid Lab colors near the gamut
    /// edge can map to slightly negative tristimulus values.
    pub fn xyz_to_rgb(&self, xyz: XyzColor) -> Result<RgbColor> {
        for (field, v) in [("x", xyz.x), ("y", xyz.y), ("z", xyz.z)] {
            if !v.is_finite() {
                return Err(ColorError::invalid_color("XYZ", field, v, "finite"));
            }
        }
        Ok(xyz_to_rgb_raw(self.illuminant.adapt(xyz, Illuminant::D65)))
    }

    /// Convert 8-bit sRGB to Lab
    ///
    /// The result always satisfies [`LabColor::validate`], at every precision
    /// and under every illuminant.
    pub fn rgb_to_lab(&self, rgb: RgbColor) -> Result<LabColor> {
        let compute = || self.finish_lab(rgb_to_lab_raw(rgb, self.illuminant));

        match &self.cache {
            Some(cache) => {
                let key = CacheKey::new(
                    CacheOp::RgbToLab,
                    &[rgb.r as f64, rgb.g as f64, rgb.b as f64],
                )
                .with_illuminant(self.illuminant)
                .with_precision(self.precision);
                cache.get_or_try_insert(key, compute)
            }
            None => compute(),
        }
    }

    /// Convert Lab to 8-bit sRGB, clipping out-of-gamut colors
    pub fn lab_to_rgb(&self, lab: LabColor) -> Result<RgbColor> {
        lab.validate()?;
        Ok(xyz_to_rgb_raw(self.to_d65_xyz(lab)))
    }

    /// Check whether a Lab color maps inside the sRGB gamut without clipping
    pub fn is_in_srgb_gamut(&self, lab: LabColor) -> Result<bool> {
        lab.validate()?;
        let linear = mat_vec(&srgb::XYZ_TO_RGB, scale(self.to_d65_xyz(lab)));
        Ok(linear.iter().all(|c| (-1e-9..=1.0 + 1e-9).contains(c)))
    }

    /// Convert Lab to its cylindrical LCh form
    pub fn lab_to_lch(&self, lab: LabColor) -> Result<LchColor> {
        lab.validate()?;
        let lch = lab.to_lch();
        Ok(LchColor {
            l: self.round(lch.l),
            c: self.round(lch.c),
            h: self.round_hue(lch.h),
        })
    }

    /// Convert 8-bit sRGB to HSL
    ///
    /// A channel spread of zero yields `h = 0, s = 0`.
    pub fn rgb_to_hsl(&self, rgb: RgbColor) -> Result<HslColor> {
        let hsl = rgb_to_hsl_raw(rgb);
        Ok(HslColor::new(
            self.round_hue(hsl.h),
            self.round(hsl.s),
            self.round(hsl.l),
        ))
    }

    /// Convert HSL to 8-bit sRGB
    pub fn hsl_to_rgb(&self, hsl: HslColor) -> Result<RgbColor> {
        hsl.validate()?;
        Ok(hsl_to_rgb_raw(hsl))
    }

    /// Convert Lab to HSL through gamut-clipped sRGB
    pub fn lab_to_hsl(&self, lab: LabColor) -> Result<HslColor> {
        let rgb = self.lab_to_rgb(lab)?;
        self.rgb_to_hsl(rgb)
    }

    /// Format as `#RRGGBB` (upper-case)
    pub fn rgb_to_hex(&self, rgb: RgbColor) -> String {
        format!("#{:02X}{:02X}{:02X}", rgb.r, rgb.g, rgb.b)
    }

    /// Parse `#RRGGBB`, `RRGGBB`, `#RGB` or `RGB`
    ///
    /// # Errors
    ///
    /// Returns `InvalidHex` for any other length or non-hex digits.
    pub fn hex_to_rgb(&self, hex: &str) -> Result<RgbColor> {
        let digits = hex.trim().trim_start_matches('#');
        let invalid = |reason: String| ColorError::InvalidHex {
            input: hex.to_string(),
            reason,
        };

        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid("contains non-hexadecimal characters".to_string()));
        }

        let expanded = match digits.len() {
            6 => digits.to_string(),
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            n => return Err(invalid(format!("expected 3 or 6 digits, got {}", n))),
        };

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&expanded[range], 16).map_err(|e| invalid(e.to_string()))
        };
        Ok(RgbColor::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Hex representation of a Lab color (gamut-clipped)
    pub fn lab_to_hex(&self, lab: LabColor) -> Result<String> {
        Ok(self.rgb_to_hex(self.lab_to_rgb(lab)?))
    }

    /// Adapt an XYZ color measured under `source` to this converter's illuminant
    pub fn adapt_xyz(&self, xyz: XyzColor, source: Illuminant) -> Result<XyzColor> {
        xyz.validate()?;
        Ok(self.round_xyz(source.adapt(xyz, self.illuminant)))
    }

    fn to_d65_xyz(&self, lab: LabColor) -> XyzColor {
        self.illuminant.adapt(lab_to_xyz_raw(lab, self.illuminant), Illuminant::D65)
    }

    /// Round, snap L* overshoot from matrix round-off, then validate
    fn finish_lab(&self, lab: LabColor) -> Result<LabColor> {
        let lab = self.round_lab(LabColor::new(snap_lightness(lab.l), lab.a, lab.b));
        lab.validate()?;
        Ok(lab)
    }

    fn round(&self, v: f64) -> f64 {
        round_to(v, self.precision)
    }

    fn round_hue(&self, h: f64) -> f64 {
        let rounded = self.round(h);
        if rounded >= 360.0 {
            rounded - 360.0
        } else {
            rounded
        }
    }

    fn round_lab(&self, lab: LabColor) -> LabColor {
        // Rounding can produce -0.0 for tiny negatives
        LabColor::new(
            self.round(lab.l) + 0.0,
            self.round(lab.a) + 0.0,
            self.round(lab.b) + 0.0,
        )
    }

    fn round_xyz(&self, xyz: XyzColor) -> XyzColor {
        XyzColor::new(self.round(xyz.x), self.round(xyz.y), self.round(xyz.z))
    }
}

/// Round to a number of decimal places
pub fn round_to(v: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (v * factor).round() / factor
}

fn snap_lightness(l: f64) -> f64 {
    if l > limits::LAB_L_MAX && l - limits::LAB_L_MAX <= limits::LAB_L_TOLERANCE {
        limits::LAB_L_MAX
    } else if l < limits::LAB_L_MIN && limits::LAB_L_MIN - l <= limits::LAB_L_TOLERANCE {
        limits::LAB_L_MIN
    } else {
        l
    }
}

fn srgb_decode(c: f64) -> f64 {
    if c <= srgb::DECODE_THRESHOLD {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn srgb_encode(c: f64) -> f64 {
    if c <= srgb::ENCODE_THRESHOLD {
        12.92 * c
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

fn lab_f(t: f64) -> f64 {
    if t > cie::EPSILON {
        t.cbrt()
    } else {
        (cie::KAPPA * t + 16.0) / 116.0
    }
}

fn lab_f_inverse(ft: f64) -> f64 {
    let t3 = ft * ft * ft;
    if t3 > cie::EPSILON {
        t3
    } else {
        (116.0 * ft - 16.0) / cie::KAPPA
    }
}

fn scale(xyz: XyzColor) -> [f64; 3] {
    [xyz.x / 100.0, xyz.y / 100.0, xyz.z / 100.0]
}

pub(crate) fn rgb_to_xyz_raw(rgb: RgbColor) -> XyzColor {
    let linear = [
        srgb_decode(rgb.r as f64 / 255.0),
        srgb_decode(rgb.g as f64 / 255.0),
        srgb_decode(rgb.b as f64 / 255.0),
    ];
    let xyz = mat_vec(&srgb::RGB_TO_XYZ, linear);
    XyzColor::new(xyz[0] * 100.0, xyz[1] * 100.0, xyz[2] * 100.0)
}

/// sRGB to Lab under `illuminant`, adapting the D65 tristimulus first
pub(crate) fn rgb_to_lab_raw(rgb: RgbColor, illuminant: Illuminant) -> LabColor {
    xyz_to_lab_raw(Illuminant::D65.adapt(rgb_to_xyz_raw(rgb), illuminant), illuminant)
}

pub(crate) fn xyz_to_lab_raw(xyz: XyzColor, illuminant: Illuminant) -> LabColor {
    let wp = illuminant.white_point();
    let fx = lab_f(xyz.x / wp.x);
    let fy = lab_f(xyz.y / wp.y);
    let fz = lab_f(xyz.z / wp.z);
    LabColor::new(116.0 * fy - 16.0, 500.0 * (fx - fy), 200.0 * (fy - fz))
}

pub(crate) fn lab_to_xyz_raw(lab: LabColor, illuminant: Illuminant) -> XyzColor {
    let wp = illuminant.white_point();
    let fy = (lab.l + 16.0) / 116.0;
    let fx = lab.a / 500.0 + fy;
    let fz = fy - lab.b / 200.0;
    XyzColor::new(
        lab_f_inverse(fx) * wp.x,
        lab_f_inverse(fy) * wp.y,
        lab_f_inverse(fz) * wp.z,
    )
}

pub(crate) fn xyz_to_rgb_raw(xyz: XyzColor) -> RgbColor {
    let linear = mat_vec(&srgb::XYZ_TO_RGB, scale(xyz));
    let to_u8 = |c: f64| (srgb_encode(c) * 255.0).round().clamp(0.0, 255.0) as u8;
    RgbColor::new(to_u8(linear[0]), to_u8(linear[1]), to_u8(linear[2]))
}

pub(crate) fn rgb_to_hsl_raw(rgb: RgbColor) -> HslColor {
    let srgb = Srgb::new(
        rgb.r as f64 / 255.0,
        rgb.g as f64 / 255.0,
        rgb.b as f64 / 255.0,
    );
    let hsl = SrgbHsl::from_color(srgb);
    HslColor::new(
        hsl.hue.into_positive_degrees(),
        hsl.saturation * 100.0,
        hsl.lightness * 100.0,
    )
}

pub(crate) fn hsl_to_rgb_raw(hsl: HslColor) -> RgbColor {
    let srgb = Srgb::<f64>::from_color(SrgbHsl::new(hsl.h, hsl.s / 100.0, hsl.l / 100.0));
    let to_u8 = |c: f64| (c * 255.0).round().clamp(0.0, 255.0) as u8;
    RgbColor::new(to_u8(srgb.red), to_u8(srgb.green), to_u8(srgb.blue))
}
