//! Standard illuminants and chromatic adaptation
//!
//! The converter normalizes XYZ by the white point of one of a fixed set of
//! CIE standard illuminants. Lookups by name never fall back silently: an
//! unknown name is a `ConfigurationError`, and the lenient
//! [`Illuminant::resolve_or_default`] returns the substitution as a value.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::model::XyzColor;
use crate::constants::illuminants as std_illuminants;
use crate::{ColorError, Result};

/// Enumerated standard illuminants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Illuminant {
    /// Average daylight, 6504 K
    #[default]
    D65,
    /// Horizon daylight, 5003 K (print viewing booths)
    D50,
    /// Incandescent tungsten, 2856 K
    A,
    /// Cool white fluorescent, 4230 K
    F2,
}

/// Record of a requested illuminant that was replaced by the default
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IlluminantSubstitution {
    pub requested: String,
    pub substituted: Illuminant,
}

impl Illuminant {
    pub const ALL: [Illuminant; 4] = [Illuminant::D65, Illuminant::D50, Illuminant::A, Illuminant::F2];

    pub fn name(&self) -> &'static str {
        match self {
            Illuminant::D65 => "D65",
            Illuminant::D50 => "D50",
            Illuminant::A => "A",
            Illuminant::F2 => "F2",
        }
    }

    /// XYZ white point with Y = 100
    pub fn white_point(&self) -> XyzColor {
        XyzColor::from_array(match self {
            Illuminant::D65 => std_illuminants::D65_WHITE_POINT,
            Illuminant::D50 => std_illuminants::D50_WHITE_POINT,
            Illuminant::A => std_illuminants::A_WHITE_POINT,
            Illuminant::F2 => std_illuminants::F2_WHITE_POINT,
        })
    }

    /// CIE 1931 chromaticity coordinates (x, y)
    pub fn chromaticity(&self) -> (f64, f64) {
        match self {
            Illuminant::D65 => std_illuminants::D65_CHROMATICITY,
            Illuminant::D50 => std_illuminants::D50_CHROMATICITY,
            Illuminant::A => std_illuminants::A_CHROMATICITY,
            Illuminant::F2 => std_illuminants::F2_CHROMATICITY,
        }
    }

    /// Correlated color temperature in Kelvin
    pub fn cct_kelvin(&self) -> f64 {
        match self {
            Illuminant::D65 => std_illuminants::D65_CCT_KELVIN,
            Illuminant::D50 => std_illuminants::D50_CCT_KELVIN,
            Illuminant::A => std_illuminants::A_CCT_KELVIN,
            Illuminant::F2 => std_illuminants::F2_CCT_KELVIN,
        }
    }

    /// Resolve a name, substituting D65 for unknown names
    ///
    /// The substitution is logged and handed back to the caller so it can be
    /// surfaced; it is never applied invisibly.
    pub fn resolve_or_default(name: &str) -> (Illuminant, Option<IlluminantSubstitution>) {
        match name.parse::<Illuminant>() {
            Ok(illuminant) => (illuminant, None),
            Err(_) => {
                tracing::warn!(requested = name, "unknown illuminant, substituting D65");
                (
                    Illuminant::D65,
                    Some(IlluminantSubstitution {
                        requested: name.to_string(),
                        substituted: Illuminant::D65,
                    }),
                )
            }
        }
    }

    /// Bradford chromatic adaptation of an XYZ color from this illuminant to `target`
    pub fn adapt(&self, xyz: XyzColor, target: Illuminant) -> XyzColor {
        if *self == target {
            return xyz;
        }

        let src = mat_vec(&std_illuminants::BRADFORD, self.white_point().to_array());
        let dst = mat_vec(&std_illuminants::BRADFORD, target.white_point().to_array());

        let cone = mat_vec(&std_illuminants::BRADFORD, xyz.to_array());
        let scaled = [
            cone[0] * dst[0] / src[0],
            cone[1] * dst[1] / src[1],
            cone[2] * dst[2] / src[2],
        ];
        XyzColor::from_array(mat_vec(&std_illuminants::BRADFORD_INVERSE, scaled))
    }
}

impl FromStr for Illuminant {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "D65" => Ok(Illuminant::D65),
            "D50" => Ok(Illuminant::D50),
            "A" => Ok(Illuminant::A),
            "F2" => Ok(Illuminant::F2),
            _ => Err(ColorError::configuration(format!(
                "unknown illuminant '{}' (expected one of D65, D50, A, F2)",
                s
            ))),
        }
    }
}

impl fmt::Display for Illuminant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub(crate) fn mat_vec(m: &[[f64; 3]; 3], v: [f64; 3]) -> [f64; 3] {
    [
        m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
        m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
        m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
    ]
}
