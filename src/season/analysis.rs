//! Descriptive labels attached to every classification
//!
//! Temperature, clarity, depth and intensity are bucketed from the sample's
//! Lab values. The temperature bucket also drives the temperature signal of
//! the season classifier.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::LabColor;
use crate::constants::season as consts;

/// Undertone warmth from `b - a`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Temperature {
    VeryWarm,
    Warm,
    Neutral,
    Cool,
    VeryCool,
}

impl Temperature {
    pub fn from_lab(lab: LabColor) -> Self {
        let warmness = lab.b - lab.a;
        if warmness > consts::VERY_WARM_ABOVE {
            Temperature::VeryWarm
        } else if warmness > consts::WARM_ABOVE {
            Temperature::Warm
        } else if warmness > consts::NEUTRAL_ABOVE {
            Temperature::Neutral
        } else if warmness > consts::COOL_ABOVE {
            Temperature::Cool
        } else {
            Temperature::VeryCool
        }
    }

    /// Signed warmth factor in [-1, 1]
    pub fn warmth_factor(&self) -> f64 {
        match self {
            Temperature::VeryWarm => 1.0,
            Temperature::Warm => 0.6,
            Temperature::Neutral => 0.0,
            Temperature::Cool => -0.6,
            Temperature::VeryCool => -1.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Temperature::VeryWarm => "very_warm",
            Temperature::Warm => "warm",
            Temperature::Neutral => "neutral",
            Temperature::Cool => "cool",
            Temperature::VeryCool => "very_cool",
        }
    }
}

/// Clarity bucket from chroma
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Clarity {
    VeryClear,
    Clear,
    Moderate,
    Muted,
    VeryMuted,
}

impl Clarity {
    pub fn from_chroma(chroma: f64) -> Self {
        if chroma > consts::CLARITY_VERY_CLEAR {
            Clarity::VeryClear
        } else if chroma > consts::CLARITY_CLEAR {
            Clarity::Clear
        } else if chroma > consts::CLARITY_MODERATE {
            Clarity::Moderate
        } else if chroma >= consts::CLARITY_MUTED {
            Clarity::Muted
        } else {
            Clarity::VeryMuted
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Clarity::VeryClear => "very_clear",
            Clarity::Clear => "clear",
            Clarity::Moderate => "moderate",
            Clarity::Muted => "muted",
            Clarity::VeryMuted => "very_muted",
        }
    }
}

/// Depth bucket from lightness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Depth {
    VeryLight,
    Light,
    Medium,
    Deep,
    VeryDeep,
}

impl Depth {
    pub fn from_lightness(l: f64) -> Self {
        if l > consts::DEPTH_VERY_LIGHT {
            Depth::VeryLight
        } else if l > consts::DEPTH_LIGHT {
            Depth::Light
        } else if l > consts::DEPTH_MEDIUM {
            Depth::Medium
        } else if l > consts::DEPTH_DEEP {
            Depth::Deep
        } else {
            Depth::VeryDeep
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Depth::VeryLight => "very_light",
            Depth::Light => "light",
            Depth::Medium => "medium",
            Depth::Deep => "deep",
            Depth::VeryDeep => "very_deep",
        }
    }
}

/// Intensity bucket from `chroma · L / 100`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intensity {
    High,
    Medium,
    Low,
    VeryLow,
}

impl Intensity {
    pub fn from_lab(lab: LabColor) -> Self {
        let value = lab.chroma() * lab.l / 100.0;
        if value > consts::INTENSITY_HIGH {
            Intensity::High
        } else if value > consts::INTENSITY_MEDIUM {
            Intensity::Medium
        } else if value > consts::INTENSITY_LOW {
            Intensity::Low
        } else {
            Intensity::VeryLow
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Intensity::High => "high",
            Intensity::Medium => "medium",
            Intensity::Low => "low",
            Intensity::VeryLow => "very_low",
        }
    }
}

macro_rules! display_by_name {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        })*
    };
}

display_by_name!(Temperature, Clarity, Depth, Intensity);

/// Analysis block of a classification result
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub temperature: Temperature,
    pub clarity: Clarity,
    pub depth: Depth,
    pub intensity: Intensity,
    /// `sqrt(a² + b²)`
    pub chroma: f64,
    /// Lab hue angle in degrees, [0, 360)
    pub hue: f64,
}

impl Analysis {
    pub fn from_lab(lab: LabColor) -> Self {
        let chroma = lab.chroma();
        Self {
            temperature: Temperature::from_lab(lab),
            clarity: Clarity::from_chroma(chroma),
            depth: Depth::from_lightness(lab.l),
            intensity: Intensity::from_lab(lab),
            chroma,
            hue: lab.hue_degrees(),
        }
    }
}
