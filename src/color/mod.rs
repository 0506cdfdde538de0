//! Color models, conversion and comparison module
//!
//! This module handles color space conversions, perceptual color
//! differences and PCCS tone classification.

pub mod model;
pub mod conversion;
pub mod delta_e;
pub mod tone;

pub use model::{HslColor, LabColor, LchColor, RgbColor, XyzColor};
pub use conversion::ColorConverter;
pub use delta_e::{Cie94Application, Ciede2000Weights, DeltaECalculator, DistanceMetric};
pub use tone::{PccsTone, ToneClassifier, ToneResult};
