//! # Season Scan
//!
//! A Rust crate for diagnosing a person's personal-color "season" from
//! measured skin-color samples.
//!
//! This library provides the color science behind the diagnosis:
//! - sRGB, XYZ, CIE Lab, LCh and HSL conversions under a chosen illuminant
//! - Perceptual color differences (ΔE76, ΔE94, CIEDE2000)
//! - PCCS tone classification
//! - Season and subtype classification with confidence scoring
//!
//! Face detection, camera capture, storage and recommendation tables live in
//! the surrounding application; this crate only consumes color samples and
//! produces serializable results.
//!
//! ## Example
//!
//! ```rust
//! use season_scan::{classify_lab, LabColor, Season};
//!
//! let result = classify_lab(LabColor::new(67.0, 9.0, 16.0))?;
//! assert_eq!(result.season, Season::Spring);
//! println!("{} ({:.0}% fit)", result.label(), result.confidence);
//! # Ok::<(), season_scan::ColorError>(())
//! ```

pub mod cache;
pub mod calibration;
pub mod color;
pub mod config;
pub mod constants;
pub mod error;
pub mod season;

pub use cache::{CacheStats, EvictionPolicy, ReferenceCache};
pub use calibration::{Illuminant, IlluminantSubstitution, PopulationCorrection, SampleCorrection};
pub use color::{
    ColorConverter, DeltaECalculator, DistanceMetric, HslColor, LabColor, LchColor, PccsTone,
    RgbColor, ToneClassifier, ToneResult, XyzColor,
};
pub use config::ClassifierConfig;
pub use error::{ColorError, Result};
pub use season::{
    ClassificationContext, ClassificationResult, ConfidenceEngine, Season, SeasonClassifier,
    Subtype,
};

/// Classify a Lab skin sample with the standard profiles under D65
///
/// # Errors
///
/// Returns `ColorError::InvalidColor` if the sample lies outside the Lab domain.
pub fn classify_lab(lab: LabColor) -> Result<ClassificationResult> {
    SeasonClassifier::new().classify(lab)
}

/// Classify an 8-bit sRGB skin sample with the standard profiles under D65
pub fn classify_rgb(rgb: RgbColor) -> Result<ClassificationResult> {
    SeasonClassifier::new().classify_rgb(rgb)
}
