//! Illuminant and population calibration module
//!
//! This module holds the standard illuminants used for Lab conversion and
//! the caller-supplied corrections applied before season classification.

pub mod illuminant;
pub mod correction;

pub use illuminant::{Illuminant, IlluminantSubstitution};
pub use correction::{PopulationCorrection, SampleCorrection};
