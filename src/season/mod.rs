//! Season classification module
//!
//! Turns a Lab skin sample into a season, a subtype within that season, and
//! confidence scores. Classification is score-then-normalize over four
//! signals (calibrated range, temperature, PCCS tone, hue bucket).

pub mod analysis;
pub mod classifier;
pub mod confidence;
pub mod profile;

pub use analysis::{Analysis, Clarity, Depth, Intensity, Temperature};
pub use classifier::{
    ClassificationContext, ClassificationResult, Diagnostics, SeasonClassifier, SignalBreakdown,
};
pub use confidence::{ConfidenceEngine, NearestReference};
pub use profile::{
    HueBucket, LabRange, Range, Season, SeasonProfile, Subtype, SubtypeTest, SubtypeThresholds,
    STANDARD_PROFILES,
};
