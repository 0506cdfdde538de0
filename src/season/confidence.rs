//! Confidence scoring for season assignments
//!
//! Two independent signals are exposed and never merged:
//! - range-fit: how well a sample sits inside a season's calibrated Lab range
//!   (100 minus fixed per-channel penalties, floored at 50)
//! - distance-based: `max(0, (1 - ΔE / max_distance) · 100)` against a
//!   season reference point

use serde::{Deserialize, Serialize};

use crate::color::{DeltaECalculator, DistanceMetric, LabColor};
use crate::constants::confidence as consts;
use crate::season::profile::{LabRange, SeasonProfile};
use crate::season::Season;
use crate::{ColorError, Result};

/// Season reference point closest to a sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NearestReference {
    pub season: Season,
    /// Distance under `metric`
    pub distance: f64,
    pub metric: DistanceMetric,
    /// Distance-based confidence, 0-100
    pub confidence: f64,
}

/// Confidence engine
#[derive(Debug, Clone)]
pub struct ConfidenceEngine {
    max_distance: f64,
    metric: DistanceMetric,
    delta_e: DeltaECalculator,
}

impl Default for ConfidenceEngine {
    fn default() -> Self {
        Self {
            max_distance: consts::DEFAULT_MAX_DISTANCE,
            metric: DistanceMetric::default(),
            delta_e: DeltaECalculator::new(),
        }
    }
}

impl ConfidenceEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the ΔE at which distance-based confidence reaches zero
    pub fn with_max_distance(mut self, max_distance: f64) -> Result<Self> {
        if !(max_distance.is_finite() && max_distance > 0.0) {
            return Err(ColorError::configuration(format!(
                "max_distance must be positive and finite, got {}",
                max_distance
            )));
        }
        self.max_distance = max_distance;
        Ok(self)
    }

    pub fn with_metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = metric;
        self
    }

    pub fn with_delta_e(mut self, delta_e: DeltaECalculator) -> Self {
        self.delta_e = delta_e;
        self
    }

    pub fn max_distance(&self) -> f64 {
        self.max_distance
    }

    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    /// Range-fit confidence of a sample against a calibrated range, in [50, 100]
    pub fn range_fit(&self, lab: LabColor, range: &LabRange) -> Result<f64> {
        lab.validate()?;
        Ok(range_fit_raw(lab, range))
    }

    /// Distance-based confidence for a precomputed ΔE, in [0, 100]
    ///
    /// Negative or non-finite distances are rejected.
    pub fn distance_based(&self, delta_e: f64) -> Result<f64> {
        if !(delta_e.is_finite() && delta_e >= 0.0) {
            return Err(ColorError::invalid_color(
                "delta E",
                "distance",
                delta_e,
                "finite and non-negative",
            ));
        }
        Ok(((1.0 - delta_e / self.max_distance) * 100.0).max(0.0))
    }

    /// Distance-based confidence of a sample against one season's reference point
    pub fn reference_confidence(&self, lab: LabColor, profile: &SeasonProfile) -> Result<f64> {
        self.distance_based(self.reference_distance(lab, profile)?)
    }

    /// Delta E from a sample to one season's reference point under the configured metric
    pub fn reference_distance(&self, lab: LabColor, profile: &SeasonProfile) -> Result<f64> {
        self.delta_e.distance(lab, profile.reference_lab, self.metric)
    }

    /// Closest season reference point under the configured metric
    ///
    /// Ties resolve to the earlier profile.
    pub fn nearest_reference(
        &self,
        lab: LabColor,
        profiles: &[SeasonProfile],
    ) -> Result<NearestReference> {
        let mut nearest: Option<(Season, f64)> = None;
        for profile in profiles {
            let distance = self.delta_e.distance(lab, profile.reference_lab, self.metric)?;
            if nearest.map_or(true, |(_, best)| distance < best) {
                nearest = Some((profile.season, distance));
            }
        }

        let (season, distance) = nearest
            .ok_or_else(|| ColorError::configuration("no season profiles to compare against"))?;

        Ok(NearestReference {
            season,
            distance,
            metric: self.metric,
            confidence: self.distance_based(distance)?,
        })
    }
}

pub(crate) fn range_fit_raw(lab: LabColor, range: &LabRange) -> f64 {
    let mut confidence = consts::RANGE_FIT_START;
    if !range.l.contains(lab.l) {
        confidence -= consts::L_PENALTY;
    }
    if !range.a.contains(lab.a) {
        confidence -= consts::A_PENALTY;
    }
    if !range.b.contains(lab.b) {
        confidence -= consts::B_PENALTY;
    }
    confidence.max(consts::RANGE_FIT_FLOOR)
}
