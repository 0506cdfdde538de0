//! Configuration structures for the season classifier.
//!
//! All tunable parameters are grouped by concern and serialize to a single
//! JSON document. The library never touches the filesystem; callers read or
//! write the document and hand the string over.
//!
//! ```
//! use season_scan::ClassifierConfig;
//!
//! let json = r#"{ "conversion": { "illuminant": "D50" } }"#;
//! let config = ClassifierConfig::from_json(json)?;
//! let classifier = config.build_classifier()?;
//! assert_eq!(classifier.converter().illuminant().name(), "D50");
//! # Ok::<(), season_scan::ColorError>(())
//! ```
//!
//! # Configuration Sections
//!
//! - [`ConversionConfig`]: reference illuminant and output precision
//! - [`ConfidenceConfig`]: distance-based confidence parameters
//! - [`CacheConfig`]: optional shared reference cache
//! - `correction`: optional [`PopulationCorrection`] applied to every call

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cache::{EvictionPolicy, ReferenceCache};
use crate::calibration::{Illuminant, PopulationCorrection};
use crate::color::{ColorConverter, DeltaECalculator, DistanceMetric};
use crate::constants::{cache as cache_consts, confidence, limits};
use crate::season::{ConfidenceEngine, SeasonClassifier};
use crate::{ColorError, Result};

/// Complete classifier configuration.
///
/// Every section falls back to its defaults when omitted, so `{}` is a valid
/// document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub conversion: ConversionConfig,
    pub confidence: ConfidenceConfig,
    pub cache: CacheConfig,
    /// Regional reference-population multipliers
    pub correction: Option<PopulationCorrection>,
}

/// Color conversion parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    /// Reference illuminant name: "D65", "D50", "A" or "F2"
    pub illuminant: String,

    /// Decimal places kept on converted values (0-10)
    pub precision: u32,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            illuminant: Illuminant::D65.name().to_string(),
            precision: limits::DEFAULT_PRECISION,
        }
    }
}

/// Distance-based confidence parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceConfig {
    /// ΔE at which distance-based confidence reaches zero
    pub max_distance: f64,

    /// Metric against season reference points: "simplified" or "ciede2000"
    pub distance_metric: DistanceMetric,
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            max_distance: confidence::DEFAULT_MAX_DISTANCE,
            distance_metric: DistanceMetric::default(),
        }
    }
}

/// Reference cache parameters.
///
/// When enabled, conversions and CIEDE2000 results are memoized in bounded
/// caches shared by every clone of the built classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,

    /// Maximum entries per cache
    pub capacity: usize,

    pub eviction: EvictionPolicy,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            capacity: cache_consts::DEFAULT_CAPACITY,
            eviction: EvictionPolicy::default(),
        }
    }
}

impl ClassifierConfig {
    /// Parse a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| ColorError::serialization("invalid classifier configuration", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ColorError::serialization("failed to serialize configuration", e))
    }

    /// Check values that serde alone cannot
    pub fn validate(&self) -> Result<()> {
        self.conversion.illuminant.parse::<Illuminant>()?;
        if self.conversion.precision > limits::MAX_PRECISION {
            return Err(ColorError::configuration(format!(
                "precision {} exceeds maximum of {}",
                self.conversion.precision,
                limits::MAX_PRECISION
            )));
        }
        if !(self.confidence.max_distance.is_finite() && self.confidence.max_distance > 0.0) {
            return Err(ColorError::configuration(format!(
                "max_distance must be positive and finite, got {}",
                self.confidence.max_distance
            )));
        }
        if self.cache.enabled && self.cache.capacity == 0 {
            return Err(ColorError::configuration("cache capacity must be at least 1"));
        }
        if let Some(correction) = &self.correction {
            correction.validate()?;
        }
        Ok(())
    }

    /// Build a classifier, rejecting unknown illuminant names
    pub fn build_classifier(&self) -> Result<SeasonClassifier> {
        let illuminant = self.conversion.illuminant.parse::<Illuminant>()?;
        self.assemble(illuminant)
    }

    /// Build a classifier, substituting D65 for an unknown illuminant name
    ///
    /// The substitution is logged and recorded in every result's diagnostics.
    pub fn build_classifier_lenient(&self) -> Result<SeasonClassifier> {
        let (illuminant, substitution) = Illuminant::resolve_or_default(&self.conversion.illuminant);
        let classifier = self.assemble(illuminant)?;
        Ok(match substitution {
            Some(substitution) => classifier.with_illuminant_substitution(substitution),
            None => classifier,
        })
    }

    fn assemble(&self, illuminant: Illuminant) -> Result<SeasonClassifier> {
        let mut converter = ColorConverter::new()
            .with_illuminant(illuminant)
            .with_precision(self.conversion.precision)?;
        let mut delta_e = DeltaECalculator::new();

        if self.cache.enabled {
            debug!(
                capacity = self.cache.capacity,
                eviction = ?self.cache.eviction,
                "enabling reference caches"
            );
            converter = converter.with_cache(Arc::new(ReferenceCache::new(
                self.cache.capacity,
                self.cache.eviction,
            )?));
            delta_e = DeltaECalculator::with_cache(Arc::new(ReferenceCache::new(
                self.cache.capacity,
                self.cache.eviction,
            )?));
        }

        let engine = ConfidenceEngine::new()
            .with_max_distance(self.confidence.max_distance)?
            .with_metric(self.confidence.distance_metric)
            .with_delta_e(delta_e);

        let classifier = SeasonClassifier::new()
            .with_converter(converter)
            .with_confidence_engine(engine);

        match self.correction {
            Some(correction) => classifier.with_population_correction(correction),
            None => Ok(classifier),
        }
    }
}
