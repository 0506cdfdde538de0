//! Season classifier
//!
//! Each season accumulates four signals:
//!
//! | signal      | budget | source                                   |
//! |-------------|--------|------------------------------------------|
//! | range       | 40     | L/a/b inside the calibrated season range |
//! | temperature | 25     | `b - a` warmth scaled by chroma          |
//! | tone        | 20     | PCCS tone → season table                 |
//! | hue         | 15     | hue-angle bucket bonus                   |
//!
//! Optional population multipliers scale the totals, which are then
//! normalized into a probability distribution. The winning season's
//! calibrated thresholds pick the subtype.

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calibration::{Illuminant, IlluminantSubstitution, PopulationCorrection, SampleCorrection};
use crate::color::{ColorConverter, LabColor, PccsTone, RgbColor, ToneClassifier, ToneResult};
use crate::constants::season as consts;
use crate::season::analysis::{Analysis, Temperature};
use crate::season::confidence::{range_fit_raw, ConfidenceEngine};
use crate::season::profile::{
    tone_season_bonus, validate_profiles, HueBucket, LabRange, Season, SeasonProfile, Subtype,
    STANDARD_PROFILES,
};
use crate::Result;

/// Per-call adjustments resolved by the caller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassificationContext {
    /// Applied to the sample before any scoring
    pub sample_correction: Option<SampleCorrection>,
    /// Overrides the classifier's population correction for this call
    pub population_correction: Option<PopulationCorrection>,
    /// Precomputed tone; skips the Lab → HSL → tone path
    pub tone: Option<ToneResult>,
    /// Precomputed Delta E from the (corrected) sample to each season's
    /// reference point. The winner's entry replaces the distance computation.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub reference_distances: BTreeMap<Season, f64>,
}

impl ClassificationContext {
    pub fn with_sample_correction(mut self, correction: SampleCorrection) -> Self {
        self.sample_correction = Some(correction);
        self
    }

    pub fn with_population_correction(mut self, correction: PopulationCorrection) -> Self {
        self.population_correction = Some(correction);
        self
    }

    pub fn with_tone(mut self, tone: ToneResult) -> Self {
        self.tone = Some(tone);
        self
    }

    pub fn with_reference_distance(mut self, season: Season, delta_e: f64) -> Self {
        self.reference_distances.insert(season, delta_e);
        self
    }
}

/// Raw points one season earned from each signal
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalBreakdown {
    pub range: f64,
    pub temperature: f64,
    pub tone: f64,
    pub hue: f64,
}

impl SignalBreakdown {
    pub fn total(&self) -> f64 {
        self.range + self.temperature + self.tone + self.hue
    }
}

/// How a result was reached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub signals: BTreeMap<Season, SignalBreakdown>,
    /// Signal totals before population correction
    pub raw_totals: BTreeMap<Season, f64>,
    /// Totals after population correction (equal to raw when none applied)
    pub corrected_totals: BTreeMap<Season, f64>,
    /// Totals summed to zero and the uniform distribution was used
    pub uniform_fallback: bool,
    pub tone: PccsTone,
    pub tone_confidence: f64,
    pub hue_bucket: HueBucket,
    /// Delta E to the winning season's reference point
    pub reference_distance: f64,
    /// Chroma-derived scale of the temperature signal, 0.3-1.0
    pub temperature_confidence: f64,
    pub illuminant: Illuminant,
    pub illuminant_substitution: Option<IlluminantSubstitution>,
    pub sample_corrected: bool,
    pub population_corrected: bool,
}

/// Outcome of one classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub season: Season,
    pub subtype: Subtype,
    /// Range-fit confidence of the winning season, 50-100
    pub confidence: f64,
    /// Distance-based confidence against the winning season's reference point, 0-100
    pub reference_confidence: f64,
    /// Normalized probability per season; sums to 1
    pub per_season_scores: BTreeMap<Season, f64>,
    pub analysis: Analysis,
    /// Sample after any correction, as scored
    pub lab: LabColor,
    pub diagnostics: Diagnostics,
}

impl ClassificationResult {
    /// Subtype label, e.g. "deep winter"
    pub fn label(&self) -> &'static str {
        self.subtype.label()
    }

    /// Seasons by descending probability; equal scores keep priority order
    pub fn ranked_seasons(&self) -> Vec<(Season, f64)> {
        let mut ranked: Vec<(Season, f64)> = Season::ALL
            .iter()
            .map(|season| (*season, self.per_season_scores.get(season).copied().unwrap_or(0.0)))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }

    pub fn probability(&self, season: Season) -> f64 {
        self.per_season_scores.get(&season).copied().unwrap_or(0.0)
    }
}

/// Season classifier
///
/// Holds only immutable tables and injected collaborators; `classify` takes
/// `&self` and may be shared across threads.
#[derive(Debug, Clone)]
pub struct SeasonClassifier {
    profiles: [SeasonProfile; 4],
    converter: ColorConverter,
    tone_classifier: ToneClassifier,
    confidence: ConfidenceEngine,
    population_correction: Option<PopulationCorrection>,
    illuminant_substitution: Option<IlluminantSubstitution>,
}

impl Default for SeasonClassifier {
    fn default() -> Self {
        Self {
            profiles: STANDARD_PROFILES,
            converter: ColorConverter::new(),
            tone_classifier: ToneClassifier::new(),
            confidence: ConfidenceEngine::new(),
            population_correction: None,
            illuminant_substitution: None,
        }
    }
}

impl SeasonClassifier {
    /// Classifier with the standard profiles, D65 and no corrections
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the calibrated profiles (must be in spring, summer, autumn, winter order)
    pub fn with_profiles(mut self, profiles: [SeasonProfile; 4]) -> Result<Self> {
        validate_profiles(&profiles)?;
        self.profiles = profiles;
        Ok(self)
    }

    pub fn with_converter(mut self, converter: ColorConverter) -> Self {
        self.converter = converter;
        self
    }

    pub fn with_confidence_engine(mut self, confidence: ConfidenceEngine) -> Self {
        self.confidence = confidence;
        self
    }

    /// Default population correction for every call
    pub fn with_population_correction(mut self, correction: PopulationCorrection) -> Result<Self> {
        correction.validate()?;
        self.population_correction = Some(correction);
        Ok(self)
    }

    /// Record that the converter's illuminant replaced an unknown requested one
    pub fn with_illuminant_substitution(mut self, substitution: IlluminantSubstitution) -> Self {
        self.illuminant_substitution = Some(substitution);
        self
    }

    pub fn profiles(&self) -> &[SeasonProfile; 4] {
        &self.profiles
    }

    pub fn profile(&self, season: Season) -> &SeasonProfile {
        &self.profiles[season.index()]
    }

    pub fn converter(&self) -> &ColorConverter {
        &self.converter
    }

    pub fn confidence_engine(&self) -> &ConfidenceEngine {
        &self.confidence
    }

    /// Classify a Lab sample
    pub fn classify(&self, lab: LabColor) -> Result<ClassificationResult> {
        self.classify_with_context(lab, &ClassificationContext::default())
    }

    /// Classify an 8-bit sRGB sample through the converter
    pub fn classify_rgb(&self, rgb: RgbColor) -> Result<ClassificationResult> {
        let lab = self.converter.rgb_to_lab(rgb)?;
        self.classify(lab)
    }

    /// Classify a hex color such as `#BE9D87`
    pub fn classify_hex(&self, hex: &str) -> Result<ClassificationResult> {
        let rgb = self.converter.hex_to_rgb(hex)?;
        self.classify_rgb(rgb)
    }

    /// Classify many samples in parallel; results keep input order
    pub fn classify_batch(&self, samples: &[LabColor]) -> Vec<Result<ClassificationResult>> {
        samples.par_iter().map(|lab| self.classify(*lab)).collect()
    }

    /// Classify a Lab sample with caller-resolved corrections
    pub fn classify_with_context(
        &self,
        lab: LabColor,
        context: &ClassificationContext,
    ) -> Result<ClassificationResult> {
        lab.validate()?;
        let sample = match &context.sample_correction {
            Some(correction) => correction.apply(lab)?,
            None => lab,
        };

        let tone = match &context.tone {
            Some(tone) => tone.clone(),
            None => {
                let hsl = self.converter.lab_to_hsl(sample)?;
                self.tone_classifier.classify(hsl)?
            }
        };

        let population = match context.population_correction {
            Some(correction) => {
                correction.validate()?;
                Some(correction)
            }
            None => self.population_correction,
        };

        let analysis = Analysis::from_lab(sample);
        let hue_bucket = HueBucket::from_hue(analysis.hue);
        let temperature_confidence = temperature_confidence(analysis.chroma);
        let tone_bonus = tone_season_bonus(tone.tone);
        let hue_bonus = hue_bucket.season_bonus();

        let mut signals = BTreeMap::new();
        let mut raw_totals = [0.0; 4];
        let mut corrected_totals = [0.0; 4];
        for profile in &self.profiles {
            let i = profile.season.index();
            let breakdown = SignalBreakdown {
                range: range_score(sample, &profile.lab_range),
                temperature: temperature_score(
                    profile.season,
                    analysis.temperature,
                    temperature_confidence,
                ),
                tone: tone_bonus[i],
                hue: hue_bonus[i],
            };
            raw_totals[i] = breakdown.total();
            corrected_totals[i] = match population {
                Some(correction) => raw_totals[i] * correction.multiplier(profile.season),
                None => raw_totals[i],
            };
            signals.insert(profile.season, breakdown);
        }

        let (probabilities, uniform_fallback) = normalize(corrected_totals);
        if uniform_fallback {
            debug!(?corrected_totals, "season totals sum to zero, using uniform distribution");
        }

        let season = winning_season(&probabilities);
        let profile = self.profile(season);
        let subtype = profile.subtype_thresholds.resolve(sample);
        let confidence = range_fit_raw(sample, &profile.lab_range);
        let reference_distance = match context.reference_distances.get(&season) {
            Some(&delta_e) => delta_e,
            None => self.confidence.reference_distance(sample, profile)?,
        };
        let reference_confidence = self.confidence.distance_based(reference_distance)?;

        debug!(
            %season,
            %subtype,
            confidence,
            tone = %tone.tone,
            "classified sample"
        );

        Ok(ClassificationResult {
            season,
            subtype,
            confidence,
            reference_confidence,
            per_season_scores: by_season(probabilities),
            analysis,
            lab: sample,
            diagnostics: Diagnostics {
                signals,
                raw_totals: by_season(raw_totals),
                corrected_totals: by_season(corrected_totals),
                uniform_fallback,
                tone: tone.tone,
                tone_confidence: tone.confidence,
                hue_bucket,
                reference_distance,
                temperature_confidence,
                illuminant: self.converter.illuminant(),
                illuminant_substitution: self.illuminant_substitution.clone(),
                sample_corrected: context
                    .sample_correction
                    .map_or(false, |c| !c.is_identity()),
                population_corrected: population.map_or(false, |c| !c.is_identity()),
            },
        })
    }

    /// Tone of a Lab sample as the classifier sees it
    pub fn tone_of(&self, lab: LabColor) -> Result<ToneResult> {
        let hsl = self.converter.lab_to_hsl(lab)?;
        self.tone_classifier.classify(hsl)
    }
}

fn range_score(lab: LabColor, range: &LabRange) -> f64 {
    let channel =
        |weight: f64, outside: f64| (weight - outside * consts::RANGE_PENALTY_PER_UNIT).max(0.0);
    channel(consts::L_WEIGHT, range.l.distance_outside(lab.l))
        + channel(consts::A_WEIGHT, range.a.distance_outside(lab.a))
        + channel(consts::B_WEIGHT, range.b.distance_outside(lab.b))
}

fn temperature_confidence(chroma: f64) -> f64 {
    (chroma / consts::TEMPERATURE_FULL_CHROMA).clamp(consts::TEMPERATURE_MIN_CONFIDENCE, 1.0)
}

/// Half the budget at neutral; warm samples shift points to spring/autumn
fn temperature_score(season: Season, temperature: Temperature, confidence: f64) -> f64 {
    let half = consts::TEMPERATURE_WEIGHT / 2.0;
    let shift = temperature.warmth_factor() * confidence;
    if season.is_warm() {
        half * (1.0 + shift)
    } else {
        half * (1.0 - shift)
    }
}

fn normalize(totals: [f64; 4]) -> ([f64; 4], bool) {
    let sum: f64 = totals.iter().sum();
    if !(sum.is_finite() && sum > 0.0) {
        return ([0.25; 4], true);
    }
    (totals.map(|t| t / sum), false)
}

/// Argmax; strict comparison keeps the higher-priority season on ties
fn winning_season(probabilities: &[f64; 4]) -> Season {
    let mut best = Season::ALL[0];
    for season in Season::ALL.into_iter().skip(1) {
        if probabilities[season.index()] > probabilities[best.index()] {
            best = season;
        }
    }
    best
}

fn by_season(values: [f64; 4]) -> BTreeMap<Season, f64> {
    Season::ALL.into_iter().zip(values).collect()
}
