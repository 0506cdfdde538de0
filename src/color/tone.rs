//! PCCS tone classification
//!
//! Maps an HSL color onto one of seven chromatic PCCS tones or three greys.
//! Achromatic colors (saturation below 5%) are split by lightness alone.
//! Chromatic colors are scored against each tone's (saturation, lightness)
//! centre:
//!
//! ```text
//! score = max(0, 100 - (0.6·|L - toneL| + 0.4·|S - toneS|)) + bonus
//! ```
//!
//! with a +10 bonus for vivid (S > 85, L > 65), pale (S < 50, L > 80) and
//! deep (S > 75, L < 45).

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::model::HslColor;
use crate::constants::tone as consts;
use crate::{ColorError, Result};

/// PCCS tone category
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PccsTone {
    Vivid,
    Bright,
    Pale,
    Soft,
    Dull,
    Deep,
    Dark,
    LightGrey,
    MediumGrey,
    DarkGrey,
}

/// (tone, saturation centre, lightness centre) for the chromatic tones
const TONE_CENTRES: [(PccsTone, f64, f64); 7] = [
    (PccsTone::Vivid, 90.0, 50.0),
    (PccsTone::Bright, 75.0, 65.0),
    (PccsTone::Pale, 35.0, 85.0),
    (PccsTone::Soft, 40.0, 65.0),
    (PccsTone::Dull, 30.0, 45.0),
    (PccsTone::Deep, 75.0, 30.0),
    (PccsTone::Dark, 40.0, 20.0),
];

impl PccsTone {
    pub const ALL: [PccsTone; 10] = [
        PccsTone::Vivid,
        PccsTone::Bright,
        PccsTone::Pale,
        PccsTone::Soft,
        PccsTone::Dull,
        PccsTone::Deep,
        PccsTone::Dark,
        PccsTone::LightGrey,
        PccsTone::MediumGrey,
        PccsTone::DarkGrey,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PccsTone::Vivid => "vivid",
            PccsTone::Bright => "bright",
            PccsTone::Pale => "pale",
            PccsTone::Soft => "soft",
            PccsTone::Dull => "dull",
            PccsTone::Deep => "deep",
            PccsTone::Dark => "dark",
            PccsTone::LightGrey => "light_grey",
            PccsTone::MediumGrey => "medium_grey",
            PccsTone::DarkGrey => "dark_grey",
        }
    }

    pub fn is_grey(&self) -> bool {
        matches!(
            self,
            PccsTone::LightGrey | PccsTone::MediumGrey | PccsTone::DarkGrey
        )
    }
}

impl FromStr for PccsTone {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        PccsTone::ALL
            .into_iter()
            .find(|tone| tone.name() == wanted)
            .ok_or_else(|| ColorError::configuration(format!("unknown PCCS tone '{}'", s)))
    }
}

impl fmt::Display for PccsTone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Tone classification outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToneResult {
    pub tone: PccsTone,
    /// 0.0 to 0.95
    pub confidence: f64,
    /// Score per evaluated tone (0-110); greys report only the chosen grey
    pub scores: BTreeMap<PccsTone, f64>,
}

/// Stateless PCCS tone classifier
#[derive(Debug, Clone, Copy, Default)]
pub struct ToneClassifier;

impl ToneClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify a validated HSL color
    pub fn classify(&self, hsl: HslColor) -> Result<ToneResult> {
        hsl.validate()?;
        Ok(classify_raw(hsl))
    }
}

pub(crate) fn classify_raw(hsl: HslColor) -> ToneResult {
    if hsl.s < consts::GREY_SATURATION {
        let (tone, confidence) = if hsl.l > consts::LIGHT_GREY_LIGHTNESS {
            (PccsTone::LightGrey, 0.95)
        } else if hsl.l > consts::MEDIUM_GREY_LIGHTNESS {
            (PccsTone::MediumGrey, 0.90)
        } else {
            (PccsTone::DarkGrey, 0.95)
        };
        let mut scores = BTreeMap::new();
        scores.insert(tone, confidence * 100.0);
        return ToneResult {
            tone,
            confidence,
            scores,
        };
    }

    let mut scores = BTreeMap::new();
    let mut best = (PccsTone::Vivid, f64::NEG_INFINITY);

    for (tone, centre_s, centre_l) in TONE_CENTRES {
        let distance = consts::LIGHTNESS_WEIGHT * (hsl.l - centre_l).abs()
            + consts::SATURATION_WEIGHT * (hsl.s - centre_s).abs();
        let score = (100.0 - distance).max(0.0) + bonus(tone, hsl);
        scores.insert(tone, score);

        // Strict comparison keeps the earlier tone on ties
        if score > best.1 {
            best = (tone, score);
        }
    }

    ToneResult {
        tone: best.0,
        confidence: (best.1 / 100.0).min(consts::MAX_CONFIDENCE),
        scores,
    }
}

fn bonus(tone: PccsTone, hsl: HslColor) -> f64 {
    let applies = match tone {
        PccsTone::Vivid => hsl.s > 85.0 && hsl.l > 65.0,
        PccsTone::Pale => hsl.s < 50.0 && hsl.l > 80.0,
        PccsTone::Deep => hsl.s > 75.0 && hsl.l < 45.0,
        _ => false,
    };
    if applies {
        consts::BONUS
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(h: f64, s: f64, l: f64) -> ToneResult {
        ToneClassifier::new().classify(HslColor::new(h, s, l)).unwrap()
    }

    #[test]
    fn test_grey_tones() {
        let light = classify(0.0, 2.0, 80.0);
        assert_eq!(light.tone, PccsTone::LightGrey);
        assert!((0.90..=0.95).contains(&light.confidence));

        assert_eq!(classify(0.0, 4.9, 60.0).tone, PccsTone::MediumGrey);
        assert_eq!(classify(0.0, 0.0, 40.0).tone, PccsTone::DarkGrey);
        assert_eq!(classify(0.0, 0.0, 75.0).tone, PccsTone::MediumGrey);
    }

    #[test]
    fn test_exact_centres_win() {
        for (tone, s, l) in TONE_CENTRES {
            let result = classify(20.0, s, l);
            assert_eq!(result.tone, tone, "centre of {}", tone);
            assert!((result.confidence - 0.95).abs() < 1e-12);
        }
    }

    #[test]
    fn test_skin_sample_is_soft() {
        // HSL of sRGB (190, 157, 135)
        let result = classify(24.0, 29.73, 63.725);
        assert_eq!(result.tone, PccsTone::Soft);
        let soft = result.scores[&PccsTone::Soft];
        assert!((soft - 95.127).abs() < 1e-3);
        assert!((result.confidence - 0.95).abs() < 1e-12);
    }

    #[test]
    fn test_vivid_bonus() {
        let result = classify(0.0, 95.0, 70.0);
        let vivid = result.scores[&PccsTone::Vivid];
        // 100 - (0.6·20 + 0.4·5) + 10
        assert!((vivid - 96.0).abs() < 1e-9);
        assert_eq!(result.tone, PccsTone::Vivid);
    }

    #[test]
    fn test_deep_bonus() {
        let result = classify(200.0, 80.0, 40.0);
        assert_eq!(result.tone, PccsTone::Deep);
        // 100 - (0.6·10 + 0.4·5) + 10
        assert!((result.scores[&PccsTone::Deep] - 102.0).abs() < 1e-9);
        assert!((result.confidence - 0.95).abs() < 1e-12);
    }

    #[test]
    fn test_pale_bonus() {
        let result = classify(60.0, 30.0, 90.0);
        assert_eq!(result.tone, PccsTone::Pale);
        assert!((result.scores[&PccsTone::Pale] - 105.0).abs() < 1e-9);
    }

    #[test]
    fn test_scores_floor_at_zero() {
        let result = classify(0.0, 100.0, 100.0);
        assert!(result.scores.values().all(|s| *s >= 0.0));
        assert_eq!(result.scores.len(), 7);
    }

    #[test]
    fn test_confidence_capped() {
        let result = classify(0.0, 50.0, 50.0);
        assert!(result.confidence <= 0.95);
        assert!(result.confidence > 0.0);
    }

    #[test]
    fn test_invalid_hsl_rejected() {
        assert!(ToneClassifier::new()
            .classify(HslColor::new(0.0, 120.0, 50.0))
            .is_err());
    }

    #[test]
    fn test_tone_name_parsing() {
        assert_eq!("Soft".parse::<PccsTone>().unwrap(), PccsTone::Soft);
        assert_eq!("light grey".parse::<PccsTone>().unwrap(), PccsTone::LightGrey);
        assert!(matches!(
            "strong".parse::<PccsTone>(),
            Err(ColorError::ConfigurationError { .. })
        ));
    }

    #[test]
    fn test_tone_result_serialization() {
        let result = classify(24.0, 29.73, 63.725);
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"tone\":\"soft\""));
        let back: ToneResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back.tone, result.tone);
    }
}
