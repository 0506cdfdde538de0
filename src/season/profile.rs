//! Season profiles and calibration tables
//!
//! The four season profiles, the tone-to-season bonus table and the hue
//! buckets are static, read-only data. A classifier may be built with custom
//! profiles (a different reference population), but nothing mutates a table
//! after construction.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::{LabColor, PccsTone};
use crate::{ColorError, Result};

/// Personal-color season
///
/// Declaration order is the tie-break priority: spring > summer > autumn > winter.
/// The order is arbitrary and only exists so that equal scores resolve
/// deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    /// All seasons in tie-break priority order
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Autumn, Season::Winter];

    pub fn name(&self) -> &'static str {
        match self {
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Autumn => "autumn",
            Season::Winter => "winter",
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Spring and autumn are the warm-undertone seasons
    pub fn is_warm(&self) -> bool {
        matches!(self, Season::Spring | Season::Autumn)
    }
}

impl FromStr for Season {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "spring" => Ok(Season::Spring),
            "summer" => Ok(Season::Summer),
            "autumn" | "fall" => Ok(Season::Autumn),
            "winter" => Ok(Season::Winter),
            _ => Err(ColorError::configuration(format!("unknown season '{}'", s))),
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One of the three subtypes within each season
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subtype {
    LightSpring,
    BrightSpring,
    WarmSpring,
    LightSummer,
    SoftSummer,
    CoolSummer,
    DeepAutumn,
    SoftAutumn,
    WarmAutumn,
    DeepWinter,
    CoolWinter,
    BrightWinter,
}

impl Subtype {
    pub fn season(&self) -> Season {
        match self {
            Subtype::LightSpring | Subtype::BrightSpring | Subtype::WarmSpring => Season::Spring,
            Subtype::LightSummer | Subtype::SoftSummer | Subtype::CoolSummer => Season::Summer,
            Subtype::DeepAutumn | Subtype::SoftAutumn | Subtype::WarmAutumn => Season::Autumn,
            Subtype::DeepWinter | Subtype::CoolWinter | Subtype::BrightWinter => Season::Winter,
        }
    }

    /// Human-readable label, e.g. "deep winter"
    pub fn label(&self) -> &'static str {
        match self {
            Subtype::LightSpring => "light spring",
            Subtype::BrightSpring => "bright spring",
            Subtype::WarmSpring => "warm spring",
            Subtype::LightSummer => "light summer",
            Subtype::SoftSummer => "soft summer",
            Subtype::CoolSummer => "cool summer",
            Subtype::DeepAutumn => "deep autumn",
            Subtype::SoftAutumn => "soft autumn",
            Subtype::WarmAutumn => "warm autumn",
            Subtype::DeepWinter => "deep winter",
            Subtype::CoolWinter => "cool winter",
            Subtype::BrightWinter => "bright winter",
        }
    }
}

impl fmt::Display for Subtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Inclusive [min, max] interval
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, v: f64) -> bool {
        v >= self.min && v <= self.max
    }

    /// Distance from the nearest bound, zero inside
    pub fn distance_outside(&self, v: f64) -> f64 {
        if v < self.min {
            self.min - v
        } else if v > self.max {
            v - self.max
        } else {
            0.0
        }
    }
}

/// Calibrated per-channel Lab range of a season
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabRange {
    pub l: Range,
    pub a: Range,
    pub b: Range,
}

impl LabRange {
    pub fn contains(&self, lab: LabColor) -> bool {
        self.l.contains(lab.l) && self.a.contains(lab.a) && self.b.contains(lab.b)
    }
}

/// Condition on a sample used for subtype resolution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "test", content = "value")]
pub enum SubtypeTest {
    LightnessAbove(f64),
    LightnessBelow(f64),
    ChromaAbove(f64),
    ChromaBelow(f64),
    /// a > b + offset (red outweighs yellow)
    CoolerThan(f64),
}

impl SubtypeTest {
    pub fn matches(&self, lab: LabColor) -> bool {
        match *self {
            SubtypeTest::LightnessAbove(t) => lab.l > t,
            SubtypeTest::LightnessBelow(t) => lab.l < t,
            SubtypeTest::ChromaAbove(t) => lab.chroma() > t,
            SubtypeTest::ChromaBelow(t) => lab.chroma() < t,
            SubtypeTest::CoolerThan(offset) => lab.a > lab.b + offset,
        }
    }
}

/// Ordered subtype rules: first matching test wins, else the fallback
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubtypeThresholds {
    pub primary: (SubtypeTest, Subtype),
    pub secondary: (SubtypeTest, Subtype),
    pub fallback: Subtype,
}

impl SubtypeThresholds {
    pub fn resolve(&self, lab: LabColor) -> Subtype {
        if self.primary.0.matches(lab) {
            self.primary.1
        } else if self.secondary.0.matches(lab) {
            self.secondary.1
        } else {
            self.fallback
        }
    }
}

/// Calibration record for one season
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeasonProfile {
    pub season: Season,
    pub lab_range: LabRange,
    pub subtype_thresholds: SubtypeThresholds,
    /// Population-calibrated centre point
    pub reference_lab: LabColor,
}

/// The four standard season profiles, in [`Season::ALL`] order
pub const STANDARD_PROFILES: [SeasonProfile; 4] = [
    SeasonProfile {
        season: Season::Spring,
        lab_range: LabRange {
            l: Range::new(62.0, 75.0),
            a: Range::new(5.0, 14.0),
            b: Range::new(14.0, 24.0),
        },
        subtype_thresholds: SubtypeThresholds {
            primary: (SubtypeTest::LightnessAbove(70.0), Subtype::LightSpring),
            secondary: (SubtypeTest::ChromaAbove(22.0), Subtype::BrightSpring),
            fallback: Subtype::WarmSpring,
        },
        reference_lab: LabColor::new(68.0, 9.0, 18.0),
    },
    SeasonProfile {
        season: Season::Summer,
        lab_range: LabRange {
            l: Range::new(60.0, 74.0),
            a: Range::new(6.0, 15.0),
            b: Range::new(6.0, 14.0),
        },
        subtype_thresholds: SubtypeThresholds {
            primary: (SubtypeTest::LightnessAbove(70.0), Subtype::LightSummer),
            secondary: (SubtypeTest::ChromaBelow(12.0), Subtype::SoftSummer),
            fallback: Subtype::CoolSummer,
        },
        reference_lab: LabColor::new(67.0, 10.0, 10.0),
    },
    SeasonProfile {
        season: Season::Autumn,
        lab_range: LabRange {
            l: Range::new(50.0, 65.0),
            a: Range::new(8.0, 16.0),
            b: Range::new(16.0, 28.0),
        },
        subtype_thresholds: SubtypeThresholds {
            primary: (SubtypeTest::LightnessBelow(55.0), Subtype::DeepAutumn),
            secondary: (SubtypeTest::ChromaBelow(16.0), Subtype::SoftAutumn),
            fallback: Subtype::WarmAutumn,
        },
        reference_lab: LabColor::new(58.0, 12.0, 21.0),
    },
    SeasonProfile {
        season: Season::Winter,
        lab_range: LabRange {
            l: Range::new(45.0, 62.0),
            a: Range::new(6.0, 15.0),
            b: Range::new(4.0, 14.0),
        },
        subtype_thresholds: SubtypeThresholds {
            primary: (SubtypeTest::LightnessBelow(45.0), Subtype::DeepWinter),
            secondary: (SubtypeTest::CoolerThan(3.0), Subtype::CoolWinter),
            fallback: Subtype::BrightWinter,
        },
        reference_lab: LabColor::new(54.0, 10.0, 9.0),
    },
];

/// Validate a custom profile table
///
/// Profiles must be listed in [`Season::ALL`] order, with ordered ranges,
/// valid reference points and subtypes belonging to their own season.
pub fn validate_profiles(profiles: &[SeasonProfile; 4]) -> Result<()> {
    for (profile, expected) in profiles.iter().zip(Season::ALL) {
        if profile.season != expected {
            return Err(ColorError::configuration(format!(
                "profile for {} found where {} was expected",
                profile.season, expected
            )));
        }
        let range = profile.lab_range;
        for (channel, r) in [("L", range.l), ("a", range.a), ("b", range.b)] {
            if !(r.min.is_finite() && r.max.is_finite() && r.min <= r.max) {
                return Err(ColorError::configuration(format!(
                    "{} range for {} is not an ordered interval",
                    channel, profile.season
                )));
            }
        }
        profile.reference_lab.validate()?;

        let thresholds = profile.subtype_thresholds;
        for subtype in [thresholds.primary.1, thresholds.secondary.1, thresholds.fallback] {
            if subtype.season() != profile.season {
                return Err(ColorError::configuration(format!(
                    "subtype '{}' does not belong to {}",
                    subtype, profile.season
                )));
            }
        }
    }
    Ok(())
}

/// Tone → season bonus in [`Season::ALL`] order (max 20 per season)
pub fn tone_season_bonus(tone: PccsTone) -> [f64; 4] {
    match tone {
        PccsTone::Vivid => [20.0, 0.0, 6.0, 20.0],
        PccsTone::Bright => [20.0, 8.0, 2.0, 10.0],
        PccsTone::Pale => [12.0, 20.0, 0.0, 4.0],
        PccsTone::Soft => [6.0, 16.0, 14.0, 0.0],
        PccsTone::Dull => [0.0, 14.0, 18.0, 2.0],
        PccsTone::Deep => [0.0, 2.0, 18.0, 18.0],
        PccsTone::Dark => [0.0, 4.0, 14.0, 20.0],
        PccsTone::LightGrey => [4.0, 16.0, 0.0, 10.0],
        PccsTone::MediumGrey => [2.0, 12.0, 8.0, 8.0],
        PccsTone::DarkGrey => [0.0, 4.0, 10.0, 16.0],
    }
}

/// Lab hue-angle bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HueBucket {
    Red,
    Orange,
    Yellow,
    YellowGreen,
    Cyan,
    Blue,
    Violet,
    Magenta,
}

/// (bucket, start°, end°, bonus per season); red wraps through 0°
const HUE_BUCKETS: [(HueBucket, f64, f64, [f64; 4]); 8] = [
    (HueBucket::Red, 330.0, 30.0, [0.0, 6.0, 0.0, 9.0]),
    (HueBucket::Orange, 30.0, 60.0, [8.0, 0.0, 12.0, 0.0]),
    (HueBucket::Yellow, 60.0, 90.0, [15.0, 0.0, 8.0, 0.0]),
    (HueBucket::YellowGreen, 90.0, 150.0, [10.0, 0.0, 6.0, 0.0]),
    (HueBucket::Cyan, 150.0, 210.0, [0.0, 10.0, 0.0, 6.0]),
    (HueBucket::Blue, 210.0, 270.0, [0.0, 8.0, 0.0, 12.0]),
    (HueBucket::Violet, 270.0, 300.0, [0.0, 12.0, 0.0, 6.0]),
    (HueBucket::Magenta, 300.0, 330.0, [0.0, 8.0, 0.0, 10.0]),
];

impl HueBucket {
    /// Bucket of a hue angle in degrees (any finite value, wrapped into [0, 360))
    pub fn from_hue(hue: f64) -> HueBucket {
        let h = hue.rem_euclid(360.0);
        for (bucket, start, end, _) in HUE_BUCKETS {
            let inside = if start > end {
                h >= start || h < end
            } else {
                h >= start && h < end
            };
            if inside {
                return bucket;
            }
        }
        HueBucket::Red
    }

    /// Additive season bonus in [`Season::ALL`] order (max 15)
    pub fn season_bonus(&self) -> [f64; 4] {
        HUE_BUCKETS
            .iter()
            .find(|(bucket, ..)| bucket == self)
            .map(|(.., bonus)| *bonus)
            .unwrap_or([0.0; 4])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_profiles_valid() {
        assert!(validate_profiles(&STANDARD_PROFILES).is_ok());
        for (profile, season) in STANDARD_PROFILES.iter().zip(Season::ALL) {
            assert_eq!(profile.season, season);
            assert!(profile.lab_range.contains(profile.reference_lab));
        }
    }

    #[test]
    fn test_profile_order_enforced() {
        let mut swapped = STANDARD_PROFILES;
        swapped.swap(0, 1);
        assert!(validate_profiles(&swapped).is_err());
    }

    #[test]
    fn test_foreign_subtype_rejected() {
        let mut profiles = STANDARD_PROFILES;
        profiles[0].subtype_thresholds.fallback = Subtype::DeepWinter;
        assert!(validate_profiles(&profiles).is_err());
    }

    #[test]
    fn test_season_priority_order() {
        assert!(Season::Spring < Season::Summer);
        assert!(Season::Summer < Season::Autumn);
        assert!(Season::Autumn < Season::Winter);
        assert_eq!(Season::Winter.index(), 3);
    }

    #[test]
    fn test_season_parsing() {
        assert_eq!("Winter".parse::<Season>().unwrap(), Season::Winter);
        assert_eq!("fall".parse::<Season>().unwrap(), Season::Autumn);
        assert!(matches!(
            "monsoon".parse::<Season>(),
            Err(ColorError::ConfigurationError { .. })
        ));
    }

    #[test]
    fn test_range_distance() {
        let r = Range::new(10.0, 20.0);
        assert_eq!(r.distance_outside(15.0), 0.0);
        assert_eq!(r.distance_outside(7.5), 2.5);
        assert_eq!(r.distance_outside(23.0), 3.0);
        assert!(r.contains(10.0) && r.contains(20.0));
    }

    #[test]
    fn test_winter_subtypes() {
        let thresholds = STANDARD_PROFILES[3].subtype_thresholds;
        assert_eq!(thresholds.resolve(LabColor::new(40.0, 10.0, 2.0)), Subtype::DeepWinter);
        assert_eq!(thresholds.resolve(LabColor::new(50.0, 12.0, 2.0)), Subtype::CoolWinter);
        assert_eq!(thresholds.resolve(LabColor::new(50.0, 8.0, 9.0)), Subtype::BrightWinter);
    }

    #[test]
    fn test_spring_subtypes() {
        let thresholds = STANDARD_PROFILES[0].subtype_thresholds;
        assert_eq!(thresholds.resolve(LabColor::new(73.0, 10.0, 20.0)), Subtype::LightSpring);
        assert_eq!(thresholds.resolve(LabColor::new(66.0, 12.0, 22.0)), Subtype::BrightSpring);
        assert_eq!(thresholds.resolve(LabColor::new(67.0, 9.0, 16.0)), Subtype::WarmSpring);
    }

    #[test]
    fn test_subtypes_belong_to_season() {
        for profile in STANDARD_PROFILES {
            let t = profile.subtype_thresholds;
            assert_eq!(t.primary.1.season(), profile.season);
            assert_eq!(t.secondary.1.season(), profile.season);
            assert_eq!(t.fallback.season(), profile.season);
        }
    }

    #[test]
    fn test_hue_buckets_cover_circle() {
        assert_eq!(HueBucket::from_hue(0.0), HueBucket::Red);
        assert_eq!(HueBucket::from_hue(345.0), HueBucket::Red);
        assert_eq!(HueBucket::from_hue(29.99), HueBucket::Red);
        assert_eq!(HueBucket::from_hue(30.0), HueBucket::Orange);
        assert_eq!(HueBucket::from_hue(60.6), HueBucket::Yellow);
        assert_eq!(HueBucket::from_hue(120.0), HueBucket::YellowGreen);
        assert_eq!(HueBucket::from_hue(180.0), HueBucket::Cyan);
        assert_eq!(HueBucket::from_hue(243.4), HueBucket::Blue);
        assert_eq!(HueBucket::from_hue(285.0), HueBucket::Violet);
        assert_eq!(HueBucket::from_hue(315.0), HueBucket::Magenta);
        assert_eq!(HueBucket::from_hue(-30.0), HueBucket::Red);
    }

    #[test]
    fn test_bonus_budgets() {
        for tone in PccsTone::ALL {
            assert!(tone_season_bonus(tone).iter().all(|b| (0.0..=20.0).contains(b)));
        }
        for (bucket, ..) in HUE_BUCKETS {
            let bonus = bucket.season_bonus();
            assert!(bonus.iter().all(|b| (0.0..=15.0).contains(b)));
            let favoured = bonus.iter().filter(|b| **b > 0.0).count();
            assert!((1..=2).contains(&favoured));
        }
    }

    #[test]
    fn test_subtype_labels() {
        assert_eq!(Subtype::DeepWinter.to_string(), "deep winter");
        let json = serde_json::to_string(&Subtype::SoftSummer).unwrap();
        assert_eq!(json, "\"soft_summer\"");
    }
}
