//! Perceptual color-difference metrics
//!
//! - ΔE76: Euclidean distance in Lab
//! - ΔE94: chroma-weighted distance, graphic-arts or textile constants
//! - ΔE2000 (CIEDE2000): CIE 142-2001, checked against the Sharma, Wu &
//!   Dalal (2005) reference pairs
//!
//! [`simplified_distance`] is kept apart from [`ciede2000`]. It is the plain
//! Euclidean distance the season reference lookup has always used, and the
//! two produce materially different numbers; they must not be merged.
//!
//! All metrics are pure. [`DeltaECalculator`] optionally memoizes CIEDE2000.

use std::f64::consts::PI;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::cache::{CacheKey, CacheOp, ReferenceCache};
use crate::color::model::{hue_angle, LabColor};
use crate::constants::delta_e as consts;
use crate::Result;

/// CIE94 application domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cie94Application {
    #[default]
    GraphicArts,
    Textiles,
}

impl Cie94Application {
    /// (kL, K1, K2)
    fn constants(&self) -> (f64, f64, f64) {
        match self {
            Cie94Application::GraphicArts => (1.0, consts::GRAPHICS_K1, consts::GRAPHICS_K2),
            Cie94Application::Textiles => {
                (consts::TEXTILES_KL, consts::TEXTILES_K1, consts::TEXTILES_K2)
            }
        }
    }
}

/// CIEDE2000 parametric weighting factors
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ciede2000Weights {
    pub kl: f64,
    pub kc: f64,
    pub kh: f64,
}

impl Default for Ciede2000Weights {
    fn default() -> Self {
        Self {
            kl: 1.0,
            kc: 1.0,
            kh: 1.0,
        }
    }
}

/// Metric used when comparing a sample against season reference points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    /// Euclidean Lab distance, see [`simplified_distance`]
    #[default]
    Simplified,
    /// Full CIEDE2000
    Ciede2000,
}

/// ΔE76 between two validated Lab colors
pub fn delta_e76(lab1: LabColor, lab2: LabColor) -> Result<f64> {
    lab1.validate()?;
    lab2.validate()?;
    Ok(euclidean(lab1, lab2))
}

/// Euclidean Lab distance used by the season reference lookup
///
/// Numerically identical to ΔE76. It exists under its own name because
/// callers historically treated it as a "ΔE2000"; it is not one.
pub fn simplified_distance(lab1: LabColor, lab2: LabColor) -> Result<f64> {
    lab1.validate()?;
    lab2.validate()?;
    Ok(euclidean(lab1, lab2))
}

/// ΔE94 with the given application constants
pub fn delta_e94(lab1: LabColor, lab2: LabColor, application: Cie94Application) -> Result<f64> {
    lab1.validate()?;
    lab2.validate()?;
    Ok(delta_e94_raw(lab1, lab2, application))
}

/// CIEDE2000 with kL = kC = kH = 1
pub fn ciede2000(lab1: LabColor, lab2: LabColor) -> Result<f64> {
    ciede2000_weighted(lab1, lab2, Ciede2000Weights::default())
}

/// CIEDE2000 with explicit parametric factors
pub fn ciede2000_weighted(
    lab1: LabColor,
    lab2: LabColor,
    weights: Ciede2000Weights,
) -> Result<f64> {
    lab1.validate()?;
    lab2.validate()?;
    Ok(ciede2000_raw(lab1, lab2, weights))
}

/// Distance under a selectable metric
pub fn distance(lab1: LabColor, lab2: LabColor, metric: DistanceMetric) -> Result<f64> {
    match metric {
        DistanceMetric::Simplified => simplified_distance(lab1, lab2),
        DistanceMetric::Ciede2000 => ciede2000(lab1, lab2),
    }
}

fn euclidean(lab1: LabColor, lab2: LabColor) -> f64 {
    let dl = lab1.l - lab2.l;
    let da = lab1.a - lab2.a;
    let db = lab1.b - lab2.b;
    (dl * dl + da * da + db * db).sqrt()
}

fn delta_e94_raw(lab1: LabColor, lab2: LabColor, application: Cie94Application) -> f64 {
    let (kl, k1, k2) = application.constants();

    let c1 = lab1.chroma();
    let c2 = lab2.chroma();

    let dl = lab1.l - lab2.l;
    let dc = c1 - c2;
    let da = lab1.a - lab2.a;
    let db = lab1.b - lab2.b;
    let dh = (da * da + db * db - dc * dc).max(0.0).sqrt();

    let sl = 1.0;
    let sc = 1.0 + k1 * c1;
    let sh = 1.0 + k2 * c1;

    let tl = dl / (kl * sl);
    let tc = dc / sc;
    let th = dh / sh;
    (tl * tl + tc * tc + th * th).sqrt()
}

fn ciede2000_raw(lab1: LabColor, lab2: LabColor, weights: Ciede2000Weights) -> f64 {
    let c1 = lab1.chroma();
    let c2 = lab2.chroma();
    let c_bar = (c1 + c2) / 2.0;

    let c_bar7 = c_bar.powi(7);
    let g = 0.5 * (1.0 - (c_bar7 / (c_bar7 + consts::POW25_7)).sqrt());

    let a1p = lab1.a * (1.0 + g);
    let a2p = lab2.a * (1.0 + g);

    let c1p = a1p.hypot(lab1.b);
    let c2p = a2p.hypot(lab2.b);

    let h1p = hue_angle(a1p, lab1.b);
    let h2p = hue_angle(a2p, lab2.b);

    let dl_p = lab2.l - lab1.l;
    let dc_p = c2p - c1p;

    // Either color achromatic: hue difference is undefined and taken as 0
    let chroma_product = c1p * c2p;
    let dh_p = if chroma_product == 0.0 {
        0.0
    } else {
        let diff = h2p - h1p;
        if diff > 180.0 {
            diff - 360.0
        } else if diff < -180.0 {
            diff + 360.0
        } else {
            diff
        }
    };
    let dh_big = 2.0 * chroma_product.sqrt() * (dh_p.to_radians() / 2.0).sin();

    let l_bar_p = (lab1.l + lab2.l) / 2.0;
    let c_bar_p = (c1p + c2p) / 2.0;

    let h_bar_p = if chroma_product == 0.0 {
        h1p + h2p
    } else if (h1p - h2p).abs() <= 180.0 {
        (h1p + h2p) / 2.0
    } else if h1p + h2p < 360.0 {
        (h1p + h2p + 360.0) / 2.0
    } else {
        (h1p + h2p - 360.0) / 2.0
    };

    let t = 1.0 - 0.17 * (h_bar_p - 30.0).to_radians().cos()
        + 0.24 * (2.0 * h_bar_p).to_radians().cos()
        + 0.32 * (3.0 * h_bar_p + 6.0).to_radians().cos()
        - 0.20 * (4.0 * h_bar_p - 63.0).to_radians().cos();

    let d_theta = 30.0 * (-((h_bar_p - 275.0) / 25.0).powi(2)).exp();
    let c_bar_p7 = c_bar_p.powi(7);
    let rc = 2.0 * (c_bar_p7 / (c_bar_p7 + consts::POW25_7)).sqrt();
    let rt = -(2.0 * d_theta * PI / 180.0).sin() * rc;

    let l50 = (l_bar_p - 50.0).powi(2);
    let sl = 1.0 + 0.015 * l50 / (20.0 + l50).sqrt();
    let sc = 1.0 + 0.045 * c_bar_p;
    let sh = 1.0 + 0.015 * c_bar_p * t;

    let tl = dl_p / (weights.kl * sl);
    let tc = dc_p / (weights.kc * sc);
    let th = dh_big / (weights.kh * sh);

    (tl * tl + tc * tc + th * th + rt * tc * th).max(0.0).sqrt()
}

/// Color-difference calculator with optional CIEDE2000 memoization
#[derive(Debug, Clone, Default)]
pub struct DeltaECalculator {
    cache: Option<Arc<ReferenceCache<f64>>>,
}

impl DeltaECalculator {
    pub fn new() -> Self {
        Self { cache: None }
    }

    /// Memoize CIEDE2000 results keyed by rounded inputs and weights
    pub fn with_cache(cache: Arc<ReferenceCache<f64>>) -> Self {
        Self { cache: Some(cache) }
    }

    pub fn delta_e76(&self, lab1: LabColor, lab2: LabColor) -> Result<f64> {
        delta_e76(lab1, lab2)
    }

    pub fn delta_e94(
        &self,
        lab1: LabColor,
        lab2: LabColor,
        application: Cie94Application,
    ) -> Result<f64> {
        delta_e94(lab1, lab2, application)
    }

    pub fn delta_e2000(&self, lab1: LabColor, lab2: LabColor) -> Result<f64> {
        self.delta_e2000_weighted(lab1, lab2, Ciede2000Weights::default())
    }

    pub fn delta_e2000_weighted(
        &self,
        lab1: LabColor,
        lab2: LabColor,
        weights: Ciede2000Weights,
    ) -> Result<f64> {
        lab1.validate()?;
        lab2.validate()?;

        match &self.cache {
            Some(cache) => {
                let key = CacheKey::new(
                    CacheOp::DeltaE2000,
                    &[
                        lab1.l, lab1.a, lab1.b, lab2.l, lab2.a, lab2.b, weights.kl, weights.kc,
                        weights.kh,
                    ],
                );
                cache.get_or_try_insert(key, || Ok(ciede2000_raw(lab1, lab2, weights)))
            }
            None => Ok(ciede2000_raw(lab1, lab2, weights)),
        }
    }

    pub fn simplified_distance(&self, lab1: LabColor, lab2: LabColor) -> Result<f64> {
        simplified_distance(lab1, lab2)
    }

    pub fn distance(&self, lab1: LabColor, lab2: LabColor, metric: DistanceMetric) -> Result<f64> {
        match metric {
            DistanceMetric::Simplified => self.simplified_distance(lab1, lab2),
            DistanceMetric::Ciede2000 => self.delta_e2000(lab1, lab2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::EvictionPolicy;
    use crate::ColorError;

    /// Sharma, Wu & Dalal (2005), selected pairs with ΔE00 to 4 decimals
    const SHARMA_PAIRS: [([f64; 3], [f64; 3], f64); 7] = [
        ([50.0, 2.6772, -79.7751], [50.0, 0.0, -82.7485], 2.0425),
        ([50.0, 0.0, 0.0], [50.0, -1.0, 2.0], 2.3669),
        ([50.0, 2.49, -0.001], [50.0, -2.49, 0.0009], 7.1792),
        ([50.0, 2.5, 0.0], [73.0, 25.0, -18.0], 27.1492),
        ([60.2574, -34.0099, 36.2677], [60.4626, -34.1751, 39.4387], 1.2644),
        ([22.7233, 20.0904, -46.6940], [23.0331, 14.9730, -42.5619], 2.0373),
        ([2.0776, 0.0795, -1.1350], [0.9033, -0.0636, -0.5514], 0.9082),
    ];

    fn lab(v: [f64; 3]) -> LabColor {
        LabColor::new(v[0], v[1], v[2])
    }

    #[test]
    fn test_ciede2000_reference_pairs() {
        for (a, b, expected) in SHARMA_PAIRS {
            let de = ciede2000(lab(a), lab(b)).unwrap();
            assert!(
                (de - expected).abs() < 1e-4,
                "{:?} vs {:?}: got {}, expected {}",
                a,
                b,
                de,
                expected
            );
        }
    }

    #[test]
    fn test_ciede2000_symmetric() {
        for (a, b, _) in SHARMA_PAIRS {
            let forward = ciede2000(lab(a), lab(b)).unwrap();
            let backward = ciede2000(lab(b), lab(a)).unwrap();
            assert!((forward - backward).abs() < 1e-9);
        }
    }

    #[test]
    fn test_identity_is_zero() {
        for v in [[50.0, 0.0, 0.0], [67.0, 9.0, 16.0], [0.0, -128.0, 127.0], [100.0, 0.0, 0.0]] {
            let x = lab(v);
            assert_eq!(delta_e76(x, x).unwrap(), 0.0);
            assert_eq!(delta_e94(x, x, Cie94Application::GraphicArts).unwrap(), 0.0);
            assert_eq!(delta_e94(x, x, Cie94Application::Textiles).unwrap(), 0.0);
            assert_eq!(ciede2000(x, x).unwrap(), 0.0);
        }
    }

    #[test]
    fn test_delta_e76_monotonic_in_lightness() {
        let base = LabColor::new(20.0, 5.0, -5.0);
        let mut previous = 0.0;
        for step in 1..=20 {
            let other = LabColor::new(20.0 + step as f64 * 3.0, 5.0, -5.0);
            let de = delta_e76(base, other).unwrap();
            assert!(de > previous);
            previous = de;
        }
    }

    #[test]
    fn test_delta_e76_known_value() {
        let de = delta_e76(LabColor::new(50.0, 0.0, 0.0), LabColor::new(53.0, 4.0, 0.0)).unwrap();
        assert!((de - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_delta_e94_values() {
        let a = LabColor::new(50.0, 2.5, 0.0);
        let b = LabColor::new(73.0, 25.0, -18.0);
        let graphics = delta_e94(a, b, Cie94Application::GraphicArts).unwrap();
        let textiles = delta_e94(a, b, Cie94Application::Textiles).unwrap();
        assert!((graphics - 34.6892).abs() < 1e-3);
        assert!((textiles - 28.2503).abs() < 1e-3);
        // kL = 2 halves the lightness contribution
        assert!(textiles < graphics);
    }

    #[test]
    fn test_delta_e94_hue_term_never_negative() {
        // Pure chroma change: Δa² + Δb² - ΔC² is zero up to rounding
        let a = LabColor::new(50.0, 0.0, 0.0);
        let b = LabColor::new(50.0, 10.0, 0.0);
        let de = delta_e94(a, b, Cie94Application::GraphicArts).unwrap();
        assert!((de - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_simplified_distance_differs_from_ciede2000() {
        let a = LabColor::new(50.0, 2.5, 0.0);
        let b = LabColor::new(73.0, 25.0, -18.0);
        let simple = simplified_distance(a, b).unwrap();
        let full = ciede2000(a, b).unwrap();
        assert_eq!(simple, delta_e76(a, b).unwrap());
        assert!((simple - full).abs() > 5.0);
        assert_eq!(distance(a, b, DistanceMetric::Ciede2000).unwrap(), full);
    }

    #[test]
    fn test_weights_scale_lightness_term() {
        let a = LabColor::new(40.0, 0.0, 0.0);
        let b = LabColor::new(60.0, 0.0, 0.0);
        let unit = ciede2000(a, b).unwrap();
        let halved = ciede2000_weighted(
            a,
            b,
            Ciede2000Weights {
                kl: 2.0,
                ..Default::default()
            },
        )
        .unwrap();
        assert!((halved - unit / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_input_rejected() {
        let good = LabColor::new(50.0, 0.0, 0.0);
        let bad = LabColor::new(50.0, 0.0, 300.0);
        assert!(matches!(delta_e76(good, bad), Err(ColorError::InvalidColor { .. })));
        assert!(delta_e94(bad, good, Cie94Application::Textiles).is_err());
        assert!(ciede2000(good, bad).is_err());
        assert!(simplified_distance(bad, good).is_err());
    }

    #[test]
    fn test_calculator_cache() {
        let cache = Arc::new(ReferenceCache::new(16, EvictionPolicy::LeastRecentlyUsed).unwrap());
        let calc = DeltaECalculator::with_cache(Arc::clone(&cache));
        let (a, b, expected) = SHARMA_PAIRS[3];

        let first = calc.delta_e2000(lab(a), lab(b)).unwrap();
        let second = calc.delta_e2000(lab(a), lab(b)).unwrap();
        assert!((first - expected).abs() < 1e-4);
        assert_eq!(first, second);
        assert_eq!(cache.stats().hits, 1);

        // Different weights are a different key
        let weighted = calc
            .delta_e2000_weighted(lab(a), lab(b), Ciede2000Weights { kl: 2.0, kc: 1.0, kh: 1.0 })
            .unwrap();
        assert!(weighted < first);
        assert_eq!(cache.stats().misses, 2);
    }
}
