//! Integration tests for the season classification pipeline
//!
//! These tests exercise the public API end to end:
//! - Color space conversion scenarios
//! - Delta E reference values
//! - Season classification, confidence bounds and determinism
//! - Configuration-driven construction and shared caches
//! - Error handling for out-of-domain input

use std::sync::Arc;

use season_scan::color::delta_e::{ciede2000, simplified_distance};
use season_scan::season::HueBucket;
use season_scan::{
    classify_lab, ClassificationContext, ClassificationResult, ClassifierConfig, ColorConverter,
    ColorError, ConfidenceEngine, DistanceMetric, EvictionPolicy, HslColor, Illuminant, LabColor,
    PccsTone, PopulationCorrection, ReferenceCache, RgbColor, SampleCorrection, Season,
    SeasonClassifier, Subtype, ToneClassifier,
};

// ============================================================================
// Conversion Scenarios
// ============================================================================

#[test]
fn test_white_and_black_points() {
    let converter = ColorConverter::new();

    let white = converter.rgb_to_lab(RgbColor::new(255, 255, 255)).unwrap();
    assert!((white.l - 100.0).abs() < 0.01);
    assert!(white.a.abs() < 0.01);
    assert!(white.b.abs() < 0.01);

    let black = converter.rgb_to_lab(RgbColor::new(0, 0, 0)).unwrap();
    assert_eq!(black, LabColor::new(0.0, 0.0, 0.0));
}

#[test]
fn test_rgb_round_trip_grid() {
    let converter = ColorConverter::new();
    for r in (0..=255).step_by(15) {
        for g in (0..=255).step_by(15) {
            for b in (0..=255).step_by(15) {
                let rgb = RgbColor::new(r as u8, g as u8, b as u8);
                let lab = converter.rgb_to_lab(rgb).unwrap();
                assert_eq!(converter.lab_to_rgb(lab).unwrap(), rgb, "{:?}", rgb);
            }
        }
    }
}

#[test]
fn test_round_trip_at_every_precision() {
    for precision in 0..=10 {
        let converter = ColorConverter::new().with_precision(precision).unwrap();
        let classifier = SeasonClassifier::new().with_converter(converter.clone());

        for r in (0..=255).step_by(15) {
            for g in (0..=255).step_by(15) {
                for b in (0..=255).step_by(15) {
                    let rgb = RgbColor::new(r as u8, g as u8, b as u8);
                    let lab = converter.rgb_to_lab(rgb).unwrap();
                    let back = converter.lab_to_rgb(lab).unwrap();
                    // Whole or tenth units of L*a*b* cannot resolve every 8-bit step
                    if precision >= 2 {
                        assert_eq!(back, rgb, "{:?} at precision {}", rgb, precision);
                    }
                }
            }
        }

        let white = classifier.classify_rgb(RgbColor::new(255, 255, 255)).unwrap();
        assert!((50.0..=100.0).contains(&white.confidence));
        assert!(classifier.classify_hex("#FFFFFF").is_ok());
        assert!(classifier.classify_hex("#000000").is_ok());
    }
}

#[test]
fn test_non_d65_illuminant_keeps_srgb_in_domain() {
    for illuminant in [Illuminant::D50, Illuminant::A, Illuminant::F2] {
        let classifier = SeasonClassifier::new()
            .with_converter(ColorConverter::new().with_illuminant(illuminant));

        let white = classifier.converter().rgb_to_lab(RgbColor::new(255, 255, 255)).unwrap();
        assert_eq!(white.l, 100.0);
        assert!(white.a.abs() < 1e-3 && white.b.abs() < 1e-3);

        let blue = classifier.classify_rgb(RgbColor::new(0, 0, 255)).unwrap();
        assert!((0.0..=100.0).contains(&blue.reference_confidence));
        assert_eq!(blue.diagnostics.illuminant, illuminant);

        let skin = classifier.classify_hex("#BE9D87").unwrap();
        assert_eq!(skin.subtype.season(), skin.season);
    }
}

#[test]
fn test_hex_skin_sample() {
    let converter = ColorConverter::new();
    let rgb = converter.hex_to_rgb("#be9d87").unwrap();
    assert_eq!(rgb, RgbColor::new(190, 157, 135));
    assert_eq!(converter.rgb_to_hex(rgb), "#BE9D87");

    let hsl = converter.rgb_to_hsl(rgb).unwrap();
    assert_eq!(hsl, HslColor::new(24.0, 29.73, 63.725));
}

// ============================================================================
// Delta E
// ============================================================================

#[test]
fn test_distance_functions_stay_distinct() {
    let a = LabColor::new(50.0, 2.6772, -79.7751);
    let b = LabColor::new(50.0, 0.0, -82.7485);

    let de2000 = ciede2000(a, b).unwrap();
    let euclidean = simplified_distance(a, b).unwrap();
    assert!((de2000 - 2.0425).abs() < 1e-4);
    assert!((euclidean - 4.0010).abs() < 1e-3);
}

#[test]
fn test_delta_e_symmetry_and_identity() {
    let samples = [
        LabColor::new(67.0, 9.0, 16.0),
        LabColor::new(20.0, -5.0, -10.0),
        LabColor::new(90.0, 0.0, 0.0),
        LabColor::new(45.0, 60.0, 40.0),
    ];
    for x in samples {
        assert_eq!(ciede2000(x, x).unwrap(), 0.0);
        for y in samples {
            let forward = ciede2000(x, y).unwrap();
            let backward = ciede2000(y, x).unwrap();
            assert!((forward - backward).abs() < 1e-9);
            assert!(forward >= 0.0);
        }
    }
}

// ============================================================================
// Season Classification
// ============================================================================

#[test]
fn test_spring_sample_high_range_fit() {
    let result = classify_lab(LabColor::new(67.0, 9.0, 16.0)).unwrap();
    assert_eq!(result.season, Season::Spring);
    assert!(result.confidence >= 85.0);
    assert_eq!(result.label(), "warm spring");
}

#[test]
fn test_out_of_range_sample_still_classified() {
    let result = classify_lab(LabColor::new(20.0, -5.0, -10.0)).unwrap();
    assert!(result.confidence >= 50.0);
    assert!(result.confidence <= 100.0);
    assert!((0.0..=100.0).contains(&result.reference_confidence));
}

#[test]
fn test_each_season_reachable() {
    let cases = [
        (LabColor::new(73.0, 10.0, 20.0), Season::Spring, Subtype::LightSpring),
        (LabColor::new(72.0, 8.0, 10.0), Season::Summer, Subtype::LightSummer),
        (LabColor::new(58.0, 14.0, 26.0), Season::Autumn, Subtype::WarmAutumn),
        (LabColor::new(48.0, 12.0, 2.0), Season::Winter, Subtype::CoolWinter),
    ];
    for (lab, season, subtype) in cases {
        let result = classify_lab(lab).unwrap();
        assert_eq!(result.season, season, "{:?}", lab);
        assert_eq!(result.subtype, subtype, "{:?}", lab);
        assert_eq!(result.subtype.season(), result.season);
    }
}

#[test]
fn test_invariants_over_lab_grid() {
    let classifier = SeasonClassifier::new();
    let mut l = 0.0;
    while l <= 100.0 {
        let mut a = -40.0;
        while a <= 40.0 {
            let mut b = -40.0;
            while b <= 40.0 {
                let result = classifier.classify(LabColor::new(l, a, b)).unwrap();
                let sum: f64 = result.per_season_scores.values().sum();
                assert!((sum - 1.0).abs() < 1e-6);
                assert!((50.0..=100.0).contains(&result.confidence));
                assert!((0.0..=100.0).contains(&result.reference_confidence));
                assert_eq!(result.subtype.season(), result.season);

                let top = result.ranked_seasons()[0];
                assert_eq!(top.0, result.season);
                b += 10.0;
            }
            a += 10.0;
        }
        l += 12.5;
    }
}

#[test]
fn test_determinism_with_context() {
    let classifier = SeasonClassifier::new();
    let context = ClassificationContext::default()
        .with_sample_correction(SampleCorrection {
            lightness_scale: 0.98,
            lightness_offset: 1.5,
            a_offset: -0.5,
            b_offset: 1.0,
        })
        .with_population_correction(PopulationCorrection {
            brightness: 1.05,
            saturation: 0.95,
            contrast: 1.1,
        });
    let lab = LabColor::new(61.0, 11.0, 17.0);

    let first = classifier.classify_with_context(lab, &context).unwrap();
    let second = classifier.classify_with_context(lab, &context).unwrap();
    assert_eq!(first, second);
    assert!(first.diagnostics.sample_corrected);
    assert!(first.diagnostics.population_corrected);
}

#[test]
fn test_sample_correction_out_of_domain() {
    let context = ClassificationContext::default().with_sample_correction(SampleCorrection {
        lightness_offset: 40.0,
        ..SampleCorrection::default()
    });
    let err = SeasonClassifier::new()
        .classify_with_context(LabColor::new(80.0, 5.0, 5.0), &context)
        .unwrap_err();
    assert!(matches!(err, ColorError::InvalidColor { field: "l", .. }));
}

#[test]
fn test_invalid_input_is_typed_error() {
    let err = classify_lab(LabColor::new(-1.0, 0.0, 0.0)).unwrap_err();
    assert!(err.is_invalid_input());
    assert!(!err.user_message().is_empty());

    let err = classify_lab(LabColor::new(50.0, 0.0, 130.0)).unwrap_err();
    assert!(matches!(err, ColorError::InvalidColor { .. }));
}

#[test]
fn test_result_json_for_report_layer() {
    let result = classify_lab(LabColor::new(48.0, 12.0, 2.0)).unwrap();
    let json: serde_json::Value = serde_json::to_value(&result).unwrap();

    assert_eq!(json["season"], "winter");
    assert_eq!(json["subtype"], "cool_winter");
    assert_eq!(json["analysis"]["temperature"], "very_cool");
    assert_eq!(json["diagnostics"]["hue_bucket"], "red");
    assert_eq!(json["diagnostics"]["illuminant"], "D65");
    assert!(json["per_season_scores"]["spring"].is_number());

    let back: ClassificationResult = serde_json::from_value(json).unwrap();
    assert_eq!(back.season, Season::Winter);
}

#[test]
fn test_grey_sample_uses_grey_tone() {
    let result = classify_lab(LabColor::new(85.0, 0.0, 0.0)).unwrap();
    assert_eq!(result.diagnostics.tone, PccsTone::LightGrey);
    assert_eq!(result.diagnostics.hue_bucket, HueBucket::Red);
}

// ============================================================================
// Batch and Concurrency
// ============================================================================

#[test]
fn test_batch_matches_sequential() {
    let classifier = SeasonClassifier::new();
    let samples: Vec<LabColor> = (0..64)
        .map(|i| LabColor::new(40.0 + i as f64 * 0.5, 5.0 + (i % 10) as f64, (i % 25) as f64))
        .collect();

    let batch = classifier.classify_batch(&samples);
    assert_eq!(batch.len(), samples.len());
    for (lab, result) in samples.iter().zip(batch) {
        assert_eq!(result.unwrap(), classifier.classify(*lab).unwrap());
    }
}

#[test]
fn test_shared_cache_across_threads() {
    let cache = Arc::new(ReferenceCache::new(64, EvictionPolicy::LeastRecentlyUsed).unwrap());
    let classifier =
        SeasonClassifier::new().with_converter(ColorConverter::new().with_cache(Arc::clone(&cache)));

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for v in 100..120u8 {
                    classifier.classify_rgb(RgbColor::new(v + 80, v + 40, v)).unwrap();
                }
            });
        }
    });

    let stats = cache.stats();
    assert_eq!(stats.hits + stats.misses, 80);
    assert!(stats.misses >= 20);
    assert_eq!(stats.len, 20);
    assert_eq!(stats.evictions, 0);
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_config_drives_classifier() {
    let json = r#"{
        "conversion": { "illuminant": "d50", "precision": 2 },
        "confidence": { "max_distance": 10.0, "distance_metric": "ciede2000" },
        "cache": { "enabled": true, "capacity": 8 },
        "correction": { "brightness": 1.1, "saturation": 1.0, "contrast": 0.9 }
    }"#;
    let classifier = ClassifierConfig::from_json(json).unwrap().build_classifier().unwrap();

    assert_eq!(classifier.converter().illuminant(), Illuminant::D50);
    assert_eq!(classifier.converter().precision(), 2);
    assert_eq!(classifier.confidence_engine().max_distance(), 10.0);
    assert_eq!(classifier.confidence_engine().metric(), DistanceMetric::Ciede2000);

    let result = classifier.classify(LabColor::new(67.0, 9.0, 16.0)).unwrap();
    assert!(result.diagnostics.population_corrected);
    assert_eq!(result.diagnostics.illuminant, Illuminant::D50);
}

#[test]
fn test_confidence_signals_exposed_separately() {
    let engine = ConfidenceEngine::new();
    let classifier = SeasonClassifier::new();
    let lab = LabColor::new(60.0, 11.0, 15.0);
    let result = classifier.classify(lab).unwrap();

    let profile = classifier.profile(result.season);
    assert_eq!(engine.range_fit(lab, &profile.lab_range).unwrap(), result.confidence);
    assert_eq!(
        engine.reference_confidence(lab, profile).unwrap(),
        result.reference_confidence
    );

    let nearest = engine.nearest_reference(lab, classifier.profiles()).unwrap();
    assert_eq!(nearest.metric, DistanceMetric::Simplified);
    assert!((0.0..=100.0).contains(&nearest.confidence));
}

#[test]
fn test_tone_classifier_standalone() {
    let classifier = ToneClassifier::new();
    let tone = classifier.classify(HslColor::new(24.0, 29.73, 63.725)).unwrap();
    assert_eq!(tone.tone, PccsTone::Soft);
    assert!(tone.confidence <= 0.95);
}
