//! Colorimetric constants and calibrated thresholds for season diagnosis
//!
//! This module contains compile-time constants for color conversion,
//! based on CIE standards, and the calibrated cut-off values used by the
//! tone and season classifiers.

/// CIE Lab transfer-function constants (exact rational forms)
pub mod cie {
    /// ε = (6/29)³
    pub const EPSILON: f64 = (6.0 / 29.0) * (6.0 / 29.0) * (6.0 / 29.0);

    /// κ = (29/3)³
    pub const KAPPA: f64 = (29.0 / 3.0) * (29.0 / 3.0) * (29.0 / 3.0);
}

/// sRGB companding and primaries (IEC 61966-2-1, D65-relative)
pub mod srgb {
    /// Gamma decoding threshold on the encoded value
    pub const DECODE_THRESHOLD: f64 = 0.04045;

    /// Gamma encoding threshold on the linear value
    pub const ENCODE_THRESHOLD: f64 = 0.0031308;

    /// Linear sRGB → XYZ
    pub const RGB_TO_XYZ: [[f64; 3]; 3] = [
        [0.4124564, 0.3575761, 0.1804375],
        [0.2126729, 0.7151522, 0.0721750],
        [0.0193339, 0.1191920, 0.9503041],
    ];

    /// XYZ → linear sRGB
    pub const XYZ_TO_RGB: [[f64; 3]; 3] = [
        [3.2404542, -1.5371385, -0.4985314],
        [-0.9692660, 1.8760108, 0.0415560],
        [0.0556434, -0.2040259, 1.0572252],
    ];
}

/// Standard illuminant reference data (CIE 1931 2° observer, Y = 100)
pub mod illuminants {
    pub const D65_WHITE_POINT: [f64; 3] = [95.047, 100.0, 108.883];
    pub const D65_CHROMATICITY: (f64, f64) = (0.31271, 0.32902);
    pub const D65_CCT_KELVIN: f64 = 6504.0;

    pub const D50_WHITE_POINT: [f64; 3] = [96.422, 100.0, 82.521];
    pub const D50_CHROMATICITY: (f64, f64) = (0.34567, 0.35850);
    pub const D50_CCT_KELVIN: f64 = 5003.0;

    pub const A_WHITE_POINT: [f64; 3] = [109.850, 100.0, 35.585];
    pub const A_CHROMATICITY: (f64, f64) = (0.44757, 0.40745);
    pub const A_CCT_KELVIN: f64 = 2856.0;

    pub const F2_WHITE_POINT: [f64; 3] = [99.187, 100.0, 67.395];
    pub const F2_CHROMATICITY: (f64, f64) = (0.37208, 0.37529);
    pub const F2_CCT_KELVIN: f64 = 4230.0;

    /// Bradford cone response matrix
    pub const BRADFORD: [[f64; 3]; 3] = [
        [0.8951, 0.2664, -0.1614],
        [-0.7502, 1.7135, 0.0367],
        [0.0389, -0.0685, 1.0296],
    ];

    /// Inverse Bradford cone response matrix
    pub const BRADFORD_INVERSE: [[f64; 3]; 3] = [
        [0.9869929, -0.1470543, 0.1599627],
        [0.4323053, 0.5183603, 0.0492912],
        [-0.0085287, 0.0400428, 0.9684867],
    ];
}

/// Domain limits enforced at every public entry point
pub mod limits {
    pub const LAB_L_MIN: f64 = 0.0;
    pub const LAB_L_MAX: f64 = 100.0;
    pub const LAB_AB_MIN: f64 = -128.0;
    pub const LAB_AB_MAX: f64 = 127.0;

    /// Floating-point overshoot of L* snapped back onto [0, 100]
    pub const LAB_L_TOLERANCE: f64 = 1e-4;

    /// Default decimal precision of conversion outputs
    pub const DEFAULT_PRECISION: u32 = 3;

    /// Largest precision accepted by the converter
    pub const MAX_PRECISION: u32 = 10;
}

/// Delta E weighting constants
pub mod delta_e {
    /// CIE94 graphic-arts constants
    pub const GRAPHICS_K1: f64 = 0.045;
    pub const GRAPHICS_K2: f64 = 0.015;

    /// CIE94 textile constants
    pub const TEXTILES_K1: f64 = 0.048;
    pub const TEXTILES_K2: f64 = 0.014;
    pub const TEXTILES_KL: f64 = 2.0;

    /// 25⁷, used by the CIEDE2000 G factor and rotation term
    pub const POW25_7: f64 = 6_103_515_625.0;
}

/// PCCS tone classification thresholds
pub mod tone {
    /// Saturation (%) below which a color is treated as achromatic
    pub const GREY_SATURATION: f64 = 5.0;

    pub const LIGHT_GREY_LIGHTNESS: f64 = 75.0;
    pub const MEDIUM_GREY_LIGHTNESS: f64 = 40.0;

    pub const LIGHTNESS_WEIGHT: f64 = 0.6;
    pub const SATURATION_WEIGHT: f64 = 0.4;

    pub const BONUS: f64 = 10.0;
    pub const MAX_CONFIDENCE: f64 = 0.95;
}

/// Season scoring weights and analysis buckets
pub mod season {
    /// Range-score channel weights (sum 40)
    pub const L_WEIGHT: f64 = 15.0;
    pub const A_WEIGHT: f64 = 12.0;
    pub const B_WEIGHT: f64 = 13.0;

    /// Points lost per Lab unit outside a calibrated range
    pub const RANGE_PENALTY_PER_UNIT: f64 = 3.0;

    /// Temperature signal budget (split evenly around a neutral midpoint)
    pub const TEMPERATURE_WEIGHT: f64 = 25.0;

    /// Chroma that yields full temperature confidence
    pub const TEMPERATURE_FULL_CHROMA: f64 = 25.0;
    pub const TEMPERATURE_MIN_CONFIDENCE: f64 = 0.3;

    /// `b - a` thresholds for very_warm / warm / neutral / cool
    pub const VERY_WARM_ABOVE: f64 = 4.0;
    pub const WARM_ABOVE: f64 = 1.0;
    pub const NEUTRAL_ABOVE: f64 = -1.0;
    pub const COOL_ABOVE: f64 = -4.0;

    /// Chroma buckets for the clarity label
    pub const CLARITY_VERY_CLEAR: f64 = 20.0;
    pub const CLARITY_CLEAR: f64 = 15.0;
    pub const CLARITY_MODERATE: f64 = 10.0;
    pub const CLARITY_MUTED: f64 = 5.0;

    /// Lightness buckets for the depth label
    pub const DEPTH_VERY_LIGHT: f64 = 75.0;
    pub const DEPTH_LIGHT: f64 = 65.0;
    pub const DEPTH_MEDIUM: f64 = 55.0;
    pub const DEPTH_DEEP: f64 = 45.0;

    /// `chroma · L / 100` buckets for the intensity label
    pub const INTENSITY_HIGH: f64 = 15.0;
    pub const INTENSITY_MEDIUM: f64 = 8.0;
    pub const INTENSITY_LOW: f64 = 3.0;
}

/// Confidence engine constants
pub mod confidence {
    pub const RANGE_FIT_START: f64 = 100.0;
    pub const L_PENALTY: f64 = 15.0;
    pub const A_PENALTY: f64 = 10.0;
    pub const B_PENALTY: f64 = 10.0;
    pub const RANGE_FIT_FLOOR: f64 = 50.0;

    /// ΔE at which distance-based confidence reaches zero
    pub const DEFAULT_MAX_DISTANCE: f64 = 20.0;
}

/// Reference cache sizing
pub mod cache {
    pub const DEFAULT_CAPACITY: usize = 512;

    /// Decimal places kept when rounding numeric cache keys
    pub const KEY_DECIMALS: i32 = 3;
}
