//! Error types for the season_scan library

use thiserror::Error;

/// Result type alias for season_scan operations
pub type Result<T> = std::result::Result<T, ColorError>;

/// Error types for conversion, color-difference and classification operations
///
/// Singular numeric cases (zero chroma, zero channel spread) are not errors:
/// they resolve locally to documented defaults (hue 0, saturation 0, ΔH 0).
#[derive(Error, Debug)]
pub enum ColorError {
    /// A numeric color component lies outside its documented domain
    #[error("Invalid {space} color: {field} = {value} (expected {expected})")]
    InvalidColor {
        space: &'static str,
        field: &'static str,
        value: f64,
        expected: &'static str,
    },

    /// A hexadecimal color string could not be parsed
    #[error("Invalid hex color '{input}': {reason}")]
    InvalidHex { input: String, reason: String },

    /// Unknown illuminant, season or tone identifier, or a bad configuration value
    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    /// Configuration document could not be (de)serialized
    #[error("Serialization error: {message}")]
    Serialization {
        message: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ColorError {
    /// Create an out-of-domain color error
    pub fn invalid_color(
        space: &'static str,
        field: &'static str,
        value: f64,
        expected: &'static str,
    ) -> Self {
        Self::InvalidColor {
            space,
            field,
            value,
            expected,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
        }
    }

    /// Wrap a serde_json failure with context
    pub fn serialization(message: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialization {
            message: message.into(),
            source,
        }
    }

    /// Check if this error was caused by the color sample itself rather than setup
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            ColorError::InvalidColor { .. } | ColorError::InvalidHex { .. }
        )
    }

    /// Get user-friendly error description for application display
    pub fn user_message(&self) -> String {
        match self {
            ColorError::InvalidColor { space, field, .. } => format!(
                "The measured {} value for {} is out of range. Please measure the skin sample again.",
                space, field
            ),
            ColorError::InvalidHex { .. } => {
                "The color code could not be read. Use the #RRGGBB format.".to_string()
            }
            ColorError::ConfigurationError { .. } | ColorError::Serialization { .. } => {
                "The diagnosis settings are invalid. Please check the configuration.".to_string()
            }
        }
    }
}
