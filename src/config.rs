use serde::{Deserialize, Serialize};
use std::path::Path;
use crate::error::{CalcError, CalcResult};

/// Allowed deviation (in percentage points) of a distribution's total from 100%.
pub const DEFAULT_TOTAL_TOLERANCE: f64 = 5.0;
pub const DEFAULT_SIGNIFICANT_DIGITS: usize = 4;
pub const DEFAULT_SCI_UPPER: f64 = 1e6;
pub const DEFAULT_SCI_LOWER: f64 = 1e-3;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub distribution: DistributionConfig,
    pub format: FormatConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DistributionConfig {
    pub total_tolerance: f64,          // ± percentage points around 100%
    pub dissolution_targets: Vec<f64>, // Tx values reported for profiles
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    pub significant_digits: usize,
    pub sci_upper: f64, // |x| at or above this switches to scientific notation
    pub sci_lower: f64, // non-zero |x| below this switches to scientific notation
}

impl Default for DistributionConfig {
    fn default() -> Self {
        Self {
            total_tolerance: DEFAULT_TOTAL_TOLERANCE,
            dissolution_targets: vec![50.0, 90.0],
        }
    }
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            significant_digits: DEFAULT_SIGNIFICANT_DIGITS,
            sci_upper: DEFAULT_SCI_UPPER,
            sci_lower: DEFAULT_SCI_LOWER,
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> CalcResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> CalcResult<Self> {
        let config: Config = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> CalcResult<()> {
        let tolerance = self.distribution.total_tolerance;
        if !tolerance.is_finite() || !(0.0..100.0).contains(&tolerance) {
            return Err(CalcError::Validation(
                format!("Total tolerance must be within [0, 100) percentage points (got {})", tolerance)
            ));
        }

        for &target in &self.distribution.dissolution_targets {
            if !target.is_finite() || !(0.0..=100.0).contains(&target) {
                return Err(CalcError::Validation(
                    format!("Dissolution target {} is not a percentage", target)
                ));
            }
        }

        // Validate formatting
        if !(1..=17).contains(&self.format.significant_digits) {
            return Err(CalcError::Validation(
                "Significant digits must be between 1 and 17".to_string()
            ));
        }
        if !(self.format.sci_lower > 0.0 && self.format.sci_lower < self.format.sci_upper) {
            return Err(CalcError::Validation(
                "Scientific notation thresholds must satisfy 0 < sci_lower < sci_upper".to_string()
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.distribution.total_tolerance, DEFAULT_TOTAL_TOLERANCE);
        assert_eq!(config.distribution.dissolution_targets, vec![50.0, 90.0]);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = Config::from_json(r#"{ "distribution": { "total_tolerance": 2.5 } }"#).unwrap();
        assert_eq!(config.distribution.total_tolerance, 2.5);
        assert_eq!(config.distribution.dissolution_targets, vec![50.0, 90.0]);
        assert_eq!(config.format.significant_digits, DEFAULT_SIGNIFICANT_DIGITS);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(Config::from_json(r#"{ "distribution": { "total_tolerance": -1.0 } }"#).is_err());
        assert!(Config::from_json(r#"{ "distribution": { "dissolution_targets": [120.0] } }"#).is_err());
        assert!(Config::from_json(r#"{ "format": { "significant_digits": 0 } }"#).is_err());
        assert!(matches!(Config::from_json("{ not json"), Err(CalcError::Json(_))));
    }
}
