//! Configuration schema definitions

use crate::error::{Result, SonifyError};
use crate::mapping::Scale;
use crate::sonify::MeasurementType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Highest value any MIDI data byte can carry
const MIDI_MAX: i64 = 127;

/// A sonification request: series, how to reduce them, and how to voice them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SonificationRequest {
    /// Parameter name (pitch, volume, pan) -> time series
    pub parameter_map: BTreeMap<String, Vec<f64>>,

    /// Parameter name -> measurement type (mean, min, max, length)
    pub measurement_types: BTreeMap<String, String>,

    /// Note and controller ranges
    pub config: SonificationConfig,
}

impl SonificationRequest {
    /// Validate everything that can be checked without segmenting
    pub fn validate(&self) -> Result<()> {
        self.config.validate()?;
        if self.parameter_map.is_empty() {
            return Err(SonifyError::InvalidRequest(
                "parameter_map must name at least one parameter".to_string(),
            ));
        }
        self.measurements().map(|_| ())
    }

    /// Parse the measurement type names
    pub fn measurements(&self) -> Result<BTreeMap<String, MeasurementType>> {
        self.measurement_types
            .iter()
            .map(|(name, kind)| {
                kind.parse::<MeasurementType>()
                    .map(|measurement| (name.clone(), measurement))
            })
            .collect()
    }
}

/// The scale notes are snapped to
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ScaleSetting {
    /// Explicit pitch classes, e.g. `[0, 2, 4, 5, 7, 9, 11]`
    PitchClasses(Vec<i64>),
    /// A named scale, e.g. `major` or `minor_pentatonic`
    Named(String),
}

impl ScaleSetting {
    /// Resolve to a concrete scale
    pub fn resolve(&self) -> Result<Scale> {
        match self {
            ScaleSetting::PitchClasses(classes) => Scale::from_pitch_classes(classes),
            ScaleSetting::Named(name) => Scale::from_name(name)
                .ok_or_else(|| SonifyError::InvalidConfig(format!("unknown scale '{}'", name))),
        }
    }
}

/// Output ranges shared by every parameter of one request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SonificationConfig {
    /// Tonal pitch classes
    pub scale: ScaleSetting,

    /// Lowest MIDI note
    pub low: i64,

    /// Number of semitones above `low` that notes may reach
    pub range: i64,

    /// Ticks of note duration per raw sample
    pub ticks_per_samp: i64,

    /// Lowest controller value
    pub volume_low: i64,

    /// Highest controller value
    pub volume_high: i64,
}

impl SonificationConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.scale.resolve()?;

        if self.low < 0 {
            return Err(invalid(format!("low must be >= 0, got {}", self.low)));
        }
        if self.range < 0 {
            return Err(invalid(format!("range must be >= 0, got {}", self.range)));
        }
        if self.low.checked_add(self.range).filter(|high| *high <= MIDI_MAX).is_none() {
            return Err(invalid(format!(
                "low + range must be <= 127, got {} + {}",
                self.low, self.range
            )));
        }
        if self.ticks_per_samp < 1 {
            return Err(invalid(format!(
                "ticks_per_samp must be >= 1, got {}",
                self.ticks_per_samp
            )));
        }
        if self.volume_low < 0 || self.volume_high > MIDI_MAX {
            return Err(invalid(format!(
                "volume bounds must lie in 0..=127, got {}..={}",
                self.volume_low, self.volume_high
            )));
        }
        if self.volume_low > self.volume_high {
            return Err(invalid(format!(
                "volume_low ({}) exceeds volume_high ({})",
                self.volume_low, self.volume_high
            )));
        }

        Ok(())
    }

    /// Highest MIDI note (saturates; `validate` rejects such configs)
    pub fn high(&self) -> i64 {
        self.low.saturating_add(self.range)
    }
}

impl Default for SonificationConfig {
    /// C major over one octave from middle C, full controller range
    fn default() -> Self {
        Self {
            scale: ScaleSetting::PitchClasses(vec![0, 2, 4, 5, 7, 9, 11]),
            low: 60,
            range: 12,
            ticks_per_samp: 4,
            volume_low: 0,
            volume_high: 127,
        }
    }
}

fn invalid(message: String) -> SonifyError {
    SonifyError::InvalidConfig(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SonificationConfig::default().validate().is_ok());
        assert_eq!(SonificationConfig::default().high(), 72);
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "scale": [0, 2, 4, 5, 7, 9, 11],
            "low": 48,
            "range": 24,
            "ticks_per_samp": 8,
            "volume_low": 20,
            "volume_high": 100
        }"#;
        let config: SonificationConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.low, 48);
        assert_eq!(config.scale, ScaleSetting::PitchClasses(vec![0, 2, 4, 5, 7, 9, 11]));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_named_scale_from_yaml() {
        let yaml = r#"
scale: minor_pentatonic
low: 40
range: 30
ticks_per_samp: 2
volume_low: 0
volume_high: 127
"#;
        let config: SonificationConfig = serde_yaml::from_str(yaml).unwrap();
        let scale = config.scale.resolve().unwrap();
        assert_eq!(scale.intervals(), &[0, 3, 5, 7, 10]);
    }

    #[test]
    fn test_missing_field_rejected() {
        let json = r#"{ "scale": [0], "low": 60, "range": 12 }"#;
        assert!(serde_json::from_str::<SonificationConfig>(json).is_err());
    }

    #[test]
    fn test_invalid_configs() {
        let base = SonificationConfig::default();

        let cases = [
            SonificationConfig { scale: ScaleSetting::PitchClasses(vec![]), ..base.clone() },
            SonificationConfig { scale: ScaleSetting::PitchClasses(vec![0, 12]), ..base.clone() },
            SonificationConfig { scale: ScaleSetting::Named("lydian_augmented".into()), ..base.clone() },
            SonificationConfig { low: -1, ..base.clone() },
            SonificationConfig { range: -3, ..base.clone() },
            SonificationConfig { low: 120, range: 12, ..base.clone() },
            SonificationConfig { low: i64::MAX, range: 1, ..base.clone() },
            SonificationConfig { low: 1, range: i64::MAX, ..base.clone() },
            SonificationConfig { ticks_per_samp: 0, ..base.clone() },
            SonificationConfig { volume_low: 90, volume_high: 10, ..base.clone() },
            SonificationConfig { volume_high: 128, ..base.clone() },
        ];

        for config in &cases {
            assert!(
                matches!(config.validate(), Err(SonifyError::InvalidConfig(_))),
                "{:?} should be invalid",
                config
            );
        }
    }

    #[test]
    fn test_overflowing_note_range_from_json() {
        let json = r#"{
            "scale": [0, 2, 4, 5, 7, 9, 11],
            "low": 9223372036854775807,
            "range": 1,
            "ticks_per_samp": 4,
            "volume_low": 0,
            "volume_high": 127
        }"#;
        let config: SonificationConfig = serde_json::from_str(json).unwrap();
        assert!(matches!(config.validate(), Err(SonifyError::InvalidConfig(_))));
        assert_eq!(config.high(), i64::MAX);
    }

    #[test]
    fn test_request_validation() {
        let json = r#"{
            "parameter_map": { "pitch": [1, 2, 3, 4] },
            "measurement_types": { "pitch": "median" },
            "config": {
                "scale": [0, 2, 4, 5, 7, 9, 11],
                "low": 60, "range": 12, "ticks_per_samp": 4,
                "volume_low": 0, "volume_high": 127
            }
        }"#;
        let request: SonificationRequest = serde_json::from_str(json).unwrap();
        assert_eq!(
            request.validate(),
            Err(SonifyError::UnknownMeasurementType("median".to_string()))
        );
    }

    #[test]
    fn test_empty_request_rejected() {
        let request = SonificationRequest {
            parameter_map: BTreeMap::new(),
            measurement_types: BTreeMap::new(),
            config: SonificationConfig::default(),
        };
        assert!(matches!(request.validate(), Err(SonifyError::InvalidRequest(_))));
    }
}
