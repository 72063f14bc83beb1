use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::color::Rgb;
use crate::error::ConfigError;
use crate::session::CommitPolicy;
use crate::view::ThresholdMode;

/// Range and starting value of the threshold control for one mode.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SliderPreset {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub initial: f64,
}

impl SliderPreset {
    fn validate(&self, mode: &'static str) -> Result<(), ConfigError> {
        let values = [self.min, self.max, self.step, self.initial];
        if values.iter().any(|value| !value.is_finite()) {
            return Err(ConfigError::Preset {
                mode,
                reason: "values must be finite",
            });
        }
        if self.min > self.max {
            return Err(ConfigError::Preset {
                mode,
                reason: "min is greater than max",
            });
        }
        if self.step <= 0.0 {
            return Err(ConfigError::Preset {
                mode,
                reason: "step must be positive",
            });
        }
        if !(self.min..=self.max).contains(&self.initial) {
            return Err(ConfigError::Preset {
                mode,
                reason: "initial value is outside min..=max",
            });
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    /// Endpoint for sentiment `-0.5` and below.
    pub negative: Rgb,
    /// Endpoint for sentiment `0.5` and above.
    pub positive: Rgb,
    /// Edge color when sentiment coloring is off.
    pub neutral: Rgb,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            negative: Rgb::new(0xd1, 0x49, 0x5b),
            positive: Rgb::new(0x66, 0xa1, 0x82),
            neutral: Rgb::new(0x5c, 0x6b, 0x7a),
        }
    }
}

/// Display settings, optionally read from a TOML file. Every field has a
/// default, so an empty file is valid.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    pub absolute: SliderPreset,
    pub share: SliderPreset,
    pub initial_mode: ThresholdMode,
    pub show_sentiment: bool,
    pub commit: CommitPolicy,
    pub colors: ColorConfig,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            absolute: SliderPreset {
                min: 1.0,
                max: 50.0,
                step: 1.0,
                initial: 5.0,
            },
            share: SliderPreset {
                min: 0.002,
                max: 0.10,
                step: 0.002,
                initial: 0.01,
            },
            initial_mode: ThresholdMode::Absolute,
            show_sentiment: false,
            commit: CommitPolicy::OnSubmit,
            colors: ColorConfig::default(),
        }
    }
}

impl DisplayConfig {
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&raw)?;
        info!(path = %path.display(), "loaded display config");
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.absolute.validate("absolute")?;
        self.share.validate("share")
    }

    pub fn preset(&self, mode: ThresholdMode) -> &SliderPreset {
        match mode {
            ThresholdMode::Absolute => &self.absolute,
            ThresholdMode::Share => &self.share,
        }
    }
}
