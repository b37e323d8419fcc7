//! Binding parser configuration

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::ml_parser::InterpolationConfig;

/// Options shared by every binding parsed for one template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BindingParserConfig {
    /// Interpolation markers
    pub interpolation: InterpolationConfig,
    /// Use the schema's DOM property name for plain property bindings
    pub map_property_names: bool,
    /// Skip `validate_property` / `validate_attribute` checks
    pub skip_schema_validation: bool,
}

impl Default for BindingParserConfig {
    fn default() -> Self {
        BindingParserConfig {
            interpolation: InterpolationConfig::default(),
            map_property_names: true,
            skip_schema_validation: false,
        }
    }
}

impl BindingParserConfig {
    /// Parses a JSON config object. Missing fields take their defaults; the
    /// interpolation markers are validated.
    pub fn from_json(input: &str) -> Result<Self, ConfigError> {
        let config: BindingParserConfig = serde_json::from_str(input)?;
        config.interpolation.validate()?;
        Ok(config)
    }

    /// Replaces the interpolation markers after validating them.
    pub fn with_interpolation(mut self, interpolation: InterpolationConfig) -> Result<Self, ConfigError> {
        interpolation.validate()?;
        self.interpolation = interpolation;
        Ok(self)
    }
}
