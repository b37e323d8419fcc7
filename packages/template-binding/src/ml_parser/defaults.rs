//! Default Configuration
//!
//! Interpolation markers and the checks applied to custom ones.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

static UNUSABLE_INTERPOLATION_REGEXPS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"@",          // control flow reserved symbol
        r"^\s*$",      // empty
        r"[<>]",       // html tag
        r"^[{}]$",     // i18n expansion
        r"&(#|[a-z])", // character reference
        r"^//",        // comment
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
});

/// Interpolation markers, `{{` and `}}` unless configured otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterpolationConfig {
    pub start: String,
    pub end: String,
}

impl InterpolationConfig {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        InterpolationConfig {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Builds a config from a `[start, end]` pair, rejecting markers that
    /// would collide with markup syntax.
    pub fn from_array(markers: Option<&[String]>) -> Result<Self, ConfigError> {
        let Some(markers) = markers else {
            return Ok(default_interpolation_config());
        };
        let [start, end] = markers else {
            return Err(ConfigError::InterpolationArity("interpolation".to_string()));
        };
        let config = InterpolationConfig::new(start.clone(), end.clone());
        config.validate()?;
        Ok(config)
    }

    /// Rejects empty markers and markers that collide with markup syntax.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let unusable = UNUSABLE_INTERPOLATION_REGEXPS
            .iter()
            .any(|re| re.is_match(&self.start) || re.is_match(&self.end));
        if unusable {
            return Err(ConfigError::UnusableInterpolation {
                start: self.start.clone(),
                end: self.end.clone(),
            });
        }
        Ok(())
    }

    /// True when either marker is empty; such a config matches no
    /// interpolation.
    pub fn is_empty(&self) -> bool {
        self.start.is_empty() || self.end.is_empty()
    }
}

impl Default for InterpolationConfig {
    fn default() -> Self {
        default_interpolation_config()
    }
}

/// Default interpolation config {{ }}
pub fn default_interpolation_config() -> InterpolationConfig {
    InterpolationConfig::new("{{", "}}")
}
