//! Field widths of the circuit input contract, with builder pattern.

use mrtd_types::InputError;
use serde::{Deserialize, Serialize};

/// Widths a padded TBS certificate may take.
pub const TBS_WIDTHS: [usize; 5] = [700, 1000, 1200, 1500, 1600];

/// Widths padded signed attributes may take.
pub const SIGNED_ATTRS_WIDTHS: [usize; 2] = [200, 220];

/// DG1 is always padded to this width.
pub const DG1_WIDTH: usize = 95;

/// Default width of the padded encapsulated content.
pub const DEFAULT_ECONTENT_WIDTH: usize = 700;

/// Assembler configuration.
///
/// A `None` width selects the smallest contract width that fits the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputConfig {
    pub tbs_width: Option<usize>,
    pub signed_attrs_width: Option<usize>,
    pub econtent_width: usize,
}

impl Default for InputConfig {
    fn default() -> Self {
        InputConfig {
            tbs_width: None,
            signed_attrs_width: None,
            econtent_width: DEFAULT_ECONTENT_WIDTH,
        }
    }
}

impl InputConfig {
    /// Create a builder for an input configuration.
    pub fn builder() -> InputConfigBuilder {
        InputConfigBuilder::default()
    }

    /// Load and validate a configuration from JSON. Missing keys keep
    /// their defaults.
    pub fn from_json(json: &str) -> Result<Self, InputError> {
        let config: InputConfig =
            serde_json::from_str(json).map_err(|e| InputError::Json(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject widths outside the contract sets.
    pub fn validate(&self) -> Result<(), InputError> {
        if let Some(w) = self.tbs_width {
            if !TBS_WIDTHS.contains(&w) {
                return Err(InputError::InvalidConfig(format!(
                    "TBS width {w} not one of {TBS_WIDTHS:?}"
                )));
            }
        }
        if let Some(w) = self.signed_attrs_width {
            if !SIGNED_ATTRS_WIDTHS.contains(&w) {
                return Err(InputError::InvalidConfig(format!(
                    "signed attributes width {w} not one of {SIGNED_ATTRS_WIDTHS:?}"
                )));
            }
        }
        if self.econtent_width == 0 {
            return Err(InputError::InvalidConfig(
                "encapsulated content width must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Builder for [`InputConfig`].
#[derive(Debug, Default)]
pub struct InputConfigBuilder {
    config: InputConfig,
}

impl InputConfigBuilder {
    pub fn tbs_width(mut self, width: usize) -> Self {
        self.config.tbs_width = Some(width);
        self
    }

    pub fn signed_attrs_width(mut self, width: usize) -> Self {
        self.config.signed_attrs_width = Some(width);
        self
    }

    pub fn econtent_width(mut self, width: usize) -> Self {
        self.config.econtent_width = width;
        self
    }

    pub fn build(self) -> Result<InputConfig, InputError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
