//! Ensemble configuration
//!
//! Parameters can be built in code, or loaded from a TOML file such as:
//!
//! ```toml
//! do_boosting = true
//! experts = true
//! exact_experts = true
//! expalpha = 2.0
//! num_to_promote = 5
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::errors::{EnsembleError, Result};

/// Ensemble-building parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnsembleParams {
    /// Enable row-weight bookkeeping. Without it the engine is inert.
    pub do_boosting: bool,
    /// Use row-selecting experts instead of AdaBoost
    pub experts: bool,
    /// Admit only perfect experts
    pub exact_experts: bool,
    /// Fixed reweighting multiplier for exact experts
    pub expalpha: f64,
    /// Maximum number of candidates promoted per call
    pub num_to_promote: usize,
    /// Scales the inexact-expert voting threshold
    pub bias_scale: f64,
    /// Opt in to inexact experts, whose bias accounting is unfinished
    pub experimental_inexact_experts: bool,
}

impl Default for EnsembleParams {
    fn default() -> Self {
        Self {
            do_boosting: true,
            experts: false,
            exact_experts: true,
            expalpha: 2.0,
            num_to_promote: 1,
            bias_scale: 1.0,
            experimental_inexact_experts: false,
        }
    }
}

impl EnsembleParams {
    /// Whether the inexact-expert path is selected
    pub fn inexact_experts(&self) -> bool {
        self.experts && !self.exact_experts
    }

    /// Check parameter ranges and mode gating.
    pub fn validate(&self) -> Result<()> {
        if self.num_to_promote == 0 {
            return Err(EnsembleError::InvalidParameters(
                "num_to_promote must be at least 1".to_string(),
            ));
        }
        if !self.expalpha.is_finite() || self.expalpha <= 0.0 {
            return Err(EnsembleError::InvalidParameters(format!(
                "expalpha must be positive and finite, got {}",
                self.expalpha
            )));
        }
        if !self.bias_scale.is_finite() {
            return Err(EnsembleError::InvalidParameters(format!(
                "bias_scale must be finite, got {}",
                self.bias_scale
            )));
        }
        if self.do_boosting && self.inexact_experts() && !self.experimental_inexact_experts {
            return Err(EnsembleError::Unsupported(
                "inexact experts are experimental; set experimental_inexact_experts to enable"
                    .to_string(),
            ));
        }
        Ok(())
    }

    /// Parse parameters from TOML text. Ranges are not checked here, so
    /// overrides can still be applied; call [`validate`](Self::validate)
    /// once they are.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| EnsembleError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Load parameters from a TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading ensemble configuration from: {}", path.display());

        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Serialize parameters as pretty TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| EnsembleError::Config(format!("Failed to serialize config: {}", e)))
    }
}

/// Command-line overrides layered on top of file or default parameters.
/// Unset fields leave the base value alone.
#[derive(Debug, Clone, Default)]
pub struct ParamOverrides {
    pub experts: bool,
    pub exact_experts: Option<bool>,
    pub expalpha: Option<f64>,
    pub num_to_promote: Option<usize>,
    pub bias_scale: Option<f64>,
    pub experimental_inexact_experts: bool,
    pub no_boosting: bool,
}

impl ParamOverrides {
    /// Apply the overrides to `params` and validate the result.
    pub fn apply(&self, mut params: EnsembleParams) -> Result<EnsembleParams> {
        if self.experts {
            params.experts = true;
        }
        if let Some(exact) = self.exact_experts {
            params.exact_experts = exact;
        }
        if let Some(expalpha) = self.expalpha {
            params.expalpha = expalpha;
        }
        if let Some(n) = self.num_to_promote {
            params.num_to_promote = n;
        }
        if let Some(scale) = self.bias_scale {
            params.bias_scale = scale;
        }
        if self.experimental_inexact_experts {
            params.experimental_inexact_experts = true;
        }
        if self.no_boosting {
            params.do_boosting = false;
        }
        params.validate()?;
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_are_valid() {
        let params = EnsembleParams::default();
        assert!(params.validate().is_ok());
        assert!(!params.inexact_experts());
    }

    #[test]
    fn test_rejects_bad_ranges() {
        let params = EnsembleParams {
            num_to_promote: 0,
            ..Default::default()
        };
        assert!(matches!(params.validate(), Err(EnsembleError::InvalidParameters(_))));

        let params = EnsembleParams {
            expalpha: 0.0,
            ..Default::default()
        };
        assert!(matches!(params.validate(), Err(EnsembleError::InvalidParameters(_))));

        let params = EnsembleParams {
            bias_scale: f64::NAN,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_inexact_experts_need_opt_in() {
        let mut params = EnsembleParams {
            experts: true,
            exact_experts: false,
            ..Default::default()
        };
        assert!(matches!(params.validate(), Err(EnsembleError::Unsupported(_))));

        params.experimental_inexact_experts = true;
        assert!(params.validate().is_ok());

        // Without boosting the engine never runs the mode.
        let inert = EnsembleParams {
            do_boosting: false,
            experts: true,
            exact_experts: false,
            ..Default::default()
        };
        assert!(inert.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let params = EnsembleParams::from_toml_str("experts = true\nnum_to_promote = 7\n").unwrap();
        assert!(params.experts);
        assert!(params.exact_experts);
        assert_eq!(params.num_to_promote, 7);
        assert_eq!(params.expalpha, 2.0);
    }

    #[test]
    fn test_toml_file_round_trip() -> anyhow::Result<()> {
        let params = EnsembleParams {
            experts: true,
            expalpha: 3.5,
            num_to_promote: 4,
            ..Default::default()
        };
        let mut file = NamedTempFile::new()?;
        write!(file, "{}", params.to_toml_string()?)?;
        file.flush()?;

        let loaded = EnsembleParams::from_toml_file(file.path())?;
        assert_eq!(loaded, params);
        Ok(())
    }

    #[test]
    fn test_malformed_toml() {
        assert!(matches!(
            EnsembleParams::from_toml_str("num_to_promote = \"many\""),
            Err(EnsembleError::Config(_))
        ));
    }

    #[test]
    fn test_overrides_apply_before_validation() -> anyhow::Result<()> {
        let mut file = NamedTempFile::new()?;
        write!(file, "experts = true\nexact_experts = false\nnum_to_promote = 0\n")?;
        file.flush()?;

        // The file alone is not a usable configuration, but it still loads.
        let loaded = EnsembleParams::from_toml_file(file.path())?;
        assert!(loaded.validate().is_err());

        let overrides = ParamOverrides {
            num_to_promote: Some(3),
            experimental_inexact_experts: true,
            ..Default::default()
        };
        let params = overrides.apply(loaded.clone())?;
        assert_eq!(params.num_to_promote, 3);
        assert!(params.inexact_experts());

        let partial = ParamOverrides {
            num_to_promote: Some(3),
            ..Default::default()
        };
        assert!(matches!(
            partial.apply(loaded),
            Err(EnsembleError::Unsupported(_))
        ));
        Ok(())
    }

    #[test]
    fn test_empty_overrides_keep_base() {
        let base = EnsembleParams {
            expalpha: 4.0,
            ..Default::default()
        };
        assert_eq!(ParamOverrides::default().apply(base.clone()).unwrap(), base);

        let off = ParamOverrides {
            no_boosting: true,
            exact_experts: Some(false),
            ..Default::default()
        };
        let params = off.apply(base).unwrap();
        assert!(!params.do_boosting);
        assert!(!params.exact_experts);
    }
}
