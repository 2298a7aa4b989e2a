//! TOML configuration for the `u-spc` front end.
//!
//! Every field has a default, so an empty file (or no file) is valid:
//!
//! ```toml
//! [specification]
//! target = 450.0
//! tolerance_lower = 10.0
//! tolerance_upper = 10.0
//!
//! [histogram]
//! rule = "fixed"   # "fixed" | "sturges" | "scott"
//! bins = 15        # used by "fixed"
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::capability::SpecificationLimits;
use crate::distribution::{BinMethod, DEFAULT_BINS};
use crate::error::LoadError;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpcConfig {
    /// Specification used for the capability section.
    pub specification: SpecificationLimits,
    /// Capability histogram binning.
    pub histogram: HistogramConfig,
}

/// Bin-count rule for the capability histogram.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinRule {
    /// Use `bins` as given.
    #[default]
    Fixed,
    /// Sturges' rule.
    Sturges,
    /// Scott's rule.
    Scott,
}

/// `[histogram]` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HistogramConfig {
    /// Bin-count rule.
    pub rule: BinRule,
    /// Bin count for [`BinRule::Fixed`].
    pub bins: usize,
}

impl Default for HistogramConfig {
    fn default() -> Self {
        Self {
            rule: BinRule::Fixed,
            bins: DEFAULT_BINS,
        }
    }
}

impl HistogramConfig {
    /// Resolves the configured rule to a [`BinMethod`].
    pub fn method(&self) -> BinMethod {
        match self.rule {
            BinRule::Fixed => BinMethod::Fixed(self.bins),
            BinRule::Sturges => BinMethod::Sturges,
            BinRule::Scott => BinMethod::Scott,
        }
    }
}

impl SpcConfig {
    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// [`LoadError::Parse`] for malformed TOML or unknown keys,
    /// [`LoadError::Engine`] for an invalid specification.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_spc::config::SpcConfig;
    ///
    /// let cfg = SpcConfig::from_toml_str("[specification]\ntarget = 12.0").unwrap();
    /// assert_eq!(cfg.specification.target, 12.0);
    /// assert_eq!(cfg.specification.tolerance_upper, 10.0);
    /// assert_eq!(cfg.histogram.bins, 15);
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self, LoadError> {
        Self::parse(content, "<inline>")
    }

    /// Reads and validates a configuration file.
    ///
    /// # Errors
    ///
    /// [`LoadError::Io`] if the file cannot be read, otherwise as
    /// [`SpcConfig::from_toml_str`].
    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, &path.display().to_string())
    }

    fn parse(content: &str, origin: &str) -> Result<Self, LoadError> {
        let config: Self = toml::from_str(content).map_err(|source| LoadError::Parse {
            origin: origin.to_string(),
            source,
        })?;
        config.specification.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SpcError;
    use std::io::Write;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = SpcConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, SpcConfig::default());
        assert_eq!(cfg.specification.target, 450.0);
        assert_eq!(cfg.histogram.method(), BinMethod::Fixed(15));
    }

    #[test]
    fn full_file() {
        let cfg = SpcConfig::from_toml_str(
            r#"
[specification]
target = 25.0
tolerance_lower = 0.5
tolerance_upper = 0.75

[histogram]
rule = "sturges"
"#,
        )
        .unwrap();
        assert_eq!(cfg.specification.lsl(), 24.5);
        assert_eq!(cfg.specification.usl(), 25.75);
        assert_eq!(cfg.histogram.method(), BinMethod::Sturges);
        assert_eq!(cfg.histogram.bins, DEFAULT_BINS);
    }

    #[test]
    fn invalid_specification_is_rejected() {
        let err = SpcConfig::from_toml_str("[specification]\ntarget = nan").unwrap_err();
        assert!(matches!(
            err,
            LoadError::Engine(SpcError::InvalidSpecification(_))
        ));
    }

    #[test]
    fn zero_tolerances_are_accepted() {
        let cfg = SpcConfig::from_toml_str(
            "[specification]\ntolerance_lower = 0.0\ntolerance_upper = 0.0",
        )
        .unwrap();
        assert_eq!(cfg.specification.lsl(), cfg.specification.usl());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = SpcConfig::from_toml_str("[histogram]\ncolour = \"red\"").unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
    }

    #[test]
    fn unknown_rule_is_rejected() {
        let err = SpcConfig::from_toml_str("[histogram]\nrule = \"auto\"").unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
    }

    #[test]
    fn serializes_back_to_toml() {
        let text = toml::to_string(&SpcConfig::default()).unwrap();
        let back = SpcConfig::from_toml_str(&text).unwrap();
        assert_eq!(back, SpcConfig::default());
    }

    #[test]
    fn reads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[histogram]\nbins = 20\n").unwrap();
        let cfg = SpcConfig::from_file(file.path()).unwrap();
        assert_eq!(cfg.histogram.method(), BinMethod::Fixed(20));
    }
}
