//! Merge settings.
//!
//! [`MergeConfig`] carries the caller-facing switches (`build_alpha`, the
//! three alpha mode flags and the average threshold). The kernel never reads
//! the flags directly; it works from the resolved [`AlphaMode`].
//!
//! Settings can be loaded from YAML:
//!
//! ```rust
//! use voxmerge_ops::{AlphaMode, MergeConfig};
//!
//! let config = MergeConfig::from_yaml_str("build_alpha: true\naverage_threshold: 25\n").unwrap();
//! assert_eq!(config.alpha_mode(), AlphaMode::Average);
//! assert_eq!(config.average_threshold, 25);
//! assert_eq!(config.output_components(), 4);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::OpsResult;

/// Default threshold a channel value must exceed to count toward average alpha.
pub const DEFAULT_AVERAGE_THRESHOLD: i64 = 10;

/// How the alpha component is synthesized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlphaMode {
    /// No alpha component.
    #[default]
    None,
    /// Largest channel value at the voxel.
    Maximum,
    /// Mean of the channel values above the threshold.
    Average,
    /// Weighted luminance of the blended color.
    Luminance,
}

/// Merge settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    /// Emit a fourth (alpha) component.
    pub build_alpha: bool,
    /// Alpha is the maximum channel value.
    pub maximum_mode: bool,
    /// Alpha is the average of channel values above the threshold.
    pub average_mode: bool,
    /// Alpha is the luminance of the blended color.
    pub luminance_mode: bool,
    /// Channel values must be strictly greater than this to count toward
    /// average alpha.
    pub average_threshold: i64,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            build_alpha: false,
            maximum_mode: false,
            average_mode: false,
            luminance_mode: false,
            average_threshold: DEFAULT_AVERAGE_THRESHOLD,
        }
    }
}

impl MergeConfig {
    /// RGB output, no alpha.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables the alpha component.
    pub fn with_alpha(mut self, build_alpha: bool) -> Self {
        self.build_alpha = build_alpha;
        self
    }

    /// Enables alpha with the given mode. [`AlphaMode::None`] disables alpha.
    pub fn with_alpha_mode(mut self, mode: AlphaMode) -> Self {
        self.build_alpha = mode != AlphaMode::None;
        self.maximum_mode = mode == AlphaMode::Maximum;
        self.average_mode = mode == AlphaMode::Average;
        self.luminance_mode = mode == AlphaMode::Luminance;
        self
    }

    /// Sets the average alpha threshold.
    pub fn with_threshold(mut self, threshold: i64) -> Self {
        self.average_threshold = threshold;
        self
    }

    /// Resolves the mode flags.
    ///
    /// Maximum wins over average, average over luminance. With alpha enabled
    /// and no mode requested, average is used.
    ///
    /// A luminance flag set on its own selects luminance rather than the
    /// average default; the average fallback applies only when no mode flag
    /// is set at all.
    pub fn alpha_mode(&self) -> AlphaMode {
        if !self.build_alpha {
            AlphaMode::None
        } else if self.maximum_mode {
            AlphaMode::Maximum
        } else if self.average_mode {
            AlphaMode::Average
        } else if self.luminance_mode {
            AlphaMode::Luminance
        } else {
            AlphaMode::Average
        }
    }

    /// 4 with alpha, 3 without.
    #[inline]
    pub fn output_components(&self) -> usize {
        if self.build_alpha { 4 } else { 3 }
    }

    /// Parses settings from YAML. Missing keys keep their defaults.
    pub fn from_yaml_str(text: &str) -> OpsResult<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Loads settings from a YAML file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> OpsResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&text)
    }

    /// Serializes the settings to YAML.
    pub fn to_yaml_string(&self) -> OpsResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MergeConfig::default();
        assert!(!config.build_alpha);
        assert_eq!(config.average_threshold, 10);
        assert_eq!(config.alpha_mode(), AlphaMode::None);
        assert_eq!(config.output_components(), 3);
    }

    #[test]
    fn test_average_is_default_alpha() {
        let config = MergeConfig::new().with_alpha(true);
        assert_eq!(config.alpha_mode(), AlphaMode::Average);
    }

    #[test]
    fn test_maximum_wins_over_average() {
        let config = MergeConfig {
            build_alpha: true,
            maximum_mode: true,
            average_mode: true,
            ..Default::default()
        };
        assert_eq!(config.alpha_mode(), AlphaMode::Maximum);
    }

    #[test]
    fn test_luminance_only_when_requested_alone() {
        let lum = MergeConfig::new().with_alpha_mode(AlphaMode::Luminance);
        assert_eq!(lum.alpha_mode(), AlphaMode::Luminance);

        let both = MergeConfig { average_mode: true, ..lum.clone() };
        assert_eq!(both.alpha_mode(), AlphaMode::Average);

        let off = MergeConfig { build_alpha: false, ..lum };
        assert_eq!(off.alpha_mode(), AlphaMode::None);
    }

    #[test]
    fn test_with_alpha_mode_none() {
        let config = MergeConfig::new().with_alpha_mode(AlphaMode::Maximum).with_alpha_mode(AlphaMode::None);
        assert!(!config.build_alpha);
        assert!(!config.maximum_mode);
    }

    #[test]
    fn test_yaml() {
        let config = MergeConfig::from_yaml_str("build_alpha: true\nmaximum_mode: true\n").unwrap();
        assert_eq!(config.alpha_mode(), AlphaMode::Maximum);
        assert_eq!(config.average_threshold, DEFAULT_AVERAGE_THRESHOLD);

        let text = config.to_yaml_string().unwrap();
        assert_eq!(MergeConfig::from_yaml_str(&text).unwrap(), config);

        assert!(MergeConfig::from_yaml_str("build_alpha: [1, 2]").is_err());
    }

    #[test]
    fn test_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("merge.yaml");
        std::fs::write(&path, "build_alpha: true\nluminance_mode: true\n").unwrap();
        let config = MergeConfig::from_yaml_file(&path).unwrap();
        assert_eq!(config.alpha_mode(), AlphaMode::Luminance);

        assert!(MergeConfig::from_yaml_file(dir.path().join("missing.yaml")).is_err());
    }
}
