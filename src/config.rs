//! Threshold, advice and analysis configuration.
//!
//! Loaded once before frame processing starts. YAML (`.yaml`/`.yml`) and JSON
//! files are both accepted; the two-file JSON layout (`thresholds.json` +
//! `advice.json`) is supported through [`Config::from_table_files`].
//!
//! Every metric must have a threshold and an advice entry. A missing entry is
//! reported when the [`Classifier`](crate::classify::Classifier) is built, so a
//! bad configuration fails at startup rather than mid-stream.

use crate::error::{Error, Result};
use crate::landmark::DEFAULT_VISIBILITY_FLOOR;
use crate::metric::Metric;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Cut points for one metric. `value <= good_max` is Good,
/// `value <= warn_max` is Warning, anything above is Poor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdSpec {
    /// Upper bound of the Good tier (inclusive).
    #[serde(alias = "good")]
    pub good_max: f32,
    /// Upper bound of the Warning tier (inclusive).
    #[serde(alias = "warn")]
    pub warn_max: f32,
}

impl ThresholdSpec {
    /// Create a threshold pair.
    #[must_use]
    pub const fn new(good_max: f32, warn_max: f32) -> Self {
        Self { good_max, warn_max }
    }

    fn validate(&self, key: &str) -> Result<()> {
        if !self.good_max.is_finite() || !self.warn_max.is_finite() {
            return Err(Error::ConfigInvalid {
                key: key.to_string(),
                message: "cut points must be finite".to_string(),
            });
        }
        if self.good_max > self.warn_max {
            return Err(Error::ConfigInvalid {
                key: key.to_string(),
                message: format!(
                    "good_max ({}) must not exceed warn_max ({})",
                    self.good_max, self.warn_max
                ),
            });
        }
        Ok(())
    }
}

/// Advice shown for the Warning and Poor tiers of one metric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdviceSpec {
    /// Text for the Warning tier.
    pub warn: String,
    /// Text for the Poor tier.
    pub poor: String,
}

impl AdviceSpec {
    /// Create an advice pair.
    #[must_use]
    pub fn new(warn: impl Into<String>, poor: impl Into<String>) -> Self {
        Self {
            warn: warn.into(),
            poor: poor.into(),
        }
    }
}

/// Tunables of the posture analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Landmarks with lower visibility are treated as absent.
    #[serde(default = "default_visibility_floor")]
    pub visibility_floor: f32,

    /// Number of frames averaged per metric.
    #[serde(default = "default_smoothing_window")]
    pub smoothing_window: usize,

    /// Length in pixels of the vertical reference rays at neck and hip.
    #[serde(default = "default_reference_offset_px")]
    pub reference_offset_px: i32,

    /// Leg angle (degrees) below which the subject counts as standing.
    #[serde(default = "default_standing_leg_angle")]
    pub standing_leg_angle: f32,
}

/// Upper bound for [`AnalysisConfig::reference_offset_px`].
pub const MAX_REFERENCE_OFFSET_PX: i32 = 10_000;

fn default_visibility_floor() -> f32 {
    DEFAULT_VISIBILITY_FLOOR
}
fn default_smoothing_window() -> usize {
    5
}
fn default_reference_offset_px() -> i32 {
    100
}
fn default_standing_leg_angle() -> f32 {
    50.0
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            visibility_floor: default_visibility_floor(),
            smoothing_window: default_smoothing_window(),
            reference_offset_px: default_reference_offset_px(),
            standing_leg_angle: default_standing_leg_angle(),
        }
    }
}

impl AnalysisConfig {
    fn validate(&self) -> Result<()> {
        if self.smoothing_window == 0 {
            return Err(Error::ConfigInvalid {
                key: "analysis.smoothing_window".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.visibility_floor) {
            return Err(Error::ConfigInvalid {
                key: "analysis.visibility_floor".to_string(),
                message: format!("{} is outside 0.0..=1.0", self.visibility_floor),
            });
        }
        if !(1..=MAX_REFERENCE_OFFSET_PX).contains(&self.reference_offset_px) {
            return Err(Error::ConfigInvalid {
                key: "analysis.reference_offset_px".to_string(),
                message: format!(
                    "{} is outside 1..={MAX_REFERENCE_OFFSET_PX}",
                    self.reference_offset_px
                ),
            });
        }
        if !(0.0..=180.0).contains(&self.standing_leg_angle) {
            return Err(Error::ConfigInvalid {
                key: "analysis.standing_leg_angle".to_string(),
                message: format!("{} is outside 0.0..=180.0", self.standing_leg_angle),
            });
        }
        Ok(())
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Configuration version.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Analyzer tunables.
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Cut points keyed by metric name.
    #[serde(default)]
    pub thresholds: BTreeMap<String, ThresholdSpec>,

    /// Advice text keyed by metric name.
    #[serde(default)]
    pub advice: BTreeMap<String, AdviceSpec>,
}

fn default_version() -> u32 {
    1
}

impl Default for Config {
    fn default() -> Self {
        let thresholds = [
            (Metric::TorsoLean, ThresholdSpec::new(10.0, 20.0)),
            (Metric::HeadForward, ThresholdSpec::new(15.0, 25.0)),
            (Metric::NeckFlex, ThresholdSpec::new(20.0, 35.0)),
            (Metric::ShoulderSym, ThresholdSpec::new(2.0, 4.0)),
            (Metric::EarOffset, ThresholdSpec::new(3.0, 6.0)),
        ];
        let advice = [
            (
                Metric::TorsoLean,
                AdviceSpec::new("Sit back against the chair", "Straighten your back"),
            ),
            (
                Metric::HeadForward,
                AdviceSpec::new("Pull your chin back slightly", "Bring your head over your shoulders"),
            ),
            (
                Metric::NeckFlex,
                AdviceSpec::new("Raise your gaze a little", "Lift the screen to eye level"),
            ),
            (
                Metric::ShoulderSym,
                AdviceSpec::new("Relax the higher shoulder", "Level your shoulders"),
            ),
            (
                Metric::EarOffset,
                AdviceSpec::new("Center your head", "Stop tilting your head sideways"),
            ),
        ];

        Self {
            version: default_version(),
            analysis: AnalysisConfig::default(),
            thresholds: thresholds
                .into_iter()
                .map(|(m, t)| (m.key().to_string(), t))
                .collect(),
            advice: advice
                .into_iter()
                .map(|(m, a)| (m.key().to_string(), a))
                .collect(),
        }
    }
}

impl Config {
    /// Creates a configuration with the built-in tables.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a configuration file; the format follows the extension
    /// (`.json` is JSON, anything else YAML).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = read_config_file(path)?;

        if is_json(path) {
            Self::parse_json(&content)
        } else {
            Self::parse_yaml(&content)
        }
    }

    /// Loads configuration with fallback to the built-in tables.
    #[must_use]
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => config,
            Err(err) => {
                tracing::debug!(path = %path.display(), %err, "using built-in configuration");
                Self::default()
            }
        }
    }

    /// Parses configuration from a YAML string.
    pub fn parse_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml).map_err(|e| Error::ConfigParse {
            line: e.location().map_or(0, |l| l.line()),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Parses configuration from a JSON string.
    pub fn parse_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(json_error)?;
        config.validate()?;
        Ok(config)
    }

    /// Builds a configuration from separate threshold and advice JSON files,
    /// each a map from metric name to its entry. Analyzer tunables keep their
    /// defaults.
    pub fn from_table_files(
        thresholds_path: impl AsRef<Path>,
        advice_path: impl AsRef<Path>,
    ) -> Result<Self> {
        let thresholds = serde_json::from_str(&read_config_file(thresholds_path.as_ref())?)
            .map_err(json_error)?;
        let advice =
            serde_json::from_str(&read_config_file(advice_path.as_ref())?).map_err(json_error)?;

        let config = Self {
            version: default_version(),
            analysis: AnalysisConfig::default(),
            thresholds,
            advice,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges. Completeness of the metric tables is checked by
    /// [`Classifier::from_config`](crate::classify::Classifier::from_config).
    pub fn validate(&self) -> Result<()> {
        self.analysis.validate()?;
        for (key, spec) in &self.thresholds {
            spec.validate(key)?;
        }
        Ok(())
    }

    /// Threshold entry for a metric.
    pub fn threshold(&self, metric: Metric) -> Result<ThresholdSpec> {
        self.thresholds
            .get(metric.key())
            .copied()
            .ok_or(Error::MissingConfigKey {
                table: "thresholds",
                key: metric.key(),
            })
    }

    /// Advice entry for a metric.
    pub fn advice(&self, metric: Metric) -> Result<&AdviceSpec> {
        self.advice.get(metric.key()).ok_or(Error::MissingConfigKey {
            table: "advice",
            key: metric.key(),
        })
    }
}

fn read_config_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|_| Error::ConfigNotFound(path.display().to_string()))
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

fn json_error(e: serde_json::Error) -> Error {
    Error::ConfigParse {
        line: e.line(),
        message: e.to_string(),
    }
}
