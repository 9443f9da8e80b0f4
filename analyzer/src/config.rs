// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Analyzer configuration
//!
//! Defaults can be overridden by a JSON file and then by environment
//! variables (`REVIEW_ANALYZER_*`).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Hub checkpoint of the fine-tuned DistilBERT model
pub const DEFAULT_CHECKPOINT: &str = "ARG33/DistilBERT-finetuned";

/// Which compute device the model backend should use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DevicePreference {
    /// CUDA if available, otherwise CPU
    Auto,
    Cpu,
    Cuda,
}

impl DevicePreference {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "auto" => Some(DevicePreference::Auto),
            "cpu" => Some(DevicePreference::Cpu),
            "cuda" | "gpu" => Some(DevicePreference::Cuda),
            _ => None,
        }
    }
}

/// Which feature groups the explanation layer extracts
///
/// Serialized as the tier level; `2` and `"2"` are both accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "TierLevel", into = "u8")]
pub enum FeatureTier {
    /// Sentiment, length, adjective/noun ratio, first-person usage
    Essential,
    /// Essential plus spam keywords, capitalization, punctuation, redundancy
    Important,
}

impl FeatureTier {
    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(FeatureTier::Essential),
            2 => Some(FeatureTier::Important),
            _ => None,
        }
    }

    pub fn level(self) -> u8 {
        match self {
            FeatureTier::Essential => 1,
            FeatureTier::Important => 2,
        }
    }
}

impl From<FeatureTier> for u8 {
    fn from(tier: FeatureTier) -> Self {
        tier.level()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TierLevel {
    Number(u64),
    Text(String),
}

impl TryFrom<TierLevel> for FeatureTier {
    type Error = String;

    fn try_from(value: TierLevel) -> std::result::Result<Self, Self::Error> {
        let level = match &value {
            TierLevel::Number(n) => u8::try_from(*n).ok(),
            TierLevel::Text(s) => s.trim().parse::<u8>().ok(),
        };
        level.and_then(FeatureTier::from_level).ok_or_else(|| match value {
            TierLevel::Number(n) => format!("unknown feature tier {}, expected 1 or 2", n),
            TierLevel::Text(s) => format!("unknown feature tier '{}', expected 1 or 2", s),
        })
    }
}

/// Thresholds for the rule-based explanation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Absolute compound sentiment above which a review reads as extreme
    pub sentiment_extreme: f64,
    /// Reviews with fewer words are flagged as too short
    pub word_count_min: usize,
    /// Reviews with at least this many words are flagged as too long
    pub word_count_max: usize,
    pub adj_noun_ratio: f64,
    pub first_person_ratio: f64,
    pub spam_keyword_min: usize,
    pub caps_ratio_max: f64,
    pub excessive_punct_min: usize,
    pub uniqueness_ratio_min: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            sentiment_extreme: 0.85,
            word_count_min: 15,
            word_count_max: 200,
            adj_noun_ratio: 2.5,
            first_person_ratio: 0.15,
            spam_keyword_min: 3,
            caps_ratio_max: 0.20,
            excessive_punct_min: 3,
            uniqueness_ratio_min: 0.60,
        }
    }
}

/// Configuration for the review analyzer and its collaborators
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Hub checkpoint identifier
    pub checkpoint: String,
    /// Hub revision (branch, tag or commit)
    pub revision: String,
    /// Maximum number of tokens fed to the model, special tokens included
    pub max_length: usize,
    pub device: DevicePreference,
    /// Hub cache directory (hf-hub default when unset)
    pub cache_dir: Option<PathBuf>,
    pub feature_tier: FeatureTier,
    pub thresholds: Thresholds,
    /// Address the HTTP server binds to
    pub bind_addr: String,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            checkpoint: DEFAULT_CHECKPOINT.to_string(),
            revision: "main".to_string(),
            max_length: 512,
            device: DevicePreference::Auto,
            cache_dir: None,
            feature_tier: FeatureTier::Important,
            thresholds: Thresholds::default(),
            bind_addr: "127.0.0.1:8000".to_string(),
        }
    }
}

impl AnalyzerConfig {
    /// Load configuration from a JSON file; missing fields keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults, then the optional file, then environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Apply `REVIEW_ANALYZER_*` environment overrides
    pub fn apply_env(&mut self) {
        if let Some(checkpoint) = env_string("REVIEW_ANALYZER_CHECKPOINT") {
            self.checkpoint = checkpoint;
        }
        if let Some(revision) = env_string("REVIEW_ANALYZER_REVISION") {
            self.revision = revision;
        }
        if let Some(device) = env_string("REVIEW_ANALYZER_DEVICE") {
            match DevicePreference::parse(&device) {
                Some(device) => self.device = device,
                None => tracing::warn!("Ignoring unknown REVIEW_ANALYZER_DEVICE '{}'", device),
            }
        }
        if let Some(dir) = env_string("REVIEW_ANALYZER_CACHE_DIR") {
            self.cache_dir = Some(PathBuf::from(dir));
        }
        if let Some(addr) = env_string("REVIEW_ANALYZER_ADDR") {
            self.bind_addr = addr;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.checkpoint.trim().is_empty() {
            anyhow::bail!("checkpoint must not be empty");
        }
        // [CLS] and [SEP] need room
        if self.max_length < 2 {
            anyhow::bail!("max_length must be at least 2, got {}", self.max_length);
        }
        if self.thresholds.word_count_min > self.thresholds.word_count_max {
            anyhow::bail!(
                "word_count_min ({}) exceeds word_count_max ({})",
                self.thresholds.word_count_min,
                self.thresholds.word_count_max
            );
        }
        Ok(())
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnalyzerConfig::default();
        assert_eq!(config.checkpoint, DEFAULT_CHECKPOINT);
        assert_eq!(config.max_length, 512);
        assert_eq!(config.feature_tier, FeatureTier::Important);
        assert_eq!(config.thresholds.word_count_min, 15);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: AnalyzerConfig = serde_json::from_str(
            r#"{"device": "cpu", "feature_tier": "1", "thresholds": {"caps_ratio_max": 0.5}}"#,
        )
        .unwrap();
        assert_eq!(config.device, DevicePreference::Cpu);
        assert_eq!(config.feature_tier, FeatureTier::Essential);
        assert_eq!(config.thresholds.caps_ratio_max, 0.5);
        assert_eq!(config.thresholds.sentiment_extreme, 0.85);
        assert_eq!(config.checkpoint, DEFAULT_CHECKPOINT);
    }

    #[test]
    fn test_feature_tier_accepts_numbers_and_strings() {
        let config: AnalyzerConfig = serde_json::from_str(r#"{"feature_tier": 2}"#).unwrap();
        assert_eq!(config.feature_tier, FeatureTier::Important);
        let config: AnalyzerConfig = serde_json::from_str(r#"{"feature_tier": 1}"#).unwrap();
        assert_eq!(config.feature_tier, FeatureTier::Essential);
        let config: AnalyzerConfig = serde_json::from_str(r#"{"feature_tier": "2"}"#).unwrap();
        assert_eq!(config.feature_tier, FeatureTier::Important);

        assert!(serde_json::from_str::<AnalyzerConfig>(r#"{"feature_tier": 3}"#).is_err());
        assert!(serde_json::from_str::<AnalyzerConfig>(r#"{"feature_tier": "all"}"#).is_err());

        let value = serde_json::to_value(AnalyzerConfig::default()).unwrap();
        assert_eq!(value["feature_tier"], serde_json::json!(2));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AnalyzerConfig::default();
        config.max_length = 1;
        assert!(config.validate().is_err());

        let mut config = AnalyzerConfig::default();
        config.thresholds.word_count_min = 500;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_device_preference_parse() {
        assert_eq!(DevicePreference::parse("GPU"), Some(DevicePreference::Cuda));
        assert_eq!(DevicePreference::parse(" cpu "), Some(DevicePreference::Cpu));
        assert_eq!(DevicePreference::parse("tpu"), None);
    }
}
