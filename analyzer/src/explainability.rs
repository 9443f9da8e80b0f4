// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Explainability layer for fake review detection
//!
//! Provides:
//! - The secondary, rule-based verdict that is reconciled with the model
//! - Human-readable reasons for every rule that fired
//! - A pluggable [`Explainer`] trait so the heuristics can be swapped

use crate::config::{FeatureTier, Thresholds};
use crate::features::{FeatureExtractor, FeatureSet};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Feature name of the note added when no rule fires
pub const OVERALL_FEATURE: &str = "Overall";

/// Score at or above which a review is likely fake
const FAKE_SCORE: u32 = 50;
/// Score at or above which a review is suspicious
const SUSPICIOUS_SCORE: u32 = 25;
const MAX_CONFIDENCE: u32 = 95;
const GENUINE_CONFIDENCE: u32 = 85;

/// Verdict of the explanation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum XaiVerdict {
    #[serde(rename = "LIKELY FAKE")]
    LikelyFake,
    #[serde(rename = "SUSPICIOUS")]
    Suspicious,
    #[serde(rename = "LIKELY GENUINE")]
    LikelyGenuine,
}

impl XaiVerdict {
    /// Suspicious reviews count as fake when reconciling with the model
    pub fn indicates_fake(&self) -> bool {
        matches!(self, XaiVerdict::LikelyFake | XaiVerdict::Suspicious)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            XaiVerdict::LikelyFake => "LIKELY FAKE",
            XaiVerdict::Suspicious => "SUSPICIOUS",
            XaiVerdict::LikelyGenuine => "LIKELY GENUINE",
        }
    }
}

impl fmt::Display for XaiVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One human-readable reason behind a verdict
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reason {
    /// Feature group (e.g. "Sentiment", "Length")
    pub feature: String,
    /// What was observed
    pub message: String,
    /// Why it matters
    pub detail: String,
}

impl Reason {
    /// Whether this reason reflects a triggered rule rather than the overall note
    pub fn is_flag(&self) -> bool {
        self.feature != OVERALL_FEATURE
    }
}

/// Complete output of the explanation layer for one review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XaiAnalysis {
    pub review_text: String,
    pub features: FeatureSet,
    pub verdict: XaiVerdict,
    /// Confidence in percent
    pub confidence: u32,
    pub reasons: Vec<Reason>,
    /// Number of rules that fired
    pub flag_count: usize,
}

/// Trait for components that produce the secondary verdict
pub trait Explainer: Send + Sync {
    /// Analyze a review and explain the verdict
    fn analyze(&self, text: &str) -> Result<XaiAnalysis>;

    /// Get explainer name
    fn name(&self) -> &str;
}

/// Accumulates triggered rules and their points
struct ScoreBuilder {
    reasons: Vec<Reason>,
    score: u32,
}

impl ScoreBuilder {
    fn new() -> Self {
        Self {
            reasons: Vec::new(),
            score: 0,
        }
    }

    fn with_flag(mut self, feature: &str, message: String, detail: String, points: u32) -> Self {
        self.reasons.push(Reason {
            feature: feature.to_string(),
            message,
            detail,
        });
        self.score += points;
        self
    }

    fn build(mut self, review_text: &str, features: FeatureSet) -> XaiAnalysis {
        let flag_count = self.reasons.len();
        let (verdict, confidence) = if self.score >= FAKE_SCORE {
            (XaiVerdict::LikelyFake, self.score.min(MAX_CONFIDENCE))
        } else if self.score >= SUSPICIOUS_SCORE {
            (XaiVerdict::Suspicious, self.score + 30)
        } else {
            self.reasons.push(Reason {
                feature: OVERALL_FEATURE.to_string(),
                message: "No significant suspicious patterns detected".to_string(),
                detail: "Review appears to have natural linguistic characteristics".to_string(),
            });
            (XaiVerdict::LikelyGenuine, GENUINE_CONFIDENCE)
        };

        XaiAnalysis {
            review_text: review_text.to_string(),
            features,
            verdict,
            confidence,
            reasons: self.reasons,
            flag_count,
        }
    }
}

/// Threshold rules over extracted linguistic features
#[derive(Debug, Clone)]
pub struct RuleBasedExplainer {
    extractor: FeatureExtractor,
    thresholds: Thresholds,
    tier: FeatureTier,
}

impl Default for RuleBasedExplainer {
    fn default() -> Self {
        Self::new(Thresholds::default(), FeatureTier::Important)
    }
}

impl RuleBasedExplainer {
    pub fn new(thresholds: Thresholds, tier: FeatureTier) -> Self {
        Self {
            extractor: FeatureExtractor::new(),
            thresholds,
            tier,
        }
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Score the review against every threshold rule
    pub fn explain(&self, text: &str) -> XaiAnalysis {
        let features = self.extractor.extract(text, self.tier);
        let t = &self.thresholds;
        let mut builder = ScoreBuilder::new();

        if features.sentiment.abs() > t.sentiment_extreme {
            let polarity = if features.sentiment > 0.0 { "positive" } else { "negative" };
            builder = builder.with_flag(
                "Sentiment",
                format!("Extremely {} sentiment (score: {:.2}/1.0)", polarity, features.sentiment),
                "Genuine reviews typically show more balanced emotions".to_string(),
                25,
            );
        }

        if features.word_count < t.word_count_min {
            builder = builder.with_flag(
                "Length",
                format!("Suspiciously short review ({} words)", features.word_count),
                "Genuine reviews typically provide more detail".to_string(),
                15,
            );
        } else if features.word_count >= t.word_count_max {
            builder = builder.with_flag(
                "Length",
                format!("Unusually long review ({} words)", features.word_count),
                "May contain padding or excessive fluff".to_string(),
                10,
            );
        }

        if features.adj_noun_ratio > t.adj_noun_ratio {
            builder = builder.with_flag(
                "Specificity",
                format!(
                    "Excessive descriptive language (adj/noun ratio: {:.1}x)",
                    features.adj_noun_ratio
                ),
                format!(
                    "Uses {} adjectives but only {} nouns - lacks specific details",
                    features.adjective_count, features.noun_count
                ),
                25,
            );
        }

        if features.first_person_ratio > t.first_person_ratio {
            builder = builder.with_flag(
                "Self-Reference",
                format!(
                    "Excessive self-referencing ({:.1}% of words)",
                    features.first_person_ratio * 100.0
                ),
                format!(
                    "Uses first-person pronouns {} times - appears overly personal",
                    features.first_person_count
                ),
                20,
            );
        }

        if let Some(count) = features.spam_keyword_count {
            if count >= t.spam_keyword_min {
                builder = builder.with_flag(
                    "Spam Language",
                    format!("Contains {} spam/promotional keywords", count),
                    "High use of marketing language".to_string(),
                    15,
                );
            }
        }

        if let Some(ratio) = features.caps_ratio {
            if ratio > t.caps_ratio_max {
                builder = builder.with_flag(
                    "Capitalization",
                    format!("Excessive capitalization ({:.1}% of words)", ratio * 100.0),
                    "Indicates emotional exaggeration".to_string(),
                    10,
                );
            }
        }

        if let Some(count) = features.excessive_punct_count {
            if count >= t.excessive_punct_min {
                builder = builder.with_flag(
                    "Punctuation",
                    format!("Excessive punctuation patterns ({} instances)", count),
                    "Indicates emotional manipulation".to_string(),
                    10,
                );
            }
        }

        if let Some(ratio) = features.uniqueness_ratio {
            if ratio < t.uniqueness_ratio_min {
                builder = builder.with_flag(
                    "Redundancy",
                    format!("High text redundancy ({:.1}% unique words)", ratio * 100.0),
                    "Repetitive language without substance".to_string(),
                    15,
                );
            }
        }

        let analysis = builder.build(text, features);
        tracing::debug!(
            verdict = %analysis.verdict,
            confidence = analysis.confidence,
            flags = analysis.flag_count,
            "Explanation layer verdict"
        );
        analysis
    }
}

impl Explainer for RuleBasedExplainer {
    fn analyze(&self, text: &str) -> Result<XaiAnalysis> {
        Ok(self.explain(text))
    }

    fn name(&self) -> &str {
        "RuleBased"
    }
}

/// Format an explanation-layer analysis as a standalone text report
pub fn format_explanation_text(analysis: &XaiAnalysis) -> String {
    let rule = "=".repeat(60);
    let mut lines = vec![
        rule.clone(),
        "FAKE REVIEW DETECTION - XAI ANALYSIS".to_string(),
        rule.clone(),
        format!("\nReview: \"{}...\"", preview(&analysis.review_text, 100)),
        format!("\nVERDICT: {}", analysis.verdict),
        format!("CONFIDENCE: {}%", analysis.confidence),
        format!(
            "\n{}",
            if analysis.flag_count > 0 { "SUSPICIOUS INDICATORS:" } else { "ANALYSIS:" }
        ),
        "-".repeat(60),
    ];

    for (i, reason) in analysis.reasons.iter().enumerate() {
        lines.push(format!("\n{}. {}", i + 1, reason.feature));
        lines.push(format!("   {}", reason.message));
        lines.push(format!("   → {}", reason.detail));
    }

    lines.push(format!("\n{}", rule));
    lines.join("\n")
}

/// First `max_chars` characters of a text
pub(crate) fn preview(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
