// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Review analyzer: the single entry point for hosting servers
//!
//! Every failure is folded into a response with `success: false` and an
//! `error` message; callers check `success` before reading the prediction.

use crate::backend::{DistilBertBackend, ModelBackend};
use crate::config::AnalyzerConfig;
use crate::error::AnalysisError;
use crate::explainability::{Explainer, RuleBasedExplainer, XaiVerdict};
use crate::hybrid::{HybridAnalysis, HybridAnalyzer};
use crate::labels::Verdict;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

const NO_PATTERNS: &str = "No suspicious patterns detected.";
const SMOKE_TEST_REVIEW: &str = "Test review";

const FEATURE_NAMES: &[&str] = &[
    "Sentiment Analysis",
    "Word Count",
    "Adjective-to-Noun Ratio",
    "First-Person Pronoun Usage",
    "Spam Keywords",
    "Excessive Capitalization",
    "Excessive Punctuation",
    "Text Redundancy",
];

/// Reconciliation details of a successful analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseDetails {
    pub model_verdict: Verdict,
    pub xai_verdict: XaiVerdict,
    pub flags: usize,
    pub agreement: bool,
}

/// JSON-ready response of [`ReviewAnalyzer::predict`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction: Option<Verdict>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<ResponseDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnalysisResponse {
    /// Failure response carrying only the error message
    pub fn failure(error: impl std::fmt::Display) -> Self {
        Self {
            success: false,
            prediction: None,
            confidence: None,
            explanation: None,
            details: None,
            error: Some(error.to_string()),
        }
    }

    fn from_analysis(analysis: &HybridAnalysis) -> Self {
        Self {
            success: true,
            prediction: Some(analysis.prediction),
            confidence: Some(round4(analysis.confidence)),
            explanation: Some(format_explanation(analysis)),
            details: Some(ResponseDetails {
                model_verdict: analysis.prediction,
                xai_verdict: analysis.explanation.verdict,
                flags: analysis.explanation.flag_count,
                agreement: analysis.agreement,
            }),
            error: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// Result of [`ReviewAnalyzer::health_check`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub model_loaded: bool,
    /// Whether the smoke prediction succeeded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_prediction: Option<bool>,
    /// Why the analyzer is unhealthy; never set on a healthy report
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Static metadata about the analyzer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub model_name: String,
    pub model_type: String,
    pub model_checkpoint: String,
    pub features: Vec<String>,
    pub labels: BTreeMap<String, String>,
    pub output_format: BTreeMap<String, String>,
}

impl ModelInfo {
    fn for_checkpoint(checkpoint: &str) -> Self {
        let labels = BTreeMap::from([
            (
                Verdict::Fake.to_string(),
                "Computer Generated (CG) - Likely fake review".to_string(),
            ),
            (
                Verdict::Real.to_string(),
                "Original (OR) - Likely genuine review".to_string(),
            ),
        ]);
        let output_format = BTreeMap::from([
            ("prediction".to_string(), "FAKE or REAL".to_string()),
            ("confidence".to_string(), "float 0.0-1.0".to_string()),
            ("explanation".to_string(), "human-readable string".to_string()),
            ("details".to_string(), "additional metadata".to_string()),
        ]);
        Self {
            model_name: "DistilBERT Fine-tuned for Fake Review Detection".to_string(),
            model_type: "Hybrid (DistilBERT + Rule-based XAI)".to_string(),
            model_checkpoint: checkpoint.to_string(),
            features: FEATURE_NAMES.iter().map(|f| f.to_string()).collect(),
            labels,
            output_format,
        }
    }
}

/// Fake review analyzer wrapping the hybrid model + explanation pipeline
pub struct ReviewAnalyzer {
    hybrid: HybridAnalyzer,
    info: ModelInfo,
}

impl ReviewAnalyzer {
    /// Load the default checkpoint with default settings
    pub fn new() -> Result<Self> {
        Self::from_config(&AnalyzerConfig::default())
    }

    /// Load the configured checkpoint and build the rule-based explainer
    pub fn from_config(config: &AnalyzerConfig) -> Result<Self> {
        config.validate()?;
        tracing::info!("Initializing review analyzer");
        let backend = DistilBertBackend::load(config)?;
        let explainer = RuleBasedExplainer::new(config.thresholds.clone(), config.feature_tier);
        let analyzer = Self::with_components(Box::new(backend), Box::new(explainer));
        tracing::info!("Review analyzer ready for predictions");
        Ok(analyzer)
    }

    /// Assemble an analyzer from already constructed collaborators
    pub fn with_components(backend: Box<dyn ModelBackend>, explainer: Box<dyn Explainer>) -> Self {
        let info = ModelInfo::for_checkpoint(backend.checkpoint());
        Self {
            hybrid: HybridAnalyzer::new(backend, explainer),
            info,
        }
    }

    /// Analyze a single review
    pub fn predict(&self, review_text: &str) -> AnalysisResponse {
        match self.try_predict(review_text) {
            Ok(analysis) => AnalysisResponse::from_analysis(&analysis),
            Err(err) => {
                if !err.is_validation() {
                    tracing::warn!("{}", err);
                }
                AnalysisResponse::failure(&err)
            }
        }
    }

    /// Analyze a review given as an arbitrary JSON value
    pub fn predict_value(&self, review: &Value) -> AnalysisResponse {
        match review {
            Value::String(text) => self.predict(text),
            Value::Null => AnalysisResponse::failure(&AnalysisError::Empty),
            _ => AnalysisResponse::failure(&AnalysisError::NotAString),
        }
    }

    /// Full hybrid analysis with validation, for callers that want every detail
    pub fn try_predict(&self, review_text: &str) -> std::result::Result<HybridAnalysis, AnalysisError> {
        let text = validate(review_text)?;
        let analysis = self
            .hybrid
            .analyze(text)
            .map_err(|err| AnalysisError::failed(&err))?;
        tracing::debug!(
            prediction = %analysis.prediction,
            confidence = analysis.confidence,
            xai = %analysis.explanation.verdict,
            agreement = analysis.agreement,
            "Review analyzed"
        );
        Ok(analysis)
    }

    pub fn get_model_info(&self) -> ModelInfo {
        self.info.clone()
    }

    pub fn health_check(&self) -> HealthReport {
        if !self.hybrid.backend().is_loaded() {
            return HealthReport {
                status: HealthStatus::Unhealthy,
                model_loaded: false,
                test_prediction: None,
                error: Some("model backend is not initialized".to_string()),
            };
        }
        let smoke = self.predict(SMOKE_TEST_REVIEW);
        if let Some(ref error) = smoke.error {
            tracing::warn!("Health check smoke prediction failed: {}", error);
        }
        HealthReport {
            status: HealthStatus::Healthy,
            model_loaded: true,
            test_prediction: Some(smoke.success),
            error: None,
        }
    }

    pub fn hybrid(&self) -> &HybridAnalyzer {
        &self.hybrid
    }
}

/// Trimmed review text, or the matching validation error
fn validate(review_text: &str) -> std::result::Result<&str, AnalysisError> {
    if review_text.is_empty() {
        return Err(AnalysisError::Empty);
    }
    let trimmed = review_text.trim();
    if trimmed.is_empty() {
        return Err(AnalysisError::WhitespaceOnly);
    }
    Ok(trimmed)
}

/// Join "feature: detail" for every triggered rule
fn format_explanation(analysis: &HybridAnalysis) -> String {
    let parts: Vec<String> = analysis
        .explanation
        .reasons
        .iter()
        .filter(|reason| reason.is_flag())
        .map(|reason| format!("{}: {}", reason.feature, reason.detail))
        .collect();
    if parts.is_empty() {
        NO_PATTERNS.to_string()
    } else {
        parts.join("; ")
    }
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::StaticBackend;
    use serde_json::json;

    fn analyzer(backend: StaticBackend) -> ReviewAnalyzer {
        ReviewAnalyzer::with_components(Box::new(backend), Box::new(RuleBasedExplainer::default()))
    }

    #[test]
    fn test_predict_success_shape() {
        let analyzer = analyzer(StaticBackend::real(0.8731));
        let response = analyzer.predict("Great product!");

        assert!(response.success);
        assert!(matches!(response.prediction, Some(Verdict::Fake | Verdict::Real)));
        let confidence = response.confidence.unwrap();
        assert!((0.0..=1.0).contains(&confidence));
        assert_eq!(confidence, 0.8731);
        assert!(response.error.is_none());

        let details = response.details.unwrap();
        assert_eq!(details.model_verdict, Verdict::Real);
        assert_eq!(details.xai_verdict, XaiVerdict::LikelyGenuine);
        assert_eq!(details.flags, 1);
        assert!(details.agreement);
        assert_eq!(
            response.explanation.as_deref(),
            Some("Length: Genuine reviews typically provide more detail")
        );
    }

    #[test]
    fn test_documented_fake_example() {
        let analyzer = analyzer(StaticBackend::fake(0.95));
        let response = analyzer.predict("AMAZING!!! Best product ever!!!");

        assert!(response.success);
        assert_eq!(response.prediction, Some(Verdict::Fake));
        let details = response.details.unwrap();
        assert!(details.agreement);
        assert_eq!(details.xai_verdict, XaiVerdict::Suspicious);
        assert_eq!(
            response.explanation.as_deref(),
            Some(
                "Sentiment: Genuine reviews typically show more balanced emotions; \
                 Length: Genuine reviews typically provide more detail"
            )
        );
    }

    #[test]
    fn test_agreement_matches_polarity() {
        let fake = analyzer(StaticBackend::fake(0.9));
        let real = analyzer(StaticBackend::real(0.9));
        let genuine_text = "Bought this laptop three weeks ago for school and the battery lasts \
                            about six hours on a single charge with normal use.";

        assert!(!fake.predict(genuine_text).details.unwrap().agreement);
        assert!(real.predict(genuine_text).details.unwrap().agreement);
        assert_eq!(
            real.predict(genuine_text).explanation.as_deref(),
            Some(NO_PATTERNS)
        );
    }

    #[test]
    fn test_confidence_in_range_for_varied_inputs() {
        let analyzer = analyzer(StaticBackend::fake(0.123456));
        for text in ["a", "Great product!", "  padded  ", "ÜBER GUT!!!", "?!?!?!"] {
            let response = analyzer.predict(text);
            assert!(response.success, "failed on {:?}", text);
            let confidence = response.confidence.unwrap();
            assert!((0.0..=1.0).contains(&confidence));
            assert_eq!(confidence, 0.1235);
        }
    }

    #[test]
    fn test_validation_errors() {
        let analyzer = analyzer(StaticBackend::fake(0.9));

        let response = analyzer.predict("");
        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some("Review text cannot be empty"));
        assert!(response.prediction.is_none());

        let response = analyzer.predict(" \n\t ");
        assert_eq!(
            response.error.as_deref(),
            Some("Review text cannot be empty or whitespace only")
        );

        let response = analyzer.predict_value(&Value::Null);
        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some("Review text cannot be empty"));

        for value in [json!(42), json!(true), json!(["text"]), json!({"review": "x"})] {
            let response = analyzer.predict_value(&value);
            assert!(!response.success);
            assert_eq!(response.error.as_deref(), Some("Review text must be a string"));
        }

        assert!(analyzer.predict_value(&json!("Great product!")).success);
    }

    #[test]
    fn test_collaborator_failure_is_wrapped() {
        let analyzer = analyzer(StaticBackend::failing("out of memory"));
        let response = analyzer.predict("Great product!");
        assert!(!response.success);
        assert_eq!(
            response.error.as_deref(),
            Some("Analysis failed: model prediction failed: out of memory")
        );
        assert!(response.details.is_none());
    }

    #[test]
    fn test_failure_serializes_to_fixed_shape() {
        let response = AnalysisResponse::failure(&AnalysisError::Empty);
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"success": false, "error": "Review text cannot be empty"})
        );
    }

    #[test]
    fn test_failure_from_plain_message() {
        let response = AnalysisResponse::failure("Invalid request body: expected value");
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"success": false, "error": "Invalid request body: expected value"})
        );
        assert_eq!(
            response,
            AnalysisResponse::failure(String::from("Invalid request body: expected value"))
        );
    }

    #[test]
    fn test_from_config_rejects_invalid_config_before_loading() {
        let config = AnalyzerConfig {
            max_length: 0,
            ..AnalyzerConfig::default()
        };
        let err = ReviewAnalyzer::from_config(&config).err().unwrap();
        assert!(err.to_string().contains("max_length"), "error was {}", err);
    }

    #[test]
    fn test_success_serializes_details() {
        let analyzer = analyzer(StaticBackend::fake(0.9));
        let value = serde_json::to_value(analyzer.predict("Great product!")).unwrap();
        assert_eq!(value["success"], json!(true));
        assert_eq!(value["prediction"], json!("FAKE"));
        assert_eq!(value["details"]["model_verdict"], json!("FAKE"));
        assert_eq!(value["details"]["xai_verdict"], json!("LIKELY GENUINE"));
        assert_eq!(value["details"]["agreement"], json!(false));
        assert!(value["details"]["flags"].as_u64().is_some());
        assert!(value.get("error").is_none());
    }

    #[test]
    fn test_health_check() {
        let report = analyzer(StaticBackend::fake(0.9)).health_check();
        assert_eq!(report.status, HealthStatus::Healthy);
        assert!(report.model_loaded);
        assert_eq!(report.test_prediction, Some(true));

        let report = analyzer(StaticBackend::failing("boom")).health_check();
        assert_eq!(report.status, HealthStatus::Healthy);
        assert!(report.model_loaded);
        assert_eq!(report.test_prediction, Some(false));
        assert!(report.error.is_none());
        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({"status": "healthy", "model_loaded": true, "test_prediction": false})
        );

        let report = analyzer(StaticBackend::unloaded()).health_check();
        assert_eq!(report.status, HealthStatus::Unhealthy);
        assert!(!report.model_loaded);
        assert_eq!(
            serde_json::to_value(&report).unwrap()["status"],
            json!("unhealthy")
        );
    }

    #[test]
    fn test_model_info_is_idempotent() {
        let analyzer = analyzer(StaticBackend::fake(0.9));
        let first = analyzer.get_model_info();
        let second = analyzer.get_model_info();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
        assert_eq!(first.features.len(), 8);
        assert!(first.labels.contains_key("FAKE"));
        assert!(first.labels.contains_key("REAL"));
    }
}
