// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Hybrid analysis: model verdict plus rule-based explanation
//!
//! The model is the primary (most accurate) verdict; the explanation layer
//! says why. Both run on every review and their verdicts are reconciled
//! into an agreement flag.

use crate::backend::ModelBackend;
use crate::explainability::{preview, Explainer, Reason, XaiVerdict};
use crate::features::FeatureSet;
use crate::labels::{CheckpointLabel, Verdict};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Explanation-layer part of a hybrid analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplanationSummary {
    pub verdict: XaiVerdict,
    /// Explanation-layer confidence in percent
    pub xai_confidence: u32,
    pub reasons: Vec<Reason>,
    pub features: FeatureSet,
    pub flag_count: usize,
}

/// Combined result of one hybrid analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HybridAnalysis {
    pub review_text: String,
    pub prediction: Verdict,
    pub confidence: f64,
    pub model_label: CheckpointLabel,
    pub probabilities: Vec<f64>,
    pub explanation: ExplanationSummary,
    /// Whether the model and the explanation layer point the same way
    pub agreement: bool,
    pub analyzed_at: DateTime<Utc>,
}

/// True iff both verdicts have the same FAKE/REAL polarity
pub fn verdicts_agree(model: Verdict, xai: XaiVerdict) -> bool {
    model.is_fake() == xai.indicates_fake()
}

/// Runs the model backend and the explainer on the same text
pub struct HybridAnalyzer {
    backend: Box<dyn ModelBackend>,
    explainer: Box<dyn Explainer>,
}

impl HybridAnalyzer {
    pub fn new(backend: Box<dyn ModelBackend>, explainer: Box<dyn Explainer>) -> Self {
        tracing::info!(
            "Hybrid analyzer ready (model={}, explainer={})",
            backend.checkpoint(),
            explainer.name()
        );
        Self { backend, explainer }
    }

    pub fn backend(&self) -> &dyn ModelBackend {
        self.backend.as_ref()
    }

    pub fn explainer(&self) -> &dyn Explainer {
        self.explainer.as_ref()
    }

    pub fn analyze(&self, review_text: &str) -> Result<HybridAnalysis> {
        let model = self
            .backend
            .classify(review_text)
            .context("model prediction failed")?;
        let xai = self
            .explainer
            .analyze(review_text)
            .context("explanation failed")?;

        let agreement = verdicts_agree(model.prediction, xai.verdict);
        if !agreement {
            tracing::debug!(
                model = %model.prediction,
                xai = %xai.verdict,
                "Model and explanation layer disagree"
            );
        }

        Ok(HybridAnalysis {
            review_text: review_text.to_string(),
            prediction: model.prediction,
            confidence: model.confidence,
            model_label: model.label,
            probabilities: model.probabilities,
            explanation: ExplanationSummary {
                verdict: xai.verdict,
                xai_confidence: xai.confidence,
                reasons: xai.reasons,
                features: xai.features,
                flag_count: xai.flag_count,
            },
            agreement,
            analyzed_at: Utc::now(),
        })
    }

    /// Format a hybrid analysis as a readable text report
    pub fn format_result(analysis: &HybridAnalysis) -> String {
        let rule = "=".repeat(70);
        let thin = "-".repeat(70);
        let mut lines = vec![
            rule.clone(),
            "HYBRID ANALYSIS: DistilBERT + XAI".to_string(),
            rule.clone(),
            format!("\nReview: \"{}...\"", preview(&analysis.review_text, 100)),
            format!("\n{}", thin),
            "MODEL PREDICTION (Primary)".to_string(),
            thin.clone(),
            format!("Prediction:  {}", analysis.prediction),
            format!("Confidence:  {:.1}%", analysis.confidence * 100.0),
            "Probabilities:".to_string(),
        ];
        for (class_id, probability) in analysis.probabilities.iter().enumerate() {
            if let Some(label) = CheckpointLabel::from_class_id(class_id) {
                lines.push(format!(
                    "  {} ({}): {:.1}%",
                    label.verdict(),
                    label,
                    probability * 100.0
                ));
            }
        }

        let explanation = &analysis.explanation;
        lines.push(format!("\n{}", thin));
        lines.push("XAI EXPLANATION (Why?)".to_string());
        lines.push(thin.clone());
        lines.push(format!("XAI Verdict:    {}", explanation.verdict));
        lines.push(format!("XAI Confidence: {}%", explanation.xai_confidence));
        lines.push(format!("Flags Detected: {}", explanation.flag_count));

        if !explanation.reasons.is_empty() {
            lines.push("\nReasons:".to_string());
            for (i, reason) in explanation.reasons.iter().enumerate() {
                lines.push(format!("\n  {}. {}", i + 1, reason.feature));
                lines.push(format!("     {}", reason.message));
                lines.push(format!("     → {}", reason.detail));
            }
        }

        lines.push(format!("\n{}", thin));
        if analysis.agreement {
            lines.push("Model and XAI agree on classification".to_string());
        } else {
            lines.push("Model and XAI disagree - may need manual review".to_string());
        }
        lines.push(rule);

        lines.join("\n")
    }
}
