// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Model backends producing the primary FAKE/REAL verdict
//!
//! The production backend is [`DistilBertBackend`], a fine-tuned DistilBERT
//! sequence classifier pulled from the Hugging Face hub. [`StaticBackend`]
//! returns a fixed answer and is used for tests and offline wiring.

mod distilbert;

pub use distilbert::{DistilBertBackend, DistilBertConfig};

use crate::labels::{CheckpointLabel, Verdict};
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Primary prediction for one review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPrediction {
    pub label: CheckpointLabel,
    pub prediction: Verdict,
    /// Probability of the predicted class
    pub confidence: f64,
    /// Class probabilities, indexed by class id ([p_fake, p_real])
    pub probabilities: Vec<f64>,
}

impl ModelPrediction {
    /// Build a prediction from softmax output
    pub fn from_probabilities(probabilities: &[f32]) -> Result<Self> {
        if probabilities.len() != CheckpointLabel::NUM_CLASSES {
            anyhow::bail!(
                "expected {} class probabilities, got {}",
                CheckpointLabel::NUM_CLASSES,
                probabilities.len()
            );
        }
        if probabilities.iter().any(|p| !p.is_finite()) {
            anyhow::bail!("model produced non-finite probabilities: {:?}", probabilities);
        }

        let (class_id, confidence) = probabilities
            .iter()
            .copied()
            .enumerate()
            .fold((0, f32::MIN), |best, (id, p)| if p > best.1 { (id, p) } else { best });
        let label = CheckpointLabel::from_class_id(class_id)
            .ok_or_else(|| anyhow::anyhow!("unknown class id {}", class_id))?;

        Ok(Self {
            label,
            prediction: label.verdict(),
            confidence: f64::from(confidence).clamp(0.0, 1.0),
            probabilities: probabilities.iter().map(|&p| f64::from(p)).collect(),
        })
    }
}

/// Trait for sequence classifiers behind the analyzer
pub trait ModelBackend: Send + Sync {
    /// Classify a single review text
    fn classify(&self, text: &str) -> Result<ModelPrediction>;

    /// Whether the weights and tokenizer are loaded and ready
    fn is_loaded(&self) -> bool;

    /// Checkpoint identifier the backend serves
    fn checkpoint(&self) -> &str;
}

/// Backend with a fixed answer
#[derive(Debug, Clone)]
pub struct StaticBackend {
    outcome: std::result::Result<ModelPrediction, String>,
    loaded: bool,
}

impl StaticBackend {
    /// Always predict `label` with the given confidence
    pub fn new(label: CheckpointLabel, confidence: f32) -> Self {
        let confidence = confidence.clamp(0.0, 1.0);
        let mut probabilities = [0.0f32; CheckpointLabel::NUM_CLASSES];
        probabilities[label.class_id()] = confidence;
        probabilities[1 - label.class_id()] = 1.0 - confidence;
        let prediction = ModelPrediction {
            label,
            prediction: label.verdict(),
            confidence: f64::from(confidence),
            probabilities: probabilities.iter().map(|&p| f64::from(p)).collect(),
        };
        Self {
            outcome: Ok(prediction),
            loaded: true,
        }
    }

    pub fn fake(confidence: f32) -> Self {
        Self::new(CheckpointLabel::Cg, confidence)
    }

    pub fn real(confidence: f32) -> Self {
        Self::new(CheckpointLabel::Or, confidence)
    }

    /// Always fail inference with `message`
    pub fn failing(message: &str) -> Self {
        Self {
            outcome: Err(message.to_string()),
            loaded: true,
        }
    }

    /// A backend that reports itself as not initialized
    pub fn unloaded() -> Self {
        Self {
            outcome: Err("model is not loaded".to_string()),
            loaded: false,
        }
    }
}

impl ModelBackend for StaticBackend {
    fn classify(&self, _text: &str) -> Result<ModelPrediction> {
        self.outcome.clone().map_err(anyhow::Error::msg)
    }

    fn is_loaded(&self) -> bool {
        self.loaded
    }

    fn checkpoint(&self) -> &str {
        "static"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_probabilities_picks_argmax() {
        let prediction = ModelPrediction::from_probabilities(&[0.8, 0.2]).unwrap();
        assert_eq!(prediction.label, CheckpointLabel::Cg);
        assert_eq!(prediction.prediction, Verdict::Fake);
        assert!((prediction.confidence - 0.8).abs() < 1e-6);

        let prediction = ModelPrediction::from_probabilities(&[0.3, 0.7]).unwrap();
        assert_eq!(prediction.prediction, Verdict::Real);
        assert_eq!(prediction.probabilities.len(), 2);
    }

    #[test]
    fn test_from_probabilities_rejects_bad_input() {
        assert!(ModelPrediction::from_probabilities(&[1.0]).is_err());
        assert!(ModelPrediction::from_probabilities(&[0.2, 0.3, 0.5]).is_err());
        assert!(ModelPrediction::from_probabilities(&[f32::NAN, 0.5]).is_err());
    }

    #[test]
    fn test_static_backend() {
        let backend = StaticBackend::fake(0.9);
        let prediction = backend.classify("anything").unwrap();
        assert_eq!(prediction.prediction, Verdict::Fake);
        assert!((prediction.probabilities[0] - 0.9).abs() < 1e-6);
        assert!((prediction.probabilities[1] - 0.1).abs() < 1e-6);
        assert!(backend.is_loaded());

        let failing = StaticBackend::failing("CUDA out of memory");
        let err = failing.classify("anything").unwrap_err();
        assert_eq!(err.to_string(), "CUDA out of memory");

        assert!(!StaticBackend::unloaded().is_loaded());
    }
}
