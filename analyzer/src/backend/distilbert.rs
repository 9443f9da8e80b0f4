// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! DistilBERT sequence classifier on candle
//!
//! The encoder is `candle_transformers`' DistilBERT; the `pre_classifier` /
//! `classifier` head of the fine-tuned checkpoint sits on top of it.
//! Weights, config and tokenizer come from a Hugging Face hub checkpoint.
//! Each request is a single unpadded sequence, so the attention mask is
//! all zeros (nothing masked).

use super::{ModelBackend, ModelPrediction};
use crate::config::{AnalyzerConfig, DevicePreference};
use crate::labels::CheckpointLabel;
use anyhow::{Context, Result};
use candle_core::{DType, Device, IndexOp, Module, Tensor, D};
use candle_nn::{linear, Linear, VarBuilder};
use candle_transformers::models::distilbert::{Config as EncoderConfig, DistilBertModel};
use hf_hub::api::sync::{ApiBuilder, ApiRepo};
use hf_hub::{Repo, RepoType};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use tokenizers::Tokenizer;

/// Checkpoint `config.json` fields the classification head needs
#[derive(Debug, Clone, Deserialize)]
pub struct DistilBertConfig {
    pub dim: usize,
    pub n_layers: usize,
    pub max_position_embeddings: usize,
    #[serde(default)]
    pub id2label: HashMap<String, String>,
}

/// Encoder plus the `pre_classifier` / `classifier` head
struct SequenceClassifier {
    encoder: DistilBertModel,
    pre_classifier: Linear,
    classifier: Linear,
}

impl SequenceClassifier {
    fn load(
        vb: VarBuilder,
        encoder_config: &EncoderConfig,
        config: &DistilBertConfig,
        num_labels: usize,
    ) -> candle_core::Result<Self> {
        Ok(Self {
            encoder: DistilBertModel::load(vb.pp("distilbert"), encoder_config)?,
            pre_classifier: linear(config.dim, config.dim, vb.pp("pre_classifier"))?,
            classifier: linear(config.dim, num_labels, vb.pp("classifier"))?,
        })
    }

    /// Logits of shape (batch, num_labels)
    fn forward(&self, input_ids: &Tensor) -> candle_core::Result<Tensor> {
        let seq_len = input_ids.dim(1)?;
        let mask = Tensor::zeros((seq_len, seq_len), DType::U8, input_ids.device())?;
        let hidden = self.encoder.forward(input_ids, &mask)?;
        let cls = hidden.i((.., 0))?;
        let pooled = self.pre_classifier.forward(&cls)?.relu()?;
        self.classifier.forward(&pooled)
    }
}

/// Fine-tuned DistilBERT checkpoint served from the hub
pub struct DistilBertBackend {
    model: SequenceClassifier,
    tokenizer: Tokenizer,
    device: Device,
    checkpoint: String,
    max_length: usize,
}

impl DistilBertBackend {
    /// Download (or reuse the cached copy of) the checkpoint and build the model
    pub fn load(config: &AnalyzerConfig) -> Result<Self> {
        tracing::info!(
            "Loading DistilBERT checkpoint {} (revision {})",
            config.checkpoint,
            config.revision
        );

        let mut builder = ApiBuilder::new().with_progress(false);
        if let Some(ref dir) = config.cache_dir {
            builder = builder.with_cache_dir(dir.clone());
        }
        let api = builder.build().context("Failed to initialise Hugging Face hub client")?;
        let repo = api.repo(Repo::with_revision(
            config.checkpoint.clone(),
            RepoType::Model,
            config.revision.clone(),
        ));

        let config_path = fetch(&repo, "config.json")?;
        let raw = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        let model_config: DistilBertConfig =
            serde_json::from_str(&raw).context("Failed to parse DistilBERT config.json")?;
        let encoder_config: EncoderConfig =
            serde_json::from_str(&raw).context("Failed to parse DistilBERT encoder config")?;
        if !model_config.id2label.is_empty() {
            tracing::debug!("Checkpoint labels: {:?}", model_config.id2label);
        }

        let tokenizer_path = fetch(&repo, "tokenizer.json")?;
        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("Failed to load tokenizer from {}", tokenizer_path.display()))?;

        let device = select_device(config.device)?;
        let vb = load_weights(&repo, &device)?;
        let model = SequenceClassifier::load(
            vb,
            &encoder_config,
            &model_config,
            CheckpointLabel::NUM_CLASSES,
        )
        .context("Failed to build DistilBERT from checkpoint weights")?;

        let max_length = config.max_length.min(model_config.max_position_embeddings);
        tracing::info!(
            "Model loaded on {:?} ({} layers, max_length={})",
            device,
            model_config.n_layers,
            max_length
        );

        Ok(Self {
            model,
            tokenizer,
            device,
            checkpoint: config.checkpoint.clone(),
            max_length,
        })
    }

    fn encode(&self, text: &str) -> Result<Tensor> {
        let encoding = self.tokenizer.encode(text, true).map_err(anyhow::Error::msg)?;
        let ids = truncate_ids(encoding.get_ids(), self.max_length);
        if ids.is_empty() {
            anyhow::bail!("tokenizer produced no tokens");
        }
        Ok(Tensor::new(ids.as_slice(), &self.device)?.unsqueeze(0)?)
    }
}

impl ModelBackend for DistilBertBackend {
    fn classify(&self, text: &str) -> Result<ModelPrediction> {
        let input_ids = self.encode(text)?;
        let logits = self.model.forward(&input_ids)?;
        let probabilities = candle_nn::ops::softmax(&logits, D::Minus1)?
            .squeeze(0)?
            .to_dtype(DType::F32)?
            .to_vec1::<f32>()?;
        ModelPrediction::from_probabilities(&probabilities)
    }

    fn is_loaded(&self) -> bool {
        true
    }

    fn checkpoint(&self) -> &str {
        &self.checkpoint
    }
}

fn fetch(repo: &ApiRepo, filename: &str) -> Result<PathBuf> {
    repo.get(filename)
        .with_context(|| format!("Failed to fetch {} from the hub", filename))
}

fn select_device(preference: DevicePreference) -> Result<Device> {
    let device = match preference {
        DevicePreference::Auto => Device::cuda_if_available(0)?,
        DevicePreference::Cpu => Device::Cpu,
        DevicePreference::Cuda => Device::new_cuda(0).context("CUDA device requested but unavailable")?,
    };
    Ok(device)
}

fn load_weights(repo: &ApiRepo, device: &Device) -> Result<VarBuilder<'static>> {
    match repo.get("model.safetensors") {
        Ok(path) => {
            let bytes = std::fs::read(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Ok(VarBuilder::from_buffered_safetensors(bytes, DType::F32, device)?)
        }
        Err(err) => {
            tracing::warn!("model.safetensors unavailable ({}), falling back to pytorch_model.bin", err);
            let path = fetch(repo, "pytorch_model.bin")?;
            Ok(VarBuilder::from_pth(&path, DType::F32, device)?)
        }
    }
}

/// Cut token ids to `max_length`, keeping the trailing separator token
fn truncate_ids(ids: &[u32], max_length: usize) -> Vec<u32> {
    if ids.len() <= max_length {
        return ids.to_vec();
    }
    // No room for the separator
    if max_length < 2 {
        return ids[..max_length].to_vec();
    }
    let mut truncated = ids[..max_length - 1].to_vec();
    if let Some(&last) = ids.last() {
        truncated.push(last);
    }
    truncated
}
