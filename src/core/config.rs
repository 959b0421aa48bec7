//! Configuration for the classification pipeline.
//!
//! This module provides the deployment-time configuration surface consumed
//! by the inference core: the artifact path, the model input side length,
//! the normalization policy, and the ordered label set. Configuration can
//! be built programmatically or deserialized from a JSON file.

use crate::core::errors::{ClassifyError, ClassifyResult};
use crate::processors::NormalizationPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default model input side length, matching the training pipeline.
pub const DEFAULT_INPUT_SIZE: u32 = 224;

/// Default label set for this deployment, in training-time class-index order.
///
/// The label text and its order are a contract with the trained artifact's
/// class-index mapping; they are configuration, never inferred from data.
pub const DEFAULT_LABELS: [&str; 4] = ["glioma", "meningioma", "notumor", "pituitary"];

fn default_input_size() -> u32 {
    DEFAULT_INPUT_SIZE
}

fn default_labels() -> Vec<String> {
    DEFAULT_LABELS.iter().map(|s| s.to_string()).collect()
}

fn default_warmup() -> bool {
    true
}

/// Configuration for the classification pipeline.
///
/// The normalization policy must be paired with the policy the active
/// artifact was trained under; mixing a model with the wrong policy produces
/// an input distribution the model has never seen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Path to the ONNX model artifact, loaded once per process lifetime.
    pub model_path: PathBuf,

    /// Model input side length; images are resized to this square shape.
    #[serde(default = "default_input_size")]
    pub input_size: u32,

    /// Pixel normalization policy matching the artifact's training recipe.
    #[serde(default)]
    pub policy: NormalizationPolicy,

    /// Ordered class labels; `labels[i]` names model output index `i`.
    #[serde(default = "default_labels")]
    pub labels: Vec<String>,

    /// Whether to run one zero-filled warmup inference after loading.
    #[serde(default = "default_warmup")]
    pub warmup: bool,
}

impl ClassifierConfig {
    /// Creates a configuration for the given artifact path with deployment
    /// defaults for everything else.
    pub fn new(model_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            input_size: default_input_size(),
            policy: NormalizationPolicy::default(),
            labels: default_labels(),
            warmup: default_warmup(),
        }
    }

    /// Sets the model input side length.
    pub fn input_size(mut self, input_size: u32) -> Self {
        self.input_size = input_size;
        self
    }

    /// Sets the normalization policy.
    pub fn policy(mut self, policy: NormalizationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the ordered label set.
    pub fn labels(mut self, labels: Vec<String>) -> Self {
        self.labels = labels;
        self
    }

    /// Enables or disables the post-load warmup inference.
    pub fn warmup(mut self, warmup: bool) -> Self {
        self.warmup = warmup;
        self
    }

    /// Loads a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not parse as a
    /// valid configuration.
    pub fn from_json_file(path: impl AsRef<Path>) -> ClassifyResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        serde_json::from_str(&contents).map_err(|e| {
            ClassifyError::config(format!(
                "failed to parse configuration from '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if the model path is empty, the input size
    /// is zero, the label set is empty, or any label is blank.
    pub fn validate(&self) -> ClassifyResult<()> {
        if self.model_path.as_os_str().is_empty() {
            return Err(ClassifyError::config("model path must not be empty"));
        }

        if self.input_size == 0 {
            return Err(ClassifyError::config(
                "input size must be greater than 0",
            ));
        }

        if self.labels.is_empty() {
            return Err(ClassifyError::config("label set must not be empty"));
        }

        for (i, label) in self.labels.iter().enumerate() {
            if label.trim().is_empty() {
                return Err(ClassifyError::config(format!(
                    "label at index {} must not be blank",
                    i
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_deployment() {
        let config = ClassifierConfig::new("model.onnx");
        assert_eq!(config.input_size, 224);
        assert_eq!(
            config.labels,
            vec!["glioma", "meningioma", "notumor", "pituitary"]
        );
        assert_eq!(config.policy, NormalizationPolicy::MeanCenteredBgr);
        assert!(config.warmup);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_model_path() {
        let config = ClassifierConfig::new("");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_input_size() {
        let config = ClassifierConfig::new("model.onnx").input_size(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_labels() {
        let config = ClassifierConfig::new("model.onnx").labels(vec![]);
        assert!(config.validate().is_err());

        let config = ClassifierConfig::new("model.onnx").labels(vec!["ok".into(), "  ".into()]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let config = ClassifierConfig::new("models/tumor.onnx")
            .policy(NormalizationPolicy::UnitScaledRgb)
            .labels(vec!["a".into(), "b".into()]);

        let json = serde_json::to_string(&config).unwrap();
        let parsed: ClassifierConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.model_path, PathBuf::from("models/tumor.onnx"));
        assert_eq!(parsed.policy, NormalizationPolicy::UnitScaledRgb);
        assert_eq!(parsed.labels, vec!["a", "b"]);
    }

    #[test]
    fn test_json_defaults_are_filled_in() {
        let parsed: ClassifierConfig =
            serde_json::from_str(r#"{"model_path": "tumor.onnx"}"#).unwrap();
        assert_eq!(parsed.input_size, 224);
        assert_eq!(parsed.labels.len(), 4);
        assert!(parsed.warmup);
    }
}
