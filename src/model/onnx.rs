//! ONNX-backed model loading for the production pipeline.

use crate::core::errors::{ClassifyResult, SimpleError};
use crate::core::{ClassifierConfig, OnnxSession, Tensor4D};
use crate::model::handle::{InferenceModel, ModelLoader};
use std::path::PathBuf;

/// Loads an [`OnnxSession`] from a configured artifact path.
///
/// Used through a [`crate::model::ModelHandle`], so the session is built at
/// most once per process unless the handle is administratively cleared.
#[derive(Debug, Clone)]
pub struct OnnxModelLoader {
    /// Path to the ONNX artifact.
    model_path: PathBuf,
    /// Model input side length, used for the warmup tensor.
    input_size: u32,
    /// Whether to run a zero-filled warmup inference after loading.
    warmup: bool,
}

impl OnnxModelLoader {
    /// Creates a loader for the given artifact path and input size.
    pub fn new(model_path: impl Into<PathBuf>, input_size: u32) -> Self {
        Self {
            model_path: model_path.into(),
            input_size,
            warmup: true,
        }
    }

    /// Creates a loader from a pipeline configuration.
    pub fn from_config(config: &ClassifierConfig) -> Self {
        Self {
            model_path: config.model_path.clone(),
            input_size: config.input_size,
            warmup: config.warmup,
        }
    }

    /// Enables or disables the post-load warmup inference.
    pub fn warmup(mut self, warmup: bool) -> Self {
        self.warmup = warmup;
        self
    }
}

impl ModelLoader for OnnxModelLoader {
    type Model = OnnxSession;

    fn load(&self) -> ClassifyResult<OnnxSession> {
        let session = OnnxSession::load(&self.model_path)?;
        if self.warmup {
            session.warmup(self.input_size)?;
        }
        Ok(session)
    }
}

impl InferenceModel for OnnxSession {
    fn predict(&self, batch: &Tensor4D) -> ClassifyResult<Vec<f32>> {
        let output = self.infer_2d(batch)?;
        if output.nrows() == 0 {
            return Err(crate::core::ClassifyError::inference(
                self.model_name(),
                "model returned an empty batch",
                SimpleError::new("no output rows"),
            ));
        }
        Ok(output.row(0).to_vec())
    }
}
