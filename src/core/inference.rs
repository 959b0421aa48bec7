//! ONNX Runtime integration for the classification pipeline.
//!
//! This module wraps a single ONNX Runtime session behind a small, synchronous
//! API. Sessions are configured for deterministic, low-resource execution:
//! single-threaded operators and the CPU execution provider only. This is a
//! hard requirement of the deployment target, not an optimization knob.

use crate::core::errors::{ClassifyError, ClassifyResult, SimpleError};
use crate::core::{Tensor2D, Tensor4D};
use ort::{
    execution_providers::CPUExecutionProvider,
    session::Session,
    value::TensorRef,
};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info};

/// Input tensor names probed when the model does not use a conventional name.
///
/// Keras-exported ONNX graphs commonly use `input_1` or `args_0`; PaddlePaddle
/// exports use `x`.
const COMMON_INPUT_NAMES: [&str; 7] = [
    "input_1", "args_0", "x", "input", "images", "data", "image",
];

/// A single ONNX Runtime session for forward-pass inference.
///
/// The session is created once, from a model file on disk, and serves
/// `infer_2d` calls for the lifetime of the process. The ONNX Runtime API
/// requires exclusive access to run a session, so calls serialize on an
/// internal mutex; the session itself holds no per-call state.
#[derive(Debug)]
pub struct OnnxSession {
    /// The ONNX Runtime session. Running a session requires `&mut`.
    session: Mutex<Session>,
    /// The name of the model's input tensor.
    input_name: String,
    /// The name of the model's output tensor.
    output_name: String,
    /// The path the model was loaded from, for error context.
    model_path: PathBuf,
    /// The model name for error context.
    model_name: String,
}

impl OnnxSession {
    /// Loads an ONNX model from the given path.
    ///
    /// The session is pinned to the CPU execution provider with intra- and
    /// inter-op parallelism of 1. Input and output tensor names are read
    /// from the session metadata.
    ///
    /// # Errors
    ///
    /// Returns a `ModelLoad` error if the file does not exist, cannot be
    /// parsed as an ONNX model, or declares no outputs.
    pub fn load(model_path: impl AsRef<Path>) -> ClassifyResult<Self> {
        let path = model_path.as_ref();

        if !path.exists() {
            return Err(ClassifyError::model_load(
                path,
                "model file not found",
                None::<std::io::Error>,
            ));
        }

        info!("loading ONNX model from {}", path.display());
        if let Ok(metadata) = std::fs::metadata(path) {
            debug!(
                "model file size: {:.2} MB",
                metadata.len() as f64 / (1024.0 * 1024.0)
            );
        }

        let session = Session::builder()
            .and_then(|b| {
                b.with_execution_providers([CPUExecutionProvider::default().build()])
            })
            .and_then(|b| b.with_intra_threads(1))
            .and_then(|b| b.with_inter_threads(1))
            .and_then(|b| b.commit_from_file(path))
            .map_err(|e| {
                ClassifyError::model_load(path, "failed to create ONNX session", Some(e))
            })?;

        let available_inputs: Vec<String> = session
            .inputs
            .iter()
            .map(|input| input.name.clone())
            .collect();

        let input_name = COMMON_INPUT_NAMES
            .iter()
            .find(|&name| available_inputs.iter().any(|input| input == *name))
            .map(|s| s.to_string())
            .or_else(|| available_inputs.first().cloned())
            .ok_or_else(|| {
                ClassifyError::model_load(
                    path,
                    "model declares no input tensors",
                    None::<std::io::Error>,
                )
            })?;

        let output_name = session
            .outputs
            .first()
            .map(|output| output.name.clone())
            .ok_or_else(|| {
                ClassifyError::model_load(
                    path,
                    "model declares no output tensors",
                    None::<std::io::Error>,
                )
            })?;

        let model_name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown_model")
            .to_string();

        info!(
            "model '{}' loaded, input '{}' -> output '{}'",
            model_name, input_name, output_name
        );

        Ok(OnnxSession {
            session: Mutex::new(session),
            input_name,
            output_name,
            model_path: path.to_path_buf(),
            model_name,
        })
    }

    /// Gets the path the model was loaded from.
    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    /// Gets the name of the model.
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Runs one forward pass and returns the `[batch, num_classes]` output.
    ///
    /// # Errors
    ///
    /// Returns an `Inference` error if the runtime rejects the input tensor,
    /// the forward pass fails, or the output is not a 2D tensor matching the
    /// input batch size.
    pub fn infer_2d(&self, x: &Tensor4D) -> ClassifyResult<Tensor2D> {
        let batch_size = x.shape()[0];
        let input_shape = x.shape().to_vec();

        let input_tensor = TensorRef::from_array_view(x.view()).map_err(|e| {
            ClassifyError::inference(
                &self.model_name,
                format!(
                    "failed to convert input tensor with shape {:?}",
                    input_shape
                ),
                e,
            )
        })?;

        let inputs = ort::inputs![self.input_name.as_str() => input_tensor];

        let mut session_guard = self.session.lock().map_err(|_| {
            ClassifyError::inference(
                &self.model_name,
                "failed to acquire session lock",
                SimpleError::new("session lock poisoned"),
            )
        })?;

        let outputs = session_guard.run(inputs).map_err(|e| {
            ClassifyError::inference(
                &self.model_name,
                format!(
                    "forward pass failed with input '{}' -> output '{}'",
                    self.input_name, self.output_name
                ),
                e,
            )
        })?;

        let (output_shape, output_data) = outputs[self.output_name.as_str()]
            .try_extract_tensor::<f32>()
            .map_err(|e| {
                ClassifyError::inference(
                    &self.model_name,
                    format!(
                        "failed to extract output tensor '{}' as f32",
                        self.output_name
                    ),
                    e,
                )
            })?;

        if output_shape.len() != 2 {
            return Err(ClassifyError::inference(
                &self.model_name,
                format!(
                    "expected 2D output tensor, got {}D with shape {:?}",
                    output_shape.len(),
                    output_shape
                ),
                SimpleError::new("invalid output tensor dimensions"),
            ));
        }

        let num_classes = output_shape[1] as usize;
        let expected_len = batch_size * num_classes;
        if output_data.len() != expected_len {
            return Err(ClassifyError::inference(
                &self.model_name,
                format!(
                    "output data size mismatch: expected {}, got {}",
                    expected_len,
                    output_data.len()
                ),
                SimpleError::new("output tensor data size mismatch"),
            ));
        }

        let array_view = ndarray::ArrayView2::from_shape((batch_size, num_classes), output_data)
            .map_err(ClassifyError::Tensor)?;
        Ok(array_view.to_owned())
    }

    /// Runs one throwaway inference with a zero-filled tensor.
    ///
    /// Forces any deferred runtime initialization before the session serves
    /// real traffic.
    pub fn warmup(&self, input_size: u32) -> ClassifyResult<()> {
        let size = input_size as usize;
        let dummy = Tensor4D::zeros((1, size, size, 3));
        debug!("warming up model '{}' with a zero tensor", self.model_name);
        self.infer_2d(&dummy)?;
        debug!("warmup complete for model '{}'", self.model_name);
        Ok(())
    }
}
