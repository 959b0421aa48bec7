//! Error types for the classification pipeline.
//!
//! This module defines the error taxonomy shared by every stage of the
//! inference pipeline: image decoding, model loading, the forward pass,
//! and result ranking. It also provides helper constructors for building
//! errors with appropriate context and source chaining.

use thiserror::Error;

/// Convenient result alias for classification operations.
pub type ClassifyResult<T> = Result<T, ClassifyError>;

/// Enum representing the errors that can occur in the classification pipeline.
///
/// The first four variants map directly onto the pipeline stages visible to
/// callers; the remaining variants cover runtime and I/O plumbing.
#[derive(Error, Debug)]
pub enum ClassifyError {
    /// The input bytes could not be decoded as a supported raster image.
    ///
    /// User-correctable: the caller should re-submit a valid image file.
    #[error("image decode")]
    Decode(#[source] image::ImageError),

    /// The model artifact could not be loaded from its configured path.
    ///
    /// Fatal to the current request but recoverable on a later one; the
    /// model handle never caches this failure.
    #[error("model load failed for '{model_path}': {reason}")]
    ModelLoad {
        /// The configured artifact path, for diagnostics.
        model_path: String,
        /// Why the load failed.
        reason: String,
        /// The underlying error, when one exists.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The forward pass rejected the input tensor or failed internally.
    #[error("inference failed for model '{model_name}': {context}")]
    Inference {
        /// The model name for error context.
        model_name: String,
        /// Additional context about the failure.
        context: String,
        /// The underlying error that caused this error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The label set length disagrees with the model output width.
    ///
    /// This is a deployment-time invariant violation, not a per-request
    /// condition to recover from silently.
    #[error("shape mismatch: model produced {classes} probabilities but {labels} labels are configured")]
    ShapeMismatch {
        /// Number of probabilities the model produced.
        classes: usize,
        /// Number of labels in the configured label set.
        labels: usize,
    },

    /// Error indicating a configuration problem.
    #[error("configuration: {message}")]
    Config {
        /// A message describing the configuration error.
        message: String,
    },

    /// Error from the ONNX Runtime session.
    #[error(transparent)]
    Session(#[from] ort::Error),

    /// Error from tensor operations.
    #[error("tensor operation")]
    Tensor(#[from] ndarray::ShapeError),

    /// IO error.
    #[error("io")]
    Io(#[from] std::io::Error),
}

impl ClassifyError {
    /// Creates a `ModelLoad` error for the given artifact path.
    pub fn model_load(
        model_path: impl AsRef<std::path::Path>,
        reason: impl Into<String>,
        source: Option<impl std::error::Error + Send + Sync + 'static>,
    ) -> Self {
        Self::ModelLoad {
            model_path: model_path.as_ref().display().to_string(),
            reason: reason.into(),
            source: source.map(|e| Box::new(e) as _),
        }
    }

    /// Creates an `Inference` error with model name and context.
    pub fn inference(
        model_name: &str,
        context: impl Into<String>,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Inference {
            model_name: model_name.to_string(),
            context: context.into(),
            source: Box::new(error),
        }
    }

    /// Creates a `Config` error from a message.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

/// Allows `image::ImageError` to be converted to `ClassifyError` with `?`.
impl From<image::ImageError> for ClassifyError {
    fn from(error: image::ImageError) -> Self {
        Self::Decode(error)
    }
}

/// A minimal string-backed error for wrapping plain messages as sources.
#[derive(Debug)]
pub struct SimpleError {
    message: String,
}

impl SimpleError {
    /// Creates a new SimpleError with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for SimpleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for SimpleError {}
