//! The core module of the classification pipeline.
//!
//! This module contains the fundamental components of the pipeline:
//! - Configuration management
//! - Error handling
//! - ONNX Runtime session integration
//! - Tensor type aliases shared across the crate
//!
//! It also provides re-exports of commonly used types and the tracing
//! bootstrap for applications embedding the pipeline.

pub mod config;
pub mod errors;
pub mod inference;

pub use config::{ClassifierConfig, DEFAULT_INPUT_SIZE, DEFAULT_LABELS};
pub use errors::{ClassifyError, ClassifyResult};
pub use inference::OnnxSession;

/// A 2D tensor of `f32` values (`[batch, num_classes]` model output).
pub type Tensor2D = ndarray::Array2<f32>;

/// A 4D tensor of `f32` values (`[batch, height, width, channels]` input).
pub type Tensor4D = ndarray::Array4<f32>;

/// Initializes the tracing subscriber for logging.
///
/// This function sets up the tracing subscriber with environment filter and
/// formatting layer. It's typically called at the start of an application to
/// enable logging.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();
}
