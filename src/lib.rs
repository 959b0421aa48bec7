//! # Neuroscan
//!
//! A Rust inference library that classifies brain MRI images against a
//! pre-trained convolutional network using ONNX models, returning a ranked
//! probability distribution over a fixed label set.
//!
//! ## Features
//!
//! - Deterministic preprocessing matching the training transform bit-for-bit
//! - Two selectable normalization policies (mean-centered BGR, unit-scaled RGB)
//! - Lazily-initialized, concurrency-safe model handle with exactly-once load
//! - Stable ranking of raw softmax output into a labeled report
//! - ONNX Runtime integration pinned to deterministic single-threaded CPU
//!   execution
//!
//! ## Components
//!
//! - **Image Decoder/Normalizer**: raw bytes to a `[1, S, S, 3]` tensor
//! - **Model Handle**: one in-memory model instance per process
//! - **Result Ranker**: probability vector to a sorted, labeled report
//! - **Inference Pipeline**: the composition root consumed by the web layer
//!
//! ## Modules
//!
//! * [`core`] - Errors, configuration, tensors, ONNX Runtime integration
//! * [`domain`] - Prediction report types
//! * [`model`] - Model handle, loader seams, ONNX-backed loader
//! * [`pipeline`] - The [`pipeline::Classifier`] composition root
//! * [`processors`] - Normalization, ranking, preview encoding
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use neuroscan::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClassifierConfig::new("models/tumor_vgg16.onnx")
//!     .policy(NormalizationPolicy::MeanCenteredBgr);
//! let classifier = Classifier::from_config(config)?;
//!
//! let bytes = std::fs::read("scan.jpg")?;
//! let report = classifier.classify(&bytes)?;
//! println!("{}: {:.1}%", report.label, report.confidence);
//!
//! for record in &report.records {
//!     println!("  {:<12} {:.2}%", record.label, record.probability);
//! }
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod domain;
pub mod model;
pub mod pipeline;
pub mod processors;

/// Prelude module for convenient imports.
///
/// Bring the essentials into scope with a single use statement:
///
/// ```rust
/// use neuroscan::prelude::*;
/// ```
pub mod prelude {
    pub use crate::core::{ClassifierConfig, ClassifyError, ClassifyResult};
    pub use crate::domain::{PredictionRecord, PredictionReport};
    pub use crate::pipeline::Classifier;
    pub use crate::processors::{encode_preview, NormalizationPolicy};
}
