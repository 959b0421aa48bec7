//! Model ownership and loading.
//!
//! # Modules
//!
//! * `handle` - The lazily-initialized, concurrency-safe model handle and
//!   the trait seams it is built on
//! * `onnx` - The production ONNX-backed loader

mod handle;
mod onnx;

pub use handle::{InferenceModel, ModelHandle, ModelLoader};
pub use onnx::OnnxModelLoader;
