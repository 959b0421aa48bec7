//! Processing stages surrounding the model forward pass.
//!
//! # Modules
//!
//! * `normalization` - Image decoding and training-recipe normalization
//! * `preview` - Base64 `data:` URI encoding for display round-trips
//! * `ranking` - Turning raw probabilities into a labeled, sorted report

mod normalization;
mod preview;
mod ranking;

pub use normalization::{ImageNormalizer, NormalizationPolicy, IMAGENET_MEAN_BGR};
pub use preview::encode_preview;
pub use ranking::rank;
