//! Image decoding and normalization for model input.
//!
//! This module turns a raw image byte buffer into the fixed-shape tensor the
//! model was trained on. The transform must match the training pipeline
//! bit-for-bit: decode to 3-channel RGB, a full non-uniform Lanczos resize to
//! the model's square input shape, conversion to `f32`, and exactly one of
//! two normalization policies fixed by deployment configuration.

use crate::core::errors::{ClassifyError, ClassifyResult};
use crate::core::Tensor4D;
use image::{imageops::FilterType, DynamicImage};
use serde::{Deserialize, Serialize};

/// Per-channel means subtracted under [`NormalizationPolicy::MeanCenteredBgr`],
/// in Blue, Green, Red order (the ImageNet training means).
pub const IMAGENET_MEAN_BGR: [f32; 3] = [103.939, 116.779, 123.68];

/// Pixel normalization policy applied after resizing.
///
/// The two policies correspond to two historical training recipes and are
/// NOT numerically equivalent. The active model artifact must be paired with
/// the policy it was trained under; the pairing is a deployment-time
/// contract and is never inferred from the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NormalizationPolicy {
    /// Reorder the channel axis to Blue, Green, Red and subtract the fixed
    /// per-channel ImageNet means. No further scaling. This is the VGG-style
    /// `preprocess_input` transform.
    MeanCenteredBgr,
    /// Keep Red, Green, Blue channel order and divide every value by 255.0,
    /// mapping into `[0, 1]`.
    UnitScaledRgb,
}

impl Default for NormalizationPolicy {
    /// The deployed artifact was trained under the mean-centered BGR recipe.
    fn default() -> Self {
        Self::MeanCenteredBgr
    }
}

/// Decodes raw image bytes and produces the model input tensor.
///
/// The output always has shape `[1, S, S, 3]` where `S` is the configured
/// side length, regardless of the input resolution or aspect ratio.
#[derive(Debug, Clone)]
pub struct ImageNormalizer {
    /// Normalization policy matching the artifact's training recipe.
    policy: NormalizationPolicy,
    /// Model input side length.
    target_size: u32,
}

impl ImageNormalizer {
    /// Creates a new ImageNormalizer.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if `target_size` is zero.
    pub fn new(policy: NormalizationPolicy, target_size: u32) -> ClassifyResult<Self> {
        if target_size == 0 {
            return Err(ClassifyError::config(
                "normalizer target size must be greater than 0",
            ));
        }
        Ok(Self {
            policy,
            target_size,
        })
    }

    /// Gets the active normalization policy.
    pub fn policy(&self) -> NormalizationPolicy {
        self.policy
    }

    /// Gets the model input side length.
    pub fn target_size(&self) -> u32 {
        self.target_size
    }

    /// Decodes raw bytes and normalizes them into a `[1, S, S, 3]` tensor.
    ///
    /// # Errors
    ///
    /// Returns a `Decode` error if the bytes cannot be parsed as any
    /// supported raster format (corrupt data, unsupported codec, zero-byte
    /// input).
    pub fn normalize(&self, bytes: &[u8]) -> ClassifyResult<Tensor4D> {
        let decoded = image::load_from_memory(bytes)?;
        self.normalize_image(&decoded)
    }

    /// Normalizes an already-decoded image into a `[1, S, S, 3]` tensor.
    pub fn normalize_image(&self, img: &DynamicImage) -> ClassifyResult<Tensor4D> {
        // Alpha and grayscale sources collapse to 3-channel RGB here.
        let rgb = img.to_rgb8();

        // Full non-uniform resize: aspect ratio is deliberately not
        // preserved, matching the training pipeline.
        let resized = image::imageops::resize(
            &rgb,
            self.target_size,
            self.target_size,
            FilterType::Lanczos3,
        );

        let size = self.target_size as usize;
        let mut data = vec![0.0f32; size * size * 3];

        match self.policy {
            NormalizationPolicy::MeanCenteredBgr => {
                for y in 0..size {
                    for x in 0..size {
                        let pixel = resized.get_pixel(x as u32, y as u32);
                        let base = (y * size + x) * 3;
                        for c in 0..3 {
                            // Channel axis holds B, G, R: index 0 reads the
                            // source red at 2, and so on.
                            data[base + c] = pixel[2 - c] as f32 - IMAGENET_MEAN_BGR[c];
                        }
                    }
                }
            }
            NormalizationPolicy::UnitScaledRgb => {
                for y in 0..size {
                    for x in 0..size {
                        let pixel = resized.get_pixel(x as u32, y as u32);
                        let base = (y * size + x) * 3;
                        for c in 0..3 {
                            data[base + c] = pixel[c] as f32 / 255.0;
                        }
                    }
                }
            }
        }

        let tensor = Tensor4D::from_shape_vec((1, size, size, 3), data)?;
        Ok(tensor)
    }
}
