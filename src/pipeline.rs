//! The inference pipeline composition root.
//!
//! [`Classifier`] chains the three core stages: decode/normalize, forward
//! pass through the shared model handle, and ranking. Any failure
//! short-circuits the remaining stages and propagates to the caller; the
//! pipeline performs no retries of its own (retry policy, if any, belongs
//! to the web layer).

use crate::core::errors::ClassifyResult;
use crate::core::ClassifierConfig;
use crate::domain::PredictionReport;
use crate::model::{InferenceModel, ModelHandle, ModelLoader, OnnxModelLoader};
use crate::processors::{encode_preview, rank, ImageNormalizer};

/// Single-image classification pipeline.
///
/// One `Classifier` is constructed per process and shared across request
/// threads. `classify` is side-effect-free apart from its one-time effect on
/// the model handle's state transition, so calls are independent and may run
/// concurrently.
#[derive(Debug)]
pub struct Classifier<L: ModelLoader> {
    normalizer: ImageNormalizer,
    handle: ModelHandle<L>,
    labels: Vec<String>,
}

impl Classifier<OnnxModelLoader> {
    /// Builds the production pipeline from a validated configuration.
    ///
    /// The model is not loaded here; the first [`Classifier::classify`]
    /// call triggers the one-time load.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if the configuration fails validation.
    pub fn from_config(config: ClassifierConfig) -> ClassifyResult<Self> {
        config.validate()?;
        let normalizer = ImageNormalizer::new(config.policy, config.input_size)?;
        let loader = OnnxModelLoader::from_config(&config);
        Ok(Self {
            normalizer,
            handle: ModelHandle::new(loader),
            labels: config.labels,
        })
    }
}

impl<L: ModelLoader> Classifier<L> {
    /// Builds a pipeline around an explicit loader.
    ///
    /// This is the dependency-injection seam: tests and alternate backends
    /// supply their own [`ModelLoader`].
    pub fn with_loader(
        loader: L,
        normalizer: ImageNormalizer,
        labels: Vec<String>,
    ) -> Self {
        Self {
            normalizer,
            handle: ModelHandle::new(loader),
            labels,
        }
    }

    /// Classifies one image and returns the ranked prediction report.
    ///
    /// Stages run in order: decode/normalize, predict, rank. The first
    /// failing stage short-circuits the rest; a decode failure never touches
    /// the model handle.
    pub fn classify(&self, bytes: &[u8]) -> ClassifyResult<PredictionReport> {
        let tensor = self.normalizer.normalize(bytes)?;
        let model = self.handle.get()?;
        let probabilities = model.predict(&tensor)?;
        rank(&probabilities, &self.labels)
    }

    /// Classifies one image supplied as a readable byte stream.
    ///
    /// The stream is drained into a buffer once, at the boundary, before any
    /// core stage runs; the rest of the pipeline only ever sees bytes.
    pub fn classify_reader<R: std::io::Read>(&self, mut reader: R) -> ClassifyResult<PredictionReport> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        self.classify(&bytes)
    }

    /// Encodes the original bytes as a base64 `data:` URI for display.
    ///
    /// Display-only; independent of the numeric pipeline.
    pub fn preview(&self, bytes: &[u8]) -> String {
        encode_preview(bytes)
    }

    /// Gets the configured label set in class-index order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Whether the model has been loaded by an earlier call.
    pub fn is_model_loaded(&self) -> bool {
        self.handle.is_loaded()
    }

    /// Administrative reset: drops the cached model so the next call loads
    /// it again from disk.
    pub fn reset_model(&self) {
        self.handle.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::ClassifyError;
    use crate::core::Tensor4D;
    use crate::model::InferenceModel;
    use crate::processors::NormalizationPolicy;
    use image::{DynamicImage, Rgb, RgbImage};
    use std::io::Cursor;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct StubModel {
        probabilities: Vec<f32>,
        predict_calls: Arc<AtomicUsize>,
    }

    impl InferenceModel for StubModel {
        fn predict(&self, batch: &Tensor4D) -> ClassifyResult<Vec<f32>> {
            assert_eq!(batch.shape()[0], 1);
            self.predict_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.probabilities.clone())
        }
    }

    struct StubLoader {
        probabilities: Vec<f32>,
        load_calls: Arc<AtomicUsize>,
        predict_calls: Arc<AtomicUsize>,
    }

    impl StubLoader {
        fn new(probabilities: Vec<f32>) -> (Self, Arc<AtomicUsize>, Arc<AtomicUsize>) {
            let load_calls = Arc::new(AtomicUsize::new(0));
            let predict_calls = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    probabilities,
                    load_calls: Arc::clone(&load_calls),
                    predict_calls: Arc::clone(&predict_calls),
                },
                load_calls,
                predict_calls,
            )
        }
    }

    impl ModelLoader for StubLoader {
        type Model = StubModel;

        fn load(&self) -> ClassifyResult<StubModel> {
            self.load_calls.fetch_add(1, Ordering::SeqCst);
            Ok(StubModel {
                probabilities: self.probabilities.clone(),
                predict_calls: Arc::clone(&self.predict_calls),
            })
        }
    }

    fn solid_png(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(color)));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn stub_classifier(
        probabilities: Vec<f32>,
        label_names: &[&str],
    ) -> (Classifier<StubLoader>, Arc<AtomicUsize>, Arc<AtomicUsize>) {
        let (loader, load_calls, predict_calls) = StubLoader::new(probabilities);
        let normalizer =
            ImageNormalizer::new(NormalizationPolicy::UnitScaledRgb, 224).unwrap();
        (
            Classifier::with_loader(loader, normalizer, labels(label_names)),
            load_calls,
            predict_calls,
        )
    }

    #[test]
    fn test_end_to_end_solid_red_png() {
        let (classifier, _, _) = stub_classifier(vec![0.1, 0.7, 0.1, 0.1], &["A", "B", "C", "D"]);

        let report = classifier
            .classify(&solid_png(512, 512, [255, 0, 0]))
            .unwrap();

        assert_eq!(report.label, "B");
        assert!((report.confidence - 70.0).abs() < 1e-4);

        let expected = [
            ("B", 70.0, true),
            ("A", 10.0, false),
            ("C", 10.0, false),
            ("D", 10.0, false),
        ];
        assert_eq!(report.records.len(), expected.len());
        for (record, (label, probability, is_top)) in report.records.iter().zip(expected) {
            assert_eq!(record.label, label);
            assert!((record.probability - probability).abs() < 1e-4);
            assert_eq!(record.is_top, is_top);
        }
    }

    #[test]
    fn test_classify_is_idempotent_once_ready() {
        let (classifier, load_calls, _) =
            stub_classifier(vec![0.2, 0.5, 0.3], &["x", "y", "z"]);
        let bytes = solid_png(64, 48, [12, 200, 77]);

        let first = classifier.classify(&bytes).unwrap();
        let second = classifier.classify(&bytes).unwrap();

        assert_eq!(first, second);
        assert_eq!(load_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_corrupt_input_never_reaches_the_model() {
        let (classifier, load_calls, predict_calls) =
            stub_classifier(vec![0.5, 0.5], &["a", "b"]);

        match classifier.classify(b"\xff\x00 definitely not an image") {
            Err(ClassifyError::Decode(_)) => {}
            other => panic!("expected Decode error, got {:?}", other.map(|_| ())),
        }

        assert_eq!(load_calls.load(Ordering::SeqCst), 0);
        assert_eq!(predict_calls.load(Ordering::SeqCst), 0);
        assert!(!classifier.is_model_loaded());
    }

    #[test]
    fn test_label_width_mismatch_is_shape_mismatch() {
        let (classifier, _, _) = stub_classifier(vec![0.5, 0.3, 0.2], &["a", "b", "c", "d"]);

        match classifier.classify(&solid_png(8, 8, [0, 0, 0])) {
            Err(ClassifyError::ShapeMismatch { classes, labels }) => {
                assert_eq!(classes, 3);
                assert_eq!(labels, 4);
            }
            other => panic!("expected ShapeMismatch, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_reset_model_forces_a_reload() {
        let (classifier, load_calls, _) = stub_classifier(vec![1.0], &["only"]);
        let bytes = solid_png(8, 8, [50, 50, 50]);

        classifier.classify(&bytes).unwrap();
        assert!(classifier.is_model_loaded());

        classifier.reset_model();
        assert!(!classifier.is_model_loaded());

        classifier.classify(&bytes).unwrap();
        assert_eq!(load_calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_missing_artifact_fails_per_request_without_caching() {
        let config = ClassifierConfig::new("does/not/exist.onnx");
        let classifier = Classifier::from_config(config).unwrap();
        let bytes = solid_png(8, 8, [1, 2, 3]);

        for _ in 0..2 {
            match classifier.classify(&bytes) {
                Err(ClassifyError::ModelLoad { .. }) => {}
                other => panic!("expected ModelLoad error, got {:?}", other.map(|_| ())),
            }
            assert!(!classifier.is_model_loaded());
        }
    }

    #[test]
    fn test_from_config_rejects_invalid_configuration() {
        let config = ClassifierConfig::new("model.onnx").labels(vec![]);
        assert!(Classifier::from_config(config).is_err());
    }

    #[test]
    fn test_classify_reader_matches_classify() {
        let (classifier, _, _) = stub_classifier(vec![0.3, 0.7], &["a", "b"]);
        let bytes = solid_png(16, 16, [80, 10, 10]);

        let from_bytes = classifier.classify(&bytes).unwrap();
        let from_reader = classifier.classify_reader(&bytes[..]).unwrap();
        assert_eq!(from_bytes, from_reader);
    }

    #[test]
    fn test_preview_passes_through_the_side_channel() {
        let (classifier, _, _) = stub_classifier(vec![1.0], &["only"]);
        let bytes = solid_png(4, 4, [9, 9, 9]);
        assert!(classifier.preview(&bytes).starts_with("data:image/png;base64,"));
    }
}
