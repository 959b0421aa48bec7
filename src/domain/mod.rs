//! Domain types returned by the classification pipeline.
//!
//! These are the read-only result structures handed to the (external) web
//! layer for rendering. They carry no behavior beyond construction in the
//! ranking stage.

use serde::Serialize;

/// One labeled entry of a ranked prediction report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRecord {
    /// Class label, as configured for the deployed artifact.
    pub label: String,
    /// Class probability on a 0–100 scale.
    pub probability: f32,
    /// Whether this record is the argmax of the model output.
    pub is_top: bool,
}

/// A ranked, labeled view over one model output vector.
///
/// `records` is sorted by probability descending; ties preserve the original
/// class-index order. Exactly one record has `is_top == true`, and it equals
/// the argmax of the raw probability vector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionReport {
    /// The top-ranked class label.
    pub label: String,
    /// The top-ranked class probability on a 0–100 scale.
    pub confidence: f32,
    /// One record per class, sorted by probability descending.
    pub records: Vec<PredictionRecord>,
}

impl PredictionReport {
    /// Gets the record flagged as the top prediction.
    pub fn top(&self) -> &PredictionRecord {
        // Construction guarantees the top record sorts first.
        &self.records[0]
    }
}
