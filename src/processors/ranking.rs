//! Ranking of raw model output into a labeled prediction report.
//!
//! The ranker pairs a softmax probability vector with the configured label
//! set and produces a sorted report. Raw model output only: no smoothing,
//! thresholding, or calibration is applied.

use crate::core::errors::{ClassifyError, ClassifyResult};
use crate::domain::{PredictionRecord, PredictionReport};

/// Ranks a probability vector against an ordered label set.
///
/// `labels[i]` must name model output index `i` per the training-time class
/// mapping. Confidence values are reported on a 0–100 scale. The records are
/// stable-sorted by probability descending, so equal probabilities keep
/// their original class-index order.
///
/// # Errors
///
/// Returns `ShapeMismatch` if the vector and label set lengths differ, and a
/// `Config` error if both are empty.
pub fn rank(probabilities: &[f32], labels: &[String]) -> ClassifyResult<PredictionReport> {
    if probabilities.len() != labels.len() {
        return Err(ClassifyError::ShapeMismatch {
            classes: probabilities.len(),
            labels: labels.len(),
        });
    }

    if probabilities.is_empty() {
        return Err(ClassifyError::config(
            "cannot rank an empty probability vector",
        ));
    }

    // Argmax with first-wins tie-breaking on the original index.
    let mut top_idx = 0;
    for (i, &p) in probabilities.iter().enumerate() {
        if p > probabilities[top_idx] {
            top_idx = i;
        }
    }

    let mut records: Vec<PredictionRecord> = probabilities
        .iter()
        .zip(labels)
        .enumerate()
        .map(|(i, (&p, label))| PredictionRecord {
            label: label.clone(),
            probability: p * 100.0,
            is_top: i == top_idx,
        })
        .collect();

    // slice::sort_by is stable; index ties keep original label order.
    records.sort_by(|a, b| {
        b.probability
            .partial_cmp(&a.probability)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    Ok(PredictionReport {
        label: labels[top_idx].clone(),
        confidence: probabilities[top_idx] * 100.0,
        records,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_rank_sorts_descending_with_stable_ties() {
        let report = rank(&[0.1, 0.7, 0.1, 0.1], &labels(&["A", "B", "C", "D"])).unwrap();

        assert_eq!(report.label, "B");
        assert!((report.confidence - 70.0).abs() < 1e-5);

        let order: Vec<&str> = report.records.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(order, vec!["B", "A", "C", "D"]);

        for window in report.records.windows(2) {
            assert!(window[0].probability >= window[1].probability);
        }
    }

    #[test]
    fn test_rank_flags_a_unique_top_record() {
        let report = rank(&[0.25, 0.25, 0.5], &labels(&["x", "y", "z"])).unwrap();
        let tops: Vec<&PredictionRecord> =
            report.records.iter().filter(|r| r.is_top).collect();
        assert_eq!(tops.len(), 1);
        assert_eq!(tops[0].label, "z");
        assert!(std::ptr::eq(report.top(), report.records.first().unwrap()));
    }

    #[test]
    fn test_rank_argmax_tie_takes_first_index() {
        let report = rank(&[0.4, 0.4, 0.2], &labels(&["x", "y", "z"])).unwrap();
        assert_eq!(report.label, "x");
        let order: Vec<&str> = report.records.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(order, vec!["x", "y", "z"]);
    }

    #[test]
    fn test_rank_is_a_permutation_of_the_input() {
        let probs = [0.05, 0.3, 0.05, 0.6];
        let report = rank(&probs, &labels(&["a", "b", "c", "d"])).unwrap();

        let reported_sum: f32 = report.records.iter().map(|r| r.probability / 100.0).sum();
        let input_sum: f32 = probs.iter().sum();
        assert!((reported_sum - input_sum).abs() < 1e-5);
        assert_eq!(report.records.len(), probs.len());
    }

    #[test]
    fn test_rank_shape_mismatch() {
        match rank(&[0.5, 0.5], &labels(&["only"])) {
            Err(ClassifyError::ShapeMismatch { classes, labels }) => {
                assert_eq!(classes, 2);
                assert_eq!(labels, 1);
            }
            other => panic!("expected ShapeMismatch, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_rank_rejects_empty_input() {
        assert!(rank(&[], &labels(&[])).is_err());
    }
}
