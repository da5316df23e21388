use crate::device_camera::frame::Frame;
use crate::error::PredictError;
use std::fmt;
use std::sync::Arc;

/// Slack for float error in softmax outputs.
const PROBABILITY_EPSILON: f32 = 1e-3;

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub label: String,
    pub probability: f32,
}

/// One entry per model class, in the model's class order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PredictionSet(Vec<Classification>);

impl PredictionSet {
    pub fn new(classifications: Vec<Classification>) -> Self {
        Self(classifications)
    }

    /// Pairs `labels[i]` with `probabilities[i]`.
    pub fn from_probabilities(
        labels: &[String],
        probabilities: &[f32],
    ) -> Result<Self, PredictError> {
        if labels.len() != probabilities.len() {
            return Err(PredictError::ClassCountMismatch {
                expected: labels.len(),
                actual: probabilities.len(),
            });
        }

        Ok(Self(
            labels
                .iter()
                .zip(probabilities)
                .map(|(label, probability)| Classification {
                    label: label.clone(),
                    probability: *probability,
                })
                .collect(),
        ))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Classification> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Classification] {
        &self.0
    }

    /// `label: 0.00` per class, comma separated.
    pub fn to_display_string(&self) -> String {
        self.0
            .iter()
            .map(|c| format!("{}: {:.2}", c.label, c.probability))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A loaded classifier.
///
/// `classify` must return exactly `total_classes()` entries, ordered like
/// `class_labels()`. The display relies on that order to keep rows stable.
pub trait ImageClassifier: Send + Sync {
    fn class_labels(&self) -> &[String];

    fn total_classes(&self) -> usize {
        self.class_labels().len()
    }

    fn classify(&self, frame: &Frame) -> Result<PredictionSet, PredictError>;
}

/// Shared read-only reference to the loaded model.
#[derive(Clone)]
pub struct ModelHandle(Arc<dyn ImageClassifier + Send + Sync>);

impl ModelHandle {
    pub fn new(classifier: Arc<dyn ImageClassifier + Send + Sync>) -> Self {
        Self(classifier)
    }

    pub fn total_classes(&self) -> usize {
        self.0.total_classes()
    }

    pub fn class_labels(&self) -> &[String] {
        self.0.class_labels()
    }

    /// Classifies `frame` and enforces the one-entry-per-class contract.
    /// Every probability must be finite and within 0..1.
    pub fn predict(&self, frame: &Frame) -> Result<PredictionSet, PredictError> {
        let predictions = self.0.classify(frame)?;
        let expected = self.total_classes();
        if predictions.len() != expected {
            return Err(PredictError::ClassCountMismatch {
                expected,
                actual: predictions.len(),
            });
        }
        if let Some(bad) = predictions.iter().find(|c| !is_probability(c.probability)) {
            return Err(PredictError::OutOfRange {
                label: bad.label.clone(),
                value: bad.probability,
            });
        }
        Ok(predictions)
    }
}

fn is_probability(value: f32) -> bool {
    value.is_finite() && value >= -PROBABILITY_EPSILON && value <= 1.0 + PROBABILITY_EPSILON
}

impl fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ModelHandle({} classes)", self.total_classes())
    }
}
