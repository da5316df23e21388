use crate::device_camera::frame::Frame;
use crate::error::PredictError;
use crate::image_classifier::interface::{Classification, ImageClassifier, PredictionSet};
use crate::library::logger::interface::Logger;
use rand::distr::{Distribution, Uniform};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Stand-in model. Without a script it returns random probabilities that sum
/// to one; with a script it replays the scripted rows in a loop.
pub struct ImageClassifierFake {
    logger: Arc<dyn Logger + Send + Sync>,
    labels: Vec<String>,
    script: Vec<Vec<f32>>,
    failure: Option<PredictError>,
    calls: AtomicUsize,
}

impl ImageClassifierFake {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>, labels: Vec<String>) -> Self {
        Self {
            logger: logger.with_namespace("image_classifier").with_namespace("fake"),
            labels,
            script: vec![],
            failure: None,
            calls: AtomicUsize::new(0),
        }
    }

    #[cfg(test)]
    pub fn with_script(mut self, script: Vec<Vec<f32>>) -> Self {
        self.script = script;
        self
    }

    #[cfg(test)]
    pub fn with_failure(mut self, failure: PredictError) -> Self {
        self.failure = Some(failure);
        self
    }

    #[cfg(test)]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn random_probabilities(&self) -> Result<Vec<f32>, PredictError> {
        let mut rng = rand::rng();
        let dist =
            Uniform::new(0.0f32, 1.0).map_err(|e| PredictError::Inference(e.to_string()))?;
        let raw: Vec<f32> = self.labels.iter().map(|_| dist.sample(&mut rng)).collect();
        let sum: f32 = raw.iter().sum();
        if sum == 0.0 {
            return Ok(raw);
        }
        Ok(raw.iter().map(|v| v / sum).collect())
    }
}

impl ImageClassifier for ImageClassifierFake {
    fn class_labels(&self) -> &[String] {
        &self.labels
    }

    fn classify(&self, frame: &Frame) -> Result<PredictionSet, PredictError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let _ = self
            .logger
            .debug(&format!("Classifying frame {}", frame.sequence()));

        if let Some(failure) = &self.failure {
            return Err(failure.clone());
        }

        let probabilities = if self.script.is_empty() {
            self.random_probabilities()?
        } else {
            self.script[call % self.script.len()].clone()
        };

        // zip on purpose: a short script row yields a short set
        Ok(PredictionSet::new(
            self.labels
                .iter()
                .zip(probabilities)
                .map(|(label, probability)| Classification {
                    label: label.clone(),
                    probability,
                })
                .collect(),
        ))
    }
}
