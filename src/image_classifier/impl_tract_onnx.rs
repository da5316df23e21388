use crate::device_camera::frame::Frame;
use crate::error::PredictError;
use crate::image_classifier::interface::{ImageClassifier, PredictionSet};
use crate::image_classifier::models::model_config::ModelInputConfig;
use crate::image_classifier::tract::image::{image_to_tensor, softmax};
use std::io::Cursor;
use tract_onnx::prelude::*;

type Plan = SimplePlan<TypedFact, Box<dyn TypedOp>, TypedModel>;

/// Runs an ONNX image classifier on the CPU.
pub struct ImageClassifierTractOnnx {
    model: Plan,
    labels: Vec<String>,
    input_size: u32,
    input: ModelInputConfig,
}

impl ImageClassifierTractOnnx {
    /// Builds a runnable plan from the raw bytes of an ONNX graph.
    pub fn from_bytes(
        topology: &[u8],
        labels: Vec<String>,
        input_size: u32,
        input: ModelInputConfig,
    ) -> TractResult<Self> {
        let shape = input.layout.shape(input_size as usize);
        let model = tract_onnx::onnx()
            .model_for_read(&mut Cursor::new(topology))?
            .with_input_fact(0, f32::fact(shape).into())?
            .into_optimized()?
            .into_runnable()?;

        Ok(Self {
            model,
            labels,
            input_size,
            input,
        })
    }

    /// Side of the square the frames are scaled to before inference.
    #[cfg(test)]
    pub fn input_size(&self) -> u32 {
        self.input_size
    }
}

impl ImageClassifier for ImageClassifierTractOnnx {
    fn class_labels(&self) -> &[String] {
        &self.labels
    }

    fn classify(&self, frame: &Frame) -> Result<PredictionSet, PredictError> {
        let tensor = image_to_tensor(
            frame.image(),
            self.input_size,
            self.input.layout,
            self.input.normalization,
        )?;

        let outputs = self
            .model
            .run(tvec!(tensor.into_tvalue()))
            .map_err(|e| PredictError::Inference(e.to_string()))?;
        let output = outputs
            .first()
            .ok_or_else(|| PredictError::Inference("model produced no output".to_string()))?;
        let scores = output
            .to_array_view::<f32>()
            .map_err(|e| PredictError::Inference(e.to_string()))?;

        let mut probabilities: Vec<f32> = scores.iter().copied().collect();
        if self.input.softmax {
            probabilities = softmax(&probabilities);
        }

        PredictionSet::from_probabilities(&self.labels, &probabilities)
    }
}
