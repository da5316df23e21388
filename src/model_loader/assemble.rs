use crate::error::ModelLoadError;
use crate::image_classifier::impl_tract_onnx::ImageClassifierTractOnnx;
use crate::image_classifier::interface::ModelHandle;
use crate::model_loader::interface::ModelSource;
use crate::model_loader::metadata::{parse_metadata, DEFAULT_IMAGE_SIZE};
use std::sync::Arc;

/// Turns the two fetched descriptors into a runnable model.
pub fn assemble_model(
    source: &ModelSource,
    topology: &[u8],
    metadata: &[u8],
) -> Result<ModelHandle, ModelLoadError> {
    let classifier = build_classifier(source, topology, metadata)?;
    Ok(ModelHandle::new(Arc::new(classifier)))
}

pub fn build_classifier(
    source: &ModelSource,
    topology: &[u8],
    metadata: &[u8],
) -> Result<ImageClassifierTractOnnx, ModelLoadError> {
    let metadata = parse_metadata(metadata, &source.metadata_url())?;
    if metadata.labels.is_empty() {
        return Err(ModelLoadError::NoClasses);
    }

    let input_size = resolve_input_size(source.input.size, metadata.image_size);

    ImageClassifierTractOnnx::from_bytes(
        topology,
        metadata.labels,
        input_size,
        source.input.clone(),
    )
    .map_err(|e| ModelLoadError::Topology {
        url: source.topology_url(),
        reason: e.to_string(),
    })
}

/// Configured override first, then the size the metadata declares.
pub fn resolve_input_size(configured: Option<u32>, declared: Option<u32>) -> u32 {
    configured.or(declared).unwrap_or(DEFAULT_IMAGE_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_size_prefers_override_then_metadata() {
        assert_eq!(resolve_input_size(Some(96), Some(128)), 96);
        assert_eq!(resolve_input_size(None, Some(128)), 128);
        assert_eq!(resolve_input_size(None, None), DEFAULT_IMAGE_SIZE);
    }
}
