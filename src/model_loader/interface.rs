use crate::error::ModelLoadError;
use crate::image_classifier::interface::ModelHandle;
use crate::image_classifier::models::model_config::ModelInputConfig;

/// Where a model lives: a base location plus the two descriptor names.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSource {
    pub base_url: String,
    pub topology_file: String,
    pub metadata_file: String,
    pub input: ModelInputConfig,
}

impl ModelSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            topology_file: "model.onnx".to_string(),
            metadata_file: "metadata.json".to_string(),
            input: ModelInputConfig::default(),
        }
    }

    pub fn topology_url(&self) -> String {
        join(&self.base_url, &self.topology_file)
    }

    pub fn metadata_url(&self) -> String {
        join(&self.base_url, &self.metadata_file)
    }
}

fn join(base: &str, file: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), file.trim_start_matches('/'))
}

/// Loads the classifier once at startup.
pub trait ModelLoader: Send + Sync {
    fn load(&self) -> Result<ModelHandle, ModelLoadError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_are_joined_with_a_single_slash() {
        let source = ModelSource::new("https://example.com/models/abc/");

        assert_eq!(
            source.topology_url(),
            "https://example.com/models/abc/model.onnx"
        );
        assert_eq!(
            source.metadata_url(),
            "https://example.com/models/abc/metadata.json"
        );
    }
}
