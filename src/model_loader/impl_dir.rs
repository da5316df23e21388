use crate::error::ModelLoadError;
use crate::image_classifier::interface::ModelHandle;
use crate::library::logger::interface::Logger;
use crate::model_loader::assemble::assemble_model;
use crate::model_loader::interface::{ModelLoader, ModelSource};
use std::sync::Arc;

/// Reads both descriptors from a local directory; `base_url` is a path.
pub struct ModelLoaderDir {
    logger: Arc<dyn Logger + Send + Sync>,
    source: ModelSource,
}

impl ModelLoaderDir {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>, source: ModelSource) -> Self {
        Self {
            logger: logger.with_namespace("model_loader").with_namespace("dir"),
            source,
        }
    }

    fn read(&self, path: &str) -> Result<Vec<u8>, ModelLoadError> {
        let _ = self.logger.info(&format!("Reading {}", path));
        std::fs::read(path).map_err(|e| ModelLoadError::Fetch {
            url: path.to_string(),
            reason: e.to_string(),
        })
    }
}

impl ModelLoader for ModelLoaderDir {
    fn load(&self) -> Result<ModelHandle, ModelLoadError> {
        let topology = self.read(&self.source.topology_url())?;
        let metadata = self.read(&self.source.metadata_url())?;
        assemble_model(&self.source, &topology, &metadata)
    }
}
