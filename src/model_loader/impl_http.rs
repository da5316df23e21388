use crate::error::ModelLoadError;
use crate::image_classifier::interface::ModelHandle;
use crate::library::logger::interface::Logger;
use crate::model_loader::assemble::assemble_model;
use crate::model_loader::interface::{ModelLoader, ModelSource};
use std::io::Read;
use std::sync::Arc;
use std::time::Duration;

const MAX_DESCRIPTOR_BYTES: u64 = 256 * 1024 * 1024;

/// Fetches topology and metadata with two HTTP GETs.
pub struct ModelLoaderHttp {
    logger: Arc<dyn Logger + Send + Sync>,
    source: ModelSource,
    agent: ureq::Agent,
}

impl ModelLoaderHttp {
    pub fn new(
        logger: Arc<dyn Logger + Send + Sync>,
        source: ModelSource,
        timeout: Duration,
    ) -> Self {
        Self {
            logger: logger.with_namespace("model_loader").with_namespace("http"),
            source,
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
        }
    }

    fn fetch(&self, url: &str) -> Result<Vec<u8>, ModelLoadError> {
        let _ = self.logger.info(&format!("GET {}", url));

        let response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| ModelLoadError::Fetch {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let bytes = read_limited(response.into_reader(), MAX_DESCRIPTOR_BYTES, url)?;

        let _ = self
            .logger
            .debug(&format!("Fetched {} bytes from {}", bytes.len(), url));
        Ok(bytes)
    }
}

/// Reads the whole body, failing instead of truncating when it exceeds `limit`.
fn read_limited(reader: impl Read, limit: u64, url: &str) -> Result<Vec<u8>, ModelLoadError> {
    let fetch_error = |reason: String| ModelLoadError::Fetch {
        url: url.to_string(),
        reason,
    };

    let mut bytes = Vec::new();
    reader
        .take(limit + 1)
        .read_to_end(&mut bytes)
        .map_err(|e| fetch_error(e.to_string()))?;

    if bytes.len() as u64 > limit {
        return Err(fetch_error(format!(
            "response exceeds the {} byte limit",
            limit
        )));
    }
    Ok(bytes)
}

impl ModelLoader for ModelLoaderHttp {
    fn load(&self) -> Result<ModelHandle, ModelLoadError> {
        let topology = self.fetch(&self.source.topology_url())?;
        let metadata = self.fetch(&self.source.metadata_url())?;
        let model = assemble_model(&self.source, &topology, &metadata)?;
        let _ = self
            .logger
            .info(&format!("Model loaded with {} classes", model.total_classes()));
        Ok(model)
    }
}
