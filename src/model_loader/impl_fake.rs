use crate::error::ModelLoadError;
use crate::image_classifier::impl_fake::ImageClassifierFake;
use crate::image_classifier::interface::{ImageClassifier, ModelHandle};
use crate::library::logger::interface::Logger;
use crate::model_loader::interface::ModelLoader;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub struct ModelLoaderFake {
    logger: Arc<dyn Logger + Send + Sync>,
    classifier: Arc<ImageClassifierFake>,
    delay: Duration,
    failure: Option<ModelLoadError>,
    loads: AtomicUsize,
}

impl ModelLoaderFake {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>, classifier: Arc<ImageClassifierFake>) -> Self {
        Self {
            logger: logger.with_namespace("model_loader").with_namespace("fake"),
            classifier,
            delay: Duration::ZERO,
            failure: None,
            loads: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    #[cfg(test)]
    pub fn with_failure(mut self, failure: ModelLoadError) -> Self {
        self.failure = Some(failure);
        self
    }

    #[cfg(test)]
    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl ModelLoader for ModelLoaderFake {
    fn load(&self) -> Result<ModelHandle, ModelLoadError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        let _ = self.logger.info("Loading fake model...");
        std::thread::sleep(self.delay);

        if let Some(failure) = &self.failure {
            return Err(failure.clone());
        }

        if self.classifier.class_labels().is_empty() {
            return Err(ModelLoadError::NoClasses);
        }

        let classifier: Arc<ImageClassifierFake> = Arc::clone(&self.classifier);
        let model = ModelHandle::new(classifier);
        let _ = self
            .logger
            .info(&format!("Fake model loaded with {} classes", model.total_classes()));
        Ok(model)
    }
}
