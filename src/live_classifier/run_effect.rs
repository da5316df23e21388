use crate::config::Config;
use crate::device_camera::frame::Resolution;
use crate::device_camera::interface::{CameraHandle, DeviceCameraFactory};
use crate::device_display::interface::DeviceDisplay;
use crate::error::CameraError;
use crate::library::logger::interface::Logger;
use crate::live_classifier::core::{Effect, Event};
use crate::model_loader::interface::ModelLoader;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct RunEffect {
    config: Config,
    logger: Arc<dyn Logger + Send + Sync>,
    model_loader: Arc<dyn ModelLoader + Send + Sync>,
    camera_factory: Arc<dyn DeviceCameraFactory + Send + Sync>,
    device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>,
}

impl RunEffect {
    pub fn new(
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
        model_loader: Arc<dyn ModelLoader + Send + Sync>,
        camera_factory: Arc<dyn DeviceCameraFactory + Send + Sync>,
        device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>,
    ) -> Self {
        Self {
            config,
            logger: logger.with_namespace("effect"),
            model_loader,
            camera_factory,
            device_display,
        }
    }

    /// Runs one effect to completion and reports its outcome on `sender`.
    /// A closed channel means the app is shutting down, so send results are
    /// ignored.
    pub fn run_effect(&self, effect: Effect, sender: Sender<Event>) {
        match effect {
            Effect::SubscribeToUserEvents => {
                let user_events = match self.device_display.lock() {
                    Ok(display) => display.user_events(),
                    Err(_) => {
                        let _ = self.logger.error("Display lock poisoned");
                        return;
                    }
                };
                while let Ok(user_event) = user_events.recv() {
                    let _ = self.logger.info(&format!("User event: {:?}", user_event));
                    if sender.send(Event::User(user_event)).is_err() {
                        break;
                    }
                }
            }
            Effect::LoadModel => {
                let _ = self.logger.info("Loading model");
                let loaded = self.model_loader.load();
                match &loaded {
                    Ok(model) => {
                        let _ = self.logger.info(&format!(
                            "Model loaded with {} classes",
                            model.total_classes()
                        ));
                    }
                    Err(e) => {
                        let _ = self.logger.error(&format!("Model load failed: {}", e));
                    }
                }
                let _ = sender.send(Event::ModelLoadDone(loaded));
            }
            Effect::StartCamera {
                session,
                resolution,
            } => {
                let result = self.start_camera(resolution);
                if let Err(e) = &result {
                    let _ = self.logger.error(&format!("Camera start failed: {}", e));
                }
                let _ = sender.send(Event::CameraStartDone { session, result });
            }
            Effect::StopCamera { camera } => {
                let result = camera.stop();
                if let Err(e) = &result {
                    let _ = self.logger.error(&format!("Camera stop failed: {}", e));
                }
                let _ = sender.send(Event::CameraStopDone(result));
            }
            Effect::RequestAnimationFrame { session } => {
                if !self.config.frame_interval.is_zero() {
                    std::thread::sleep(self.config.frame_interval);
                }
                let _ = sender.send(Event::AnimationFrame { session });
            }
            Effect::UpdateFrame { session, camera } => {
                let result = camera.update();
                if let Err(e) = &result {
                    let _ = self.logger.error(&format!("Frame update failed: {}", e));
                }
                let _ = sender.send(Event::FrameUpdateDone { session, result });
            }
            Effect::Predict {
                session,
                model,
                frame,
            } => {
                let result = model.predict(&frame);
                match &result {
                    Ok(predictions) => {
                        let _ = self.logger.debug(&predictions.to_display_string());
                    }
                    Err(e) => {
                        let _ = self.logger.error(&format!("Predict failed: {}", e));
                    }
                }
                let _ = sender.send(Event::PredictDone { session, result });
            }
        }
    }

    /// Create, set up and play. Anything acquired along the way is stopped
    /// again when a later step fails.
    fn start_camera(&self, resolution: Resolution) -> Result<CameraHandle, CameraError> {
        let camera = self.camera_factory.create(resolution)?;

        let started = camera.setup().and_then(|_| camera.play());
        if let Err(e) = started {
            if let Err(stop_error) = camera.stop() {
                let _ = self
                    .logger
                    .warn(&format!("Releasing camera after failure: {}", stop_error));
            }
            return Err(e);
        }

        Ok(camera)
    }
}
