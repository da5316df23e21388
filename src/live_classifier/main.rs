use crate::config::Config;
use crate::device_camera::interface::DeviceCameraFactory;
use crate::device_display::interface::DeviceDisplay;
use crate::error::AppError;
use crate::library::logger::interface::Logger;
use crate::library::state_machine::StateMachine;
use crate::live_classifier::core::{init, transition, Effect, Event, State};
use crate::live_classifier::render::Render;
use crate::live_classifier::run_effect::RunEffect;
use crate::model_loader::interface::ModelLoader;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct LiveClassifier {
    pub config: Config,
    pub logger: Arc<dyn Logger + Send + Sync>,
    pub model_loader: Arc<dyn ModelLoader + Send + Sync>,
    pub camera_factory: Arc<dyn DeviceCameraFactory + Send + Sync>,
    pub device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>,
}

impl LiveClassifier {
    pub fn new(
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
        model_loader: Arc<dyn ModelLoader + Send + Sync>,
        camera_factory: Arc<dyn DeviceCameraFactory + Send + Sync>,
        device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>,
    ) -> Self {
        Self {
            config,
            logger: logger.with_namespace("live_classifier"),
            model_loader,
            camera_factory,
            device_display,
        }
    }

    /// Runs until the user quits and every camera has been released.
    pub fn run(&self) -> Result<State, AppError> {
        let render = Render::new(
            self.device_display.clone(),
            self.config.clone(),
            self.logger.clone(),
        );
        let run_effect = RunEffect::new(
            self.config.clone(),
            self.logger.clone(),
            self.model_loader.clone(),
            self.camera_factory.clone(),
            self.device_display.clone(),
        );
        let transition_config = self.config.clone();
        let logger = self.logger.clone();

        let _ = self.logger.info("Starting");

        let machine = StateMachine::new(
            init(&self.config),
            move |state: State, event: Event| {
                let _ = logger.debug(&format!("Event: {:?}", event));
                let before = state.session.name();
                let (new_state, effects) = transition(&transition_config, state, event);
                let after = new_state.session.name();
                if before != after {
                    let _ = logger.info(&format!("Session {} -> {}", before, after));
                }
                if !effects.is_empty() {
                    let _ = logger.debug(&format!("Effects: {:?}", effects));
                }
                (new_state, effects)
            },
            move |state: &State| render.render_or_log(state),
            move |effect: Effect, sender: Sender<Event>| run_effect.run_effect(effect, sender),
            |state: &State| state.is_done(),
        );

        let final_state = machine
            .run()
            .map_err(|e| AppError::EventLoop(e.to_string()))?;

        let _ = self.logger.info("Stopped");

        Ok(final_state)
    }
}
