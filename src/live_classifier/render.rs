use crate::config::Config;
use crate::device_display::interface::DeviceDisplay;
use crate::error::DisplayError;
use crate::library::logger::interface::Logger;
use crate::live_classifier::core::State;
use crate::view::screen::screen;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct Render {
    device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>,
    config: Config,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl Render {
    pub fn new(
        device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>,
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Self {
        Self {
            device_display,
            config,
            logger: logger.with_namespace("render"),
        }
    }

    pub fn render(&self, state: &State) -> Result<(), DisplayError> {
        let screen = screen(state, &self.config);
        let mut device_display = self
            .device_display
            .lock()
            .map_err(|_| DisplayError::Poisoned)?;
        device_display.show(&screen)
    }

    /// Render errors are logged and never stop the app.
    pub fn render_or_log(&self, state: &State) {
        if let Err(e) = self.render(state) {
            let _ = self.logger.error(&format!("Render failed: {}", e));
        }
    }
}
