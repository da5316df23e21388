use crate::device_display::interface::{take_receiver, DeviceDisplay, UserEvent};
use crate::error::DisplayError;
use crate::library::logger::interface::Logger;
use crate::view::screen::Screen;
use std::sync::mpsc::{channel, Receiver, SendError, Sender};
use std::sync::{Arc, Mutex};

/// Records every screen it is shown. Tests drive it through a
/// [`DeviceDisplayFakeHandle`].
pub struct DeviceDisplayFake {
    logger: Arc<dyn Logger + Send + Sync>,
    screens: Arc<Mutex<Vec<Screen>>>,
    event_sender: Sender<UserEvent>,
    event_receiver: Mutex<Option<Receiver<UserEvent>>>,
}

#[derive(Clone)]
pub struct DeviceDisplayFakeHandle {
    screens: Arc<Mutex<Vec<Screen>>>,
    event_sender: Sender<UserEvent>,
}

impl DeviceDisplayFake {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        let (event_sender, event_receiver) = channel();
        Self {
            logger: logger.with_namespace("display").with_namespace("fake"),
            screens: Arc::new(Mutex::new(vec![])),
            event_sender,
            event_receiver: Mutex::new(Some(event_receiver)),
        }
    }

    pub fn handle(&self) -> DeviceDisplayFakeHandle {
        DeviceDisplayFakeHandle {
            screens: Arc::clone(&self.screens),
            event_sender: self.event_sender.clone(),
        }
    }
}

impl DeviceDisplayFakeHandle {
    pub fn send(&self, event: UserEvent) -> Result<(), SendError<UserEvent>> {
        self.event_sender.send(event)
    }

    pub fn screens(&self) -> Vec<Screen> {
        self.screens
            .lock()
            .map(|screens| screens.clone())
            .unwrap_or_default()
    }

    pub fn last_screen(&self) -> Option<Screen> {
        self.screens
            .lock()
            .ok()
            .and_then(|screens| screens.last().cloned())
    }
}

impl DeviceDisplay for DeviceDisplayFake {
    fn show(&mut self, screen: &Screen) -> Result<(), DisplayError> {
        let _ = self.logger.debug(&format!("show {}", screen.control.label));
        self.screens
            .lock()
            .map_err(|_| DisplayError::Poisoned)?
            .push(screen.clone());
        Ok(())
    }

    fn user_events(&self) -> Receiver<UserEvent> {
        take_receiver(&self.event_receiver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::library::logger::impl_fake::LoggerFake;
    use crate::live_classifier::core::State;
    use crate::view::screen::screen;

    #[test]
    fn records_screens_and_forwards_events() {
        let mut display = DeviceDisplayFake::new(Arc::new(LoggerFake::new()));
        let handle = display.handle();
        let events = display.user_events();

        display
            .show(&screen(&State::default(), &Config::default()))
            .unwrap();
        handle.send(UserEvent::Start).unwrap();

        assert_eq!(handle.screens().len(), 1);
        assert_eq!(handle.last_screen().unwrap().control.label, "Start");
        assert_eq!(events.recv().unwrap(), UserEvent::Start);
    }

    #[test]
    fn second_subscriber_gets_a_closed_stream() {
        let display = DeviceDisplayFake::new(Arc::new(LoggerFake::new()));
        let _first = display.user_events();

        let second = display.user_events();

        assert!(second.recv().is_err());
    }
}
