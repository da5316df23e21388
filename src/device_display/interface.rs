use crate::error::DisplayError;
use crate::view::screen::Screen;
use std::sync::mpsc::{channel, Receiver};
use std::sync::Mutex;

/// Something the user asked for through the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserEvent {
    Start,
    Stop,
    ReloadModel,
    Quit,
}

pub trait DeviceDisplay: Send + Sync {
    /// Replace whatever is on screen with `screen`.
    fn show(&mut self, screen: &Screen) -> Result<(), DisplayError>;

    /// Stream of user actions. Only the first caller receives events.
    fn user_events(&self) -> Receiver<UserEvent>;
}

/// Hands out the display's receiver once. Later callers get a receiver whose
/// sender is already gone.
pub(crate) fn take_receiver(slot: &Mutex<Option<Receiver<UserEvent>>>) -> Receiver<UserEvent> {
    if let Some(receiver) = slot.lock().ok().and_then(|mut slot| slot.take()) {
        return receiver;
    }
    let (_, receiver) = channel();
    receiver
}
