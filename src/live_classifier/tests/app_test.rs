#[cfg(test)]
mod app_test {
    use crate::device_display::impl_fake::DeviceDisplayFakeHandle;
    use crate::device_display::interface::UserEvent;
    use crate::live_classifier::core::SessionState;
    use crate::live_classifier::tests::fixture::Fixture;
    use crate::view::screen::{PredictionView, Screen};
    use std::time::{Duration, Instant};

    const TIMEOUT: Duration = Duration::from_secs(10);

    fn wait_for(display: &DeviceDisplayFakeHandle, predicate: impl Fn(&Screen) -> bool) -> bool {
        let deadline = Instant::now() + TIMEOUT;
        while Instant::now() < deadline {
            if display.last_screen().is_some_and(|screen| predicate(&screen)) {
                return true;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        false
    }

    #[test]
    fn test_app_classifies_until_quit() {
        let fixture = Fixture::new();
        let display = fixture.display.clone();
        let app = fixture.live_classifier.clone();
        let running = std::thread::spawn(move || app.run());

        assert!(wait_for(&display, |screen| {
            screen.model_status.text == "Model ready (3 classes)"
        }));

        display.send(UserEvent::Start).unwrap();
        assert!(wait_for(&display, |screen| {
            screen.control.label == "Stop"
                && matches!(&screen.predictions, PredictionView::RankedList(rows) if rows.len() == 3)
        }));

        display.send(UserEvent::Quit).unwrap();
        let state = running.join().unwrap().unwrap();

        assert!(state.is_done());
        assert!(matches!(state.session, SessionState::Idle));
        assert_eq!(fixture.camera_stats.created(), 1);
        assert_eq!(fixture.camera_stats.open(), 0);
    }

    #[test]
    fn test_first_screen_is_rendered_before_any_event() {
        let fixture = Fixture::new();
        let display = fixture.display.clone();
        let app = fixture.live_classifier.clone();
        let running = std::thread::spawn(move || app.run());

        assert!(wait_for(&display, |_| true));
        let first = display.screens()[0].clone();
        assert_eq!(first.control.label, "Start");
        assert_eq!(first.model_status.text, "Loading model…");

        display.send(UserEvent::Quit).unwrap();
        assert!(running.join().unwrap().is_ok());
    }
}
