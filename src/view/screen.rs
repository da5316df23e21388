use crate::config::{Config, DisplayVariant};
use crate::device_camera::frame::Frame;
use crate::device_display::interface::UserEvent;
use crate::live_classifier::core::{ModelState, SessionState, State};
use crate::view::best_guess::best_guess;
use crate::view::ranked_list::{ranked_rows, RankedRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlTone {
    Start,
    Stop,
    Busy,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ControlView {
    pub label: String,
    /// `None` while the control is disabled.
    pub action: Option<UserEvent>,
    pub tone: ControlTone,
    pub detail: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelStatusView {
    pub text: String,
    pub can_reload: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PredictionView {
    Empty,
    RankedList(Vec<RankedRow>),
    BestGuess(String),
}

/// Everything a display needs to draw one state.
#[derive(Debug, Clone)]
pub struct Screen {
    pub control: ControlView,
    pub model_status: ModelStatusView,
    pub class_count: Option<usize>,
    pub preview: Option<Frame>,
    pub predictions: PredictionView,
}

pub fn screen(state: &State, config: &Config) -> Screen {
    Screen {
        control: control(&state.session),
        model_status: model_status(&state.model),
        class_count: match &state.model {
            ModelState::Loaded(model) => Some(model.total_classes()),
            _ => None,
        },
        preview: state.frame().cloned(),
        predictions: predictions(state, config),
    }
}

fn control(session: &SessionState) -> ControlView {
    match session {
        SessionState::Idle => ControlView {
            label: "Start".to_string(),
            action: Some(UserEvent::Start),
            tone: ControlTone::Start,
            detail: None,
        },
        SessionState::Starting { .. } => ControlView {
            label: "Starting…".to_string(),
            action: None,
            tone: ControlTone::Busy,
            detail: None,
        },
        SessionState::Active { .. } => ControlView {
            label: "Stop".to_string(),
            action: Some(UserEvent::Stop),
            tone: ControlTone::Stop,
            detail: None,
        },
        SessionState::Failed { error } => ControlView {
            label: "Retry".to_string(),
            action: Some(UserEvent::Start),
            tone: ControlTone::Failed,
            detail: Some(error.to_string()),
        },
    }
}

fn model_status(model: &ModelState) -> ModelStatusView {
    match model {
        ModelState::Loading => ModelStatusView {
            text: "Loading model…".to_string(),
            can_reload: false,
        },
        ModelState::Loaded(model) => ModelStatusView {
            text: format!("Model ready ({} classes)", model.total_classes()),
            can_reload: false,
        },
        ModelState::Failed(error) => ModelStatusView {
            text: format!("Model failed: {}", error),
            can_reload: true,
        },
    }
}

fn predictions(state: &State, config: &Config) -> PredictionView {
    let Some(predictions) = state.predictions() else {
        return PredictionView::Empty;
    };

    match config.display_variant {
        DisplayVariant::RankedList => {
            PredictionView::RankedList(ranked_rows(predictions, &config.palette))
        }
        DisplayVariant::BestGuess => match best_guess(predictions) {
            Some(glyph) => PredictionView::BestGuess(glyph),
            None => PredictionView::Empty,
        },
    }
}
