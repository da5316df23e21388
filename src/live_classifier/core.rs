use crate::config::Config;
use crate::device_camera::frame::{Frame, Resolution};
use crate::device_camera::interface::CameraHandle;
use crate::device_display::interface::UserEvent;
use crate::error::{CameraError, ModelLoadError, PredictError, SessionError};
use crate::image_classifier::interface::{ModelHandle, PredictionSet};

pub type SessionId = u64;

#[derive(Debug, Clone, Default)]
pub enum ModelState {
    #[default]
    Loading,
    Loaded(ModelHandle),
    Failed(ModelLoadError),
}

#[derive(Debug, Clone, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Starting {
        session: SessionId,
    },
    Active {
        session: SessionId,
        camera: CameraHandle,
        frame: Option<Frame>,
        predictions: Option<PredictionSet>,
    },
    Failed {
        error: SessionError,
    },
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Idle => "Idle",
            SessionState::Starting { .. } => "Starting",
            SessionState::Active { .. } => "Active",
            SessionState::Failed { .. } => "Failed",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct State {
    pub model: ModelState,
    pub session: SessionState,
    pub next_session: SessionId,
    /// Camera start/stop effects whose result has not come back yet.
    pub camera_ops_in_flight: usize,
    pub quit_requested: bool,
}

impl State {
    pub fn predictions(&self) -> Option<&PredictionSet> {
        match &self.session {
            SessionState::Active { predictions, .. } => predictions.as_ref(),
            _ => None,
        }
    }

    pub fn frame(&self) -> Option<&Frame> {
        match &self.session {
            SessionState::Active { frame, .. } => frame.as_ref(),
            _ => None,
        }
    }

    /// Quit was requested and no camera is left half started or unstopped.
    pub fn is_done(&self) -> bool {
        self.quit_requested && self.camera_ops_in_flight == 0
    }

    fn active_camera(&self, session: SessionId) -> Option<CameraHandle> {
        match &self.session {
            SessionState::Active {
                session: current,
                camera,
                ..
            } if *current == session => Some(camera.clone()),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub enum Event {
    User(UserEvent),
    ModelLoadDone(Result<ModelHandle, ModelLoadError>),
    CameraStartDone {
        session: SessionId,
        result: Result<CameraHandle, CameraError>,
    },
    CameraStopDone(Result<(), CameraError>),
    AnimationFrame {
        session: SessionId,
    },
    FrameUpdateDone {
        session: SessionId,
        result: Result<Frame, CameraError>,
    },
    PredictDone {
        session: SessionId,
        result: Result<PredictionSet, PredictError>,
    },
}

#[derive(Debug, Clone)]
pub enum Effect {
    SubscribeToUserEvents,
    LoadModel,
    StartCamera {
        session: SessionId,
        resolution: Resolution,
    },
    StopCamera {
        camera: CameraHandle,
    },
    RequestAnimationFrame {
        session: SessionId,
    },
    UpdateFrame {
        session: SessionId,
        camera: CameraHandle,
    },
    Predict {
        session: SessionId,
        model: ModelHandle,
        frame: Frame,
    },
}

pub fn init(_config: &Config) -> (State, Vec<Effect>) {
    (
        State::default(),
        vec![Effect::SubscribeToUserEvents, Effect::LoadModel],
    )
}

pub fn transition(config: &Config, state: State, event: Event) -> (State, Vec<Effect>) {
    match event {
        Event::User(user_event) => on_user_event(config, state, user_event),
        Event::ModelLoadDone(result) => on_model_load_done(state, result),
        Event::CameraStartDone { session, result } => on_camera_start_done(state, session, result),
        Event::CameraStopDone(result) => on_camera_stop_done(state, result),
        Event::AnimationFrame { session } => on_animation_frame(state, session),
        Event::FrameUpdateDone { session, result } => on_frame_update_done(state, session, result),
        Event::PredictDone { session, result } => on_predict_done(state, session, result),
    }
}

fn on_user_event(config: &Config, mut state: State, user_event: UserEvent) -> (State, Vec<Effect>) {
    match user_event {
        UserEvent::Start => match state.session {
            SessionState::Idle | SessionState::Failed { .. } if !state.quit_requested => {
                let session = state.next_session;
                state.next_session += 1;
                state.session = SessionState::Starting { session };
                state.camera_ops_in_flight += 1;
                (
                    state,
                    vec![Effect::StartCamera {
                        session,
                        resolution: Resolution::square(config.capture_size),
                    }],
                )
            }
            _ => (state, vec![]),
        },
        UserEvent::Stop => end_session(state, SessionState::Idle),
        UserEvent::ReloadModel => match state.model {
            ModelState::Failed(_) => {
                state.model = ModelState::Loading;
                (state, vec![Effect::LoadModel])
            }
            _ => (state, vec![]),
        },
        UserEvent::Quit => {
            state.quit_requested = true;
            end_session(state, SessionState::Idle)
        }
    }
}

/// Leaves Starting or Active for `next`, releasing the camera if one is held.
/// Idle and Failed are left untouched.
fn end_session(mut state: State, next: SessionState) -> (State, Vec<Effect>) {
    match std::mem::take(&mut state.session) {
        SessionState::Active { camera, .. } => {
            state.session = next;
            state.camera_ops_in_flight += 1;
            (state, vec![Effect::StopCamera { camera }])
        }
        SessionState::Starting { .. } => {
            // the camera is released when its start result arrives
            state.session = next;
            (state, vec![])
        }
        previous => {
            state.session = previous;
            (state, vec![])
        }
    }
}

fn on_model_load_done(
    mut state: State,
    result: Result<ModelHandle, ModelLoadError>,
) -> (State, Vec<Effect>) {
    if !matches!(state.model, ModelState::Loading) {
        return (state, vec![]);
    }
    state.model = match result {
        Ok(model) => ModelState::Loaded(model),
        Err(error) => ModelState::Failed(error),
    };
    (state, vec![])
}

fn on_camera_start_done(
    mut state: State,
    session: SessionId,
    result: Result<CameraHandle, CameraError>,
) -> (State, Vec<Effect>) {
    state.camera_ops_in_flight = state.camera_ops_in_flight.saturating_sub(1);

    let is_pending = matches!(
        state.session,
        SessionState::Starting { session: current } if current == session
    );

    match result {
        Ok(camera) if is_pending => {
            state.session = SessionState::Active {
                session,
                camera,
                frame: None,
                predictions: None,
            };
            (state, vec![Effect::RequestAnimationFrame { session }])
        }
        Ok(camera) => {
            // abandoned before it came up
            state.camera_ops_in_flight += 1;
            (state, vec![Effect::StopCamera { camera }])
        }
        Err(error) if is_pending => {
            state.session = SessionState::Failed {
                error: error.into(),
            };
            (state, vec![])
        }
        Err(_) => (state, vec![]),
    }
}

fn on_camera_stop_done(
    mut state: State,
    result: Result<(), CameraError>,
) -> (State, Vec<Effect>) {
    state.camera_ops_in_flight = state.camera_ops_in_flight.saturating_sub(1);

    if let Err(error) = result {
        if matches!(state.session, SessionState::Idle) {
            state.session = SessionState::Failed {
                error: error.into(),
            };
        }
    }
    (state, vec![])
}

fn on_animation_frame(state: State, session: SessionId) -> (State, Vec<Effect>) {
    match state.active_camera(session) {
        Some(camera) => (state, vec![Effect::UpdateFrame { session, camera }]),
        None => (state, vec![]),
    }
}

fn on_frame_update_done(
    mut state: State,
    session: SessionId,
    result: Result<Frame, CameraError>,
) -> (State, Vec<Effect>) {
    if state.active_camera(session).is_none() {
        return (state, vec![]);
    }

    let frame = match result {
        Ok(frame) => frame,
        Err(error) => return end_session(state, SessionState::Failed { error: error.into() }),
    };

    if let SessionState::Active { frame: slot, .. } = &mut state.session {
        *slot = Some(frame.clone());
    }

    let effect = match &state.model {
        ModelState::Loaded(model) => Effect::Predict {
            session,
            model: model.clone(),
            frame,
        },
        ModelState::Loading | ModelState::Failed(_) => Effect::RequestAnimationFrame { session },
    };
    (state, vec![effect])
}

fn on_predict_done(
    mut state: State,
    session: SessionId,
    result: Result<PredictionSet, PredictError>,
) -> (State, Vec<Effect>) {
    if state.active_camera(session).is_none() {
        return (state, vec![]);
    }

    match result {
        Ok(predictions) => {
            if let SessionState::Active {
                predictions: slot, ..
            } = &mut state.session
            {
                *slot = Some(predictions);
            }
            (state, vec![Effect::RequestAnimationFrame { session }])
        }
        Err(error) => end_session(state, SessionState::Failed { error: error.into() }),
    }
}
