use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelLoadError {
    #[error("Failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },
    #[error("Malformed metadata at {url}: {reason}")]
    Metadata { url: String, reason: String },
    #[error("Malformed topology at {url}: {reason}")]
    Topology { url: String, reason: String },
    #[error("Model declares no classes")]
    NoClasses,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CameraError {
    #[error("Failed to create camera: {0}")]
    Create(String),
    #[error("Failed to set up camera: {0}")]
    Setup(String),
    #[error("Failed to start capture: {0}")]
    Play(String),
    #[error("Failed to read frame: {0}")]
    Update(String),
    #[error("Failed to stop camera: {0}")]
    Stop(String),
    #[error("Camera is not playing")]
    NotPlaying,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictError {
    #[error("Failed to prepare frame: {0}")]
    Preprocess(String),
    #[error("Inference failed: {0}")]
    Inference(String),
    #[error("Model returned {actual} classes, expected {expected}")]
    ClassCountMismatch { expected: usize, actual: usize },
    #[error("Probability {value} for {label} is outside 0..1")]
    OutOfRange { label: String, value: f32 },
}

/// Why a running session ended on its own.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error("Camera: {0}")]
    Camera(#[from] CameraError),
    #[error("Prediction: {0}")]
    Predict(#[from] PredictError),
}

#[derive(Error, Debug)]
pub enum DisplayError {
    #[error("Failed to write to console: {0}")]
    Io(#[from] std::io::Error),
    #[error("Display state is poisoned")]
    Poisoned,
    #[error("Window error: {0}")]
    Window(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value {value:?} for {key}, expected one of: {expected}")]
    InvalidValue {
        key: String,
        value: String,
        expected: String,
    },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Event loop stopped: {0}")]
    EventLoop(String),
}
