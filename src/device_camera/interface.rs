use crate::device_camera::frame::{Frame, Resolution};
use crate::error::CameraError;
use std::fmt;
use std::sync::Arc;

/// A live capture surface. `setup` acquires the device, `play` starts
/// capture, `update` advances to the newest frame and `stop` releases the
/// device and clears the surface.
pub trait DeviceCamera: Send + Sync {
    fn setup(&self) -> Result<(), CameraError>;
    fn play(&self) -> Result<(), CameraError>;
    fn update(&self) -> Result<Frame, CameraError>;
    fn stop(&self) -> Result<(), CameraError>;
}

/// Builds a fresh camera at a fixed square resolution for every session.
pub trait DeviceCameraFactory: Send + Sync {
    fn create(&self, resolution: Resolution) -> Result<CameraHandle, CameraError>;
}

#[derive(Clone)]
pub struct CameraHandle(pub Arc<dyn DeviceCamera + Send + Sync>);

impl CameraHandle {
    pub fn new(camera: Arc<dyn DeviceCamera + Send + Sync>) -> Self {
        Self(camera)
    }
}

impl std::ops::Deref for CameraHandle {
    type Target = dyn DeviceCamera + Send + Sync;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl fmt::Debug for CameraHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CameraHandle")
    }
}
