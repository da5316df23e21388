use crate::device_camera::frame::{letterbox, Frame, Resolution};
use crate::device_camera::interface::{CameraHandle, DeviceCamera, DeviceCameraFactory};
use crate::error::CameraError;
use crate::library::logger::interface::Logger;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Replays the pictures of a directory as if they came from a camera.
///
/// The replay position is shared by every camera the factory creates, so a
/// new session resumes after the last picture the previous one reached.
pub struct DeviceCameraFactoryImageDir {
    logger: Arc<dyn Logger + Send + Sync>,
    directory: PathBuf,
    cursor: Arc<AtomicU64>,
}

impl DeviceCameraFactoryImageDir {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>, directory: impl Into<PathBuf>) -> Self {
        Self {
            logger: logger.with_namespace("camera").with_namespace("image_dir"),
            directory: directory.into(),
            cursor: Arc::new(AtomicU64::new(0)),
        }
    }
}

impl DeviceCameraFactory for DeviceCameraFactoryImageDir {
    fn create(&self, resolution: Resolution) -> Result<CameraHandle, CameraError> {
        if !self.directory.is_dir() {
            return Err(CameraError::Create(format!(
                "{} is not a directory",
                self.directory.display()
            )));
        }

        Ok(CameraHandle::new(Arc::new(DeviceCameraImageDir {
            logger: Arc::clone(&self.logger),
            directory: self.directory.clone(),
            resolution,
            images: Mutex::new(Vec::new()),
            playing: AtomicBool::new(false),
            cursor: Arc::clone(&self.cursor),
        })))
    }
}

pub struct DeviceCameraImageDir {
    logger: Arc<dyn Logger + Send + Sync>,
    directory: PathBuf,
    resolution: Resolution,
    images: Mutex<Vec<PathBuf>>,
    playing: AtomicBool,
    cursor: Arc<AtomicU64>,
}

fn list_images(directory: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut images = Vec::new();
    for entry in std::fs::read_dir(directory)? {
        let path = entry?.path();
        let is_image = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
            .unwrap_or(false);
        if is_image {
            images.push(path);
        }
    }
    images.sort();
    Ok(images)
}

impl DeviceCamera for DeviceCameraImageDir {
    fn setup(&self) -> Result<(), CameraError> {
        let found =
            list_images(&self.directory).map_err(|e| CameraError::Setup(e.to_string()))?;
        if found.is_empty() {
            return Err(CameraError::Setup(format!(
                "no images in {}",
                self.directory.display()
            )));
        }

        let _ = self.logger.info(&format!(
            "Found {} images in {}",
            found.len(),
            self.directory.display()
        ));

        let mut images = self
            .images
            .lock()
            .map_err(|_| CameraError::Setup("image list is poisoned".to_string()))?;
        *images = found;
        Ok(())
    }

    fn play(&self) -> Result<(), CameraError> {
        let images = self
            .images
            .lock()
            .map_err(|_| CameraError::Play("image list is poisoned".to_string()))?;
        if images.is_empty() {
            return Err(CameraError::Play("camera was not set up".to_string()));
        }
        self.playing.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn update(&self) -> Result<Frame, CameraError> {
        if !self.playing.load(Ordering::SeqCst) {
            return Err(CameraError::NotPlaying);
        }

        let (path, sequence) = {
            let images = self
                .images
                .lock()
                .map_err(|_| CameraError::Update("image list is poisoned".to_string()))?;
            if images.is_empty() {
                return Err(CameraError::NotPlaying);
            }
            // advance first so an unreadable picture is skipped next time
            let sequence = self.cursor.fetch_add(1, Ordering::SeqCst);
            (images[(sequence % images.len() as u64) as usize].clone(), sequence)
        };

        let image = image::open(&path)
            .map_err(|e| CameraError::Update(format!("{}: {}", path.display(), e)))?;

        Ok(Frame::new(
            letterbox(&image, self.resolution.width, self.resolution.height),
            sequence,
        ))
    }

    fn stop(&self) -> Result<(), CameraError> {
        self.playing.store(false, Ordering::SeqCst);
        let mut images = self
            .images
            .lock()
            .map_err(|_| CameraError::Stop("image list is poisoned".to_string()))?;
        images.clear();
        let _ = self.logger.info("Image replay stopped");
        Ok(())
    }
}
