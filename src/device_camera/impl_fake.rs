use crate::device_camera::frame::{Frame, Resolution};
use crate::device_camera::interface::{CameraHandle, DeviceCamera, DeviceCameraFactory};
use crate::error::CameraError;
use crate::library::logger::interface::Logger;
use image::{Rgb, RgbImage};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

/// Knobs for making the fake device misbehave.
#[derive(Debug, Clone, Default)]
pub struct FakeCameraBehavior {
    pub fail_create: bool,
    pub fail_setup: bool,
    pub fail_play: bool,
    pub fail_stop: bool,
    pub fail_update_after: Option<u64>,
}

#[derive(Debug, Default)]
pub struct FakeCameraStats {
    created: AtomicUsize,
    acquired: AtomicUsize,
    released: AtomicUsize,
}

#[cfg(test)]
impl FakeCameraStats {
    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    /// Devices that were set up and not stopped yet.
    pub fn open(&self) -> usize {
        self.acquired
            .load(Ordering::SeqCst)
            .saturating_sub(self.released())
    }
}

pub struct DeviceCameraFactoryFake {
    logger: Arc<dyn Logger + Send + Sync>,
    behavior: FakeCameraBehavior,
    stats: Arc<FakeCameraStats>,
}

impl DeviceCameraFactoryFake {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self::with_behavior(logger, FakeCameraBehavior::default())
    }

    pub fn with_behavior(
        logger: Arc<dyn Logger + Send + Sync>,
        behavior: FakeCameraBehavior,
    ) -> Self {
        Self {
            logger: logger.with_namespace("camera").with_namespace("fake"),
            behavior,
            stats: Arc::new(FakeCameraStats::default()),
        }
    }

    #[cfg(test)]
    pub fn stats(&self) -> Arc<FakeCameraStats> {
        Arc::clone(&self.stats)
    }
}

impl DeviceCameraFactory for DeviceCameraFactoryFake {
    fn create(&self, resolution: Resolution) -> Result<CameraHandle, CameraError> {
        if self.behavior.fail_create {
            return Err(CameraError::Create("no fake device available".to_string()));
        }

        self.stats.created.fetch_add(1, Ordering::SeqCst);
        let _ = self.logger.info(&format!(
            "Creating camera {}x{}",
            resolution.width, resolution.height
        ));

        Ok(CameraHandle::new(Arc::new(DeviceCameraFake {
            logger: Arc::clone(&self.logger),
            resolution,
            behavior: self.behavior.clone(),
            stats: Arc::clone(&self.stats),
            acquired: AtomicBool::new(false),
            playing: AtomicBool::new(false),
            sequence: AtomicU64::new(0),
        })))
    }
}

pub struct DeviceCameraFake {
    logger: Arc<dyn Logger + Send + Sync>,
    resolution: Resolution,
    behavior: FakeCameraBehavior,
    stats: Arc<FakeCameraStats>,
    acquired: AtomicBool,
    playing: AtomicBool,
    sequence: AtomicU64,
}

impl DeviceCameraFake {
    fn draw(&self, sequence: u64) -> RgbImage {
        let shift = (sequence * 4) as u32;
        RgbImage::from_fn(self.resolution.width, self.resolution.height, |x, y| {
            Rgb([
                ((x + shift) % 256) as u8,
                ((y + shift) % 256) as u8,
                ((x + y) % 256) as u8,
            ])
        })
    }
}

impl DeviceCamera for DeviceCameraFake {
    fn setup(&self) -> Result<(), CameraError> {
        let _ = self.logger.info("Setting up camera...");
        if self.behavior.fail_setup {
            return Err(CameraError::Setup("permission denied".to_string()));
        }
        if !self.acquired.swap(true, Ordering::SeqCst) {
            self.stats.acquired.fetch_add(1, Ordering::SeqCst);
        }
        let _ = self.logger.info("Camera set up");
        Ok(())
    }

    fn play(&self) -> Result<(), CameraError> {
        if self.behavior.fail_play {
            return Err(CameraError::Play("device busy".to_string()));
        }
        if !self.acquired.load(Ordering::SeqCst) {
            return Err(CameraError::Play("camera was not set up".to_string()));
        }
        self.playing.store(true, Ordering::SeqCst);
        let _ = self.logger.info("Camera playing");
        Ok(())
    }

    fn update(&self) -> Result<Frame, CameraError> {
        if !self.playing.load(Ordering::SeqCst) {
            return Err(CameraError::NotPlaying);
        }

        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst);
        if let Some(limit) = self.behavior.fail_update_after {
            if sequence >= limit {
                return Err(CameraError::Update("device disconnected".to_string()));
            }
        }

        Ok(Frame::new(self.draw(sequence), sequence))
    }

    fn stop(&self) -> Result<(), CameraError> {
        let _ = self.logger.info("Stopping camera...");
        if self.behavior.fail_stop {
            return Err(CameraError::Stop("device not responding".to_string()));
        }
        self.playing.store(false, Ordering::SeqCst);
        if self.acquired.swap(false, Ordering::SeqCst) {
            self.stats.released.fetch_add(1, Ordering::SeqCst);
        }
        let _ = self.logger.info("Camera stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::logger::impl_fake::LoggerFake;

    fn factory(behavior: FakeCameraBehavior) -> DeviceCameraFactoryFake {
        DeviceCameraFactoryFake::with_behavior(Arc::new(LoggerFake::new()), behavior)
    }

    #[test]
    fn frames_have_requested_resolution_and_advance() {
        let factory = factory(FakeCameraBehavior::default());
        let camera = factory.create(Resolution::square(350)).unwrap();
        camera.setup().unwrap();
        camera.play().unwrap();

        let first = camera.update().unwrap();
        let second = camera.update().unwrap();

        assert_eq!(first.resolution(), Resolution::square(350));
        assert_eq!(first.sequence() + 1, second.sequence());
        assert_ne!(first.image().get_pixel(0, 0), second.image().get_pixel(0, 0));
    }

    #[test]
    fn update_before_play_is_an_error() {
        let factory = factory(FakeCameraBehavior::default());
        let camera = factory.create(Resolution::square(8)).unwrap();
        camera.setup().unwrap();

        assert_eq!(camera.update().unwrap_err(), CameraError::NotPlaying);
    }

    #[test]
    fn stop_releases_once() {
        let factory = factory(FakeCameraBehavior::default());
        let stats = factory.stats();
        let camera = factory.create(Resolution::square(8)).unwrap();
        camera.setup().unwrap();
        assert_eq!(stats.open(), 1);

        camera.stop().unwrap();
        camera.stop().unwrap();

        assert_eq!(stats.open(), 0);
        assert_eq!(stats.released(), 1);
    }

    #[test]
    fn failing_setup_never_acquires() {
        let factory = factory(FakeCameraBehavior {
            fail_setup: true,
            ..Default::default()
        });
        let stats = factory.stats();
        let camera = factory.create(Resolution::square(8)).unwrap();

        assert!(matches!(camera.setup(), Err(CameraError::Setup(_))));
        assert_eq!(stats.created(), 1);
        assert_eq!(stats.open(), 0);
    }
}
