use config::{CameraBackend, Config, DisplayBackend, ModelBackend};
use device_camera::impl_fake::DeviceCameraFactoryFake;
use device_camera::impl_image_dir::DeviceCameraFactoryImageDir;
use device_camera::interface::DeviceCameraFactory;
use device_display::impl_console::DeviceDisplayConsole;
use device_display::impl_gui::DeviceDisplayGui;
use image_classifier::impl_fake::ImageClassifierFake;
use library::logger::impl_console::LoggerConsole;
use library::logger::interface::Logger;
use live_classifier::main::LiveClassifier;
use model_loader::impl_dir::ModelLoaderDir;
use model_loader::impl_fake::ModelLoaderFake;
use model_loader::impl_http::ModelLoaderHttp;
use model_loader::interface::ModelLoader;
use std::sync::{Arc, Mutex};

mod config;
mod device_camera;
mod device_display;
mod error;
mod image_classifier;
mod library;
mod live_classifier;
mod model_loader;
mod view;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;

    let logger: Arc<dyn Logger + Send + Sync> =
        Arc::new(LoggerConsole::new(config.logger_timezone, config.log_level));

    let model_loader = model_loader(&config, &logger);

    let camera_factory: Arc<dyn DeviceCameraFactory + Send + Sync> = match &config.camera {
        CameraBackend::Fake => Arc::new(DeviceCameraFactoryFake::new(logger.clone())),
        CameraBackend::ImageDir(dir) => {
            Arc::new(DeviceCameraFactoryImageDir::new(logger.clone(), dir.clone()))
        }
    };

    match config.display {
        DisplayBackend::Console => {
            let device_display = Arc::new(Mutex::new(DeviceDisplayConsole::new(logger.clone())));
            let app = LiveClassifier::new(
                config,
                logger,
                model_loader,
                camera_factory,
                device_display,
            );
            app.run()?;
        }
        DisplayBackend::Gui => {
            let display = DeviceDisplayGui::new(logger.clone());
            // the window owns the main thread, the app loop gets its own
            let window = display.window(config.capture_size, config.flip_preview);
            let app = LiveClassifier::new(
                config,
                logger.clone(),
                model_loader,
                camera_factory,
                Arc::new(Mutex::new(display)),
            );
            let running = std::thread::spawn(move || app.run());

            window.run()?;

            match running.join() {
                Ok(result) => {
                    result?;
                }
                Err(_) => {
                    let _ = logger.error("App thread panicked");
                }
            }
        }
    }

    Ok(())
}

fn model_loader(
    config: &Config,
    logger: &Arc<dyn Logger + Send + Sync>,
) -> Arc<dyn ModelLoader + Send + Sync> {
    match &config.model {
        ModelBackend::Fake { labels, load_delay } => {
            let classifier = Arc::new(ImageClassifierFake::new(logger.clone(), labels.clone()));
            Arc::new(ModelLoaderFake::new(logger.clone(), classifier).with_delay(*load_delay))
        }
        ModelBackend::Http(source) => Arc::new(ModelLoaderHttp::new(
            logger.clone(),
            source.clone(),
            config.model_fetch_timeout,
        )),
        ModelBackend::Dir(source) => Arc::new(ModelLoaderDir::new(logger.clone(), source.clone())),
    }
}
