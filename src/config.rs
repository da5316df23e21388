use crate::error::ConfigError;
use crate::image_classifier::models::model_config::{
    ModelInputConfig, Normalization, TensorLayout,
};
use crate::library::logger::interface::LogLevel;
use crate::model_loader::interface::ModelSource;
use chrono::Offset;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModelBackend {
    Fake {
        labels: Vec<String>,
        load_delay: Duration,
    },
    Http(ModelSource),
    Dir(ModelSource),
}

#[derive(Debug, Clone, PartialEq)]
pub enum CameraBackend {
    Fake,
    ImageDir(PathBuf),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayBackend {
    Gui,
    Console,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayVariant {
    RankedList,
    BestGuess,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub model: ModelBackend,
    pub model_fetch_timeout: Duration,
    pub camera: CameraBackend,
    pub display: DisplayBackend,
    pub display_variant: DisplayVariant,
    pub capture_size: u32,
    /// Mirror the preview like a selfie camera.
    pub flip_preview: bool,
    pub frame_interval: Duration,
    pub palette: Vec<Color>,
    pub logger_timezone: chrono::FixedOffset,
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: ModelBackend::Fake {
                labels: vec!["A".to_string(), "B".to_string(), "C".to_string()],
                load_delay: Duration::from_secs(1),
            },
            model_fetch_timeout: Duration::from_secs(30),
            camera: CameraBackend::Fake,
            display: DisplayBackend::Gui,
            display_variant: DisplayVariant::RankedList,
            capture_size: 350,
            flip_preview: true,
            // one display refresh at 60Hz
            frame_interval: Duration::from_millis(16),
            palette: default_palette(),
            logger_timezone: utc(),
            log_level: LogLevel::Info,
        }
    }
}

pub fn default_palette() -> Vec<Color> {
    vec![
        Color::rgb(0xef, 0x44, 0x44),
        Color::rgb(0xf5, 0x9e, 0x0b),
        Color::rgb(0x10, 0xb9, 0x81),
        Color::rgb(0x3b, 0x82, 0xf6),
        Color::rgb(0x8b, 0x5c, 0xf6),
        Color::rgb(0xec, 0x48, 0x99),
    ]
}

fn utc() -> chrono::FixedOffset {
    chrono::Utc.fix()
}

impl Config {
    /// `Config::default()` with overrides from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(url) = lookup("CLASSIFIER_MODEL_URL") {
            self.model = ModelBackend::Http(ModelSource::new(url));
        }
        if let Some(dir) = lookup("CLASSIFIER_MODEL_DIR") {
            self.model = ModelBackend::Dir(ModelSource::new(dir));
        }
        if let ModelBackend::Http(source) | ModelBackend::Dir(source) = &mut self.model {
            source.input = input_overrides(source.input.clone(), &lookup)?;
        }
        if let Some(dir) = lookup("CLASSIFIER_IMAGE_DIR") {
            self.camera = CameraBackend::ImageDir(PathBuf::from(dir));
        }
        if let Some(value) = lookup("CLASSIFIER_DISPLAY") {
            self.display = match value.to_lowercase().as_str() {
                "gui" => DisplayBackend::Gui,
                "console" => DisplayBackend::Console,
                _ => return Err(invalid("CLASSIFIER_DISPLAY", value, "gui, console")),
            };
        }
        if let Some(value) = lookup("CLASSIFIER_VARIANT") {
            self.display_variant = match value.to_lowercase().as_str() {
                "ranked-list" => DisplayVariant::RankedList,
                "best-guess" => DisplayVariant::BestGuess,
                _ => {
                    return Err(invalid(
                        "CLASSIFIER_VARIANT",
                        value,
                        "ranked-list, best-guess",
                    ))
                }
            };
        }
        if let Some(value) = lookup("CLASSIFIER_FLIP") {
            self.flip_preview = parse_flag("CLASSIFIER_FLIP", value)?;
        }
        if let Some(value) = lookup("CLASSIFIER_LOG_LEVEL") {
            self.log_level = match value.to_lowercase().as_str() {
                "debug" => LogLevel::Debug,
                "info" => LogLevel::Info,
                "warn" => LogLevel::Warn,
                "error" => LogLevel::Error,
                _ => {
                    return Err(invalid(
                        "CLASSIFIER_LOG_LEVEL",
                        value,
                        "debug, info, warn, error",
                    ))
                }
            };
        }
        Ok(self)
    }
}

/// How frames are turned into tensors for a fetched model.
fn input_overrides(
    mut input: ModelInputConfig,
    lookup: &impl Fn(&str) -> Option<String>,
) -> Result<ModelInputConfig, ConfigError> {
    if let Some(value) = lookup("CLASSIFIER_INPUT_SIZE") {
        input.size = match value.parse::<u32>() {
            Ok(size) if size > 0 => Some(size),
            _ => return Err(invalid("CLASSIFIER_INPUT_SIZE", value, "a positive integer")),
        };
    }
    if let Some(value) = lookup("CLASSIFIER_TENSOR_LAYOUT") {
        input.layout = match value.to_lowercase().as_str() {
            "nchw" => TensorLayout::Nchw,
            "nhwc" => TensorLayout::Nhwc,
            _ => return Err(invalid("CLASSIFIER_TENSOR_LAYOUT", value, "nchw, nhwc")),
        };
    }
    if let Some(value) = lookup("CLASSIFIER_NORMALIZATION") {
        input.normalization = match value.to_lowercase().as_str() {
            "zero-to-one" => Normalization::ZeroToOne,
            "minus-one-to-one" => Normalization::MinusOneToOne,
            _ => {
                return Err(invalid(
                    "CLASSIFIER_NORMALIZATION",
                    value,
                    "zero-to-one, minus-one-to-one",
                ))
            }
        };
    }
    if let Some(value) = lookup("CLASSIFIER_SOFTMAX") {
        input.softmax = parse_flag("CLASSIFIER_SOFTMAX", value)?;
    }
    Ok(input)
}

fn parse_flag(key: &str, value: String) -> Result<bool, ConfigError> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(invalid(key, value, "true, false")),
    }
}

fn invalid(key: &str, value: String, expected: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value,
        expected: expected.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn overrides(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::default().with_overrides(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_to_fake_devices_and_ranked_list() {
        let config = overrides(&[]).unwrap();

        assert!(matches!(config.model, ModelBackend::Fake { .. }));
        assert_eq!(config.camera, CameraBackend::Fake);
        assert_eq!(config.display_variant, DisplayVariant::RankedList);
        assert_eq!(config.capture_size, 350);
        assert!(config.flip_preview);
        assert_eq!(config.palette.len(), 6);
    }

    #[test]
    fn environment_selects_backends() {
        let config = overrides(&[
            ("CLASSIFIER_MODEL_URL", "https://example.test/models/pets/"),
            ("CLASSIFIER_IMAGE_DIR", "/tmp/frames"),
            ("CLASSIFIER_DISPLAY", "Console"),
            ("CLASSIFIER_VARIANT", "best-guess"),
            ("CLASSIFIER_LOG_LEVEL", "debug"),
        ])
        .unwrap();

        match &config.model {
            ModelBackend::Http(source) => assert_eq!(
                source.topology_url(),
                "https://example.test/models/pets/model.onnx"
            ),
            other => panic!("Unexpected model backend {:?}", other),
        }
        assert_eq!(config.camera, CameraBackend::ImageDir(PathBuf::from("/tmp/frames")));
        assert_eq!(config.display, DisplayBackend::Console);
        assert_eq!(config.display_variant, DisplayVariant::BestGuess);
        assert_eq!(config.log_level, LogLevel::Debug);
    }

    #[test]
    fn unknown_values_are_rejected() {
        let result = overrides(&[("CLASSIFIER_DISPLAY", "hologram")]);

        assert_eq!(
            result.unwrap_err().to_string(),
            "Invalid value \"hologram\" for CLASSIFIER_DISPLAY, expected one of: gui, console"
        );
    }

    #[test]
    fn environment_shapes_the_model_input() {
        let config = overrides(&[
            ("CLASSIFIER_MODEL_DIR", "/opt/models/pets"),
            ("CLASSIFIER_INPUT_SIZE", "96"),
            ("CLASSIFIER_TENSOR_LAYOUT", "NCHW"),
            ("CLASSIFIER_NORMALIZATION", "zero-to-one"),
            ("CLASSIFIER_SOFTMAX", "true"),
            ("CLASSIFIER_FLIP", "off"),
        ])
        .unwrap();

        match &config.model {
            ModelBackend::Dir(source) => assert_eq!(
                source.input,
                ModelInputConfig {
                    size: Some(96),
                    layout: TensorLayout::Nchw,
                    normalization: Normalization::ZeroToOne,
                    softmax: true,
                }
            ),
            other => panic!("Unexpected model backend {:?}", other),
        }
        assert!(!config.flip_preview);
    }

    #[test]
    fn model_input_keeps_defaults_without_overrides() {
        let config = overrides(&[("CLASSIFIER_MODEL_URL", "https://example.test/m")]).unwrap();

        match &config.model {
            ModelBackend::Http(source) => assert_eq!(source.input, ModelInputConfig::default()),
            other => panic!("Unexpected model backend {:?}", other),
        }
    }

    #[test]
    fn zero_input_size_is_rejected() {
        let result = overrides(&[
            ("CLASSIFIER_MODEL_DIR", "/opt/models/pets"),
            ("CLASSIFIER_INPUT_SIZE", "0"),
        ]);

        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { ref key, .. }) if key == "CLASSIFIER_INPUT_SIZE"
        ));
    }
}
