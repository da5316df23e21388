use crate::error::ModelLoadError;
use serde::Deserialize;

pub const DEFAULT_IMAGE_SIZE: u32 = 224;

/// The `metadata.json` written next to an exported image model.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelMetadata {
    pub labels: Vec<String>,
    #[serde(default)]
    pub image_size: Option<u32>,
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(default)]
    pub tm_version: Option<String>,
    #[serde(default)]
    pub tfjs_version: Option<String>,
}

pub fn parse_metadata(bytes: &[u8], url: &str) -> Result<ModelMetadata, ModelLoadError> {
    serde_json::from_slice(bytes).map_err(|e| ModelLoadError::Metadata {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_teachable_machine_metadata() {
        let json = br#"{
            "tfjsVersion": "1.3.1",
            "tmVersion": "2.4.4",
            "packageVersion": "0.8.4",
            "packageName": "@teachablemachine/image",
            "timeStamp": "2021-05-01T10:00:00.000Z",
            "userMetadata": {},
            "modelName": "tm-my-image-model",
            "labels": ["A", "B", "C"],
            "imageSize": 224
        }"#;

        let metadata = parse_metadata(json, "metadata.json").unwrap();

        assert_eq!(metadata.labels, vec!["A", "B", "C"]);
        assert_eq!(metadata.image_size, Some(224));
        assert_eq!(metadata.model_name.as_deref(), Some("tm-my-image-model"));
    }

    #[test]
    fn missing_labels_is_malformed() {
        let result = parse_metadata(br#"{"imageSize": 224}"#, "http://host/metadata.json");

        match result {
            Err(ModelLoadError::Metadata { url, reason }) => {
                assert_eq!(url, "http://host/metadata.json");
                assert!(reason.contains("labels"), "{}", reason);
            }
            other => panic!("Unexpected result: {:?}", other),
        }
    }
}
