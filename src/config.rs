use serde_derive::Deserialize;

use crate::error::Error;

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct CameraConfig {
    pub device_index: i32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self { device_index: 0 }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct DetectorConfig {
    pub model: String,
    pub confidence_threshold: f32,
    pub iou_threshold: f32,
    pub input_width: i32,
    pub input_height: i32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            model: "yolov8n.onnx".into(),
            confidence_threshold: 0.25,
            iou_threshold: 0.45,
            input_width: 640,
            input_height: 640,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct TrackerConfig {
    /// Frames a track survives without a matching detection.
    pub max_age: u32,
    /// Consecutive matches before a track counts as confirmed.
    pub n_init: u32,
    pub iou_threshold: f32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            max_age: 10,
            n_init: 3,
            iou_threshold: 0.3,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct SegmenterConfig {
    pub model: String,
    pub input_size: i32,
    /// Soft masks binarize at this value.
    pub mask_threshold: f32,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            model: "selfie_segmentation.onnx".into(),
            input_size: 256,
            mask_threshold: 0.5,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct StreamConfig {
    /// Destination for position datagrams.
    pub destination: String,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            destination: "127.0.0.1:5055".into(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub camera: CameraConfig,
    pub detector: DetectorConfig,
    pub tracker: TrackerConfig,
    pub segmenter: SegmenterConfig,
    pub stream: StreamConfig,
}

impl AppConfig {
    /// Loads the config file, or defaults when no path was given.
    pub fn load(path: Option<&str>) -> Result<Self, Error> {
        match path {
            Some(path) => {
                let contents = std::fs::read_to_string(path)?;
                Ok(toml::from_str(&contents)?)
            }
            None => Ok(Self::default()),
        }
    }
}
