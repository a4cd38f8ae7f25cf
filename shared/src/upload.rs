use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum_macros::{EnumIter, EnumString};
use uuid::Uuid;

use crate::fields;

/// How often the monitoring backend samples a frame for classification.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    strum_macros::Display,
)]
pub enum DetectionInterval {
    #[strum(to_string = "1")]
    OneSecond,
    #[strum(to_string = "3")]
    ThreeSeconds,
    #[default]
    #[strum(to_string = "5")]
    FiveSeconds,
    #[strum(to_string = "10")]
    TenSeconds,
    #[strum(to_string = "30")]
    ThirtySeconds,
}

impl DetectionInterval {
    pub fn seconds(self) -> u32 {
        match self {
            DetectionInterval::OneSecond => 1,
            DetectionInterval::ThreeSeconds => 3,
            DetectionInterval::FiveSeconds => 5,
            DetectionInterval::TenSeconds => 10,
            DetectionInterval::ThirtySeconds => 30,
        }
    }

    pub fn label(self) -> String {
        match self.seconds() {
            1 => "Every second".to_string(),
            n => format!("Every {} seconds", n),
        }
    }
}

/// Per-upload detection settings submitted next to the video file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UploadConfig {
    pub detection_interval: DetectionInterval,
    pub tree_detection_enabled: bool,
}

impl UploadConfig {
    /// Text fields of the multipart upload, in submission order.
    pub fn form_fields(&self) -> [(&'static str, String); 2] {
        [
            (fields::DETECTION_INTERVAL, self.detection_interval.to_string()),
            (
                fields::ENABLE_TREE_DETECTION,
                self.tree_detection_enabled.to_string(),
            ),
        ]
    }
}

/// Identity of one submitted upload. Responses tagged with a stale id are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, From)]
pub struct JobId(Uuid);

impl JobId {
    pub fn new() -> Self {
        JobId(Uuid::new_v4())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

/// Body of a successful `POST /upload_video`; the backend is free to put anything here.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UploadAck(pub Value);

impl UploadAck {
    /// The `status` member when present, otherwise the whole body.
    pub fn summary(&self) -> String {
        match self.0.get("status") {
            Some(Value::String(status)) => status.clone(),
            Some(other) => other.to_string(),
            None => self.0.to_string(),
        }
    }
}

/// Pulls the `error` member out of a JSON error body, falling back to the raw text.
pub fn server_error_message(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(value) => match value.get("error") {
            Some(Value::String(error)) => error.clone(),
            Some(other) => other.to_string(),
            None => value.to_string(),
        },
        Err(_) => body.trim().to_string(),
    }
}
