//! Wire types shared between the headless session core and the browser
//! frontend: what the monitoring and chatbot backends send and expect.

mod chat;
mod detection;
mod progress;
mod upload;

pub use chat::ChatReply;
pub use detection::{sort_newest_first, Detection};
pub use progress::{ProgressPhase, ProgressSnapshot};
pub use upload::{server_error_message, DetectionInterval, JobId, UploadAck, UploadConfig};

/// Paths exposed by the two backends, relative to their base URLs.
pub mod endpoints {
    pub const UPLOAD_VIDEO: &str = "/upload_video";
    pub const MONITORING_PROGRESS: &str = "/api/monitoring/progress";
    pub const MONITORING_DETECTIONS: &str = "/api/monitoring/detections";
    pub const CHAT: &str = "/chat";
}

/// Multipart field names.
pub mod fields {
    pub const VIDEO: &str = "video";
    pub const DETECTION_INTERVAL: &str = "detectionInterval";
    pub const ENABLE_TREE_DETECTION: &str = "enableTreeDetection";
    pub const MESSAGE: &str = "message";
    pub const IMAGE: &str = "image";
}
