use serde::{Deserialize, Serialize};

/// One reading of `GET /api/monitoring/progress`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    #[serde(default)]
    pub processed_frames: u64,
    #[serde(default)]
    pub total_frames: u64,
    #[serde(default)]
    pub is_monitoring_active: bool,
}

impl ProgressSnapshot {
    pub fn new(processed_frames: u64, total_frames: u64, is_monitoring_active: bool) -> Self {
        Self {
            processed_frames,
            total_frames,
            is_monitoring_active,
        }
    }

    /// Zero/inactive reading used in place of a failed poll.
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> ProgressPhase {
        ProgressPhase::of(self)
    }

    /// Processed share of the video in percent, `None` while nothing is loaded.
    pub fn percent(&self) -> Option<f64> {
        if self.total_frames == 0 {
            return None;
        }
        Some(self.processed_frames as f64 / self.total_frames as f64 * 100.0)
    }

    pub fn percent_label(&self) -> String {
        match self.percent() {
            Some(percent) => format!("{:.1}%", percent),
            None => "0%".to_string(),
        }
    }

    /// Bar width in percent. Clamped, since a backend may report more processed than total frames.
    pub fn bar_width(&self) -> f64 {
        self.percent().unwrap_or(0.0).clamp(0.0, 100.0)
    }

    pub fn processed_label(&self) -> String {
        format!("Processed: {} frames", self.processed_frames)
    }

    pub fn total_label(&self) -> String {
        format!("Total: {} frames", self.total_frames)
    }
}

/// Where a monitoring job stands according to a single progress reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressPhase {
    /// `total_frames == 0`: nothing loaded, or the poll failed.
    NoVideo,
    Running,
    /// Backend stopped after processing every frame.
    Finished,
    /// Backend stopped before reaching the last frame.
    Halted,
}

impl ProgressPhase {
    pub fn of(snapshot: &ProgressSnapshot) -> Self {
        if snapshot.total_frames == 0 {
            ProgressPhase::NoVideo
        } else if snapshot.is_monitoring_active {
            ProgressPhase::Running
        } else if snapshot.processed_frames == snapshot.total_frames {
            ProgressPhase::Finished
        } else {
            ProgressPhase::Halted
        }
    }

    /// Whether polling for the job should stop after this reading.
    pub fn is_terminal(self) -> bool {
        matches!(self, ProgressPhase::Finished | ProgressPhase::Halted)
    }

    pub fn status_text(self, video_name: Option<&str>) -> String {
        match self {
            ProgressPhase::NoVideo => "No video loaded / Monitoring Inactive.".to_string(),
            ProgressPhase::Running => {
                format!("Monitoring Active: {}", video_name.unwrap_or("video file"))
            }
            ProgressPhase::Finished => "Monitoring Finished.".to_string(),
            ProgressPhase::Halted => "Monitoring Inactive.".to_string(),
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            ProgressPhase::NoVideo | ProgressPhase::Halted => "progress-idle",
            ProgressPhase::Running => "progress-active",
            ProgressPhase::Finished => "progress-finished",
        }
    }
}
