use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// One classified frame as returned by `GET /api/monitoring/detections`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Detection {
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub fruit_type: Option<String>,
    #[serde(default)]
    pub confidence_fruit: Option<f64>,
    #[serde(default)]
    pub ripeness: Option<String>,
    #[serde(default)]
    pub confidence_ripeness: Option<f64>,
    #[serde(default)]
    pub disease: Option<String>,
    #[serde(default)]
    pub confidence_disease: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Detection {
    /// Accepts RFC 3339 as well as the naive `T`- or space-separated forms, naive ones read as UTC.
    pub fn parsed_timestamp(&self) -> Option<DateTime<Utc>> {
        let raw = self.timestamp.trim();
        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Some(parsed.with_timezone(&Utc));
        }
        NAIVE_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
            .map(|naive| Utc.from_utc_datetime(&naive))
    }

    pub fn time_label(&self) -> String {
        match self.parsed_timestamp() {
            Some(timestamp) => timestamp.format("%I:%M:%S %p").to_string(),
            None => self.timestamp.clone(),
        }
    }

    pub fn fruit_label(&self) -> String {
        label_with_confidence(self.fruit_type.as_deref(), self.confidence_fruit)
    }

    pub fn ripeness_label(&self) -> String {
        label_with_confidence(self.ripeness.as_deref(), self.confidence_ripeness)
    }

    pub fn disease_label(&self) -> String {
        label_with_confidence(self.disease.as_deref(), self.confidence_disease)
    }

    pub fn notes_label(&self) -> String {
        known(self.notes.as_deref()).unwrap_or_default().to_string()
    }
}

/// Newest first. Entries with an unreadable timestamp go last, in their original order.
pub fn sort_newest_first(detections: &mut [Detection]) {
    detections.sort_by_cached_key(|detection| Reverse(detection.parsed_timestamp()));
}

fn known(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("unknown"))
}

fn label_with_confidence(value: Option<&str>, confidence: Option<f64>) -> String {
    let mut label = known(value).unwrap_or("N/A").to_string();
    if let Some(confidence) = confidence {
        label.push_str(&format!(" ({:.2}%)", confidence * 100.0));
    }
    label
}
