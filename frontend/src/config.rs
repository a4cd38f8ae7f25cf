use gloo_storage::{LocalStorage, Storage};
use session::MonitorOptions;
use std::str::FromStr;

const DEFAULT_MONITOR_API_URL: &str = "http://localhost:5002";
const DEFAULT_CHAT_API_URL: &str = "http://localhost:5000";

/// Where the backends live and how the dashboard polls them.
///
/// Defaults are baked in at build time (`MONITOR_API_URL`, `CHAT_API_URL`)
/// and can be overridden per browser through local storage.
#[derive(Debug, Clone, PartialEq)]
pub struct FrontendConfig {
    pub monitor_api_url: String,
    pub chat_api_url: String,
    pub detections_limit: Option<u32>,
    pub stop_detections_on_finish: bool,
    pub log_level: log::Level,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            monitor_api_url: option_env!("MONITOR_API_URL")
                .unwrap_or(DEFAULT_MONITOR_API_URL)
                .to_string(),
            chat_api_url: option_env!("CHAT_API_URL")
                .unwrap_or(DEFAULT_CHAT_API_URL)
                .to_string(),
            detections_limit: None,
            stop_detections_on_finish: true,
            log_level: log::Level::Info,
        }
    }
}

impl FrontendConfig {
    pub fn load() -> Self {
        let mut config = Self::default();
        config.apply_overrides(|key| LocalStorage::get::<String>(key).ok());
        config
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("monitor_api_url") {
            self.monitor_api_url = url;
        }
        if let Some(url) = lookup("chat_api_url") {
            self.chat_api_url = url;
        }
        if let Some(limit) = lookup("detections_limit") {
            self.detections_limit = limit.parse().ok().filter(|limit| *limit > 0);
        }
        if let Some(flag) = lookup("stop_detections_on_finish") {
            self.stop_detections_on_finish = flag != "false";
        }
        if let Some(level) = lookup("log_level").and_then(|l| log::Level::from_str(&l).ok()) {
            self.log_level = level;
        }
        self.monitor_api_url = self.monitor_api_url.trim_end_matches('/').to_string();
        self.chat_api_url = self.chat_api_url.trim_end_matches('/').to_string();
    }

    pub fn monitor_options(&self, show_detections: bool) -> MonitorOptions {
        MonitorOptions {
            poll_detections: show_detections,
            stop_detections_on_finish: self.stop_detections_on_finish,
            ..MonitorOptions::default()
        }
    }
}
