pub mod labels;

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};

use crate::{
    core::fields::{EntryLayout, LayoutError},
    types::PageMode,
};

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Serde(serde_json::Error),
    Layout(LayoutError),
}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serde(value)
    }
}

impl From<LayoutError> for ConfigError {
    fn from(value: LayoutError) -> Self {
        Self::Layout(value)
    }
}

/// Station runtime settings, loadable from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StationConfig {
    pub base_url: String,
    pub page: PageMode,
    pub layout: EntryLayout,
    pub initial_sequence_label: String,
    pub request_timeout_ms: u64,
    /// `0` disables band polling.
    pub band_poll_interval_ms: u64,
    pub command_queue_bound: usize,
    pub event_buffer: usize,
    pub journal_path: Option<PathBuf>,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:4000".to_string(),
            page: PageMode::Contest,
            layout: EntryLayout::default(),
            initial_sequence_label: "Sequence: 1".to_string(),
            request_timeout_ms: 3000,
            band_poll_interval_ms: 2000,
            command_queue_bound: 256,
            event_buffer: 1024,
            journal_path: None,
        }
    }
}

impl StationConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(raw)?;
        cfg.layout.validate()?;
        Ok(cfg)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn band_poll_interval(&self) -> Option<Duration> {
        (self.band_poll_interval_ms > 0).then(|| Duration::from_millis(self.band_poll_interval_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = StationConfig::from_json_str(r#"{"page":"Log","request_timeout_ms":500}"#)
            .expect("config");
        assert_eq!(cfg.page, PageMode::Log);
        assert_eq!(cfg.request_timeout(), Duration::from_millis(500));
        assert_eq!(cfg.band_poll_interval(), Some(Duration::from_millis(2000)));
        assert_eq!(cfg.layout, EntryLayout::default());
    }

    #[test]
    fn fixed_layout_and_disabled_poller() {
        let cfg = StationConfig::from_json_str(r#"{"layout":"Fixed","band_poll_interval_ms":0}"#)
            .expect("config");
        assert_eq!(cfg.layout, EntryLayout::Fixed);
        assert_eq!(cfg.band_poll_interval(), None);
    }

    #[test]
    fn oversized_layout_is_rejected() {
        let raw = r#"{"layout":{"FreeField":{"labels":["a","b","c","d","e","f"]}}}"#;
        assert!(matches!(
            StationConfig::from_json_str(raw),
            Err(ConfigError::Layout(LayoutError::FieldCount(6)))
        ));
    }
}
