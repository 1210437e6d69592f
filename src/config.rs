//! Board configuration.
//!
//! Defaults cover everything; a page may override fields with an inline
//! `<script id="board-config" type="application/json">` block.

use serde::{Deserialize, Serialize};

pub const CONFIG_ELEMENT_ID: &str = "board-config";

pub const CONFETTI_COLORS: [&str; 15] = [
    "#f44336", "#e91e63", "#9c27b0", "#673ab7", "#3f51b5", "#2196f3", "#03a9f4", "#00bcd4",
    "#009688", "#4caf50", "#8bc34a", "#ffeb3b", "#ffc107", "#ff9800", "#ff5722",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BoardConfig {
    /// Local storage key holding the whole task map.
    pub storage_key: String,
    /// Discard persisted tasks on the first load of a page session.
    pub reset_on_first_load: bool,
    /// How long the entrance highlight stays on a fresh or completed card.
    pub entrance_ms: u32,
    /// One of `error`, `warn`, `info`, `debug`, `trace`.
    pub log_level: String,
    pub celebration: CelebrationConfig,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            storage_key: "kanbanTasks".to_string(),
            reset_on_first_load: false,
            entrance_ms: 500,
            log_level: "info".to_string(),
            celebration: CelebrationConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CelebrationConfig {
    pub particle_count: usize,
    pub duration_ms: u32,
    /// Added to `duration_ms` for the hard stop that hides the overlay.
    pub safety_margin_ms: u32,
    pub fade_interval_ms: u32,
    pub palette: Vec<String>,
}

impl CelebrationConfig {
    pub fn safety_timeout_ms(&self) -> u32 {
        self.duration_ms + self.safety_margin_ms
    }
}

impl Default for CelebrationConfig {
    fn default() -> Self {
        Self {
            particle_count: 150,
            duration_ms: 3000,
            safety_margin_ms: 1000,
            fade_interval_ms: 50,
            palette: CONFETTI_COLORS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl BoardConfig {
    /// Parses an override document; missing fields keep their defaults.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let mut config: BoardConfig = serde_json::from_str(raw)?;
        if config.celebration.palette.is_empty() {
            config.celebration.palette = CelebrationConfig::default().palette;
        }
        Ok(config)
    }

    /// Reads the inline config block of the current document, falling back
    /// to defaults when it is absent or malformed.
    pub fn from_document() -> Self {
        let raw = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(CONFIG_ELEMENT_ID))
            .and_then(|el| el.text_content());

        match raw {
            Some(raw) if !raw.trim().is_empty() => match Self::from_json(&raw) {
                Ok(config) => config,
                Err(e) => {
                    log::warn!("Ignoring malformed board config: {}", e);
                    Self::default()
                }
            },
            _ => Self::default(),
        }
    }

    pub fn level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}
