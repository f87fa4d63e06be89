//! Persisted user settings and history

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::history::{History, HistoryEntry};
use crate::types::Voice;

pub const DEFAULT_OUTPUT_FOLDER: &str = "output";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub api_key: String,
    pub selected_voice_id: String,
    pub selected_voice_name: String,
    pub output_folder: String,
    #[serde(deserialize_with = "history_or_empty")]
    pub history: History,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            selected_voice_id: String::new(),
            selected_voice_name: String::new(),
            output_folder: DEFAULT_OUTPUT_FOLDER.to_string(),
            history: History::new(),
        }
    }
}

impl Settings {
    pub fn set_api_key(&mut self, key: &str) {
        self.api_key = key.trim().to_string();
    }

    pub fn set_output_folder(&mut self, folder: &str) {
        let folder = folder.trim();
        self.output_folder = if folder.is_empty() {
            DEFAULT_OUTPUT_FOLDER.to_string()
        } else {
            folder.to_string()
        };
    }

    /// Select a voice by id, taking its display name from `voices`.
    pub fn select_voice(&mut self, voice_id: &str, voices: &[Voice]) {
        self.selected_voice_id = voice_id.to_string();
        self.selected_voice_name = voices
            .iter()
            .find(|voice| voice.voice_id == voice_id)
            .map(|voice| voice.name.clone())
            .unwrap_or_default();
    }

    pub fn selected_voice(&self) -> Option<Voice> {
        if self.selected_voice_id.is_empty() {
            return None;
        }
        Some(Voice::new(
            self.selected_voice_id.clone(),
            self.selected_voice_name.clone(),
        ))
    }
}

/// A history value that is missing, null, or not a list loads as empty.
fn history_or_empty<'de, D>(deserializer: D) -> std::result::Result<History, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    if !value.is_array() {
        return Ok(History::new());
    }
    let entries: Vec<HistoryEntry> =
        serde_json::from_value(value).map_err(serde::de::Error::custom)?;
    let mut history = History::new();
    for entry in entries {
        history.push(entry);
    }
    Ok(history)
}

/// Where settings live between runs.
pub trait SettingsStore {
    fn load(&self) -> Result<Settings>;
    fn save(&mut self, settings: &Settings) -> Result<()>;
}

/// Settings kept as a pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonSettingsStore {
    path: PathBuf,
}

impl JsonSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for JsonSettingsStore {
    fn load(&self) -> Result<Settings> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no settings file yet; using defaults");
            return Ok(Settings::default());
        }
        let raw = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn save(&mut self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}
