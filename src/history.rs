//! Generated recordings and the word timings that go with them

use chrono::{Local, TimeZone};
use serde::{Deserialize, Serialize};

use crate::types::WordTiming;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub text: String,
    pub voice_name: String,
    pub voice_id: String,
    /// Unix milliseconds of the last (re)generation.
    pub date: i64,
    /// Stored audio path relative to the data directory.
    pub file_name: String,
    pub word_timings: Vec<WordTiming>,
}

impl HistoryEntry {
    /// First `max_chars` characters of the text, with `...` when cut.
    pub fn preview(&self, max_chars: usize) -> String {
        let mut chars = self.text.chars();
        let head: String = chars.by_ref().take(max_chars).collect();
        if chars.next().is_some() {
            format!("{head}...")
        } else {
            head
        }
    }

    /// `dd/mm/yyyy HH:MM` in local time.
    pub fn formatted_date(&self) -> String {
        match Local.timestamp_millis_opt(self.date).single() {
            Some(when) => when.format("%d/%m/%Y %H:%M").to_string(),
            None => String::from("--/--/---- --:--"),
        }
    }
}

/// Audio and timings produced by a regeneration.
#[derive(Debug, Clone)]
pub struct Regenerated {
    pub voice_id: String,
    pub voice_name: String,
    pub date: i64,
    pub file_name: String,
    pub word_timings: Vec<WordTiming>,
}

impl From<HistoryEntry> for Regenerated {
    fn from(entry: HistoryEntry) -> Self {
        Self {
            voice_id: entry.voice_id,
            voice_name: entry.voice_name,
            date: entry.date,
            file_name: entry.file_name,
            word_timings: entry.word_timings,
        }
    }
}

/// Ordered list of entries, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&HistoryEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    /// Swap in new audio for an entry, keeping its id, text and position.
    /// Returns the replaced entry's previous state.
    pub fn replace(&mut self, id: &str, update: Regenerated) -> Option<HistoryEntry> {
        let entry = self.entries.iter_mut().find(|entry| entry.id == id)?;
        let previous = entry.clone();
        entry.voice_id = update.voice_id;
        entry.voice_name = update.voice_name;
        entry.date = update.date;
        entry.file_name = update.file_name;
        entry.word_timings = update.word_timings;
        Some(previous)
    }

    pub fn remove(&mut self, id: &str) -> Option<HistoryEntry> {
        let position = self.entries.iter().position(|entry| entry.id == id)?;
        Some(self.entries.remove(position))
    }

    pub fn clear(&mut self) -> Vec<HistoryEntry> {
        std::mem::take(&mut self.entries)
    }

    pub fn recent_first(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter().rev()
    }

    /// `tts-{millis}`, bumped until no entry uses it.
    pub fn unique_stamp(&self, millis: i64) -> i64 {
        let mut stamp = millis;
        while self.contains(&entry_id(stamp)) {
            stamp += 1;
        }
        stamp
    }
}

pub fn entry_id(stamp: i64) -> String {
    format!("tts-{stamp}")
}

pub fn audio_file_name(stamp: i64) -> String {
    format!("tts-{stamp}.mp3")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, text: &str) -> HistoryEntry {
        HistoryEntry {
            id: id.to_string(),
            text: text.to_string(),
            voice_name: "Rachel".to_string(),
            voice_id: "v1".to_string(),
            date: 1_700_000_000_000,
            file_name: format!("output/{id}.mp3"),
            word_timings: Vec::new(),
        }
    }

    #[test]
    fn preview_truncates_by_characters() {
        let long = entry("a", &"é".repeat(90));
        let preview = long.preview(80);
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), 83);
        assert_eq!(entry("b", "short").preview(80), "short");
        assert_eq!(entry("c", &"x".repeat(50)).preview(50), "x".repeat(50));
    }

    #[test]
    fn replace_keeps_identity_and_position() {
        let mut history = History::new();
        history.push(entry("tts-1", "first"));
        history.push(entry("tts-2", "second"));

        let previous = history
            .replace(
                "tts-1",
                Regenerated {
                    voice_id: "v2".to_string(),
                    voice_name: "Adam".to_string(),
                    date: 5,
                    file_name: "output/tts-5.mp3".to_string(),
                    word_timings: Vec::new(),
                },
            )
            .unwrap();

        assert_eq!(previous.file_name, "output/tts-1.mp3");
        let updated = &history.entries()[0];
        assert_eq!(updated.id, "tts-1");
        assert_eq!(updated.text, "first");
        assert_eq!(updated.voice_name, "Adam");
        assert_eq!(updated.file_name, "output/tts-5.mp3");
        assert_eq!(history.entries()[1].id, "tts-2");
    }

    #[test]
    fn replace_unknown_id_is_none() {
        let mut history = History::new();
        let update = Regenerated {
            voice_id: "v2".to_string(),
            voice_name: "Adam".to_string(),
            date: 5,
            file_name: "output/tts-5.mp3".to_string(),
            word_timings: Vec::new(),
        };
        assert!(history.replace("missing", update).is_none());
    }

    #[test]
    fn replacing_with_previous_state_restores_entry() {
        let mut history = History::new();
        let original = entry("tts-1", "first");
        history.push(original.clone());
        let previous = history
            .replace(
                "tts-1",
                Regenerated {
                    voice_id: "v2".to_string(),
                    voice_name: "Adam".to_string(),
                    date: 5,
                    file_name: "output/tts-5.mp3".to_string(),
                    word_timings: Vec::new(),
                },
            )
            .unwrap();

        history.replace("tts-1", Regenerated::from(previous));
        assert_eq!(history.get("tts-1"), Some(&original));
    }

    #[test]
    fn remove_and_clear() {
        let mut history = History::new();
        history.push(entry("tts-1", "first"));
        history.push(entry("tts-2", "second"));

        assert_eq!(history.remove("tts-1").unwrap().text, "first");
        assert!(history.remove("tts-1").is_none());
        assert_eq!(history.clear().len(), 1);
        assert!(history.is_empty());
    }

    #[test]
    fn recent_first_reverses_order() {
        let mut history = History::new();
        history.push(entry("tts-1", "first"));
        history.push(entry("tts-2", "second"));
        let ids: Vec<&str> = history.recent_first().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["tts-2", "tts-1"]);
    }

    #[test]
    fn unique_stamp_skips_taken_ids() {
        let mut history = History::new();
        history.push(entry("tts-10", "a"));
        history.push(entry("tts-11", "b"));
        assert_eq!(history.unique_stamp(10), 12);
        assert_eq!(history.unique_stamp(20), 20);
    }

    #[test]
    fn formatted_date_has_expected_shape() {
        let formatted = entry("a", "x").formatted_date();
        assert_eq!(formatted.len(), 16);
        assert_eq!(&formatted[2..3], "/");
        assert_eq!(&formatted[13..14], ":");
    }

    #[test]
    fn serializes_as_plain_list() {
        let mut history = History::new();
        history.push(entry("tts-1", "first"));
        let value = serde_json::to_value(&history).unwrap();
        assert!(value.is_array());
        assert_eq!(value[0]["voiceName"], "Rachel");
        assert_eq!(value[0]["fileName"], "output/tts-1.mp3");
    }
}
