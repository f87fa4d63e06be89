//! Core types shared by the alignment, playback and history layers

use serde::{Deserialize, Serialize};

/// Per-character timing returned by the speech service.
///
/// The three sequences are parallel: entry `i` of each describes the same
/// character. Times are in seconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CharacterAlignment {
    pub characters: Vec<String>,
    #[serde(rename = "character_start_times_seconds")]
    pub start_times: Vec<f64>,
    #[serde(rename = "character_end_times_seconds")]
    pub end_times: Vec<f64>,
}

impl CharacterAlignment {
    pub fn new(characters: Vec<String>, start_times: Vec<f64>, end_times: Vec<f64>) -> Self {
        Self {
            characters,
            start_times,
            end_times,
        }
    }

    /// Build an alignment from a string, giving each character the same
    /// fixed duration. Mostly useful for fixtures.
    pub fn uniform(text: &str, seconds_per_char: f64) -> Self {
        let characters: Vec<String> = text.chars().map(String::from).collect();
        let start_times = (0..characters.len())
            .map(|i| i as f64 * seconds_per_char)
            .collect();
        let end_times = (0..characters.len())
            .map(|i| (i + 1) as f64 * seconds_per_char)
            .collect();
        Self {
            characters,
            start_times,
            end_times,
        }
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }
}

/// One spoken word and where it sits in the source text.
///
/// `start_index..end_index` is a half-open range of character offsets into
/// the original character sequence, whitespace included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordTiming {
    pub word: String,
    pub start_time: f64, // seconds
    pub end_time: f64,   // seconds
    pub start_index: usize,
    pub end_index: usize,
}

impl WordTiming {
    /// True when `time` falls inside `[start_time, end_time)`.
    pub fn contains(&self, time: f64) -> bool {
        time >= self.start_time && time < self.end_time
    }

    pub fn char_len(&self) -> usize {
        self.end_index - self.start_index
    }
}

/// A voice offered by the speech service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    pub voice_id: String,
    pub name: String,
}

impl Voice {
    pub fn new(voice_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            voice_id: voice_id.into(),
            name: name.into(),
        }
    }
}

/// Raw body of a speech-with-timestamps response.
#[derive(Debug, Clone, Deserialize)]
pub struct AudioWithTimestampsResponse {
    pub audio_base64: String,
    pub alignment: CharacterAlignment,
    #[serde(default)]
    pub normalized_alignment: Option<CharacterAlignment>,
}

/// Decoded audio plus the word timings derived from its alignment.
#[derive(Debug, Clone)]
pub struct SynthesizedSpeech {
    pub audio: Vec<u8>,
    pub word_timings: Vec<WordTiming>,
}
