//! Speech synthesis service
//!
//! The service turns text into MP3 audio plus a per-character alignment.
//! Transport lives in [`ElevenLabsClient`]; decoding the body into audio and
//! word timings is a pure step so it can be exercised without a network.

mod client;

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;

use crate::alignment::segment;
use crate::error::{ReadalongError, Result};
use crate::types::{AudioWithTimestampsResponse, SynthesizedSpeech, Voice};

pub use client::{ElevenLabsClient, DEFAULT_BASE_URL, MODEL_ID, OUTPUT_FORMAT};

pub trait SpeechSynthesizer {
    /// Saved voices for the account, sorted by name.
    fn voices(&self, api_key: &str) -> Result<Vec<Voice>>;
    fn synthesize(&self, api_key: &str, voice_id: &str, text: &str) -> Result<SynthesizedSpeech>;
}

/// Decode a speech response into audio bytes and word timings.
pub fn decode_speech(response: &AudioWithTimestampsResponse) -> Result<SynthesizedSpeech> {
    let audio = BASE64_STANDARD
        .decode(response.audio_base64.trim())
        .map_err(|err| ReadalongError::Payload(err.to_string()))?;
    let word_timings = segment(&response.alignment)?;
    Ok(SynthesizedSpeech {
        audio,
        word_timings,
    })
}

/// Sort voices by name, ignoring case first.
pub fn sort_voices(voices: &mut [Voice]) {
    voices.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name))
    });
}
