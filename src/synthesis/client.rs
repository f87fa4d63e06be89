use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{decode_speech, sort_voices, SpeechSynthesizer};
use crate::error::{ReadalongError, Result};
use crate::types::{AudioWithTimestampsResponse, SynthesizedSpeech, Voice};

pub const DEFAULT_BASE_URL: &str = "https://api.elevenlabs.io";
pub const MODEL_ID: &str = "eleven_multilingual_v2";
pub const OUTPUT_FORMAT: &str = "mp3_44100_128";
const API_KEY_HEADER: &str = "xi-api-key";
const VOICE_PAGE_SIZE: &str = "100";

#[derive(Debug, Deserialize)]
struct VoicePage {
    voices: Vec<Voice>,
    #[serde(default)]
    has_more: bool,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    text: &'a str,
    model_id: &'a str,
}

/// Blocking HTTP client for the ElevenLabs API.
#[derive(Debug, Clone)]
pub struct ElevenLabsClient {
    http: Client,
    base_url: String,
}

impl ElevenLabsClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn voices_url(&self) -> String {
        format!("{}/v2/voices", self.base_url)
    }

    fn speech_url(&self, voice_id: &str) -> String {
        format!(
            "{}/v1/text-to-speech/{}/with-timestamps",
            self.base_url, voice_id
        )
    }
}

impl Default for ElevenLabsClient {
    fn default() -> Self {
        Self::new()
    }
}

fn ensure_ok(status: StatusCode) -> Result<()> {
    if status == StatusCode::OK {
        Ok(())
    } else {
        Err(ReadalongError::Api {
            status: status.as_u16(),
        })
    }
}

impl SpeechSynthesizer for ElevenLabsClient {
    fn voices(&self, api_key: &str) -> Result<Vec<Voice>> {
        let mut voices = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut query = vec![
                ("voice_type", "saved"),
                ("page_size", VOICE_PAGE_SIZE),
                ("include_total_count", "false"),
            ];
            if let Some(token) = page_token.as_deref() {
                query.push(("next_page_token", token));
            }
            let response = self
                .http
                .get(self.voices_url())
                .header(API_KEY_HEADER, api_key)
                .query(&query)
                .send()?;
            ensure_ok(response.status())?;
            let page: VoicePage = response.json()?;
            debug!(count = page.voices.len(), has_more = page.has_more, "fetched voice page");
            voices.extend(page.voices);

            match page.next_page_token {
                Some(token) if page.has_more => page_token = Some(token),
                _ => break,
            }
        }
        sort_voices(&mut voices);
        Ok(voices)
    }

    fn synthesize(&self, api_key: &str, voice_id: &str, text: &str) -> Result<SynthesizedSpeech> {
        info!(voice = voice_id, chars = text.chars().count(), "requesting speech");
        let response = self
            .http
            .post(self.speech_url(voice_id))
            .header(API_KEY_HEADER, api_key)
            .query(&[("output_format", OUTPUT_FORMAT)])
            .json(&SpeechRequest {
                text,
                model_id: MODEL_ID,
            })
            .send()?;
        ensure_ok(response.status())?;
        let body: AudioWithTimestampsResponse = response.json()?;
        decode_speech(&body)
    }
}
