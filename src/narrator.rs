//! Generation workflow: synthesize, store, record in history, then play
//!
//! Settings and history are handed in by the caller on every call and
//! persisted only through the caller's [`SettingsStore`]. Nothing here
//! touches the loaded session until the new recording is ready to install,
//! so a failed request leaves the current playback as it was.

use chrono::Utc;
use tracing::{info, warn};

use crate::error::{ReadalongError, Result};
use crate::history::{audio_file_name, entry_id, HistoryEntry, Regenerated};
use crate::playback::{AudioBackend, FrameScheduler, Player};
use crate::settings::{Settings, SettingsStore};
use crate::storage::AudioStore;
use crate::synthesis::SpeechSynthesizer;
use crate::types::Voice;

pub struct Narrator<B: AudioBackend, S: FrameScheduler> {
    synthesizer: Box<dyn SpeechSynthesizer>,
    audio_store: Box<dyn AudioStore>,
    settings_store: Box<dyn SettingsStore>,
    backend: B,
    player: Player<B::Clock, S>,
}

impl<B: AudioBackend, S: FrameScheduler> Narrator<B, S> {
    pub fn new(
        synthesizer: Box<dyn SpeechSynthesizer>,
        audio_store: Box<dyn AudioStore>,
        settings_store: Box<dyn SettingsStore>,
        backend: B,
        scheduler: S,
    ) -> Self {
        Self {
            synthesizer,
            audio_store,
            settings_store,
            backend,
            player: Player::new(scheduler),
        }
    }

    pub fn player(&self) -> &Player<B::Clock, S> {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player<B::Clock, S> {
        &mut self.player
    }

    pub fn voices(&self, settings: &Settings) -> Result<Vec<Voice>> {
        require_api_key(settings)?;
        self.synthesizer.voices(&settings.api_key)
    }

    /// Speak `text` with the selected voice and start playing it.
    /// Returns the new history entry id.
    pub fn generate(&mut self, settings: &mut Settings, text: &str) -> Result<String> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ReadalongError::EmptyText);
        }
        require_api_key(settings)?;
        let voice = settings
            .selected_voice()
            .ok_or(ReadalongError::NoVoiceSelected)?;

        let speech = self
            .synthesizer
            .synthesize(&settings.api_key, &voice.voice_id, text)?;

        let stamp = settings.history.unique_stamp(Utc::now().timestamp_millis());
        let file_name = self.audio_store.save(
            &settings.output_folder,
            &audio_file_name(stamp),
            &speech.audio,
        )?;
        let entry = HistoryEntry {
            id: entry_id(stamp),
            text: text.to_string(),
            voice_name: voice.name,
            voice_id: voice.voice_id,
            date: stamp,
            file_name,
            word_timings: speech.word_timings,
        };
        let id = entry.id.clone();
        info!(entry = %id, words = entry.word_timings.len(), "speech generated");
        settings.history.push(entry);
        self.settings_store.save(settings)?;

        self.load_and_play(settings, &id, speech.audio)?;
        Ok(id)
    }

    /// Re-speak an entry's text with another voice, replacing its audio.
    pub fn regenerate(&mut self, settings: &mut Settings, id: &str, voice: &Voice) -> Result<()> {
        require_api_key(settings)?;
        let text = settings
            .history
            .get(id)
            .map(|entry| entry.text.clone())
            .ok_or_else(|| ReadalongError::EntryNotFound(id.to_string()))?;

        let speech = self
            .synthesizer
            .synthesize(&settings.api_key, &voice.voice_id, &text)?;

        let stamp = settings.history.unique_stamp(Utc::now().timestamp_millis());
        let file_name = self.audio_store.save(
            &settings.output_folder,
            &audio_file_name(stamp),
            &speech.audio,
        )?;
        let previous = settings
            .history
            .replace(
                id,
                Regenerated {
                    voice_id: voice.voice_id.clone(),
                    voice_name: voice.name.clone(),
                    date: stamp,
                    file_name: file_name.clone(),
                    word_timings: speech.word_timings,
                },
            )
            .ok_or_else(|| ReadalongError::EntryNotFound(id.to_string()))?;

        if let Err(err) = self.settings_store.save(settings) {
            // The stored entry still points at the old audio.
            settings.history.replace(id, Regenerated::from(previous));
            self.remove_audio(&file_name);
            return Err(err);
        }
        self.remove_audio(&previous.file_name);
        info!(entry = id, voice = %voice.name, "speech regenerated");

        self.load_and_play(settings, id, speech.audio)
    }

    /// Load a stored entry and play it from the start.
    pub fn replay(&mut self, settings: &Settings, id: &str) -> Result<()> {
        let entry = settings
            .history
            .get(id)
            .ok_or_else(|| ReadalongError::EntryNotFound(id.to_string()))?;
        let audio = self.audio_store.load(&entry.file_name)?;
        self.load_and_play(settings, id, audio)
    }

    /// Forget an entry and its audio. Stops playback if it is the one loaded.
    pub fn delete(&mut self, settings: &mut Settings, id: &str) -> Result<HistoryEntry> {
        if !settings.history.contains(id) {
            return Err(ReadalongError::EntryNotFound(id.to_string()));
        }
        if self.player.entry_id() == Some(id) {
            self.player.teardown();
        }
        let entry = settings
            .history
            .remove(id)
            .ok_or_else(|| ReadalongError::EntryNotFound(id.to_string()))?;
        self.remove_audio(&entry.file_name);
        self.settings_store.save(settings)?;
        info!(entry = id, "history entry deleted");
        Ok(entry)
    }

    /// Drop every entry and its audio. Returns how many were removed.
    pub fn clear_history(&mut self, settings: &mut Settings) -> Result<usize> {
        if settings.history.is_empty() {
            return Ok(0);
        }
        self.player.teardown();
        let removed = settings.history.clear();
        for entry in &removed {
            self.remove_audio(&entry.file_name);
        }
        self.settings_store.save(settings)?;
        info!(count = removed.len(), "history cleared");
        Ok(removed.len())
    }

    fn load_and_play(&mut self, settings: &Settings, id: &str, audio: Vec<u8>) -> Result<()> {
        let entry = settings
            .history
            .get(id)
            .ok_or_else(|| ReadalongError::EntryNotFound(id.to_string()))?;
        let clock = self.backend.open(audio)?;
        self.player.install(
            entry.id.clone(),
            entry.text.clone(),
            entry.word_timings.clone(),
            clock,
        );
        self.player.play()
    }

    fn remove_audio(&mut self, path: &str) {
        match self.audio_store.remove(path) {
            Ok(true) => {}
            Ok(false) => warn!(path, "audio file already gone"),
            Err(err) => warn!(path, error = %err, "failed to remove audio file"),
        }
    }
}

fn require_api_key(settings: &Settings) -> Result<()> {
    if settings.api_key.is_empty() {
        Err(ReadalongError::MissingApiKey)
    } else {
        Ok(())
    }
}
