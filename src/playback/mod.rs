//! Playback session driving the highlight tracker
//!
//! Audio position is sampled, never pushed: the host presents frames, and on
//! every frame the player reads the clock once and asks the tracker for the
//! active word. Everything runs on the host's thread.

pub mod frames;
pub mod player;

use crate::error::Result;

pub use frames::{FrameHandle, FrameQueue, FrameScheduler};
pub use player::{PlaybackState, Player, PlayerEvent};

/// The audio resource of one loaded recording.
pub trait PlaybackClock {
    /// Playback position in seconds at the instant of the call.
    fn current_time(&self) -> f64;
    fn seek(&mut self, seconds: f64) -> Result<()>;
    fn resume(&mut self) -> Result<()>;
    fn pause(&mut self);
    fn has_ended(&self) -> bool;
}

/// Opens a playback clock from encoded audio bytes.
pub trait AudioBackend {
    type Clock: PlaybackClock;

    fn open(&self, audio: Vec<u8>) -> Result<Self::Clock>;
}

/// Clock advanced by hand. Drives tests and offline simulations.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    position: f64,
    duration: Option<f64>,
    playing: bool,
}

impl ManualClock {
    pub fn new(duration: Option<f64>) -> Self {
        Self {
            position: 0.0,
            duration,
            playing: false,
        }
    }

    /// Move the position forward if playing.
    pub fn advance(&mut self, seconds: f64) {
        if self.playing {
            self.position += seconds;
            if let Some(duration) = self.duration {
                if self.position >= duration {
                    self.position = duration;
                    self.playing = false;
                }
            }
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }
}

impl PlaybackClock for ManualClock {
    fn current_time(&self) -> f64 {
        self.position
    }

    fn seek(&mut self, seconds: f64) -> Result<()> {
        let upper = self.duration.unwrap_or(f64::INFINITY);
        self.position = seconds.clamp(0.0, upper);
        Ok(())
    }

    fn resume(&mut self) -> Result<()> {
        if self.has_ended() {
            self.position = 0.0;
        }
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn has_ended(&self) -> bool {
        self.duration
            .is_some_and(|duration| self.position >= duration)
    }
}

/// Backend producing [`ManualClock`]s of a fixed duration.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualBackend {
    pub duration: Option<f64>,
}

impl AudioBackend for ManualBackend {
    type Clock = ManualClock;

    fn open(&self, _audio: Vec<u8>) -> Result<ManualClock> {
        Ok(ManualClock::new(self.duration))
    }
}
