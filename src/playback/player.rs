use tracing::{debug, info};

use super::frames::{FrameHandle, FrameScheduler};
use super::PlaybackClock;
use crate::error::{ReadalongError, Result};
use crate::highlight::{HighlightTick, HighlightTracker};
use crate::types::WordTiming;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// Nothing loaded.
    Idle,
    /// Loaded and not sampling. The last highlight is kept.
    Paused,
    /// Sampling once per frame.
    Playing,
    /// Audio ran out; sampling stopped and highlight cleared.
    Ended,
}

/// What a frame produced for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerEvent {
    /// The active word changed; the renderer should restyle and scroll it
    /// into view.
    Highlight { index: Option<usize> },
    Ended,
}

/// One playback session at a time: the loaded recording's clock, its
/// highlight tracker, and the frame loop sampling it.
pub struct Player<C: PlaybackClock, S: FrameScheduler> {
    scheduler: S,
    clock: Option<C>,
    tracker: HighlightTracker,
    entry_id: Option<String>,
    state: PlaybackState,
    pending_frame: Option<FrameHandle>,
}

impl<C: PlaybackClock, S: FrameScheduler> Player<C, S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            clock: None,
            tracker: HighlightTracker::default(),
            entry_id: None,
            state: PlaybackState::Idle,
            pending_frame: None,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// History entry bound to the loaded recording.
    pub fn entry_id(&self) -> Option<&str> {
        self.entry_id.as_deref()
    }

    pub fn tracker(&self) -> &HighlightTracker {
        &self.tracker
    }

    pub fn active_index(&self) -> Option<usize> {
        self.tracker.active_index()
    }

    pub fn clock(&self) -> Option<&C> {
        self.clock.as_ref()
    }

    pub fn clock_mut(&mut self) -> Option<&mut C> {
        self.clock.as_mut()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Replace whatever is loaded with a new recording, paused at its start.
    pub fn install(
        &mut self,
        entry_id: impl Into<String>,
        text: impl Into<String>,
        timings: Vec<WordTiming>,
        clock: C,
    ) {
        self.teardown();
        let entry_id = entry_id.into();
        info!(entry = %entry_id, words = timings.len(), "installing playback session");
        self.tracker = HighlightTracker::new(text, timings);
        self.clock = Some(clock);
        self.entry_id = Some(entry_id);
        self.state = PlaybackState::Paused;
    }

    /// Cancel the pending frame, release the clock and forget the session.
    pub fn teardown(&mut self) {
        self.stop_loop();
        if let Some(mut clock) = self.clock.take() {
            clock.pause();
        }
        if let Some(entry) = self.entry_id.take() {
            debug!(entry = %entry, "playback session torn down");
        }
        self.tracker = HighlightTracker::default();
        self.state = PlaybackState::Idle;
    }

    pub fn play(&mut self) -> Result<()> {
        let clock = self.clock.as_mut().ok_or(ReadalongError::NoRecording)?;
        clock.resume()?;
        self.state = PlaybackState::Playing;
        self.start_loop();
        Ok(())
    }

    pub fn pause(&mut self) {
        if self.state != PlaybackState::Playing {
            return;
        }
        if let Some(clock) = self.clock.as_mut() {
            clock.pause();
        }
        self.stop_loop();
        self.state = PlaybackState::Paused;
    }

    pub fn toggle(&mut self) -> Result<()> {
        if self.is_playing() {
            self.pause();
            Ok(())
        } else {
            self.play()
        }
    }

    /// Rewind to the start and drop the highlight, keeping the recording.
    pub fn stop(&mut self) -> Result<()> {
        let clock = self.clock.as_mut().ok_or(ReadalongError::NoRecording)?;
        clock.pause();
        clock.seek(0.0)?;
        self.stop_loop();
        self.tracker.clear_highlight();
        self.state = PlaybackState::Paused;
        Ok(())
    }

    /// The audio reached its end.
    pub fn on_ended(&mut self) {
        self.stop_loop();
        self.tracker.clear_highlight();
        self.state = PlaybackState::Ended;
        debug!(entry = ?self.entry_id, "playback ended");
    }

    /// Run one frame. Frames other than the one currently scheduled are
    /// stale and ignored.
    pub fn on_frame(&mut self, handle: FrameHandle) -> Option<PlayerEvent> {
        if self.pending_frame != Some(handle) {
            return None;
        }
        self.pending_frame = None;
        if self.state != PlaybackState::Playing {
            return None;
        }
        let (current_time, ended) = {
            let clock = self.clock.as_ref()?;
            (clock.current_time(), clock.has_ended())
        };
        if ended {
            self.on_ended();
            return Some(PlayerEvent::Ended);
        }

        let HighlightTick {
            active_index,
            changed,
        } = self.tracker.tick(current_time);
        self.pending_frame = Some(self.scheduler.request_frame());
        changed.then_some(PlayerEvent::Highlight {
            index: active_index,
        })
    }

    /// Jump to a word's start, resuming playback if it was not running.
    pub fn seek_to_word(&mut self, index: usize) -> Result<()> {
        let start_time = self
            .tracker
            .word(index)
            .map(|word| word.start_time)
            .ok_or(ReadalongError::WordOutOfRange {
                index,
                len: self.tracker.timings().len(),
            })?;
        let clock = self.clock.as_mut().ok_or(ReadalongError::NoRecording)?;
        clock.seek(start_time)?;
        if !self.is_playing() {
            self.play()?;
        }
        Ok(())
    }

    fn start_loop(&mut self) {
        self.stop_loop();
        self.pending_frame = Some(self.scheduler.request_frame());
    }

    fn stop_loop(&mut self) {
        if let Some(handle) = self.pending_frame.take() {
            self.scheduler.cancel_frame(handle);
        }
    }
}
