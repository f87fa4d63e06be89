//! Active-word tracking for playback highlighting

pub mod layout;

use crate::types::WordTiming;

/// Resolve which word should be highlighted at `current_time`.
///
/// A word is active while the cursor is inside its `[start, end)` interval.
/// In the silence between two words the earlier word stays active, and once
/// the cursor passes the last word's start it stays on the last word until
/// the end of the audio. Before the first word nothing is active.
pub fn active_word_index(timings: &[WordTiming], current_time: f64) -> Option<usize> {
    if let Some(index) = timings.iter().position(|timing| timing.contains(current_time)) {
        return Some(index);
    }
    match timings
        .iter()
        .position(|timing| current_time < timing.start_time)
    {
        Some(0) => None,
        Some(next) => Some(next - 1),
        None => timings.len().checked_sub(1),
    }
}

/// Outcome of one sampling tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightTick {
    pub active_index: Option<usize>,
    /// Set only when the active word differs from the previous tick.
    pub changed: bool,
}

/// Holds one recording's text and word timings and remembers the word that
/// was active on the previous tick.
#[derive(Debug, Clone, Default)]
pub struct HighlightTracker {
    text: String,
    timings: Vec<WordTiming>,
    active: Option<usize>,
}

impl HighlightTracker {
    pub fn new(text: impl Into<String>, timings: Vec<WordTiming>) -> Self {
        Self {
            text: text.into(),
            timings,
            active: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn timings(&self) -> &[WordTiming] {
        &self.timings
    }

    pub fn word(&self, index: usize) -> Option<&WordTiming> {
        self.timings.get(index)
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn tick(&mut self, current_time: f64) -> HighlightTick {
        let active_index = active_word_index(&self.timings, current_time);
        let changed = active_index != self.active;
        self.active = active_index;
        HighlightTick {
            active_index,
            changed,
        }
    }

    /// Drop the highlight. Returns true when something was highlighted.
    pub fn clear_highlight(&mut self) -> bool {
        self.active.take().is_some()
    }
}
