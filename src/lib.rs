//! Word-level read-along highlighting for synthesized speech.
//!
//! Character timings from the speech service are grouped into words
//! ([`alignment::segment`]), and a frame-driven [`playback::Player`] samples
//! the audio position to decide which word is being spoken
//! ([`highlight::active_word_index`]).

pub mod alignment;
pub mod audio;
pub mod cli;
pub mod config;
pub mod error;
pub mod highlight;
pub mod history;
pub mod narrator;
pub mod playback;
pub mod settings;
pub mod storage;
pub mod synthesis;
pub mod terminal;
pub mod types;

pub use error::{ReadalongError, Result};
