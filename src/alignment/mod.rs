//! Character alignment to word timing segmentation
//!
//! The speech service reports when every character is spoken. Highlighting
//! works on words, so the characters are grouped into whitespace-delimited
//! tokens while keeping their offsets into the original character sequence.

mod accumulator;

#[cfg(test)]
mod tests;

use crate::error::{ReadalongError, Result};
use crate::types::{CharacterAlignment, WordTiming};

use accumulator::WordAccumulator;

/// Whitespace that separates words. Everything else, punctuation included,
/// belongs to a word.
pub fn is_delimiter(character: &str) -> bool {
    matches!(character, " " | "\n" | "\r" | "\t")
}

/// Pure function turning per-character timings into ordered word timings.
///
/// Fails only when the three alignment sequences differ in length.
pub fn segment(alignment: &CharacterAlignment) -> Result<Vec<WordTiming>> {
    let characters = alignment.characters.len();
    if alignment.start_times.len() != characters || alignment.end_times.len() != characters {
        return Err(ReadalongError::AlignmentMismatch {
            characters,
            start_times: alignment.start_times.len(),
            end_times: alignment.end_times.len(),
        });
    }

    let mut accumulator = WordAccumulator::new();
    let timed = alignment
        .characters
        .iter()
        .zip(&alignment.start_times)
        .zip(&alignment.end_times);
    for (offset, ((character, &start_time), &end_time)) in timed.enumerate() {
        if is_delimiter(character) {
            accumulator.finish_word(offset);
        } else {
            accumulator.push_char(character, offset, start_time, end_time);
        }
    }
    accumulator.finish_word(characters);

    Ok(accumulator.into_words())
}
