use approx::assert_relative_eq;

use super::{is_delimiter, segment};
use crate::error::ReadalongError;
use crate::types::CharacterAlignment;

fn words(alignment: &CharacterAlignment) -> Vec<String> {
    segment(alignment)
        .unwrap()
        .into_iter()
        .map(|timing| timing.word)
        .collect()
}

#[test]
fn test_two_words_keep_original_offsets() {
    let alignment = CharacterAlignment::uniform("hi there", 0.1);
    let timings = segment(&alignment).unwrap();

    assert_eq!(timings.len(), 2);
    assert_eq!(timings[0].word, "hi");
    assert_eq!((timings[0].start_index, timings[0].end_index), (0, 2));
    assert_eq!(timings[1].word, "there");
    assert_eq!((timings[1].start_index, timings[1].end_index), (3, 8));
}

#[test]
fn test_word_times_span_first_to_last_character() {
    let alignment = CharacterAlignment::uniform("hi there", 0.1);
    let timings = segment(&alignment).unwrap();

    assert_relative_eq!(timings[0].start_time, 0.0);
    assert_relative_eq!(timings[0].end_time, 0.2, epsilon = 1e-9);
    assert_relative_eq!(timings[1].start_time, 0.3, epsilon = 1e-9);
    assert_relative_eq!(timings[1].end_time, 0.8, epsilon = 1e-9);
}

#[test]
fn test_empty_and_blank_inputs_produce_nothing() {
    assert!(segment(&CharacterAlignment::default()).unwrap().is_empty());
    assert!(segment(&CharacterAlignment::uniform("   \n\t", 0.1))
        .unwrap()
        .is_empty());
    assert!(segment(&CharacterAlignment::uniform("\r\n", 0.1))
        .unwrap()
        .is_empty());
}

#[test]
fn test_consecutive_delimiters_collapse() {
    let alignment = CharacterAlignment::uniform("  one \n\n two\t\tthree  ", 0.05);
    let timings = segment(&alignment).unwrap();

    assert_eq!(words(&alignment), vec!["one", "two", "three"]);
    assert_eq!((timings[0].start_index, timings[0].end_index), (2, 5));
    assert_eq!((timings[1].start_index, timings[1].end_index), (9, 12));
    assert_eq!((timings[2].start_index, timings[2].end_index), (14, 19));
    assert!(timings.iter().all(|timing| timing.char_len() > 0));
}

#[test]
fn test_punctuation_digits_and_other_scripts_stay_in_words() {
    let alignment = CharacterAlignment::uniform("Hello, world! 42€ Привет", 0.05);
    assert_eq!(words(&alignment), vec!["Hello,", "world!", "42€", "Привет"]);
}

#[test]
fn test_trailing_word_is_flushed() {
    let alignment = CharacterAlignment::uniform("last", 0.1);
    let timings = segment(&alignment).unwrap();

    assert_eq!(timings.len(), 1);
    assert_eq!(timings[0].end_index, 4);
    assert_relative_eq!(timings[0].end_time, 0.4, epsilon = 1e-9);
}

#[test]
fn test_end_time_ignores_delimiter_timing() {
    let alignment = CharacterAlignment::new(
        vec!["a".into(), "b".into(), " ".into(), "c".into()],
        vec![0.0, 0.1, 0.2, 0.9],
        vec![0.1, 0.15, 0.9, 1.0],
    );
    let timings = segment(&alignment).unwrap();

    assert_relative_eq!(timings[0].end_time, 0.15);
    assert_relative_eq!(timings[1].start_time, 0.9);
}

#[test]
fn test_ranges_are_ordered_disjoint_and_cover_only_non_delimiters() {
    let text = "  The quick\tbrown\n\nfox, jumps  over the lazy dog.\r\n";
    let alignment = CharacterAlignment::uniform(text, 0.04);
    let timings = segment(&alignment).unwrap();

    let mut covered = vec![false; alignment.len()];
    let mut previous_end = 0;
    for timing in &timings {
        assert!(timing.start_index >= previous_end);
        assert!(timing.start_index < timing.end_index);
        for slot in &mut covered[timing.start_index..timing.end_index] {
            assert!(!*slot);
            *slot = true;
        }
        let rebuilt: String = alignment.characters[timing.start_index..timing.end_index].concat();
        assert_eq!(rebuilt, timing.word);
        previous_end = timing.end_index;
    }
    for (offset, character) in alignment.characters.iter().enumerate() {
        assert_eq!(covered[offset], !is_delimiter(character), "offset {offset}");
    }
}

#[test]
fn test_segment_is_deterministic() {
    let alignment = CharacterAlignment::uniform("same input twice", 0.07);
    assert_eq!(segment(&alignment).unwrap(), segment(&alignment).unwrap());
}

#[test]
fn test_mismatched_lengths_fail_fast() {
    let alignment = CharacterAlignment::new(
        vec!["a".into(), "b".into()],
        vec![0.0, 0.1],
        vec![0.1],
    );
    match segment(&alignment) {
        Err(ReadalongError::AlignmentMismatch {
            characters,
            start_times,
            end_times,
        }) => assert_eq!((characters, start_times, end_times), (2, 2, 1)),
        other => panic!("expected mismatch error, got {other:?}"),
    }
}
