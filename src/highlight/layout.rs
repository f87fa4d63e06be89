use crate::types::WordTiming;

/// A piece of the displayed text: either a highlightable word or the text
/// between words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextRun {
    Word { index: usize, text: String },
    Gap(String),
}

/// Split `text` into words and the gaps around them using the word offsets.
///
/// Offsets are character offsets, clamped to the text length.
pub fn layout_text(text: &str, timings: &[WordTiming]) -> Vec<TextRun> {
    if timings.is_empty() {
        if text.is_empty() {
            return Vec::new();
        }
        return vec![TextRun::Gap(text.to_string())];
    }

    let chars: Vec<char> = text.chars().collect();
    let slice = |start: usize, end: usize| -> String {
        let end = end.min(chars.len());
        let start = start.min(end);
        chars[start..end].iter().collect()
    };

    let mut runs = Vec::with_capacity(timings.len() * 2 + 1);
    let mut last_end = 0;
    for (index, timing) in timings.iter().enumerate() {
        if timing.start_index > last_end {
            let between = slice(last_end, timing.start_index);
            if !between.is_empty() {
                runs.push(TextRun::Gap(between));
            }
        }
        runs.push(TextRun::Word {
            index,
            text: timing.word.clone(),
        });
        last_end = timing.end_index;
    }

    if last_end < chars.len() {
        runs.push(TextRun::Gap(slice(last_end, chars.len())));
    }
    runs
}
