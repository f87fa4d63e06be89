use crate::types::WordTiming;

pub(super) struct WordAccumulator {
    words: Vec<WordTiming>,
    current: String,
    start_time: f64,
    end_time: f64,
    start_index: usize,
}

impl WordAccumulator {
    pub(super) fn new() -> Self {
        Self {
            words: Vec::new(),
            current: String::new(),
            start_time: 0.0,
            end_time: 0.0,
            start_index: 0,
        }
    }

    pub(super) fn push_char(&mut self, character: &str, offset: usize, start: f64, end: f64) {
        if self.current.is_empty() {
            self.start_time = start;
            self.start_index = offset;
        }
        self.current.push_str(character);
        self.end_time = end;
    }

    /// Close the word in progress, if any. `offset` is the exclusive end.
    pub(super) fn finish_word(&mut self, offset: usize) {
        if self.current.is_empty() {
            return;
        }
        self.words.push(WordTiming {
            word: std::mem::take(&mut self.current),
            start_time: self.start_time,
            end_time: self.end_time,
            start_index: self.start_index,
            end_index: offset,
        });
    }

    pub(super) fn into_words(self) -> Vec<WordTiming> {
        self.words
    }
}
