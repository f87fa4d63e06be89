//! Plain terminal rendering of the highlighted text

use crate::highlight::layout::TextRun;

const REVERSE: &str = "\x1b[7m";
const RESET: &str = "\x1b[0m";

/// The text on a single line with the active word shown in reverse video.
pub fn highlight_line(runs: &[TextRun], active: Option<usize>) -> String {
    let mut line = String::new();
    for run in runs {
        match run {
            TextRun::Word { index, text } if Some(*index) == active => {
                line.push_str(REVERSE);
                line.push_str(text);
                line.push_str(RESET);
            }
            TextRun::Word { text, .. } => line.push_str(text),
            TextRun::Gap(text) => {
                for ch in text.chars() {
                    line.push(if ch == '\n' || ch == '\r' || ch == '\t' { ' ' } else { ch });
                }
            }
        }
    }
    line
}

/// Short status for the word in focus, e.g. `[ 3/12] brown`.
pub fn word_status(runs: &[TextRun], active: Option<usize>, total: usize) -> String {
    let word = active.and_then(|active| {
        runs.iter().find_map(|run| match run {
            TextRun::Word { index, text } if *index == active => Some(text.as_str()),
            _ => None,
        })
    });
    match (active, word) {
        (Some(index), Some(word)) => {
            let width = total.to_string().len();
            format!("[{:>width$}/{}] {}", index + 1, total, word)
        }
        _ => String::from("[ -- ]"),
    }
}
