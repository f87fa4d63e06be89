use thiserror::Error;

/// Convenient alias for results returned by readalong modules.
pub type Result<T> = std::result::Result<T, ReadalongError>;

#[derive(Debug, Error)]
pub enum ReadalongError {
    #[error(
        "alignment length mismatch: {characters} characters, {start_times} start times, {end_times} end times"
    )]
    AlignmentMismatch {
        characters: usize,
        start_times: usize,
        end_times: usize,
    },

    #[error("word index {index} out of range ({len} words)")]
    WordOutOfRange { index: usize, len: usize },

    #[error("no recording loaded")]
    NoRecording,

    #[error("history entry not found: {0}")]
    EntryNotFound(String),

    #[error("audio file not found: {0}")]
    AudioNotFound(String),

    #[error("missing API key; set one with `readalong config set-key`")]
    MissingApiKey,

    #[error("no voice selected; pick one with `readalong config set-voice`")]
    NoVoiceSelected,

    #[error("nothing to speak: text is empty")]
    EmptyText,

    #[error("speech service returned status {status}")]
    Api { status: u16 },

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid audio payload: {0}")]
    Payload(String),

    #[error("audio playback error: {0}")]
    Playback(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
