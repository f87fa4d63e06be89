use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "readalong")]
#[command(version)]
#[command(about = "Speak text and follow along word by word", long_about = None)]
pub struct Cli {
    /// Directory holding settings and generated audio (default: $READALONG_HOME or ./.readalong)
    #[arg(long = "data-dir", global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Group a character alignment JSON file into word timings.
    Segment(SegmentArgs),
    /// Show which word is active at given playback times.
    Track(TrackArgs),
    /// List saved voices for the configured API key.
    Voices,
    /// Inspect or change settings.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Generate speech for text and play it with highlighting.
    Say(SayArgs),
    /// Manage previously generated recordings.
    #[command(subcommand)]
    History(HistoryCommand),
}

#[derive(Args, Debug)]
pub struct SegmentArgs {
    /// Alignment JSON, or a full speech response containing `alignment`.
    #[arg(value_name = "ALIGNMENT_JSON")]
    pub input: PathBuf,
    /// Print on one line instead of pretty JSON.
    #[arg(long)]
    pub compact: bool,
}

#[derive(Args, Debug)]
pub struct TrackArgs {
    /// Word timings JSON, as printed by `segment`.
    #[arg(value_name = "TIMINGS_JSON")]
    pub input: PathBuf,
    /// Playback times (seconds or HH:MM:SS.mmm).
    #[arg(
        long = "at",
        value_name = "TIME",
        required = true,
        num_args = 1..,
        allow_negative_numbers = true
    )]
    pub times: Vec<String>,
}

impl TrackArgs {
    pub fn parsed_times(&self) -> Result<Vec<f64>> {
        self.times
            .iter()
            .map(|raw| {
                parse_time_to_seconds(raw).with_context(|| format!("Invalid time '{}'", raw))
            })
            .collect()
    }
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the current settings (API key masked).
    Show,
    /// Store the API key.
    SetKey { key: String },
    /// Select the voice used for new recordings.
    SetVoice { voice_id: String },
    /// Folder, relative to the data directory, for generated audio.
    SetOutput { folder: String },
}

#[derive(Args, Debug)]
pub struct SayArgs {
    /// Text to speak.
    #[arg(value_name = "TEXT", required_unless_present = "file")]
    pub text: Option<String>,
    /// Read the text from a file instead.
    #[arg(long, value_name = "PATH", conflicts_with = "text")]
    pub file: Option<PathBuf>,
    /// Save the recording without playing it.
    #[arg(long = "no-play")]
    pub no_play: bool,
}

#[derive(Subcommand, Debug)]
pub enum HistoryCommand {
    /// List recordings, most recent first.
    List,
    /// Play a stored recording again.
    Replay { id: String },
    /// Delete a recording and its audio file.
    Delete { id: String },
    /// Delete every recording.
    Clear {
        /// Confirm deleting all recordings.
        #[arg(long)]
        yes: bool,
    },
    /// Generate a recording again with another voice.
    Regenerate {
        id: String,
        #[arg(long = "voice", value_name = "VOICE_ID")]
        voice_id: String,
    },
}

/// Seconds, `MM:SS(.mmm)` or `HH:MM:SS(.mmm)`.
pub fn parse_time_to_seconds(raw: &str) -> Result<f64> {
    if raw.contains(':') {
        return parse_hms_time(raw);
    }

    let seconds: f64 = raw
        .parse()
        .with_context(|| format!("Failed to parse seconds value '{}'", raw))?;
    Ok(seconds)
}

fn parse_hms_time(raw: &str) -> Result<f64> {
    let parts: Vec<&str> = raw.split(':').collect();
    ensure!(
        (2..=3).contains(&parts.len()),
        "Time format must be MM:SS or HH:MM:SS"
    );

    let seconds_part = parts[parts.len() - 1];
    let minutes_part = parts[parts.len() - 2];
    let seconds = seconds_part
        .parse::<f64>()
        .with_context(|| format!("Invalid seconds component '{}'", seconds_part))?;
    let minutes = minutes_part
        .parse::<f64>()
        .with_context(|| format!("Invalid minutes component '{}'", minutes_part))?;
    ensure!(minutes >= 0.0, "Minutes must be non-negative");
    ensure!(seconds >= 0.0, "Seconds must be non-negative");

    let hours = if parts.len() == 3 {
        let value = parts[0]
            .parse::<f64>()
            .with_context(|| format!("Invalid hours component '{}'", parts[0]))?;
        ensure!(value >= 0.0, "Hours must be non-negative");
        value
    } else {
        0.0
    };

    Ok(hours * 3600.0 + minutes * 60.0 + seconds)
}
