use std::io::Write;
use std::thread;
use std::time::Duration;
use std::{fs, io};

use anyhow::{bail, ensure, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use readalong::alignment::segment;
use readalong::audio::RodioBackend;
use readalong::cli::{
    Cli, Command, ConfigCommand, HistoryCommand, SayArgs, SegmentArgs, TrackArgs,
};
use readalong::config::AppConfig;
use readalong::highlight::active_word_index;
use readalong::highlight::layout::layout_text;
use readalong::narrator::Narrator;
use readalong::playback::{AudioBackend, FrameQueue, ManualBackend, PlayerEvent};
use readalong::settings::{JsonSettingsStore, Settings, SettingsStore};
use readalong::storage::FsAudioStore;
use readalong::synthesis::{ElevenLabsClient, SpeechSynthesizer};
use readalong::terminal::{highlight_line, word_status};
use readalong::types::{CharacterAlignment, Voice, WordTiming};

const FRAME_INTERVAL: Duration = Duration::from_micros(16_667);

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Command::Segment(args) => segment_command(&args),
        Command::Track(args) => track_command(&args),
        command => {
            let config = AppConfig::from_override(cli.data_dir)?;
            run_with_data(&config, command)
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,readalong=info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn segment_command(args: &SegmentArgs) -> Result<()> {
    let raw = fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read alignment file {:?}", args.input))?;
    let alignment = parse_alignment(&raw).context("Failed to parse alignment JSON")?;
    let timings = segment(&alignment).context("Alignment is malformed")?;

    let output = if args.compact {
        serde_json::to_string(&timings)?
    } else {
        serde_json::to_string_pretty(&timings)?
    };
    println!("{output}");
    Ok(())
}

fn parse_alignment(raw: &str) -> Result<CharacterAlignment> {
    let value: serde_json::Value = serde_json::from_str(raw)?;
    let alignment = match value.get("alignment") {
        Some(inner) => serde_json::from_value(inner.clone())?,
        None => serde_json::from_value(value)?,
    };
    Ok(alignment)
}

fn track_command(args: &TrackArgs) -> Result<()> {
    let raw = fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read timings file {:?}", args.input))?;
    let timings: Vec<WordTiming> =
        serde_json::from_str(&raw).context("Failed to parse word timings JSON")?;

    for time in args.parsed_times()? {
        match active_word_index(&timings, time) {
            Some(index) => println!("{time:.3}\t{index}\t{}", timings[index].word),
            None => println!("{time:.3}\t-\t-"),
        }
    }
    Ok(())
}

fn run_with_data(config: &AppConfig, command: Command) -> Result<()> {
    let mut store = JsonSettingsStore::new(config.settings_path());
    let mut settings = store
        .load()
        .with_context(|| format!("Failed to load settings from {:?}", store.path()))?;

    match command {
        Command::Voices => {
            let voices = fetch_voices(&settings)?;
            if voices.is_empty() {
                println!("No saved voices found. Add voices to your ElevenLabs favorites.");
            }
            for voice in voices {
                let marker = if voice.voice_id == settings.selected_voice_id {
                    "*"
                } else {
                    " "
                };
                println!("{marker} {}\t{}", voice.voice_id, voice.name);
            }
            Ok(())
        }
        Command::Config(command) => config_command(command, &mut settings, &mut store),
        Command::Say(args) => say_command(config, &args, &mut settings),
        Command::History(command) => history_command(config, command, &mut settings),
        Command::Segment(_) | Command::Track(_) => bail!("command does not use the data directory"),
    }
}

fn fetch_voices(settings: &Settings) -> Result<Vec<Voice>> {
    ensure!(
        !settings.api_key.is_empty(),
        "Please set your API key with `readalong config set-key`"
    );
    ElevenLabsClient::new()
        .voices(&settings.api_key)
        .context("Failed to load voices")
}

fn config_command(
    command: ConfigCommand,
    settings: &mut Settings,
    store: &mut JsonSettingsStore,
) -> Result<()> {
    match command {
        ConfigCommand::Show => {
            println!("API key:       {}", mask_key(&settings.api_key));
            println!(
                "Voice:         {} ({})",
                display_or_dash(&settings.selected_voice_name),
                display_or_dash(&settings.selected_voice_id)
            );
            println!("Output folder: {}", settings.output_folder);
            println!("Recordings:    {}", settings.history.len());
            return Ok(());
        }
        ConfigCommand::SetKey { key } => settings.set_api_key(&key),
        ConfigCommand::SetVoice { voice_id } => {
            let voices = fetch_voices(settings)?;
            ensure!(
                voices.iter().any(|voice| voice.voice_id == voice_id),
                "Unknown voice id '{}'; run `readalong voices` to list them",
                voice_id
            );
            settings.select_voice(&voice_id, &voices);
            println!("Selected voice {}", settings.selected_voice_name);
        }
        ConfigCommand::SetOutput { folder } => settings.set_output_folder(&folder),
    }
    store.save(settings).context("Failed to save settings")?;
    Ok(())
}

fn say_command(config: &AppConfig, args: &SayArgs, settings: &mut Settings) -> Result<()> {
    let text = match (&args.text, &args.file) {
        (_, Some(path)) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read text file {:?}", path))?,
        (Some(text), None) => text.clone(),
        (None, None) => bail!("Provide text or --file"),
    };

    if args.no_play {
        let mut narrator = build_narrator(config, ManualBackend::default());
        let id = narrator.generate(settings, &text).context("TTS failed")?;
        println!("Saved {id}");
        return Ok(());
    }

    let mut narrator = build_narrator(config, RodioBackend);
    let id = narrator.generate(settings, &text).context("TTS failed")?;
    println!("Speech generated successfully ({id}).");
    follow_playback(&mut narrator)
}

fn history_command(
    config: &AppConfig,
    command: HistoryCommand,
    settings: &mut Settings,
) -> Result<()> {
    match command {
        HistoryCommand::List => {
            if settings.history.is_empty() {
                println!("No history yet.");
            }
            for entry in settings.history.recent_first() {
                println!(
                    "{}\t{} \u{00B7} {}\t{}",
                    entry.id,
                    entry.voice_name,
                    entry.formatted_date(),
                    entry.preview(80).replace('\n', " ")
                );
            }
            Ok(())
        }
        HistoryCommand::Replay { id } => {
            let mut narrator = build_narrator(config, RodioBackend);
            narrator
                .replay(settings, &id)
                .context("Could not replay recording")?;
            follow_playback(&mut narrator)
        }
        HistoryCommand::Delete { id } => {
            let mut narrator = build_narrator(config, ManualBackend::default());
            let entry = narrator.delete(settings, &id)?;
            println!("Deleted \"{}\"", entry.preview(50));
            Ok(())
        }
        HistoryCommand::Clear { yes } => {
            ensure!(
                yes,
                "This deletes all {} recording(s) and their audio files; pass --yes to confirm",
                settings.history.len()
            );
            let mut narrator = build_narrator(config, ManualBackend::default());
            match narrator.clear_history(settings)? {
                0 => println!("History is already empty."),
                count => println!("Deleted {count} recording(s)."),
            }
            Ok(())
        }
        HistoryCommand::Regenerate { id, voice_id } => {
            let voice = fetch_voices(settings)?
                .into_iter()
                .find(|voice| voice.voice_id == voice_id)
                .with_context(|| format!("Unknown voice id '{}'", voice_id))?;
            let mut narrator = build_narrator(config, RodioBackend);
            narrator
                .regenerate(settings, &id, &voice)
                .context("Regeneration failed")?;
            println!("Regenerated with {}.", voice.name);
            follow_playback(&mut narrator)
        }
    }
}

fn build_narrator<B: AudioBackend>(config: &AppConfig, backend: B) -> Narrator<B, FrameQueue> {
    Narrator::new(
        Box::new(ElevenLabsClient::new()),
        Box::new(FsAudioStore::new(&config.data_root)),
        Box::new(JsonSettingsStore::new(config.settings_path())),
        backend,
        FrameQueue::new(),
    )
}

/// Present frames until the loaded recording finishes, redrawing the
/// status line whenever the active word changes.
fn follow_playback<B: AudioBackend>(narrator: &mut Narrator<B, FrameQueue>) -> Result<()> {
    let player = narrator.player_mut();
    let runs = layout_text(player.tracker().text(), player.tracker().timings());
    let total = player.tracker().timings().len();
    println!("{}", highlight_line(&runs, None));

    let mut stdout = io::stdout();
    while player.is_playing() {
        for handle in player.scheduler_mut().take_due() {
            match player.on_frame(handle) {
                Some(PlayerEvent::Highlight { index }) => {
                    write!(stdout, "\r\x1b[2K{}", word_status(&runs, index, total))?;
                    stdout.flush()?;
                }
                Some(PlayerEvent::Ended) => {
                    writeln!(stdout, "\r\x1b[2KDone.")?;
                }
                None => {}
            }
        }
        thread::sleep(FRAME_INTERVAL);
    }
    player.teardown();
    Ok(())
}

fn mask_key(key: &str) -> String {
    if key.is_empty() {
        return "-".to_string();
    }
    let visible: String = key
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("****{visible}")
}

fn display_or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}
