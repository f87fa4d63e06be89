use std::io::Cursor;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rodio::source::Source;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use tracing::debug;

use crate::error::{ReadalongError, Result};
use crate::playback::{AudioBackend, PlaybackClock};

type SharedAudio = Cursor<Arc<[u8]>>;

fn decoder(audio: &Arc<[u8]>) -> Result<Decoder<SharedAudio>> {
    Decoder::new(Cursor::new(Arc::clone(audio)))
        .map_err(|err| ReadalongError::Playback(format!("unsupported audio format: {err}")))
}

/// Duration of encoded audio, when the container reports one.
pub fn probe_duration(audio: &[u8]) -> Result<Option<Duration>> {
    let shared: Arc<[u8]> = Arc::from(audio);
    Ok(decoder(&shared)?.total_duration())
}

/// Plays one recording on the default output device.
///
/// Position is measured with a wall clock that only runs while the sink is
/// playing, offset by the last seek.
pub struct RodioClock {
    _stream: OutputStream,
    handle: OutputStreamHandle,
    sink: Sink,
    audio: Arc<[u8]>,
    duration: Option<f64>,
    offset: f64,
    played: f64,
    resumed_at: Option<Instant>,
}

impl RodioClock {
    pub fn open(audio: Vec<u8>) -> Result<Self> {
        let (stream, handle) = OutputStream::try_default()
            .map_err(|err| ReadalongError::Playback(format!("failed to open output stream: {err}")))?;
        let duration = probe_duration(&audio)?.map(|duration| duration.as_secs_f64());
        let audio: Arc<[u8]> = Arc::from(audio);
        let sink = Self::paused_sink(&handle, &audio, 0.0)?;
        debug!(bytes = audio.len(), duration = ?duration, "opened audio output");
        Ok(Self {
            _stream: stream,
            handle,
            sink,
            audio,
            duration,
            offset: 0.0,
            played: 0.0,
            resumed_at: None,
        })
    }

    fn paused_sink(handle: &OutputStreamHandle, audio: &Arc<[u8]>, start: f64) -> Result<Sink> {
        let sink = Sink::try_new(handle)
            .map_err(|err| ReadalongError::Playback(format!("failed to create sink: {err}")))?;
        sink.pause();
        let source = decoder(audio)?
            .convert_samples::<f32>()
            .skip_duration(Duration::from_secs_f64(start.max(0.0)));
        sink.append(source);
        Ok(sink)
    }

    fn running_time(&self) -> f64 {
        self.resumed_at
            .map(|instant| instant.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }
}

impl PlaybackClock for RodioClock {
    /// An estimate: wall time spent playing since the last seek, not the
    /// sink's own position, so device buffering can make it run slightly
    /// ahead of what is audible.
    // TODO: switch to `Sink::get_pos` and `Sink::try_seek` once rodio is past 0.17.
    fn current_time(&self) -> f64 {
        let position = self.offset + self.played + self.running_time();
        match self.duration {
            Some(duration) => position.min(duration),
            None => position,
        }
    }

    fn seek(&mut self, seconds: f64) -> Result<()> {
        let target = match self.duration {
            Some(duration) => seconds.clamp(0.0, duration),
            None => seconds.max(0.0),
        };
        let playing = self.resumed_at.is_some();
        self.sink.stop();
        self.sink = Self::paused_sink(&self.handle, &self.audio, target)?;
        self.offset = target;
        self.played = 0.0;
        self.resumed_at = None;
        if playing {
            self.sink.play();
            self.resumed_at = Some(Instant::now());
        }
        Ok(())
    }

    fn resume(&mut self) -> Result<()> {
        if self.has_ended() {
            self.seek(0.0)?;
        }
        if self.resumed_at.is_none() {
            self.sink.play();
            self.resumed_at = Some(Instant::now());
        }
        Ok(())
    }

    fn pause(&mut self) {
        self.sink.pause();
        if let Some(instant) = self.resumed_at.take() {
            self.played += instant.elapsed().as_secs_f64();
        }
    }

    fn has_ended(&self) -> bool {
        self.sink.empty()
    }
}

/// Opens recordings on the default output device.
#[derive(Debug, Clone, Copy, Default)]
pub struct RodioBackend;

impl AudioBackend for RodioBackend {
    type Clock = RodioClock;

    fn open(&self, audio: Vec<u8>) -> Result<RodioClock> {
        RodioClock::open(audio)
    }
}
