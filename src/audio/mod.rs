pub mod playback;

pub use playback::{probe_duration, RodioBackend, RodioClock};
