//! Player state and the events exchanged with the media backend.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum PlayerPhase {
    /// Nothing loaded.
    #[default]
    Idle,
    /// Waiting for the backend to report the source ready.
    Loading,
    Playing,
    Paused,
}

/// Transient playback state, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    /// `None` until playback is first started.
    pub current_index: Option<usize>,
    pub phase: PlayerPhase,
    pub position_seconds: f64,
    pub duration_seconds: f64,
    /// Mirrors the backend volume, always in `[0, 1]`.
    pub volume: f32,
}

impl PlaybackState {
    pub fn new(volume: f32) -> Self {
        Self {
            current_index: None,
            phase: PlayerPhase::Idle,
            position_seconds: 0.0,
            duration_seconds: 0.0,
            volume,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.phase == PlayerPhase::Playing
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum VolumeIcon {
    Muted,
    Low,
    High,
}

impl VolumeIcon {
    pub fn for_volume(volume: f32) -> Self {
        if volume <= 0.0 {
            Self::Muted
        } else if volume < 0.5 {
            Self::Low
        } else {
            Self::High
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Self::Muted => "🔇",
            Self::Low => "🔉",
            Self::High => "🔊",
        }
    }
}

/// What the now-playing area shows for the current track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NowPlaying {
    pub title: String,
    pub artist: String,
    pub artwork: String,
}

/// Asynchronous notifications from the media backend, drained every tick.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// The loaded source can start; `duration` is `None` when unknown.
    Ready { duration: Option<Duration> },
    /// Playback reached the end of the source.
    Ended,
    Failed(String),
}

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("unsupported media source: {0}")]
    Unsupported(String),
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: rodio::decoder::DecoderError,
    },
    #[error("no audio output device: {0}")]
    Output(String),
    #[error("nothing loaded")]
    NotLoaded,
}
