//! Playlist audio player.
//!
//! `AudioPlayer` owns the playlist and the playback state machine; the media
//! itself is behind `MediaBackend` (`RodioBackend` in the app, a scripted fake
//! in tests). Everything runs on the UI thread: backend events are drained
//! from `AudioPlayer::tick`.

mod keys;
mod media;
mod player;
mod poller;
mod types;

pub use keys::{Shortcut, shortcut_for};
pub use media::{MediaBackend, RodioBackend};
pub use player::AudioPlayer;
pub use poller::ProgressPoller;
pub use types::{AudioError, MediaEvent, NowPlaying, PlaybackState, PlayerPhase, VolumeIcon};
