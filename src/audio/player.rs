use std::time::{Duration, Instant};

use crate::config::PlayerSettings;
use crate::handoff::LinkOpener;
use crate::library::PlaylistTrack;
use crate::notify::Notifier;

use super::media::MediaBackend;
use super::poller::ProgressPoller;
use super::types::{MediaEvent, NowPlaying, PlaybackState, PlayerPhase, VolumeIcon};

/// Playlist player: a small state machine over a `MediaBackend`.
///
/// `Idle -> Loading -> Playing <-> Paused`, and on natural end the next
/// entry starts loading (wrapping to the first after the last).
pub struct AudioPlayer<B: MediaBackend> {
    backend: B,
    playlist: Vec<PlaylistTrack>,
    state: PlaybackState,
    /// Source handed to the backend, `None` when nothing is loaded.
    loaded_source: Option<String>,
    /// Start playing as soon as the backend reports ready.
    autoplay: bool,
    poller: ProgressPoller,
    last_audible_volume: f32,
    transport_visible: bool,
    settings: PlayerSettings,
    notifier: Notifier,
    opener: Box<dyn LinkOpener>,
}

impl<B: MediaBackend> AudioPlayer<B> {
    pub fn new(
        mut backend: B,
        playlist: Vec<PlaylistTrack>,
        settings: PlayerSettings,
        notifier: Notifier,
        opener: Box<dyn LinkOpener>,
    ) -> Self {
        let volume = settings.initial_volume.clamp(0.0, 1.0);
        backend.set_volume(volume);
        let last_audible_volume = if volume > 0.0 { volume } else { 0.7 };

        Self {
            backend,
            playlist,
            state: PlaybackState::new(volume),
            loaded_source: None,
            autoplay: false,
            poller: ProgressPoller::new(Duration::from_millis(settings.poll_interval_ms.max(1))),
            last_audible_volume,
            transport_visible: false,
            settings,
            notifier,
            opener,
        }
    }

    pub fn playlist(&self) -> &[PlaylistTrack] {
        &self.playlist
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded_source.is_some()
    }

    pub fn transport_visible(&self) -> bool {
        self.transport_visible
    }

    pub fn poller_active(&self) -> bool {
        self.poller.is_active()
    }

    pub fn volume_icon(&self) -> VolumeIcon {
        VolumeIcon::for_volume(self.state.volume)
    }

    pub fn current_track(&self) -> Option<&PlaylistTrack> {
        self.state.current_index.and_then(|i| self.playlist.get(i))
    }

    /// Title, artist and artwork of the current track with fallbacks applied.
    pub fn now_playing(&self) -> Option<NowPlaying> {
        let track = self.current_track()?;
        let artist = match track.artist.trim() {
            "" => self.settings.default_artist.clone(),
            a => a.to_string(),
        };
        Some(NowPlaying {
            title: track.title.clone(),
            artist,
            artwork: track
                .artwork
                .clone()
                .unwrap_or_else(|| self.settings.placeholder_artwork.clone()),
        })
    }

    /// Position as a percentage of the duration, 0 while the duration is unknown.
    pub fn progress_percent(&self) -> f64 {
        crate::format::progress_percent(self.state.position_seconds, self.state.duration_seconds)
    }

    pub(super) fn settings(&self) -> &PlayerSettings {
        &self.settings
    }

    #[cfg(test)]
    pub(crate) fn backend(&self) -> &B {
        &self.backend
    }

    #[cfg(test)]
    pub(crate) fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Start or resume playback.
    ///
    /// Without a reference the loaded track resumes. A reference naming the
    /// loaded track also resumes. Anything else replaces current playback
    /// with the referenced entry, found by `index` first and `source` second.
    pub fn play(&mut self, source: Option<&str>, index: Option<usize>) {
        if source.is_none() && index.is_none() {
            if self.is_loaded() {
                self.resume();
            } else {
                tracing::debug!("play without a reference and nothing loaded");
            }
            return;
        }

        let target = index
            .filter(|&i| i < self.playlist.len())
            .or_else(|| source.and_then(|s| self.playlist.iter().position(|t| t.source == s)));
        let Some(target) = target else {
            tracing::warn!(?source, ?index, "play reference does not match the playlist");
            return;
        };

        let target_source = self.playlist[target].source.clone();
        if self.loaded_source.as_deref() == Some(target_source.as_str()) {
            self.state.current_index = Some(target);
            self.resume();
            return;
        }

        self.teardown();
        self.state.current_index = Some(target);
        self.state.phase = PlayerPhase::Loading;
        self.state.position_seconds = 0.0;
        self.state.duration_seconds = self.playlist[target]
            .duration
            .map_or(0.0, |d| d.as_secs_f64());
        self.autoplay = true;

        tracing::info!(index = target, source = %target_source, "loading track");
        match self.backend.load(&target_source) {
            Ok(()) => self.loaded_source = Some(target_source),
            Err(e) => self.fail(e.to_string()),
        }
    }

    fn resume(&mut self) {
        match self.state.phase {
            PlayerPhase::Loading => self.autoplay = true,
            PlayerPhase::Playing => {}
            PlayerPhase::Paused | PlayerPhase::Idle => self.start_backend(),
        }
    }

    fn start_backend(&mut self) {
        match self.backend.play() {
            Ok(()) => self.on_started(),
            Err(e) => self.fail(e.to_string()),
        }
    }

    fn on_started(&mut self) {
        self.state.phase = PlayerPhase::Playing;
        self.autoplay = false;
        self.poller.start();
        self.transport_visible = true;
        if let Some(track) = self.current_track() {
            let message = format!("Now playing: {}", track.title);
            self.notifier.info(message);
        }
        tracing::debug!(index = ?self.state.current_index, "playing");
    }

    fn teardown(&mut self) {
        self.poller.stop();
        self.backend.unload();
        self.loaded_source = None;
        self.autoplay = false;
        self.state.phase = PlayerPhase::Idle;
    }

    /// Playback or load failure: stop, report, and send the listener to the
    /// track's external page instead.
    fn fail(&mut self, reason: String) {
        let track = self.current_track().cloned();
        let title = track.as_ref().map_or("track", |t| t.title.as_str());
        tracing::error!(title, %reason, "playback failed");
        self.notifier.error(format!("Error playing: {title}"));

        self.teardown();
        self.state.position_seconds = 0.0;

        if let Some(link) = track.and_then(|t| t.link) {
            if let Err(e) = self.opener.open(&link) {
                tracing::error!(error = %e, %link, "failed to open fallback link");
            }
        }
    }

    pub fn pause(&mut self) {
        if !self.is_loaded() {
            return;
        }
        match self.state.phase {
            PlayerPhase::Loading => self.autoplay = false,
            PlayerPhase::Playing => {
                self.backend.pause();
                self.poller.stop();
                self.state.phase = PlayerPhase::Paused;
                self.refresh_position();
                tracing::debug!("paused");
            }
            PlayerPhase::Paused | PlayerPhase::Idle => {}
        }
    }

    pub fn toggle_play_pause(&mut self) {
        let playing = self.state.is_playing()
            || (self.state.phase == PlayerPhase::Loading && self.autoplay);
        if playing {
            self.pause();
        } else if self.is_loaded() {
            self.resume();
        } else if let Some(i) = self.state.current_index {
            self.play(None, Some(i));
        } else if !self.playlist.is_empty() {
            self.play(None, Some(0));
        }
    }

    /// Activating a playlist entry: pause it when it is the one playing,
    /// otherwise play it.
    pub fn toggle_track(&mut self, index: usize) {
        if self.state.current_index == Some(index) && self.state.is_playing() {
            self.pause();
        } else {
            self.play(None, Some(index));
        }
    }

    pub fn seek_to(&mut self, seconds: f64) {
        if !self.is_loaded() || !seconds.is_finite() {
            return;
        }
        let upper = if self.state.duration_seconds > 0.0 {
            self.state.duration_seconds
        } else {
            f64::MAX
        };
        let target = seconds.clamp(0.0, upper);
        // Unknown duration leaves the range open; skip what `Duration` can't hold.
        let Ok(position) = Duration::try_from_secs_f64(target) else {
            tracing::debug!(seconds, "seek target out of range");
            return;
        };

        if let Err(e) = self.backend.seek(position) {
            self.fail(e.to_string());
            return;
        }
        self.state.position_seconds = target;
    }

    pub fn seek_by(&mut self, delta_seconds: f64) {
        self.seek_to(self.state.position_seconds + delta_seconds);
    }

    /// Seek to `pct` percent of the duration. Ignored while the duration is unknown.
    pub fn seek_to_percent(&mut self, pct: f64) {
        if self.state.duration_seconds <= 0.0 || !pct.is_finite() {
            return;
        }
        let pct = pct.clamp(0.0, 100.0);
        self.seek_to(pct / 100.0 * self.state.duration_seconds);
    }

    pub fn set_volume(&mut self, level: f32) {
        if !level.is_finite() {
            tracing::warn!(level, "ignoring non-finite volume");
            return;
        }
        let level = level.clamp(0.0, 1.0);
        self.backend.set_volume(level);
        self.state.volume = level;
        if level > 0.0 {
            self.last_audible_volume = level;
        }
    }

    /// Same as `set_volume` on a 0-100 scale.
    pub fn set_volume_percent(&mut self, percent: f32) {
        self.set_volume(percent / 100.0);
    }

    pub fn adjust_volume(&mut self, delta: f32) {
        self.set_volume(self.state.volume + delta);
    }

    /// Mute, or restore the last audible volume.
    pub fn toggle_mute(&mut self) {
        if self.state.volume > 0.0 {
            let restore = self.state.volume;
            self.set_volume(0.0);
            self.last_audible_volume = restore;
        } else {
            self.set_volume(self.last_audible_volume);
        }
    }

    pub fn next(&mut self) {
        let len = self.playlist.len();
        if len == 0 {
            return;
        }
        let next = self.state.current_index.map_or(0, |i| (i + 1) % len);
        self.play_entry(next);
    }

    pub fn prev(&mut self) {
        let len = self.playlist.len();
        if len == 0 {
            return;
        }
        let prev = match self.state.current_index {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.play_entry(prev);
    }

    fn play_entry(&mut self, index: usize) {
        let source = self.playlist[index].source.clone();
        self.play(Some(&source), Some(index));
    }

    /// Open the external listening page of entry `index`.
    pub fn open_link(&mut self, index: usize) -> bool {
        let Some(track) = self.playlist.get(index) else {
            return false;
        };
        let Some(link) = track.link.clone() else {
            self.notifier.info(format!("No external link for {}", track.title));
            return false;
        };
        match self.opener.open(&link) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(error = %e, %link, "failed to open track link");
                false
            }
        }
    }

    fn refresh_position(&mut self) {
        let pos = self.backend.position().as_secs_f64();
        self.state.position_seconds = if self.state.duration_seconds > 0.0 {
            pos.min(self.state.duration_seconds)
        } else {
            pos
        };
    }

    /// Drain backend events and run the position poller.
    pub fn tick(&mut self, now: Instant) {
        while let Some(event) = self.backend.poll_event() {
            self.handle_event(event);
        }
        if self.poller.tick(now) {
            self.refresh_position();
        }
    }

    fn handle_event(&mut self, event: MediaEvent) {
        match event {
            MediaEvent::Ready { duration } => {
                if self.state.phase != PlayerPhase::Loading {
                    return;
                }
                if let Some(d) = duration {
                    self.state.duration_seconds = d.as_secs_f64();
                }
                if self.autoplay {
                    self.start_backend();
                } else {
                    self.state.phase = PlayerPhase::Paused;
                }
            }
            MediaEvent::Ended => {
                tracing::debug!(index = ?self.state.current_index, "track ended");
                // Unload first so a one-entry playlist reloads instead of
                // resuming a drained source.
                self.teardown();
                self.next();
            }
            MediaEvent::Failed(reason) => self.fail(reason),
        }
    }
}
