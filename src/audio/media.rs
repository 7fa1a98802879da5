//! The media element seam: a `MediaBackend` trait and its `rodio` implementation.

use std::collections::VecDeque;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use lofty::prelude::*;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};

use super::types::{AudioError, MediaEvent};

/// Something that can load one source at a time and play it.
///
/// `load` only prepares the source; readiness, natural end and late failures
/// are reported through `poll_event`.
pub trait MediaBackend {
    fn load(&mut self, source: &str) -> Result<(), AudioError>;
    fn play(&mut self) -> Result<(), AudioError>;
    fn pause(&mut self);
    /// Drop the loaded source, if any.
    fn unload(&mut self);
    fn seek(&mut self, position: Duration) -> Result<(), AudioError>;
    fn position(&self) -> Duration;
    fn set_volume(&mut self, volume: f32);
    fn poll_event(&mut self) -> Option<MediaEvent>;
}

struct Loaded {
    path: PathBuf,
    sink: Sink,
    duration: Option<Duration>,
    started_at: Option<Instant>,
    accumulated: Duration,
}

impl Loaded {
    fn elapsed(&self) -> Duration {
        let elapsed = self.accumulated + self.started_at.map_or(Duration::ZERO, |st| st.elapsed());
        match self.duration {
            Some(d) => elapsed.min(d),
            None => elapsed,
        }
    }
}

/// Plays local files through the default output device.
///
/// The output stream is opened on first load so a machine without audio can
/// still browse the shop; the failure surfaces as a load error instead.
#[derive(Default)]
pub struct RodioBackend {
    stream: Option<OutputStream>,
    loaded: Option<Loaded>,
    volume: f32,
    events: VecDeque<MediaEvent>,
}

impl RodioBackend {
    pub fn new(volume: f32) -> Self {
        Self {
            volume,
            ..Self::default()
        }
    }

    fn stream(&mut self) -> Result<&OutputStream, AudioError> {
        if self.stream.is_none() {
            let mut stream = OutputStreamBuilder::open_default_stream()
                .map_err(|e| AudioError::Output(e.to_string()))?;
            // rodio logs to stderr when OutputStream is dropped, which would
            // scribble over the TUI.
            stream.log_on_drop(false);
            self.stream = Some(stream);
        }
        self.stream
            .as_ref()
            .ok_or_else(|| AudioError::Output("output stream unavailable".into()))
    }

    /// Build a paused sink reading `path` from `start_at`.
    fn open_sink(
        &mut self,
        path: &Path,
        start_at: Duration,
    ) -> Result<(Sink, Option<Duration>), AudioError> {
        let file = File::open(path).map_err(|source| AudioError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let decoder = Decoder::new(BufReader::new(file)).map_err(|source| AudioError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        let duration = decoder.total_duration().or_else(|| tagged_duration(path));

        let volume = self.volume;
        let stream = self.stream()?;
        let sink = Sink::connect_new(stream.mixer());
        sink.append(decoder.skip_duration(start_at));
        sink.set_volume(volume);
        sink.pause();
        Ok((sink, duration))
    }
}

fn tagged_duration(path: &Path) -> Option<Duration> {
    lofty::read_from_path(path)
        .ok()
        .map(|tagged| tagged.properties().duration())
        .filter(|d| !d.is_zero())
}

impl MediaBackend for RodioBackend {
    fn load(&mut self, source: &str) -> Result<(), AudioError> {
        self.unload();
        if source.contains("://") {
            return Err(AudioError::Unsupported(source.to_string()));
        }

        let path = PathBuf::from(source);
        let (sink, duration) = self.open_sink(&path, Duration::ZERO)?;
        tracing::debug!(path = %path.display(), ?duration, "loaded");
        self.loaded = Some(Loaded {
            path,
            sink,
            duration,
            started_at: None,
            accumulated: Duration::ZERO,
        });
        self.events.push_back(MediaEvent::Ready { duration });
        Ok(())
    }

    fn play(&mut self) -> Result<(), AudioError> {
        let loaded = self.loaded.as_mut().ok_or(AudioError::NotLoaded)?;
        if loaded.started_at.is_none() {
            loaded.sink.play();
            loaded.started_at = Some(Instant::now());
        }
        Ok(())
    }

    fn pause(&mut self) {
        let Some(loaded) = self.loaded.as_mut() else {
            return;
        };
        if let Some(st) = loaded.started_at.take() {
            loaded.accumulated += st.elapsed();
            loaded.sink.pause();
        }
    }

    fn unload(&mut self) {
        if let Some(loaded) = self.loaded.take() {
            loaded.sink.stop();
        }
        self.events.clear();
    }

    fn seek(&mut self, position: Duration) -> Result<(), AudioError> {
        let Some(loaded) = self.loaded.take() else {
            return Err(AudioError::NotLoaded);
        };
        let was_playing = loaded.started_at.is_some();
        loaded.sink.stop();

        // Rebuild the sink and skip into the file; works for every format
        // the decoder handles, unlike in-place seeking.
        let (sink, _) = self.open_sink(&loaded.path, position)?;
        let started_at = if was_playing {
            sink.play();
            Some(Instant::now())
        } else {
            None
        };
        self.loaded = Some(Loaded {
            sink,
            started_at,
            accumulated: position,
            ..loaded
        });
        Ok(())
    }

    fn position(&self) -> Duration {
        self.loaded.as_ref().map_or(Duration::ZERO, Loaded::elapsed)
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        if let Some(loaded) = self.loaded.as_ref() {
            loaded.sink.set_volume(volume);
        }
    }

    fn poll_event(&mut self) -> Option<MediaEvent> {
        if let Some(event) = self.events.pop_front() {
            return Some(event);
        }

        let loaded = self.loaded.as_mut()?;
        if loaded.started_at.is_some() && loaded.sink.empty() {
            loaded.accumulated = loaded.elapsed();
            loaded.started_at = None;
            return Some(MediaEvent::Ended);
        }
        None
    }
}
