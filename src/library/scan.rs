use std::path::Path;

use lofty::prelude::*;
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::model::PlaylistTrack;

fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            settings
                .extensions
                .iter()
                .map(|e| e.trim().trim_start_matches('.'))
                .any(|e| !e.is_empty() && e.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn non_blank(value: Option<std::borrow::Cow<'_, str>>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Read the audio files under `dir` as playlist entries, sorted by their
/// display string. Files that carry no tags keep their file stem as title
/// and `default_artist` as artist.
pub fn scan(dir: &Path, settings: &LibrarySettings, default_artist: &str) -> Vec<PlaylistTrack> {
    let mut tracks: Vec<PlaylistTrack> = Vec::new();

    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    for entry in walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
    {
        let path = entry.path();
        if !path.is_file() || !is_audio_file(path, settings) {
            continue;
        }

        let mut title = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("UNKNOWN")
            .to_string();
        let mut artist = default_artist.to_string();
        let mut duration = None;

        match lofty::read_from_path(path) {
            Ok(tagged) => {
                duration = Some(tagged.properties().duration()).filter(|d| !d.is_zero());
                if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
                    if let Some(v) = non_blank(tag.title()) {
                        title = v;
                    }
                    if let Some(v) = non_blank(tag.artist()) {
                        artist = v;
                    }
                }
            }
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "no readable tags");
            }
        }

        let source = path.to_string_lossy().into_owned();
        tracks.push(PlaylistTrack {
            id: source.clone(),
            title,
            artist,
            artwork: None,
            source,
            link: None,
            duration,
        });
    }

    tracks.sort_by_key(|t| t.display().to_lowercase());
    tracing::info!(dir = %dir.display(), count = tracks.len(), "scanned music directory");
    tracks
}
