use std::time::Duration;

/// One playable entry of the playlist.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaylistTrack {
    /// Track id from the album card, or the file path for scanned tracks.
    pub id: String,
    pub title: String,
    pub artist: String,
    pub artwork: Option<String>,
    /// What the media backend is asked to load.
    pub source: String,
    /// External listening page, opened on demand or when playback fails.
    pub link: Option<String>,
    /// Known ahead of loading only for scanned files.
    pub duration: Option<Duration>,
}

impl PlaylistTrack {
    /// `artist - title`, as shown in the playlist pane.
    pub fn display(&self) -> String {
        let artist = self.artist.trim();
        if artist.is_empty() {
            self.title.clone()
        } else {
            format!("{} - {}", artist, self.title)
        }
    }
}
