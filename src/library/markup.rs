use std::collections::BTreeMap;

use crate::page::AlbumCard;

use super::model::PlaylistTrack;

/// Fallbacks for album cards that leave fields out.
#[derive(Debug, Clone)]
pub struct PlaylistDefaults {
    pub artist: String,
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|s| s.trim()).filter(|s| !s.is_empty())
}

/// Build the playlist from album cards, in card order.
///
/// The source is the card's own `src`, else `sources[track]`; cards with
/// neither are left out. Titles fall back to the track id and then to
/// `Track <n>` where `n` is the card's 1-based position on the page.
pub fn resolve_playlist(
    cards: &[AlbumCard],
    sources: &BTreeMap<String, String>,
    links: &BTreeMap<String, String>,
    defaults: &PlaylistDefaults,
) -> Vec<PlaylistTrack> {
    let mut tracks = Vec::with_capacity(cards.len());

    for (i, card) in cards.iter().enumerate() {
        let track_id = non_blank(card.track.as_ref());

        let source = non_blank(card.src.as_ref())
            .or_else(|| track_id.and_then(|id| non_blank(sources.get(id))));
        let Some(source) = source else {
            tracing::debug!(card = i, track = ?track_id, "album card has no playable source");
            continue;
        };

        let title = non_blank(card.title.as_ref())
            .or(track_id)
            .map(str::to_string)
            .unwrap_or_else(|| format!("Track {}", i + 1));

        let link = non_blank(card.link.as_ref())
            .or_else(|| track_id.and_then(|id| non_blank(links.get(id))))
            .map(str::to_string);

        tracks.push(PlaylistTrack {
            id: track_id.map(str::to_string).unwrap_or_else(|| title.clone()),
            title,
            artist: non_blank(card.artist.as_ref())
                .unwrap_or(defaults.artist.as_str())
                .to_string(),
            artwork: non_blank(card.artwork.as_ref()).map(str::to_string),
            source: source.to_string(),
            link,
            duration: None,
        });
    }

    tracks
}
