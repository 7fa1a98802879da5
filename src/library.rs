//! Playlist sources: the page's album cards and an optional music directory.

mod markup;
mod model;
mod scan;

pub use markup::{PlaylistDefaults, resolve_playlist};
pub use model::PlaylistTrack;
pub use scan::scan;
