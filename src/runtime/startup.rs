use std::path::Path;
use std::time::Duration;

use crate::app::App;
use crate::audio::{AudioPlayer, RodioBackend};
use crate::cart::CartManager;
use crate::config;
use crate::handoff::SystemOpener;
use crate::library::{PlaylistDefaults, PlaylistTrack, resolve_playlist, scan};
use crate::notify::Notifier;
use crate::page::Page;
use crate::storage::FileStore;

pub type StorefrontApp = App<FileStore, RodioBackend>;

/// Open the store holding the persisted cart.
pub fn open_store(settings: &config::Settings) -> Result<FileStore, Box<dyn std::error::Error>> {
    let dir = settings
        .data_dir()
        .ok_or("no data directory (set storage.data_dir or HOME)")?;
    Ok(FileStore::open(dir)?)
}

pub fn load_page(settings: &config::Settings) -> Page {
    let Some(path) = settings.page_path() else {
        tracing::warn!("no page location; the shop and playlist start empty");
        return Page::default();
    };
    match Page::load(&path) {
        Ok(page) => page,
        Err(e) => {
            tracing::error!(error = %e, "failed to load page");
            Page::default()
        }
    }
}

/// Album cards first, in page order, then the music directory if any.
/// `music_dir` overrides `library.dir`.
pub fn build_playlist(
    settings: &config::Settings,
    page: &Page,
    music_dir: Option<&Path>,
) -> Vec<PlaylistTrack> {
    let defaults = PlaylistDefaults {
        artist: settings.player.default_artist.clone(),
    };
    let mut tracks = resolve_playlist(&page.albums, &page.sources, &page.links, &defaults);

    let dir = music_dir.or(settings.library.dir.as_deref());
    if let Some(dir) = dir {
        tracks.extend(scan(dir, &settings.library, &settings.player.default_artist));
    }
    tracks
}

pub fn build_app(
    settings: &config::Settings,
    music_dir: Option<&Path>,
) -> Result<StorefrontApp, Box<dyn std::error::Error>> {
    let store = open_store(settings)?;
    let page = load_page(settings);
    let playlist = build_playlist(settings, &page, music_dir);
    tracing::info!(
        products = page.products.len(),
        tracks = playlist.len(),
        "storefront ready"
    );

    let notifier = Notifier::new(Duration::from_millis(settings.ui.toast_ms));
    let cart = CartManager::new(
        store,
        settings.shop.clone(),
        notifier.clone(),
        Box::new(SystemOpener),
    );
    let player = AudioPlayer::new(
        RodioBackend::new(settings.player.initial_volume),
        playlist,
        settings.player.clone(),
        notifier.clone(),
        Box::new(SystemOpener),
    );

    Ok(App::new(page.products, cart, player, notifier))
}
