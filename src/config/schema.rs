use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/stagefront/config.toml`
/// or `~/.config/stagefront/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `STAGEFRONT__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub shop: ShopSettings,
    pub player: PlayerSettings,
    pub storage: StorageSettings,
    pub library: LibrarySettings,
    pub ui: UiSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ShopSettings {
    /// Prefix used by every rendered price, e.g. `GH¢12.50`.
    pub currency_symbol: String,
    /// Image reference stored for lines added without a usable image.
    pub placeholder_image: String,
    /// Delay between opening the checkout link and clearing the cart (milliseconds).
    pub checkout_clear_delay_ms: u64,
    /// Location of the page document (product and album cards).
    /// Defaults to `page.toml` next to the config file.
    pub page_path: Option<PathBuf>,
}

impl Default for ShopSettings {
    fn default() -> Self {
        Self {
            currency_symbol: "GH¢".to_string(),
            placeholder_image: "img/placeholder.jpg".to_string(),
            checkout_clear_delay_ms: 1000,
            page_path: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    /// Volume applied before the first track loads, in `[0, 1]`.
    pub initial_volume: f32,
    /// Number of seconds to seek when pressing the left/right arrows.
    pub seek_step_seconds: u64,
    /// Volume change applied by the up/down arrows, in `(0, 1]`.
    pub volume_step: f32,
    /// Position polling interval while a track is playing (milliseconds).
    pub poll_interval_ms: u64,
    /// Artist shown for tracks that do not name one.
    pub default_artist: String,
    /// Artwork shown for tracks without their own.
    pub placeholder_artwork: String,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            initial_volume: 0.7,
            seek_step_seconds: 5,
            volume_step: 0.1,
            poll_interval_ms: 1000,
            default_artist: "Jay Kelly Rahp".to_string(),
            placeholder_artwork: "https://placehold.co/60/0a0e2a/ff3c78/png?text=Album+Art"
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Directory holding the persisted key-value entries (the cart lives in `cart.json`).
    /// Defaults to `$XDG_DATA_HOME/stagefront` or `~/.local/share/stagefront`.
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Optional directory scanned for extra tracks, appended after the page's albums.
    pub dir: Option<PathBuf>,
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            dir: None,
            extensions: vec!["mp3".into(), "flac".into(), "wav".into(), "ogg".into()],
            follow_links: true,
            include_hidden: false,
            recursive: true,
            max_depth: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
    /// How long a notification stays on screen (milliseconds).
    pub toast_ms: u64,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ Jay Kelly Rahp ~ merch & music ~ ".to_string(),
            toast_ms: 3000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive, overridden by `RUST_LOG`.
    pub level: String,
    /// Log file. Defaults to `stagefront.log` inside the data directory.
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}
