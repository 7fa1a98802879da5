//! The storefront "page": product cards, album cards and the lookup tables
//! the playlist is built from, read from a TOML document.

use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PageError {
    #[error("failed to read page {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse page {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// A product card. Every field is optional; `resolve_product` decides which
/// one wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProductCard {
    pub data_name: Option<String>,
    pub data_product: Option<String>,
    pub data_price: Option<String>,
    pub data_image: Option<String>,
    pub heading: Option<String>,
    pub price_text: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AlbumCard {
    pub track: Option<String>,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub artwork: Option<String>,
    pub src: Option<String>,
    pub link: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Page {
    pub products: Vec<ProductCard>,
    pub albums: Vec<AlbumCard>,
    /// Track id to playable asset.
    pub sources: BTreeMap<String, String>,
    /// Track id to external listening link.
    pub links: BTreeMap<String, String>,
}

impl Page {
    pub fn parse(text: &str, path: &Path) -> Result<Self, PageError> {
        toml::from_str(text).map_err(|source| PageError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read the page at `path`. A missing file is an empty page.
    pub fn load(path: &Path) -> Result<Self, PageError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "page file not found; using an empty page");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(PageError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let mut page = Self::parse(&text, path)?;
        if let Some(base) = path.parent() {
            page.resolve_assets(base);
        }
        tracing::debug!(
            products = page.products.len(),
            albums = page.albums.len(),
            "loaded page"
        );
        Ok(page)
    }

    /// Make relative asset paths relative to `base` instead of the cwd.
    fn resolve_assets(&mut self, base: &Path) {
        for card in &mut self.products {
            resolve_in_place(&mut card.data_image, base);
            resolve_in_place(&mut card.image, base);
        }
        for card in &mut self.albums {
            resolve_in_place(&mut card.src, base);
            resolve_in_place(&mut card.artwork, base);
        }
        for value in self.sources.values_mut() {
            *value = resolve_asset(value, base);
        }
    }
}

fn resolve_in_place(slot: &mut Option<String>, base: &Path) {
    if let Some(value) = slot.as_mut() {
        *value = resolve_asset(value, base);
    }
}

/// URLs, absolute paths and blank values are kept as they are.
pub fn resolve_asset(value: &str, base: &Path) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.contains("://") || Path::new(trimmed).is_absolute() {
        return value.to_string();
    }
    base.join(trimmed).to_string_lossy().into_owned()
}
