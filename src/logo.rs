use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use image::{RgbaImage, imageops};
use tracing::{debug, warn};

use crate::{
    error::{AdmintError, AdmintResult},
    store::{EntryFilter, RemoteAssetStore},
};

/// Brand logo, decoded and resized once to the configured footprint.
/// Read-only for the rest of the run; one instance is shared across every
/// composite.
#[derive(Clone, Debug)]
pub struct Logo {
    image: RgbaImage,
}

impl Logo {
    /// Decode a logo file and resize it to the footprint.
    pub fn load(path: &Path, width: u32, height: u32) -> AdmintResult<Self> {
        let bytes = fs::read(path)?;
        let decoded = image::load_from_memory(&bytes)
            .map_err(|e| AdmintError::decode(format!("logo '{}': {e}", path.display())))?;
        Ok(Self::from_rgba(decoded.to_rgba8(), width, height))
    }

    /// Build a logo from an already-decoded image, resizing to the
    /// footprint.
    pub fn from_rgba(image: RgbaImage, width: u32, height: u32) -> Self {
        let image = imageops::resize(&image, width, height, imageops::FilterType::Lanczos3);
        Self { image }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// External lookup for a site's logo file.
pub trait LogoProvider {
    /// Filesystem path of the site's logo, or `None` when the site has no
    /// logo available.
    fn resolve_logo_path(&self, site: &str) -> AdmintResult<Option<PathBuf>>;
}

/// [`LogoProvider`] over a [`RemoteAssetStore`] logos folder with a local
/// download cache.
///
/// The store is consulted for an entry named `<site>.png`
/// (case-insensitive, site trimmed); the first hit is downloaded into the
/// cache directory and reused on later runs.
pub struct StoreLogoProvider<'a> {
    store: &'a dyn RemoteAssetStore,
    folder_id: String,
    cache_dir: PathBuf,
}

impl<'a> StoreLogoProvider<'a> {
    pub fn new(
        store: &'a dyn RemoteAssetStore,
        folder_id: impl Into<String>,
        cache_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            store,
            folder_id: folder_id.into(),
            cache_dir: cache_dir.into(),
        }
    }
}

impl LogoProvider for StoreLogoProvider<'_> {
    fn resolve_logo_path(&self, site: &str) -> AdmintResult<Option<PathBuf>> {
        let site = site.trim();
        let wanted = format!("{site}.png").to_lowercase();

        let cached = self.cache_dir.join(format!("{site}.png"));
        if cached.is_file() {
            debug!(site, path = %cached.display(), "logo cache hit");
            return Ok(Some(cached));
        }

        let children = self.store.list_children(&self.folder_id, EntryFilter::Any)?;
        let Some(entry) = children.iter().find(|e| e.name.to_lowercase() == wanted) else {
            warn!(site, folder = %self.folder_id, "no logo entry found");
            return Ok(None);
        };

        let bytes = self
            .store
            .fetch_bytes(&entry.id)
            .with_context(|| format!("download logo '{}'", entry.name))?;
        fs::create_dir_all(&self.cache_dir)?;
        fs::write(&cached, bytes)?;
        debug!(site, path = %cached.display(), "logo cached");
        Ok(Some(cached))
    }
}
