use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::error::{AdmintError, AdmintResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Raster media class of a template or creative.
pub enum MediaKind {
    StaticRaster,
    AnimatedRaster,
}

impl MediaKind {
    /// Classify a store media type string.
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "image/png" => Some(Self::StaticRaster),
            "image/gif" => Some(Self::AnimatedRaster),
            _ => None,
        }
    }

    /// Classify by file extension (lowercase, no dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "png" => Some(Self::StaticRaster),
            "gif" => Some(Self::AnimatedRaster),
            _ => None,
        }
    }

    /// Output file extension for creatives of this kind.
    pub fn extension(self) -> &'static str {
        match self {
            Self::StaticRaster => "png",
            Self::AnimatedRaster => "gif",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// What a store entry is, as far as the engine cares.
pub enum EntryKind {
    Folder,
    Media(MediaKind),
    Other,
}

#[derive(Clone, Debug)]
/// One child of a store folder.
pub struct AssetEntry {
    /// Opaque store handle, valid for `fetch_bytes`.
    pub id: String,
    pub name: String,
    pub kind: EntryKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Server-side narrowing for folder listings.
pub enum EntryFilter {
    Any,
    FoldersOnly,
    RasterOnly,
}

impl EntryFilter {
    pub fn admits(self, kind: EntryKind) -> bool {
        match self {
            Self::Any => true,
            Self::FoldersOnly => kind == EntryKind::Folder,
            Self::RasterOnly => matches!(kind, EntryKind::Media(_)),
        }
    }
}

/// Capability interface over whatever remote storage the surrounding
/// system uses. The engine never assumes a protocol, only this surface.
pub trait RemoteAssetStore {
    /// Children of `folder_id`, narrowed by `filter`, in store order.
    fn list_children(
        &self,
        folder_id: &str,
        filter: EntryFilter,
    ) -> AdmintResult<Vec<AssetEntry>>;

    /// Raw bytes of the entry `id`.
    fn fetch_bytes(&self, id: &str) -> AdmintResult<Vec<u8>>;
}

/// Filesystem-backed [`RemoteAssetStore`].
///
/// Folder ids are paths relative to the store root (the empty id is the
/// root itself); media kinds come from file extensions. Listings are
/// name-sorted so runs over the same tree are deterministic.
#[derive(Clone, Debug)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, id: &str) -> PathBuf {
        if id.is_empty() {
            self.root.clone()
        } else {
            self.root.join(id)
        }
    }

    fn child_id(folder_id: &str, name: &str) -> String {
        if folder_id.is_empty() {
            name.to_string()
        } else {
            format!("{folder_id}/{name}")
        }
    }
}

impl RemoteAssetStore for DirStore {
    fn list_children(
        &self,
        folder_id: &str,
        filter: EntryFilter,
    ) -> AdmintResult<Vec<AssetEntry>> {
        let dir = self.resolve(folder_id);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let read = fs::read_dir(&dir)
            .map_err(|e| AdmintError::fetch(format!("list '{}': {e}", dir.display())))?;

        let mut entries = Vec::new();
        for item in read {
            let item =
                item.map_err(|e| AdmintError::fetch(format!("list '{}': {e}", dir.display())))?;
            let name = item.file_name().to_string_lossy().into_owned();
            let kind = if item.path().is_dir() {
                EntryKind::Folder
            } else {
                extension_of(&item.path())
                    .and_then(|ext| MediaKind::from_extension(&ext))
                    .map(EntryKind::Media)
                    .unwrap_or(EntryKind::Other)
            };
            if filter.admits(kind) {
                entries.push(AssetEntry {
                    id: Self::child_id(folder_id, &name),
                    name,
                    kind,
                });
            }
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn fetch_bytes(&self, id: &str) -> AdmintResult<Vec<u8>> {
        let path = self.resolve(id);
        fs::read(&path).map_err(|e| AdmintError::fetch(format!("read '{}': {e}", path.display())))
    }
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
}
