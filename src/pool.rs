use tracing::{debug, warn};

use crate::{
    error::AdmintResult,
    store::{EntryFilter, EntryKind, MediaKind, RemoteAssetStore},
};

#[derive(Clone, Debug, PartialEq, Eq)]
/// A blank template asset awaiting a logo overlay. Identity is the store
/// handle; templates are immutable once listed.
pub struct Template {
    pub id: String,
    pub name: String,
    pub kind: MediaKind,
}

/// Resolve the candidate templates for a language, or for a tag folder
/// when one is given.
///
/// Folder lookup is an exact, case-sensitive name match under the
/// template root. A missing folder yields an empty pool ("no work to
/// do"), not an error. Within the folder only static/animated raster
/// entries survive.
pub fn resolve(
    store: &dyn RemoteAssetStore,
    templates_folder_id: &str,
    language: &str,
    tag: Option<&str>,
) -> AdmintResult<Vec<Template>> {
    let folder_name = tag.unwrap_or(language);

    let folders = store.list_children(templates_folder_id, EntryFilter::FoldersOnly)?;
    let Some(folder) = folders.iter().find(|f| f.name == folder_name) else {
        warn!(folder = folder_name, "template folder not found");
        return Ok(Vec::new());
    };

    let entries = store.list_children(&folder.id, EntryFilter::RasterOnly)?;
    let pool: Vec<Template> = entries
        .into_iter()
        .filter_map(|entry| match entry.kind {
            EntryKind::Media(kind) => Some(Template {
                id: entry.id,
                name: entry.name,
                kind,
            }),
            EntryKind::Folder | EntryKind::Other => None,
        })
        .collect();

    debug!(
        folder = folder_name,
        candidates = pool.len(),
        "template pool resolved"
    );
    Ok(pool)
}

/// Keep templates whose name contains ANY of the given substrings,
/// case-insensitively. An empty result means "nothing matched" and the
/// caller must abort that generation request.
pub fn filter_by_substrings(pool: Vec<Template>, specs: &[String]) -> Vec<Template> {
    let needles: Vec<String> = specs.iter().map(|s| s.to_lowercase()).collect();
    pool.into_iter()
        .filter(|template| {
            let name = template.name.to_lowercase();
            needles.iter().any(|needle| name.contains(needle))
        })
        .collect()
}
