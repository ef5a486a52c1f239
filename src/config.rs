use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::error::AdmintResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// Fixed output pixel dimensions every creative must match.
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Engine configuration. Every field has a serde default so partial JSON
/// overrides compose with the stock ad-slot setup.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Ad slot dimensions.
    pub canvas: Canvas,
    /// Logo footprint after the one-time resize.
    pub logo_width: u32,
    pub logo_height: u32,
    /// Inset from the bottom-right canvas corner, in pixels.
    pub logo_margin: u32,
    /// Remote-call ceiling before a mandatory cooldown.
    pub max_requests: u32,
    /// Cooldown window after the ceiling is hit, in seconds.
    pub cooldown_secs: u64,
    /// Root directory creatives are written under.
    pub output_root: PathBuf,
    /// Local cache directory for downloaded logos.
    pub logo_cache_dir: PathBuf,
    /// Store folder id holding per-language template folders.
    pub templates_folder_id: String,
    /// Store folder id holding `<site>.png` logos.
    pub logos_folder_id: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            canvas: Canvas::new(336, 280),
            logo_width: 45,
            logo_height: 14,
            logo_margin: 10,
            max_requests: 3000,
            cooldown_secs: 3600,
            output_root: PathBuf::from("output"),
            logo_cache_dir: PathBuf::from("logos"),
            templates_folder_id: String::from("templates"),
            logos_folder_id: String::from("logos"),
        }
    }
}

impl GeneratorConfig {
    /// Load configuration from a JSON file. Missing fields fall back to
    /// the defaults above.
    pub fn from_json_path(path: &Path) -> AdmintResult<Self> {
        let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
        let r = BufReader::new(f);
        let config: GeneratorConfig =
            serde_json::from_reader(r).with_context(|| "parse config JSON")?;
        Ok(config)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }
}
