//! Admint is a creative asset generation engine.
//!
//! It turns a pool of blank ad templates into finished "creatives" by
//! compositing a brand logo onto each one, static rasters and
//! multi-frame animations alike, with collision-free date-stamped
//! names, randomized non-repeating template selection, and a request
//! quota with cooldown in front of every remote fetch.
#![forbid(unsafe_code)]

pub mod compose;
pub mod config;
pub mod decode;
pub mod error;
pub mod logo;
pub mod market;
pub mod names;
pub mod palette;
pub mod pipeline;
pub mod pool;
pub mod quota;
pub mod store;

pub use compose::{Compositor, Creative};
pub use config::{Canvas, GeneratorConfig};
pub use error::{AdmintError, AdmintResult};
pub use logo::{Logo, LogoProvider, StoreLogoProvider};
pub use market::language_for_country;
pub use names::{creative_names, names_for_date};
pub use pipeline::{
    AbortReason, GenerationPipeline, GenerationRequest, Quantity, RunOutcome, RunSummary,
    TemplateFilter,
};
pub use pool::Template;
pub use quota::QuotaGate;
pub use store::{AssetEntry, DirStore, EntryFilter, EntryKind, MediaKind, RemoteAssetStore};
