use std::{fs, str::FromStr};

use rand::{Rng, SeedableRng as _, rngs::StdRng};
use tracing::{info, warn};

use crate::{
    compose::{Compositor, Creative},
    config::GeneratorConfig,
    error::{AdmintError, AdmintResult},
    logo::Logo,
    names::creative_names,
    pool,
    quota::QuotaGate,
    store::RemoteAssetStore,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// How many creatives to generate: an explicit number (clamped to the
/// pool size) or everything the pool offers.
pub enum Quantity {
    All,
    Count(u32),
}

impl Quantity {
    /// Effective target for a pool of `pool_len` candidates.
    pub fn resolve(self, pool_len: usize) -> usize {
        match self {
            Self::All => pool_len,
            Self::Count(n) => pool_len.min(n as usize),
        }
    }
}

impl FromStr for Quantity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse::<u32>()
            .map(Self::Count)
            .map_err(|_| format!("quantity must be a number or 'all', got '{s}'"))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Template narrowing for one request.
///
/// `Any` means "no specific templates requested" and falls through to
/// the full pool; `Named` with zero matches aborts the run. The two are
/// deliberately distinct variants because their failure semantics differ.
pub enum TemplateFilter {
    Any,
    Named(Vec<String>),
}

#[derive(Clone, Debug)]
/// One generation request: which pool, for which site, how many.
pub struct GenerationRequest {
    pub language: String,
    pub site: String,
    pub quantity: Quantity,
    pub filter: TemplateFilter,
    pub tag: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Why a run ended before producing any output.
pub enum AbortReason {
    /// Pool resolution found nothing.
    NoTemplates,
    /// The substring filter eliminated every candidate.
    NoMatch,
}

#[derive(Clone, Debug)]
/// A completed run: the creatives written, in generation order, plus how
/// many items were attempted (so callers can report "N of M succeeded").
pub struct RunSummary {
    pub creatives: Vec<Creative>,
    pub attempted: usize,
}

#[derive(Clone, Debug)]
/// Outcome of one generation run. `Aborted` never leaves partial output.
pub enum RunOutcome {
    Completed(RunSummary),
    Aborted(AbortReason),
}

/// Orchestrates one generation run: resolve pool, sample, fetch through
/// the quota gate, composite, write.
///
/// Collaborators are injected; the gate in particular is owned by the
/// caller so its counter spans every run in the process.
pub struct GenerationPipeline<'a> {
    config: &'a GeneratorConfig,
    store: &'a dyn RemoteAssetStore,
    gate: &'a mut QuotaGate,
}

impl<'a> GenerationPipeline<'a> {
    pub fn new(
        config: &'a GeneratorConfig,
        store: &'a dyn RemoteAssetStore,
        gate: &'a mut QuotaGate,
    ) -> Self {
        Self {
            config,
            store,
            gate,
        }
    }

    /// Run with entropy-seeded sampling.
    pub fn run(&mut self, request: &GenerationRequest, logo: &Logo) -> AdmintResult<RunOutcome> {
        self.run_with_rng(request, logo, &mut StdRng::from_entropy())
    }

    /// Run with caller-supplied randomness, for reproducible sampling.
    pub fn run_with_rng<R: Rng>(
        &mut self,
        request: &GenerationRequest,
        logo: &Logo,
        rng: &mut R,
    ) -> AdmintResult<RunOutcome> {
        let pool = pool::resolve(
            self.store,
            &self.config.templates_folder_id,
            &request.language,
            request.tag.as_deref(),
        )?;
        if pool.is_empty() {
            warn!(
                language = %request.language,
                tag = request.tag.as_deref().unwrap_or(""),
                "no templates for request"
            );
            return Ok(RunOutcome::Aborted(AbortReason::NoTemplates));
        }

        let pool = match &request.filter {
            TemplateFilter::Any => pool,
            TemplateFilter::Named(specs) => {
                let filtered = pool::filter_by_substrings(pool, specs);
                if filtered.is_empty() {
                    warn!(specs = ?specs, "no template matched the requested names");
                    return Ok(RunOutcome::Aborted(AbortReason::NoMatch));
                }
                filtered
            }
        };

        let target = request.quantity.resolve(pool.len());
        if target == 0 {
            return Ok(RunOutcome::Aborted(AbortReason::NoTemplates));
        }

        let out_dir = self
            .config
            .output_root
            .join(format!("{}_{}", request.language, request.site));
        fs::create_dir_all(&out_dir)?;

        let compositor = Compositor::new(self.config.canvas, logo, self.config.logo_margin)?;
        let picks = sample_indices(pool.len(), target, rng);
        let names = creative_names(target);

        let mut creatives = Vec::with_capacity(target);
        for (name, index) in names.into_iter().zip(picks) {
            let template = &pool[index];
            info!(template = %template.name, creative = %name, "compositing");

            let store = self.store;
            let Some(bytes) = self.gate.call(|| store.fetch_bytes(&template.id)) else {
                warn!(template = %template.name, "fetch failed, skipping template");
                continue;
            };

            match compositor.render(template.kind, &bytes) {
                Ok(encoded) => {
                    let path = out_dir.join(format!("{name}.{}", template.kind.extension()));
                    fs::write(&path, &encoded)?;
                    creatives.push(Creative {
                        name,
                        format: template.kind,
                        path,
                    });
                }
                Err(AdmintError::Decode(msg)) => {
                    warn!(template = %template.name, error = %msg, "undecodable template, skipping");
                }
                Err(other) => return Err(other),
            }
        }

        info!(
            succeeded = creatives.len(),
            attempted = target,
            out_dir = %out_dir.display(),
            "generation run finished"
        );
        Ok(RunOutcome::Completed(RunSummary {
            creatives,
            attempted: target,
        }))
    }
}

/// Choose `count` distinct indices from `0..pool_len` uniformly at
/// random. Pure over the supplied RNG so the sampling decision can be
/// tested apart from the effectful fetch loop.
pub fn sample_indices<R: Rng>(pool_len: usize, count: usize, rng: &mut R) -> Vec<usize> {
    debug_assert!(count <= pool_len);
    rand::seq::index::sample(rng, pool_len, count).into_vec()
}
