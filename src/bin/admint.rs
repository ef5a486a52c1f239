use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use rand::{SeedableRng as _, rngs::StdRng};

use admint::{
    AbortReason, DirStore, GenerationPipeline, GenerationRequest, GeneratorConfig, Logo,
    LogoProvider as _, Quantity, QuotaGate, RunOutcome, StoreLogoProvider, TemplateFilter,
    language_for_country,
};

#[derive(Parser, Debug)]
#[command(name = "admint", version)]
#[command(about = "Generate logo-branded ad creatives from a template pool")]
struct Cli {
    /// Root directory of the asset store (template and logo folders).
    #[arg(long)]
    assets: PathBuf,

    /// Site the creatives are branded for (also the logo lookup key).
    #[arg(long)]
    site: String,

    /// Template-folder language, e.g. `english-uk`.
    #[arg(long, conflicts_with = "country")]
    language: Option<String>,

    /// Campaign country slug, mapped to a language folder.
    #[arg(long)]
    country: Option<String>,

    /// How many creatives to generate: a number or `all`.
    #[arg(long, default_value = "all")]
    quantity: Quantity,

    /// Tag folder overriding the language folder, e.g. `T1`.
    #[arg(long)]
    tag: Option<String>,

    /// Only use templates whose name contains one of these substrings.
    /// Repeatable.
    #[arg(long = "template")]
    templates: Vec<String>,

    /// Explicit logo file, bypassing the store lookup.
    #[arg(long)]
    logo: Option<PathBuf>,

    /// Optional JSON config overriding the stock ad-slot setup.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for reproducible template sampling.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "admint=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => GeneratorConfig::from_json_path(path)?,
        None => GeneratorConfig::default(),
    };

    let language = match (&cli.language, &cli.country) {
        (Some(language), _) => language.clone(),
        (None, Some(country)) => language_for_country(country)
            .with_context(|| format!("no language mapping for country '{country}'"))?
            .to_string(),
        (None, None) => anyhow::bail!("pass either --language or --country"),
    };

    let store = DirStore::new(&cli.assets);

    let logo_path = match &cli.logo {
        Some(path) => path.clone(),
        None => {
            let provider =
                StoreLogoProvider::new(&store, &config.logos_folder_id, &config.logo_cache_dir);
            provider
                .resolve_logo_path(&cli.site)?
                .with_context(|| format!("no logo found for site '{}'", cli.site))?
        }
    };
    let logo = Logo::load(&logo_path, config.logo_width, config.logo_height)?;

    let request = GenerationRequest {
        language,
        site: cli.site.clone(),
        quantity: cli.quantity,
        filter: if cli.templates.is_empty() {
            TemplateFilter::Any
        } else {
            TemplateFilter::Named(cli.templates.clone())
        },
        tag: cli.tag.clone(),
    };

    let mut gate = QuotaGate::new(config.max_requests, config.cooldown());
    let mut pipeline = GenerationPipeline::new(&config, &store, &mut gate);

    let outcome = match cli.seed {
        Some(seed) => {
            pipeline.run_with_rng(&request, &logo, &mut StdRng::seed_from_u64(seed))?
        }
        None => pipeline.run(&request, &logo)?,
    };

    match outcome {
        RunOutcome::Completed(summary) => {
            for creative in &summary.creatives {
                eprintln!("wrote {}", creative.path.display());
            }
            eprintln!(
                "{} of {} creatives generated",
                summary.creatives.len(),
                summary.attempted
            );
            Ok(())
        }
        RunOutcome::Aborted(AbortReason::NoTemplates) => {
            anyhow::bail!("no templates found for the request")
        }
        RunOutcome::Aborted(AbortReason::NoMatch) => {
            anyhow::bail!("no template matched the requested names")
        }
    }
}
