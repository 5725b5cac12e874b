use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::client::{HttpShortener, Shortener};
use crate::config::Config;
use crate::dataset::{Dataset, Distribution};
use crate::generator::{seed_urls, UrlSynthesizer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateSummary {
    pub requested: usize,
    pub created: usize,
    pub failed: usize,
    pub seed: u64,
    pub distribution: Distribution,
    pub output: PathBuf,
}

pub async fn generate(cfg: &Config) -> Result<GenerateSummary> {
    let client = HttpShortener::new(&cfg.target)?;
    generate_with(&client, cfg).await
}

/// Full seeding pipeline against any [`Shortener`].
pub async fn generate_with<S>(client: &S, cfg: &Config) -> Result<GenerateSummary>
where
    S: Shortener + ?Sized,
{
    cfg.check()?;
    if let Err(e) = client.health().await {
        warn!(kind = e.kind(), error = %e, "health probe failed");
        anyhow::bail!(
            "shortening service is not available at {}; start the application first ({e})",
            cfg.target.base_url
        );
    }

    let seed = cfg.dataset.seed.unwrap_or_else(rand::random);
    let requested = cfg.dataset.count;
    info!(
        base_url = %cfg.target.base_url,
        count = requested,
        output = %cfg.dataset.output.display(),
        seed,
        "test dataset generator"
    );

    let mut synthesizer = UrlSynthesizer::new(cfg.dataset.domains.clone(), seed);
    let outcome = seed_urls(client, &mut synthesizer, requested, cfg.dataset.progress_every).await;
    let created = outcome.entries.len();
    anyhow::ensure!(
        created > 0,
        "no URLs were created out of {requested} attempts; check the shortening service"
    );

    let plan = cfg.distribution.plan();
    let partitions = plan.partition(outcome.entries, requested, &cfg.distribution.invalid_prefix);
    let dataset = Dataset::new(partitions, cfg.dataset.description.clone());
    let distribution = dataset.metadata.distribution;
    info!(
        hot = distribution.hot,
        warm = distribution.warm,
        cold = distribution.cold,
        invalid = distribution.invalid,
        "categorized URLs"
    );

    dataset
        .write_to(&cfg.dataset.output)
        .context("write dataset")?;
    info!(output = %cfg.dataset.output.display(), "dataset saved");
    for (step, hint) in next_steps(&cfg.dataset.output).iter().enumerate() {
        info!(step = step + 1, hint = %hint, "next step");
    }

    Ok(GenerateSummary {
        requested,
        created,
        failed: outcome.failed,
        seed,
        distribution,
        output: cfg.dataset.output.clone(),
    })
}

/// Follow-up instructions printed after a successful run.
pub fn next_steps(output: &Path) -> [String; 3] {
    [
        "use this dataset in the k6 test scenarios".to_string(),
        "run every benchmark phase against the same dataset".to_string(),
        format!("dataset file: {}", output.display()),
    ]
}

/// Load a dataset written by [`generate`] and check its header.
pub fn inspect(path: &Path) -> Result<Dataset> {
    let dataset = Dataset::read_from(path)?;
    dataset
        .verify()
        .with_context(|| format!("inconsistent dataset {}", path.display()))?;
    let d = dataset.metadata.distribution;
    info!(
        path = %path.display(),
        created_at = %dataset.metadata.created_at,
        total_urls = dataset.metadata.total_urls,
        hot = d.hot,
        warm = d.warm,
        cold = d.cold,
        invalid = d.invalid,
        "dataset ok"
    );
    Ok(dataset)
}
