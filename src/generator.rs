//! Synthetic URL generation and the sequential seeding loop.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

use crate::client::Shortener;
use crate::domain::{CreateUrlRequest, ShortUrlEntry};

/// Produces original URLs of the form `{domain}/test/{index}/{nnnn}`.
pub struct UrlSynthesizer {
    rng: StdRng,
    domains: Vec<String>,
}

impl UrlSynthesizer {
    pub fn new(domains: Vec<String>, seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            domains,
        }
    }

    pub fn url_for(&mut self, index: usize) -> String {
        let domain = self
            .domains
            .choose(&mut self.rng)
            .map(|d| d.trim_end_matches('/'))
            .unwrap_or("https://example.com");
        let suffix: u16 = self.rng.gen_range(1000..=9999);
        format!("{domain}/test/{index}/{suffix}")
    }
}

#[derive(Debug, Default)]
pub struct SeedOutcome {
    /// Created entries in creation order.
    pub entries: Vec<ShortUrlEntry>,
    pub failed: usize,
}

const PREALLOC_LIMIT: usize = 4096;

fn initial_capacity(count: usize) -> usize {
    count.min(PREALLOC_LIMIT)
}

/// Create `count` short URLs one after another. Failed items are logged and skipped.
pub async fn seed_urls<S>(
    client: &S,
    synthesizer: &mut UrlSynthesizer,
    count: usize,
    progress_every: usize,
) -> SeedOutcome
where
    S: Shortener + ?Sized,
{
    let mut outcome = SeedOutcome {
        entries: Vec::with_capacity(initial_capacity(count)),
        failed: 0,
    };

    info!(count, "creating test URLs");

    for index in 0..count {
        let request = CreateUrlRequest::new(synthesizer.url_for(index));
        match client.create(&request).await {
            Ok(resp) => outcome
                .entries
                .push(ShortUrlEntry::from_response(&request, resp)),
            Err(e) => {
                outcome.failed += 1;
                warn!(
                    original_url = %request.original_url,
                    kind = e.kind(),
                    error = %e,
                    "failed to create short URL"
                );
            }
        }

        let attempted = index + 1;
        if progress_every > 0 && attempted % progress_every == 0 {
            info!(attempted, count, created = outcome.entries.len(), "progress");
        }
    }

    info!(
        created = outcome.entries.len(),
        failed = outcome.failed,
        "finished creating URLs"
    );
    outcome
}
