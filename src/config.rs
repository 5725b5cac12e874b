use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use validator::Validate;

use crate::dataset::PartitionPlan;

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
pub const ENV_PREFIX: &str = "SEEDER__";
/// Upper bound on `dataset.count`; keep in sync with the validator attribute below.
pub const MAX_DATASET_COUNT: usize = 10_000_000;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct Config {
    #[validate(nested)]
    pub target: TargetConfig,
    #[validate(nested)]
    pub dataset: DatasetConfig,
    #[validate(nested)]
    pub distribution: DistributionConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TargetConfig {
    #[validate(url)]
    pub base_url: String,
    pub create_path: String,
    pub health_path: String,
    #[validate(range(min = 1))]
    pub http_timeout_seconds: u64,
    #[validate(range(min = 1))]
    pub health_timeout_seconds: u64,
}

impl TargetConfig {
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_seconds)
    }

    pub fn health_timeout(&self) -> Duration {
        Duration::from_secs(self.health_timeout_seconds)
    }
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            create_path: "/urls".to_string(),
            health_path: "/admin/health".to_string(),
            http_timeout_seconds: 10,
            health_timeout_seconds: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DatasetConfig {
    #[validate(range(min = 1, max = 10_000_000))]
    pub count: usize,
    pub output: PathBuf,
    /// Seed for the URL synthesizer; a random seed is drawn when unset.
    pub seed: Option<u64>,
    #[validate(range(min = 1))]
    pub progress_every: usize,
    #[validate(length(min = 1))]
    pub domains: Vec<String>,
    pub description: String,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            count: 1000,
            output: PathBuf::from("step1-dataset.json"),
            seed: None,
            progress_every: 100,
            domains: vec![
                "https://example.com".to_string(),
                "https://example.org".to_string(),
                "https://example.net".to_string(),
            ],
            description: "Phase test dataset (Hot/Warm/Cold distribution)".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DistributionConfig {
    #[validate(range(max = 100))]
    pub hot_percent: u8,
    /// Cumulative bound: Hot plus Warm together cover this share of the requested count.
    #[validate(range(max = 100))]
    pub warm_percent: u8,
    #[validate(range(max = 100))]
    pub invalid_percent: u8,
    #[validate(length(min = 1))]
    pub invalid_prefix: String,
}

impl DistributionConfig {
    pub fn plan(&self) -> PartitionPlan {
        PartitionPlan {
            hot_percent: self.hot_percent,
            warm_percent: self.warm_percent,
            invalid_percent: self.invalid_percent,
        }
    }
}

impl Default for DistributionConfig {
    fn default() -> Self {
        let plan = PartitionPlan::default();
        Self {
            hot_percent: plan.hot_percent,
            warm_percent: plan.warm_percent,
            invalid_percent: plan.invalid_percent,
            invalid_prefix: "INVALID".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogConfig {
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

/// Values supplied on the command line; each one wins over every other layer.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub count: Option<usize>,
    pub output: Option<PathBuf>,
    pub seed: Option<u64>,
    pub log_format: Option<LogFormat>,
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH));
        Self::from_figment(
            Figment::new()
                .merge(Serialized::defaults(Config::default()))
                .merge(Toml::file(path))
                .merge(Env::prefixed(ENV_PREFIX).split("__")),
        )
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let cfg: Config = figment.extract().context("invalid configuration")?;
        Ok(cfg)
    }

    pub fn apply(mut self, overrides: Overrides) -> Self {
        if let Some(base_url) = overrides.base_url {
            self.target.base_url = base_url;
        }
        if let Some(count) = overrides.count {
            self.dataset.count = count;
        }
        if let Some(output) = overrides.output {
            self.dataset.output = output;
        }
        if overrides.seed.is_some() {
            self.dataset.seed = overrides.seed;
        }
        if let Some(format) = overrides.log_format {
            self.log.format = format;
        }
        self
    }

    pub fn check(&self) -> Result<()> {
        self.validate().context("configuration rejected")?;
        anyhow::ensure!(
            self.distribution.hot_percent <= self.distribution.warm_percent,
            "distribution.hot_percent ({}) must not exceed distribution.warm_percent ({})",
            self.distribution.hot_percent,
            self.distribution.warm_percent
        );
        Ok(())
    }
}
