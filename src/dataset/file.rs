use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;

use super::Partitions;

/// Bucket sizes recorded in the file header
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Distribution {
    pub hot: usize,
    pub warm: usize,
    pub cold: usize,
    pub invalid: usize,
}

impl Distribution {
    pub fn of(partitions: &Partitions) -> Self {
        Self {
            hot: partitions.hot.len(),
            warm: partitions.warm.len(),
            cold: partitions.cold.len(),
            invalid: partitions.invalid.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(deserialize_with = "lenient_timestamp")]
    pub created_at: DateTime<FixedOffset>,
    /// Number of entries actually created, not the requested count.
    pub total_urls: usize,
    pub distribution: Distribution,
    pub description: String,
}

/// Accepts RFC 3339, or an ISO 8601 timestamp without offset read as local time.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<DateTime<FixedOffset>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(ts) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(ts);
    }
    let naive = NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map_err(|e| serde::de::Error::custom(format!("createdAt {raw:?}: {e}")))?;
    Ok(Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|ts| ts.fixed_offset())
        .unwrap_or_else(|| Utc.from_utc_datetime(&naive).fixed_offset()))
}

/// Contents of a dataset file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub metadata: Metadata,
    pub data: Partitions,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DatasetError {
    #[error("metadata distribution {recorded:?} does not match bucket contents {actual:?}")]
    DistributionMismatch {
        recorded: Distribution,
        actual: Distribution,
    },

    #[error("metadata totalUrls is {recorded} but buckets hold {actual} entries")]
    TotalMismatch { recorded: usize, actual: usize },
}

impl Dataset {
    pub fn new(data: Partitions, description: impl Into<String>) -> Self {
        Self {
            metadata: Metadata {
                created_at: Local::now().fixed_offset(),
                total_urls: data.created_len(),
                distribution: Distribution::of(&data),
                description: description.into(),
            },
            data,
        }
    }

    /// Check that the header agrees with the buckets.
    pub fn verify(&self) -> Result<(), DatasetError> {
        let actual = Distribution::of(&self.data);
        if self.metadata.distribution != actual {
            return Err(DatasetError::DistributionMismatch {
                recorded: self.metadata.distribution,
                actual,
            });
        }
        let created = self.data.created_len();
        if self.metadata.total_urls != created {
            return Err(DatasetError::TotalMismatch {
                recorded: self.metadata.total_urls,
                actual: created,
            });
        }
        Ok(())
    }

    /// Pretty-print to `path`, creating parent directories as needed.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("create {}", parent.display()))?;
        }
        let file = fs::File::create(path).with_context(|| format!("create {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self).context("serialize dataset")?;
        writer.write_all(b"\n")?;
        writer
            .flush()
            .with_context(|| format!("write {}", path.display()))?;
        Ok(())
    }

    pub fn read_from(path: &Path) -> Result<Self> {
        let raw = fs::read(path).with_context(|| format!("read {}", path.display()))?;
        serde_json::from_slice(&raw).with_context(|| format!("parse {}", path.display()))
    }
}
