use anyhow::Result;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::StatusCode;
use std::time::Duration;
use tracing::debug;

use super::ClientError;
use crate::config::TargetConfig;
use crate::domain::{CreateUrlRequest, CreateUrlResponse};

#[async_trait]
pub trait Shortener: Send + Sync {
    /// Probe the service before seeding. Only `200 OK` counts as healthy.
    async fn health(&self) -> Result<(), ClientError>;

    async fn create(&self, request: &CreateUrlRequest) -> Result<CreateUrlResponse, ClientError>;
}

/// HTTP client for a shortening service exposing `POST /urls` and `GET /admin/health`.
#[derive(Clone)]
pub struct HttpShortener {
    base_url: String,
    create_path: String,
    health_path: String,
    health_timeout: Duration,
    client: reqwest::Client,
}

impl HttpShortener {
    pub fn new(target: &TargetConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("shortlink-seeder/", env!("CARGO_PKG_VERSION"))),
        );
        let client = reqwest::Client::builder()
            .timeout(target.http_timeout())
            .default_headers(headers)
            .build()?;
        Ok(Self {
            base_url: target.base_url.trim_end_matches('/').to_string(),
            create_path: target.create_path.clone(),
            health_path: target.health_path.clone(),
            health_timeout: target.health_timeout(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl Shortener for HttpShortener {
    async fn health(&self) -> Result<(), ClientError> {
        let url = self.endpoint(&self.health_path);
        let resp = self
            .client
            .get(&url)
            .timeout(self.health_timeout)
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                url: url.clone(),
                source,
            })?;
        let status = resp.status();
        if status != StatusCode::OK {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Status { url, status, body });
        }
        debug!(%url, "health probe ok");
        Ok(())
    }

    async fn create(&self, request: &CreateUrlRequest) -> Result<CreateUrlResponse, ClientError> {
        let url = self.endpoint(&self.create_path);
        let resp = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                url: url.clone(),
                source,
            })?;
        let status = resp.status();
        let body = resp.text().await.map_err(|source| ClientError::Transport {
            url: url.clone(),
            source,
        })?;
        if !status.is_success() {
            return Err(ClientError::Status { url, status, body });
        }

        serde_json::from_str(&body).map_err(|e| ClientError::Malformed {
            url,
            reason: e.to_string(),
        })
    }
}
