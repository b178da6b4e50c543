//! Where post lists come from.

use crate::error::FetchError;
use crate::post::{decode_posts, PostRecord};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

/// Remote API settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL; posts are read from `{base_url}/post`.
    pub base_url: String,
    /// Board section passed as `?section=`.
    pub section: String,
    /// Upper bound for one fetch, in milliseconds.
    pub timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/api".to_string(),
            section: "default".to_string(),
            timeout_ms: 10_000,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms.max(1))
    }

    /// URL of the post list, without the query string.
    pub fn posts_url(&self) -> String {
        format!("{}/post", self.base_url.trim_end_matches('/'))
    }
}

/// A provider of the current post list.
#[async_trait]
pub trait PostSource: Send + Sync {
    /// Fetch the full list. One call per refresh.
    async fn fetch_posts(&self) -> Result<Vec<PostRecord>, FetchError>;
}

/// Reads posts from the board's HTTP API.
#[derive(Debug, Clone)]
pub struct HttpPostSource {
    client: reqwest::Client,
    url: String,
    section: String,
}

impl HttpPostSource {
    pub fn new(config: &ApiConfig) -> Result<Self, FetchError> {
        let url = config.posts_url();
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|source| FetchError::Http {
                url: url.clone(),
                source,
            })?;
        Ok(Self {
            client,
            url,
            section: config.section.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl PostSource for HttpPostSource {
    async fn fetch_posts(&self) -> Result<Vec<PostRecord>, FetchError> {
        debug!(url = %self.url, section = %self.section, "Fetching posts");
        let http_error = |source| FetchError::Http {
            url: self.url.clone(),
            source,
        };

        let response = self
            .client
            .get(&self.url)
            .query(&[("section", self.section.as_str())])
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(http_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(http_error)?;
        let value = serde_json::from_slice(&body)
            .map_err(|err| FetchError::Decode(err.to_string()))?;
        decode_posts(value)
    }
}

/// Reads posts from a JSON file on disk, re-read on every refresh.
#[derive(Debug, Clone)]
pub struct FilePostSource {
    path: PathBuf,
}

impl FilePostSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl PostSource for FilePostSource {
    async fn fetch_posts(&self) -> Result<Vec<PostRecord>, FetchError> {
        debug!(path = %self.path.display(), "Reading posts");
        let contents = tokio::fs::read(&self.path)
            .await
            .map_err(|source| FetchError::Io {
                path: self.path.display().to_string(),
                source,
            })?;
        let value = serde_json::from_slice(&contents)
            .map_err(|err| FetchError::Decode(err.to_string()))?;
        decode_posts(value)
    }
}
