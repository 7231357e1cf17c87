//! HTTP client for the roadmap search backend
//!
//! The backend exposes `GET /api/fishbone?q=<query>&k=<count>`, returning
//! results split into articles and videos, and `GET /api/health`.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::roadmap::RoadmapPayload;
use crate::{LearnoraError, Result};

const ERROR_BODY_PREVIEW: usize = 100;
const MALFORMED_BODY_PREVIEW: usize = 200;

/// Seam between the query flow and whatever answers searches
#[async_trait]
pub trait SearchBackend: Send + Sync {
  /// Fetch a roadmap for `query`, asking for `result_count` results
  async fn fetch_roadmap(&self, query: &str, result_count: usize) -> Result<RoadmapPayload>;

  /// Ask the backend whether it is up
  async fn health(&self) -> Result<HealthStatus>;

  /// Base URL used in user-facing diagnostics
  fn base_url(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
  pub status: String,
  #[serde(default)]
  pub server: Option<String>,
}

impl HealthStatus {
  pub fn is_ok(&self) -> bool {
    self.status.eq_ignore_ascii_case("ok")
  }
}

/// Configuration for the search HTTP client
#[derive(Debug, Clone)]
pub struct ClientConfig {
  /// Base URL of the search backend (e.g., "http://localhost:5001")
  pub base_url: String,
  pub timeout: Duration,
}

impl Default for ClientConfig {
  fn default() -> Self {
    Self { base_url: "http://localhost:5001".to_string(), timeout: Duration::from_secs(30) }
  }
}

pub struct HttpSearchClient {
  client: Client,
  config: ClientConfig,
}

impl HttpSearchClient {
  pub fn new(base_url: impl Into<String>) -> Result<Self> {
    Self::with_config(ClientConfig { base_url: base_url.into(), ..ClientConfig::default() })
  }

  pub fn with_config(config: ClientConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(config.timeout)
      .build()
      .map_err(|e| LearnoraError::NetworkUnreachable(e.to_string()))?;

    Ok(Self { client, config })
  }

  fn endpoint(&self, path: &str) -> String {
    format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
  }

  async fn get(&self, url: &str, query: &[(&str, String)]) -> Result<String> {
    debug!(%url, "GET");
    let response = self
      .client
      .get(url)
      .query(query)
      .header(CONTENT_TYPE, "application/json")
      .send()
      .await
      .map_err(|e| LearnoraError::NetworkUnreachable(e.to_string()))?;

    let status = response.status();
    let body =
      response.text().await.map_err(|e| LearnoraError::NetworkUnreachable(e.to_string()))?;

    if !status.is_success() {
      return Err(LearnoraError::HttpError {
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
        body: preview(&body, ERROR_BODY_PREVIEW),
      });
    }

    Ok(body)
  }
}

#[async_trait]
impl SearchBackend for HttpSearchClient {
  async fn fetch_roadmap(&self, query: &str, result_count: usize) -> Result<RoadmapPayload> {
    let url = self.endpoint("/api/fishbone");
    let params = [("q", query.to_string()), ("k", result_count.to_string())];
    let body = self.get(&url, &params).await?;

    let payload = parse_roadmap(&body)?;
    debug!(
      articles = payload.articles.len(),
      videos = payload.videos.len(),
      "roadmap received"
    );
    Ok(payload)
  }

  async fn health(&self) -> Result<HealthStatus> {
    let body = self.get(&self.endpoint("/api/health"), &[]).await?;
    serde_json::from_str(&body)
      .map_err(|_| LearnoraError::MalformedResponseBody(preview(&body, MALFORMED_BODY_PREVIEW)))
  }

  fn base_url(&self) -> &str {
    &self.config.base_url
  }
}

/// Parse a successful response body, surfacing a backend-reported error field
pub fn parse_roadmap(body: &str) -> Result<RoadmapPayload> {
  let payload: RoadmapPayload = serde_json::from_str(body)
    .map_err(|_| LearnoraError::MalformedResponseBody(preview(body, MALFORMED_BODY_PREVIEW)))?;

  if let Some(error) = payload.reported_error() {
    return Err(LearnoraError::BackendReportedError(error.to_string()));
  }

  Ok(payload)
}

fn preview(text: &str, max_chars: usize) -> String {
  text.chars().take(max_chars).collect()
}
