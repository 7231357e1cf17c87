use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LearnoraError>;

#[derive(Debug, Error)]
pub enum LearnoraError {
  #[error("Stored conversations could not be read: {0}")]
  MalformedStoredState(String),

  #[error("Failed to fetch: {0}")]
  NetworkUnreachable(String),

  #[error("Server error: {status} {reason}. {body}")]
  HttpError { status: u16, reason: String, body: String },

  #[error("Failed to parse JSON response. The server may have returned HTML instead of JSON. Response: {0}")]
  MalformedResponseBody(String),

  #[error("{0}")]
  BackendReportedError(String),

  #[error("Malformed link markup: {0}")]
  MalformedMarkupSegment(String),

  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),

  #[error("JSON error: {0}")]
  Json(#[from] serde_json::Error),
}

/// Coarse classification of a failed search, used to pick the diagnostic shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCategory {
  NotFound,
  Unreachable,
  ServerError,
  Unknown,
}

impl LearnoraError {
  pub fn category(&self) -> FailureCategory {
    match self {
      LearnoraError::NetworkUnreachable(_) => FailureCategory::Unreachable,
      LearnoraError::HttpError { status: 404, .. } => FailureCategory::NotFound,
      LearnoraError::HttpError { reason, body, .. } => {
        if mentions_not_found(reason) || mentions_not_found(body) {
          FailureCategory::NotFound
        } else {
          FailureCategory::ServerError
        }
      }
      LearnoraError::BackendReportedError(text) | LearnoraError::MalformedResponseBody(text)
        if mentions_not_found(text) =>
      {
        FailureCategory::NotFound
      }
      _ => FailureCategory::Unknown,
    }
  }
}

fn mentions_not_found(text: &str) -> bool {
  text.contains("404") || text.contains("Not Found")
}
