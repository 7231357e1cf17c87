//! Search results as returned by the roadmap backend
//!
//! A payload splits results into two branches, articles and videos. Field
//! names follow the backend's snake_case wire format.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

const VISIBLE_LABELS: usize = 3;

const YOUTUBE_ID_PATTERNS: &[&str] = &[
  r"(?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/)([^&\n?#]+)",
  r"youtube\.com/v/([^&\n?#]+)",
];

static YOUTUBE_ID: Lazy<Vec<Regex>> =
  Lazy::new(|| YOUTUBE_ID_PATTERNS.iter().filter_map(|p| Regex::new(p).ok()).collect());

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoadmapPayload {
  #[serde(default, deserialize_with = "null_as_default")]
  pub query: String,
  #[serde(default, deserialize_with = "null_as_default")]
  pub total_articles: u32,
  #[serde(default, deserialize_with = "null_as_default")]
  pub total_videos: u32,
  #[serde(default, deserialize_with = "null_as_default")]
  pub articles: Vec<Resource>,
  #[serde(default, deserialize_with = "null_as_default")]
  pub videos: Vec<Resource>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
}

impl RoadmapPayload {
  pub fn is_empty(&self) -> bool {
    self.articles.is_empty() && self.videos.is_empty()
  }

  /// Backend-reported failure, if the payload carries a non-empty error field
  pub fn reported_error(&self) -> Option<&str> {
    self.error.as_deref().map(str::trim).filter(|e| !e.is_empty())
  }

  /// Echoed query, or a neutral stand-in when the backend left it blank
  pub fn query_label(&self) -> &str {
    if self.query.trim().is_empty() {
      "your query"
    } else {
      &self.query
    }
  }

  pub fn summary(&self) -> String {
    format!(
      "I've found {} articles and {} videos for \"{}\". Here's your learning roadmap:",
      self.total_articles,
      self.total_videos,
      self.query_label()
    )
  }
}

/// Resource identifiers arrive as numbers or strings depending on the backend
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceId {
  Number(i64),
  Text(String),
}

impl fmt::Display for ResourceId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ResourceId::Number(n) => write!(f, "{n}"),
      ResourceId::Text(s) => write!(f, "{s}"),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
  pub id: ResourceId,
  #[serde(default, deserialize_with = "null_as_default")]
  pub title: String,
  #[serde(default, deserialize_with = "null_as_default")]
  pub source: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub link: Option<String>,
  #[serde(default, deserialize_with = "null_as_default")]
  pub labels: Vec<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub similarity_score: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub credibility_score: Option<f64>,
}

impl Resource {
  pub fn link(&self) -> Option<&str> {
    self.link.as_deref().map(str::trim).filter(|l| !l.is_empty())
  }

  pub fn visible_labels(&self) -> &[String] {
    let shown = self.labels.len().min(VISIBLE_LABELS);
    &self.labels[..shown]
  }

  /// Similarity as a rounded percentage; zero or missing scores get no badge
  pub fn score_percent(&self) -> Option<u32> {
    match self.similarity_score {
      Some(score) if score > 0.0 && score.is_finite() => {
        Some((score.clamp(0.0, 1.0) * 100.0).round() as u32)
      }
      _ => None,
    }
  }

  /// Host and path of the link, or the raw link when it does not parse
  pub fn link_text(&self) -> Option<String> {
    let link = self.link()?;
    match url::Url::parse(link) {
      Ok(parsed) => match parsed.host_str() {
        Some(host) => Some(format!("{}{}", host, parsed.path())),
        None => Some(link.to_string()),
      },
      Err(_) => Some(link.to_string()),
    }
  }

  pub fn youtube_thumbnail(&self) -> Option<String> {
    self.link().and_then(youtube_thumbnail)
  }
}

/// The backend passes missing values through as `null`; treat them like absent keys
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
  D: Deserializer<'de>,
  T: Default + Deserialize<'de>,
{
  Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

pub fn youtube_video_id(link: &str) -> Option<&str> {
  YOUTUBE_ID
    .iter()
    .find_map(|pattern| pattern.captures(link).and_then(|caps| caps.get(1)))
    .map(|m| m.as_str())
}

pub fn is_youtube_video(link: &str) -> bool {
  youtube_video_id(link).is_some()
}

pub fn youtube_thumbnail(link: &str) -> Option<String> {
  youtube_video_id(link).map(|id| format!("https://img.youtube.com/vi/{id}/maxresdefault.jpg"))
}
