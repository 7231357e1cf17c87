//! Inline `[label](url)` link rendering for message text
//!
//! `render_segments` is a pure single pass over one line. It never fails:
//! markup that does not form a valid http(s) link comes back as plain text,
//! verbatim.

use serde::{Deserialize, Serialize};

use crate::{LearnoraError, Result};

const ALLOWED_SCHEMES: &[&str] = &["http://", "https://"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Segment {
  PlainText(String),
  Link { label: String, url: String },
}

impl Segment {
  pub fn plain(text: impl Into<String>) -> Self {
    Segment::PlainText(text.into())
  }

  /// Build a link from captured label and url, trimming both.
  /// Empty parts or a scheme other than http(s) are rejected.
  pub fn link(label: &str, url: &str) -> Result<Self> {
    let label = label.trim();
    let url = url.trim();

    if label.is_empty() || url.is_empty() {
      return Err(LearnoraError::MalformedMarkupSegment("empty label or url".to_string()));
    }
    if !ALLOWED_SCHEMES.iter().any(|scheme| url.starts_with(scheme)) {
      return Err(LearnoraError::MalformedMarkupSegment(format!("disallowed scheme in {url}")));
    }

    Ok(Segment::Link { label: label.to_string(), url: url.to_string() })
  }
}

/// A `[label](url)` occurrence located in a line, as byte offsets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LinkMatch {
  start: usize,
  end: usize,
  label: (usize, usize),
  url: (usize, usize),
}

/// Split a line into plain-text and link segments, in order of appearance
pub fn render_segments(line: &str) -> Vec<Segment> {
  if line.is_empty() {
    return Vec::new();
  }

  let mut segments = Vec::new();
  let mut last_end = 0;
  let mut cursor = 0;

  while let Some(found) = next_link(line, cursor) {
    if found.start > last_end {
      segments.push(Segment::plain(&line[last_end..found.start]));
    }

    let label = &line[found.label.0..found.label.1];
    let url = &line[found.url.0..found.url.1];
    match Segment::link(label, url) {
      Ok(link) => segments.push(link),
      Err(_) => segments.push(Segment::plain(&line[found.start..found.end])),
    }

    last_end = found.end;
    cursor = found.end;
  }

  if last_end < line.len() {
    segments.push(Segment::plain(&line[last_end..]));
  }

  segments
}

/// Find the leftmost `[` at or after `from` that opens a complete link.
///
/// The label runs to the first `]` and must be non-empty; `(` must follow
/// immediately; the url runs to the first `)` and must be non-empty.
fn next_link(line: &str, from: usize) -> Option<LinkMatch> {
  let bytes = line.as_bytes();
  let mut open = from;

  while open < bytes.len() {
    let start = open + line[open..].find('[')?;
    if let Some(found) = link_at(bytes, start) {
      return Some(found);
    }
    open = start + 1;
  }

  None
}

fn link_at(bytes: &[u8], start: usize) -> Option<LinkMatch> {
  let label_start = start + 1;
  let label_end = label_start + bytes[label_start..].iter().position(|&b| b == b']')?;
  if label_end == label_start {
    return None;
  }

  let paren = label_end + 1;
  if bytes.get(paren) != Some(&b'(') {
    return None;
  }

  let url_start = paren + 1;
  let url_end = url_start + bytes.get(url_start..)?.iter().position(|&b| b == b')')?;
  if url_end == url_start {
    return None;
  }

  Some(LinkMatch {
    start,
    end: url_end + 1,
    label: (label_start, label_end),
    url: (url_start, url_end),
  })
}

/// How a single line of message text is presented
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedLine {
  /// Line wrapped in `**`, shown as a heading without the markers
  Heading(String),
  Divider,
  /// Blank line
  Break,
  /// Numbered list entry, shown as-is
  Item(String),
  /// Indented detail under an item
  Detail(Vec<Segment>),
  Text(Vec<Segment>),
}

pub fn classify_line(line: &str) -> RenderedLine {
  if line.starts_with("**") && line.ends_with("**") {
    RenderedLine::Heading(line.replace("**", ""))
  } else if line.starts_with("---") {
    RenderedLine::Divider
  } else if is_numbered_item(line) {
    RenderedLine::Item(line.to_string())
  } else if line.starts_with("   ") && !line.trim().is_empty() {
    RenderedLine::Detail(render_segments(line))
  } else if line.trim().is_empty() {
    RenderedLine::Break
  } else {
    RenderedLine::Text(render_segments(line))
  }
}

/// Classify every line of a message
pub fn render_text(text: &str) -> Vec<RenderedLine> {
  text.lines().map(classify_line).collect()
}

fn is_numbered_item(line: &str) -> bool {
  let digits = line.bytes().take_while(u8::is_ascii_digit).count();
  digits > 0 && line.as_bytes().get(digits) == Some(&b'.')
}
