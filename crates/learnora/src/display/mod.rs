use chrono::{DateTime, Local, Utc};
use colored::Colorize;

use crate::config::UserProfile;
use crate::conversation::{Conversation, ConversationId, Message, Sender};
use crate::output::rule;
use crate::render::{render_text, RenderedLine, Segment};
use crate::roadmap::{Resource, RoadmapPayload};

const WIDTH: usize = 80;
const TITLE_WIDTH: usize = 64;

pub const EMPTY_ROADMAP_TEXT: &str =
  "No learning resources found for this query. Try rephrasing your question.";

/// Convert UTC timestamp to a short local time
pub fn format_timestamp(utc_time: DateTime<Utc>) -> String {
  let local_time: DateTime<Local> = utc_time.into();
  local_time.format("%b %d, %Y %H:%M").to_string()
}

/// Inline segments joined into one terminal line; links show their target
pub fn format_segments(segments: &[Segment]) -> String {
  segments
    .iter()
    .map(|segment| match segment {
      Segment::PlainText(text) => text.clone(),
      Segment::Link { label, url } => {
        format!("{} ({})", label.cyan().underline(), url.dimmed())
      }
    })
    .collect()
}

pub fn format_text(text: &str) -> Vec<String> {
  render_text(text)
    .into_iter()
    .map(|line| match line {
      RenderedLine::Heading(heading) => heading.bold().to_string(),
      RenderedLine::Divider => rule(40, '─').dimmed().to_string(),
      RenderedLine::Break => String::new(),
      RenderedLine::Item(item) => item,
      RenderedLine::Detail(segments) | RenderedLine::Text(segments) => format_segments(&segments),
    })
    .collect()
}

pub fn format_message(message: &Message) -> Vec<String> {
  let author = match message.sender {
    Sender::User => "You".green().bold(),
    Sender::Bot => "Learnora".magenta().bold(),
  };
  let mut lines = vec![format!("{} {}", author, format_timestamp(message.timestamp).dimmed())];

  let body = format_text(&message.text);
  if message.failure.is_some() {
    lines.extend(body.into_iter().map(|l| l.yellow().to_string()));
  } else {
    lines.extend(body);
  }

  if let Some(payload) = &message.result_payload {
    lines.push(String::new());
    lines.extend(format_roadmap(payload));
  }

  lines
}

pub fn format_transcript(conversation: &Conversation) -> Vec<String> {
  let mut lines = vec![conversation.title.bold().to_string(), rule(WIDTH, '═')];

  if conversation.messages.is_empty() {
    lines.push("Learnora".bold().to_string());
    lines.push(
      "Ask me anything and I'll put together a roadmap of articles and videos to learn from."
        .to_string(),
    );
  }

  for message in &conversation.messages {
    lines.extend(format_message(message));
    lines.push(String::new());
  }

  lines
}

/// Fishbone view: the query as the spine, articles and videos as branches
pub fn format_roadmap(payload: &RoadmapPayload) -> Vec<String> {
  if payload.is_empty() {
    return vec![EMPTY_ROADMAP_TEXT.to_string()];
  }

  let mut lines = vec![
    format!("◆ {}", payload.query_label().bold()),
    format!("│ {}", "Your Learning Journey".dimmed()),
    "│".to_string(),
  ];

  lines.push(format!(
    "├── 📄 {} [{}]",
    "Articles & Documentation".blue().bold(),
    payload.total_articles
  ));
  for resource in &payload.articles {
    lines.extend(format_resource(resource, "│   ", false));
  }

  lines.push("│".to_string());
  lines.push(format!("└── ▶ {} [{}]", "Video Tutorials".red().bold(), payload.total_videos));
  for resource in &payload.videos {
    lines.extend(format_resource(resource, "    ", true));
  }

  lines
}

fn format_resource(resource: &Resource, indent: &str, video: bool) -> Vec<String> {
  let title = console::truncate_str(&resource.title, TITLE_WIDTH, "…");
  let mut header = format!("{indent}{}. {}", resource.id, title);
  if let Some(percent) = resource.score_percent() {
    header.push_str(&format!("  {}", format!("★ {percent}%").yellow()));
  }

  let mut lines = vec![header];
  lines.push(format!("{indent}   Source: {}", resource.source));

  let labels = resource.visible_labels();
  if !labels.is_empty() {
    let tags: Vec<String> = labels.iter().map(|l| format!("#{l}")).collect();
    lines.push(format!("{indent}   {}", tags.join(" ").dimmed()));
  }

  if let Some(text) = resource.link_text() {
    lines.push(format!("{indent}   {}", text.cyan().underline()));
  }

  if video {
    if let Some(thumbnail) = resource.youtube_thumbnail() {
      lines.push(format!("{indent}   Thumbnail: {}", thumbnail.dimmed()));
    }
  }

  lines
}

/// Sidebar-style list: position, active marker, title, message count
pub fn format_conversation_list<F>(
  conversations: &[Conversation],
  active_id: &ConversationId,
  awaiting_reply: F,
) -> Vec<String>
where
  F: Fn(&ConversationId) -> bool,
{
  conversations
    .iter()
    .enumerate()
    .map(|(index, conversation)| {
      let marker = if &conversation.id == active_id { "*" } else { " " };
      let typing = if awaiting_reply(&conversation.id) { " …" } else { "" };
      format!(
        "{} {:>2}. {} ({}, {}){}",
        marker,
        index + 1,
        conversation.title,
        message_count(conversation.messages.len()),
        format_timestamp(conversation.updated_at),
        typing
      )
    })
    .collect()
}

fn message_count(count: usize) -> String {
  match count {
    1 => "1 message".to_string(),
    n => format!("{n} messages"),
  }
}

pub fn format_profile(profile: &UserProfile) -> Vec<String> {
  let mut lines = vec![format!("({}) {}", profile.initial(), profile.display_name().bold())];
  if let Some(email) = &profile.email {
    lines.push(format!("    {email}"));
  }
  if let Some(picture) = &profile.picture {
    lines.push(format!("    Avatar: {picture}"));
  }
  lines
}

pub fn print_lines(lines: &[String]) {
  for line in lines {
    println!("{line}");
  }
}

pub fn display_transcript(conversation: &Conversation) {
  print_lines(&format_transcript(conversation));
}

pub fn display_message(message: &Message) {
  print_lines(&format_message(message));
}

pub fn display_typing_indicator() {
  eprintln!("{}", "Learnora is typing…".dimmed());
}
