//! User-facing status lines on stderr
//!
//! Every line gets a colored, bracketed level tag so multi-line messages stay
//! aligned. Diagnostics meant for developers go through `tracing` instead.

use colored::{Color, Colorize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
  Info,
  Warn,
  Error,
  Success,
}

impl Level {
  fn tag(self) -> &'static str {
    match self {
      Level::Info => "info",
      Level::Warn => "warn",
      Level::Error => "error",
      Level::Success => "done",
    }
  }

  fn color(self) -> Color {
    match self {
      Level::Info => Color::Blue,
      Level::Warn => Color::Yellow,
      Level::Error => Color::Red,
      Level::Success => Color::Green,
    }
  }
}

/// Prefix every line of `message` with the level tag, padded to a fixed width
pub fn format_lines(level: Level, message: &str) -> Vec<String> {
  let tag = level.tag();
  let prefix = format!("[{}]{:<pad$}", tag.color(level.color()).bold(), "", pad = 6 - tag.len());
  message.lines().map(|line| format!("{prefix}{line}")).collect()
}

fn emit(level: Level, message: &str) {
  for line in format_lines(level, message) {
    eprintln!("{line}");
  }
}

pub fn info(message: &str) {
  emit(Level::Info, message);
}

pub fn warn(message: &str) {
  emit(Level::Warn, message);
}

pub fn error(message: &str) {
  emit(Level::Error, message);
}

pub fn success(message: &str) {
  emit(Level::Success, message);
}

/// Horizontal rule of `width` copies of `ch`
pub fn rule(width: usize, ch: char) -> String {
  ch.to_string().repeat(width)
}

/// Headline wrapped between two rules
pub fn announce(message: &str) {
  let border = rule(50, '-');
  eprintln!("{}", border.blue().bold());
  eprintln!("{}", message.blue().bold());
  eprintln!("{}", border.blue().bold());
}
