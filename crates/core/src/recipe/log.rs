//! Structured run log returned to the caller
//!
//! Every entry is tagged with the step that produced it (if any) and is also
//! forwarded to `tracing` at the matching level.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Message,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub step: Option<String>,
    pub text: String,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.level {
            LogLevel::Message => "INFO",
            LogLevel::Warning => "WARN",
            LogLevel::Error => "ERROR",
        };
        match &self.step {
            Some(step) => write!(f, "[{level}] {step}: {}", self.text),
            None => write!(f, "[{level}] {}", self.text),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipeLog {
    entries: Vec<LogEntry>,
}

impl RecipeLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, level: LogLevel, step: Option<&str>, text: String) {
        let target = step.unwrap_or("recipe");
        match level {
            LogLevel::Message => info!(step = target, "{text}"),
            LogLevel::Warning => warn!(step = target, "{text}"),
            LogLevel::Error => error!(step = target, "{text}"),
        }
        self.entries.push(LogEntry {
            level,
            step: step.map(str::to_string),
            text,
        });
    }

    pub fn message(&mut self, step: Option<&str>, text: impl Into<String>) {
        self.push(LogLevel::Message, step, text.into());
    }

    pub fn warning(&mut self, step: Option<&str>, text: impl Into<String>) {
        self.push(LogLevel::Warning, step, text.into());
    }

    pub fn error(&mut self, step: Option<&str>, text: impl Into<String>) {
        self.push(LogLevel::Error, step, text.into());
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    fn level(&self, level: LogLevel) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().filter(move |e| e.level == level)
    }

    pub fn messages(&self) -> impl Iterator<Item = &LogEntry> {
        self.level(LogLevel::Message)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &LogEntry> {
        self.level(LogLevel::Warning)
    }

    pub fn errors(&self) -> impl Iterator<Item = &LogEntry> {
        self.level(LogLevel::Error)
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_partition() {
        let mut log = RecipeLog::new();
        log.message(Some("Boil"), "entered");
        log.warning(Some("Boil"), "kettle overfull");
        log.error(None, "cycle");
        assert_eq!(log.messages().count(), 1);
        assert_eq!(log.warnings().count(), 1);
        assert_eq!(log.errors().count(), 1);
        assert!(log.has_errors());
        assert_eq!(log.entries()[1].to_string(), "[WARN] Boil: kettle overfull");
        log.clear();
        assert!(log.entries().is_empty());
    }
}
