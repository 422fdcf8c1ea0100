//! User-facing notices
//!
//! The session records what the user should be told (saves, load fallbacks,
//! storage failures) as typed notices. The host decides how to show them.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum number of notices to keep in history
pub const MAX_NOTICE_HISTORY: usize = 100;

/// Notice severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl fmt::Display for NoticeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoticeLevel::Info => write!(f, "INFO"),
            NoticeLevel::Success => write!(f, "SUCCESS"),
            NoticeLevel::Warning => write!(f, "WARNING"),
            NoticeLevel::Error => write!(f, "ERROR"),
        }
    }
}

/// A notice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    /// Document version current when the notice was raised
    pub version: u64,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>, version: u64) -> Self {
        Self {
            level,
            message: message.into(),
            version,
        }
    }

    pub fn info(message: impl Into<String>, version: u64) -> Self {
        Self::new(NoticeLevel::Info, message, version)
    }

    pub fn success(message: impl Into<String>, version: u64) -> Self {
        Self::new(NoticeLevel::Success, message, version)
    }

    pub fn warning(message: impl Into<String>, version: u64) -> Self {
        Self::new(NoticeLevel::Warning, message, version)
    }

    pub fn error(message: impl Into<String>, version: u64) -> Self {
        Self::new(NoticeLevel::Error, message, version)
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level, self.message)
    }
}

/// Bounded notice history, oldest first
#[derive(Debug, Clone, Default)]
pub struct NoticeLog {
    notices: VecDeque<Notice>,
}

impl NoticeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a notice
    pub fn push(&mut self, notice: Notice) {
        self.notices.push_back(notice);

        // Trim history if too large
        while self.notices.len() > MAX_NOTICE_HISTORY {
            self.notices.pop_front();
        }
    }

    pub fn latest(&self) -> Option<&Notice> {
        self.notices.back()
    }

    /// Up to `limit` notices, newest first
    pub fn recent(&self, limit: usize) -> Vec<&Notice> {
        self.notices.iter().rev().take(limit).collect()
    }

    pub fn by_level(&self, level: NoticeLevel) -> Vec<&Notice> {
        self.notices.iter().filter(|n| n.level == level).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.notices.iter()
    }

    pub fn len(&self) -> usize {
        self.notices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }

    pub fn clear(&mut self) {
        self.notices.clear();
    }
}
