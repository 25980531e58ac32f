//! Transient status notices

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub message: String,
    pub level: NoticeLevel,
    expires_at: Instant,
}

impl Notice {
    fn new(message: impl Into<String>, level: NoticeLevel, ttl: Duration) -> Self {
        Self {
            message: message.into(),
            level,
            expires_at: Instant::now() + ttl,
        }
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// Most-recent-first list of active notices
#[derive(Debug)]
pub struct NoticeBoard {
    notices: Vec<Notice>,
    default_ttl: Duration,
}

impl Default for NoticeBoard {
    fn default() -> Self {
        Self {
            notices: Vec::new(),
            default_ttl: Duration::from_secs(5),
        }
    }
}

impl NoticeBoard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(message, NoticeLevel::Info);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(message, NoticeLevel::Error);
    }

    fn push(&mut self, message: impl Into<String>, level: NoticeLevel) {
        self.notices
            .insert(0, Notice::new(message, level, self.default_ttl));
    }

    /// The notice to display, if any
    #[must_use]
    pub fn current(&self) -> Option<&Notice> {
        self.notices.first()
    }

    /// Drop expired notices; returns true if anything changed
    pub fn update(&mut self) -> bool {
        let before = self.notices.len();
        self.notices.retain(|n| !n.is_expired());
        self.notices.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_notice_wins() {
        let mut board = NoticeBoard::new();
        board.info("first");
        board.error("second");
        let current = board.current().unwrap();
        assert_eq!(current.message, "second");
        assert_eq!(current.level, NoticeLevel::Error);
    }

    #[test]
    fn expired_notices_are_dropped() {
        let mut board = NoticeBoard {
            notices: Vec::new(),
            default_ttl: Duration::from_millis(0),
        };
        board.info("gone");
        std::thread::sleep(Duration::from_millis(1));
        assert!(board.update());
        assert!(board.current().is_none());
    }
}
