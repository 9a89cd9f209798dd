use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::utils::time::now;

const MAX_PENDING_NOTICES: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Fire-and-forget channel for operator-facing messages.
pub trait Notifier: Send + Sync {
    fn notify(&self, level: NoticeLevel, message: &str);
}

/// Keeps notices in memory until the console polls them.
#[derive(Clone, Default)]
pub struct NotificationService {
    queue: Arc<Mutex<VecDeque<Notice>>>,
}

impl NotificationService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&self) -> Vec<Notice> {
        let mut queue = self.queue.lock().unwrap_or_else(PoisonError::into_inner);
        queue.drain(..).collect()
    }

    pub fn pending(&self) -> usize {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Notifier for NotificationService {
    fn notify(&self, level: NoticeLevel, message: &str) {
        match level {
            NoticeLevel::Success => info!(notice = message, "Operator notice"),
            NoticeLevel::Error => warn!(notice = message, "Operator notice"),
        }

        let mut queue = self.queue.lock().unwrap_or_else(PoisonError::into_inner);
        if queue.len() == MAX_PENDING_NOTICES {
            queue.pop_front();
        }
        queue.push_back(Notice {
            level,
            message: message.to_string(),
            created_at: now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_returns_notices_in_order_once() {
        let service = NotificationService::new();
        service.notify(NoticeLevel::Success, "first");
        service.notify(NoticeLevel::Error, "second");

        let notices = service.drain();
        assert_eq!(notices.len(), 2);
        assert_eq!(notices[0].message, "first");
        assert_eq!(notices[1].level, NoticeLevel::Error);
        assert!(service.drain().is_empty());
    }

    #[test]
    fn oldest_notice_is_dropped_when_full() {
        let service = NotificationService::new();
        for i in 0..=MAX_PENDING_NOTICES {
            service.notify(NoticeLevel::Success, &i.to_string());
        }

        assert_eq!(service.pending(), MAX_PENDING_NOTICES);
        assert_eq!(service.drain()[0].message, "1");
    }
}
