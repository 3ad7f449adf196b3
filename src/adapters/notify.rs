use crate::core::Notifier;
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};

/// Sends every report to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn report_error(&self, message: &str) {
        tracing::error!("{}", message);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub at: DateTime<Utc>,
}

/// Keeps reports in memory so they can be shown or inspected later.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .map(|notices| notices.clone())
            .unwrap_or_default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.notices().into_iter().map(|n| n.message).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.notices().is_empty()
    }
}

impl Notifier for RecordingNotifier {
    fn report_error(&self, message: &str) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(Notice {
                message: message.to_string(),
                at: Utc::now(),
            });
        }
    }
}

/// Delivers each report to both notifiers.
impl<A: Notifier, B: Notifier> Notifier for (A, B) {
    fn report_error(&self, message: &str) {
        self.0.report_error(message);
        self.1.report_error(message);
    }
}
