//! User-facing notification capability.

/// Shows a blocking message to the user (a browser `alert`).
pub trait Notifier {
    fn alert(&mut self, message: &str);
}

/// Keeps every alert in memory. Used by tests and the CLI host.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    alerts: Vec<String>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    pub fn last(&self) -> Option<&str> {
        self.alerts.last().map(String::as_str)
    }

    /// Take all recorded alerts, leaving the recorder empty.
    pub fn drain(&mut self) -> Vec<String> {
        std::mem::take(&mut self.alerts)
    }
}

impl Notifier for RecordingNotifier {
    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }
}

/// Emits alerts as `warn` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn alert(&mut self, message: &str) {
        tracing::warn!(alert = %message.trim_end(), "User alert");
    }
}

impl<N: Notifier + ?Sized> Notifier for &mut N {
    fn alert(&mut self, message: &str) {
        (**self).alert(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_keeps_order() {
        let mut notifier = RecordingNotifier::new();
        notifier.alert("one");
        notifier.alert("two");
        assert_eq!(notifier.alerts(), &["one".to_string(), "two".to_string()]);
        assert_eq!(notifier.last(), Some("two"));
        assert_eq!(notifier.drain().len(), 2);
        assert!(notifier.alerts().is_empty());
    }

    #[test]
    fn forwards_through_mut_ref() {
        let mut notifier = RecordingNotifier::new();
        {
            let mut borrowed = &mut notifier;
            Notifier::alert(&mut borrowed, "hi");
        }
        assert_eq!(notifier.last(), Some("hi"));
    }

    #[test]
    fn log_notifier_emits_warn_event() {
        use crate::logging::{CaptureLayer, LogBuffer};
        use tracing_subscriber::prelude::*;

        let buffer = LogBuffer::new();
        let subscriber = tracing_subscriber::registry().with(CaptureLayer::new(buffer.clone()));
        tracing::subscriber::with_default(subscriber, || {
            LogNotifier.alert("Please enter a valid email address.\n");
        });

        let entries = buffer.snapshot();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].level, "warn");
        assert_eq!(entries[0].msg, "User alert");
        assert_eq!(
            entries[0].field("alert"),
            Some(&serde_json::json!("Please enter a valid email address."))
        );
    }
}
