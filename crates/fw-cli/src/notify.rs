//! Console notifier for alert side effects.

use fw_core::{Label, Notifier};

/// Supportive, non-condemning messages for each alert stage.
/// Each tuple: (badge text, main message).
const ALERT_MESSAGES: [(&str, &str); 3] = [
    ("Focus paused", "We noticed you stepped away!"),
    ("Quick check-in", "We are waiting for you :)"),
    ("Reminder", "Don't forget to come back ;)"),
];

/// Prints alerts to stderr, keeping stdout clean for piped output.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn on_alert(&self, stage: usize, label: Label) {
        let (badge, message) = ALERT_MESSAGES
            .get(stage)
            .copied()
            .unwrap_or(("Reminder", "Still unfocused"));
        tracing::info!(stage, label = %label, "alert delivered");
        eprintln!("[{badge}] {message}");
    }
}
