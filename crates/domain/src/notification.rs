use serde::{Deserialize, Serialize};

/// Payload for an OS-level notification shown by the page context.
/// Clicking it focuses or opens a page deep-linked to the match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalNotification {
    pub title: String,
    pub body: String,
    pub icon: String,
    /// Deep-link target, derived from the reminder id
    pub match_id: String,
}

impl LocalNotification {
    /// Strips the reminder id down to the match identifier used for
    /// deep-linking, e.g. "match_1234_notification" -> "1234"
    pub fn match_id_from_reminder_id(reminder_id: &str) -> String {
        reminder_id
            .strip_prefix("match_")
            .and_then(|rest| rest.rsplitn(2, '_').nth(1))
            .unwrap_or(reminder_id)
            .to_string()
    }
}
