use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Notification consent state reported by the platform. Mirrors the
/// three states of the browser permission model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    /// The user has not answered the consent prompt yet
    Default,
    Granted,
    Denied,
}

impl Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let repr = match self {
            Self::Default => "default",
            Self::Granted => "granted",
            Self::Denied => "denied",
        };
        write!(f, "{}", repr)
    }
}

/// Result of a capability check for local notifications. When not
/// supported, `reason` carries a human-readable explanation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationSupport {
    pub supported: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl NotificationSupport {
    pub fn supported() -> Self {
        Self {
            supported: true,
            reason: None,
        }
    }

    pub fn unsupported(reason: &str) -> Self {
        Self {
            supported: false,
            reason: Some(reason.to_string()),
        }
    }
}

/// Capabilities of the connected page client, reported when it attaches.
/// The gate fails closed on anything that cannot show notifications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientProfile {
    /// False for non-browser execution contexts
    pub is_browser: bool,
    /// Whether the notification capability is present at all
    pub has_notification_api: bool,
    /// Whether a background task can be registered
    pub has_background_tasks: bool,
    /// Mobile WebKit-based browsers expose the notification API but it
    /// does not work, treated as unsupported
    pub is_mobile_webkit: bool,
}

impl Default for ClientProfile {
    fn default() -> Self {
        Self {
            is_browser: true,
            has_notification_api: true,
            has_background_tasks: true,
            is_mobile_webkit: false,
        }
    }
}
