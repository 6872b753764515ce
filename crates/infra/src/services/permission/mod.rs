use async_trait::async_trait;
use matchminder_domain::{ClientProfile, NotificationSupport, Permission};
use std::sync::Mutex;
use tracing::info;

/// Asks the user whether notifications may be shown. The real prompt is
/// a UI surface; tests and headless runs inject a canned answer.
#[async_trait]
pub trait IPermissionPrompt: Send + Sync {
    async fn request(&self) -> Permission;
}

/// Prompt stand-in that always answers the same thing
pub struct StaticPrompt(pub Permission);

#[async_trait]
impl IPermissionPrompt for StaticPrompt {
    async fn request(&self) -> Permission {
        self.0
    }
}

/// Gate in front of notification delivery. Support checks are
/// fail-closed: an environment we cannot positively identify as capable
/// is reported unsupported with a reason.
pub struct PermissionGate {
    profile: ClientProfile,
    prompt: std::sync::Arc<dyn IPermissionPrompt>,
    state: Mutex<Permission>,
}

impl PermissionGate {
    pub fn new(profile: ClientProfile, prompt: std::sync::Arc<dyn IPermissionPrompt>) -> Self {
        Self {
            profile,
            prompt,
            state: Mutex::new(Permission::Default),
        }
    }

    pub fn check_support(&self) -> NotificationSupport {
        if !self.profile.is_browser {
            return NotificationSupport::unsupported("Not running in a browser context");
        }
        if !self.profile.has_notification_api {
            return NotificationSupport::unsupported("Notification API is not available");
        }
        if self.profile.is_mobile_webkit {
            return NotificationSupport::unsupported(
                "Notifications are not supported in mobile WebKit browsers",
            );
        }
        if !self.profile.has_background_tasks {
            return NotificationSupport::unsupported("Background task scheduling is not available");
        }
        NotificationSupport::supported()
    }

    pub fn get_permission(&self) -> Permission {
        *self.state.lock().unwrap()
    }

    /// Requests notification permission from the user. Unsupported
    /// environments resolve to `Denied` without prompting, and a grant
    /// is never re-prompted.
    pub async fn request_permission(&self) -> Permission {
        let support = self.check_support();
        if !support.supported {
            info!(
                "Notification permission denied without prompting: {}",
                support.reason.as_deref().unwrap_or("unsupported")
            );
            *self.state.lock().unwrap() = Permission::Denied;
            return Permission::Denied;
        }
        if self.get_permission() == Permission::Granted {
            return Permission::Granted;
        }
        let answer = self.prompt.request().await;
        *self.state.lock().unwrap() = answer;
        answer
    }
}
