mod reminder;
mod shared;
mod user_integrations;

pub use reminder::IReminderRepo;
pub use user_integrations::IUserIntegrationRepo;

use reminder::{InMemoryReminderRepo, LocalStorageReminderRepo};
use std::path::Path;
use std::sync::Arc;
use user_integrations::{InMemoryUserIntegrationRepo, LocalStorageUserIntegrationRepo};

#[derive(Clone)]
pub struct Repos {
    pub reminders: Arc<dyn IReminderRepo>,
    pub user_integrations: Arc<dyn IUserIntegrationRepo>,
}

impl Repos {
    pub fn create_inmemory() -> Self {
        Self {
            reminders: Arc::new(InMemoryReminderRepo::new()),
            user_integrations: Arc::new(InMemoryUserIntegrationRepo::new()),
        }
    }

    /// Durable stores backed by json files under the given directory
    pub fn create_local_storage(dir: &str) -> Self {
        let dir = Path::new(dir);
        Self {
            reminders: Arc::new(LocalStorageReminderRepo::new(dir.join("reminders.json"))),
            user_integrations: Arc::new(LocalStorageUserIntegrationRepo::new(
                dir.join("user_integrations.json"),
            )),
        }
    }
}
