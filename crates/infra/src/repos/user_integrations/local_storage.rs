use super::inmemory::{delete_integration, save_integration};
use super::IUserIntegrationRepo;
use crate::repos::shared::json_file::JsonFile;
use matchminder_domain::{IntegrationProvider, UserIntegration, ID};
use std::path::PathBuf;

/// Token pairs persisted to a json file next to the reminder store
pub struct LocalStorageUserIntegrationRepo {
    file: std::sync::Mutex<JsonFile<Vec<UserIntegration>>>,
}

impl LocalStorageUserIntegrationRepo {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: std::sync::Mutex::new(JsonFile::new(path)),
        }
    }
}

#[async_trait::async_trait]
impl IUserIntegrationRepo for LocalStorageUserIntegrationRepo {
    async fn insert(&self, integration: &UserIntegration) -> anyhow::Result<()> {
        let file = self.file.lock().unwrap();
        let mut integrations = file.load();
        save_integration(&mut integrations, integration);
        file.store(&integrations)
    }

    async fn save(&self, integration: &UserIntegration) -> anyhow::Result<()> {
        let file = self.file.lock().unwrap();
        let mut integrations = file.load();
        save_integration(&mut integrations, integration);
        file.store(&integrations)
    }

    async fn find(&self, user_id: &ID) -> anyhow::Result<Vec<UserIntegration>> {
        let integrations = self.file.lock().unwrap().load();
        Ok(integrations
            .into_iter()
            .filter(|i| &i.user_id == user_id)
            .collect())
    }

    async fn delete(&self, user_id: &ID, provider: IntegrationProvider) -> anyhow::Result<()> {
        let file = self.file.lock().unwrap();
        let mut integrations = file.load();
        delete_integration(&mut integrations, user_id, &provider)?;
        file.store(&integrations)
    }
}
