use super::IUserIntegrationRepo;
use matchminder_domain::{IntegrationProvider, UserIntegration, ID};

pub struct InMemoryUserIntegrationRepo {
    integrations: std::sync::Mutex<Vec<UserIntegration>>,
}

impl InMemoryUserIntegrationRepo {
    pub fn new() -> Self {
        Self {
            integrations: std::sync::Mutex::new(Vec::new()),
        }
    }
}

impl Default for InMemoryUserIntegrationRepo {
    fn default() -> Self {
        Self::new()
    }
}

pub(super) fn save_integration(
    integrations: &mut Vec<UserIntegration>,
    integration: &UserIntegration,
) {
    match integrations
        .iter_mut()
        .find(|i| i.user_id == integration.user_id && i.provider == integration.provider)
    {
        Some(existing) => *existing = integration.clone(),
        None => integrations.push(integration.clone()),
    }
}

pub(super) fn delete_integration(
    integrations: &mut Vec<UserIntegration>,
    user_id: &ID,
    provider: &IntegrationProvider,
) -> anyhow::Result<()> {
    let before = integrations.len();
    integrations.retain(|i| !(&i.user_id == user_id && &i.provider == provider));
    if integrations.len() == before {
        return Err(anyhow::Error::msg("Unable to delete user integration"));
    }
    Ok(())
}

#[async_trait::async_trait]
impl IUserIntegrationRepo for InMemoryUserIntegrationRepo {
    async fn insert(&self, integration: &UserIntegration) -> anyhow::Result<()> {
        let mut integrations = self.integrations.lock().unwrap();
        save_integration(&mut integrations, integration);
        Ok(())
    }

    async fn save(&self, integration: &UserIntegration) -> anyhow::Result<()> {
        let mut integrations = self.integrations.lock().unwrap();
        save_integration(&mut integrations, integration);
        Ok(())
    }

    async fn find(&self, user_id: &ID) -> anyhow::Result<Vec<UserIntegration>> {
        let integrations = self.integrations.lock().unwrap();
        Ok(integrations
            .iter()
            .filter(|i| &i.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn delete(&self, user_id: &ID, provider: IntegrationProvider) -> anyhow::Result<()> {
        let mut integrations = self.integrations.lock().unwrap();
        delete_integration(&mut integrations, user_id, &provider)
    }
}
