mod inmemory;
mod local_storage;

pub use inmemory::InMemoryUserIntegrationRepo;
pub use local_storage::LocalStorageUserIntegrationRepo;

use matchminder_domain::{IntegrationProvider, UserIntegration, ID};

#[async_trait::async_trait]
pub trait IUserIntegrationRepo: Send + Sync {
    async fn insert(&self, integration: &UserIntegration) -> anyhow::Result<()>;
    async fn save(&self, integration: &UserIntegration) -> anyhow::Result<()>;
    async fn find(&self, user_id: &ID) -> anyhow::Result<Vec<UserIntegration>>;
    async fn delete(&self, user_id: &ID, provider: IntegrationProvider) -> anyhow::Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn integration_factory(user_id: &ID) -> UserIntegration {
        UserIntegration {
            user_id: user_id.clone(),
            access_token: "access".into(),
            access_token_expires_ts: 0,
            refresh_token: "refresh".into(),
            provider: IntegrationProvider::Google,
        }
    }

    fn repos() -> Vec<Arc<dyn IUserIntegrationRepo>> {
        let path = std::env::temp_dir().join(format!(
            "matchminder_integration_repo_{}_{}.json",
            std::process::id(),
            matchminder_utils::create_random_secret(8),
        ));
        vec![
            Arc::new(InMemoryUserIntegrationRepo::new()),
            Arc::new(LocalStorageUserIntegrationRepo::new(path)),
        ]
    }

    #[tokio::test]
    async fn insert_save_find_delete() {
        for repo in repos() {
            let user_id = ID::new();
            let integration = integration_factory(&user_id);
            repo.insert(&integration).await.expect("To insert");

            let found = repo.find(&user_id).await.expect("To find");
            assert_eq!(found, vec![integration.clone()]);

            let mut updated = integration.clone();
            updated.access_token = "access_different".into();
            repo.save(&updated).await.expect("To save");
            let found = repo.find(&user_id).await.expect("To find");
            assert_eq!(found[0].access_token, "access_different");

            assert!(repo
                .delete(&user_id, IntegrationProvider::Google)
                .await
                .is_ok());
            assert!(repo
                .delete(&user_id, IntegrationProvider::Google)
                .await
                .is_err());
            assert!(repo.find(&user_id).await.expect("To find").is_empty());
        }
    }

    #[tokio::test]
    async fn find_for_unknown_user_is_empty() {
        for repo in repos() {
            assert!(repo.find(&ID::new()).await.expect("To find").is_empty());
        }
    }
}
