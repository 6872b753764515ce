use crate::shared::entity::ID;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegrationProvider {
    Google,
}

/// An OAuth2 token pair connecting a user to an external mailbox
/// provider. The access token is short-lived; when it expires the
/// refresh token is used to mint a new one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserIntegration {
    pub user_id: ID,
    pub access_token: String,
    /// Timestamp in millis at which `access_token` expires
    pub access_token_expires_ts: i64,
    pub refresh_token: String,
    pub provider: IntegrationProvider,
}
