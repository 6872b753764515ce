use crate::{config::GoogleOAuthSettings, MatchminderContext};
use matchminder_domain::{IntegrationProvider, UserIntegration, ID};
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

// https://developers.google.com/identity/protocols/oauth2/web-server#httprest_3

const TOKEN_REFRESH_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
const CODE_TOKEN_EXCHANGE_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
const CONSENT_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const REQUIRED_OAUTH_SCOPES: [&str; 1] = ["https://www.googleapis.com/auth/gmail.send"];

#[derive(Debug)]
pub struct CodeTokenRequest {
    pub code: String,
}

// Google api actually returns snake case response
#[derive(Debug, Deserialize)]
pub struct CodeTokenResponse {
    pub access_token: String,
    pub scope: String,
    // Access token expiry specified in seconds
    pub expires_in: i64,
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshTokenResponse {
    pub access_token: String,
    pub expires_in: i64,
}

#[async_trait::async_trait]
pub trait IOAuthProvider: Send + Sync {
    async fn exchange_code_token(&self, req: CodeTokenRequest) -> anyhow::Result<CodeTokenResponse>;
    async fn refresh_access_token(&self, refresh_token: &str)
        -> anyhow::Result<RefreshTokenResponse>;
}

pub struct GoogleOAuthProvider {
    settings: Option<GoogleOAuthSettings>,
    http: reqwest::Client,
}

impl GoogleOAuthProvider {
    pub fn new(settings: Option<GoogleOAuthSettings>) -> Self {
        Self {
            settings,
            http: reqwest::Client::new(),
        }
    }

    fn settings(&self) -> anyhow::Result<&GoogleOAuthSettings> {
        self.settings
            .as_ref()
            .ok_or_else(|| anyhow::Error::msg("Google OAuth is not configured"))
    }
}

#[async_trait::async_trait]
impl IOAuthProvider for GoogleOAuthProvider {
    async fn exchange_code_token(&self, req: CodeTokenRequest) -> anyhow::Result<CodeTokenResponse> {
        let settings = self.settings()?;
        let params = [
            ("client_id", settings.client_id.as_str()),
            ("client_secret", settings.client_secret.as_str()),
            ("redirect_uri", settings.redirect_uri.as_str()),
            ("code", req.code.as_str()),
            ("grant_type", "authorization_code"),
        ];
        let res = self
            .http
            .post(CODE_TOKEN_EXCHANGE_ENDPOINT)
            .form(&params)
            .send()
            .await?;
        let res = res.json::<CodeTokenResponse>().await?;

        let scopes = res.scope.split(' ').collect::<Vec<_>>();
        for required_scope in REQUIRED_OAUTH_SCOPES.iter() {
            if !scopes.contains(required_scope) {
                return Err(anyhow::Error::msg(
                    "Consent was given without the required mail scope",
                ));
            }
        }

        Ok(res)
    }

    async fn refresh_access_token(
        &self,
        refresh_token: &str,
    ) -> anyhow::Result<RefreshTokenResponse> {
        let settings = self.settings()?;
        let params = [
            ("client_id", settings.client_id.as_str()),
            ("client_secret", settings.client_secret.as_str()),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ];
        let res = self
            .http
            .post(TOKEN_REFRESH_ENDPOINT)
            .form(&params)
            .send()
            .await?;

        Ok(res.json::<RefreshTokenResponse>().await?)
    }
}

/// Builds the consent URL that restarts the OAuth flow. The optional
/// `state` parameter carries the user id across the redirect.
pub fn generate_auth_url(settings: &GoogleOAuthSettings, user_id: Option<&ID>) -> String {
    let scope = REQUIRED_OAUTH_SCOPES.join(" ");
    let mut params = vec![
        ("client_id", settings.client_id.clone()),
        ("redirect_uri", settings.redirect_uri.clone()),
        ("response_type", "code".to_string()),
        ("scope", scope),
        ("access_type", "offline".to_string()),
        ("prompt", "consent".to_string()),
    ];
    if let Some(user_id) = user_id {
        params.push(("state", user_id.as_string()));
    }
    url::Url::parse_with_params(CONSENT_ENDPOINT, params)
        .map(String::from)
        .unwrap_or_else(|_| CONSENT_ENDPOINT.to_string())
}

#[derive(Debug, Error, PartialEq)]
pub enum AccessTokenError {
    #[error("No mailbox connection for this user, or the connection can no longer be refreshed")]
    AuthenticationRequired,
    #[error("Storage error")]
    StorageError,
}

/// Returns a mail-scope access token for the user, refreshing it at
/// most once when it has expired or is about to. Without a usable
/// refresh token the caller must restart the consent flow.
pub async fn get_valid_access_token(
    user_id: &ID,
    ctx: &MatchminderContext,
) -> Result<String, AccessTokenError> {
    let integrations = ctx
        .repos
        .user_integrations
        .find(user_id)
        .await
        .map_err(|_| AccessTokenError::StorageError)?;
    let mut integration = integrations
        .into_iter()
        .find(|i| i.provider == IntegrationProvider::Google)
        .ok_or(AccessTokenError::AuthenticationRequired)?;

    let now = ctx.sys.get_timestamp_millis();
    let one_minute_in_millis = 1000 * 60;
    if now + one_minute_in_millis <= integration.access_token_expires_ts {
        // Current access token is still valid for at least one minute
        return Ok(integration.access_token);
    }

    // Access token has expired or will expire soon, renew it
    if integration.refresh_token.is_empty() {
        return Err(AccessTokenError::AuthenticationRequired);
    }
    let res = ctx
        .services
        .oauth
        .refresh_access_token(&integration.refresh_token)
        .await
        .map_err(|_| AccessTokenError::AuthenticationRequired)?;

    integration.access_token = res.access_token.clone();
    integration.access_token_expires_ts = now + res.expires_in * 1000;
    if let Err(e) = ctx.repos.user_integrations.save(&integration).await {
        // The minted token is still usable for this send
        warn!("Unable to persist refreshed access token: {:?}", e);
    }

    Ok(res.access_token)
}

/// Exchanges an authorization code for a token pair and persists it
/// keyed by user id, overwriting any previous connection
pub async fn connect_user_mailbox(
    user_id: &ID,
    code: String,
    ctx: &MatchminderContext,
) -> anyhow::Result<UserIntegration> {
    let res = ctx
        .services
        .oauth
        .exchange_code_token(CodeTokenRequest { code })
        .await?;

    let now = ctx.sys.get_timestamp_millis();
    let integration = UserIntegration {
        user_id: user_id.clone(),
        access_token: res.access_token,
        access_token_expires_ts: now + res.expires_in * 1000,
        refresh_token: res.refresh_token,
        provider: IntegrationProvider::Google,
    };
    ctx.repos.user_integrations.insert(&integration).await?;
    Ok(integration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ISys, MatchminderContext};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct StaticTimeSys(i64);
    impl ISys for StaticTimeSys {
        fn get_timestamp_millis(&self) -> i64 {
            self.0
        }
    }

    struct CountingOAuthProvider {
        refreshes: AtomicUsize,
        fail_refresh: bool,
    }

    impl CountingOAuthProvider {
        fn new(fail_refresh: bool) -> Self {
            Self {
                refreshes: AtomicUsize::new(0),
                fail_refresh,
            }
        }
    }

    #[async_trait::async_trait]
    impl IOAuthProvider for CountingOAuthProvider {
        async fn exchange_code_token(
            &self,
            _req: CodeTokenRequest,
        ) -> anyhow::Result<CodeTokenResponse> {
            Ok(CodeTokenResponse {
                access_token: "fresh_access".into(),
                scope: REQUIRED_OAUTH_SCOPES.join(" "),
                expires_in: 3600,
                refresh_token: "fresh_refresh".into(),
            })
        }

        async fn refresh_access_token(
            &self,
            _refresh_token: &str,
        ) -> anyhow::Result<RefreshTokenResponse> {
            self.refreshes.fetch_add(1, Ordering::SeqCst);
            if self.fail_refresh {
                return Err(anyhow::Error::msg("invalid_grant"));
            }
            Ok(RefreshTokenResponse {
                access_token: "refreshed_access".into(),
                expires_in: 3600,
            })
        }
    }

    fn ctx_with_provider(provider: Arc<CountingOAuthProvider>, now: i64) -> MatchminderContext {
        let mut ctx = MatchminderContext::create_inmemory();
        ctx.services.oauth = provider;
        ctx.sys = Arc::new(StaticTimeSys(now));
        ctx
    }

    async fn insert_integration(ctx: &MatchminderContext, user_id: &ID, expires_ts: i64, refresh_token: &str) {
        ctx.repos
            .user_integrations
            .insert(&UserIntegration {
                user_id: user_id.clone(),
                access_token: "stale_access".into(),
                access_token_expires_ts: expires_ts,
                refresh_token: refresh_token.into(),
                provider: IntegrationProvider::Google,
            })
            .await
            .expect("To insert integration");
    }

    #[tokio::test]
    async fn valid_token_is_returned_without_refresh() {
        let provider = Arc::new(CountingOAuthProvider::new(false));
        let ctx = ctx_with_provider(provider.clone(), 1000);
        let user_id = ID::new();
        insert_integration(&ctx, &user_id, 1000 * 60 * 60, "refresh").await;

        let token = get_valid_access_token(&user_id, &ctx).await.expect("Token");
        assert_eq!(token, "stale_access");
        assert_eq!(provider.refreshes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn expired_token_is_refreshed_exactly_once() {
        let provider = Arc::new(CountingOAuthProvider::new(false));
        let now = 1000 * 60 * 60;
        let ctx = ctx_with_provider(provider.clone(), now);
        let user_id = ID::new();
        insert_integration(&ctx, &user_id, now - 1, "refresh").await;

        let token = get_valid_access_token(&user_id, &ctx).await.expect("Token");
        assert_eq!(token, "refreshed_access");
        assert_eq!(provider.refreshes.load(Ordering::SeqCst), 1);

        // The refreshed token was persisted, the next call does not
        // refresh again
        let token = get_valid_access_token(&user_id, &ctx).await.expect("Token");
        assert_eq!(token, "refreshed_access");
        assert_eq!(provider.refreshes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn missing_refresh_token_requires_authentication() {
        let provider = Arc::new(CountingOAuthProvider::new(false));
        let now = 1000 * 60 * 60;
        let ctx = ctx_with_provider(provider.clone(), now);
        let user_id = ID::new();
        insert_integration(&ctx, &user_id, now - 1, "").await;

        let res = get_valid_access_token(&user_id, &ctx).await;
        assert_eq!(res, Err(AccessTokenError::AuthenticationRequired));
        assert_eq!(provider.refreshes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failed_refresh_requires_authentication() {
        let provider = Arc::new(CountingOAuthProvider::new(true));
        let now = 1000 * 60 * 60;
        let ctx = ctx_with_provider(provider.clone(), now);
        let user_id = ID::new();
        insert_integration(&ctx, &user_id, now - 1, "refresh").await;

        let res = get_valid_access_token(&user_id, &ctx).await;
        assert_eq!(res, Err(AccessTokenError::AuthenticationRequired));
        assert_eq!(provider.refreshes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unconnected_user_requires_authentication() {
        let provider = Arc::new(CountingOAuthProvider::new(false));
        let ctx = ctx_with_provider(provider, 0);
        let res = get_valid_access_token(&ID::new(), &ctx).await;
        assert_eq!(res, Err(AccessTokenError::AuthenticationRequired));
    }

    #[test]
    fn auth_url_carries_state_and_scope() {
        let settings = GoogleOAuthSettings {
            client_id: "client".into(),
            client_secret: "secret".into(),
            redirect_uri: "https://app.example.com/api/v1/oauth/google/callback".into(),
        };
        let user_id = ID::new();
        let auth_url = generate_auth_url(&settings, Some(&user_id));
        assert!(auth_url.starts_with(CONSENT_ENDPOINT));
        assert!(auth_url.contains("access_type=offline"));
        assert!(auth_url.contains(&format!("state={}", user_id)));
        assert!(auth_url.contains("gmail.send"));
    }
}
