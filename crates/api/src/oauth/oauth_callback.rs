use crate::error::MatchminderError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{http::header, web, HttpResponse};
use matchminder_api_structs::oauth_callback::QueryParams;
use matchminder_domain::{UserIntegration, ID};
use matchminder_infra::{connect_user_mailbox, MatchminderContext};
use std::str::FromStr;

const SUCCESS_REDIRECT: &str = "/auth-success";
const ERROR_REDIRECT: &str = "/auth-error";

/// Landing endpoint for the consent redirect. Always answers with a
/// redirect so the flow ends on a human-readable page, never on a JSON
/// error body.
pub async fn oauth_callback_controller(
    query: web::Query<QueryParams>,
    ctx: web::Data<MatchminderContext>,
) -> Result<HttpResponse, MatchminderError> {
    let query = query.0;

    let code = match query.code {
        Some(code) => code,
        // The user backed out of the consent screen
        None => return Ok(error_redirect("Consent was not given")),
    };
    let user_id = match query.state.as_deref().map(ID::from_str) {
        Some(Ok(user_id)) => user_id,
        _ => return Ok(error_redirect("The callback state is missing or invalid")),
    };

    let usecase = ConnectMailboxUseCase { user_id, code };
    match execute(usecase, &ctx).await {
        Ok(_) => Ok(HttpResponse::Found()
            .insert_header((header::LOCATION, SUCCESS_REDIRECT))
            .finish()),
        Err(UseCaseError::OAuthFailed) => {
            Ok(error_redirect("The authorization code could not be exchanged"))
        }
    }
}

fn error_redirect(message: &str) -> HttpResponse {
    let location = format!(
        "{}?message={}",
        ERROR_REDIRECT,
        message.replace(' ', "%20")
    );
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

#[derive(Debug)]
pub struct ConnectMailboxUseCase {
    pub user_id: ID,
    pub code: String,
}

#[derive(Debug)]
pub enum UseCaseError {
    OAuthFailed,
}

#[async_trait::async_trait(?Send)]
impl UseCase for ConnectMailboxUseCase {
    type Response = UserIntegration;

    type Error = UseCaseError;

    const NAME: &'static str = "ConnectMailbox";

    async fn execute(&mut self, ctx: &MatchminderContext) -> Result<Self::Response, Self::Error> {
        connect_user_mailbox(&self.user_id, self.code.clone(), ctx)
            .await
            .map_err(|_| UseCaseError::OAuthFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use matchminder_domain::IntegrationProvider;
    use matchminder_infra::services::google_oauth::{
        CodeTokenRequest, CodeTokenResponse, IOAuthProvider, RefreshTokenResponse,
    };
    use std::sync::Arc;

    struct FakeOAuthProvider {
        fail_exchange: bool,
    }

    #[async_trait::async_trait]
    impl IOAuthProvider for FakeOAuthProvider {
        async fn exchange_code_token(
            &self,
            _req: CodeTokenRequest,
        ) -> anyhow::Result<CodeTokenResponse> {
            if self.fail_exchange {
                return Err(anyhow::Error::msg("invalid_grant"));
            }
            Ok(CodeTokenResponse {
                access_token: "access".into(),
                scope: "https://www.googleapis.com/auth/gmail.send".into(),
                expires_in: 3600,
                refresh_token: "refresh".into(),
            })
        }

        async fn refresh_access_token(
            &self,
            _refresh_token: &str,
        ) -> anyhow::Result<RefreshTokenResponse> {
            Err(anyhow::Error::msg("Unexpected refresh"))
        }
    }

    #[tokio::test]
    async fn code_exchange_persists_the_integration() {
        let mut ctx = MatchminderContext::create_inmemory();
        ctx.services.oauth = Arc::new(FakeOAuthProvider {
            fail_exchange: false,
        });
        let user_id = ID::new();

        let usecase = ConnectMailboxUseCase {
            user_id: user_id.clone(),
            code: "auth_code".to_string(),
        };
        let integration = execute(usecase, &ctx).await.expect("To connect mailbox");
        assert_eq!(integration.provider, IntegrationProvider::Google);

        let stored = ctx
            .repos
            .user_integrations
            .find(&user_id)
            .await
            .expect("To query integrations");
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].refresh_token, "refresh");
    }

    #[tokio::test]
    async fn failed_exchange_surfaces_oauth_error() {
        let mut ctx = MatchminderContext::create_inmemory();
        ctx.services.oauth = Arc::new(FakeOAuthProvider {
            fail_exchange: true,
        });

        let usecase = ConnectMailboxUseCase {
            user_id: ID::new(),
            code: "bad_code".to_string(),
        };
        assert!(matches!(
            execute(usecase, &ctx).await,
            Err(UseCaseError::OAuthFailed)
        ));
    }
}
