mod config;
mod repos;
pub mod services;
mod system;

pub use config::{Config, GoogleOAuthSettings, MailerSettings};
pub use repos::{IReminderRepo, IUserIntegrationRepo, Repos};
pub use services::{
    connect_user_mailbox, encode_raw_message, generate_auth_url, get_valid_access_token,
    AccessTokenError, Bridge, CheckNow, GmailApi, GoogleOAuthProvider, HttpMailer, IMailApi,
    IMailer, IOAuthProvider, IPermissionPrompt, PageMessage, PermissionGate, StaticPrompt,
};
pub use system::{ISys, RealSys};

use std::sync::Arc;

/// External delivery services. Every field is a trait object so tests
/// can swap in fakes.
#[derive(Clone)]
pub struct Services {
    pub oauth: Arc<dyn IOAuthProvider>,
    pub mail_api: Arc<dyn IMailApi>,
    pub mailer: Arc<dyn IMailer>,
}

#[derive(Clone)]
pub struct MatchminderContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub services: Services,
}

impl MatchminderContext {
    pub fn create(config: Config) -> Self {
        let repos = match &config.storage_path {
            Some(dir) => Repos::create_local_storage(dir),
            None => Repos::create_inmemory(),
        };
        let services = Services {
            oauth: Arc::new(GoogleOAuthProvider::new(config.google.clone())),
            mail_api: Arc::new(GmailApi::new()),
            mailer: Arc::new(HttpMailer::new(config.mailer.clone())),
        };
        Self {
            repos,
            config,
            sys: Arc::new(RealSys {}),
            services,
        }
    }

    pub fn create_inmemory() -> Self {
        let mut config = Config::new();
        config.storage_path = None;
        let services = Services {
            oauth: Arc::new(GoogleOAuthProvider::new(config.google.clone())),
            mail_api: Arc::new(GmailApi::new()),
            mailer: Arc::new(HttpMailer::new(config.mailer.clone())),
        };
        Self {
            repos: Repos::create_inmemory(),
            config,
            sys: Arc::new(RealSys {}),
            services,
        }
    }
}

pub fn setup_context() -> MatchminderContext {
    MatchminderContext::create(Config::new())
}
