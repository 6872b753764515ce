use matchminder_utils::create_random_secret;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    /// Bearer secret that authorizes the scheduled delivery job endpoint
    pub cron_secret: String,
    /// Port for the application to run on
    pub port: usize,
    /// Directory holding the json files backing the stores. When absent
    /// the stores live in memory only.
    pub storage_path: Option<String>,
    /// How far ahead in millis the scheduled email job looks for unsent
    /// reminders on each invocation
    pub email_job_horizon: i64,
    pub google: Option<GoogleOAuthSettings>,
    pub mailer: Option<MailerSettings>,
}

#[derive(Debug, Clone)]
pub struct GoogleOAuthSettings {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

/// Deployment-wide transactional mail provider, not tied to an
/// individual end-user's mailbox
#[derive(Debug, Clone)]
pub struct MailerSettings {
    pub api_url: String,
    pub api_key: String,
    /// From-address used for every transactional send
    pub sender: String,
}

impl Config {
    pub fn new() -> Self {
        let cron_secret = match std::env::var("CRON_SECRET") {
            Ok(secret) => secret,
            Err(_) => {
                info!("Did not find CRON_SECRET environment variable. Going to create one.");
                let secret = create_random_secret(30);
                info!(
                    "Secret for triggering the scheduled delivery job was generated and set to: {}",
                    secret
                );
                secret
            }
        };

        let default_port = "5000";
        let port = std::env::var("PORT").unwrap_or_else(|_| default_port.into());
        let port = match port.parse::<usize>() {
            Ok(port) => port,
            Err(_) => {
                warn!(
                    "The given PORT: {} is not valid, falling back to the default port: {}.",
                    port, default_port
                );
                default_port.parse::<usize>().unwrap()
            }
        };

        let storage_path = std::env::var("REMINDERS_STORAGE_PATH").ok();

        let google = match (
            std::env::var("GOOGLE_CLIENT_ID"),
            std::env::var("GOOGLE_CLIENT_SECRET"),
            std::env::var("GOOGLE_REDIRECT_URI"),
        ) {
            (Ok(client_id), Ok(client_secret), Ok(redirect_uri)) => Some(GoogleOAuthSettings {
                client_id,
                client_secret,
                redirect_uri,
            }),
            _ => {
                info!("Google OAuth environment variables not set. The mailbox email backend will be unavailable.");
                None
            }
        };

        let mailer = match (
            std::env::var("MAILER_API_URL"),
            std::env::var("MAILER_API_KEY"),
            std::env::var("MAILER_SENDER"),
        ) {
            (Ok(api_url), Ok(api_key), Ok(sender)) => Some(MailerSettings {
                api_url,
                api_key,
                sender,
            }),
            _ => {
                info!("Mailer environment variables not set. The transactional email backend will be unavailable.");
                None
            }
        };

        Self {
            cron_secret,
            port,
            storage_path,
            email_job_horizon: 1000 * 60 * 5, // 5 minutes
            google,
            mailer,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
