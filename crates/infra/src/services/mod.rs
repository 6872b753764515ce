pub mod bridge;
pub mod gmail;
pub mod google_oauth;
pub mod mailer;
pub mod permission;

pub use bridge::{Bridge, CheckNow, PageMessage};
pub use gmail::{encode_raw_message, GmailApi, IMailApi};
pub use google_oauth::{
    connect_user_mailbox, generate_auth_url, get_valid_access_token, AccessTokenError,
    GoogleOAuthProvider, IOAuthProvider,
};
pub use mailer::{HttpMailer, IMailer};
pub use permission::{IPermissionPrompt, PermissionGate, StaticPrompt};
