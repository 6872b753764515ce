use matchminder_domain::ID;
use serde::{Deserialize, Serialize};

pub mod get_auth_url {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct QueryParams {
        pub user_id: Option<ID>,
    }

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub auth_url: String,
    }
}

pub mod oauth_callback {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    pub struct QueryParams {
        pub code: Option<String>,
        /// Carries the user id across the consent redirect
        pub state: Option<String>,
    }
}
