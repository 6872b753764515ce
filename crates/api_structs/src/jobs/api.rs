use serde::{Deserialize, Serialize};

pub mod send_reminders {
    use super::*;

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub reminders_sent: usize,
    }
}
