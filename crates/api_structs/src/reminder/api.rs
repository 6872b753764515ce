use crate::dtos::{DeliveryReportDTO, ReminderDTO};
use chrono::{DateTime, Utc};
use matchminder_domain::{Reminder, ReminderChannel, ID};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderResponse {
    pub reminder: ReminderDTO,
}

impl ReminderResponse {
    pub fn new(reminder: Reminder) -> Self {
        Self {
            reminder: ReminderDTO::new(reminder),
        }
    }
}

pub mod create_reminder {
    use super::*;

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub match_id: String,
        pub match_start_time: Option<DateTime<Utc>>,
        pub reminder_minutes: i64,
        pub team1_name: String,
        pub team2_name: String,
        pub channel: ReminderChannel,
        pub email: Option<String>,
        pub user_id: Option<ID>,
        pub message: Option<String>,
    }

    pub type APIResponse = ReminderResponse;
}

pub mod get_reminders {
    use super::*;

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub reminders: Vec<ReminderDTO>,
    }

    impl APIResponse {
        pub fn new(reminders: Vec<Reminder>) -> Self {
            Self {
                reminders: reminders.into_iter().map(ReminderDTO::new).collect(),
            }
        }
    }
}

pub mod get_reminder {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub reminder_id: String,
    }

    pub type APIResponse = ReminderResponse;
}

pub mod delete_reminder {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub reminder_id: String,
    }

    pub type APIResponse = ReminderResponse;
}

pub mod export_calendar {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub reminder_id: String,
    }
    // Response body is the text/calendar payload itself
}

pub mod send_email_reminder {
    use super::*;

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub email: String,
        pub title: String,
        pub message: String,
        pub match_date: Option<DateTime<Utc>>,
        pub reminder_minutes: i64,
        pub user_id: Option<ID>,
    }

    pub type APIResponse = DeliveryReportDTO;
}
