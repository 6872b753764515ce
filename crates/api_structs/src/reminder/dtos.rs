use chrono::{DateTime, TimeZone, Utc};
use matchminder_domain::{Reminder, ReminderChannel};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderDTO {
    pub id: String,
    pub title: String,
    pub message: String,
    pub match_date: Option<DateTime<Utc>>,
    /// Minutes before the match start at which the reminder fires
    pub reminder_time: i64,
    pub created: Option<DateTime<Utc>>,
    pub notified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub channel: ReminderChannel,
}

impl ReminderDTO {
    pub fn new(reminder: Reminder) -> Self {
        Self {
            id: reminder.id,
            title: reminder.title,
            message: reminder.message,
            match_date: reminder.match_date.and_then(timestamp_millis_to_datetime),
            reminder_time: reminder.reminder_time,
            created: timestamp_millis_to_datetime(reminder.created),
            notified: reminder.notified,
            email: reminder.email.map(|e| e.to_string()),
            channel: reminder.channel,
        }
    }
}

/// Uniform outcome of a delivery attempt, returned by the fan-out
/// boundary no matter which channel failed or succeeded
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryReportDTO {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_required: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_url: Option<String>,
}

fn timestamp_millis_to_datetime(ts: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ts).single()
}
