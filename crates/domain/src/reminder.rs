use crate::{email::EmailAddress, shared::entity::ID};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

const MILLIS_PER_MINUTE: i64 = 1000 * 60;

/// The delivery channel a user picked when creating a `Reminder`.
/// A `Reminder` is delivered over exactly one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderChannel {
    /// A local notification shown by the page context
    Notification,
    /// An iCalendar attachment offered as a download
    Calendar,
    /// An email sent close to the fire time
    Email,
}

impl Display for ReminderChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let repr = match self {
            Self::Notification => "notification",
            Self::Calendar => "calendar",
            Self::Email => "email",
        };
        write!(f, "{}", repr)
    }
}

/// A `Reminder` represents the intent to notify a user over a single
/// channel some minutes before a match begins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    /// Stable identifier, unique per match and channel. Creating a
    /// `Reminder` with an existing id overwrites the stored record.
    pub id: String,
    /// Display string for the matchup, e.g. "NaVi vs FaZe"
    pub title: String,
    /// Free text shown in the notification or email body
    pub message: String,
    /// Timestamp in millis of the match start, `None` when the
    /// start time is not announced yet
    pub match_date: Option<i64>,
    /// Minutes before `match_date` at which the reminder should fire
    pub reminder_time: i64,
    /// Timestamp in millis of record creation
    pub created: i64,
    /// Set to true when delivery succeeds. Delivery paths claim the flag
    /// first and release it again if the send fails, so it only sticks
    /// for a successful delivery
    pub notified: bool,
    /// Destination address, present only for email-channel reminders
    pub email: Option<EmailAddress>,
    pub channel: ReminderChannel,
    /// Owner of the reminder, used to look up a per-user mailbox
    /// integration for the email channel
    pub user_id: Option<ID>,
}

impl Reminder {
    /// Derives the stable reminder id for a match and channel
    pub fn create_id(match_id: &str, channel: ReminderChannel) -> String {
        format!("match_{}_{}", match_id, channel)
    }

    /// The timestamp in millis at which this reminder becomes eligible
    /// for delivery, or `None` when the match start is unknown
    pub fn fire_at(&self) -> Option<i64> {
        self.match_date
            .map(|match_date| match_date - self.reminder_time * MILLIS_PER_MINUTE)
    }

    /// A reminder is due when `now` is inside the half-open fire window
    /// `[match_date - reminder_time, match_date)` and it has not been
    /// delivered yet. Outside that window it is never eligible.
    pub fn is_due(&self, now: i64) -> bool {
        if self.notified {
            return false;
        }
        match (self.fire_at(), self.match_date) {
            (Some(fire_at), Some(match_date)) => fire_at <= now && now < match_date,
            _ => false,
        }
    }

    /// Whether the fire window has passed without delivery. Such
    /// reminders are permanently missed, there is no catch-up.
    pub fn is_expired(&self, now: i64) -> bool {
        match self.match_date {
            Some(match_date) => now >= match_date,
            None => false,
        }
    }
}
