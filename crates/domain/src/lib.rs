mod calendar;
mod email;
mod notification;
mod permission;
mod reminder;
mod shared;
mod user_integration;

pub use calendar::{
    escape_ics_value, unescape_ics_value, CalendarAttachment, CALENDAR_CONTENT_TYPE,
};
pub use email::{EmailAddress, InvalidEmailError};
pub use notification::LocalNotification;
pub use permission::{ClientProfile, NotificationSupport, Permission};
pub use reminder::{Reminder, ReminderChannel};
pub use shared::entity::{InvalidIDError, ID};
pub use user_integration::{IntegrationProvider, UserIntegration};
