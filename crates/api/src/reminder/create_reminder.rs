use crate::error::MatchminderError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use matchminder_api_structs::create_reminder::{APIResponse, RequestBody};
use matchminder_domain::{EmailAddress, Reminder, ReminderChannel, ID};
use matchminder_infra::{Bridge, MatchminderContext};

pub async fn create_reminder_controller(
    body: web::Json<RequestBody>,
    ctx: web::Data<MatchminderContext>,
    bridge: web::Data<Bridge>,
) -> Result<HttpResponse, MatchminderError> {
    let body = body.0;
    let usecase = CreateReminderUseCase {
        match_id: body.match_id,
        match_start_time: body.match_start_time,
        reminder_minutes: body.reminder_minutes,
        team1_name: body.team1_name,
        team2_name: body.team2_name,
        channel: body.channel,
        email: body.email,
        user_id: body.user_id,
        message: body.message,
    };

    let reminder = execute(usecase, &ctx).await.map_err(MatchminderError::from)?;

    // A changed store means the due-check should run again right away
    bridge.notify_check();

    Ok(HttpResponse::Ok().json(APIResponse::new(reminder)))
}

#[derive(Debug)]
pub struct CreateReminderUseCase {
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

#[derive(Debug)]
pub enum UseCaseError {
    InvalidEmail(String),
    InvalidReminderTime(i64),
    StorageError,
}

impl From<UseCaseError> for MatchminderError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::InvalidEmail(email) => Self::BadClientData(format!(
                "The given email address: {} is not valid.",
                email
            )),
            UseCaseError::InvalidReminderTime(minutes) => Self::BadClientData(format!(
                "The reminder time: {} minutes before the match is not valid.",
                minutes
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateReminderUseCase {
    type Response = Reminder;

    type Error = UseCaseError;

    const NAME: &'static str = "CreateReminder";

    async fn execute(&mut self, ctx: &MatchminderContext) -> Result<Self::Response, Self::Error> {
        if self.reminder_minutes <= 0 {
            return Err(UseCaseError::InvalidReminderTime(self.reminder_minutes));
        }

        let email = match (self.channel, self.email.take()) {
            (ReminderChannel::Email, Some(email)) => Some(
                EmailAddress::new(&email).map_err(|_| UseCaseError::InvalidEmail(email))?,
            ),
            (ReminderChannel::Email, None) => {
                return Err(UseCaseError::InvalidEmail("<missing>".to_string()))
            }
            // Addresses on non-email reminders are ignored
            _ => None,
        };

        let reminder = Reminder {
            id: Reminder::create_id(&self.match_id, self.channel),
            title: format!("{} vs {}", self.team1_name, self.team2_name),
            message: self
                .message
                .take()
                .unwrap_or_else(|| "Match is about to start!".to_string()),
            match_date: self.match_start_time.map(|d| d.timestamp_millis()),
            reminder_time: self.reminder_minutes,
            created: ctx.sys.get_timestamp_millis(),
            notified: false,
            email,
            channel: self.channel,
            user_id: self.user_id.take(),
        };

        ctx.repos
            .reminders
            .upsert(&reminder)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(reminder)
    }
}
