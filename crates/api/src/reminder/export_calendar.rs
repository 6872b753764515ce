use crate::error::MatchminderError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{http::header, web, HttpResponse};
use matchminder_api_structs::export_calendar::PathParams;
use matchminder_domain::{CalendarAttachment, CALENDAR_CONTENT_TYPE};
use matchminder_infra::MatchminderContext;

pub async fn export_calendar_controller(
    path: web::Path<PathParams>,
    ctx: web::Data<MatchminderContext>,
) -> Result<HttpResponse, MatchminderError> {
    let usecase = ExportCalendarUseCase {
        reminder_id: path.reminder_id.clone(),
    };

    let attachment = execute(usecase, &ctx).await.map_err(MatchminderError::from)?;

    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, CALENDAR_CONTENT_TYPE))
        .insert_header((
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"match-reminder.ics\"",
        ))
        .body(attachment.to_ics()))
}

#[derive(Debug)]
pub struct ExportCalendarUseCase {
    pub reminder_id: String,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(String),
    MissingStartTime(String),
}

impl From<UseCaseError> for MatchminderError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(reminder_id) => Self::NotFound(format!(
                "The reminder with id: {}, was not found.",
                reminder_id
            )),
            UseCaseError::MissingStartTime(reminder_id) => Self::BadClientData(format!(
                "The match start time for reminder: {} is not announced yet, there is nothing to put on a calendar.",
                reminder_id
            )),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for ExportCalendarUseCase {
    type Response = CalendarAttachment;

    type Error = UseCaseError;

    const NAME: &'static str = "ExportCalendar";

    async fn execute(&mut self, ctx: &MatchminderContext) -> Result<Self::Response, Self::Error> {
        let reminder = ctx
            .repos
            .reminders
            .find(&self.reminder_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.reminder_id.clone()))?;

        let start_ts = reminder
            .match_date
            .ok_or_else(|| UseCaseError::MissingStartTime(self.reminder_id.clone()))?;

        Ok(CalendarAttachment {
            title: reminder.title,
            description: reminder.message,
            start_ts,
            reminder_minutes: reminder.reminder_time,
        })
    }
}
