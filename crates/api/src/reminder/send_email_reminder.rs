use super::deliver::{send_reminder_email, DeliveryError};
use crate::error::MatchminderError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use matchminder_api_structs::send_email_reminder::RequestBody;
use matchminder_domain::{EmailAddress, ID};
use matchminder_infra::MatchminderContext;

/// Immediate send, used by deployments without the scheduled job. The
/// outcome is always a 200 with a delivery report so the client can
/// surface a mailbox reconnect flow when needed.
pub async fn send_email_reminder_controller(
    body: web::Json<RequestBody>,
    ctx: web::Data<MatchminderContext>,
) -> Result<HttpResponse, MatchminderError> {
    let body = body.0;
    let usecase = SendEmailReminderUseCase {
        email: body.email,
        title: body.title,
        message: body.message,
        match_date: body.match_date,
        reminder_minutes: body.reminder_minutes,
        user_id: body.user_id,
    };

    let report = DeliveryError::into_report(
        execute(usecase, &ctx).await,
        "Email reminder sent",
    );
    Ok(HttpResponse::Ok().json(report))
}

#[derive(Debug)]
pub struct SendEmailReminderUseCase {
    pub email: String,
    pub title: String,
    pub message: String,
    pub match_date: Option<DateTime<Utc>>,
    pub reminder_minutes: i64,
    pub user_id: Option<ID>,
}

#[async_trait::async_trait(?Send)]
impl UseCase for SendEmailReminderUseCase {
    type Response = ();

    type Error = DeliveryError;

    const NAME: &'static str = "SendEmailReminder";

    async fn execute(&mut self, ctx: &MatchminderContext) -> Result<Self::Response, Self::Error> {
        let to = EmailAddress::new(&self.email).map_err(|_| {
            DeliveryError::Validation(format!(
                "The given email address: {} is not valid.",
                self.email
            ))
        })?;

        let when = match self.match_date {
            Some(match_date) => format!("The match starts at {}.", match_date.to_rfc2822()),
            None => "The match is starting soon.".to_string(),
        };
        let html_body = format!(
            "<h2>{}</h2><p>{}</p><p>{}</p>",
            self.title, self.message, when
        );

        send_reminder_email(&to, &self.title, &html_body, self.user_id.as_ref(), ctx).await
    }
}
