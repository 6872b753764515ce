use crate::error::MatchminderError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use matchminder_api_structs::get_reminder::{APIResponse, PathParams};
use matchminder_domain::Reminder;
use matchminder_infra::MatchminderContext;

pub async fn get_reminder_controller(
    path: web::Path<PathParams>,
    ctx: web::Data<MatchminderContext>,
) -> Result<HttpResponse, MatchminderError> {
    let usecase = GetReminderUseCase {
        reminder_id: path.reminder_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|reminder| HttpResponse::Ok().json(APIResponse::new(reminder)))
        .map_err(MatchminderError::from)
}

#[derive(Debug)]
pub struct GetReminderUseCase {
    pub reminder_id: String,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(String),
}

impl From<UseCaseError> for MatchminderError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(reminder_id) => Self::NotFound(format!(
                "The reminder with id: {}, was not found.",
                reminder_id
            )),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetReminderUseCase {
    type Response = Reminder;

    type Error = UseCaseError;

    const NAME: &'static str = "GetReminder";

    async fn execute(&mut self, ctx: &MatchminderContext) -> Result<Self::Response, Self::Error> {
        ctx.repos
            .reminders
            .find(&self.reminder_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.reminder_id.clone()))
    }
}
