use crate::error::MatchminderError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use matchminder_api_structs::delete_reminder::{APIResponse, PathParams};
use matchminder_domain::Reminder;
use matchminder_infra::{Bridge, MatchminderContext};

pub async fn delete_reminder_controller(
    path: web::Path<PathParams>,
    ctx: web::Data<MatchminderContext>,
    bridge: web::Data<Bridge>,
) -> Result<HttpResponse, MatchminderError> {
    let usecase = DeleteReminderUseCase {
        reminder_id: path.reminder_id.clone(),
    };

    let reminder = execute(usecase, &ctx).await.map_err(MatchminderError::from)?;
    bridge.notify_check();

    Ok(HttpResponse::Ok().json(APIResponse::new(reminder)))
}

#[derive(Debug)]
pub struct DeleteReminderUseCase {
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
impl UseCase for DeleteReminderUseCase {
    type Response = Reminder;

    type Error = UseCaseError;

    const NAME: &'static str = "DeleteReminder";

    async fn execute(&mut self, ctx: &MatchminderContext) -> Result<Self::Response, Self::Error> {
        ctx.repos
            .reminders
            .delete(&self.reminder_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.reminder_id.clone()))
    }
}
