use crate::error::MatchminderError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use matchminder_api_structs::get_reminders::APIResponse;
use matchminder_domain::Reminder;
use matchminder_infra::MatchminderContext;

pub async fn get_reminders_controller(
    ctx: web::Data<MatchminderContext>,
) -> Result<HttpResponse, MatchminderError> {
    let usecase = GetRemindersUseCase {};

    execute(usecase, &ctx)
        .await
        .map(|reminders| HttpResponse::Ok().json(APIResponse::new(reminders)))
        .map_err(MatchminderError::from)
}

#[derive(Debug)]
pub struct GetRemindersUseCase {}

#[derive(Debug)]
pub enum UseCaseError {}

impl From<UseCaseError> for MatchminderError {
    fn from(e: UseCaseError) -> Self {
        match e {}
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetRemindersUseCase {
    type Response = Vec<Reminder>;

    type Error = UseCaseError;

    const NAME: &'static str = "GetReminders";

    async fn execute(&mut self, ctx: &MatchminderContext) -> Result<Self::Response, Self::Error> {
        Ok(ctx.repos.reminders.find_all().await)
    }
}
