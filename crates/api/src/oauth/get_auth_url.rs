use crate::error::MatchminderError;
use actix_web::{web, HttpResponse};
use matchminder_api_structs::get_auth_url::{APIResponse, QueryParams};
use matchminder_infra::{generate_auth_url, MatchminderContext};

pub async fn get_auth_url_controller(
    query: web::Query<QueryParams>,
    ctx: web::Data<MatchminderContext>,
) -> Result<HttpResponse, MatchminderError> {
    let settings = ctx.config.google.as_ref().ok_or_else(|| {
        MatchminderError::Conflict("Google OAuth is not configured for this deployment.".to_string())
    })?;

    let auth_url = generate_auth_url(settings, query.user_id.as_ref());
    Ok(HttpResponse::Ok().json(APIResponse { auth_url }))
}
