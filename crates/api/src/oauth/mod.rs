mod get_auth_url;
mod oauth_callback;

use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/oauth/google",
        web::get().to(get_auth_url::get_auth_url_controller),
    );
    cfg.route(
        "/oauth/google/callback",
        web::get().to(oauth_callback::oauth_callback_controller),
    );
}
