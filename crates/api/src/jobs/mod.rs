mod send_due_emails;

use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/jobs/send-reminders",
        web::post().to(send_due_emails::send_due_emails_controller),
    );
}
