pub mod check_due;
mod create_reminder;
mod delete_reminder;
pub mod deliver;
mod export_calendar;
mod get_reminder;
mod get_reminders;
mod send_email_reminder;

use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/reminders",
        web::post().to(create_reminder::create_reminder_controller),
    );
    cfg.route(
        "/reminders",
        web::get().to(get_reminders::get_reminders_controller),
    );
    cfg.route(
        "/reminders/{reminder_id}",
        web::get().to(get_reminder::get_reminder_controller),
    );
    cfg.route(
        "/reminders/{reminder_id}",
        web::delete().to(delete_reminder::delete_reminder_controller),
    );
    cfg.route(
        "/reminders/{reminder_id}/calendar",
        web::get().to(export_calendar::export_calendar_controller),
    );
    cfg.route(
        "/reminders/email",
        web::post().to(send_email_reminder::send_email_reminder_controller),
    );
}
