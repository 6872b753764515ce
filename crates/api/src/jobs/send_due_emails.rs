use crate::error::MatchminderError;
use crate::reminder::deliver::send_reminder_email;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpRequest, HttpResponse};
use matchminder_api_structs::send_reminders::APIResponse;
use matchminder_infra::MatchminderContext;
use tracing::{error, info};

/// External scheduled trigger. The caller authorizes with the
/// deployment's cron secret, not with a user credential.
pub async fn send_due_emails_controller(
    http_req: HttpRequest,
    ctx: web::Data<MatchminderContext>,
) -> Result<HttpResponse, MatchminderError> {
    let authorized = http_req
        .headers()
        .get("Authorization")
        .and_then(|header| header.to_str().ok())
        .map(|header| header == format!("Bearer {}", ctx.config.cron_secret))
        .unwrap_or(false);
    if !authorized {
        return Err(MatchminderError::Unauthorized(
            "Invalid or missing cron secret".to_string(),
        ));
    }

    let usecase = SendDueEmailsUseCase {};

    execute(usecase, &ctx)
        .await
        .map(|reminders_sent| HttpResponse::Ok().json(APIResponse { reminders_sent }))
        .map_err(MatchminderError::from)
}

#[derive(Debug)]
pub struct SendDueEmailsUseCase {}

#[derive(Debug)]
pub enum UseCaseError {}

impl From<UseCaseError> for MatchminderError {
    fn from(e: UseCaseError) -> Self {
        match e {}
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for SendDueEmailsUseCase {
    type Response = usize;

    type Error = UseCaseError;

    const NAME: &'static str = "SendDueEmails";

    async fn execute(&mut self, ctx: &MatchminderContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.get_timestamp_millis();
        let due = ctx
            .repos
            .reminders
            .find_due_emails(now, ctx.config.email_job_horizon)
            .await;
        info!("Found {} email reminders due for sending", due.len());

        let mut sent = 0;
        for reminder in due {
            // One broken record must not block the rest of the batch
            if !ctx.repos.reminders.mark_notified(&reminder.id).await {
                continue;
            }
            let to = match &reminder.email {
                Some(email) => email,
                None => {
                    error!("Email reminder {} has no destination address", reminder.id);
                    continue;
                }
            };
            let html_body = format!("<h2>{}</h2><p>{}</p>", reminder.title, reminder.message);
            match send_reminder_email(to, &reminder.title, &html_body, reminder.user_id.as_ref(), ctx)
                .await
            {
                Ok(_) => sent += 1,
                Err(e) => {
                    error!("Unable to send email reminder {}: {}", reminder.id, e);
                    // Release the claim so the next job run retries it,
                    // e.g. after the user reconnects their mailbox. The
                    // snapshot still carries notified == false.
                    if let Err(e) = ctx.repos.reminders.upsert(&reminder).await {
                        error!("Unable to release claim on reminder {}: {:?}", reminder.id, e);
                    }
                }
            }
        }

        Ok(sent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use matchminder_domain::{EmailAddress, Reminder, ReminderChannel};
    use matchminder_infra::IMailer;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    struct RecordingMailer {
        sends: AtomicUsize,
        reject: Mutex<Option<String>>,
    }

    #[async_trait::async_trait]
    impl IMailer for RecordingMailer {
        async fn send(
            &self,
            to: &EmailAddress,
            _subject: &str,
            _html_body: &str,
            _text_body: &str,
        ) -> anyhow::Result<()> {
            if self.reject.lock().unwrap().as_deref() == Some(to.as_str()) {
                return Err(anyhow::Error::msg("mailbox full"));
            }
            self.sends.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct StaticTimeSys(i64);
    impl matchminder_infra::ISys for StaticTimeSys {
        fn get_timestamp_millis(&self) -> i64 {
            self.0
        }
    }

    fn email_reminder(match_id: &str, address: &str, fire_at: i64) -> Reminder {
        Reminder {
            id: Reminder::create_id(match_id, ReminderChannel::Email),
            title: "NaVi vs FaZe".into(),
            message: "Match is about to start!".into(),
            // fire time is match_date - reminder_time minutes
            match_date: Some(fire_at + 15 * 60 * 1000),
            reminder_time: 15,
            created: 0,
            notified: false,
            email: Some(EmailAddress::new(address).expect("Valid email")),
            channel: ReminderChannel::Email,
            user_id: None,
        }
    }

    async fn ctx_with_mailer(now: i64, mailer: Arc<RecordingMailer>) -> MatchminderContext {
        let mut ctx = MatchminderContext::create_inmemory();
        ctx.sys = Arc::new(StaticTimeSys(now));
        ctx.services.mailer = mailer;
        ctx
    }

    #[tokio::test]
    async fn sends_and_marks_due_email_reminders() {
        let mailer = Arc::new(RecordingMailer {
            sends: AtomicUsize::new(0),
            reject: Mutex::new(None),
        });
        let now = 1000 * 60 * 60;
        let ctx = ctx_with_mailer(now, mailer.clone()).await;

        let due = email_reminder("1", "a@example.com", now + 60 * 1000);
        let far_away = email_reminder("2", "b@example.com", now + 60 * 60 * 1000);
        ctx.repos.reminders.upsert(&due).await.expect("To insert");
        ctx.repos.reminders.upsert(&far_away).await.expect("To insert");

        let sent = execute(SendDueEmailsUseCase {}, &ctx)
            .await
            .expect("To run job");
        assert_eq!(sent, 1);
        assert_eq!(mailer.sends.load(Ordering::SeqCst), 1);

        assert!(ctx.repos.reminders.find(&due.id).await.unwrap().notified);
        assert!(!ctx.repos.reminders.find(&far_away.id).await.unwrap().notified);

        // The job is idempotent once a reminder has been claimed
        let sent = execute(SendDueEmailsUseCase {}, &ctx)
            .await
            .expect("To run job");
        assert_eq!(sent, 0);
        assert_eq!(mailer.sends.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failing_record_does_not_block_the_batch() {
        let mailer = Arc::new(RecordingMailer {
            sends: AtomicUsize::new(0),
            reject: Mutex::new(Some("broken@example.com".to_string())),
        });
        let now = 1000 * 60 * 60;
        let ctx = ctx_with_mailer(now, mailer.clone()).await;

        let broken = email_reminder("1", "broken@example.com", now + 60 * 1000);
        let healthy = email_reminder("2", "healthy@example.com", now + 2 * 60 * 1000);
        ctx.repos.reminders.upsert(&broken).await.expect("To insert");
        ctx.repos.reminders.upsert(&healthy).await.expect("To insert");

        let sent = execute(SendDueEmailsUseCase {}, &ctx)
            .await
            .expect("To run job");
        assert_eq!(sent, 1);
        assert_eq!(mailer.sends.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_send_is_retried_on_the_next_job_run() {
        let mailer = Arc::new(RecordingMailer {
            sends: AtomicUsize::new(0),
            reject: Mutex::new(Some("flaky@example.com".to_string())),
        });
        let now = 1000 * 60 * 60;
        let ctx = ctx_with_mailer(now, mailer.clone()).await;

        let reminder = email_reminder("1", "flaky@example.com", now + 60 * 1000);
        ctx.repos.reminders.upsert(&reminder).await.expect("To insert");

        let sent = execute(SendDueEmailsUseCase {}, &ctx)
            .await
            .expect("To run job");
        assert_eq!(sent, 0);

        // The failed send released the claim instead of burning it
        let stored = ctx.repos.reminders.find(&reminder.id).await.unwrap();
        assert!(!stored.notified);

        // Once the mailbox recovers the next run picks it up again
        *mailer.reject.lock().unwrap() = None;
        let sent = execute(SendDueEmailsUseCase {}, &ctx)
            .await
            .expect("To run job");
        assert_eq!(sent, 1);
        assert_eq!(mailer.sends.load(Ordering::SeqCst), 1);
        assert!(ctx.repos.reminders.find(&reminder.id).await.unwrap().notified);
    }
}
