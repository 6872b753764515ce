use super::deliver::deliver;
use crate::shared::usecase::UseCase;
use matchminder_domain::{Permission, ReminderChannel};
use matchminder_infra::{Bridge, MatchminderContext, PermissionGate};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// One serialized pass over the store: claim every due, unsent
/// notification reminder and push it to the page context. Claiming
/// happens before delivery, so concurrent ticks cannot fire the same
/// reminder twice. A failed delivery releases the claim again and the
/// reminder is retried on a later tick.
pub struct CheckDueRemindersUseCase {
    pub now: i64,
    pub gate: Arc<PermissionGate>,
    pub bridge: Arc<Bridge>,
}

impl fmt::Debug for CheckDueRemindersUseCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckDueRemindersUseCase")
            .field("now", &self.now)
            .finish()
    }
}

#[derive(Debug)]
pub enum UseCaseError {}

#[async_trait::async_trait(?Send)]
impl UseCase for CheckDueRemindersUseCase {
    type Response = usize;

    type Error = UseCaseError;

    const NAME: &'static str = "CheckDueReminders";

    async fn execute(&mut self, ctx: &MatchminderContext) -> Result<Self::Response, Self::Error> {
        if !self.gate.check_support().supported
            || self.gate.get_permission() != Permission::Granted
        {
            debug!("Skipping due-check, notifications are unavailable or not permitted");
            return Ok(0);
        }

        let reminders = ctx.repos.reminders.find_all().await;
        let mut delivered = 0;
        for reminder in reminders {
            if reminder.channel != ReminderChannel::Notification || !reminder.is_due(self.now) {
                continue;
            }
            // Claim before delivering. Another tick that raced us on
            // this reminder loses the compare-and-set and skips it.
            if !ctx.repos.reminders.mark_notified(&reminder.id).await {
                continue;
            }
            if let Err(e) = deliver(&reminder, ctx, &self.gate, &self.bridge).await {
                warn!("Unable to deliver claimed reminder {}: {}", reminder.id, e);
                // Release the claim for the next tick. The snapshot
                // still carries notified == false.
                if let Err(e) = ctx.repos.reminders.upsert(&reminder).await {
                    warn!("Unable to release claim on reminder {}: {:?}", reminder.id, e);
                }
                continue;
            }
            delivered += 1;
        }

        Ok(delivered)
    }
}
