use crate::reminder::check_due::CheckDueRemindersUseCase;
use crate::shared::usecase::execute;
use actix_web::rt::time::interval;
use matchminder_domain::{LocalNotification, Permission, ReminderChannel};
use matchminder_infra::{Bridge, MatchminderContext, PageMessage, PermissionGate};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

const FOREGROUND_INTERVAL_SECS: u64 = 60;
const BACKGROUND_INTERVAL_SECS: u64 = 15 * 60;

/// The foreground job polls on a short fixed interval while the page
/// context is alive
pub fn start_foreground_check_job(
    ctx: MatchminderContext,
    gate: Arc<PermissionGate>,
    bridge: Arc<Bridge>,
    check_lock: Arc<Mutex<()>>,
) {
    actix_web::rt::spawn(async move {
        let mut ticker = interval(Duration::from_secs(FOREGROUND_INTERVAL_SECS));
        loop {
            ticker.tick().await;
            // Both jobs funnel through one lock so a slow tick can
            // never overlap with the next one
            let _guard = check_lock.lock().await;
            let usecase = CheckDueRemindersUseCase {
                now: ctx.sys.get_timestamp_millis(),
                gate: gate.clone(),
                bridge: bridge.clone(),
            };
            let _ = execute(usecase, &ctx).await;
        }
    });
}

/// The background job runs on a long best-effort interval and is also
/// woken whenever the page context reports a changed store. It has no
/// direct store access, everything goes over the bridge.
pub fn start_background_check_job(
    ctx: MatchminderContext,
    gate: Arc<PermissionGate>,
    bridge: Arc<Bridge>,
    check_lock: Arc<Mutex<()>>,
) {
    let mut check_rx = bridge.take_check_signal();
    actix_web::rt::spawn(async move {
        let mut ticker = interval(Duration::from_secs(BACKGROUND_INTERVAL_SECS));
        loop {
            match check_rx.as_mut() {
                Some(rx) => {
                    tokio::select! {
                        _ = ticker.tick() => {}
                        signal = rx.recv() => {
                            if signal.is_none() {
                                check_rx = None;
                                continue;
                            }
                        }
                    }
                }
                None => {
                    ticker.tick().await;
                }
            }

            let _guard = check_lock.lock().await;
            let now = ctx.sys.get_timestamp_millis();
            run_background_check(&gate, &bridge, now).await;
        }
    });
}

/// One bridge-only due-check pass: fetch the reminder list from the
/// page context, claim and show the due ones, hand the updated list
/// back for re-persisting. Every claim goes through the store's
/// compare-and-set on the other side of the bridge, so a foreground
/// tick racing on the same reminder loses before anything is shown.
/// A detached page turns the whole pass into a no-op.
pub async fn run_background_check(gate: &PermissionGate, bridge: &Bridge, now: i64) -> usize {
    if !gate.check_support().supported || gate.get_permission() != Permission::Granted {
        return 0;
    }
    let mut reminders = match bridge.request_reminders().await {
        Some(reminders) => reminders,
        None => return 0,
    };

    let mut delivered = 0;
    let mut claimed_any = false;
    for reminder in reminders.iter_mut() {
        if reminder.channel != ReminderChannel::Notification || !reminder.is_due(now) {
            continue;
        }
        if !bridge.claim_reminder(&reminder.id).await {
            continue;
        }
        claimed_any = true;

        let notification = LocalNotification {
            title: reminder.title.clone(),
            body: reminder.message.clone(),
            icon: "/icons/match-reminder.png".to_string(),
            match_id: LocalNotification::match_id_from_reminder_id(&reminder.id),
        };
        if bridge.show_notification(notification) {
            reminder.notified = true;
            delivered += 1;
        } else {
            // Hand the claim back unnotified so a later pass retries it
            warn!("Page context went away while showing reminder {}", reminder.id);
        }
    }

    if claimed_any && !bridge.persist_reminders(reminders) {
        warn!("Page context went away before the claimed reminders could be re-persisted");
    }
    delivered
}

/// Serves the page side of the bridge from the durable store. This is
/// the only task with write access to the store on behalf of the
/// background context.
pub fn start_page_context(ctx: MatchminderContext, bridge: Arc<Bridge>) {
    let mut mailbox = bridge.attach_page();
    actix_web::rt::spawn(async move {
        while let Some(message) = mailbox.recv().await {
            match message {
                PageMessage::GetReminders { reply } => {
                    let _ = reply.send(ctx.repos.reminders.find_all().await);
                }
                PageMessage::ClaimReminder { reminder_id, reply } => {
                    let _ = reply.send(ctx.repos.reminders.mark_notified(&reminder_id).await);
                }
                PageMessage::PersistReminders(reminders) => {
                    if let Err(e) = ctx.repos.reminders.save_all(&reminders).await {
                        error!("Unable to persist reminders from the background context: {:?}", e);
                    }
                }
                PageMessage::ShowNotification(notification) => {
                    info!(
                        title = %notification.title,
                        match_id = %notification.match_id,
                        "Showing match notification"
                    );
                }
            }
        }
    });
}
