use matchminder_domain::{LocalNotification, Reminder};
use std::sync::Mutex;
use tokio::sync::{mpsc, oneshot};
use tracing::warn;

/// Messages the background context sends to the page context. The page
/// context is the only one with write access to the durable store, so
/// reads and re-persists have to be relayed through it.
#[derive(Debug)]
pub enum PageMessage {
    /// Request the current reminder list over a transient reply channel
    GetReminders {
        reply: oneshot::Sender<Vec<Reminder>>,
    },
    /// Claim a reminder through the store's compare-and-set before
    /// delivering it. The reply is whether this claim won; a losing
    /// claim means another trigger already holds the reminder.
    ClaimReminder {
        reminder_id: String,
        reply: oneshot::Sender<bool>,
    },
    /// Re-persist reminders the background context has marked notified,
    /// so the canonical copy stays in sync
    PersistReminders(Vec<Reminder>),
    /// Show an OS-level notification to the user
    ShowNotification(LocalNotification),
}

/// Fire-and-forget wake-up signal from the page context: a reminder
/// changed, re-check now
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CheckNow;

/// Explicit request/reply channel between the page context and the
/// background context. Neither context shares memory with the other
/// beyond this bridge.
pub struct Bridge {
    page_tx: Mutex<Option<mpsc::UnboundedSender<PageMessage>>>,
    check_tx: mpsc::UnboundedSender<CheckNow>,
    check_rx: Mutex<Option<mpsc::UnboundedReceiver<CheckNow>>>,
}

impl Bridge {
    pub fn new() -> Self {
        let (check_tx, check_rx) = mpsc::unbounded_channel();
        Self {
            page_tx: Mutex::new(None),
            check_tx,
            check_rx: Mutex::new(Some(check_rx)),
        }
    }

    /// Attaches a page context, replacing any previous one. The
    /// returned receiver is the page's mailbox.
    pub fn attach_page(&self) -> mpsc::UnboundedReceiver<PageMessage> {
        let (tx, rx) = mpsc::unbounded_channel();
        *self.page_tx.lock().unwrap() = Some(tx);
        rx
    }

    /// Page -> background: a reminder changed, please re-check. Dropped
    /// silently if no background worker is listening.
    pub fn notify_check(&self) {
        let _ = self.check_tx.send(CheckNow);
    }

    /// Taken once by the background worker at startup
    pub fn take_check_signal(&self) -> Option<mpsc::UnboundedReceiver<CheckNow>> {
        self.check_rx.lock().unwrap().take()
    }

    /// Background -> page: ask for the current reminder list. Returns
    /// `None` when no page is open, in which case the check is a no-op.
    pub async fn request_reminders(&self) -> Option<Vec<Reminder>> {
        let page_tx = self.page_tx.lock().unwrap().clone()?;
        let (reply_tx, reply_rx) = oneshot::channel();
        if page_tx.send(PageMessage::GetReminders { reply: reply_tx }).is_err() {
            self.detach_page();
            return None;
        }
        match reply_rx.await {
            Ok(reminders) => Some(reminders),
            Err(_) => {
                warn!("Page context dropped the reminder reply channel");
                None
            }
        }
    }

    /// Background -> page: claim a reminder via the store's
    /// compare-and-set. Returns false when no page is open or the
    /// claim lost, in both cases the caller must not deliver.
    pub async fn claim_reminder(&self, reminder_id: &str) -> bool {
        let page_tx = match self.page_tx.lock().unwrap().clone() {
            Some(tx) => tx,
            None => return false,
        };
        let (reply_tx, reply_rx) = oneshot::channel();
        let message = PageMessage::ClaimReminder {
            reminder_id: reminder_id.to_string(),
            reply: reply_tx,
        };
        if page_tx.send(message).is_err() {
            self.detach_page();
            return false;
        }
        match reply_rx.await {
            Ok(claimed) => claimed,
            Err(_) => {
                warn!("Page context dropped the claim reply channel");
                false
            }
        }
    }

    /// Background -> page: hand back an updated list for re-persisting.
    /// Returns whether a page was there to receive it.
    pub fn persist_reminders(&self, reminders: Vec<Reminder>) -> bool {
        self.send_to_page(PageMessage::PersistReminders(reminders))
    }

    /// Background -> page: display a notification. Returns whether a
    /// page was there to receive it.
    pub fn show_notification(&self, notification: LocalNotification) -> bool {
        self.send_to_page(PageMessage::ShowNotification(notification))
    }

    fn send_to_page(&self, message: PageMessage) -> bool {
        let page_tx = match self.page_tx.lock().unwrap().clone() {
            Some(tx) => tx,
            None => return false,
        };
        if page_tx.send(message).is_err() {
            self.detach_page();
            return false;
        }
        true
    }

    fn detach_page(&self) {
        *self.page_tx.lock().unwrap() = None;
    }
}

impl Default for Bridge {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use matchminder_domain::ReminderChannel;

    fn reminder_factory(id: &str) -> Reminder {
        Reminder {
            id: id.to_string(),
            title: "NaVi vs FaZe".into(),
            message: "Match is about to start!".into(),
            match_date: Some(1000),
            reminder_time: 15,
            created: 0,
            notified: false,
            email: None,
            channel: ReminderChannel::Notification,
            user_id: None,
        }
    }

    #[tokio::test]
    async fn request_without_page_is_noop() {
        let bridge = Bridge::new();
        assert_eq!(bridge.request_reminders().await, None);
        assert!(!bridge.claim_reminder("match_1_notification").await);
        assert!(!bridge.persist_reminders(vec![]));
        assert!(!bridge.show_notification(LocalNotification {
            title: "t".into(),
            body: "b".into(),
            icon: "i".into(),
            match_id: "1".into(),
        }));
    }

    #[tokio::test]
    async fn page_answers_reminder_requests() {
        let bridge = Bridge::new();
        let mut page_rx = bridge.attach_page();

        let page = tokio::spawn(async move {
            match page_rx.recv().await {
                Some(PageMessage::GetReminders { reply }) => {
                    let _ = reply.send(vec![reminder_factory("match_1_notification")]);
                }
                other => panic!("Unexpected message: {:?}", other),
            }
        });

        let reminders = bridge.request_reminders().await.expect("Reminder list");
        assert_eq!(reminders.len(), 1);
        assert_eq!(reminders[0].id, "match_1_notification");
        page.await.expect("Page task");
    }

    #[tokio::test]
    async fn claim_replies_come_from_the_page() {
        let bridge = Bridge::new();
        let mut page_rx = bridge.attach_page();

        let page = tokio::spawn(async move {
            for answer in [true, false] {
                match page_rx.recv().await {
                    Some(PageMessage::ClaimReminder { reminder_id, reply }) => {
                        assert_eq!(reminder_id, "match_1_notification");
                        let _ = reply.send(answer);
                    }
                    other => panic!("Unexpected message: {:?}", other),
                }
            }
        });

        assert!(bridge.claim_reminder("match_1_notification").await);
        assert!(!bridge.claim_reminder("match_1_notification").await);
        page.await.expect("Page task");
    }

    #[tokio::test]
    async fn check_signal_reaches_background_worker() {
        let bridge = Bridge::new();
        let mut check_rx = bridge.take_check_signal().expect("Signal receiver");
        // Only one worker may take the receiver
        assert!(bridge.take_check_signal().is_none());

        bridge.notify_check();
        assert_eq!(check_rx.recv().await, Some(CheckNow));
    }

    #[tokio::test]
    async fn closed_page_is_detached() {
        let bridge = Bridge::new();
        let page_rx = bridge.attach_page();
        drop(page_rx);

        assert!(!bridge.persist_reminders(vec![reminder_factory("match_1_notification")]));
        assert_eq!(bridge.request_reminders().await, None);
    }
}
