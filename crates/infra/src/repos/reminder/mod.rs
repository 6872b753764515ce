mod inmemory;
mod local_storage;

pub use inmemory::InMemoryReminderRepo;
pub use local_storage::LocalStorageReminderRepo;

use matchminder_domain::Reminder;

#[async_trait::async_trait]
pub trait IReminderRepo: Send + Sync {
    /// Insert or overwrite by reminder id
    async fn upsert(&self, reminder: &Reminder) -> anyhow::Result<()>;
    async fn find(&self, reminder_id: &str) -> Option<Reminder>;
    /// Snapshot copy of the whole store
    async fn find_all(&self) -> Vec<Reminder>;
    /// Unsent email reminders whose fire time falls within
    /// `[now, now + horizon]`, used by the scheduled delivery job
    async fn find_due_emails(&self, now: i64, horizon: i64) -> Vec<Reminder>;
    async fn delete(&self, reminder_id: &str) -> Option<Reminder>;
    /// Compare-and-set of the notified flag. Returns true only for the
    /// single caller that performed the false -> true transition, so
    /// concurrent ticks cannot both claim the same reminder.
    async fn mark_notified(&self, reminder_id: &str) -> bool;
    /// Apply updates from the background context to records that still
    /// exist. Ids deleted since the list was handed out are skipped, so
    /// a stale copy cannot resurrect them
    async fn save_all(&self, reminders: &[Reminder]) -> anyhow::Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use matchminder_domain::{EmailAddress, ReminderChannel};
    use std::sync::Arc;

    fn reminder_factory(id: &str, channel: ReminderChannel) -> Reminder {
        Reminder {
            id: id.to_string(),
            title: "NaVi vs FaZe".into(),
            message: "Match is about to start!".into(),
            match_date: Some(1000 * 60 * 60),
            reminder_time: 15,
            created: 0,
            notified: false,
            email: match channel {
                ReminderChannel::Email => Some(
                    EmailAddress::new("user@example.com").expect("Valid email"),
                ),
                _ => None,
            },
            channel,
            user_id: None,
        }
    }

    fn repos() -> Vec<Arc<dyn IReminderRepo>> {
        let path = std::env::temp_dir().join(format!(
            "matchminder_reminder_repo_{}_{}.json",
            std::process::id(),
            matchminder_utils::create_random_secret(8),
        ));
        vec![
            Arc::new(InMemoryReminderRepo::new()),
            Arc::new(LocalStorageReminderRepo::new(path)),
        ]
    }

    #[tokio::test]
    async fn upsert_by_id_is_idempotent() {
        for repo in repos() {
            let mut reminder = reminder_factory("match_1_notification", ReminderChannel::Notification);
            repo.upsert(&reminder).await.expect("To upsert");
            reminder.message = "Updated message".into();
            repo.upsert(&reminder).await.expect("To upsert");

            let all = repo.find_all().await;
            assert_eq!(all.len(), 1);
            assert_eq!(all[0].message, "Updated message");
        }
    }

    #[tokio::test]
    async fn find_and_delete() {
        for repo in repos() {
            let reminder = reminder_factory("match_1_notification", ReminderChannel::Notification);
            repo.upsert(&reminder).await.expect("To upsert");

            assert_eq!(repo.find("match_1_notification").await, Some(reminder.clone()));
            assert_eq!(repo.find("unknown").await, None);

            assert_eq!(repo.delete("match_1_notification").await, Some(reminder));
            // Deleting an absent id is a no-op
            assert_eq!(repo.delete("match_1_notification").await, None);
            assert!(repo.find_all().await.is_empty());
        }
    }

    #[tokio::test]
    async fn mark_notified_transitions_exactly_once() {
        for repo in repos() {
            let reminder = reminder_factory("match_1_notification", ReminderChannel::Notification);
            repo.upsert(&reminder).await.expect("To upsert");

            assert!(repo.mark_notified("match_1_notification").await);
            // A second claim must fail while the flag is held
            assert!(!repo.mark_notified("match_1_notification").await);
            assert!(!repo.mark_notified("unknown").await);

            let stored = repo.find("match_1_notification").await.expect("To find");
            assert!(stored.notified);
        }
    }

    #[tokio::test]
    async fn save_all_does_not_resurrect_deleted_reminders() {
        for repo in repos() {
            let kept = reminder_factory("match_1_notification", ReminderChannel::Notification);
            let removed = reminder_factory("match_2_notification", ReminderChannel::Notification);
            repo.upsert(&kept).await.expect("To upsert");
            repo.upsert(&removed).await.expect("To upsert");

            // The background context took a copy of both, then the user
            // deleted one before the copy came back
            let mut handed_back = vec![kept.clone(), removed.clone()];
            for r in handed_back.iter_mut() {
                r.notified = true;
            }
            repo.delete(&removed.id).await.expect("To delete");

            repo.save_all(&handed_back).await.expect("To save");

            let all = repo.find_all().await;
            assert_eq!(all.len(), 1);
            assert_eq!(all[0].id, kept.id);
            assert!(all[0].notified);
        }
    }

    #[tokio::test]
    async fn finds_due_emails_within_horizon() {
        for repo in repos() {
            let now = 1000 * 60 * 30;
            let horizon = 1000 * 60 * 5;

            // Fires at now + 1 minute
            let mut due = reminder_factory("match_1_email", ReminderChannel::Email);
            due.match_date = Some(now + 1000 * 60 * 16);
            // Fires right outside the horizon
            let mut later = reminder_factory("match_2_email", ReminderChannel::Email);
            later.match_date = Some(now + horizon + 1000 * 60 * 16);
            // Due notification reminders are not the email job's concern
            let mut notification = reminder_factory("match_3_notification", ReminderChannel::Notification);
            notification.match_date = Some(now + 1000 * 60 * 16);
            // Already sent
            let mut sent = reminder_factory("match_4_email", ReminderChannel::Email);
            sent.match_date = Some(now + 1000 * 60 * 16);
            sent.notified = true;

            for r in [&due, &later, &notification, &sent] {
                repo.upsert(r).await.expect("To upsert");
            }

            let found = repo.find_due_emails(now, horizon).await;
            assert_eq!(found.len(), 1);
            assert_eq!(found[0].id, "match_1_email");
        }
    }
}
