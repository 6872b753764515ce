use super::inmemory::{due_emails, update_existing, upsert_reminder};
use super::IReminderRepo;
use crate::repos::shared::json_file::JsonFile;
use matchminder_domain::Reminder;
use std::path::PathBuf;

/// Durable reminder store backed by a single json file, the server-side
/// stand-in for the browser's local storage. A corrupt or missing file
/// reads as an empty store.
pub struct LocalStorageReminderRepo {
    file: std::sync::Mutex<JsonFile<Vec<Reminder>>>,
}

impl LocalStorageReminderRepo {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: std::sync::Mutex::new(JsonFile::new(path)),
        }
    }
}

#[async_trait::async_trait]
impl IReminderRepo for LocalStorageReminderRepo {
    async fn upsert(&self, reminder: &Reminder) -> anyhow::Result<()> {
        let file = self.file.lock().unwrap();
        let mut reminders = file.load();
        upsert_reminder(&mut reminders, reminder);
        file.store(&reminders)
    }

    async fn find(&self, reminder_id: &str) -> Option<Reminder> {
        let file = self.file.lock().unwrap();
        file.load().into_iter().find(|r| r.id == reminder_id)
    }

    async fn find_all(&self) -> Vec<Reminder> {
        self.file.lock().unwrap().load()
    }

    async fn find_due_emails(&self, now: i64, horizon: i64) -> Vec<Reminder> {
        let reminders = self.file.lock().unwrap().load();
        due_emails(&reminders, now, horizon)
    }

    async fn delete(&self, reminder_id: &str) -> Option<Reminder> {
        let file = self.file.lock().unwrap();
        let mut reminders = file.load();
        let pos = reminders.iter().position(|r| r.id == reminder_id)?;
        let removed = reminders.remove(pos);
        match file.store(&reminders) {
            Ok(_) => Some(removed),
            Err(e) => {
                tracing::error!("Unable to persist reminder store after delete: {:?}", e);
                Some(removed)
            }
        }
    }

    async fn mark_notified(&self, reminder_id: &str) -> bool {
        let file = self.file.lock().unwrap();
        let mut reminders = file.load();
        let claimed = match reminders.iter_mut().find(|r| r.id == reminder_id) {
            Some(reminder) if !reminder.notified => {
                reminder.notified = true;
                true
            }
            _ => false,
        };
        if claimed {
            if let Err(e) = file.store(&reminders) {
                tracing::error!("Unable to persist notified flag: {:?}", e);
            }
        }
        claimed
    }

    async fn save_all(&self, updated: &[Reminder]) -> anyhow::Result<()> {
        let file = self.file.lock().unwrap();
        let mut reminders = file.load();
        update_existing(&mut reminders, updated);
        file.store(&reminders)
    }
}
