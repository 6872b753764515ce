use super::IReminderRepo;
use matchminder_domain::{Reminder, ReminderChannel};

pub struct InMemoryReminderRepo {
    reminders: std::sync::Mutex<Vec<Reminder>>,
}

impl InMemoryReminderRepo {
    pub fn new() -> Self {
        Self {
            reminders: std::sync::Mutex::new(Vec::new()),
        }
    }
}

impl Default for InMemoryReminderRepo {
    fn default() -> Self {
        Self::new()
    }
}

pub(super) fn upsert_reminder(reminders: &mut Vec<Reminder>, reminder: &Reminder) {
    match reminders.iter_mut().find(|r| r.id == reminder.id) {
        Some(existing) => *existing = reminder.clone(),
        None => reminders.push(reminder.clone()),
    }
}

/// Overwrites records that still exist and skips the rest. A reminder
/// deleted while the background context held a copy stays deleted.
pub(super) fn update_existing(reminders: &mut [Reminder], updated: &[Reminder]) {
    for reminder in updated {
        if let Some(existing) = reminders.iter_mut().find(|r| r.id == reminder.id) {
            *existing = reminder.clone();
        }
    }
}

pub(super) fn due_emails(reminders: &[Reminder], now: i64, horizon: i64) -> Vec<Reminder> {
    reminders
        .iter()
        .filter(|r| r.channel == ReminderChannel::Email && !r.notified)
        .filter(|r| match r.fire_at() {
            Some(fire_at) => now <= fire_at && fire_at <= now + horizon,
            None => false,
        })
        .cloned()
        .collect()
}

#[async_trait::async_trait]
impl IReminderRepo for InMemoryReminderRepo {
    async fn upsert(&self, reminder: &Reminder) -> anyhow::Result<()> {
        let mut reminders = self.reminders.lock().unwrap();
        upsert_reminder(&mut reminders, reminder);
        Ok(())
    }

    async fn find(&self, reminder_id: &str) -> Option<Reminder> {
        let reminders = self.reminders.lock().unwrap();
        reminders.iter().find(|r| r.id == reminder_id).cloned()
    }

    async fn find_all(&self) -> Vec<Reminder> {
        self.reminders.lock().unwrap().clone()
    }

    async fn find_due_emails(&self, now: i64, horizon: i64) -> Vec<Reminder> {
        let reminders = self.reminders.lock().unwrap();
        due_emails(&reminders, now, horizon)
    }

    async fn delete(&self, reminder_id: &str) -> Option<Reminder> {
        let mut reminders = self.reminders.lock().unwrap();
        let pos = reminders.iter().position(|r| r.id == reminder_id)?;
        Some(reminders.remove(pos))
    }

    async fn mark_notified(&self, reminder_id: &str) -> bool {
        let mut reminders = self.reminders.lock().unwrap();
        match reminders.iter_mut().find(|r| r.id == reminder_id) {
            Some(reminder) if !reminder.notified => {
                reminder.notified = true;
                true
            }
            _ => false,
        }
    }

    async fn save_all(&self, updated: &[Reminder]) -> anyhow::Result<()> {
        let mut reminders = self.reminders.lock().unwrap();
        update_existing(&mut reminders, updated);
        Ok(())
    }
}
