use crate::ids::IdGenerator;
use crate::models::{HabitSnapshot, NotificationPermission, Reminder, TimeOfDay};
use crate::notify::Notifier;
use chrono::Utc;
use std::fmt;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    NoHabitSelected,
}

impl fmt::Display for SchedulerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchedulerError::NoHabitSelected => f.write_str("no habit selected for reminder"),
        }
    }
}

impl std::error::Error for SchedulerError {}

pub fn default_message(habit_name: &str) -> String {
    format!("Time to work on your {habit_name} habit!")
}

/// One-shot, time-of-day reminders plus the count of fired ones the user
/// has not looked at yet.
#[derive(Debug, Default)]
pub struct ReminderScheduler {
    reminders: Vec<Reminder>,
    unread: u32,
    ids: IdGenerator,
}

impl ReminderScheduler {
    pub fn new(reminders: Vec<Reminder>) -> Self {
        let mut ids = IdGenerator::new();
        for reminder in &reminders {
            ids.observe(reminder.id);
        }
        Self {
            reminders,
            unread: 0,
            ids,
        }
    }

    /// Rebuilds the collection from its stored JSON. Missing or unreadable
    /// data means no reminders.
    pub fn restore(raw: Option<&str>) -> Self {
        let reminders = match raw {
            Some(raw) => match serde_json::from_str::<Vec<Reminder>>(raw) {
                Ok(reminders) => reminders,
                Err(err) => {
                    warn!("discarding unreadable stored reminders: {err}");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };
        Self::new(reminders)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.reminders)
    }

    pub fn list(&self) -> &[Reminder] {
        &self.reminders
    }

    pub fn unread(&self) -> u32 {
        self.unread
    }

    pub fn mark_read(&mut self) {
        self.unread = 0;
    }

    pub fn add_reminder(
        &mut self,
        habit: Option<HabitSnapshot>,
        time: TimeOfDay,
        message: Option<&str>,
    ) -> Result<Reminder, SchedulerError> {
        let habit = habit.ok_or(SchedulerError::NoHabitSelected)?;
        let message = match message.map(str::trim) {
            Some(message) if !message.is_empty() => message.to_string(),
            _ => default_message(&habit.name),
        };

        let reminder = Reminder {
            id: self.ids.next(),
            habit,
            time,
            message,
            is_active: true,
            created_at: Utc::now(),
        };
        self.reminders.push(reminder.clone());
        Ok(reminder)
    }

    /// Returns whether anything was removed.
    pub fn clear_reminder(&mut self, id: u64) -> bool {
        self.take_reminder(id).is_some()
    }

    /// Removes a reminder and reports where it sat, so the removal can be
    /// undone with `restore_at`.
    pub fn take_reminder(&mut self, id: u64) -> Option<(usize, Reminder)> {
        let index = self.reminders.iter().position(|reminder| reminder.id == id)?;
        Some((index, self.reminders.remove(index)))
    }

    pub fn restore_at(&mut self, index: usize, reminder: Reminder) {
        let index = index.min(self.reminders.len());
        self.reminders.insert(index, reminder);
    }

    /// Fires every active reminder set for exactly `now`, deactivating each
    /// one. Fired reminders count as unread even when notification
    /// permission is missing and nothing visible was shown.
    pub fn poll_and_fire(&mut self, now: TimeOfDay, notifier: &dyn Notifier) -> u32 {
        let granted = notifier.permission() == NotificationPermission::Granted;
        let mut fired = 0;

        for reminder in self
            .reminders
            .iter_mut()
            .filter(|reminder| reminder.is_active && reminder.time == now)
        {
            if granted {
                notifier.deliver(reminder);
            } else {
                warn!(
                    reminder_id = reminder.id,
                    "notification permission not granted; reminder fired silently"
                );
            }
            reminder.is_active = false;
            fired += 1;
            info!(reminder_id = reminder.id, habit = %reminder.habit.name, time = %now, "reminder fired");
        }

        self.unread = self.unread.saturating_add(fired);
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct RecordingNotifier {
        permission: NotificationPermission,
        delivered: Mutex<Vec<u64>>,
    }

    impl RecordingNotifier {
        fn new(permission: NotificationPermission) -> Self {
            Self {
                permission,
                delivered: Mutex::new(Vec::new()),
            }
        }

        fn delivered(&self) -> Vec<u64> {
            self.delivered.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl Notifier for RecordingNotifier {
        fn permission(&self) -> NotificationPermission {
            self.permission
        }

        async fn request_permission(&self) -> NotificationPermission {
            self.permission
        }

        fn deliver(&self, reminder: &Reminder) {
            self.delivered.lock().unwrap().push(reminder.id);
        }
    }

    fn exercise() -> HabitSnapshot {
        HabitSnapshot {
            id: 3,
            name: "Exercise".into(),
            icon: "🏃".into(),
        }
    }

    fn at(raw: &str) -> TimeOfDay {
        raw.parse().unwrap()
    }

    #[test]
    fn add_requires_a_selected_habit() {
        let mut scheduler = ReminderScheduler::default();
        let err = scheduler.add_reminder(None, at("09:00"), None).unwrap_err();
        assert_eq!(err, SchedulerError::NoHabitSelected);
        assert!(scheduler.list().is_empty());
    }

    #[test]
    fn empty_message_uses_default_text() {
        let mut scheduler = ReminderScheduler::default();
        let blank = scheduler.add_reminder(Some(exercise()), at("09:00"), Some("  ")).unwrap();
        let missing = scheduler.add_reminder(Some(exercise()), at("10:00"), None).unwrap();
        let custom = scheduler
            .add_reminder(Some(exercise()), at("11:00"), Some("Gym bag!"))
            .unwrap();

        assert_eq!(blank.message, "Time to work on your Exercise habit!");
        assert_eq!(missing.message, blank.message);
        assert_eq!(custom.message, "Gym bag!");
        assert!(blank.is_active);
        assert!(missing.id > blank.id && custom.id > missing.id);
    }

    #[test]
    fn due_reminder_fires_once() {
        let notifier = RecordingNotifier::new(NotificationPermission::Granted);
        let mut scheduler = ReminderScheduler::default();
        let reminder = scheduler.add_reminder(Some(exercise()), at("09:00"), None).unwrap();

        assert_eq!(scheduler.poll_and_fire(at("08:59"), &notifier), 0);
        assert_eq!(scheduler.poll_and_fire(at("09:00"), &notifier), 1);
        assert!(!scheduler.list()[0].is_active);
        assert_eq!(scheduler.poll_and_fire(at("09:00"), &notifier), 0);

        assert_eq!(notifier.delivered(), vec![reminder.id]);
        assert_eq!(scheduler.unread(), 1);
    }

    #[test]
    fn missing_permission_still_deactivates_and_counts() {
        let notifier = RecordingNotifier::new(NotificationPermission::Denied);
        let mut scheduler = ReminderScheduler::default();
        scheduler.add_reminder(Some(exercise()), at("07:30"), None).unwrap();
        scheduler.add_reminder(Some(exercise()), at("07:30"), None).unwrap();

        assert_eq!(scheduler.poll_and_fire(at("07:30"), &notifier), 2);
        assert!(notifier.delivered().is_empty());
        assert!(scheduler.list().iter().all(|r| !r.is_active));
        assert_eq!(scheduler.unread(), 2);

        scheduler.mark_read();
        assert_eq!(scheduler.unread(), 0);
    }

    #[test]
    fn clearing_unknown_id_leaves_collection_alone() {
        let mut scheduler = ReminderScheduler::default();
        let kept = scheduler.add_reminder(Some(exercise()), at("12:00"), None).unwrap();
        let before = scheduler.list().to_vec();

        assert!(!scheduler.clear_reminder(kept.id + 1000));
        assert_eq!(scheduler.list(), before.as_slice());

        assert!(scheduler.clear_reminder(kept.id));
        assert!(scheduler.list().is_empty());
    }

    #[test]
    fn taken_reminder_goes_back_in_place() {
        let mut scheduler = ReminderScheduler::default();
        for time in ["07:00", "08:00", "09:00"] {
            scheduler.add_reminder(Some(exercise()), at(time), None).unwrap();
        }
        let before = scheduler.list().to_vec();

        let (index, taken) = scheduler.take_reminder(before[1].id).unwrap();
        assert_eq!(index, 1);
        assert_eq!(scheduler.list().len(), 2);

        scheduler.restore_at(index, taken);
        assert_eq!(scheduler.list(), before.as_slice());
        assert!(scheduler.take_reminder(u64::MAX).is_none());
    }

    #[test]
    fn inactive_reminders_can_be_cleared() {
        let notifier = RecordingNotifier::new(NotificationPermission::Granted);
        let mut scheduler = ReminderScheduler::default();
        let reminder = scheduler.add_reminder(Some(exercise()), at("06:00"), None).unwrap();
        scheduler.poll_and_fire(at("06:00"), &notifier);

        assert!(scheduler.clear_reminder(reminder.id));
    }

    #[test]
    fn stored_collection_round_trips() {
        let notifier = RecordingNotifier::new(NotificationPermission::Granted);
        let mut scheduler = ReminderScheduler::default();
        scheduler.add_reminder(Some(exercise()), at("09:00"), None).unwrap();
        scheduler.add_reminder(Some(exercise()), at("21:15"), Some("Stretch")).unwrap();
        scheduler.poll_and_fire(at("09:00"), &notifier);

        let raw = scheduler.to_json().unwrap();
        let restored = ReminderScheduler::restore(Some(&raw));
        assert_eq!(restored.list(), scheduler.list());
        assert_eq!(restored.unread(), 0);
    }

    #[test]
    fn corrupt_or_missing_storage_means_no_reminders() {
        assert!(ReminderScheduler::restore(None).list().is_empty());
        assert!(ReminderScheduler::restore(Some("{not json")).list().is_empty());
        assert!(ReminderScheduler::restore(Some(r#"[{"id":1,"time":"25:00"}]"#)).list().is_empty());
    }

    #[test]
    fn restored_ids_are_not_reused() {
        let mut scheduler = ReminderScheduler::default();
        let first = scheduler.add_reminder(Some(exercise()), at("09:00"), None).unwrap();
        let raw = scheduler.to_json().unwrap();

        let mut restored = ReminderScheduler::restore(Some(&raw));
        let second = restored.add_reminder(Some(exercise()), at("09:00"), None).unwrap();
        assert!(second.id > first.id);
    }
}
