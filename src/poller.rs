use crate::models::TimeOfDay;
use crate::state::AppState;
use chrono::Local;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{error, info};

/// Owns the background poll task. Dropping the handle stops the task so no
/// tick runs against torn-down state.
#[derive(Debug)]
pub struct PollerHandle {
    task: Option<JoinHandle<()>>,
}

impl PollerHandle {
    /// Stops the task and waits for it. Returns true when it was cancelled
    /// rather than having already ended on its own.
    pub async fn shutdown(mut self) -> bool {
        let Some(task) = self.task.take() else {
            return false;
        };
        task.abort();
        let cancelled = matches!(task.await, Err(err) if err.is_cancelled());
        info!("reminder poller stopped");
        cancelled
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

pub fn spawn_reminder_poller(state: AppState, every: Duration) -> PollerHandle {
    let task = tokio::spawn(async move {
        let mut ticker = time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; wait a full period like a
        // plain repeating timer would.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            poll_once(&state, TimeOfDay::from_time(&Local::now())).await;
        }
    });

    PollerHandle { task: Some(task) }
}

/// One scheduler pass at `now`. Persists the collection when anything fired.
pub async fn poll_once(state: &AppState, now: TimeOfDay) -> u32 {
    let mut scheduler = state.scheduler.lock().await;
    let fired = scheduler.poll_and_fire(now, state.notifier.as_ref());
    if fired > 0 {
        if let Err(err) = state.persist_reminders(&scheduler).await {
            error!("failed to persist reminders after firing: {}", err.message);
        }
    }
    fired
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::NotificationPermission;
    use crate::notify::Notifier;
    use crate::scheduler::ReminderScheduler;
    use crate::storage::{load_storage, LocalStorage, REMINDERS_KEY};

    fn test_state(name: &str) -> AppState {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let config = Config {
            data_path: std::env::temp_dir()
                .join(format!("habit_tracker_poller_{name}_{}_{nanos}.json", std::process::id())),
            notification_permission: NotificationPermission::Granted,
            ..Config::default()
        };
        AppState::new(&config, LocalStorage::default())
    }

    #[tokio::test]
    async fn poll_fires_delivers_and_persists() {
        let state = test_state("fires");
        let snapshot = state.ledger.lock().await.snapshot(2);
        let reminder = state
            .scheduler
            .lock()
            .await
            .add_reminder(snapshot, "09:00".parse().unwrap(), None)
            .unwrap();

        let nine = "09:00".parse().unwrap();
        assert_eq!(poll_once(&state, nine).await, 1);
        assert_eq!(poll_once(&state, nine).await, 0);

        let inbox = state.notifier.notifications();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].reminder_id, reminder.id);
        assert_eq!(inbox[0].body, "Time to work on your Water Intake habit!");
        assert_eq!(state.scheduler.lock().await.unread(), 1);

        let stored = load_storage(&state.data_path).await;
        let restored = ReminderScheduler::restore(stored.get_item(REMINDERS_KEY));
        assert_eq!(restored.list().len(), 1);
        assert!(!restored.list()[0].is_active);
        let _ = tokio::fs::remove_file(&state.data_path).await;
    }

    #[tokio::test]
    async fn poll_without_permission_counts_but_shows_nothing() {
        let state = test_state("silent");
        state.notifier.set_permission(NotificationPermission::Denied);
        let snapshot = state.ledger.lock().await.snapshot(1);
        state
            .scheduler
            .lock()
            .await
            .add_reminder(snapshot, "22:00".parse().unwrap(), None)
            .unwrap();

        assert_eq!(poll_once(&state, "22:00".parse().unwrap()).await, 1);
        assert!(state.notifier.notifications().is_empty());
        assert_eq!(state.notifier.permission(), NotificationPermission::Denied);
        assert_eq!(state.scheduler.lock().await.unread(), 1);
        let _ = tokio::fs::remove_file(&state.data_path).await;
    }

    #[tokio::test]
    async fn shutdown_stops_the_task() {
        let state = test_state("shutdown");
        let handle = spawn_reminder_poller(state.clone(), Duration::from_millis(10));
        assert!(handle.shutdown().await);

        let snapshot = state.ledger.lock().await.snapshot(4);
        let now = TimeOfDay::from_time(&Local::now());
        state
            .scheduler
            .lock()
            .await
            .add_reminder(snapshot, now, None)
            .unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;

        let scheduler = state.scheduler.lock().await;
        assert!(scheduler.list()[0].is_active);
        assert_eq!(scheduler.unread(), 0);
        assert!(state.notifier.notifications().is_empty());
    }
}
