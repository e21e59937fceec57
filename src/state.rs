use crate::config::Config;
use crate::errors::AppError;
use crate::ledger::HabitLedger;
use crate::models::Theme;
use crate::notify::InboxNotifier;
use crate::scheduler::ReminderScheduler;
use crate::seed::mock_habits;
use crate::storage::{persist_storage, LocalStorage, REMINDERS_KEY, THEME_KEY};
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

/// Locks are always taken in the order ledger, scheduler, storage.
#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub storage: Arc<Mutex<LocalStorage>>,
    pub ledger: Arc<Mutex<HabitLedger>>,
    pub scheduler: Arc<Mutex<ReminderScheduler>>,
    pub notifier: Arc<InboxNotifier>,
}

impl AppState {
    pub fn new(config: &Config, storage: LocalStorage) -> Self {
        let scheduler = ReminderScheduler::restore(storage.get_item(REMINDERS_KEY));
        let notifier = InboxNotifier::new(
            config.notification_permission,
            config.notification_auto_grant,
        );

        Self {
            data_path: config.data_path.clone(),
            storage: Arc::new(Mutex::new(storage)),
            ledger: Arc::new(Mutex::new(HabitLedger::new(mock_habits()))),
            scheduler: Arc::new(Mutex::new(scheduler)),
            notifier: Arc::new(notifier),
        }
    }

    /// Writes the whole reminder collection through to disk. Call with the
    /// scheduler lock still held so the write follows the mutation.
    pub async fn persist_reminders(&self, scheduler: &ReminderScheduler) -> Result<(), AppError> {
        let payload = scheduler.to_json()?;
        let mut storage = self.storage.lock().await;
        storage.set_item(REMINDERS_KEY, payload);
        persist_storage(&self.data_path, &storage).await
    }

    pub async fn theme(&self) -> Theme {
        Theme::from_stored(self.storage.lock().await.get_item(THEME_KEY))
    }

    pub async fn set_theme(&self, theme: Theme) -> Result<Theme, AppError> {
        let mut storage = self.storage.lock().await;
        storage.set_item(THEME_KEY, theme.as_str());
        persist_storage(&self.data_path, &storage).await?;
        Ok(theme)
    }

    pub async fn toggle_theme(&self) -> Result<Theme, AppError> {
        let mut storage = self.storage.lock().await;
        let theme = Theme::from_stored(storage.get_item(THEME_KEY)).toggled();
        storage.set_item(THEME_KEY, theme.as_str());
        persist_storage(&self.data_path, &storage).await?;
        Ok(theme)
    }
}
