use crate::models::{Notification, NotificationPermission, Reminder};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::info;

pub const NOTIFICATION_ICON: &str = "/favicon.ico";
/// Oldest notifications are dropped past this many.
pub const INBOX_CAPACITY: usize = 50;

/// Platform notification primitive the scheduler fires through.
#[async_trait]
pub trait Notifier: Send + Sync {
    fn permission(&self) -> NotificationPermission;

    /// Resolves a pending permission prompt. Callers run this detached and do
    /// not wait on it before handling further requests.
    async fn request_permission(&self) -> NotificationPermission;

    /// Shows the notification for a reminder. Only called once permission is
    /// `Granted`.
    fn deliver(&self, reminder: &Reminder);
}

pub fn notification_title(reminder: &Reminder) -> String {
    format!("Reminder: {}", reminder.habit.name)
}

/// Notifier that logs each delivery and keeps it in an inbox the
/// presentation layer polls.
#[derive(Debug)]
pub struct InboxNotifier {
    permission: Mutex<NotificationPermission>,
    auto_grant: bool,
    inbox: Mutex<Inbox>,
}

#[derive(Debug, Default)]
struct Inbox {
    next_id: u64,
    items: VecDeque<Notification>,
}

impl InboxNotifier {
    pub fn new(permission: NotificationPermission, auto_grant: bool) -> Self {
        Self {
            permission: Mutex::new(permission),
            auto_grant,
            inbox: Mutex::new(Inbox::default()),
        }
    }

    pub fn set_permission(&self, permission: NotificationPermission) {
        *lock(&self.permission) = permission;
    }

    pub fn notifications(&self) -> Vec<Notification> {
        lock(&self.inbox).items.iter().cloned().collect()
    }

    pub fn get(&self, id: u64) -> Option<Notification> {
        lock(&self.inbox).items.iter().find(|n| n.id == id).cloned()
    }
}

#[async_trait]
impl Notifier for InboxNotifier {
    fn permission(&self) -> NotificationPermission {
        *lock(&self.permission)
    }

    async fn request_permission(&self) -> NotificationPermission {
        let mut permission = lock(&self.permission);
        if *permission == NotificationPermission::Default {
            *permission = if self.auto_grant {
                NotificationPermission::Granted
            } else {
                NotificationPermission::Denied
            };
            info!(permission = ?*permission, "notification permission resolved");
        }
        *permission
    }

    fn deliver(&self, reminder: &Reminder) {
        let mut inbox = lock(&self.inbox);
        inbox.next_id += 1;
        let notification = Notification {
            id: inbox.next_id,
            reminder_id: reminder.id,
            title: notification_title(reminder),
            body: reminder.message.clone(),
            icon: NOTIFICATION_ICON.to_string(),
            delivered_at: Utc::now(),
        };
        info!(
            reminder_id = reminder.id,
            title = %notification.title,
            body = %notification.body,
            "notification delivered"
        );
        if inbox.items.len() == INBOX_CAPACITY {
            inbox.items.pop_front();
        }
        inbox.items.push_back(notification);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
